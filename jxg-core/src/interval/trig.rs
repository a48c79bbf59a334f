//! Trigonometric and hyperbolic interval functions.
//!
//! `cos` reduces its argument into `[0, 2pi)` and reads the extrema off the
//! position of the reduced interval relative to `pi`; `sin` is a shifted
//! `cos`. Arguments with a width of a full period collapse to `[-1, 1]`.

use super::{Interval, IntervalContext, PI_HALF_HIGH, PI_HALF_LOW, PI_HIGH, PI_LOW, PI_TWICE_LOW};

impl IntervalContext {
    // Shifts an interval with a negative lower bound by a multiple of 2pi so
    // that it starts at or above zero.
    fn handle_negative(x: Interval) -> Interval {
        if x.lo >= 0.0 {
            return x;
        }
        if x.lo == f64::NEG_INFINITY {
            return Interval::new(0.0, f64::INFINITY);
        }
        let n = (-x.lo / PI_TWICE_LOW).ceil();
        Interval::new(x.lo + PI_TWICE_LOW * n, x.hi + PI_TWICE_LOW * n)
    }

    pub fn cos(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() || x.only_infinity() {
            return Interval::EMPTY;
        }
        let r = self.rounding;

        let t = self.fmod(Self::handle_negative(x), Interval::PI_TWICE);
        if self.width(t) >= Interval::PI_TWICE.lo {
            return Interval::new(-1.0, 1.0);
        }

        // cos(t) = -cos(t - pi)
        if t.lo >= PI_HIGH {
            return Self::negative(self.cos(self.sub(t, Interval::PI)));
        }

        // 0 <= t.lo < pi, cos is decreasing up to pi
        let rlo = r.lo_of(f64::cos, t.hi).max(-1.0);
        let rhi = r.hi_of(f64::cos, t.lo).min(1.0);
        if t.hi <= PI_LOW {
            Interval::new(rlo, rhi)
        } else if t.hi <= Interval::PI_TWICE.lo {
            Interval::new(-1.0, rlo.max(rhi))
        } else {
            Interval::new(-1.0, 1.0)
        }
    }

    pub fn sin(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() || x.only_infinity() {
            return Interval::EMPTY;
        }
        self.cos(self.sub(x, Interval::PI_HALF))
    }

    /// Tangent; any interval that reaches a pole gives `WHOLE`.
    pub fn tan(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() || x.only_infinity() {
            return Interval::EMPTY;
        }
        let mut t = self.fmod(Self::handle_negative(x), Interval::PI);
        if t.lo >= PI_HALF_LOW {
            t = self.sub(t, Interval::PI);
        }
        if t.lo <= -PI_HALF_LOW || t.hi >= PI_HALF_LOW {
            return Interval::WHOLE;
        }
        let r = self.rounding;
        Interval::new(r.lo_of(f64::tan, t.lo), r.hi_of(f64::tan, t.hi))
    }

    pub fn asin(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() || x.hi < -1.0 || x.lo > 1.0 {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        let lo = if x.lo <= -1.0 {
            -PI_HALF_HIGH
        } else {
            r.lo_of(f64::asin, x.lo)
        };
        let hi = if x.hi >= 1.0 {
            PI_HALF_HIGH
        } else {
            r.hi_of(f64::asin, x.hi)
        };
        Interval::new(lo, hi)
    }

    pub fn acos(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() || x.hi < -1.0 || x.lo > 1.0 {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        let lo = if x.hi >= 1.0 {
            0.0
        } else {
            r.lo_of(f64::acos, x.hi)
        };
        let hi = if x.lo <= -1.0 {
            PI_HIGH
        } else {
            r.hi_of(f64::acos, x.lo)
        };
        Interval::new(lo, hi)
    }

    pub fn atan(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        Interval::new(r.lo_of(f64::atan, x.lo), r.hi_of(f64::atan, x.hi))
    }

    pub fn sinh(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        Interval::new(r.lo_of(f64::sinh, x.lo), r.hi_of(f64::sinh, x.hi))
    }

    pub fn cosh(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        if x.hi < 0.0 {
            Interval::new(r.lo_of(f64::cosh, x.hi), r.hi_of(f64::cosh, x.lo))
        } else if x.lo >= 0.0 {
            Interval::new(r.lo_of(f64::cosh, x.lo), r.hi_of(f64::cosh, x.hi))
        } else {
            Interval::new(1.0, r.hi_of(f64::cosh, (-x.lo).max(x.hi)))
        }
    }

    pub fn tanh(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        Interval::new(r.lo_of(f64::tanh, x.lo), r.hi_of(f64::tanh, x.hi))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    use super::*;

    const CTX: IntervalContext = IntervalContext::outward();

    fn encloses(i: Interval, v: f64) -> bool {
        i.lo <= v + 1e-12 && v - 1e-12 <= i.hi
    }

    #[test]
    fn cos_of_small_interval() {
        let c = CTX.cos(Interval::new(0.0, FRAC_PI_4));
        assert!(encloses(c, 1.0));
        assert!(encloses(c, FRAC_PI_4.cos()));
        assert!(c.lo > 0.7 && c.hi <= 1.0);
    }

    #[test]
    fn cos_across_pi_reaches_minus_one() {
        let c = CTX.cos(Interval::new(3.0, 3.5));
        assert_eq!(c.lo, -1.0);
        assert!(encloses(c, 3.0f64.cos()));
        assert!(encloses(c, 3.5f64.cos()));
    }

    #[test]
    fn cos_of_full_period_is_unit_interval() {
        assert_eq!(CTX.cos(Interval::new(0.0, 7.0)), Interval::new(-1.0, 1.0));
        assert_eq!(CTX.cos(Interval::new(-100.0, 100.0)), Interval::new(-1.0, 1.0));
    }

    #[test]
    fn cos_of_negative_and_shifted_arguments() {
        for &(lo, hi) in &[(-1.0, -0.5), (-4.0, -3.5), (4.0, 4.5), (10.0, 10.2)] {
            let c = CTX.cos(Interval::new(lo, hi));
            for k in 0..=10 {
                let v = lo + (hi - lo) * k as f64 / 10.0;
                assert!(encloses(c, v.cos()), "cos({v}) not in {c:?}");
            }
        }
    }

    #[test]
    fn sin_encloses_samples() {
        let s = CTX.sin(Interval::new(0.0, FRAC_PI_2));
        assert!(encloses(s, 0.0));
        assert!(encloses(s, 1.0));
        let s = CTX.sin(Interval::new(1.0, 2.0));
        assert!(encloses(s, 1.0));
        assert!(encloses(s, 1.0f64.sin()));
    }

    #[test]
    fn trig_of_empty_or_infinite_point_is_empty() {
        assert!(CTX.cos(Interval::EMPTY).is_empty());
        assert!(CTX.sin(Interval::singleton(f64::INFINITY)).is_empty());
        assert!(CTX.tan(Interval::singleton(f64::NEG_INFINITY)).is_empty());
    }

    #[test]
    fn tan_pole_gives_whole() {
        assert!(CTX.tan(Interval::new(1.0, 2.0)).is_whole());
        let t = CTX.tan(Interval::new(0.0, 1.0));
        assert!(encloses(t, 0.0));
        assert!(encloses(t, 1.0f64.tan()));
        let t = CTX.tan(Interval::new(PI + 0.1, PI + 0.2));
        assert!(encloses(t, 0.1f64.tan()));
    }

    #[test]
    fn inverse_trig_clamps_domain() {
        assert!(CTX.asin(Interval::new(2.0, 3.0)).is_empty());
        let a = CTX.asin(Interval::new(-2.0, 2.0));
        assert!(encloses(a, -FRAC_PI_2) && encloses(a, FRAC_PI_2));
        let c = CTX.acos(Interval::new(-1.0, 1.0));
        assert_eq!(c.lo, 0.0);
        assert!(encloses(c, PI));
        let t = CTX.atan(Interval::new(0.0, 1.0));
        assert!(encloses(t, FRAC_PI_4));
    }

    #[test]
    fn hyperbolic() {
        let c = CTX.cosh(Interval::new(-2.0, 1.0));
        assert_eq!(c.lo, 1.0);
        assert!(encloses(c, 2.0f64.cosh()));
        let c = CTX.cosh(Interval::new(-2.0, -1.0));
        assert!(encloses(c, 1.0f64.cosh()) && encloses(c, 2.0f64.cosh()));
        let s = CTX.sinh(Interval::new(-1.0, 1.0));
        assert!(encloses(s, 1.0f64.sinh()) && encloses(s, -(1.0f64.sinh())));
        let t = CTX.tanh(Interval::new(0.0, 1.0));
        assert!(encloses(t, 1.0f64.tanh()));
    }
}
