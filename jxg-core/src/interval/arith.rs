//! Arithmetic and algebraic interval operations.

use tracing::warn;

use super::{Interval, IntervalContext};
use crate::error::{Error, Result};

impl IntervalContext {
    pub fn add(&self, x: impl Into<Interval>, y: impl Into<Interval>) -> Interval {
        let (x, y) = (x.into(), y.into());
        if x.is_empty() || y.is_empty() {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        Interval::new(r.add_lo(x.lo, y.lo), r.add_hi(x.hi, y.hi))
    }

    pub fn sub(&self, x: impl Into<Interval>, y: impl Into<Interval>) -> Interval {
        let (x, y) = (x.into(), y.into());
        if x.is_empty() || y.is_empty() {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        Interval::new(r.sub_lo(x.lo, y.hi), r.sub_hi(x.hi, y.lo))
    }

    /// Interval product with a case split on the signs of both operands, so
    /// only the two products that can be extreme are evaluated.
    pub fn mul(&self, x: impl Into<Interval>, y: impl Into<Interval>) -> Interval {
        let (x, y) = (x.into(), y.into());
        if x.is_empty() || y.is_empty() {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        let (xl, xh, yl, yh) = (x.lo, x.hi, y.lo, y.hi);

        if xl < 0.0 {
            if xh > 0.0 {
                if yl < 0.0 {
                    if yh > 0.0 {
                        // mixed * mixed
                        Interval::new(
                            r.mul_lo(xl, yh).min(r.mul_lo(xh, yl)),
                            r.mul_hi(xl, yl).max(r.mul_hi(xh, yh)),
                        )
                    } else {
                        // mixed * negative
                        Interval::new(r.mul_lo(xh, yl), r.mul_hi(xl, yl))
                    }
                } else if yh > 0.0 {
                    // mixed * positive
                    Interval::new(r.mul_lo(xl, yh), r.mul_hi(xh, yh))
                } else {
                    Interval::ZERO
                }
            } else if yl < 0.0 {
                if yh > 0.0 {
                    // negative * mixed
                    Interval::new(r.mul_lo(xl, yh), r.mul_hi(xl, yl))
                } else {
                    // negative * negative
                    Interval::new(r.mul_lo(xh, yh), r.mul_hi(xl, yl))
                }
            } else if yh > 0.0 {
                // negative * positive
                Interval::new(r.mul_lo(xl, yh), r.mul_hi(xh, yl))
            } else {
                Interval::ZERO
            }
        } else if xh > 0.0 {
            if yl < 0.0 {
                if yh > 0.0 {
                    // positive * mixed
                    Interval::new(r.mul_lo(xh, yl), r.mul_hi(xh, yh))
                } else {
                    // positive * negative
                    Interval::new(r.mul_lo(xh, yl), r.mul_hi(xl, yh))
                }
            } else if yh > 0.0 {
                // positive * positive
                Interval::new(r.mul_lo(xl, yl), r.mul_hi(xh, yh))
            } else {
                Interval::ZERO
            }
        } else {
            Interval::ZERO
        }
    }

    /// Interval quotient.
    ///
    /// A divisor that contains zero gives `WHOLE` when zero is interior, a
    /// half-infinite interval when zero is one of its bounds and `EMPTY` when
    /// the divisor is exactly `[0, 0]`.
    pub fn div(&self, x: impl Into<Interval>, y: impl Into<Interval>) -> Interval {
        let (x, y) = (x.into(), y.into());
        if x.is_empty() || y.is_empty() {
            return Interval::EMPTY;
        }
        if y.zero_in() {
            return match (y.lo != 0.0, y.hi != 0.0) {
                (true, true) => Self::div_zero(x),
                (true, false) => self.div_negative(x, y.lo),
                (false, true) => self.div_positive(x, y.hi),
                (false, false) => Interval::EMPTY,
            };
        }
        self.div_non_zero(x, y)
    }

    fn div_non_zero(&self, x: Interval, y: Interval) -> Interval {
        let r = self.rounding;
        let (xl, xh, yl, yh) = (x.lo, x.hi, y.lo, y.hi);

        if xh < 0.0 {
            if yh < 0.0 {
                Interval::new(r.div_lo(xh, yl), r.div_hi(xl, yh))
            } else {
                Interval::new(r.div_lo(xl, yl), r.div_hi(xh, yh))
            }
        } else if xl < 0.0 {
            if yh < 0.0 {
                Interval::new(r.div_lo(xh, yh), r.div_hi(xl, yh))
            } else {
                Interval::new(r.div_lo(xl, yl), r.div_hi(xh, yl))
            }
        } else if yh < 0.0 {
            Interval::new(r.div_lo(xh, yh), r.div_hi(xl, yl))
        } else {
            Interval::new(r.div_lo(xl, yh), r.div_hi(xh, yl))
        }
    }

    // divisor is [0, v] with v > 0
    fn div_positive(&self, x: Interval, v: f64) -> Interval {
        if x == Interval::ZERO {
            return x;
        }
        if x.zero_in() {
            return Interval::WHOLE;
        }
        if x.hi < 0.0 {
            Interval::new(f64::NEG_INFINITY, self.rounding.div_hi(x.hi, v))
        } else {
            Interval::new(self.rounding.div_lo(x.lo, v), f64::INFINITY)
        }
    }

    // divisor is [v, 0] with v < 0
    fn div_negative(&self, x: Interval, v: f64) -> Interval {
        if x == Interval::ZERO {
            return x;
        }
        if x.zero_in() {
            return Interval::WHOLE;
        }
        if x.hi < 0.0 {
            Interval::new(self.rounding.div_lo(x.hi, v), f64::INFINITY)
        } else {
            Interval::new(f64::NEG_INFINITY, self.rounding.div_hi(x.lo, v))
        }
    }

    // divisor strictly contains zero
    fn div_zero(x: Interval) -> Interval {
        if x == Interval::ZERO {
            x
        } else {
            Interval::WHOLE
        }
    }

    pub fn positive(x: Interval) -> Interval {
        x
    }

    pub fn negative(x: Interval) -> Interval {
        Interval::new(-x.hi, -x.lo)
    }

    /// Interval remainder `x - n * y` with `n` the truncated quotient of the
    /// lower bounds.
    pub fn fmod(&self, x: impl Into<Interval>, y: impl Into<Interval>) -> Interval {
        let (x, y) = (x.into(), y.into());
        if x.is_empty() || y.is_empty() {
            return Interval::EMPTY;
        }
        let yb = if x.lo < 0.0 { y.lo } else { y.hi };
        let n = (x.lo / yb).trunc();
        self.sub(x, self.mul(y, Interval::singleton(n)))
    }

    pub fn multiplicative_inverse(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        if x.zero_in() {
            match (x.lo != 0.0, x.hi != 0.0) {
                (true, true) => Interval::WHOLE,
                (true, false) => Interval::new(f64::NEG_INFINITY, r.div_hi(1.0, x.lo)),
                (false, true) => Interval::new(r.div_lo(1.0, x.hi), f64::INFINITY),
                (false, false) => Interval::EMPTY,
            }
        } else {
            Interval::new(r.div_lo(1.0, x.hi), r.div_hi(1.0, x.lo))
        }
    }

    /// Raises `x` to a real power.
    ///
    /// - `x^0` is `ONE` for every non-empty `x`, `[0, 0]` included.
    /// - Negative exponents go through [`Self::multiplicative_inverse`].
    /// - Integer exponents use repeated squaring; even powers of an interval
    ///   that straddles zero start at zero.
    /// - Non-integer exponents are only defined on the non-negative part of
    ///   `x`; a warning is logged because [`Self::nth_root`] is the intended
    ///   entry point for fractional powers.
    pub fn pow(&self, x: impl Into<Interval>, power: f64) -> Interval {
        let x = x.into();
        if x.is_empty() || power.is_nan() {
            return Interval::EMPTY;
        }
        if power == 0.0 {
            return Interval::ONE;
        }
        if power < 0.0 {
            return self.pow(self.multiplicative_inverse(x), -power);
        }

        let r = self.rounding;
        if power.fract() != 0.0 {
            warn!(power, "non-integer power, use nth_root for fractional exponents");
            if x.hi < 0.0 {
                return Interval::EMPTY;
            }
            return Interval::new(r.powf_lo(x.lo.max(0.0), power), r.powf_hi(x.hi, power));
        }

        // whole exponents past u64 are all even and only reachable through powf
        let small = power <= u64::MAX as f64;
        let n = power as u64;
        let odd = if small { n & 1 == 1 } else { (power / 2.0).fract() != 0.0 };
        let lo = |v: f64| if small { r.pow_lo(v, n) } else { r.powf_lo(v, power) };
        let hi = |v: f64| if small { r.pow_hi(v, n) } else { r.powf_hi(v, power) };

        if x.hi < 0.0 {
            // [negative, negative]: compute on the mirrored interval
            let yl = lo(-x.hi);
            let yh = hi(-x.lo);
            if odd {
                Interval::new(-yh, -yl)
            } else {
                Interval::new(yl, yh)
            }
        } else if x.lo < 0.0 {
            // [negative, positive]
            if odd {
                Interval::new(-hi(-x.lo), hi(x.hi))
            } else {
                Interval::new(0.0, hi((-x.lo).max(x.hi)))
            }
        } else {
            Interval::new(lo(x.lo), hi(x.hi))
        }
    }

    /// Raises `x` to an interval power; only singleton exponents are defined.
    pub fn pow_interval(&self, x: impl Into<Interval>, power: Interval) -> Interval {
        if power.is_empty() || !power.is_singleton() {
            return Interval::EMPTY;
        }
        self.pow(x, power.lo)
    }

    pub fn sqrt(&self, x: impl Into<Interval>) -> Interval {
        self.nth_root(x, 2.0)
    }

    /// The `n`-th root of `x`.
    ///
    /// Odd roots are defined on the whole real line. Even roots drop the
    /// negative part of `x`; an all-negative `x` gives `EMPTY`.
    pub fn nth_root(&self, x: impl Into<Interval>, n: f64) -> Interval {
        let x = x.into();
        if x.is_empty() || n.is_nan() || n <= 0.0 {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        let odd = n.fract() == 0.0 && n % 2.0 == 1.0;
        let lo = |v: f64| {
            if n == 2.0 {
                r.lo_of(f64::sqrt, v)
            } else {
                r.powf_lo(v, 1.0 / n)
            }
        };
        let hi = |v: f64| {
            if n == 2.0 {
                r.hi_of(f64::sqrt, v)
            } else {
                r.powf_hi(v, 1.0 / n)
            }
        };

        if x.hi < 0.0 {
            if odd {
                Interval::new(-hi(-x.lo), -lo(-x.hi))
            } else {
                Interval::EMPTY
            }
        } else if x.lo < 0.0 {
            let yp = hi(x.hi);
            if odd {
                Interval::new(-hi(-x.lo), yp)
            } else {
                Interval::new(0.0, yp)
            }
        } else {
            Interval::new(lo(x.lo).max(0.0), hi(x.hi))
        }
    }

    pub fn exp(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        Interval::new(r.lo_of(f64::exp, x.lo).max(0.0), r.hi_of(f64::exp, x.hi))
    }

    /// Natural logarithm; the part of `x` at or below zero maps to `-inf`.
    pub fn log(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() || x.hi < 0.0 {
            return Interval::EMPTY;
        }
        let r = self.rounding;
        let lo = if x.lo <= 0.0 {
            f64::NEG_INFINITY
        } else {
            r.lo_of(f64::ln, x.lo)
        };
        Interval::new(lo, r.hi_of(f64::ln, x.hi))
    }

    pub fn ln(&self, x: impl Into<Interval>) -> Interval {
        self.log(x)
    }

    pub fn log10(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() {
            return Interval::EMPTY;
        }
        self.div(self.log(x), self.log(10.0))
    }

    pub fn log2(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() {
            return Interval::EMPTY;
        }
        self.div(self.log(x), self.log(2.0))
    }

    /// `hi - lo` rounded up; zero for the empty interval.
    pub fn width(&self, x: Interval) -> f64 {
        if x.is_empty() {
            return 0.0;
        }
        self.rounding.sub_hi(x.hi, x.lo)
    }

    /// Set difference `x \ y`.
    ///
    /// Fails when `y` lies strictly inside `x`, because the result would be
    /// two disjoint intervals.
    pub fn difference(&self, x: Interval, y: Interval) -> Result<Interval> {
        if x.is_empty() || y.is_whole() {
            return Ok(Interval::EMPTY);
        }
        if !x.intervals_overlap(y) {
            return Ok(x);
        }
        if x.lo < y.lo && y.hi < x.hi {
            return Err(Error::SplitDifference);
        }
        if (y.lo <= x.lo && y.hi == f64::INFINITY) || (y.hi >= x.hi && y.lo == f64::NEG_INFINITY) {
            return Ok(Interval::EMPTY);
        }
        // next(y.hi) > x.hi yields EMPTY, e.g. [0, 1] \ [0, 1]
        if y.lo <= x.lo {
            return Ok(Interval::half_open_left(y.hi, x.hi, self.rounding));
        }
        Ok(Interval::half_open_right(x.lo, y.lo, self.rounding))
    }

    pub fn abs(&self, x: impl Into<Interval>) -> Interval {
        let x = x.into();
        if x.is_empty() {
            return Interval::EMPTY;
        }
        if x.lo >= 0.0 {
            return x;
        }
        if x.hi <= 0.0 {
            return Self::negative(x);
        }
        Interval::new(0.0, (-x.lo).max(x.hi))
    }

    pub fn max(&self, x: Interval, y: Interval) -> Interval {
        match (x.is_empty(), y.is_empty()) {
            (true, true) => Interval::EMPTY,
            (true, false) => y,
            (false, true) => x,
            (false, false) => Interval::new(x.lo.max(y.lo), x.hi.max(y.hi)),
        }
    }

    pub fn min(&self, x: Interval, y: Interval) -> Interval {
        match (x.is_empty(), y.is_empty()) {
            (true, true) => Interval::EMPTY,
            (true, false) => y,
            (false, true) => x,
            (false, false) => Interval::new(x.lo.min(y.lo), x.hi.min(y.hi)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXACT: IntervalContext = IntervalContext::exact();
    const OUT: IntervalContext = IntervalContext::outward();

    fn iv(lo: f64, hi: f64) -> Interval {
        Interval::new(lo, hi)
    }

    #[test]
    fn add_and_sub_enclose_point_results() {
        let samples = [-1e10, -3.25, -0.1, 0.0, 0.1, 0.7, 1.0 / 3.0, 12345.678];
        for &a in &samples {
            for &b in &samples {
                let s = OUT.add(a, b);
                assert!(s.lo <= a + b && a + b <= s.hi, "{a} + {b}");
                let d = OUT.sub(a, b);
                assert!(d.lo <= a - b && a - b <= d.hi, "{a} - {b}");
                let m = OUT.mul(a, b);
                assert!(m.lo <= a * b && a * b <= m.hi, "{a} * {b}");
                if b != 0.0 {
                    let q = OUT.div(a, b);
                    assert!(q.lo <= a / b && a / b <= q.hi, "{a} / {b}");
                }
            }
        }
    }

    #[test]
    fn mul_mixed_by_mixed_is_tight() {
        assert_eq!(EXACT.mul(iv(-2.0, 3.0), iv(-1.0, 4.0)), iv(-8.0, 12.0));
        let out = OUT.mul(iv(-2.0, 3.0), iv(-1.0, 4.0));
        assert!(iv(-8.0, 12.0).has_interval(out));
    }

    #[test]
    fn mul_sign_cases() {
        assert_eq!(EXACT.mul(iv(-2.0, 3.0), iv(-4.0, -1.0)), iv(-12.0, 8.0));
        assert_eq!(EXACT.mul(iv(-2.0, 3.0), iv(1.0, 4.0)), iv(-8.0, 12.0));
        assert_eq!(EXACT.mul(iv(-3.0, -2.0), iv(-1.0, 4.0)), iv(-12.0, 3.0));
        assert_eq!(EXACT.mul(iv(-3.0, -2.0), iv(-4.0, -1.0)), iv(2.0, 12.0));
        assert_eq!(EXACT.mul(iv(-3.0, -2.0), iv(1.0, 4.0)), iv(-12.0, -2.0));
        assert_eq!(EXACT.mul(iv(2.0, 3.0), iv(-1.0, 4.0)), iv(-3.0, 12.0));
        assert_eq!(EXACT.mul(iv(2.0, 3.0), iv(-4.0, -1.0)), iv(-12.0, -2.0));
        assert_eq!(EXACT.mul(iv(2.0, 3.0), iv(1.0, 4.0)), iv(2.0, 12.0));
        assert_eq!(EXACT.mul(iv(0.0, 0.0), iv(1.0, 4.0)), Interval::ZERO);
        assert!(EXACT.mul(Interval::EMPTY, iv(1.0, 4.0)).is_empty());
    }

    #[test]
    fn div_by_intervals_containing_zero() {
        assert!(EXACT.div(iv(1.0, 2.0), iv(-1.0, 1.0)).is_whole());
        assert_eq!(EXACT.div(iv(1.0, 2.0), iv(0.0, 4.0)), iv(0.25, f64::INFINITY));
        assert_eq!(EXACT.div(iv(-2.0, -1.0), iv(0.0, 4.0)), iv(f64::NEG_INFINITY, -0.25));
        assert_eq!(EXACT.div(iv(1.0, 2.0), iv(-4.0, 0.0)), iv(f64::NEG_INFINITY, -0.25));
        assert_eq!(EXACT.div(iv(-2.0, -1.0), iv(-4.0, 0.0)), iv(0.25, f64::INFINITY));
        assert!(EXACT.div(iv(1.0, 2.0), Interval::ZERO).is_empty());
        assert_eq!(EXACT.div(Interval::ZERO, iv(-1.0, 1.0)), Interval::ZERO);
        assert!(EXACT.div(iv(-1.0, 2.0), iv(0.0, 4.0)).is_whole());
    }

    #[test]
    fn div_non_zero_sign_cases() {
        assert_eq!(EXACT.div(iv(2.0, 4.0), iv(1.0, 2.0)), iv(1.0, 4.0));
        assert_eq!(EXACT.div(iv(-4.0, -2.0), iv(-2.0, -1.0)), iv(1.0, 4.0));
        assert_eq!(EXACT.div(iv(-4.0, 2.0), iv(1.0, 2.0)), iv(-4.0, 2.0));
        assert_eq!(EXACT.div(iv(-4.0, 2.0), iv(-2.0, -1.0)), iv(-2.0, 4.0));
    }

    #[test]
    fn pow_even_and_odd_parity() {
        assert_eq!(EXACT.pow(iv(-3.0, 2.0), 2.0), iv(0.0, 9.0));
        assert_eq!(EXACT.pow(iv(-3.0, 2.0), 3.0), iv(-27.0, 8.0));
        assert_eq!(EXACT.pow(iv(-3.0, -2.0), 2.0), iv(4.0, 9.0));
        assert_eq!(EXACT.pow(iv(-3.0, -2.0), 3.0), iv(-27.0, -8.0));
        assert_eq!(EXACT.pow(iv(2.0, 3.0), 3.0), iv(8.0, 27.0));
    }

    #[test]
    fn pow_huge_whole_exponent_is_even() {
        let r = EXACT.pow(iv(-2.0, -1.0), 1e20);
        assert_eq!(r, iv(1.0, f64::INFINITY));
        let r = OUT.pow(iv(-2.0, -1.0), 1e20);
        assert!(r.lo <= 1.0 && r.hi == f64::INFINITY);
        assert_eq!(EXACT.pow(iv(-0.5, 0.25), 1e20), iv(0.0, 0.0));
        assert_eq!(EXACT.pow(iv(-1.0, 1.0), 1e20), iv(0.0, 1.0));
    }

    #[test]
    fn pow_zero_and_negative_exponents() {
        assert_eq!(EXACT.pow(iv(-3.0, 2.0), 0.0), Interval::ONE);
        assert_eq!(EXACT.pow(Interval::ZERO, 0.0), Interval::ONE);
        assert_eq!(EXACT.pow(iv(2.0, 4.0), -1.0), iv(0.25, 0.5));
        assert_eq!(EXACT.pow(iv(2.0, 4.0), -2.0), iv(0.0625, 0.25));
        assert!(EXACT.pow(Interval::ZERO, -1.0).is_empty());
        assert!(EXACT.pow(Interval::EMPTY, 2.0).is_empty());
    }

    #[test]
    fn pow_non_integer_falls_back() {
        let r = OUT.pow(iv(4.0, 9.0), 0.5);
        assert!(r.lo <= 2.0 && r.hi >= 3.0);
        assert!(OUT.pow(iv(-9.0, -4.0), 0.5).is_empty());
        assert!(EXACT.pow_interval(iv(1.0, 2.0), iv(1.0, 2.0)).is_empty());
        assert_eq!(EXACT.pow_interval(iv(1.0, 2.0), Interval::singleton(2.0)), iv(1.0, 4.0));
    }

    #[test]
    fn roots() {
        assert_eq!(EXACT.sqrt(iv(4.0, 9.0)), iv(2.0, 3.0));
        assert_eq!(EXACT.sqrt(iv(-4.0, 9.0)), iv(0.0, 3.0));
        assert!(EXACT.sqrt(iv(-9.0, -4.0)).is_empty());

        let cube = OUT.nth_root(iv(-27.0, -8.0), 3.0);
        assert!(cube.lo <= -3.0 && cube.hi >= -2.0 && cube.hi < 0.0);
        let mixed = OUT.nth_root(iv(-8.0, 27.0), 3.0);
        assert!(mixed.lo <= -2.0 && mixed.hi >= 3.0);
        assert!(OUT.nth_root(iv(1.0, 2.0), -2.0).is_empty());

        let zero = OUT.nth_root(Interval::ZERO, 3.0);
        assert!(zero.zero_in());
    }

    #[test]
    fn inverse() {
        assert!(EXACT.multiplicative_inverse(iv(-1.0, 1.0)).is_whole());
        assert_eq!(EXACT.multiplicative_inverse(iv(-2.0, 0.0)), iv(f64::NEG_INFINITY, -0.5));
        assert_eq!(EXACT.multiplicative_inverse(iv(0.0, 2.0)), iv(0.5, f64::INFINITY));
        assert!(EXACT.multiplicative_inverse(Interval::ZERO).is_empty());
        assert_eq!(EXACT.multiplicative_inverse(iv(2.0, 4.0)), iv(0.25, 0.5));
    }

    #[test]
    fn fmod_reduces_into_period() {
        let m = EXACT.fmod(iv(7.0, 8.0), iv(3.0, 3.0));
        assert_eq!(m, iv(1.0, 2.0));
        let n = EXACT.fmod(iv(-7.0, -6.0), iv(3.0, 3.0));
        assert_eq!(n, iv(-1.0, 0.0));
    }

    #[test]
    fn exp_and_log() {
        let e = OUT.exp(iv(0.0, 1.0));
        assert!(e.lo <= 1.0 && e.hi >= std::f64::consts::E);
        let l = OUT.log(iv(1.0, std::f64::consts::E));
        assert!(l.lo <= 0.0 && l.hi >= 1.0);
        assert_eq!(OUT.log(iv(0.0, 1.0)).lo, f64::NEG_INFINITY);
        assert!(OUT.log(iv(-2.0, -1.0)).is_empty());
        let l10 = OUT.log10(iv(100.0, 1000.0));
        assert!(l10.lo <= 2.0 && l10.hi >= 3.0);
        let l2 = OUT.log2(iv(8.0, 8.0));
        assert!(l2.has_value(3.0));
    }

    #[test]
    fn width_and_abs() {
        assert_eq!(OUT.width(Interval::EMPTY), 0.0);
        assert!(OUT.width(iv(1.0, 3.0)) >= 2.0);
        assert_eq!(EXACT.abs(iv(-3.0, 2.0)), iv(0.0, 3.0));
        assert_eq!(EXACT.abs(iv(-3.0, -2.0)), iv(2.0, 3.0));
        assert_eq!(EXACT.abs(iv(2.0, 3.0)), iv(2.0, 3.0));
    }

    #[test]
    fn min_max_ignore_empty() {
        assert_eq!(EXACT.max(iv(0.0, 2.0), iv(1.0, 1.5)), iv(1.0, 2.0));
        assert_eq!(EXACT.min(iv(0.0, 2.0), iv(1.0, 1.5)), iv(0.0, 1.5));
        assert_eq!(EXACT.max(Interval::EMPTY, iv(1.0, 1.5)), iv(1.0, 1.5));
        assert!(EXACT.min(Interval::EMPTY, Interval::EMPTY).is_empty());
    }

    #[test]
    fn difference_cases() {
        let x = iv(0.0, 10.0);
        assert!(matches!(OUT.difference(x, iv(2.0, 3.0)), Err(Error::SplitDifference)));
        assert_eq!(OUT.difference(x, iv(20.0, 30.0)).unwrap(), x);
        assert!(OUT.difference(x, Interval::WHOLE).unwrap().is_empty());
        assert!(OUT.difference(x, iv(-1.0, f64::INFINITY)).unwrap().is_empty());
        assert!(OUT.difference(iv(0.0, 1.0), iv(0.0, 1.0)).unwrap().is_empty());

        let right = OUT.difference(x, iv(-5.0, 4.0)).unwrap();
        assert!(right.lo > 4.0 && right.hi == 10.0);
        let left = OUT.difference(x, iv(6.0, 15.0)).unwrap();
        assert!(left.lo == 0.0 && left.hi < 6.0);
    }
}
