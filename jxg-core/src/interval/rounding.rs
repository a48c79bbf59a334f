//! Rounding Primitives
//!
//! Interval bounds are rounded outward by stepping to the adjacent
//! representable double: lower bounds go one ulp down, upper bounds one ulp
//! up. The step is done on the IEEE-754 bit pattern.
//!
//! The rounding mode is an explicit value instead of a process-wide switch.
//! [`Rounding::Disabled`] turns `prev`/`next` into the identity, which gives
//! tight (but no longer guaranteed) bounds.

use serde::{Deserialize, Serialize};

/// Smallest positive subnormal double.
pub const SMALLEST_DENORM: f64 = 4.940_656_458_412_465_4e-324;

/// Returns the representable double next to `x` in the direction of `y`.
pub fn nextafter(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        return f64::NAN;
    }
    if x == y {
        return x;
    }
    if x == 0.0 {
        return if y < 0.0 {
            -SMALLEST_DENORM
        } else {
            SMALLEST_DENORM
        };
    }

    // For a non-zero finite double, incrementing the bit pattern moves away
    // from zero and decrementing moves towards it.
    let bits = x.to_bits();
    let bits = if (y > x) == (x > 0.0) {
        bits + 1
    } else {
        bits - 1
    };
    f64::from_bits(bits)
}

/// How interval bounds are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Every bound is pushed one ulp outward.
    #[default]
    Outward,
    /// Bounds are used as computed.
    Disabled,
}

impl Rounding {
    /// Nearest double strictly below `v` (identity when disabled).
    #[inline]
    pub fn prev(self, v: f64) -> f64 {
        match self {
            Self::Disabled => v,
            Self::Outward => {
                if v == f64::INFINITY {
                    v
                } else {
                    nextafter(v, f64::NEG_INFINITY)
                }
            }
        }
    }

    /// Nearest double strictly above `v` (identity when disabled).
    #[inline]
    pub fn next(self, v: f64) -> f64 {
        match self {
            Self::Disabled => v,
            Self::Outward => {
                if v == f64::NEG_INFINITY {
                    v
                } else {
                    nextafter(v, f64::INFINITY)
                }
            }
        }
    }

    #[inline]
    pub fn add_lo(self, x: f64, y: f64) -> f64 {
        self.prev(x + y)
    }
    #[inline]
    pub fn add_hi(self, x: f64, y: f64) -> f64 {
        self.next(x + y)
    }
    #[inline]
    pub fn sub_lo(self, x: f64, y: f64) -> f64 {
        self.prev(x - y)
    }
    #[inline]
    pub fn sub_hi(self, x: f64, y: f64) -> f64 {
        self.next(x - y)
    }
    #[inline]
    pub fn mul_lo(self, x: f64, y: f64) -> f64 {
        self.prev(x * y)
    }
    #[inline]
    pub fn mul_hi(self, x: f64, y: f64) -> f64 {
        self.next(x * y)
    }
    #[inline]
    pub fn div_lo(self, x: f64, y: f64) -> f64 {
        self.prev(x / y)
    }
    #[inline]
    pub fn div_hi(self, x: f64, y: f64) -> f64 {
        self.next(x / y)
    }

    /// Applies `f` and rounds the result down.
    #[inline]
    pub fn lo_of(self, f: impl FnOnce(f64) -> f64, x: f64) -> f64 {
        self.prev(f(x))
    }

    /// Applies `f` and rounds the result up.
    #[inline]
    pub fn hi_of(self, f: impl FnOnce(f64) -> f64, x: f64) -> f64 {
        self.next(f(x))
    }

    /// Lower bound of `x^n` for `x >= 0`, by repeated squaring.
    pub fn pow_lo(self, x: f64, n: u64) -> f64 {
        self.pow_int(x, n, Self::mul_lo)
    }

    /// Upper bound of `x^n` for `x >= 0`, by repeated squaring.
    pub fn pow_hi(self, x: f64, n: u64) -> f64 {
        self.pow_int(x, n, Self::mul_hi)
    }

    /// Lower bound of `x^p` for a non-integer exponent.
    pub fn powf_lo(self, x: f64, p: f64) -> f64 {
        self.prev(x.powf(p))
    }

    /// Upper bound of `x^p` for a non-integer exponent.
    pub fn powf_hi(self, x: f64, p: f64) -> f64 {
        self.next(x.powf(p))
    }

    fn pow_int(self, mut x: f64, mut n: u64, mul: fn(Self, f64, f64) -> f64) -> f64 {
        let mut y = if n & 1 == 1 { x } else { 1.0 };
        n >>= 1;
        while n > 0 {
            x = mul(self, x, x);
            if n & 1 == 1 {
                y = mul(self, x, y);
            }
            n >>= 1;
        }
        y
    }
}
