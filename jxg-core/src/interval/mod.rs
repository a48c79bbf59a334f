//! Interval Arithmetic
//!
//! Closed intervals `[lo, hi]` over IEEE-754 doubles with outward rounding,
//! used for verified evaluation of user-authored functions.
//!
//! # Representation
//!
//! - A non-empty interval satisfies `lo <= hi`.
//! - [`Interval::EMPTY`] is `[+inf, -inf]`, so emptiness is just `lo > hi`.
//! - [`Interval::WHOLE`] is `[-inf, +inf]`.
//!
//! # Closure
//!
//! Every operation returns an interval. Domain errors (even roots of negative
//! numbers, division by the exact zero set) produce `EMPTY`, unbounded
//! results produce half-infinite intervals or `WHOLE`. Only [`Interval::union`]
//! and [`IntervalContext::difference`] can fail, because their result would
//! not be a single interval.
//!
//! # Rounding
//!
//! The rounding mode lives in an [`IntervalContext`] that is passed to the
//! operations, so there is no hidden global switch. The operator impls
//! (`+`, `-`, `*`, `/`, unary `-`) use the default, outward-rounding context.

mod arith;
mod rounding;
mod trig;

pub use rounding::{nextafter, Rounding, SMALLEST_DENORM};

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// Lower and upper double enclosing pi.
const PI_LOW: f64 = (3373259426.0 + 273688.0 / 2097152.0) / 1073741824.0;
const PI_HIGH: f64 = (3373259426.0 + 273689.0 / 2097152.0) / 1073741824.0;
const PI_HALF_LOW: f64 = PI_LOW * 0.5;
const PI_HALF_HIGH: f64 = PI_HIGH * 0.5;
const PI_TWICE_LOW: f64 = PI_LOW * 2.0;
const PI_TWICE_HIGH: f64 = PI_HIGH * 2.0;

/// A closed interval of doubles.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}]", self.lo, self.hi)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[]")
        } else {
            write!(f, "[{}, {}]", self.lo, self.hi)
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Interval {
    fn from(v: f64) -> Self {
        Self::singleton(v)
    }
}

impl From<(f64, f64)> for Interval {
    fn from((lo, hi): (f64, f64)) -> Self {
        Self::new(lo, hi)
    }
}

impl From<[f64; 2]> for Interval {
    fn from([lo, hi]: [f64; 2]) -> Self {
        Self::new(lo, hi)
    }
}

impl Interval {
    pub const EMPTY: Self = Self::new(f64::INFINITY, f64::NEG_INFINITY);
    pub const WHOLE: Self = Self::new(f64::NEG_INFINITY, f64::INFINITY);
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);
    pub const PI: Self = Self::new(PI_LOW, PI_HIGH);
    pub const PI_HALF: Self = Self::new(PI_HALF_LOW, PI_HALF_HIGH);
    pub const PI_TWICE: Self = Self::new(PI_TWICE_LOW, PI_TWICE_HIGH);

    /// Builds `[lo, hi]` as given, without any checks.
    #[inline]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Builds the degenerate interval `[v, v]`.
    #[inline]
    pub const fn singleton(v: f64) -> Self {
        Self { lo: v, hi: v }
    }

    /// Builds `[lo, hi]`, or `EMPTY` if a bound is NaN or `lo > hi`.
    pub fn assign(lo: f64, hi: f64) -> Self {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            Self::EMPTY
        } else {
            Self::new(lo, hi)
        }
    }

    /// Builds `[prev(lo), next(hi)]`.
    pub fn bounded(lo: f64, hi: f64, rounding: Rounding) -> Self {
        Self::new(rounding.prev(lo), rounding.next(hi))
    }

    /// Builds the closed interval closest to the open interval `(lo, hi)`.
    pub fn open(lo: f64, hi: f64, rounding: Rounding) -> Self {
        Self::assign(rounding.next(lo), rounding.prev(hi))
    }

    /// Builds the closed interval closest to `(lo, hi]`.
    pub fn half_open_left(lo: f64, hi: f64, rounding: Rounding) -> Self {
        Self::assign(rounding.next(lo), hi)
    }

    /// Builds the closed interval closest to `[lo, hi)`.
    pub fn half_open_right(lo: f64, hi: f64, rounding: Rounding) -> Self {
        Self::assign(lo, rounding.prev(hi))
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lo, self.hi]
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.lo > self.hi
    }

    #[inline]
    pub fn is_whole(self) -> bool {
        self.lo == f64::NEG_INFINITY && self.hi == f64::INFINITY
    }

    #[inline]
    pub fn is_singleton(self) -> bool {
        self.lo == self.hi
    }

    /// True if both bounds are the same infinity.
    pub fn only_infinity(self) -> bool {
        !self.lo.is_finite() && self.lo == self.hi
    }

    pub fn zero_in(self) -> bool {
        self.has_value(0.0)
    }

    pub fn has_value(self, value: f64) -> bool {
        !self.is_empty() && self.lo <= value && value <= self.hi
    }

    /// True if `self` is contained in `other`. The empty set is contained in
    /// everything.
    pub fn has_interval(self, other: Self) -> bool {
        if self.is_empty() {
            return true;
        }
        !other.is_empty() && other.lo <= self.lo && self.hi <= other.hi
    }

    pub fn intervals_overlap(self, other: Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        (self.lo <= other.lo && other.lo <= self.hi) || (other.lo <= self.lo && self.lo <= other.hi)
    }

    /// Smallest interval containing both; an empty operand is ignored.
    pub fn hull(self, other: Self) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Self::EMPTY,
            (true, false) => other,
            (false, true) => self,
            (false, false) => Self::new(self.lo.min(other.lo), self.hi.max(other.hi)),
        }
    }

    pub fn intersection(self, other: Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::EMPTY;
        }
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        if lo <= hi {
            Self::new(lo, hi)
        } else {
            Self::EMPTY
        }
    }

    /// Union of two overlapping intervals.
    ///
    /// Fails if they do not overlap, since the result would not be an interval.
    pub fn union(self, other: Self) -> Result<Self> {
        if !self.intervals_overlap(other) {
            return Err(Error::DisjointUnion(self.lo, self.hi, other.lo, other.hi));
        }
        Ok(Self::new(self.lo.min(other.lo), self.hi.max(other.hi)))
    }

    /// Set equality; all empty intervals are equal.
    pub fn equal(self, other: Self) -> bool {
        if self.is_empty() {
            return other.is_empty();
        }
        !other.is_empty() && self.lo == other.lo && self.hi == other.hi
    }

    /// True if the two intervals share no value.
    pub fn not_equal(self, other: Self) -> bool {
        if self.is_empty() {
            return !other.is_empty();
        }
        other.is_empty() || self.hi < other.lo || self.lo > other.hi
    }

    /// Every value of `self` is less than every value of `other`.
    pub fn lt(self, other: Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.hi < other.lo
    }

    /// Every value of `self` is greater than every value of `other`.
    pub fn gt(self, other: Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.lo > other.hi
    }

    pub fn leq(self, other: Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.hi <= other.lo
    }

    pub fn geq(self, other: Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.lo >= other.hi
    }
}

/// Carries the rounding mode for interval operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalContext {
    rounding: Rounding,
}

impl IntervalContext {
    pub const fn new(rounding: Rounding) -> Self {
        Self { rounding }
    }

    /// A context that rounds every bound outward.
    pub const fn outward() -> Self {
        Self::new(Rounding::Outward)
    }

    /// A context with rounding turned off.
    pub const fn exact() -> Self {
        Self::new(Rounding::Disabled)
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }
}

impl Add for Interval {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        IntervalContext::default().add(self, rhs)
    }
}

impl Sub for Interval {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        IntervalContext::default().sub(self, rhs)
    }
}

impl Mul for Interval {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        IntervalContext::default().mul(self, rhs)
    }
}

impl Div for Interval {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        IntervalContext::default().div(self, rhs)
    }
}

impl Neg for Interval {
    type Output = Self;
    fn neg(self) -> Self {
        IntervalContext::negative(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(lo: f64, hi: f64) -> Interval {
        Interval::new(lo, hi)
    }

    #[test]
    fn empty_and_whole_sentinels() {
        assert!(Interval::EMPTY.is_empty());
        assert!(!Interval::WHOLE.is_empty());
        assert!(Interval::WHOLE.is_whole());
        assert!(!iv(0.0, 1.0).is_whole());
        assert!(Interval::WHOLE.zero_in());
        assert!(!Interval::EMPTY.zero_in());
    }

    #[test]
    fn pi_constants_bracket_pi() {
        assert!(Interval::PI.lo <= std::f64::consts::PI);
        assert!(Interval::PI.hi >= std::f64::consts::PI);
        assert!(Interval::PI_HALF.has_value(std::f64::consts::FRAC_PI_2));
        assert!(Interval::PI_TWICE.has_value(std::f64::consts::TAU));
    }

    #[test]
    fn assign_rejects_nan_and_inverted_bounds() {
        assert!(Interval::assign(f64::NAN, 1.0).is_empty());
        assert!(Interval::assign(2.0, 1.0).is_empty());
        assert_eq!(Interval::assign(1.0, 2.0), iv(1.0, 2.0));
    }

    #[test]
    fn open_interval_excludes_bounds() {
        let o = Interval::open(0.0, 1.0, Rounding::Outward);
        assert!(!o.has_value(0.0));
        assert!(!o.has_value(1.0));
        assert!(o.has_value(0.5));
        assert!(Interval::open(1.0, 1.0, Rounding::Outward).is_empty());
    }

    #[test]
    fn containment() {
        let x = iv(1.0, 2.0);
        assert!(x.has_interval(x));
        assert!(iv(1.2, 1.5).has_interval(x));
        assert!(!iv(0.0, 1.5).has_interval(x));
        assert!(Interval::EMPTY.has_interval(x));
        assert!(!x.has_interval(Interval::EMPTY));
    }

    #[test]
    fn hull_and_intersection_with_empty() {
        let x = iv(-1.0, 3.0);
        assert_eq!(Interval::EMPTY.hull(x), x);
        assert_eq!(x.hull(Interval::EMPTY), x);
        assert!(x.intersection(Interval::EMPTY).is_empty());
        assert_eq!(x.hull(iv(5.0, 6.0)), iv(-1.0, 6.0));
        assert_eq!(x.intersection(iv(2.0, 6.0)), iv(2.0, 3.0));
        assert!(x.intersection(iv(4.0, 6.0)).is_empty());
    }

    #[test]
    fn union_requires_overlap() {
        assert_eq!(iv(0.0, 2.0).union(iv(1.0, 3.0)).unwrap(), iv(0.0, 3.0));
        assert!(matches!(
            iv(0.0, 1.0).union(iv(2.0, 3.0)),
            Err(Error::DisjointUnion(..))
        ));
        assert!(Interval::EMPTY.union(iv(0.0, 1.0)).is_err());
    }

    #[test]
    fn relations_are_set_theoretic() {
        let a = iv(0.0, 2.0);
        let b = iv(1.0, 3.0);
        assert!(!a.lt(b));
        assert!(!b.lt(a));
        assert!(iv(0.0, 1.0).lt(iv(2.0, 3.0)));
        assert!(iv(2.0, 3.0).gt(iv(0.0, 1.0)));
        assert!(iv(0.0, 1.0).leq(iv(1.0, 3.0)));
        assert!(iv(1.0, 3.0).geq(iv(0.0, 1.0)));
        assert!(!Interval::EMPTY.lt(a));
    }

    #[test]
    fn equality_relations() {
        assert!(Interval::EMPTY.equal(iv(3.0, 1.0)));
        assert!(iv(1.0, 2.0).equal(iv(1.0, 2.0)));
        assert!(!iv(1.0, 2.0).equal(iv(1.0, 2.5)));
        assert!(iv(0.0, 1.0).not_equal(iv(2.0, 3.0)));
        assert!(!iv(0.0, 2.0).not_equal(iv(1.0, 3.0)));
        assert!(Interval::EMPTY.not_equal(iv(0.0, 1.0)));
    }

    #[test]
    fn operators_round_outward() {
        let s = Interval::from(0.1) + Interval::from(0.2);
        assert!(s.has_value(0.3));
        assert!(s.lo < 0.1 + 0.2 && s.hi > 0.1 + 0.2);
        let n = -iv(1.0, 2.0);
        assert_eq!(n, iv(-2.0, -1.0));
    }
}
