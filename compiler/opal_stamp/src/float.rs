//! Floating-point stamps (64-bit IEEE-754 domain).
//!
//! NaN and signed zero are modeled exactly: a stamp can admit NaN
//! alongside (or instead of) a numeric range, and a "constant" requires
//! bitwise bound equality — so a stamp spanning `-0.0..=+0.0` is not a
//! constant even though its bounds compare numerically equal.

use std::fmt;

/// Abstract value for a 64-bit floating-point edge.
///
/// `lo`/`hi` bound the numeric values (never NaN themselves);
/// `can_be_nan` tracks whether NaN is admitted. The NaN-only stamp has
/// inverted bounds with `can_be_nan` set; the empty stamp has inverted
/// bounds with it clear.
#[derive(Copy, Clone)]
pub struct FloatStamp {
    lo: f64,
    hi: f64,
    can_be_nan: bool,
}

impl FloatStamp {
    /// Stamp for a numeric range, optionally admitting NaN.
    ///
    /// Bounds must not be NaN; NaN-ness travels in `can_be_nan`.
    pub fn range(lo: f64, hi: f64, can_be_nan: bool) -> Self {
        debug_assert!(!lo.is_nan() && !hi.is_nan(), "NaN bound on a float stamp");
        Self { lo, hi, can_be_nan }
    }

    /// The unrestricted stamp: any float, including NaN.
    pub fn full() -> Self {
        Self::range(f64::NEG_INFINITY, f64::INFINITY, true)
    }

    /// The singleton stamp for one value. A NaN constant is represented
    /// as the NaN-only stamp.
    pub fn constant(value: f64) -> Self {
        if value.is_nan() {
            Self {
                lo: f64::INFINITY,
                hi: f64::NEG_INFINITY,
                can_be_nan: true,
            }
        } else {
            Self::range(value, value, false)
        }
    }

    /// The empty stamp: no value, lattice bottom.
    pub fn empty() -> Self {
        Self {
            lo: f64::INFINITY,
            hi: f64::NEG_INFINITY,
            can_be_nan: false,
        }
    }

    /// Inclusive numeric lower bound.
    #[inline]
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Inclusive numeric upper bound.
    #[inline]
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Whether NaN is admitted.
    #[inline]
    pub fn can_be_nan(&self) -> bool {
        self.can_be_nan
    }

    /// Returns `true` if no value (not even NaN) satisfies this stamp.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi && !self.can_be_nan
    }

    /// Returns `true` if the numeric range is empty (the stamp may still
    /// admit NaN).
    #[inline]
    fn range_is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// Returns `true` if `value` is admitted.
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            self.can_be_nan
        } else {
            self.lo <= value && value <= self.hi
        }
    }

    /// If exactly one value is admitted, that value.
    ///
    /// Requires bitwise bound equality: `-0.0` and `+0.0` are distinct
    /// values, so a stamp admitting both is not a constant. A NaN-only
    /// stamp is not a constant either — NaN has many bit patterns.
    pub fn as_constant(&self) -> Option<f64> {
        if !self.can_be_nan && !self.range_is_empty() && self.lo.to_bits() == self.hi.to_bits() {
            Some(self.lo)
        } else {
            None
        }
    }

    /// Lattice meet: covers every value of both stamps (path merge).
    pub fn meet(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let (lo, hi) = if self.range_is_empty() {
            (other.lo, other.hi)
        } else if other.range_is_empty() {
            (self.lo, self.hi)
        } else {
            (self.lo.min(other.lo), self.hi.max(other.hi))
        };
        Self {
            lo,
            hi,
            can_be_nan: self.can_be_nan || other.can_be_nan,
        }
    }

    /// Lattice join: values admitted by both stamps. A contradiction
    /// yields the empty stamp.
    pub fn join(&self, other: &Self) -> Self {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        let can_be_nan = self.can_be_nan && other.can_be_nan;
        if lo > hi {
            if can_be_nan {
                Self {
                    lo: f64::INFINITY,
                    hi: f64::NEG_INFINITY,
                    can_be_nan: true,
                }
            } else {
                Self::empty()
            }
        } else {
            Self { lo, hi, can_be_nan }
        }
    }

    /// Returns `true` if every value of `self` is admitted by `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        if self.is_empty() {
            return true;
        }
        if self.can_be_nan && !other.can_be_nan {
            return false;
        }
        self.range_is_empty() || (other.lo <= self.lo && self.hi <= other.hi)
    }
}

/// Bitwise equality: bounds compare by bit pattern so that `-0.0` and
/// `+0.0` bounds stay distinguishable.
impl PartialEq for FloatStamp {
    fn eq(&self, other: &Self) -> bool {
        self.lo.to_bits() == other.lo.to_bits()
            && self.hi.to_bits() == other.hi.to_bits()
            && self.can_be_nan == other.can_be_nan
    }
}

impl fmt::Debug for FloatStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "f64.empty")
        } else if self.range_is_empty() {
            write!(f, "f64[NaN]")
        } else {
            write!(f, "f64[{}..={}]", self.lo, self.hi)?;
            if self.can_be_nan {
                write!(f, "|NaN")?;
            }
            Ok(())
        }
    }
}
