//! Fixed-width integer stamps.
//!
//! An [`IntStamp`] tracks a signed range (`lo..=hi`, sign-extended to
//! `i64`) plus known-bit masks restricted to the stamp's width:
//! `down_mask` bits are set in every admitted value, `up_mask` bits are
//! the only bits that may be set. Wraparound is exact — the stamp for the
//! minimum representable value negates to itself, never to an overflow.

use std::fmt;

/// The all-ones mask for a width (`bits` must be 8, 16, 32, or 64).
#[inline]
pub const fn width_mask(bits: u8) -> u64 {
    if bits == 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Minimum representable value at the given width, sign-extended.
#[inline]
pub const fn min_value(bits: u8) -> i64 {
    i64::MIN >> (64 - bits)
}

/// Maximum representable value at the given width.
#[inline]
pub const fn max_value(bits: u8) -> i64 {
    i64::MAX >> (64 - bits)
}

/// Truncate to the given width with sign extension — the two's-complement
/// wraparound of an i64 into `bits` bits.
#[inline]
pub const fn truncate(bits: u8, value: i64) -> i64 {
    value.wrapping_shl(64 - bits as u32) >> (64 - bits as u32)
}

/// Derive the coarsest sound known-bit masks for a bound pair.
fn masks_for_range(bits: u8, lo: i64, hi: i64) -> (u64, u64) {
    let mask = width_mask(bits);
    if lo > hi {
        return (mask, 0);
    }
    if lo == hi {
        let v = (lo as u64) & mask;
        return (v, v);
    }
    if lo >= 0 {
        // Non-negative range: no bit above the highest bit of `hi`.
        let up = if hi == 0 {
            0
        } else {
            u64::MAX >> (hi as u64).leading_zeros()
        };
        (0, up & mask)
    } else if hi < 0 {
        // Strictly negative range: the sign bit is set in every value.
        (1u64 << (bits - 1), mask)
    } else {
        (0, mask)
    }
}

/// Abstract value for a fixed-width two's-complement integer edge.
///
/// Immutable; all operations return new stamps. The empty stamp (canonical
/// form: inverted bounds, contradictory masks) means "no value" and is the
/// lattice bottom for its width.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct IntStamp {
    bits: u8,
    lo: i64,
    hi: i64,
    down_mask: u64,
    up_mask: u64,
}

impl IntStamp {
    /// Build a stamp from bounds and masks, canonicalizing contradictions
    /// to the empty stamp.
    pub fn new(bits: u8, lo: i64, hi: i64, down_mask: u64, up_mask: u64) -> Self {
        debug_assert!(matches!(bits, 8 | 16 | 32 | 64), "unsupported width {bits}");
        let mask = width_mask(bits);
        let down_mask = down_mask & mask;
        let up_mask = up_mask & mask;
        let lo = lo.max(min_value(bits));
        let hi = hi.min(max_value(bits));
        if lo > hi || down_mask & !up_mask != 0 {
            return Self::empty(bits);
        }
        // A singleton the masks reject is a contradiction in disguise.
        if lo == hi && !mask_admits(mask, down_mask, up_mask, lo) {
            return Self::empty(bits);
        }
        Self {
            bits,
            lo,
            hi,
            down_mask,
            up_mask,
        }
    }

    /// Stamp for a bound pair, masks derived from the bounds.
    pub fn range(bits: u8, lo: i64, hi: i64) -> Self {
        let (down, up) = masks_for_range(bits, lo, hi);
        Self::new(bits, lo, hi, down, up)
    }

    /// The unrestricted stamp: any value of the width.
    pub fn full(bits: u8) -> Self {
        Self::range(bits, min_value(bits), max_value(bits))
    }

    /// The singleton stamp for one value (truncated to the width).
    pub fn constant(bits: u8, value: i64) -> Self {
        let v = truncate(bits, value);
        Self::range(bits, v, v)
    }

    /// The empty stamp: no value, lattice bottom.
    pub fn empty(bits: u8) -> Self {
        Self {
            bits,
            lo: max_value(bits),
            hi: min_value(bits),
            down_mask: width_mask(bits),
            up_mask: 0,
        }
    }

    /// Bit width (8, 16, 32, or 64).
    #[inline]
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Inclusive lower bound (meaningless when empty).
    #[inline]
    pub fn lo(&self) -> i64 {
        self.lo
    }

    /// Inclusive upper bound (meaningless when empty).
    #[inline]
    pub fn hi(&self) -> i64 {
        self.hi
    }

    /// Bits set in every admitted value.
    #[inline]
    pub fn down_mask(&self) -> u64 {
        self.down_mask
    }

    /// The only bits that may be set in an admitted value.
    #[inline]
    pub fn up_mask(&self) -> u64 {
        self.up_mask
    }

    /// Returns `true` if no value satisfies this stamp.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi || self.down_mask & !self.up_mask != 0
    }

    /// Returns `true` if `value` is admitted.
    pub fn contains(&self, value: i64) -> bool {
        !self.is_empty()
            && self.lo <= value
            && value <= self.hi
            && mask_admits(width_mask(self.bits), self.down_mask, self.up_mask, value)
    }

    /// Returns `true` if zero is admitted — the divisor guard for
    /// division-like operations.
    #[inline]
    pub fn can_be_zero(&self) -> bool {
        self.contains(0)
    }

    /// If exactly one value is admitted, that value.
    pub fn as_constant(&self) -> Option<i64> {
        if !self.is_empty() && self.lo == self.hi {
            Some(self.lo)
        } else {
            None
        }
    }

    /// Lattice meet: covers every value of both stamps (path merge).
    pub fn meet(&self, other: &Self) -> Self {
        debug_assert_eq!(self.bits, other.bits);
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::new(
            self.bits,
            self.lo.min(other.lo),
            self.hi.max(other.hi),
            self.down_mask & other.down_mask,
            self.up_mask | other.up_mask,
        )
    }

    /// Lattice join: values admitted by both stamps (constraint
    /// intersection). A contradiction yields the empty stamp.
    pub fn join(&self, other: &Self) -> Self {
        debug_assert_eq!(self.bits, other.bits);
        Self::new(
            self.bits,
            self.lo.max(other.lo),
            self.hi.min(other.hi),
            self.down_mask | other.down_mask,
            self.up_mask & other.up_mask,
        )
    }

    /// Returns `true` if every value of `self` is admitted by `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        debug_assert_eq!(self.bits, other.bits);
        if self.is_empty() {
            return true;
        }
        if other.is_empty() {
            return false;
        }
        other.lo <= self.lo
            && self.hi <= other.hi
            && other.down_mask & !self.down_mask == 0
            && self.up_mask & !other.up_mask == 0
    }
}

fn mask_admits(width: u64, down: u64, up: u64, value: i64) -> bool {
    let v = (value as u64) & width;
    v & down == down && v & !up & width == 0
}

impl fmt::Debug for IntStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "i{}.empty", self.bits)
        } else {
            write!(f, "i{}[{}..={}]", self.bits, self.lo, self.hi)
        }
    }
}
