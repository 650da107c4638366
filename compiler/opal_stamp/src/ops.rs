//! Arithmetic operation tables.
//!
//! One [`OpTable`] exists per arithmetic stamp domain; the object domain
//! has none. A table maps an operation kind to its [`UnaryDesc`] /
//! [`BinaryDesc`]: identity knowledge (involution, neutral element), the
//! concrete constant evaluator, the stamp folder, and — where the
//! operation has a meaningful inverse — the stamp inverter.
//!
//! # Contracts
//!
//! - `eval` is the oracle constant folding relies on: two's-complement
//!   wraparound at the operand width for integers (shift counts masked by
//!   `bits - 1`, as the target machines do), IEEE-754 for floats. `None`
//!   means "cannot evaluate" (zero divisor, domain mismatch), never an
//!   approximation.
//! - `fold` is a sound over-approximation and monotonic: widening the
//!   operand stamp never narrows the result stamp. The empty stamp folds
//!   to the empty stamp.
//! - `invert` is present only where inversion is meaningful; for an
//!   involution the inverter is the operation's own forward fold.
//!
//! The integer tables differ from the float table in their identities:
//! float `add`/`sub` carry no neutral element (`-0.0 + 0.0 == +0.0`
//! makes zero non-neutral), and float subtraction is not reversible under
//! negation — those differences are why lookup is per-domain.

use crate::{max_value, min_value, truncate, width_mask, ConstValue, FloatStamp, IntStamp, Stamp};

/// Unary arithmetic operation kinds.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum UnaryOp {
    /// Two's-complement / IEEE-754 negation.
    Neg,
    /// Bitwise complement (integer only).
    Not,
}

impl UnaryOp {
    pub(crate) const COUNT: usize = 2;
}

/// Binary arithmetic operation kinds.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Bitwise and (integer only).
    And,
    /// Bitwise or (integer only).
    Or,
    /// Bitwise xor (integer only).
    Xor,
    /// Shift left (integer only).
    Shl,
    /// Arithmetic (sign-replicating) shift right (integer only).
    Shr,
    /// Logical (zero-filling) shift right (integer only).
    UShr,
}

impl BinaryOp {
    pub(crate) const COUNT: usize = 10;
}

/// Behavior of one unary operation in one domain.
#[derive(Copy, Clone)]
pub struct UnaryDesc {
    /// `op(op(x)) == x` for every value — double application cancels.
    pub involution: bool,
    /// Exact concrete evaluation; `None` when the value cannot be
    /// evaluated in this domain.
    pub eval: fn(ConstValue) -> Option<ConstValue>,
    /// Sound, monotonic stamp folding.
    pub fold: fn(&Stamp) -> Stamp,
    /// Loosest-but-sufficient operand stamp for a desired result stamp;
    /// absent when the operation has no meaningful inverse.
    pub invert: Option<fn(&Stamp) -> Stamp>,
}

/// Behavior of one binary operation in one domain.
#[derive(Copy, Clone)]
pub struct BinaryDesc {
    /// `op(x, y) == op(y, x)` for every value pair.
    pub commutative: bool,
    /// Recognizer for the right-hand neutral element (`op(x, e) == x`
    /// for every `x`); absent when no such element exists in this domain.
    pub is_neutral: Option<fn(ConstValue) -> bool>,
    /// Exact concrete evaluation; `None` defers to runtime (zero
    /// divisor, domain mismatch).
    pub eval: fn(ConstValue, ConstValue) -> Option<ConstValue>,
    /// Sound, monotonic stamp folding.
    pub fold: fn(&Stamp, &Stamp) -> Stamp,
}

/// Operation table for one arithmetic stamp domain.
pub struct OpTable {
    unary: [Option<UnaryDesc>; UnaryOp::COUNT],
    binary: [Option<BinaryDesc>; BinaryOp::COUNT],
}

impl OpTable {
    /// The table for a stamp's domain, or `None` for domains without
    /// arithmetic (objects).
    ///
    /// Must be resolved fresh each time a node is canonicalized: a
    /// value's domain can change as upstream nodes are simplified, so
    /// callers must not cache the result across operand-stamp changes.
    pub fn for_stamp(stamp: &Stamp) -> Option<&'static OpTable> {
        match stamp {
            Stamp::Int(_) => Some(&INT_TABLE),
            Stamp::Float(_) => Some(&FLOAT_TABLE),
            Stamp::Object(_) => None,
        }
    }

    /// Descriptor for a unary operation, if the domain defines it.
    #[inline]
    pub fn unary(&self, op: UnaryOp) -> Option<&UnaryDesc> {
        self.unary[op as usize].as_ref()
    }

    /// Descriptor for a binary operation, if the domain defines it.
    #[inline]
    pub fn binary(&self, op: BinaryOp) -> Option<&BinaryDesc> {
        self.binary[op as usize].as_ref()
    }
}

// Integer table

static INT_TABLE: OpTable = OpTable {
    unary: [
        // Neg: an involution even at the width minimum (MIN negates to
        // itself under wraparound), so the inverter is the forward fold.
        Some(UnaryDesc {
            involution: true,
            eval: int_neg_eval,
            fold: int_neg_fold,
            invert: Some(int_neg_fold),
        }),
        // Not
        Some(UnaryDesc {
            involution: true,
            eval: int_not_eval,
            fold: int_not_fold,
            invert: Some(int_not_fold),
        }),
    ],
    binary: [
        // Add
        Some(BinaryDesc {
            commutative: true,
            is_neutral: Some(int_zero_neutral),
            eval: int_add_eval,
            fold: int_add_fold,
        }),
        // Sub
        Some(BinaryDesc {
            commutative: false,
            is_neutral: Some(int_zero_neutral),
            eval: int_sub_eval,
            fold: int_sub_fold,
        }),
        // Mul
        Some(BinaryDesc {
            commutative: true,
            is_neutral: Some(int_one_neutral),
            eval: int_mul_eval,
            fold: int_mul_fold,
        }),
        // Div
        Some(BinaryDesc {
            commutative: false,
            is_neutral: Some(int_one_neutral),
            eval: int_div_eval,
            fold: int_div_fold,
        }),
        // And
        Some(BinaryDesc {
            commutative: true,
            is_neutral: Some(int_all_ones_neutral),
            eval: int_and_eval,
            fold: int_and_fold,
        }),
        // Or
        Some(BinaryDesc {
            commutative: true,
            is_neutral: Some(int_zero_neutral),
            eval: int_or_eval,
            fold: int_or_fold,
        }),
        // Xor
        Some(BinaryDesc {
            commutative: true,
            is_neutral: Some(int_zero_neutral),
            eval: int_xor_eval,
            fold: int_xor_fold,
        }),
        // Shl
        Some(BinaryDesc {
            commutative: false,
            is_neutral: Some(int_shift_neutral),
            eval: int_shl_eval,
            fold: int_shl_fold,
        }),
        // Shr
        Some(BinaryDesc {
            commutative: false,
            is_neutral: Some(int_shift_neutral),
            eval: int_shr_eval,
            fold: int_shr_fold,
        }),
        // UShr
        Some(BinaryDesc {
            commutative: false,
            is_neutral: Some(int_shift_neutral),
            eval: int_ushr_eval,
            fold: int_ushr_fold,
        }),
    ],
};

// Float table

static FLOAT_TABLE: OpTable = OpTable {
    unary: [
        // Neg: a sign-bit flip, hence an involution even for NaN and
        // signed zeros.
        Some(UnaryDesc {
            involution: true,
            eval: float_neg_eval,
            fold: float_neg_fold,
            invert: Some(float_neg_fold),
        }),
        // No bitwise complement in the float domain.
        None,
    ],
    binary: [
        // Add: no neutral element. `x + 0.0` rewrites `-0.0` to `+0.0`,
        // but `x + (-0.0)` is exact for every x.
        Some(BinaryDesc {
            commutative: true,
            is_neutral: Some(float_neg_zero_neutral),
            eval: float_add_eval,
            fold: float_binary_fold,
        }),
        // Sub: `x - 0.0` is exact for every x (including `-0.0`).
        Some(BinaryDesc {
            commutative: false,
            is_neutral: Some(float_pos_zero_neutral),
            eval: float_sub_eval,
            fold: float_binary_fold,
        }),
        // Mul
        Some(BinaryDesc {
            commutative: true,
            is_neutral: Some(float_one_neutral),
            eval: float_mul_eval,
            fold: float_binary_fold,
        }),
        // Div
        Some(BinaryDesc {
            commutative: false,
            is_neutral: Some(float_one_neutral),
            eval: float_div_eval,
            fold: float_binary_fold,
        }),
        None, // And
        None, // Or
        None, // Xor
        None, // Shl
        None, // Shr
        None, // UShr
    ],
};

// Integer constant evaluation

fn int_operand(c: ConstValue) -> Option<(i64, u8)> {
    match c {
        ConstValue::Int { value, bits } => Some((value, bits)),
        ConstValue::Float(_) => None,
    }
}

fn int_pair(x: ConstValue, y: ConstValue) -> Option<(i64, i64, u8)> {
    let (a, ab) = int_operand(x)?;
    let (b, bb) = int_operand(y)?;
    if ab == bb {
        Some((a, b, ab))
    } else {
        None
    }
}

/// Shift count semantics: the count is masked by `bits - 1`.
fn shift_count(bits: u8, count: i64) -> u32 {
    ((count as u64) & u64::from(bits - 1)) as u32
}

fn int_neg_eval(c: ConstValue) -> Option<ConstValue> {
    let (v, bits) = int_operand(c)?;
    Some(ConstValue::int(bits, v.wrapping_neg()))
}

fn int_not_eval(c: ConstValue) -> Option<ConstValue> {
    let (v, bits) = int_operand(c)?;
    Some(ConstValue::int(bits, !v))
}

fn int_add_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let (a, b, bits) = int_pair(x, y)?;
    Some(ConstValue::int(bits, a.wrapping_add(b)))
}

fn int_sub_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let (a, b, bits) = int_pair(x, y)?;
    Some(ConstValue::int(bits, a.wrapping_sub(b)))
}

fn int_mul_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let (a, b, bits) = int_pair(x, y)?;
    Some(ConstValue::int(bits, a.wrapping_mul(b)))
}

fn int_div_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let (a, b, bits) = int_pair(x, y)?;
    if b == 0 {
        // Zero divisor: never evaluated, the trap belongs to runtime.
        None
    } else {
        // MIN / -1 wraps to MIN, like the negation it is.
        Some(ConstValue::int(bits, a.wrapping_div(b)))
    }
}

fn int_and_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let (a, b, bits) = int_pair(x, y)?;
    Some(ConstValue::int(bits, a & b))
}

fn int_or_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let (a, b, bits) = int_pair(x, y)?;
    Some(ConstValue::int(bits, a | b))
}

fn int_xor_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let (a, b, bits) = int_pair(x, y)?;
    Some(ConstValue::int(bits, a ^ b))
}

fn int_shl_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let (a, b, bits) = int_pair(x, y)?;
    Some(ConstValue::int(bits, a.wrapping_shl(shift_count(bits, b))))
}

fn int_shr_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let (a, b, bits) = int_pair(x, y)?;
    Some(ConstValue::int(bits, a >> shift_count(bits, b)))
}

fn int_ushr_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let (a, b, bits) = int_pair(x, y)?;
    let u = (a as u64) & width_mask(bits);
    Some(ConstValue::int(bits, (u >> shift_count(bits, b)) as i64))
}

// Integer neutral elements

fn int_zero_neutral(c: ConstValue) -> bool {
    matches!(c, ConstValue::Int { value: 0, .. })
}

fn int_one_neutral(c: ConstValue) -> bool {
    matches!(c, ConstValue::Int { value: 1, .. })
}

fn int_all_ones_neutral(c: ConstValue) -> bool {
    matches!(c, ConstValue::Int { value: -1, .. })
}

fn int_shift_neutral(c: ConstValue) -> bool {
    matches!(c, ConstValue::Int { value, bits } if shift_count(bits, value) == 0)
}

// Integer stamp folding

fn int_range_or_full(bits: u8, lo: Option<i64>, hi: Option<i64>) -> IntStamp {
    match (lo, hi) {
        (Some(lo), Some(hi)) if min_value(bits) <= lo && hi <= max_value(bits) => {
            IntStamp::range(bits, lo, hi)
        }
        _ => IntStamp::full(bits),
    }
}

/// Bounds for a known-bit mask pair: exact when the sign bit is
/// provably clear, otherwise the full signed range.
fn masked_result(bits: u8, down: u64, up: u64) -> IntStamp {
    let sign = 1u64 << (bits - 1);
    if up & sign == 0 {
        IntStamp::new(bits, down as i64, up as i64, down, up)
    } else {
        IntStamp::new(bits, min_value(bits), max_value(bits), down, up)
    }
}

fn neg_fold(s: &IntStamp) -> IntStamp {
    let bits = s.bits();
    if s.is_empty() {
        return *s;
    }
    if s.lo() == min_value(bits) {
        if s.hi() == s.lo() {
            // Singleton MIN: negation wraps back to MIN.
            *s
        } else {
            IntStamp::full(bits)
        }
    } else {
        IntStamp::range(bits, -s.hi(), -s.lo())
    }
}

fn not_fold(s: &IntStamp) -> IntStamp {
    if s.is_empty() {
        return *s;
    }
    // ~x == -x - 1; bijective, never overflows.
    IntStamp::range(s.bits(), !s.hi(), !s.lo())
}

fn add_fold(a: &IntStamp, b: &IntStamp) -> IntStamp {
    let bits = a.bits();
    if a.is_empty() || b.is_empty() {
        return IntStamp::empty(bits);
    }
    int_range_or_full(bits, a.lo().checked_add(b.lo()), a.hi().checked_add(b.hi()))
}

fn sub_fold(a: &IntStamp, b: &IntStamp) -> IntStamp {
    let bits = a.bits();
    if a.is_empty() || b.is_empty() {
        return IntStamp::empty(bits);
    }
    int_range_or_full(bits, a.lo().checked_sub(b.hi()), a.hi().checked_sub(b.lo()))
}

fn mul_fold(a: &IntStamp, b: &IntStamp) -> IntStamp {
    let bits = a.bits();
    if a.is_empty() || b.is_empty() {
        return IntStamp::empty(bits);
    }
    let mut min = i64::MAX;
    let mut max = i64::MIN;
    for x in [a.lo(), a.hi()] {
        for y in [b.lo(), b.hi()] {
            let Some(p) = x.checked_mul(y) else {
                return IntStamp::full(bits);
            };
            min = min.min(p);
            max = max.max(p);
        }
    }
    int_range_or_full(bits, Some(min), Some(max))
}

fn div_fold(a: &IntStamp, b: &IntStamp) -> IntStamp {
    let bits = a.bits();
    if a.is_empty() || b.is_empty() {
        return IntStamp::empty(bits);
    }
    if b.can_be_zero() {
        return IntStamp::full(bits);
    }
    match b.as_constant() {
        Some(c) if !(c == -1 && a.contains(min_value(bits))) => {
            let (q1, q2) = (a.lo() / c, a.hi() / c);
            IntStamp::range(bits, q1.min(q2), q1.max(q2))
        }
        _ => IntStamp::full(bits),
    }
}

fn and_fold(a: &IntStamp, b: &IntStamp) -> IntStamp {
    if a.is_empty() || b.is_empty() {
        return IntStamp::empty(a.bits());
    }
    masked_result(
        a.bits(),
        a.down_mask() & b.down_mask(),
        a.up_mask() & b.up_mask(),
    )
}

fn or_fold(a: &IntStamp, b: &IntStamp) -> IntStamp {
    if a.is_empty() || b.is_empty() {
        return IntStamp::empty(a.bits());
    }
    masked_result(
        a.bits(),
        a.down_mask() | b.down_mask(),
        a.up_mask() | b.up_mask(),
    )
}

fn xor_fold(a: &IntStamp, b: &IntStamp) -> IntStamp {
    if a.is_empty() || b.is_empty() {
        return IntStamp::empty(a.bits());
    }
    // Definitely set: set on one side, provably clear on the other.
    let down = (a.down_mask() & !b.up_mask()) | (b.down_mask() & !a.up_mask());
    // Possibly set: not provably equal on both sides.
    let up = (a.up_mask() | b.up_mask()) & !(a.down_mask() & b.down_mask());
    masked_result(a.bits(), down, up)
}

fn shl_fold(a: &IntStamp, b: &IntStamp) -> IntStamp {
    let bits = a.bits();
    if a.is_empty() || b.is_empty() {
        return IntStamp::empty(bits);
    }
    let Some(c) = b.as_constant() else {
        return IntStamp::full(bits);
    };
    let k = shift_count(bits, c);
    if k == 0 {
        return *a;
    }
    let lo = truncate(bits, a.lo().wrapping_shl(k));
    let hi = truncate(bits, a.hi().wrapping_shl(k));
    // Endpoints that shift back unchanged prove no interior value
    // overflows either.
    if lo >> k == a.lo() && hi >> k == a.hi() {
        IntStamp::range(bits, lo, hi)
    } else {
        IntStamp::full(bits)
    }
}

fn shr_fold(a: &IntStamp, b: &IntStamp) -> IntStamp {
    let bits = a.bits();
    if a.is_empty() || b.is_empty() {
        return IntStamp::empty(bits);
    }
    if let Some(c) = b.as_constant() {
        let k = shift_count(bits, c);
        IntStamp::range(bits, a.lo() >> k, a.hi() >> k)
    } else if a.lo() >= 0 {
        IntStamp::range(bits, 0, a.hi())
    } else if a.hi() < 0 {
        IntStamp::range(bits, a.lo(), -1)
    } else {
        IntStamp::range(bits, a.lo(), a.hi())
    }
}

fn ushr_fold(a: &IntStamp, b: &IntStamp) -> IntStamp {
    let bits = a.bits();
    if a.is_empty() || b.is_empty() {
        return IntStamp::empty(bits);
    }
    if let Some(c) = b.as_constant() {
        let k = shift_count(bits, c);
        if k == 0 {
            *a
        } else if a.lo() >= 0 {
            IntStamp::range(bits, a.lo() >> k, a.hi() >> k)
        } else {
            // A negative input fills from an all-ones top; the result is
            // a non-negative value below 2^(bits-k).
            IntStamp::range(bits, 0, (width_mask(bits) >> k) as i64)
        }
    } else if a.lo() >= 0 {
        IntStamp::range(bits, 0, a.hi())
    } else {
        IntStamp::full(bits)
    }
}

macro_rules! int_unary_stamp_fold {
    ($name:ident, $imp:ident) => {
        fn $name(s: &Stamp) -> Stamp {
            match s {
                Stamp::Int(i) => Stamp::Int($imp(i)),
                _ => s.empty_like(),
            }
        }
    };
}

macro_rules! int_binary_stamp_fold {
    ($name:ident, $imp:ident) => {
        fn $name(x: &Stamp, y: &Stamp) -> Stamp {
            match (x, y) {
                (Stamp::Int(a), Stamp::Int(b)) if a.bits() == b.bits() => Stamp::Int($imp(a, b)),
                _ => x.empty_like(),
            }
        }
    };
}

int_unary_stamp_fold!(int_neg_fold, neg_fold);
int_unary_stamp_fold!(int_not_fold, not_fold);
int_binary_stamp_fold!(int_add_fold, add_fold);
int_binary_stamp_fold!(int_sub_fold, sub_fold);
int_binary_stamp_fold!(int_mul_fold, mul_fold);
int_binary_stamp_fold!(int_div_fold, div_fold);
int_binary_stamp_fold!(int_and_fold, and_fold);
int_binary_stamp_fold!(int_or_fold, or_fold);
int_binary_stamp_fold!(int_xor_fold, xor_fold);
int_binary_stamp_fold!(int_shl_fold, shl_fold);
int_binary_stamp_fold!(int_shr_fold, shr_fold);
int_binary_stamp_fold!(int_ushr_fold, ushr_fold);

// Float constant evaluation

fn float_operand(c: ConstValue) -> Option<f64> {
    c.as_f64()
}

fn float_neg_eval(c: ConstValue) -> Option<ConstValue> {
    // IEEE negation is a sign-bit flip; exact for NaN and signed zeros.
    Some(ConstValue::float(-float_operand(c)?))
}

fn float_add_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    Some(ConstValue::float(float_operand(x)? + float_operand(y)?))
}

fn float_sub_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    Some(ConstValue::float(float_operand(x)? - float_operand(y)?))
}

fn float_mul_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    Some(ConstValue::float(float_operand(x)? * float_operand(y)?))
}

fn float_div_eval(x: ConstValue, y: ConstValue) -> Option<ConstValue> {
    let a = float_operand(x)?;
    let b = float_operand(y)?;
    if b == 0.0 {
        // Defer ±0 divisors to runtime.
        None
    } else {
        Some(ConstValue::float(a / b))
    }
}

// Float neutral elements

fn float_neg_zero_neutral(c: ConstValue) -> bool {
    matches!(c, ConstValue::Float(bits) if bits == (-0.0f64).to_bits())
}

fn float_pos_zero_neutral(c: ConstValue) -> bool {
    matches!(c, ConstValue::Float(bits) if bits == 0.0f64.to_bits())
}

fn float_one_neutral(c: ConstValue) -> bool {
    matches!(c, ConstValue::Float(bits) if bits == 1.0f64.to_bits())
}

// Float stamp folding

fn float_neg_fold(s: &Stamp) -> Stamp {
    match s {
        Stamp::Float(f) => {
            if f.is_empty() {
                Stamp::Float(*f)
            } else {
                // Bound swap; a NaN-only stamp maps to itself.
                Stamp::Float(FloatStamp::range(-f.hi(), -f.lo(), f.can_be_nan()))
            }
        }
        _ => s.empty_like(),
    }
}

/// Coarse but sound: any non-empty float inputs fold to the
/// unrestricted stamp (rounding, NaN production, and infinities make
/// tighter bounds subtle; trivially monotonic).
fn float_binary_fold(x: &Stamp, y: &Stamp) -> Stamp {
    match (x, y) {
        (Stamp::Float(a), Stamp::Float(b)) => {
            if a.is_empty() || b.is_empty() {
                Stamp::Float(FloatStamp::empty())
            } else {
                Stamp::Float(FloatStamp::full())
            }
        }
        _ => x.empty_like(),
    }
}
