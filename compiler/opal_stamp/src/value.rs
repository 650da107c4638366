//! Constant literal values.
//!
//! Floats are stored as `f64` bit patterns so that equality and hashing
//! are exact (NaN payloads and signed zeros stay distinguishable), the
//! same representation the rest of the workspace uses for float literals.

use std::fmt;

use crate::{truncate, FloatStamp, IntStamp, Stamp};

/// A compile-time constant carried by a graph node.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConstValue {
    /// Fixed-width integer, sign-extended to `i64`.
    Int { value: i64, bits: u8 },
    /// 64-bit float, stored as its bit pattern.
    Float(u64),
}

impl ConstValue {
    /// Integer constant, truncated (two's-complement) to the width.
    pub fn int(bits: u8, value: i64) -> Self {
        Self::Int {
            value: truncate(bits, value),
            bits,
        }
    }

    /// Float constant.
    pub fn float(value: f64) -> Self {
        Self::Float(value.to_bits())
    }

    /// The integer payload, if this is an integer.
    pub fn as_int(self) -> Option<i64> {
        match self {
            Self::Int { value, .. } => Some(value),
            Self::Float(_) => None,
        }
    }

    /// The float payload, if this is a float.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Float(bits) => Some(f64::from_bits(bits)),
            Self::Int { .. } => None,
        }
    }

    /// The singleton stamp admitting exactly this value.
    pub fn stamp(self) -> Stamp {
        match self {
            Self::Int { value, bits } => Stamp::Int(IntStamp::constant(bits, value)),
            Self::Float(bits) => Stamp::Float(FloatStamp::constant(f64::from_bits(bits))),
        }
    }
}

impl fmt::Debug for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int { value, bits } => write!(f, "{value}_i{bits}"),
            Self::Float(bits) => write!(f, "{:?}_f64", f64::from_bits(*bits)),
        }
    }
}
