//! Abstract value ("stamp") lattice for the Opal optimizer.
//!
//! A [`Stamp`] describes the set of concrete values a graph edge can carry
//! at runtime. Stamps are immutable lattice values: a more precise stamp is
//! always a subset of a less precise one, and the empty stamp marks an
//! unreachable or contradictory state. Contradictions are ordinary data
//! here, never errors.
//!
//! Three domains exist:
//!
//! - [`IntStamp`] — fixed-width two's-complement integers with bounds and
//!   known-bit masks; wraparound is modeled exactly.
//! - [`FloatStamp`] — 64-bit IEEE-754 values with bounds and a NaN bit;
//!   NaN and signed zero are modeled exactly.
//! - [`ObjectStamp`] — reference properties (nullability, type exactness).
//!
//! The [`ops`] module holds the per-domain arithmetic operation table:
//! constant evaluation, stamp folding, and stamp inversion for each
//! operation kind. Object stamps have no table.

mod float;
mod int;
mod object;
pub mod ops;
mod value;

pub use float::FloatStamp;
pub use int::{max_value, min_value, truncate, width_mask, IntStamp};
pub use object::{ObjectFlags, ObjectStamp};
pub use value::ConstValue;

/// Abstract value of a graph edge: the set of concrete values it can carry.
///
/// Stamps form a lattice per domain. [`Stamp::meet`] widens (control-path
/// merge), [`Stamp::join`] narrows (constraint intersection), and the empty
/// stamp is the lattice bottom. Stamps across different domains are
/// incomparable; mixing them is a structural defect caught by the graph
/// validator, not by this crate.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Stamp {
    /// Fixed-width integer domain.
    Int(IntStamp),
    /// 64-bit floating-point domain.
    Float(FloatStamp),
    /// Object-reference domain.
    Object(ObjectStamp),
}

impl Stamp {
    /// Returns `true` if no concrete value satisfies this stamp.
    #[inline]
    pub fn is_empty(&self) -> bool {
        match self {
            Stamp::Int(s) => s.is_empty(),
            Stamp::Float(s) => s.is_empty(),
            Stamp::Object(s) => s.is_empty(),
        }
    }

    /// The empty (lattice-bottom) stamp of the same domain.
    pub fn empty_like(&self) -> Stamp {
        match self {
            Stamp::Int(s) => Stamp::Int(IntStamp::empty(s.bits())),
            Stamp::Float(_) => Stamp::Float(FloatStamp::empty()),
            Stamp::Object(_) => Stamp::Object(ObjectStamp::empty()),
        }
    }

    /// Lattice meet: the most precise stamp covering both inputs, used when
    /// two control paths merge.
    ///
    /// Returns `None` when the domains disagree — merging an integer edge
    /// with a float edge is a malformed graph, and the caller (the
    /// structural validator) decides what to do about it.
    pub fn meet(&self, other: &Stamp) -> Option<Stamp> {
        match (self, other) {
            (Stamp::Int(a), Stamp::Int(b)) if a.bits() == b.bits() => {
                Some(Stamp::Int(a.meet(b)))
            }
            (Stamp::Float(a), Stamp::Float(b)) => Some(Stamp::Float(a.meet(b))),
            (Stamp::Object(a), Stamp::Object(b)) => Some(Stamp::Object(a.meet(b))),
            _ => None,
        }
    }

    /// Lattice join: tighten this stamp by a new constraint.
    ///
    /// A contradictory constraint yields the empty stamp (in this stamp's
    /// domain) rather than an error — an empty stamp means "unreachable"
    /// and propagates as ordinary data. A cross-domain constraint is a
    /// contradiction by definition.
    pub fn join(&self, other: &Stamp) -> Stamp {
        match (self, other) {
            (Stamp::Int(a), Stamp::Int(b)) if a.bits() == b.bits() => Stamp::Int(a.join(b)),
            (Stamp::Float(a), Stamp::Float(b)) => Stamp::Float(a.join(b)),
            (Stamp::Object(a), Stamp::Object(b)) => Stamp::Object(a.join(b)),
            _ => self.empty_like(),
        }
    }

    /// Returns `true` if every value satisfying `self` also satisfies
    /// `other`. The empty stamp is a subset of everything in its domain;
    /// stamps of different domains are never subsets of each other.
    pub fn is_subset_of(&self, other: &Stamp) -> bool {
        match (self, other) {
            (Stamp::Int(a), Stamp::Int(b)) => a.is_subset_of(b),
            (Stamp::Float(a), Stamp::Float(b)) => a.is_subset_of(b),
            (Stamp::Object(a), Stamp::Object(b)) => a.is_subset_of(b),
            _ => false,
        }
    }

    /// If this stamp admits exactly one value, that value.
    pub fn as_constant(&self) -> Option<ConstValue> {
        match self {
            Stamp::Int(s) => s.as_constant().map(|v| ConstValue::int(s.bits(), v)),
            Stamp::Float(s) => s.as_constant().map(ConstValue::float),
            Stamp::Object(_) => None,
        }
    }

    /// Returns `true` if both stamps describe the same domain (and, for
    /// integers, the same bit width).
    pub fn same_domain(&self, other: &Stamp) -> bool {
        match (self, other) {
            (Stamp::Int(a), Stamp::Int(b)) => a.bits() == b.bits(),
            (Stamp::Float(_), Stamp::Float(_)) | (Stamp::Object(_), Stamp::Object(_)) => true,
            _ => false,
        }
    }

    /// Human-readable domain name, for diagnostics.
    pub fn domain_name(&self) -> &'static str {
        match self {
            Stamp::Int(_) => "integer",
            Stamp::Float(_) => "float",
            Stamp::Object(_) => "object",
        }
    }
}
