//! Object-reference stamps.
//!
//! The object domain carries no arithmetic; its stamps track reference
//! properties only. A stamp claiming a reference is both provably null
//! and provably non-null is the empty stamp.

use bitflags::bitflags;

bitflags! {
    /// Reference properties proven for an object edge.
    ///
    /// Each set bit is a guarantee, so a more precise stamp has a
    /// superset of a less precise stamp's flags.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct ObjectFlags: u8 {
        /// The reference is provably non-null.
        const NON_NULL = 1 << 0;
        /// The reference is provably null.
        const ALWAYS_NULL = 1 << 1;
        /// The dynamic type is exactly the declared type, never a subtype.
        const EXACT_TYPE = 1 << 2;
    }
}

/// Abstract value for an object-reference edge.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ObjectStamp {
    flags: ObjectFlags,
}

impl ObjectStamp {
    /// Stamp with the given proven properties.
    pub fn new(flags: ObjectFlags) -> Self {
        Self { flags }
    }

    /// The unrestricted stamp: nothing proven.
    pub fn full() -> Self {
        Self::new(ObjectFlags::empty())
    }

    /// The empty stamp: contradictory nullability, no value.
    pub fn empty() -> Self {
        Self::new(ObjectFlags::NON_NULL | ObjectFlags::ALWAYS_NULL)
    }

    /// Proven properties.
    #[inline]
    pub fn flags(&self) -> ObjectFlags {
        self.flags
    }

    /// Returns `true` if no reference satisfies this stamp.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flags
            .contains(ObjectFlags::NON_NULL | ObjectFlags::ALWAYS_NULL)
    }

    /// Lattice meet: only properties proven on both paths survive.
    pub fn meet(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::new(self.flags & other.flags)
    }

    /// Lattice join: properties proven by either constraint accumulate;
    /// a contradiction yields the empty stamp.
    pub fn join(&self, other: &Self) -> Self {
        Self::new(self.flags | other.flags)
    }

    /// Returns `true` if every reference of `self` is admitted by `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.is_empty() || self.flags.contains(other.flags)
    }
}
