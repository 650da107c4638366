//! Node index newtype.

use std::fmt;

/// Index of a node in a [`ValueGraph`](crate::ValueGraph).
///
/// Stable for the lifetime of the graph: rewrites append new nodes and
/// rewire edges, they never move existing nodes.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel value indicating "no node".
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Create a `NodeId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is a valid (non-sentinel) ID.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "NodeId::INVALID")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}
