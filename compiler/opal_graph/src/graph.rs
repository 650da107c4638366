//! The value-node arena.
//!
//! Struct-of-arrays layout: parallel `kinds`, `stamps`, `positions`, and
//! `uses` vectors indexed by [`NodeId`]. Constants are interned so equal
//! literals share one node.

use opal_diagnostic::PositionHandle;
use opal_stamp::ops::{BinaryOp, OpTable, UnaryOp};
use opal_stamp::{ConstValue, Stamp};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{NodeId, NodeKind};

/// Convert an arena length to a `u32` index.
#[inline]
fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what} for a 32-bit index"))
}

/// Arena of value nodes with cached stamps and use back-references.
///
/// # Index spaces
///
/// All four parallel arrays are indexed by [`NodeId`]. The constant pool
/// maps literal values to their interned node.
#[derive(Clone, Debug, Default)]
pub struct ValueGraph {
    /// Node shapes (parallel with stamps, positions, uses).
    kinds: Vec<NodeKind>,
    /// Cached stamps; invariant: equal to the fold of the operand stamps.
    stamps: Vec<Stamp>,
    /// Optional source-position metadata, consumed by cold diagnostic
    /// paths only.
    positions: Vec<Option<PositionHandle>>,
    /// Use back-references: which nodes consume this one. One entry per
    /// edge, so a node used twice by the same consumer appears twice.
    uses: Vec<SmallVec<[NodeId; 4]>>,
    /// Interned constants.
    constants: FxHashMap<ConstValue, NodeId>,
}

impl ValueGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever allocated (including replaced ones).
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterate over all node IDs in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..to_u32(self.kinds.len(), "value nodes")).map(NodeId::new)
    }

    fn push(&mut self, kind: NodeKind, stamp: Stamp) -> NodeId {
        let id = NodeId::new(to_u32(self.kinds.len(), "value nodes"));
        self.kinds.push(kind);
        self.stamps.push(stamp);
        self.positions.push(None);
        self.uses.push(SmallVec::new());
        id
    }

    /// Intern a constant, returning the shared node for its value.
    pub fn add_constant(&mut self, value: ConstValue) -> NodeId {
        if let Some(&id) = self.constants.get(&value) {
            return id;
        }
        let id = self.push(NodeKind::Constant(value), value.stamp());
        self.constants.insert(value, id);
        id
    }

    /// Add an opaque input with an externally supplied stamp.
    pub fn add_param(&mut self, index: u32, stamp: Stamp) -> NodeId {
        self.push(NodeKind::Param(index), stamp)
    }

    /// Add a unary operation node; its stamp is folded from the operand.
    pub fn add_unary(&mut self, op: UnaryOp, value: NodeId) -> NodeId {
        let stamp = self.unary_stamp(op, value);
        let id = self.push(NodeKind::Unary { op, value }, stamp);
        self.uses[value.index()].push(id);
        id
    }

    /// Add a binary operation node; its stamp is folded from the operands.
    pub fn add_binary(&mut self, op: BinaryOp, x: NodeId, y: NodeId) -> NodeId {
        let stamp = self.binary_stamp(op, x, y);
        let id = self.push(NodeKind::Binary { op, x, y }, stamp);
        self.uses[x.index()].push(id);
        self.uses[y.index()].push(id);
        id
    }

    /// The node's shape.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.kinds[id.index()]
    }

    /// The node's cached stamp.
    #[inline]
    pub fn stamp(&self, id: NodeId) -> Stamp {
        self.stamps[id.index()]
    }

    /// The node's consumers (one entry per consuming edge).
    #[inline]
    pub fn uses(&self, id: NodeId) -> &[NodeId] {
        &self.uses[id.index()]
    }

    /// Returns `true` if nothing consumes the node — it can be
    /// garbage-collected by the owning pass.
    pub fn is_dead(&self, id: NodeId) -> bool {
        self.uses[id.index()].is_empty()
    }

    /// Attach source-position metadata to a node.
    pub fn set_position(&mut self, id: NodeId, handle: PositionHandle) {
        self.positions[id.index()] = Some(handle);
    }

    /// The node's source-position metadata, if any.
    pub fn position(&self, id: NodeId) -> Option<PositionHandle> {
        self.positions[id.index()]
    }

    /// The stamp a node's shape implies right now: the fold of its
    /// current operand stamps through a fresh table lookup. A domain for
    /// which the operation is undefined yields the empty stamp — the
    /// structural validator reports such nodes.
    pub fn computed_stamp(&self, id: NodeId) -> Stamp {
        match *self.kind(id) {
            NodeKind::Constant(c) => c.stamp(),
            NodeKind::Param(_) => self.stamp(id),
            NodeKind::Unary { op, value } => self.unary_stamp(op, value),
            NodeKind::Binary { op, x, y } => self.binary_stamp(op, x, y),
        }
    }

    /// Re-derive the cached stamp from the operand stamps. Returns `true`
    /// if it changed (the caller should then revisit this node's users).
    pub fn recompute_stamp(&mut self, id: NodeId) -> bool {
        let fresh = self.computed_stamp(id);
        if fresh == self.stamps[id.index()] {
            false
        } else {
            self.stamps[id.index()] = fresh;
            true
        }
    }

    /// Rewire every consumer of `old` to consume `new` instead, and
    /// refresh the consumers' cached stamps. This is the enclosing
    /// pass's hook for applying a canonicalization replacement;
    /// canonicalization itself never calls it.
    pub fn replace_uses(&mut self, old: NodeId, new: NodeId) {
        assert_ne!(old, new, "cannot replace a node with itself");
        let users = std::mem::take(&mut self.uses[old.index()]);
        for &user in &users {
            match &mut self.kinds[user.index()] {
                NodeKind::Unary { value, .. } => {
                    if *value == old {
                        *value = new;
                    }
                }
                NodeKind::Binary { x, y, .. } => {
                    // A consumer with two edges to `old` appears twice in
                    // the use list; rewrite one edge per entry.
                    if *x == old {
                        *x = new;
                    } else if *y == old {
                        *y = new;
                    }
                }
                NodeKind::Constant(_) | NodeKind::Param(_) => {}
            }
            self.uses[new.index()].push(user);
        }
        for &user in &users {
            self.recompute_stamp(user);
        }
    }

    fn unary_stamp(&self, op: UnaryOp, value: NodeId) -> Stamp {
        let operand = self.stamp(value);
        OpTable::for_stamp(&operand)
            .and_then(|t| t.unary(op))
            .map_or_else(|| operand.empty_like(), |desc| (desc.fold)(&operand))
    }

    fn binary_stamp(&self, op: BinaryOp, x: NodeId, y: NodeId) -> Stamp {
        let sx = self.stamp(x);
        let sy = self.stamp(y);
        OpTable::for_stamp(&sx)
            .and_then(|t| t.binary(op))
            .map_or_else(|| sx.empty_like(), |desc| (desc.fold)(&sx, &sy))
    }
}

#[cfg(test)]
mod tests;
