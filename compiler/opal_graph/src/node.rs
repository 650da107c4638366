//! Node shapes.

use opal_stamp::ops::{BinaryOp, UnaryOp};
use opal_stamp::ConstValue;
use smallvec::SmallVec;

use crate::NodeId;

/// The shape of a value node: its operation-kind discriminant and
/// operand edges. Shapes are immutable once built; a rewrite produces a
/// new node rather than mutating one in place. Operand edges are
/// rewired only through [`ValueGraph::replace_uses`](crate::ValueGraph::replace_uses).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NodeKind {
    /// A literal value.
    Constant(ConstValue),
    /// An opaque input (function parameter, phi, …) identified by an
    /// index the builder assigns; its stamp is supplied externally.
    Param(u32),
    /// A unary arithmetic operation.
    Unary { op: UnaryOp, value: NodeId },
    /// A binary arithmetic operation.
    Binary { op: BinaryOp, x: NodeId, y: NodeId },
}

impl NodeKind {
    /// The operand edges, in positional order.
    pub fn operands(&self) -> SmallVec<[NodeId; 2]> {
        match *self {
            NodeKind::Constant(_) | NodeKind::Param(_) => SmallVec::new(),
            NodeKind::Unary { value, .. } => SmallVec::from_slice(&[value]),
            NodeKind::Binary { x, y, .. } => SmallVec::from_slice(&[x, y]),
        }
    }
}
