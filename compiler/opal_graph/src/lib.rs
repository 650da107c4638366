//! Value-node IR graph for the Opal optimizer.
//!
//! The graph is an arena of immutable-shape nodes addressed by stable
//! [`NodeId`] indices. A node's operand edges are indices into the same
//! arena (operands are shared, long-lived vertices — no ownership), and
//! every node carries a cached [`Stamp`](opal_stamp::Stamp) that always
//! equals the fold of its operand stamps through the operation table.
//!
//! Consumers are tracked as use back-references so the enclosing
//! optimization pass can rewire edges ([`ValueGraph::replace_uses`]) and
//! find dead nodes; canonicalization itself never rewires anything.

mod graph;
mod ids;
mod node;

pub use graph::ValueGraph;
pub use ids::NodeId;
pub use node::NodeKind;

pub use opal_stamp::ops::{BinaryOp, UnaryOp};
