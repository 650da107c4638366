//! Backward stamp inversion.
//!
//! A range-narrowing pass that learns something about a node's output
//! (a branch condition proved `neg(x) > 0`, say) can push that knowledge
//! backward through the node to narrow the input. Inversion answers the
//! question "which operand values could have produced a result in the
//! desired stamp?".
//!
//! Only unary operations with a registered inverter participate. For an
//! involution the inverter is the operation's own forward fold, so a
//! round trip through fold-then-invert stays within the starting stamp.
//! Everything else answers "cannot narrow", which is always sound.

use opal_graph::{NodeId, NodeKind, ValueGraph};
use opal_stamp::ops::OpTable;
use opal_stamp::Stamp;

/// Narrow the operand stamp of a unary `node` given a `desired` stamp
/// for its output.
///
/// Returns a stamp every producing operand value must satisfy, or `None`
/// when the node's operation cannot be inverted. The result may be
/// empty: an unsatisfiable desired output means the operand is
/// unreachable too.
#[tracing::instrument(level = "trace", skip(graph))]
pub fn invert_stamp(graph: &ValueGraph, node: NodeId, desired: &Stamp) -> Option<Stamp> {
    let NodeKind::Unary { op, value } = *graph.kind(node) else {
        return None;
    };
    // The table is keyed by the operand's current domain, resolved fresh
    // like the canonicalizer does.
    let operand = graph.stamp(value);
    let table = OpTable::for_stamp(&operand)?;
    let desc = table.unary(op)?;
    let invert = desc.invert?;
    let narrowed = invert(desired);
    tracing::trace!(?op, ?desired, ?narrowed, "inverted stamp");
    Some(narrowed)
}
