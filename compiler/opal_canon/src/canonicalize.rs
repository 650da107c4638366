//! The rewrite engine.
//!
//! Rules are tried in a fixed priority order and the first match wins.
//! Every call terminates in O(1): each rule inspects only the node's
//! immediate neighborhood. No rule re-introduces the pattern it
//! consumed, so re-invoking on replacements converges.
//!
//! `canonicalize` takes the graph mutably only to append fresh nodes
//! describing a rewritten shape (`b - a`, `x >>> k`). It never rewires
//! edges and never mutates an existing node; applying the returned
//! replacement is the caller's responsibility.

use opal_graph::{BinaryOp, NodeId, NodeKind, UnaryOp, ValueGraph};
use opal_stamp::ops::OpTable;
use opal_stamp::{ConstValue, Stamp};

/// Outcome of canonicalizing one node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Replacement {
    /// No rule applies; keep the node.
    Unchanged,
    /// Replace the node with another node (existing or freshly added).
    ReplaceWith(NodeId),
    /// Replace the node with a literal.
    ReplaceWithConstant(ConstValue),
}

/// Propose a value-equivalent simplification of `node`.
///
/// Sound for every concrete value consistent with the current operand
/// stamps; never panics on well-formed graphs. Malformed shapes are the
/// business of [`validate`](crate::validate), not of this function.
#[tracing::instrument(level = "trace", skip(graph))]
pub fn canonicalize(graph: &mut ValueGraph, node: NodeId) -> Replacement {
    match *graph.kind(node) {
        NodeKind::Unary { op, value } => canonicalize_unary(graph, op, value),
        NodeKind::Binary { op, x, y } => canonicalize_binary(graph, op, x, y),
        NodeKind::Constant(_) | NodeKind::Param(_) => Replacement::Unchanged,
    }
}

fn canonicalize_unary(graph: &mut ValueGraph, op: UnaryOp, value: NodeId) -> Replacement {
    let operand = graph.stamp(value);
    // Resolved fresh on every call: the operand's domain can change as
    // upstream nodes are simplified.
    let Some(table) = OpTable::for_stamp(&operand) else {
        return Replacement::Unchanged;
    };
    let Some(desc) = table.unary(op) else {
        return Replacement::Unchanged;
    };

    // Rule 1: constant folding.
    if let NodeKind::Constant(literal) = *graph.kind(value) {
        if let Some(folded) = (desc.eval)(literal) {
            debug_assert!(
                folded.stamp().is_subset_of(&(desc.fold)(&operand)),
                "constant fold of {op:?} escapes its stamp fold"
            );
            tracing::trace!(?op, ?folded, "unary constant fold");
            return Replacement::ReplaceWithConstant(folded);
        }
    }

    // Rule 2: involution elimination, op(op(x)) -> x. The inner node's
    // declared operation kind decides, not its stamp.
    if desc.involution {
        if let NodeKind::Unary {
            op: inner_op,
            value: inner,
        } = *graph.kind(value)
        {
            if inner_op == op {
                tracing::trace!(?op, "involution eliminated");
                return Replacement::ReplaceWith(inner);
            }
        }
    }

    if op == UnaryOp::Neg {
        if let NodeKind::Binary {
            op: BinaryOp::Sub,
            x,
            y,
        } = *graph.kind(value)
        {
            // Rule 3: -(a - b) -> b - a. The domain guard is part of the
            // rule: float subtraction is not negation-reversible under
            // NaN, signed zero, and rounding.
            if matches!(operand, Stamp::Int(_)) {
                tracing::trace!("negated subtraction reversed");
                return fold_or_add_binary(graph, BinaryOp::Sub, y, x);
            }
        }
        if let NodeKind::Binary {
            op: BinaryOp::Shr,
            x,
            y,
        } = *graph.kind(value)
        {
            // Rule 4: -(x >> (bits-1)) -> x >>> (bits-1). The arithmetic
            // shift leaves only the replicated sign bit (0 or -1), whose
            // negation is the unsigned reinterpretation. The shift count
            // must be a compile-time constant of exactly bits-1.
            if let Stamp::Int(int) = operand {
                if let NodeKind::Constant(ConstValue::Int { value: count, .. }) = *graph.kind(y) {
                    if count == i64::from(int.bits() - 1) {
                        tracing::trace!(bits = int.bits(), "sign shift made unsigned");
                        return fold_or_add_binary(graph, BinaryOp::UShr, x, y);
                    }
                }
            }
        }
    }

    Replacement::Unchanged
}

/// Describe a rewritten binary shape, simplifying it further where the
/// binary rules already can. Keeps replacements canonical in one step:
/// `-(3 - 4)` goes straight to the constant `1` instead of a transient
/// `4 - 3` node.
fn fold_or_add_binary(graph: &mut ValueGraph, op: BinaryOp, x: NodeId, y: NodeId) -> Replacement {
    match canonicalize_binary(graph, op, x, y) {
        Replacement::Unchanged => Replacement::ReplaceWith(graph.add_binary(op, x, y)),
        simplified => simplified,
    }
}

fn canonicalize_binary(graph: &mut ValueGraph, op: BinaryOp, x: NodeId, y: NodeId) -> Replacement {
    let sx = graph.stamp(x);
    let sy = graph.stamp(y);
    let Some(table) = OpTable::for_stamp(&sx) else {
        return Replacement::Unchanged;
    };
    let Some(desc) = table.binary(op) else {
        return Replacement::Unchanged;
    };

    // Rule 1: constant folding. The evaluator itself refuses a zero
    // divisor (a constant divisor is its own stamp proof), so division
    // degrades to "no simplification" rather than evaluating a trap.
    if let (NodeKind::Constant(cx), NodeKind::Constant(cy)) = (*graph.kind(x), *graph.kind(y)) {
        if let Some(folded) = (desc.eval)(cx, cy) {
            debug_assert!(
                folded.stamp().is_subset_of(&(desc.fold)(&sx, &sy)),
                "constant fold of {op:?} escapes its stamp fold"
            );
            tracing::trace!(?op, ?folded, "binary constant fold");
            return Replacement::ReplaceWithConstant(folded);
        }
    }

    // Rule 2: neutral-element elimination, x op e -> x. The descriptor
    // knows whether the domain has a neutral element at all (float
    // add/sub do not have zero, only the exactly-signed zero).
    if let Some(is_neutral) = desc.is_neutral {
        if let NodeKind::Constant(c) = *graph.kind(y) {
            if is_neutral(c) {
                tracing::trace!(?op, "right neutral eliminated");
                return Replacement::ReplaceWith(x);
            }
        }
        if desc.commutative {
            if let NodeKind::Constant(c) = *graph.kind(x) {
                if is_neutral(c) {
                    tracing::trace!(?op, "left neutral eliminated");
                    return Replacement::ReplaceWith(y);
                }
            }
        }
    }

    Replacement::Unchanged
}

#[cfg(test)]
mod tests;
