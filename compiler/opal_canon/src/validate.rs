//! Structural validation of value-graph invariants.
//!
//! Walks the arena and checks that every node is well formed:
//! - All operand IDs resolve to nodes in the arena
//! - Arithmetic nodes operate on a domain that has an operation table
//! - The operation is defined in that table
//! - Binary operands agree on domain (and width, for integers)
//! - Every cached stamp matches a fresh fold of the operand stamps
//!
//! The canonicalizer assumes these invariants and is free to misbehave
//! on graphs that violate them; passes that build or rewire graphs run
//! the validator in their own debug paths.

use opal_graph::{BinaryOp, NodeId, NodeKind, UnaryOp, ValueGraph};
use opal_stamp::ops::OpTable;
use thiserror::Error;

/// A structural defect in a value graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// An operand edge points outside the arena.
    #[error("node {node:?} references operand {operand:?} outside the graph")]
    DanglingOperand { node: NodeId, operand: NodeId },
    /// An arithmetic node consumes a domain with no operation table.
    #[error("node {node:?} applies arithmetic in the {domain} domain")]
    NoArithmetic {
        node: NodeId,
        domain: &'static str,
    },
    /// The operand's domain does not define this unary operation.
    #[error("node {node:?} applies undefined unary operation {op:?}")]
    UndefinedUnary { node: NodeId, op: UnaryOp },
    /// The operand's domain does not define this binary operation.
    #[error("node {node:?} applies undefined binary operation {op:?}")]
    UndefinedBinary { node: NodeId, op: BinaryOp },
    /// Binary operands disagree on domain or width.
    #[error("node {node:?} mixes operand domains")]
    DomainMismatch { node: NodeId },
    /// A cached stamp differs from the fold of the operand stamps.
    #[error("node {node:?} carries a stale cached stamp")]
    StaleStamp { node: NodeId },
}

/// Check every structural invariant of `graph`, reporting the first
/// violation found.
pub fn validate(graph: &ValueGraph) -> Result<(), GraphError> {
    for node in graph.ids() {
        let kind = *graph.kind(node);
        for operand in kind.operands() {
            check_operand(graph, node, operand)?;
        }
        match kind {
            NodeKind::Constant(_) | NodeKind::Param(_) => {}
            NodeKind::Unary { op, value } => {
                let operand = graph.stamp(value);
                let table =
                    OpTable::for_stamp(&operand).ok_or_else(|| GraphError::NoArithmetic {
                        node,
                        domain: operand.domain_name(),
                    })?;
                if table.unary(op).is_none() {
                    return Err(GraphError::UndefinedUnary { node, op });
                }
            }
            NodeKind::Binary { op, x, y } => {
                let sx = graph.stamp(x);
                let sy = graph.stamp(y);
                if !sx.same_domain(&sy) {
                    return Err(GraphError::DomainMismatch { node });
                }
                let table = OpTable::for_stamp(&sx).ok_or_else(|| GraphError::NoArithmetic {
                    node,
                    domain: sx.domain_name(),
                })?;
                if table.binary(op).is_none() {
                    return Err(GraphError::UndefinedBinary { node, op });
                }
            }
        }
        if graph.computed_stamp(node) != graph.stamp(node) {
            return Err(GraphError::StaleStamp { node });
        }
    }
    Ok(())
}

fn check_operand(graph: &ValueGraph, node: NodeId, operand: NodeId) -> Result<(), GraphError> {
    if operand.is_valid() && operand.index() < graph.len() {
        Ok(())
    } else {
        Err(GraphError::DanglingOperand { node, operand })
    }
}
