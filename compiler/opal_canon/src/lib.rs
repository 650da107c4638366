//! Arithmetic canonicalization for the Opal value graph.
//!
//! Given one node and the current stamps of its inputs, [`canonicalize`]
//! proposes a value-equivalent replacement — a constant, an existing
//! node, or a freshly described simpler node — or reports that nothing
//! applies. The enclosing optimization pass owns all graph rewiring; it
//! applies replacements, re-visits affected neighbors, and drives the
//! rule set to a fixed point.
//!
//! # Scope
//!
//! - Constant folding through the operation table's exact evaluators
//! - Involution elimination (`-(-x)`, `~~x`)
//! - Domain-guarded algebraic rewrites (`-(a - b)` → `b - a`, integers
//!   only)
//! - The sign-shift identity (`-(x >> bits-1)` → `x >>> bits-1`)
//! - Neutral-element elimination (`x + 0`, `x * 1`, …)
//! - Backward stamp inversion for range-narrowing passes
//! - Structural validation of graph shapes
//!
//! Does NOT cover:
//!
//! - Global value numbering or any cross-node deduplication
//! - Reassociation or strength reduction beyond the rules above
//! - Graph rewiring (the caller's job, via
//!   [`ValueGraph::replace_uses`](opal_graph::ValueGraph::replace_uses))

mod canonicalize;
mod invert;
mod validate;

pub use canonicalize::{canonicalize, Replacement};
pub use invert::invert_stamp;
pub use validate::{validate, GraphError};
