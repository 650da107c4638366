//! Source-position access for diagnostics.
//!
//! Optimized code is attributed back to originating guest-language
//! source through an accessor that lives on the far side of an isolation
//! boundary (a separate runtime/heap reachable only through an indirect
//! handle). Every query can fail — the remote side may be unreachable or
//! the handle stale — and every call has non-trivial latency.
//!
//! Two rules follow for callers:
//!
//! - Failure degrades to "no position available". It is never fatal to a
//!   compilation; [`resolve_position`] encodes that policy.
//! - Queries belong on cold diagnostic/logging paths only, never inside
//!   a canonicalization loop.

use thiserror::Error;

/// Opaque handle to position metadata held by the guest runtime.
///
/// Handles are cheap tokens; all information behind one must be fetched
/// through a [`SourcePositionAccessor`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct PositionHandle(u64);

impl PositionHandle {
    /// Wrap a raw handle value issued by the guest runtime.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Why a position query failed.
///
/// All variants are recoverable: callers degrade to "position unknown".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionFault {
    /// The remote runtime did not answer.
    #[error("position service unreachable")]
    Unreachable,
    /// The handle no longer refers to live metadata.
    #[error("stale position handle")]
    StaleHandle,
    /// The remote side answered with something unintelligible.
    #[error("position protocol fault: {0}")]
    Protocol(String),
}

/// Synchronous request/response interface to guest-source position
/// metadata. Each accessor performs one remote query and may fail
/// independently.
pub trait SourcePositionAccessor {
    /// Human-readable description of the source element.
    fn description(&self, handle: PositionHandle) -> Result<String, PositionFault>;
    /// Start offset in the source text.
    fn offset_start(&self, handle: PositionHandle) -> Result<u32, PositionFault>;
    /// End offset in the source text.
    fn offset_end(&self, handle: PositionHandle) -> Result<u32, PositionFault>;
    /// One-based line number.
    fn line_number(&self, handle: PositionHandle) -> Result<u32, PositionFault>;
    /// URI of the source, when one exists.
    fn source_uri(&self, handle: PositionHandle) -> Result<Option<String>, PositionFault>;
    /// Identifier of the guest language.
    fn language_id(&self, handle: PositionHandle) -> Result<String, PositionFault>;
    /// ID of the originating guest AST node.
    fn originating_node_id(&self, handle: PositionHandle) -> Result<u64, PositionFault>;
    /// Class name of the originating guest AST node.
    fn originating_node_class_name(
        &self,
        handle: PositionHandle,
    ) -> Result<String, PositionFault>;
}

/// A fully resolved source position.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SourcePosition {
    pub description: String,
    pub offset_start: u32,
    pub offset_end: u32,
    pub line_number: u32,
    pub source_uri: Option<String>,
    pub language_id: String,
    pub originating_node_id: u64,
    pub originating_node_class_name: String,
}

/// Resolve a handle into a full position, degrading any fault to `None`.
///
/// Cold path only: this performs eight remote queries.
pub fn resolve_position(
    accessor: &dyn SourcePositionAccessor,
    handle: PositionHandle,
) -> Option<SourcePosition> {
    match try_resolve(accessor, handle) {
        Ok(position) => Some(position),
        Err(fault) => {
            tracing::debug!(?handle, %fault, "source position unavailable");
            None
        }
    }
}

fn try_resolve(
    accessor: &dyn SourcePositionAccessor,
    handle: PositionHandle,
) -> Result<SourcePosition, PositionFault> {
    Ok(SourcePosition {
        description: accessor.description(handle)?,
        offset_start: accessor.offset_start(handle)?,
        offset_end: accessor.offset_end(handle)?,
        line_number: accessor.line_number(handle)?,
        source_uri: accessor.source_uri(handle)?,
        language_id: accessor.language_id(handle)?,
        originating_node_id: accessor.originating_node_id(handle)?,
        originating_node_class_name: accessor.originating_node_class_name(handle)?,
    })
}
