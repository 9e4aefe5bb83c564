//! Mesh compilation error types.

use thiserror::Error;

/// Errors that can occur while building or compiling a mesh.
///
/// Out-of-range mutation requests are not errors: they are ignored so a
/// render loop never writes a partial frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// `compile` was called on a mesh that already holds compiled buffers.
    #[error("mesh is already compiled")]
    AlreadyCompiled,
    /// The per-feature vertex and index arrays have different lengths.
    #[error("batch count mismatch: {vertex_batches} vertex batches, {index_batches} index batches")]
    BatchCountMismatch {
        vertex_batches: usize,
        index_batches: usize,
    },
    /// The declared batch sizes do not add up to the supplied data.
    #[error("batch sizes declare {declared} {what} but {actual} were supplied")]
    BatchSizeMismatch {
        what: &'static str,
        declared: usize,
        actual: usize,
    },
    /// A local index references a vertex outside its own batch.
    #[error("index {index} in batch {batch} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        index: u16,
        vertex_count: usize,
        batch: usize,
    },
    /// The layout stride does not match the vertex type.
    #[error("layout stride {layout} does not match vertex size {vertex}")]
    StrideMismatch { layout: usize, vertex: usize },
    /// The vertex layout is malformed.
    #[error("invalid vertex layout: {0}")]
    InvalidLayout(String),
}

pub type MeshResult<T> = Result<T, MeshError>;
