//! Tile mesh compilation.
//!
//! This module turns tessellated per-feature geometry into render-ready
//! buffers addressable by 16-bit indices:
//!
//! - [`GeometryBatch`] / [`MeshData`] - Tessellated input with local indices
//! - [`GroupPartitioner`] - Packs batches into [`DrawGroup`]s and rebases indices
//! - [`TypedMesh`] - Compiled vertex/index buffers with in-place mutation
//! - [`DirtyTracker`] - Single merged byte range to re-upload after mutation
//! - [`VertexLayout`] - Stride and attribute offsets of the vertex record
//!
//! Compilation typically runs on a worker thread; the compiled mesh is then
//! moved to the render thread, which owns it from there on.

mod batch;
mod data;
mod dirty;
mod layout;
mod partition;
mod range;
mod typed;
mod upload;

pub use batch::{BatchSize, GeometryBatch, MeshData};
pub use data::{BufferUsage, MeshConfig, PrimitiveTopology};
pub use dirty::{DirtyRange, DirtyTracker};
pub use layout::{VertexAttribute, VertexAttributeFormat, VertexAttributeSemantic, VertexLayout};
pub use partition::{partition, DrawGroup, GroupPartitioner, MAX_INDEX_VALUE};
pub use range::{attribute_byte_span, vertex_byte_span, VertexRange};
pub use typed::{DrawCall, TypedMesh};
pub use upload::VertexUpload;
