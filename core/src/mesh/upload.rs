//! Upload hook for compiled vertex data.
//!
//! The mesh never talks to a GPU. Its owner passes in something that
//! implements [`VertexUpload`] and the mesh hands over the bytes that changed.

use super::data::BufferUsage;

/// Receives byte ranges of a mesh's vertex buffer.
pub trait VertexUpload {
    /// Write `bytes` into the GPU copy of the vertex buffer at `byte_offset`.
    fn upload_vertices(&mut self, byte_offset: usize, bytes: &[u8], usage: BufferUsage);
}

impl<F> VertexUpload for F
where
    F: FnMut(usize, &[u8], BufferUsage),
{
    fn upload_vertices(&mut self, byte_offset: usize, bytes: &[u8], usage: BufferUsage) {
        self(byte_offset, bytes, usage)
    }
}
