//! Vertex ranges and their byte spans.
//!
//! All offset math used by vertex mutation lives here as pure functions of
//! `(stride, range)`, so it can be checked without a mesh.

use std::ops::Range;

/// A run of consecutive vertices: `[start, start + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexRange {
    pub start: usize,
    pub length: usize,
}

impl VertexRange {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// One past the last vertex, or `None` on overflow.
    pub fn end(&self) -> Option<usize> {
        self.start.checked_add(self.length)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether the whole range lies within `vertex_count` vertices.
    pub fn fits(&self, vertex_count: usize) -> bool {
        self.end().is_some_and(|end| end <= vertex_count)
    }
}

impl From<Range<usize>> for VertexRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end.saturating_sub(range.start))
    }
}

/// Bytes covered by whole vertices of `stride` bytes in `range`.
pub fn vertex_byte_span(stride: usize, range: VertexRange) -> Range<usize> {
    range.start * stride..(range.start + range.length) * stride
}

/// Bytes from the first written attribute to the end of the last one.
///
/// The span includes the bytes of other attributes lying between
/// consecutive writes. An empty range yields an empty span.
pub fn attribute_byte_span(
    stride: usize,
    range: VertexRange,
    attrib_offset: usize,
    attrib_size: usize,
) -> Range<usize> {
    let start = range.start * stride + attrib_offset;
    if range.is_empty() {
        return start..start;
    }
    start..(range.start + range.length - 1) * stride + attrib_offset + attrib_size
}
