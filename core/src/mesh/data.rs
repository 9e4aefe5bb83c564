//! Mesh configuration.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How vertices are assembled into primitives
//! - [`BufferUsage`] - Upload frequency hint passed on to the uploader
//! - [`MeshConfig`] - Builder-style settings for a [`TypedMesh`](super::TypedMesh)

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive (for non-strip topologies).
    pub fn vertices_per_primitive(&self) -> Option<usize> {
        match self {
            Self::PointList => Some(1),
            Self::LineList => Some(2),
            Self::TriangleList => Some(3),
            Self::LineStrip | Self::TriangleStrip => None, // Variable
        }
    }

    /// Number of primitives drawn from `count` vertices or indices.
    pub fn primitive_count(&self, count: usize) -> usize {
        match self {
            Self::PointList => count,
            Self::LineList => count / 2,
            Self::LineStrip => count.saturating_sub(1),
            Self::TriangleList => count / 3,
            Self::TriangleStrip => count.saturating_sub(2),
        }
    }
}

/// How often the vertex buffer is expected to change after compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Uploaded once.
    #[default]
    Static,
    /// Mutated and partially re-uploaded, e.g. label fading.
    Dynamic,
}

/// Settings for a mesh.
///
/// # Example
///
/// ```
/// use tilemesh_core::mesh::{BufferUsage, MeshConfig, PrimitiveTopology};
///
/// let config = MeshConfig::new()
///     .with_topology(PrimitiveTopology::PointList)
///     .with_usage(BufferUsage::Dynamic)
///     .with_label("labels");
///
/// assert_eq!(config.label.as_deref(), Some("labels"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeshConfig {
    /// Primitive topology.
    pub topology: PrimitiveTopology,
    /// Upload frequency hint.
    pub usage: BufferUsage,
    /// Optional label for debugging.
    pub label: Option<String>,
}

impl MeshConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primitive topology.
    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Set the buffer usage hint.
    pub fn with_usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_count() {
        assert_eq!(PrimitiveTopology::TriangleList.primitive_count(12), 4);
        assert_eq!(PrimitiveTopology::TriangleStrip.primitive_count(1), 0);
        assert_eq!(PrimitiveTopology::LineStrip.primitive_count(5), 4);
        assert_eq!(PrimitiveTopology::PointList.primitive_count(7), 7);
        assert_eq!(PrimitiveTopology::LineList.vertices_per_primitive(), Some(2));
    }

    #[test]
    fn test_config_defaults() {
        let config = MeshConfig::new();
        assert_eq!(config.topology, PrimitiveTopology::TriangleList);
        assert_eq!(config.usage, BufferUsage::Static);
        assert!(config.label.is_none());
    }
}
