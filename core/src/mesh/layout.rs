//! Vertex layout definitions for compiled meshes.
//!
//! A [`VertexLayout`] describes one interleaved vertex record: its stride and
//! where each attribute lives inside it. The mesh compiler only needs the
//! stride; attribute offsets let callers address sub-fields by semantic when
//! writing attributes in place.
//!
//! Layouts are shared via `Arc` since a handful of styles produce most of
//! the meshes of a tile.
//!
//! # Example
//!
//! ```
//! use tilemesh_core::mesh::{VertexAttribute, VertexAttributeSemantic, VertexLayout};
//!
//! let layout = VertexLayout::new(20)
//!     .with_attribute(VertexAttribute::position(0))
//!     .with_attribute(VertexAttribute::texcoord0(12))
//!     .with_label("textured");
//!
//! assert_eq!(layout.stride(), 20);
//! assert_eq!(layout.attribute_offset(VertexAttributeSemantic::TexCoord0), Some(12));
//! assert!(layout.validate().is_ok());
//! ```

use std::sync::Arc;

use crate::error::{MeshError, MeshResult};

/// Semantic meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeSemantic {
    /// Vertex position (typically float3).
    Position,
    /// Texture coordinates (typically float2).
    TexCoord0,
    /// Vertex color (typically unorm4).
    Color,
    /// Style layer used for depth ordering (typically float).
    Layer,
    /// Label or feature state written at render time, e.g. alpha or selection.
    State,
}

/// Format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Single 32-bit float.
    Float,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 8-bit unsigned integers (normalized to 0.0-1.0).
    Unorm8x4,
}

impl VertexAttributeFormat {
    /// Get the size in bytes of this format.
    pub fn size(&self) -> usize {
        match self {
            Self::Float | Self::Unorm8x4 => 4,
            Self::Float2 => 8,
            Self::Float3 => 12,
        }
    }
}

/// A single vertex attribute description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Semantic meaning of this attribute.
    pub semantic: VertexAttributeSemantic,
    /// Data format of this attribute.
    pub format: VertexAttributeFormat,
    /// Byte offset within the vertex record.
    pub offset: usize,
}

impl VertexAttribute {
    pub fn new(
        semantic: VertexAttributeSemantic,
        format: VertexAttributeFormat,
        offset: usize,
    ) -> Self {
        Self {
            semantic,
            format,
            offset,
        }
    }

    /// Create a position attribute (float3).
    pub fn position(offset: usize) -> Self {
        Self::new(
            VertexAttributeSemantic::Position,
            VertexAttributeFormat::Float3,
            offset,
        )
    }

    /// Create a texcoord0 attribute (float2).
    pub fn texcoord0(offset: usize) -> Self {
        Self::new(
            VertexAttributeSemantic::TexCoord0,
            VertexAttributeFormat::Float2,
            offset,
        )
    }

    /// Create a color attribute (unorm8x4).
    pub fn color(offset: usize) -> Self {
        Self::new(
            VertexAttributeSemantic::Color,
            VertexAttributeFormat::Unorm8x4,
            offset,
        )
    }

    /// Create a layer attribute (float).
    pub fn layer(offset: usize) -> Self {
        Self::new(
            VertexAttributeSemantic::Layer,
            VertexAttributeFormat::Float,
            offset,
        )
    }

    /// Create a state attribute (unorm8x4).
    pub fn state(offset: usize) -> Self {
        Self::new(
            VertexAttributeSemantic::State,
            VertexAttributeFormat::Unorm8x4,
            offset,
        )
    }

    /// One past the last byte of this attribute.
    pub fn end(&self) -> usize {
        self.offset + self.format.size()
    }
}

/// Describes an interleaved vertex record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    /// Bytes per vertex.
    pub stride: usize,
    /// The vertex attributes.
    pub attributes: Vec<VertexAttribute>,
    /// Optional label for debugging.
    pub label: Option<String>,
}

impl VertexLayout {
    /// Create an empty layout with the given stride.
    pub fn new(stride: usize) -> Self {
        Self {
            stride,
            attributes: Vec::new(),
            label: None,
        }
    }

    /// Add a vertex attribute.
    pub fn with_attribute(mut self, attribute: VertexAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Check if this layout has a specific semantic.
    pub fn has_semantic(&self, semantic: VertexAttributeSemantic) -> bool {
        self.attributes.iter().any(|attr| attr.semantic == semantic)
    }

    /// Get an attribute by semantic.
    pub fn get_attribute(&self, semantic: VertexAttributeSemantic) -> Option<&VertexAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.semantic == semantic)
    }

    /// Byte offset of an attribute within the vertex record.
    pub fn attribute_offset(&self, semantic: VertexAttributeSemantic) -> Option<usize> {
        self.get_attribute(semantic).map(|attr| attr.offset)
    }

    /// Validate the layout: non-zero stride, every attribute inside it,
    /// no semantic listed twice.
    pub fn validate(&self) -> MeshResult<()> {
        if self.stride == 0 {
            return Err(MeshError::InvalidLayout("stride is zero".to_string()));
        }
        for (i, attr) in self.attributes.iter().enumerate() {
            if attr.end() > self.stride {
                return Err(MeshError::InvalidLayout(format!(
                    "attribute {:?} ends at byte {} past stride {}",
                    attr.semantic,
                    attr.end(),
                    self.stride
                )));
            }
            if self.attributes[..i]
                .iter()
                .any(|other| other.semantic == attr.semantic)
            {
                return Err(MeshError::InvalidLayout(format!(
                    "attribute {:?} is defined twice",
                    attr.semantic
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Common Layouts
// ============================================================================

impl VertexLayout {
    /// Point sprite or glyph quad: position + texcoord + color + state (28 bytes).
    pub fn sprite() -> Arc<Self> {
        Arc::new(
            Self::new(28)
                .with_attribute(VertexAttribute::position(0))
                .with_attribute(VertexAttribute::texcoord0(12))
                .with_attribute(VertexAttribute::color(20))
                .with_attribute(VertexAttribute::state(24))
                .with_label("sprite"),
        )
    }
}
