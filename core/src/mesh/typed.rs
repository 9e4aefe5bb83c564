//! Compiled vertex/index buffers with in-place mutation.
//!
//! A [`TypedMesh`] is created empty, compiled exactly once from tessellated
//! geometry, and from then on only mutated in place: the buffer sizes and
//! layout never change after compilation. Every mutation widens the mesh's
//! dirty range so the owner can re-upload just the bytes that changed.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tilemesh_core::mesh::{
//!     GeometryBatch, MeshConfig, MeshData, TypedMesh, VertexAttribute, VertexLayout, VertexRange,
//! };
//!
//! let layout = Arc::new(VertexLayout::new(4).with_attribute(VertexAttribute::color(0)));
//! let mut mesh = TypedMesh::<[u8; 4]>::new(layout, MeshConfig::new()).unwrap();
//!
//! let mut data = MeshData::new();
//! data.push_batch(GeometryBatch::new(vec![[0; 4]; 3], vec![0, 1, 2]));
//! mesh.compile(&[data]).unwrap();
//!
//! mesh.update_vertices(VertexRange::new(1, 2), [255; 4]);
//! let dirty = mesh.dirty_range().unwrap();
//! assert_eq!((dirty.offset, dirty.size), (4, 8));
//! ```

use std::mem::size_of;
use std::sync::Arc;

use bytemuck::Pod;

use crate::error::{MeshError, MeshResult};

use super::batch::{BatchSize, MeshData};
use super::data::{BufferUsage, MeshConfig, PrimitiveTopology};
use super::dirty::{DirtyRange, DirtyTracker};
use super::layout::{VertexAttributeSemantic, VertexLayout};
use super::partition::{DrawGroup, GroupPartitioner};
use super::range::{attribute_byte_span, vertex_byte_span, VertexRange};
use super::upload::VertexUpload;

/// One indexed draw over a [`DrawGroup`], with its running buffer offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawCall {
    /// Offset of the group's first index in the index buffer, in indices.
    pub first_index: usize,
    pub index_count: usize,
    /// Offset of the group's first vertex in the vertex buffer, in vertices.
    pub base_vertex: usize,
    pub vertex_count: usize,
}

/// Vertex and index buffers compiled from tessellated geometry.
///
/// Index values are 16-bit and relative to their draw group; see
/// [`draw_groups`](Self::draw_groups) and [`draw_calls`](Self::draw_calls).
pub struct TypedMesh<T> {
    layout: Arc<VertexLayout>,
    config: MeshConfig,
    vertex_data: Vec<T>,
    index_data: Vec<u16>,
    groups: Vec<DrawGroup>,
    compiled: bool,
    dirty: DirtyTracker,
}

impl<T: Pod> TypedMesh<T> {
    /// Create an uncompiled mesh.
    ///
    /// Fails if the layout is invalid or its stride is not `size_of::<T>()`.
    pub fn new(layout: Arc<VertexLayout>, config: MeshConfig) -> MeshResult<Self> {
        layout.validate()?;
        if layout.stride() != size_of::<T>() {
            return Err(MeshError::StrideMismatch {
                layout: layout.stride(),
                vertex: size_of::<T>(),
            });
        }

        Ok(Self {
            layout,
            config,
            vertex_data: Vec::new(),
            index_data: Vec::new(),
            groups: Vec::new(),
            compiled: false,
            dirty: DirtyTracker::new(),
        })
    }

    /// Compile from per-layer geometry.
    ///
    /// Vertices are concatenated in input order. Draw groups continue across
    /// layers: a layer does not start a new group unless the open one is full.
    /// On error the mesh is left untouched.
    pub fn compile(&mut self, meshes: &[MeshData<T>]) -> MeshResult<()> {
        self.ensure_uncompiled()?;

        let mut vertex_count = 0;
        let mut index_count = 0;
        for mesh in meshes {
            let declared = mesh.declared_size();
            if declared.vertex_count != mesh.vertices.len() {
                return Err(MeshError::BatchSizeMismatch {
                    what: "vertices",
                    declared: declared.vertex_count,
                    actual: mesh.vertices.len(),
                });
            }
            vertex_count += mesh.vertices.len();
            index_count += mesh.indices.len();
        }

        let mut vertex_data = Vec::with_capacity(vertex_count);
        for mesh in meshes {
            vertex_data.extend_from_slice(&mesh.vertices);
        }

        let mut index_data = Vec::with_capacity(index_count);
        let mut partitioner = GroupPartitioner::new();
        for mesh in meshes {
            partitioner.rebase_all(&mesh.offsets, &mesh.indices, &mut index_data)?;
        }
        debug_assert_eq!(index_data.len(), index_count);

        self.finish_compile(vertex_data, index_data, partitioner.finish());
        Ok(())
    }

    /// Compile from per-feature vertex and index arrays, taking ownership.
    ///
    /// `indices` must either hold one array per vertex array or be empty. When
    /// no feature has indices the mesh is unindexed: no index buffer is
    /// allocated, but draw groups still bound the vertex runs.
    pub fn compile_parallel(
        &mut self,
        vertices: Vec<Vec<T>>,
        indices: Vec<Vec<u16>>,
    ) -> MeshResult<()> {
        self.ensure_uncompiled()?;

        if !indices.is_empty() && indices.len() != vertices.len() {
            return Err(MeshError::BatchCountMismatch {
                vertex_batches: vertices.len(),
                index_batches: indices.len(),
            });
        }

        let vertex_count: usize = vertices.iter().map(Vec::len).sum();
        let index_count: usize = indices.iter().map(Vec::len).sum();

        let mut vertex_data = Vec::with_capacity(vertex_count);
        let mut index_data = Vec::new();
        if index_count > 0 {
            index_data.reserve_exact(index_count);
        }

        let mut partitioner = GroupPartitioner::new();
        for (i, feature) in vertices.into_iter().enumerate() {
            let local = indices.get(i).map_or(&[][..], Vec::as_slice);
            let size = BatchSize::new(local.len(), feature.len());
            partitioner.rebase(size, local, &mut index_data)?;
            vertex_data.extend(feature);
        }
        debug_assert_eq!(index_data.len(), index_count);

        self.finish_compile(vertex_data, index_data, partitioner.finish());
        Ok(())
    }

    fn ensure_uncompiled(&self) -> MeshResult<()> {
        if self.compiled {
            log::error!(
                "Mesh {:?} compiled twice",
                self.config.label.as_deref().unwrap_or("<unnamed>")
            );
            return Err(MeshError::AlreadyCompiled);
        }
        Ok(())
    }

    fn finish_compile(&mut self, vertex_data: Vec<T>, index_data: Vec<u16>, groups: Vec<DrawGroup>) {
        log::debug!(
            "Compiled mesh {:?}: {} vertices, {} indices, {} draw groups",
            self.config.label.as_deref().unwrap_or("<unnamed>"),
            vertex_data.len(),
            index_data.len(),
            groups.len()
        );
        self.vertex_data = vertex_data;
        self.index_data = index_data;
        self.groups = groups;
        self.compiled = true;
    }

    /// Overwrite every vertex in `range` with `value`.
    ///
    /// A range reaching past the last vertex is ignored entirely. An empty
    /// range writes nothing and leaves the dirty range unchanged.
    pub fn update_vertices(&mut self, range: VertexRange, value: T) {
        if !self.is_writable() || range.is_empty() {
            return;
        }
        if !range.fits(self.vertex_count()) {
            log::debug!(
                "Ignoring vertex update {:?} on mesh with {} vertices",
                range,
                self.vertex_count()
            );
            return;
        }

        self.vertex_data[range.start..range.start + range.length].fill(value);

        let span = vertex_byte_span(size_of::<T>(), range);
        self.dirty.mark(span.start, span.len());
    }

    /// Write `value` at byte `attrib_offset` of every vertex in `range`,
    /// leaving the other bytes of each vertex untouched.
    ///
    /// `A` must not be larger than `T`; this is checked at compile time.
    /// Empty or out-of-bounds ranges and attributes that would spill out of
    /// the vertex record are ignored.
    pub fn update_attribute<A: Pod>(&mut self, range: VertexRange, value: A, attrib_offset: usize) {
        const { assert!(size_of::<A>() <= size_of::<T>(), "attribute is larger than vertex") };

        let stride = size_of::<T>();
        let attrib_size = size_of::<A>();

        if !self.is_writable() || range.is_empty() {
            return;
        }
        if !range.fits(self.vertex_count()) {
            log::debug!(
                "Ignoring attribute update {:?} on mesh with {} vertices",
                range,
                self.vertex_count()
            );
            return;
        }
        if attrib_offset >= stride || attrib_offset + attrib_size > stride {
            log::debug!(
                "Ignoring attribute update at offset {} of size {} in {}-byte vertex",
                attrib_offset,
                attrib_size,
                stride
            );
            return;
        }

        let value_bytes = bytemuck::bytes_of(&value);
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(self.vertex_data.as_mut_slice());
        for vertex in range.start..range.start + range.length {
            let offset = vertex * stride + attrib_offset;
            bytes[offset..offset + attrib_size].copy_from_slice(value_bytes);
        }

        let span = attribute_byte_span(stride, range, attrib_offset, attrib_size);
        self.dirty.mark(span.start, span.len());
    }

    /// Write an attribute located by its semantic in the vertex layout.
    ///
    /// Ignored if the layout lacks the semantic or its format size differs
    /// from `size_of::<A>()`.
    pub fn update_attribute_for<A: Pod>(
        &mut self,
        range: VertexRange,
        value: A,
        semantic: VertexAttributeSemantic,
    ) {
        let Some(attribute) = self.layout.get_attribute(semantic) else {
            log::debug!("Ignoring update of missing attribute {:?}", semantic);
            return;
        };
        if attribute.format.size() != size_of::<A>() {
            log::debug!(
                "Ignoring update of {:?}: format is {} bytes, value is {}",
                semantic,
                attribute.format.size(),
                size_of::<A>()
            );
            return;
        }
        let offset = attribute.offset;
        self.update_attribute(range, value, offset);
    }

    fn is_writable(&self) -> bool {
        debug_assert!(self.compiled, "mesh mutated before compile");
        self.compiled
    }

    /// Compiled vertex data as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertex_data.as_slice())
    }

    /// Compiled index data as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.index_data.as_slice())
    }

    /// The dirty part of the vertex buffer, if any.
    pub fn dirty_bytes(&self) -> Option<&[u8]> {
        self.dirty
            .range()
            .map(|range| &self.vertex_bytes()[range.as_range()])
    }

    /// Hand the dirty bytes to `uploader`, then clear the dirty range.
    ///
    /// Returns the range that was uploaded.
    pub fn flush_dirty<U: VertexUpload + ?Sized>(&mut self, uploader: &mut U) -> Option<DirtyRange> {
        let range = self.dirty.take()?;
        log::trace!("Uploading dirty vertex bytes {:?}", range.as_range());
        uploader.upload_vertices(
            range.offset,
            &self.vertex_bytes()[range.as_range()],
            self.config.usage,
        );
        Some(range)
    }
}

impl<T> TypedMesh<T> {
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len()
    }

    pub fn index_count(&self) -> usize {
        self.index_data.len()
    }

    /// Check if this mesh uses indexed drawing.
    pub fn is_indexed(&self) -> bool {
        !self.index_data.is_empty()
    }

    pub fn vertices(&self) -> &[T] {
        &self.vertex_data
    }

    /// Group-relative 16-bit indices.
    pub fn indices(&self) -> &[u16] {
        &self.index_data
    }

    /// Draw groups in buffer order. Always at least one after compilation.
    pub fn draw_groups(&self) -> &[DrawGroup] {
        &self.groups
    }

    /// One draw per non-empty group, with running buffer offsets.
    pub fn draw_calls(&self) -> impl Iterator<Item = DrawCall> + '_ {
        self.groups
            .iter()
            .scan((0, 0), |(first_index, base_vertex), group| {
                let call = DrawCall {
                    first_index: *first_index,
                    index_count: group.index_count,
                    base_vertex: *base_vertex,
                    vertex_count: group.vertex_count,
                };
                *first_index += group.index_count;
                *base_vertex += group.vertex_count;
                Some(call)
            })
            .filter(|call| call.vertex_count > 0)
    }

    /// Get the number of primitives based on topology and vertex/index count.
    pub fn primitive_count(&self) -> usize {
        let count = if self.is_indexed() {
            self.index_count()
        } else {
            self.vertex_count()
        };
        self.config.topology.primitive_count(count)
    }

    pub fn dirty_range(&self) -> Option<DirtyRange> {
        self.dirty.range()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Reset dirty tracking after the owner has uploaded the dirty bytes.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    pub fn layout(&self) -> &Arc<VertexLayout> {
        &self.layout
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.config.topology
    }

    pub fn usage(&self) -> BufferUsage {
        self.config.usage
    }

    pub fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }
}

impl<T> std::fmt::Debug for TypedMesh<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedMesh")
            .field("label", &self.config.label)
            .field("topology", &self.config.topology)
            .field("compiled", &self.compiled)
            .field("vertex_count", &self.vertex_data.len())
            .field("index_count", &self.index_data.len())
            .field("draw_groups", &self.groups.len())
            .field("dirty", &self.dirty.range())
            .field("layout", &self.layout.label)
            .finish()
    }
}

// Compiled on a worker, handed over to the render thread
static_assertions::assert_impl_all!(TypedMesh<[f32; 4]>: Send, Sync);
