//! Draw group partitioning.
//!
//! Index values are 16-bit, so a single indexed draw can address at most
//! [`MAX_INDEX_VALUE`] vertices. The [`GroupPartitioner`] walks geometry
//! batches in order and packs them into [`DrawGroup`]s that each fit this
//! index space, rewriting every local index relative to its group.
//!
//! Vertex data is never duplicated: groups are contiguous runs of the final
//! vertex buffer, and only the index values change.
//!
//! # Example
//!
//! ```
//! use tilemesh_core::mesh::{partition, BatchSize, DrawGroup};
//!
//! let sizes = [BatchSize::new(3, 3), BatchSize::new(3, 3)];
//! let (indices, groups) = partition(&sizes, &[0, 1, 2, 0, 1, 2]).unwrap();
//!
//! assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
//! assert_eq!(groups, vec![DrawGroup::new(6, 6)]);
//! ```

use crate::error::{MeshError, MeshResult};

use super::batch::BatchSize;

/// Number of vertices addressable by a 16-bit index.
pub const MAX_INDEX_VALUE: usize = u16::MAX as usize + 1;

/// Index and vertex counts of one contiguous, 16-bit addressable region.
///
/// Groups only store counts. A renderer finds group `i`'s first index and
/// base vertex by summing the counts of groups `0..i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawGroup {
    pub index_count: usize,
    pub vertex_count: usize,
}

impl DrawGroup {
    pub fn new(index_count: usize, vertex_count: usize) -> Self {
        Self {
            index_count,
            vertex_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.index_count == 0 && self.vertex_count == 0
    }
}

/// Packs batches into draw groups and rebases their indices.
///
/// A partitioner always starts with one open, empty group, so finishing
/// without placing anything yields a single `(0, 0)` group. State carries
/// across calls: feeding several layers through one partitioner produces a
/// single group list for the whole output buffer.
#[derive(Debug, Clone)]
pub struct GroupPartitioner {
    groups: Vec<DrawGroup>,
    current: DrawGroup,
    batches: usize,
}

impl GroupPartitioner {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            current: DrawGroup::default(),
            batches: 0,
        }
    }

    /// Place a batch into the open group and return the vertex offset its
    /// indices must be shifted by.
    ///
    /// The open group is closed first if the batch would push it past
    /// [`MAX_INDEX_VALUE`]. A batch larger than the index space on its own
    /// still gets placed, in a fresh group that cannot be bounded.
    pub fn place(&mut self, size: BatchSize) -> usize {
        if self.current.vertex_count + size.vertex_count > MAX_INDEX_VALUE {
            if size.vertex_count > MAX_INDEX_VALUE {
                log::warn!(
                    "Batch {} has {} vertices, more than a 16-bit index can address",
                    self.batches,
                    size.vertex_count
                );
            }
            log::trace!(
                "Closing draw group {} at {} vertices",
                self.groups.len(),
                self.current.vertex_count
            );
            self.groups.push(std::mem::take(&mut self.current));
        }

        let base_vertex = self.current.vertex_count;
        self.current.index_count += size.index_count;
        self.current.vertex_count += size.vertex_count;
        self.batches += 1;
        base_vertex
    }

    /// Place a batch and append its rebased indices to `dst`.
    ///
    /// The batch is validated before anything is placed, so on error the
    /// partitioner and `dst` are unchanged.
    pub fn rebase(
        &mut self,
        size: BatchSize,
        indices: &[u16],
        dst: &mut Vec<u16>,
    ) -> MeshResult<()> {
        if indices.len() != size.index_count {
            return Err(MeshError::BatchSizeMismatch {
                what: "indices",
                declared: size.index_count,
                actual: indices.len(),
            });
        }

        if let Some(&index) = indices
            .iter()
            .find(|&&index| usize::from(index) >= size.vertex_count)
        {
            return Err(MeshError::IndexOutOfBounds {
                index,
                vertex_count: size.vertex_count,
                batch: self.batches,
            });
        }

        let base_vertex = self.place(size);
        // index < vertex_count and base + vertex_count <= MAX_INDEX_VALUE,
        // or base is zero for an oversized batch: the sum fits in u16.
        dst.extend(
            indices
                .iter()
                .map(|&index| (usize::from(index) + base_vertex) as u16),
        );
        Ok(())
    }

    /// Rebase a concatenated index stream described by `sizes`.
    pub fn rebase_all(
        &mut self,
        sizes: &[BatchSize],
        indices: &[u16],
        dst: &mut Vec<u16>,
    ) -> MeshResult<()> {
        let declared: usize = sizes.iter().map(|size| size.index_count).sum();
        if declared != indices.len() {
            return Err(MeshError::BatchSizeMismatch {
                what: "indices",
                declared,
                actual: indices.len(),
            });
        }

        let mut src = 0;
        for &size in sizes {
            let end = src + size.index_count;
            self.rebase(size, &indices[src..end], dst)?;
            src = end;
        }
        Ok(())
    }

    /// Number of batches placed so far.
    pub fn batch_count(&self) -> usize {
        self.batches
    }

    /// The group currently accepting batches.
    pub fn current(&self) -> DrawGroup {
        self.current
    }

    /// Close the open group, even if empty, and return all groups in order.
    pub fn finish(mut self) -> Vec<DrawGroup> {
        self.groups.push(self.current);
        self.groups
    }
}

impl Default for GroupPartitioner {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebase a concatenated index stream into draw groups.
///
/// Returns the rebased indices and the group list.
pub fn partition(sizes: &[BatchSize], indices: &[u16]) -> MeshResult<(Vec<u16>, Vec<DrawGroup>)> {
    let mut partitioner = GroupPartitioner::new();
    let mut rebased = Vec::with_capacity(indices.len());
    partitioner.rebase_all(sizes, indices, &mut rebased)?;
    Ok((rebased, partitioner.finish()))
}
