//! Tessellated geometry input.
//!
//! - [`GeometryBatch`] - One tessellated feature: vertices plus local indices
//! - [`BatchSize`] - Declared `(index_count, vertex_count)` of a batch
//! - [`MeshData`] - Batches of one layer concatenated, with their sizes recorded

/// Declared size of one geometry batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BatchSize {
    /// Number of indices in the batch.
    pub index_count: usize,
    /// Number of vertices in the batch.
    pub vertex_count: usize,
}

impl BatchSize {
    pub fn new(index_count: usize, vertex_count: usize) -> Self {
        Self {
            index_count,
            vertex_count,
        }
    }
}

/// Vertices and local indices of a single tessellated feature.
///
/// Every index refers to this batch's own `vertices`, starting at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBatch<T> {
    pub vertices: Vec<T>,
    pub indices: Vec<u16>,
}

impl<T> GeometryBatch<T> {
    pub fn new(vertices: Vec<T>, indices: Vec<u16>) -> Self {
        Self { vertices, indices }
    }

    /// Batch without indices, e.g. point geometry drawn unindexed.
    pub fn unindexed(vertices: Vec<T>) -> Self {
        Self {
            vertices,
            indices: Vec::new(),
        }
    }

    pub fn size(&self) -> BatchSize {
        BatchSize::new(self.indices.len(), self.vertices.len())
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Geometry of one style layer: all batches concatenated in insertion order.
///
/// `offsets` holds one [`BatchSize`] per batch. Indices stay local to their
/// batch; they are rebased when the mesh is compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData<T> {
    pub offsets: Vec<BatchSize>,
    pub vertices: Vec<T>,
    pub indices: Vec<u16>,
}

impl<T> MeshData<T> {
    pub fn new() -> Self {
        Self {
            offsets: Vec::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Append a batch, recording its size.
    pub fn push_batch(&mut self, batch: GeometryBatch<T>) {
        self.offsets.push(batch.size());
        self.vertices.extend(batch.vertices);
        self.indices.extend(batch.indices);
    }

    /// Append a batch given as slices.
    pub fn push(&mut self, vertices: &[T], indices: &[u16])
    where
        T: Clone,
    {
        self.offsets
            .push(BatchSize::new(indices.len(), vertices.len()));
        self.vertices.extend_from_slice(vertices);
        self.indices.extend_from_slice(indices);
    }

    pub fn clear(&mut self) {
        self.offsets.clear();
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn batch_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Sum of the declared batch sizes.
    pub fn declared_size(&self) -> BatchSize {
        self.offsets
            .iter()
            .fold(BatchSize::default(), |acc, size| {
                BatchSize::new(
                    acc.index_count + size.index_count,
                    acc.vertex_count + size.vertex_count,
                )
            })
    }
}

impl<T> Default for MeshData<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<GeometryBatch<T>> for MeshData<T> {
    fn from_iter<I: IntoIterator<Item = GeometryBatch<T>>>(iter: I) -> Self {
        let mut data = Self::new();
        for batch in iter {
            data.push_batch(batch);
        }
        data
    }
}
