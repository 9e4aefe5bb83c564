//! Shared fixtures for the mesh integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use tilemesh_core::mesh::{
    GeometryBatch, MeshConfig, MeshData, TypedMesh, VertexAttribute, VertexLayout,
};

/// Which compile entry point a test goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilePath {
    Grouped,
    Parallel,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TileVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub color: [u8; 4],
    pub layer: f32,
}

impl TileVertex {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec3::new(x, y, 0.0),
            uv: Vec2::new(x, y),
            color: [0, 0, 0, 255],
            layer: 0.0,
        }
    }
}

pub const COLOR_OFFSET: usize = 20;
pub const STRIDE: usize = std::mem::size_of::<TileVertex>();

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn tile_layout() -> Arc<VertexLayout> {
    Arc::new(
        VertexLayout::new(28)
            .with_attribute(VertexAttribute::position(0))
            .with_attribute(VertexAttribute::texcoord0(12))
            .with_attribute(VertexAttribute::color(COLOR_OFFSET))
            .with_attribute(VertexAttribute::layer(24))
            .with_label("tile"),
    )
}

/// A triangle fan over `vertex_count` vertices with local indices.
pub fn fan(vertex_count: usize) -> GeometryBatch<TileVertex> {
    let vertices = (0..vertex_count)
        .map(|i| TileVertex::new(i as f32, 1.0))
        .collect();
    let indices = (1..vertex_count.saturating_sub(1))
        .flat_map(|i| [0, i as u16, i as u16 + 1])
        .collect();
    GeometryBatch::new(vertices, indices)
}

/// Compile `layers` of batches through the chosen entry point.
pub fn compile(
    path: CompilePath,
    layers: Vec<Vec<GeometryBatch<TileVertex>>>,
) -> TypedMesh<TileVertex> {
    let mut mesh = TypedMesh::new(tile_layout(), MeshConfig::new().with_label("test"))
        .expect("valid layout");

    match path {
        CompilePath::Grouped => {
            let data: Vec<MeshData<TileVertex>> = layers
                .into_iter()
                .map(|layer| layer.into_iter().collect())
                .collect();
            mesh.compile(&data).expect("grouped compile");
        }
        CompilePath::Parallel => {
            let (vertices, indices): (Vec<Vec<TileVertex>>, Vec<Vec<u16>>) = layers
                .into_iter()
                .flatten()
                .map(|batch| (batch.vertices, batch.indices))
                .unzip();
            mesh.compile_parallel(vertices, indices)
                .expect("parallel compile");
        }
    }
    mesh
}

/// A compiled mesh of `vertex_count` vertices, all equal to `value`.
pub fn uniform_mesh(vertex_count: usize, value: TileVertex) -> TypedMesh<TileVertex> {
    let batch = GeometryBatch::new(vec![value; vertex_count], Vec::new());
    compile(CompilePath::Parallel, vec![vec![batch]])
}
