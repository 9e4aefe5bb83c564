//! # Tile Mesh Core
//!
//! Compiles tessellated map-tile geometry into vertex and index buffers
//! that fit a 16-bit index space, and tracks in-place vertex edits so only
//! the changed bytes are re-uploaded.

pub mod error;
pub mod mesh;

pub use error::{MeshError, MeshResult};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
