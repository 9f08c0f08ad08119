//! Error types for tree construction.

use thiserror::Error;

/// Problems found while validating an input mesh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// The index list does not describe whole triangles.
    #[error("index count {0} is not a multiple of 3")]
    IndexCount(usize),

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A vertex position contains NaN or infinity.
    #[error("vertex {vertex} has a non-finite position")]
    NonFiniteVertex { vertex: usize },

    /// A triangle has (nearly) zero area.
    #[error("triangle {triangle} is degenerate")]
    DegenerateTriangle { triangle: usize },
}

/// Errors returned by [`BspTree::create`](crate::BspTree::create).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BspError {
    /// The input mesh failed validation.
    #[error("invalid mesh: {0}")]
    InvalidMesh(#[from] MeshError),

    /// A build parameter is out of range.
    #[error("invalid build config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
}
