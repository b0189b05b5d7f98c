//! Error types for patchwork.
//!
//! Structural problems found while building a mesh and unrecoverable
//! conditions in the clustering driver are reported through [`MeshError`].

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh construction and processing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An undirected edge is referenced by more than two triangles.
    #[error("non-manifold topology: edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldTopology {
        /// Smaller vertex index of the edge.
        v0: usize,
        /// Larger vertex index of the edge.
        v1: usize,
    },

    /// A vertex joins two or more fans of faces that share no edge around it.
    #[error("non-manifold vertex {vertex}: incident faces do not form a single fan")]
    NonManifoldVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// Two triangles traverse the same directed edge.
    #[error("inconsistent orientation: directed edge ({v0}, {v1}) is used by two faces")]
    InconsistentOrientation {
        /// Origin vertex of the directed edge.
        v0: usize,
        /// Destination vertex of the directed edge.
        v1: usize,
    },

    /// The texture coordinate list does not match the face list.
    #[error("expected texture coordinates for {expected} faces, got {got}")]
    InvalidTexCoords {
        /// Number of faces.
        expected: usize,
        /// Number of texture coordinate triples supplied.
        got: usize,
    },

    /// Seeding could not place the requested number of patches.
    #[error(
        "cannot seed {requested} patches: {available} faces have positive weight \
         ({attempts} sampling attempts)"
    )]
    InsufficientSeeds {
        /// Number of patches requested.
        requested: usize,
        /// Number of faces with positive area times density.
        available: usize,
        /// Number of random draws performed before giving up.
        attempts: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
