//! # Patchwork
//!
//! Half-edge triangle meshes with discrete curvature and centroidal Voronoi
//! face clustering.
//!
//! Patchwork builds a half-edge mesh from an indexed triangle list, measures
//! per-vertex curvature with cotangent weights, and partitions the faces into
//! spatially and orientation coherent patches by Lloyd relaxation.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with typed handles
//! - **Strict construction**: non-manifold edges and flipped faces are rejected
//! - **Discrete curvature**: mixed area, mean and Gaussian curvature
//! - **CVT clustering**: seeded, deterministic, parallel Lloyd iterations
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use patchwork::prelude::*;
//! use nalgebra::Point3;
//!
//! // Define vertices and faces
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! // Build the mesh
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_edges(), 6);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use patchwork::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! // Iterate over neighbors of a vertex
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//!
//! // Iterate over faces around a vertex
//! for face in mesh.vertex_faces(v) {
//!     println!("Adjacent face: {:?}", face);
//! }
//!
//! // Get vertices of a face
//! let f = FaceId::new(0);
//! let [v0, v1, v2] = mesh.face_triangle(f);
//! ```
//!
//! ## Clustering
//!
//! ```
//! use patchwork::prelude::*;
//! use nalgebra::Point3;
//!
//! # let mut vertices = Vec::new();
//! # let mut faces = Vec::new();
//! # for j in 0..=4 {
//! #     for i in 0..=4 {
//! #         vertices.push(Point3::new(i as f64, j as f64, 0.0));
//! #     }
//! # }
//! # for j in 0..4 {
//! #     for i in 0..4 {
//! #         let v00 = j * 5 + i;
//! #         faces.push([v00, v00 + 1, v00 + 6]);
//! #         faces.push([v00, v00 + 6, v00 + 5]);
//! #     }
//! # }
//! let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let options = LloydOptions::new(4).with_iterations(20).with_seed(1);
//! let summary = lloyd_cvt(&mut mesh, &options).unwrap();
//!
//! assert_eq!(summary.patches, 4);
//! let owned: usize = mesh.patches().map(|p| p.num_faces()).sum();
//! assert_eq!(owned, mesh.num_faces());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use patchwork::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::curvature::{calculate_curvatures, compute_curvature, CurvatureResult};
    pub use crate::algo::cvt::{lloyd_cvt, CvtVariant, LloydCvt, LloydOptions, LloydSummary};
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, EdgeId, Face, FaceId, HalfEdge, HalfEdgeId,
        HalfEdgeMesh, Patch, PatchId, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
