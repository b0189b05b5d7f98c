//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation, the face clusters
//! ([`Patch`]) it carries, and construction from indexed triangle lists.
//!
//! # Handles
//!
//! Mesh elements live in arenas and are identified by typed handles:
//! - [`VertexId`] - identifies a vertex
//! - [`HalfEdgeId`] - identifies a half-edge
//! - [`EdgeId`] - identifies a full edge (two mated half-edges)
//! - [`FaceId`] - identifies a face
//! - [`PatchId`] - identifies a patch
//!
//! # Construction
//!
//! ```
//! use patchwork::mesh::{HalfEdgeMesh, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.is_valid());
//! ```

mod builder;
mod halfedge;
mod index;

pub use builder::{build_from_triangles, build_from_triangles_with_uvs, link_mesh, to_face_vertex};
pub use halfedge::{
    Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Patch, Vertex, VertexStarIter,
};
pub(crate) use halfedge::NORMALIZE_EPS;
pub use index::{EdgeId, FaceId, HalfEdgeId, PatchId, VertexId};
