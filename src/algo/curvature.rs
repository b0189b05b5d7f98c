//! Discrete curvature computation on meshes.
//!
//! Per-vertex mixed Voronoi area, mean curvature and Gaussian curvature
//! computed by walking each vertex star with cotangent weights.
//!
//! # Curvature Types
//!
//! - **Mixed area A**: `Σ (1/8)(cot α + cot β)|e|²` over the edges of the star
//! - **Mean curvature H**: half the norm of the mean curvature normal
//!   `K = (1/A) Σ -(1/2)(cot α + cot β) e`
//! - **Gaussian curvature**: angle defect `(2π - Σθ) / A`
//!
//! Boundary vertices have no one-sided estimator and report zero for all three.
//! Around obtuse corners the mixed area can go negative; it is reported with
//! its sign and only a vanishing area zeroes the curvatures.
//!
//! # Example
//!
//! ```
//! use patchwork::prelude::*;
//! use patchwork::algo::curvature::compute_curvature;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(1.0, 0.0, 0.0), Point3::new(-1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, -1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 0.0, -1.0),
//! ];
//! let faces = vec![
//!     [0, 2, 4], [2, 1, 4], [1, 3, 4], [3, 0, 4],
//!     [2, 0, 5], [1, 2, 5], [3, 1, 5], [0, 3, 5],
//! ];
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let result = compute_curvature(&mesh);
//! assert!((result.mean(VertexId::new(4)) - 1.0).abs() < 1e-9);
//! ```
//!
//! # References
//!
//! - Meyer, M., et al. (2003). "Discrete Differential-Geometry Operators for
//!   Triangulated 2-Manifolds." Visualization and Mathematics III.

use std::f64::consts::PI;

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh, VertexId};

/// Sines below this make a corner count as degenerate (zero cotangent weight).
const DEGENERATE_SIN: f64 = 1e-12;

/// Mixed areas below this are treated as zero.
const MIN_AREA: f64 = 1e-12;

/// Result of curvature computation.
///
/// Contains per-vertex values for all vertices in the mesh.
#[derive(Debug, Clone)]
pub struct CurvatureResult {
    mean: Vec<f64>,
    gaussian: Vec<f64>,
    mixed_area: Vec<f64>,
}

impl CurvatureResult {
    /// Get mean curvature at a vertex.
    #[inline]
    pub fn mean(&self, v: VertexId) -> f64 {
        self.mean[v.index()]
    }

    /// Get Gaussian curvature at a vertex.
    #[inline]
    pub fn gaussian(&self, v: VertexId) -> f64 {
        self.gaussian[v.index()]
    }

    /// Get mixed Voronoi area at a vertex.
    #[inline]
    pub fn mixed_area(&self, v: VertexId) -> f64 {
        self.mixed_area[v.index()]
    }

    /// Get all mean curvatures as a slice.
    #[inline]
    pub fn mean_values(&self) -> &[f64] {
        &self.mean
    }

    /// Get all Gaussian curvatures as a slice.
    #[inline]
    pub fn gaussian_values(&self) -> &[f64] {
        &self.gaussian
    }

    /// Get all mixed areas as a slice.
    #[inline]
    pub fn mixed_area_values(&self) -> &[f64] {
        &self.mixed_area
    }

    /// Get the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

/// Angle between two vectors, with the cosine clamped against rounding.
///
/// `None` if either vector has zero length.
fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    let denom = a.norm() * b.norm();
    if denom <= 0.0 || !denom.is_finite() {
        return None;
    }
    Some((a.dot(b) / denom).clamp(-1.0, 1.0).acos())
}

/// Angle at the corner opposite `he` inside its face.
///
/// For `he = u -> v` in face (u, v, w) this is the angle at `w` between the
/// edges `w -> v` and `w -> u`. `None` for boundary half-edges and collapsed
/// edges.
pub fn opposite_angle(mesh: &HalfEdgeMesh, he: HalfEdgeId) -> Option<f64> {
    if mesh.is_boundary_halfedge(he) {
        return None;
    }
    let n = mesh.next(he);
    let to_v = mesh.edge_vector(n.mate());
    let to_u = mesh.edge_vector(mesh.next(n));
    angle_between(&to_v, &to_u)
}

/// Cotangent of an angle; degenerate angles near 0 or π weigh nothing.
fn cot(angle: f64) -> f64 {
    let s = angle.sin();
    if s.abs() < DEGENERATE_SIN {
        0.0
    } else {
        angle.cos() / s
    }
}

/// `cot α + cot β` for the two corners facing the edge of `he`.
fn cot_weight(mesh: &HalfEdgeMesh, he: HalfEdgeId) -> f64 {
    let a = opposite_angle(mesh, he).map_or(0.0, cot);
    let b = opposite_angle(mesh, he.mate()).map_or(0.0, cot);
    a + b
}

/// Compute the mixed Voronoi area of a vertex (0 on the boundary).
pub fn mixed_area(mesh: &HalfEdgeMesh, v: VertexId) -> f64 {
    if mesh.is_boundary_vertex(v) {
        return 0.0;
    }

    mesh.vertex_star(v)
        .map(|he| 0.125 * cot_weight(mesh, he) * mesh.edge_vector(he).norm_squared())
        .sum()
}

/// Unnormalized mean curvature normal: `Σ -(1/2)(cot α + cot β) e`.
fn curvature_vector_sum(mesh: &HalfEdgeMesh, v: VertexId) -> Vector3<f64> {
    mesh.vertex_star(v).fold(Vector3::zeros(), |acc, he| {
        acc - 0.5 * cot_weight(mesh, he) * mesh.edge_vector(he)
    })
}

/// Compute the mean curvature normal of a vertex.
///
/// Zero on the boundary and where the mixed area vanishes. Obtuse corners
/// can make the mixed area negative; the sign is kept.
pub fn mean_curvature_normal(mesh: &HalfEdgeMesh, v: VertexId) -> Vector3<f64> {
    let area = mixed_area(mesh, v);
    if area.abs() < MIN_AREA {
        return Vector3::zeros();
    }
    curvature_vector_sum(mesh, v) / area
}

/// Compute the (unsigned) mean curvature of a vertex.
pub fn mean_curvature(mesh: &HalfEdgeMesh, v: VertexId) -> f64 {
    0.5 * mean_curvature_normal(mesh, v).norm()
}

/// Sum of the face angles at a vertex.
fn angle_sum(mesh: &HalfEdgeMesh, v: VertexId) -> f64 {
    mesh.vertex_star(v)
        .filter(|&he| !mesh.is_boundary_halfedge(he))
        .filter_map(|he| {
            // he = u -> v, next(he) = v -> w
            let to_u = -mesh.edge_vector(he);
            let to_w = mesh.edge_vector(mesh.next(he));
            angle_between(&to_u, &to_w)
        })
        .sum()
}

/// Compute the Gaussian curvature of a vertex by angle defect.
pub fn gauss_curvature(mesh: &HalfEdgeMesh, v: VertexId) -> f64 {
    let area = mixed_area(mesh, v);
    if area.abs() < MIN_AREA {
        return 0.0;
    }
    (2.0 * PI - angle_sum(mesh, v)) / area
}

/// Average of the stored mean curvatures of a face's corners.
///
/// Reads the vertex fields written by [`calculate_curvatures`].
pub fn face_mean_curvature(mesh: &HalfEdgeMesh, f: FaceId) -> f64 {
    mesh.face_triangle(f)
        .iter()
        .map(|&v| mesh.vertex(v).mean_curvature)
        .sum::<f64>()
        / 3.0
}

/// Per-vertex curvature data.
#[derive(Debug, Clone, Copy)]
struct VertexCurvature {
    mean: f64,
    gaussian: f64,
    mixed_area: f64,
}

fn vertex_curvature(mesh: &HalfEdgeMesh, v: VertexId) -> VertexCurvature {
    let area = mixed_area(mesh, v);
    if area.abs() < MIN_AREA {
        return VertexCurvature {
            mean: 0.0,
            gaussian: 0.0,
            mixed_area: area,
        };
    }

    let normal = curvature_vector_sum(mesh, v) / area;
    VertexCurvature {
        mean: 0.5 * normal.norm(),
        gaussian: (2.0 * PI - angle_sum(mesh, v)) / area,
        mixed_area: area,
    }
}

/// Compute mean curvature, Gaussian curvature and mixed area for all vertices.
///
/// This function uses parallel computation by default. Use
/// [`compute_curvature_sequential`] for single-threaded execution.
pub fn compute_curvature(mesh: &HalfEdgeMesh) -> CurvatureResult {
    compute_curvature_impl(mesh, true)
}

/// Compute all curvatures (sequential version).
///
/// Uses single-threaded execution. Useful for benchmarking.
pub fn compute_curvature_sequential(mesh: &HalfEdgeMesh) -> CurvatureResult {
    compute_curvature_impl(mesh, false)
}

fn compute_curvature_impl(mesh: &HalfEdgeMesh, parallel: bool) -> CurvatureResult {
    let n = mesh.num_vertices();
    let vertex_indices: Vec<usize> = (0..n).collect();

    let compute_vertex = |idx: usize| vertex_curvature(mesh, VertexId::new(idx));

    let results: Vec<VertexCurvature> = if parallel {
        vertex_indices
            .par_iter()
            .map(|&idx| compute_vertex(idx))
            .collect()
    } else {
        vertex_indices
            .iter()
            .map(|&idx| compute_vertex(idx))
            .collect()
    };

    let mut mean = Vec::with_capacity(n);
    let mut gaussian = Vec::with_capacity(n);
    let mut mixed_area = Vec::with_capacity(n);

    for vc in results {
        mean.push(vc.mean);
        gaussian.push(vc.gaussian);
        mixed_area.push(vc.mixed_area);
    }

    let skipped = mixed_area.iter().filter(|&&a| a.abs() < MIN_AREA).count();
    if skipped > 0 {
        log::debug!("curvature: {} of {} vertices are boundary or degenerate", skipped, n);
    }

    CurvatureResult {
        mean,
        gaussian,
        mixed_area,
    }
}

/// Compute curvatures and store them on the mesh vertices.
pub fn calculate_curvatures(mesh: &mut HalfEdgeMesh) -> CurvatureResult {
    let result = compute_curvature(mesh);
    for (i, vertex) in mesh.vertices.iter_mut().enumerate() {
        vertex.mean_curvature = result.mean[i];
        vertex.gauss_curvature = result.gaussian[i];
        vertex.mixed_area = result.mixed_area[i];
    }
    result
}
