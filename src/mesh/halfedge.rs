//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! for triangle meshes, together with the face clusters ([`Patch`]) produced by
//! the CVT engine.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions.
//!   They are stored side by side, so the **mate** of a half-edge is found
//!   without a lookup.
//! - Each half-edge knows its **origin vertex**, the **next** half-edge around
//!   its face and the **face** it bounds.
//! - Each face stores the first half-edge of its 3-cycle.
//! - Each vertex stores its **star**: one half-edge *entering* the vertex. The
//!   fan of incident faces is walked with `mate(next(h))`.
//!
//! # Boundary Handling
//!
//! Boundary half-edges have no face and no `next`. The star of a boundary
//! vertex is anchored on the faced half-edge of one of its boundary edges, so a
//! fan walk sweeps every incident face and stops on the boundary half-edge at
//! the other end.

use std::collections::BTreeSet;

use nalgebra::{Point2, Point3, Vector3};

use super::index::{EdgeId, FaceId, HalfEdgeId, PatchId, VertexId};
use crate::error::{MeshError, Result};

/// Tolerance below which a vector is treated as zero when normalizing.
pub(crate) const NORMALIZE_EPS: f64 = 1e-12;

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Unit vertex normal, filled by [`HalfEdgeMesh::update_vertex_normals`].
    pub normal: Vector3<f64>,

    /// Discrete mean curvature, filled by
    /// [`calculate_curvatures`](crate::algo::curvature::calculate_curvatures).
    pub mean_curvature: f64,

    /// Discrete Gaussian curvature.
    pub gauss_curvature: f64,

    /// Mixed Voronoi area.
    pub mixed_area: f64,

    /// One half-edge entering this vertex. Anchors the fan walk.
    pub(crate) star: HalfEdgeId,
}

impl Vertex {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            mean_curvature: 0.0,
            gauss_curvature: 0.0,
            mixed_area: 0.0,
            star: HalfEdgeId::invalid(),
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// The star half-edge of this vertex (invalid for isolated vertices).
    #[inline]
    pub fn star(&self) -> HalfEdgeId {
        self.star
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The vertex this half-edge originates from.
    pub origin: VertexId,

    /// The next half-edge around the face. Invalid on boundary half-edges.
    pub next: HalfEdgeId,

    /// The face this half-edge belongs to. Invalid on boundary half-edges.
    pub face: FaceId,
}

impl HalfEdge {
    /// Create an unattached half-edge leaving `origin`.
    pub fn new(origin: VertexId) -> Self {
        Self {
            origin,
            next: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

/// A triangular face in the half-edge mesh.
///
/// `center`, `normal` and `area` are cached values refreshed by
/// [`HalfEdgeMesh::update_face_geometry`].
#[derive(Debug, Clone)]
pub struct Face {
    /// First half-edge of the face's 3-cycle.
    pub halfedge: HalfEdgeId,

    /// Cached centroid.
    pub center: Point3<f64>,

    /// Cached unit normal.
    pub normal: Vector3<f64>,

    /// Cached area.
    pub area: f64,

    /// Sampling density used to weight this face during clustering.
    pub density: f64,

    /// Optional per-corner texture coordinates.
    pub tex_coords: Option<[Point2<f64>; 3]>,

    /// The patch this face currently belongs to.
    pub(crate) patch: Option<PatchId>,
}

impl Face {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId) -> Self {
        Self {
            halfedge,
            center: Point3::origin(),
            normal: Vector3::zeros(),
            area: 0.0,
            density: 1.0,
            tex_coords: None,
            patch: None,
        }
    }

    /// The patch this face currently belongs to.
    #[inline]
    pub fn patch(&self) -> Option<PatchId> {
        self.patch
    }
}

/// A cluster of faces approximating one cell of a centroidal Voronoi tessellation.
///
/// The representative center always lies on the mesh: it is the center of
/// [`Patch::center_face`].
#[derive(Debug, Clone)]
pub struct Patch {
    /// Stable index assigned at creation.
    pub id: PatchId,

    /// Member faces. Filled by [`HalfEdgeMesh::materialize_patches`].
    pub(crate) faces: BTreeSet<FaceId>,

    /// Representative center point.
    pub center: Point3<f64>,

    /// Representative unit normal.
    pub normal: Vector3<f64>,

    /// Face whose center is the representative center.
    pub center_face: FaceId,
}

impl Patch {
    /// Member faces in handle order.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().copied()
    }

    /// Number of member faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Check if the patch has no member faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Check if `f` is a member face.
    #[inline]
    pub fn contains(&self, f: FaceId) -> bool {
        self.faces.contains(&f)
    }
}

/// A half-edge mesh data structure for triangle meshes.
///
/// Owns all vertices, half-edges, faces and patches in per-type arenas.
/// Connectivity is fixed once built; clustering only rewrites face-to-patch
/// links and patch representatives.
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) halfedges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
    pub(crate) patches: Vec<Patch>,
}

impl HalfEdgeMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // E = 3F/2 on a closed surface, a little more with boundary
        let num_halfedges = num_faces * 3 + num_faces / 2;

        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
            patches: Vec::new(),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.halfedges.len() / 2
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of patches.
    #[inline]
    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    #[inline]
    pub(crate) fn face_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.index()]
    }

    /// Get a patch by ID.
    #[inline]
    pub fn patch(&self, id: PatchId) -> &Patch {
        &self.patches[id.index()]
    }

    #[inline]
    pub(crate) fn patch_mut(&mut self, id: PatchId) -> &mut Patch {
        &mut self.patches[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the sampling density of a face.
    ///
    /// Fails with [`MeshError::InvalidParameter`] unless `density` is finite
    /// and non-negative.
    pub fn set_face_density(&mut self, f: FaceId, density: f64) -> Result<()> {
        if !density.is_finite() || density < 0.0 {
            return Err(MeshError::invalid_param(
                "density",
                density,
                "must be finite and non-negative",
            ));
        }
        self.face_mut(f).density = density;
        Ok(())
    }

    /// Get the patch a face currently belongs to.
    #[inline]
    pub fn face_patch(&self, f: FaceId) -> Option<PatchId> {
        self.face(f).patch
    }

    // ==================== Topology Queries ====================

    /// Get the mate (opposite) half-edge.
    #[inline]
    pub fn mate(&self, he: HalfEdgeId) -> HalfEdgeId {
        he.mate()
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face (invalid on the boundary).
    #[inline]
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        let n = self.next(he);
        if n.is_valid() {
            self.next(n)
        } else {
            HalfEdgeId::invalid()
        }
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId) -> VertexId {
        self.origin(he.mate())
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// Get the edge of a half-edge.
    #[inline]
    pub fn edge_of(&self, he: HalfEdgeId) -> EdgeId {
        he.edge()
    }

    /// Get one of the two half-edges of an edge.
    #[inline]
    pub fn edge_halfedge(&self, e: EdgeId, side: usize) -> HalfEdgeId {
        e.halfedge(side)
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if an edge is on the boundary (either side lacks a face).
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId) -> bool {
        self.is_boundary_halfedge(e.halfedge(0)) || self.is_boundary_halfedge(e.halfedge(1))
    }

    /// Check if a vertex is on the boundary.
    ///
    /// Relies on the star anchoring done by
    /// [`link_mesh`](crate::mesh::link_mesh). Isolated vertices count as boundary.
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        let star = self.vertex(v).star;
        !star.is_valid() || self.is_boundary_edge(star.edge())
    }

    /// Check if an edge separates two patches (or lies on the mesh boundary).
    pub fn is_patch_boundary_edge(&self, e: EdgeId) -> bool {
        if self.is_boundary_edge(e) {
            return true;
        }
        let f0 = self.face_of(e.halfedge(0));
        let f1 = self.face_of(e.halfedge(1));
        self.face(f0).patch != self.face(f1).patch
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId, &HalfEdge)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.num_edges()).map(EdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Iterate over all patch IDs.
    pub fn patch_ids(&self) -> impl Iterator<Item = PatchId> + '_ {
        (0..self.patches.len()).map(PatchId::new)
    }

    /// Iterate over all patches.
    pub fn patches(&self) -> impl Iterator<Item = &Patch> + '_ {
        self.patches.iter()
    }

    /// Iterate over the star of a vertex: half-edges entering it, one per
    /// incident face, plus a closing boundary half-edge for boundary vertices.
    pub fn vertex_star(&self, v: VertexId) -> VertexStarIter<'_> {
        VertexStarIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_star(v).map(|he| self.origin(he))
    }

    /// Iterate over faces incident to a vertex.
    pub fn vertex_faces(&self, v: VertexId) -> impl Iterator<Item = FaceId> + '_ {
        self.vertex_star(v)
            .map(|he| self.face_of(he))
            .filter(|f| f.is_valid())
    }

    /// Number of edges incident to a vertex.
    pub fn valence(&self, v: VertexId) -> usize {
        self.vertex_star(v).count()
    }

    /// Get the `k`-th half-edge of a face (`k` in 0..3).
    ///
    /// Half-edge `k` lies opposite corner `k`.
    #[inline]
    pub fn face_halfedge(&self, f: FaceId, k: usize) -> HalfEdgeId {
        let mut he = self.face(f).halfedge;
        for _ in 0..k % 3 {
            he = self.next(he);
        }
        he
    }

    /// Get the `k`-th corner vertex of a face (`k` in 0..3).
    #[inline]
    pub fn face_vertex(&self, f: FaceId, k: usize) -> VertexId {
        self.origin(self.face_halfedge(f, (k + 2) % 3))
    }

    /// Iterate over the three half-edges of a face.
    pub fn face_halfedges(&self, f: FaceId) -> FaceHalfEdgeIter<'_> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Get the three corner vertices of a face in input order.
    pub fn face_triangle(&self, f: FaceId) -> [VertexId; 3] {
        [self.face_vertex(f, 0), self.face_vertex(f, 1), self.face_vertex(f, 2)]
    }

    /// Get the positions of the three corners of a face.
    pub fn face_positions(&self, f: FaceId) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Faces sharing an edge with `f`.
    pub fn face_neighbors(&self, f: FaceId) -> Vec<FaceId> {
        self.face_halfedges(f)
            .map(|he| self.face_of(he.mate()))
            .filter(|g| g.is_valid())
            .collect()
    }

    // ==================== Geometry ====================

    /// Compute the unit normal of a face (zero for degenerate faces).
    pub fn face_normal(&self, f: FaceId) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0)
            .cross(&(p2 - p0))
            .try_normalize(NORMALIZE_EPS)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Compute the centroid of a face.
    pub fn face_centroid(&self, f: FaceId) -> Point3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Refresh the cached center, normal and area of every face.
    pub fn update_face_geometry(&mut self) {
        for i in 0..self.faces.len() {
            let f = FaceId::new(i);
            let center = self.face_centroid(f);
            let normal = self.face_normal(f);
            let area = self.face_area(f);

            let face = self.face_mut(f);
            face.center = center;
            face.normal = normal;
            face.area = area;
        }
    }

    /// Set every vertex normal to the normalized sum of its incident face normals.
    pub fn update_vertex_normals(&mut self) {
        let mut sums = vec![Vector3::zeros(); self.vertices.len()];
        for f in self.face_ids() {
            let n = self.face_normal(f);
            for v in self.face_triangle(f) {
                sums[v.index()] += n;
            }
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(sums) {
            vertex.normal = sum.try_normalize(NORMALIZE_EPS).unwrap_or_else(Vector3::zeros);
        }
    }

    /// Compute the edge vector of a half-edge (from origin to destination).
    pub fn edge_vector(&self, he: HalfEdgeId) -> Vector3<f64> {
        self.position(self.dest(he)) - self.position(self.origin(he))
    }

    /// Compute the length of a half-edge.
    pub fn edge_length(&self, he: HalfEdgeId) -> f64 {
        self.edge_vector(he).norm()
    }

    /// Compute the axis-aligned bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    /// Length of the bounding box diagonal (0 for an empty mesh).
    pub fn diameter(&self) -> f64 {
        self.bounding_box()
            .map(|(min, max)| (max - min).norm())
            .unwrap_or(0.0)
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Add an edge `v0 -> v1` and return its first half-edge.
    pub(crate) fn add_edge(&mut self, v0: VertexId, v1: VertexId) -> HalfEdgeId {
        let he = HalfEdgeId::new(self.halfedges.len());
        self.halfedges.push(HalfEdge::new(v0));
        self.halfedges.push(HalfEdge::new(v1));
        he
    }

    /// Bind three free half-edges into a new face.
    pub(crate) fn add_face(&mut self, hes: [HalfEdgeId; 3]) -> FaceId {
        let f = FaceId::new(self.faces.len());
        self.faces.push(Face::new(hes[0]));
        for k in 0..3 {
            let he = self.halfedge_mut(hes[k]);
            he.next = hes[(k + 1) % 3];
            he.face = f;
        }
        f
    }

    // ==================== Patches ====================

    /// Create a patch seeded from `center_face` and assign that face to it.
    ///
    /// The face's cached center and normal become the patch representatives,
    /// so [`update_face_geometry`](Self::update_face_geometry) should have run.
    pub fn add_patch(&mut self, center_face: FaceId) -> PatchId {
        let id = PatchId::new(self.patches.len());
        let (center, normal) = {
            let face = self.face(center_face);
            (face.center, face.normal)
        };
        self.patches.push(Patch {
            id,
            faces: BTreeSet::new(),
            center,
            normal,
            center_face,
        });
        self.face_mut(center_face).patch = Some(id);
        id
    }

    /// Point a face at a patch. Patch face sets are refreshed by
    /// [`materialize_patches`](Self::materialize_patches).
    #[inline]
    pub fn assign_face(&mut self, f: FaceId, p: PatchId) {
        debug_assert!(p.index() < self.patches.len());
        self.face_mut(f).patch = Some(p);
    }

    /// Rebuild every patch's face set from the faces' patch links.
    pub fn materialize_patches(&mut self) {
        for patch in &mut self.patches {
            patch.faces.clear();
        }
        for (i, face) in self.faces.iter().enumerate() {
            if let Some(p) = face.patch {
                self.patches[p.index()].faces.insert(FaceId::new(i));
            }
        }
    }

    /// Drop all patches and detach every face.
    pub fn clear_patches(&mut self) {
        self.patches.clear();
        for face in &mut self.faces {
            face.patch = None;
        }
    }

    // ==================== Validation ====================

    /// Check that all connectivity is consistent.
    pub fn is_valid(&self) -> bool {
        if self.halfedges.len() % 2 != 0 {
            return false;
        }

        for (vid, v) in self.vertices() {
            if v.star.is_valid() {
                if v.star.index() >= self.halfedges.len() || self.dest(v.star) != vid {
                    return false;
                }
                if self.is_boundary_halfedge(v.star) {
                    return false;
                }
            }
        }

        for (heid, he) in self.halfedges() {
            if !he.origin.is_valid() || he.origin.index() >= self.vertices.len() {
                return false;
            }
            if heid.mate().mate() != heid {
                return false;
            }
            if he.is_boundary() {
                if he.next.is_valid() || self.is_boundary_halfedge(heid.mate()) {
                    return false;
                }
                continue;
            }
            if !he.next.is_valid() || self.face_of(he.next) != he.face {
                return false;
            }
            if self.origin(he.next) != self.dest(heid) {
                return false;
            }
        }

        for (fid, f) in self.faces() {
            if !f.halfedge.is_valid() {
                return false;
            }
            let h0 = f.halfedge;
            let h1 = self.next(h0);
            let h2 = self.next(h1);
            if self.next(h2) != h0 {
                return false;
            }
            if [h0, h1, h2].iter().any(|&h| self.face_of(h) != fid) {
                return false;
            }
            if let Some(p) = f.patch {
                if p.index() >= self.patches.len() {
                    return false;
                }
            }
        }

        // Each star walk must reach every face around its vertex
        let mut incident = vec![0usize; self.vertices.len()];
        for f in self.face_ids() {
            for v in self.face_triangle(f) {
                incident[v.index()] += 1;
            }
        }
        if self
            .vertex_ids()
            .any(|v| self.vertex_faces(v).count() != incident[v.index()])
        {
            return false;
        }

        self.patches
            .iter()
            .enumerate()
            .all(|(i, p)| p.id.index() == i)
    }

    /// Check that patch face sets agree with the faces' patch links.
    pub fn is_partition_consistent(&self) -> bool {
        let member_total: usize = self.patches.iter().map(Patch::num_faces).sum();
        let linked_total = self.faces.iter().filter(|f| f.patch.is_some()).count();
        if member_total != linked_total {
            return false;
        }
        self.patches
            .iter()
            .all(|p| p.faces().all(|f| self.face(f).patch == Some(p.id)))
    }
}

/// Iterator over the star (incoming half-edges) of a vertex.
pub struct VertexStarIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> VertexStarIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, v: VertexId) -> Self {
        let start = mesh.vertex(v).star;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a> Iterator for VertexStarIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // If he enters v inside face F, next(he) leaves v inside F and its
        // mate enters v inside the neighbouring face.
        let next = self.mesh.next(result);
        if !next.is_valid() {
            self.done = true;
        } else {
            self.current = next.mate();
            if self.current == self.start {
                self.done = true;
            }
        }

        Some(result)
    }
}

/// Iterator over the half-edges of a face.
pub struct FaceHalfEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    current: HalfEdgeId,
    remaining: usize,
}

impl<'a> FaceHalfEdgeIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, f: FaceId) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            current: start,
            remaining: if start.is_valid() { 3 } else { 0 },
        }
    }
}

impl<'a> Iterator for FaceHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.current;
        self.current = self.mesh.next(result);
        self.remaining -= 1;
        Some(result)
    }
}
