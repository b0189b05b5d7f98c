//! Mesh construction utilities.
//!
//! This module builds half-edge meshes from indexed triangle lists ("triangle
//! soup" with shared vertex indices) and links vertex stars once all faces are
//! in place.

use std::collections::HashMap;

use nalgebra::{Point2, Point3};

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, HalfEdgeId, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// Each undirected vertex pair yields exactly one edge. Input that would make
/// an edge carry more than two faces fails with
/// [`MeshError::NonManifoldTopology`]; two faces walking the same directed edge
/// fail with [`MeshError::InconsistentOrientation`]. A vertex whose faces form
/// more than one fan fails with [`MeshError::NonManifoldVertex`].
///
/// # Example
/// ```
/// use patchwork::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_edges(), 3);
/// ```
pub fn build_from_triangles(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh> {
    build_mesh(vertices, faces, None)
}

/// Build a half-edge mesh and attach per-corner texture coordinates.
///
/// `tex_coords[i]` holds the coordinates of the three corners of `faces[i]`.
pub fn build_from_triangles_with_uvs(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    tex_coords: &[[Point2<f64>; 3]],
) -> Result<HalfEdgeMesh> {
    if tex_coords.len() != faces.len() {
        return Err(MeshError::InvalidTexCoords {
            expected: faces.len(),
            got: tex_coords.len(),
        });
    }
    build_mesh(vertices, faces, Some(tex_coords))
}

fn build_mesh(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    tex_coords: Option<&[[Point2<f64>; 3]]>,
) -> Result<HalfEdgeMesh> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let mut incident = vec![0usize; vertices.len()];
    for face in faces {
        for &vi in face {
            incident[vi] += 1;
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());

    let vertex_ids: Vec<VertexId> = vertices.iter().map(|&pos| mesh.add_vertex(pos)).collect();

    // Undirected edge (smaller index first) -> its smaller-to-larger half-edge
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId> =
        HashMap::with_capacity(faces.len() * 3 / 2 + 1);

    for (fi, &[i0, i1, i2]) in faces.iter().enumerate() {
        // Half-edge k lies opposite corner k
        let he0 = get_halfedge(&mut mesh, &mut edge_map, &vertex_ids, i1, i2)?;
        let he1 = get_halfedge(&mut mesh, &mut edge_map, &vertex_ids, i2, i0)?;
        let he2 = get_halfedge(&mut mesh, &mut edge_map, &vertex_ids, i0, i1)?;

        let f = mesh.add_face([he0, he1, he2]);
        debug_assert_eq!(f.index(), fi);

        if let Some(uvs) = tex_coords {
            mesh.face_mut(f).tex_coords = Some(uvs[fi]);
        }
    }

    link_mesh(&mut mesh);

    // A star walk covers one fan; bowtie vertices have more than one
    for (vi, &count) in incident.iter().enumerate() {
        if mesh.vertex_faces(VertexId::new(vi)).count() != count {
            return Err(MeshError::NonManifoldVertex { vertex: vi });
        }
    }

    Ok(mesh)
}

/// Fetch the free half-edge `i0 -> i1`, creating its edge on first request.
fn get_halfedge(
    mesh: &mut HalfEdgeMesh,
    edge_map: &mut HashMap<(usize, usize), HalfEdgeId>,
    vertex_ids: &[VertexId],
    i0: usize,
    i1: usize,
) -> Result<HalfEdgeId> {
    let (a, b, swapped) = if i0 > i1 { (i1, i0, true) } else { (i0, i1, false) };

    let he = *edge_map
        .entry((a, b))
        .or_insert_with(|| mesh.add_edge(vertex_ids[a], vertex_ids[b]));
    let he = if swapped { he.mate() } else { he };

    if mesh.face_of(he).is_valid() {
        return Err(if mesh.face_of(he.mate()).is_valid() {
            MeshError::NonManifoldTopology { v0: a, v1: b }
        } else {
            MeshError::InconsistentOrientation { v0: i0, v1: i1 }
        });
    }

    Ok(he)
}

/// Assign every vertex its star half-edge.
///
/// Each corner of each face anchors its vertex on the face half-edge entering
/// it. Boundary edges then re-anchor the vertex their faced half-edge enters,
/// so fan walks around boundary vertices start at one boundary edge and stop
/// at the other instead of wrapping.
///
/// Called by the builders; safe to call again.
pub fn link_mesh(mesh: &mut HalfEdgeMesh) {
    for i in 0..mesh.num_faces() {
        let f = FaceId::new(i);
        for k in 0..3 {
            let v = mesh.face_vertex(f, k);
            let star = mesh.face_halfedge(f, k + 1);
            mesh.vertex_mut(v).star = star;
        }
    }

    for e in mesh.edge_ids().collect::<Vec<_>>() {
        if !mesh.is_boundary_edge(e) {
            continue;
        }
        let h = e.halfedge(0);
        let faced = if mesh.is_boundary_halfedge(h) { h.mate() } else { h };
        let v = mesh.dest(faced);
        mesh.vertex_mut(v).star = faced;
    }
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex(mesh: &HalfEdgeMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| {
            let [v0, v1, v2] = mesh.face_triangle(f);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        (vertices, faces)
    }

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        (vertices, faces)
    }

    fn tetrahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        (vertices, faces)
    }

    fn grid(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.num_halfedges(), 6);
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
        }
        assert_eq!(mesh.face_triangle(FaceId::new(0)).map(|v| v.index()), [0, 1, 2]);
    }

    #[test]
    fn test_two_triangles() {
        let (vertices, faces) = two_triangles();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_edges(), 5);
        assert_eq!(mesh.num_halfedges(), 10);
        assert!(mesh.is_valid());

        let shared: Vec<_> = mesh.edge_ids().filter(|&e| !mesh.is_boundary_edge(e)).collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(mesh.face_neighbors(FaceId::new(0)), vec![FaceId::new(1)]);
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        let (vertices, faces) = tetrahedron();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.halfedge_ids().filter(|&h| mesh.is_boundary_halfedge(h)).count(), 0);
        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v));
            assert_eq!(mesh.valence(v), 3);
        }
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_mate_and_face_links() {
        let (vertices, faces) = grid(3);
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        for h in mesh.halfedge_ids() {
            assert_eq!(mesh.mate(mesh.mate(h)), h);
            assert_eq!(mesh.dest(h), mesh.origin(mesh.mate(h)));
        }
        for f in mesh.face_ids() {
            let hes: Vec<_> = mesh.face_halfedges(f).collect();
            assert_eq!(hes.len(), 3);
            for he in hes {
                assert_eq!(mesh.face_of(he), f);
            }
        }
    }

    #[test]
    fn test_interior_star_walk() {
        let (vertices, faces) = grid(2);
        let mesh = build_from_triangles(&vertices, &faces).unwrap();
        let v = VertexId::new(4);
        assert!(!mesh.is_boundary_vertex(v));

        let star: Vec<_> = mesh.vertex_star(v).collect();
        assert_eq!(star.len(), 6);
        for &h in &star {
            assert_eq!(mesh.dest(h), v);
        }

        // The walk closes on itself
        let last = *star.last().unwrap();
        assert_eq!(mesh.mate(mesh.next(last)), star[0]);

        let incident: HashSet<FaceId> = mesh.vertex_faces(v).collect();
        assert_eq!(incident.len(), 6);
        let expected: HashSet<FaceId> = mesh
            .face_ids()
            .filter(|&f| mesh.face_triangle(f).contains(&v))
            .collect();
        assert_eq!(incident, expected);
    }

    #[test]
    fn test_boundary_star_walk() {
        let (vertices, faces) = grid(2);
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        for v in mesh.vertex_ids() {
            let expected: HashSet<FaceId> = mesh
                .face_ids()
                .filter(|&f| mesh.face_triangle(f).contains(&v))
                .collect();
            let walked: Vec<FaceId> = mesh.vertex_faces(v).collect();
            assert_eq!(walked.len(), expected.len(), "vertex {:?}", v);
            assert_eq!(walked.into_iter().collect::<HashSet<_>>(), expected);

            if mesh.is_boundary_vertex(v) {
                let last = mesh.vertex_star(v).last().unwrap();
                assert!(mesh.is_boundary_halfedge(last));
            }
        }

        // Corner (0, 0) touches two faces and three edges
        assert_eq!(mesh.valence(VertexId::new(0)), 3);
    }

    #[test]
    fn test_link_mesh_idempotent() {
        let (vertices, faces) = grid(2);
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
        let before: Vec<_> = mesh.vertices().map(|(_, v)| v.star()).collect();
        link_mesh(&mut mesh);
        let after: Vec<_> = mesh.vertices().map(|(_, v)| v.star()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_triangles();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(out_faces, faces);
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
    }

    #[test]
    fn test_tex_coords() {
        let (vertices, faces) = single_triangle();
        let uvs = vec![[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.5, 1.0)]];
        let mesh = build_from_triangles_with_uvs(&vertices, &faces, &uvs).unwrap();
        assert_eq!(mesh.face(FaceId::new(0)).tex_coords, Some(uvs[0]));

        let err = build_from_triangles_with_uvs(&vertices, &faces, &[]).unwrap_err();
        assert_eq!(err, MeshError::InvalidTexCoords { expected: 1, got: 0 });
    }

    #[test]
    fn test_empty_input() {
        let result = build_from_triangles(&[], &[]);
        assert_eq!(result.unwrap_err(), MeshError::EmptyMesh);
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]];

        let result = build_from_triangles(&vertices, &faces);
        assert_eq!(result.unwrap_err(), MeshError::InvalidVertexIndex { face: 0, vertex: 1 });
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = single_triangle();
        let faces = vec![[0, 0, 2]];

        let result = build_from_triangles(&vertices, &faces);
        assert_eq!(result.unwrap_err(), MeshError::DegenerateFace { face: 0 });
    }

    #[test]
    fn test_non_manifold_edge() {
        // Three triangles hinged on edge (0, 1)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];

        let result = build_from_triangles(&vertices, &faces);
        assert_eq!(result.unwrap_err(), MeshError::NonManifoldTopology { v0: 0, v1: 1 });
    }

    #[test]
    fn test_bowtie_tetrahedra_rejected() {
        // Two closed tetrahedra sharing only vertex 0
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-0.5, -1.0, 0.0),
            Point3::new(-0.5, -0.5, -1.0),
        ];
        let faces = vec![
            [0, 2, 1],
            [0, 1, 3],
            [1, 2, 3],
            [2, 0, 3],
            [0, 5, 4],
            [0, 4, 6],
            [4, 5, 6],
            [5, 0, 6],
        ];

        let result = build_from_triangles(&vertices, &faces);
        assert_eq!(result.unwrap_err(), MeshError::NonManifoldVertex { vertex: 0 });
    }

    #[test]
    fn test_bowtie_triangles_rejected() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 3, 4]];

        let result = build_from_triangles(&vertices, &faces);
        assert_eq!(result.unwrap_err(), MeshError::NonManifoldVertex { vertex: 0 });
    }

    #[test]
    fn test_is_valid_detects_split_star() {
        // Same bowtie assembled by hand, bypassing the builder checks
        let mut mesh = HalfEdgeMesh::new();
        let v: Vec<VertexId> = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ]
        .iter()
        .map(|&p| mesh.add_vertex(p))
        .collect();

        for [i0, i1, i2] in [[0, 1, 2], [0, 3, 4]] {
            let a = mesh.add_edge(v[i1], v[i2]);
            let b = mesh.add_edge(v[i2], v[i0]);
            let c = mesh.add_edge(v[i0], v[i1]);
            mesh.add_face([a, b, c]);
        }
        link_mesh(&mut mesh);

        assert_eq!(mesh.vertex_faces(v[0]).count(), 1);
        assert!(!mesh.is_valid());
    }

    #[test]
    fn test_inconsistent_orientation() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        // Both faces walk 0 -> 1
        let faces = vec![[0, 1, 2], [0, 1, 3]];

        let result = build_from_triangles(&vertices, &faces);
        assert_eq!(
            result.unwrap_err(),
            MeshError::InconsistentOrientation { v0: 0, v1: 1 }
        );
    }
}
