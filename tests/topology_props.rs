//! Property-based tests for mesh topology and clustering.
//!
//! Run with: cargo test --test topology_props

use std::collections::HashSet;

use nalgebra::Point3;
use patchwork::algo::cvt::{lloyd_cvt, LloydOptions};
use patchwork::prelude::*;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

type Soup = (Vec<Point3<f64>>, Vec<[usize; 3]>);

/// A `w × h` grid of quads split into triangles, with random heights.
fn arb_grid() -> impl Strategy<Value = Soup> {
    (1usize..7, 1usize..7).prop_flat_map(|(w, h)| {
        prop::collection::vec(-0.5..0.5f64, (w + 1) * (h + 1)).prop_map(move |heights| {
            let mut vertices = Vec::with_capacity(heights.len());
            for j in 0..=h {
                for i in 0..=w {
                    let z = heights[j * (w + 1) + i];
                    vertices.push(Point3::new(i as f64, j as f64, z));
                }
            }

            let mut faces = Vec::with_capacity(w * h * 2);
            for j in 0..h {
                for i in 0..w {
                    let v00 = j * (w + 1) + i;
                    let v10 = v00 + 1;
                    let v01 = v00 + (w + 1);
                    let v11 = v01 + 1;
                    faces.push([v00, v10, v11]);
                    faces.push([v00, v11, v01]);
                }
            }

            (vertices, faces)
        })
    })
}

/// Arbitrary triangle soup over a handful of vertices.
fn arb_soup() -> impl Strategy<Value = Soup> {
    (3usize..10).prop_flat_map(|n| {
        let vertices = prop::collection::vec(prop::array::uniform3(-10.0..10.0f64), n);
        let faces = prop::collection::vec(prop::array::uniform3(0..n), 1..12);
        (vertices, faces).prop_map(|(vs, fs)| {
            let vs = vs.into_iter().map(|[x, y, z]| Point3::new(x, y, z)).collect();
            (vs, fs)
        })
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_mate_and_face_links((vertices, faces) in arb_grid()) {
        let mesh = build_from_triangles(&vertices, &faces).unwrap();
        prop_assert!(mesh.is_valid());
        prop_assert_eq!(mesh.num_halfedges(), 2 * mesh.num_edges());

        for h in mesh.halfedge_ids() {
            prop_assert_eq!(h.mate().mate(), h);
            prop_assert_eq!(mesh.origin(h.mate()), mesh.dest(h));
            prop_assert_eq!(h.edge(), h.mate().edge());

            if !mesh.is_boundary_halfedge(h) {
                let f = mesh.face_of(h);
                let n = mesh.next(h);
                prop_assert_eq!(mesh.face_of(n), f);
                prop_assert_eq!(mesh.next(mesh.next(n)), h);
            } else {
                prop_assert!(!mesh.is_boundary_halfedge(h.mate()));
            }
        }
    }

    #[test]
    fn prop_euler_characteristic_of_disk((vertices, faces) in arb_grid()) {
        let mesh = build_from_triangles(&vertices, &faces).unwrap();
        let chi = mesh.num_vertices() as i64 - mesh.num_edges() as i64 + mesh.num_faces() as i64;
        prop_assert_eq!(chi, 1);
    }

    #[test]
    fn prop_star_walk_covers_incident_faces((vertices, faces) in arb_grid()) {
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        for v in mesh.vertex_ids() {
            let expected: HashSet<usize> = faces
                .iter()
                .enumerate()
                .filter(|(_, tri)| tri.contains(&v.index()))
                .map(|(fi, _)| fi)
                .collect();

            let walked: Vec<usize> = mesh.vertex_faces(v).map(|f| f.index()).collect();
            let unique: HashSet<usize> = walked.iter().copied().collect();
            prop_assert_eq!(walked.len(), unique.len(), "face visited twice around {:?}", v);
            prop_assert_eq!(&unique, &expected);

            for h in mesh.vertex_star(v) {
                prop_assert_eq!(mesh.dest(h), v);
            }

            // Interior walks close; boundary walks end on a faceless half-edge
            let last = mesh.vertex_star(v).last().unwrap();
            if mesh.is_boundary_vertex(v) {
                prop_assert!(mesh.is_boundary_halfedge(last));
            } else {
                prop_assert_eq!(mesh.next(last).mate(), mesh.vertex(v).star());
            }
        }
    }

    #[test]
    fn prop_roundtrip((vertices, faces) in arb_grid()) {
        let mesh = build_from_triangles(&vertices, &faces).unwrap();
        let (v2, f2) = to_face_vertex(&mesh);
        prop_assert_eq!(v2, vertices);
        prop_assert_eq!(f2, faces);
    }

    #[test]
    fn prop_soup_builds_valid_or_errors((vertices, faces) in arb_soup()) {
        if let Ok(mesh) = build_from_triangles(&vertices, &faces) {
            prop_assert!(mesh.is_valid());
            prop_assert_eq!(mesh.num_faces(), faces.len());
        }
    }

    #[test]
    fn prop_lloyd_partition_is_total(
        (vertices, faces) in arb_grid(),
        k in 1usize..6,
        seed in any::<u64>(),
        alpha in 0.0..=1.0f64,
    ) {
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
        let k = k.min(mesh.num_faces());
        let options = LloydOptions::new(k).with_iterations(5).with_seed(seed).with_alpha(alpha);
        let summary = lloyd_cvt(&mut mesh, &options).unwrap();

        prop_assert_eq!(summary.patches, k);
        let owned: usize = mesh.patches().map(|p| p.num_faces()).sum();
        prop_assert_eq!(owned, mesh.num_faces());
        prop_assert!(mesh.is_partition_consistent());
    }

    #[test]
    fn prop_lloyd_deterministic(
        (vertices, faces) in arb_grid(),
        seed in any::<u64>(),
    ) {
        let options = LloydOptions::new(3.min(faces.len())).with_iterations(4).with_seed(seed);

        let mut a = build_from_triangles(&vertices, &faces).unwrap();
        let mut b = build_from_triangles(&vertices, &faces).unwrap();
        lloyd_cvt(&mut a, &options).unwrap();
        lloyd_cvt(&mut b, &options).unwrap();

        let pa: Vec<_> = a.face_ids().map(|f| a.face_patch(f)).collect();
        let pb: Vec<_> = b.face_ids().map(|f| b.face_patch(f)).collect();
        prop_assert_eq!(pa, pb);
    }
}
