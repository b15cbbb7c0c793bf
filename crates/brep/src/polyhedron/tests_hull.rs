use super::*;
use crate::geom::rand::{draw_points, CloudShape, ReplayToken};
use nalgebra::{vector, Vector3};
use proptest::prelude::*;

fn counts(p: &Polyhedron) -> (usize, usize, usize) {
    (p.vertex_count(), p.edge_count(), p.face_count())
}

fn cube_corners(size: f64) -> Vec<Vector3<f64>> {
    (0..8)
        .map(|i| {
            vector![
                (i & 1) as f64 * size,
                ((i >> 1) & 1) as f64 * size,
                ((i >> 2) & 1) as f64 * size
            ]
        })
        .collect()
}

/// Largest signed distance of any point above any face.
fn max_height_above_faces(p: &Polyhedron, points: &[Vector3<f64>]) -> f64 {
    p.faces()
        .flat_map(|f| {
            let plane = p.face_geometric_plane(f);
            points.iter().map(move |&q| plane.point_distance(q))
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

#[test]
fn stages_grow_from_point_to_polygon() {
    let mut p = Polyhedron::new();
    let a = p.add_point(vector![0.0, 0.0, 0.0]).unwrap();
    assert!(p.is_point());
    assert!(p.add_point(vector![0.0, 0.0, 0.0]).is_none());

    p.add_point(vector![1.0, 0.0, 0.0]).unwrap();
    assert!(p.is_edge());
    assert_eq!(counts(&p), (2, 1, 0));
    let e = p.edges().next().unwrap();
    let first = p.edge(e).first();
    assert_eq!(p.twin(first), p.edge(e).second());
    assert!(p.half_edge(first).face().is_none());
    assert!(p.check_invariant());

    // colinear: inside is ignored, outside replaces the enclosed endpoint
    assert!(p.add_point(vector![0.5, 0.0, 0.0]).is_none());
    let moved = p.add_point(vector![2.0, 0.0, 0.0]).unwrap();
    assert_eq!(p.position(moved), vector![2.0, 0.0, 0.0]);
    assert_eq!(p.position(a), vector![0.0, 0.0, 0.0]);
    let moved = p.add_point(vector![-1.0, 0.0, 0.0]).unwrap();
    assert_eq!(moved, a);
    assert_eq!(p.bounds().min.x, -1.0);
    assert_eq!(p.vertex_count(), 2);

    p.add_point(vector![0.0, 1.0, 0.0]).unwrap();
    assert!(p.is_polygon());
    assert_eq!(counts(&p), (3, 3, 1));
    assert!(p.edges().all(|e| !p.edge(e).fully_specified()));
    assert!(p.check_invariant());
    let normal = p.face_normal(p.faces().next().unwrap());

    // coplanar: inside ignored, outside rebuilds the polygon with the same winding
    assert!(p.add_point(vector![0.0, 0.2, 0.0]).is_none());
    p.add_point(vector![2.0, 1.0, 0.0]).unwrap();
    assert!(p.is_polygon());
    assert_eq!(counts(&p), (4, 4, 1));
    let f = p.faces().next().unwrap();
    assert!((p.face_normal(f) - normal).norm() < 1e-12);
    assert!(p.check_face_planes());
}

#[test]
fn coplanar_point_drops_vertices_it_makes_redundant() {
    let mut p = Polyhedron::from_points(&[
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![1.0, 1.0, 0.0],
    ]);
    // (1, 0) now lies on the segment from the origin to (2, 0)
    p.add_point(vector![2.0, 0.0, 0.0]).unwrap();
    assert_eq!(counts(&p), (3, 3, 1));
    assert!(!p.has_vertex(vector![1.0, 0.0, 0.0], 0.0));
}

#[test]
fn bounds_cover_every_vertex_after_a_polygon_rebuild() {
    let p = Polyhedron::from_points(&[
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![1.0, 1.0, 0.0],
        vector![0.5, 0.5, 1.0],
    ]);
    assert_eq!(counts(&p), (5, 8, 5));
    assert_eq!(p.bounds(), BBox3::from_points(p.vertex_positions()));
    assert_eq!(p.bounds().min, vector![0.0, 0.0, 0.0]);
    assert_eq!(p.bounds().max, vector![1.0, 1.0, 1.0]);
    assert!(p.contains_point(vector![0.1, 0.1, 0.1]));
}

#[test]
fn tetrahedron_from_four_points() {
    let p = Polyhedron::from_points(&[
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![0.0, 0.0, 1.0],
    ]);
    assert_eq!(counts(&p), (4, 6, 4));
    assert!(p.is_polyhedron());
    assert!(p.is_closed());
    assert!(p.check_invariant());
    assert!(p.check_convex());
    assert!(p.check_face_planes());
    assert!(p.faces().all(|f| p.face(f).vertex_count() == 3));
    assert!(p.contains_point(vector![0.1, 0.1, 0.1]));
    assert!(!p.contains_point(vector![0.5, 0.5, 0.5]));
}

#[test]
fn pyramid_over_square() {
    let mut p = Polyhedron::from_points(&[
        vector![8.0, 8.0, 0.0],
        vector![8.0, -8.0, 0.0],
        vector![-8.0, -8.0, 0.0],
        vector![-8.0, 8.0, 0.0],
    ]);
    assert!(p.is_polygon());
    let apex = p.add_point(vector![0.0, 0.0, 12.0]).unwrap();
    assert_eq!(p.position(apex), vector![0.0, 0.0, 12.0]);
    assert_eq!(counts(&p), (5, 8, 5));
    assert!(p.check_invariant());
    assert!(p.check_convex());
    assert!(p.has_face(
        &[
            vector![8.0, 8.0, 0.0],
            vector![8.0, -8.0, 0.0],
            vector![-8.0, -8.0, 0.0],
            vector![-8.0, 8.0, 0.0],
        ],
        0.0
    ));
    assert_eq!(p.incident_half_edges(apex).len(), 4);
    assert_eq!(p.bounds().max.z, 12.0);
}

#[test]
fn cube_from_corners_has_six_quads() {
    let p = Polyhedron::from_points(&cube_corners(2.0));
    assert_eq!(counts(&p), (8, 12, 6));
    assert!(p.faces().all(|f| p.face(f).vertex_count() == 4));
    assert!(p.check_invariant());
    assert!(p.check_no_coplanar_faces());
    assert!(p.check_face_planes());
    let boxed = Polyhedron::from_min_max(Vector3::zeros(), vector![2.0, 2.0, 2.0]);
    assert_eq!(p, boxed);
}

#[test]
fn points_inside_or_on_the_surface_are_ignored() {
    let mut p = Polyhedron::from_points(&cube_corners(1.0));
    for q in [
        vector![0.5, 0.5, 0.5],
        vector![1.0, 0.5, 0.5],
        vector![1.0, 1.0, 0.5],
        vector![1.0, 1.0, 1.0],
    ] {
        assert!(p.add_point(q).is_none(), "{q:?} changed the hull");
    }
    assert_eq!(counts(&p), (8, 12, 6));
}

#[test]
fn point_beyond_one_face_raises_a_pyramid_on_it() {
    let mut p = Polyhedron::from_points(&cube_corners(1.0));
    p.add_point(vector![2.0, 0.5, 0.5]).unwrap();
    assert_eq!(counts(&p), (9, 16, 9));
    assert!(p.check_invariant());
    assert!(p.check_convex());
    assert!(!p.has_face(
        &[
            vector![1.0, 0.0, 0.0],
            vector![1.0, 1.0, 0.0],
            vector![1.0, 1.0, 1.0],
            vector![1.0, 0.0, 1.0],
        ],
        0.0
    ));
}

#[test]
fn point_in_a_face_plane_extends_that_face() {
    let mut p = Polyhedron::from_points(&cube_corners(1.0));
    let q = vector![2.0, 0.0, 0.5];
    p.add_point(q).unwrap();
    assert_eq!(counts(&p), (9, 15, 8));
    assert!(p.check_invariant());
    assert!(p.check_no_coplanar_faces());
    // the front face y = 0 became a pentagon through the new point
    let front = p
        .faces()
        .find(|&f| p.face_normal(f).y < -0.99)
        .unwrap();
    assert_eq!(p.face(front).vertex_count(), 5);
    assert!(p.face_vertices(front).any(|v| p.position(v) == q));
}

#[test]
fn sphere_cloud_hull_is_valid() {
    let points = draw_points(
        CloudShape::OnSphere {
            center: vector![1.0, -2.0, 0.5],
            radius: 10.0,
        },
        150,
        ReplayToken::new(7, 0),
    );
    let p = Polyhedron::from_points(&points);
    assert!(p.is_polyhedron());
    assert!(p.check_invariant());
    assert_eq!(p.euler_characteristic(), 2);
    assert!(max_height_above_faces(&p, &points) < 1e-3);
    // samples on a sphere are mostly extreme points
    assert!(p.vertex_count() > 100);
}

#[test]
fn hull_is_independent_of_a_repeated_pass() {
    let points = draw_points(
        CloudShape::InBox(BBox3::new(vector![-1.0, -1.0, -1.0], vector![1.0, 1.0, 1.0])),
        60,
        ReplayToken::new(3, 1),
    );
    let mut p = Polyhedron::from_points(&points);
    let before = p.clone();
    assert_eq!(p.add_points(&points), 0);
    assert_eq!(p, before);
}

proptest! {
    #[test]
    fn random_clouds_give_closed_convex_hulls(seed in 0u64..1_000, n in 4usize..40) {
        let points = draw_points(
            CloudShape::InBox(BBox3::new(vector![-5.0, -5.0, -5.0], vector![5.0, 5.0, 5.0])),
            n,
            ReplayToken::new(seed, n as u64),
        );
        let p = Polyhedron::from_points(&points);
        prop_assert!(p.check_invariant());
        if p.is_polyhedron() {
            prop_assert_eq!(p.euler_characteristic(), 2);
            prop_assert!(max_height_above_faces(&p, &points) < 1e-3);
            let centroid =
                p.vertex_positions().iter().sum::<Vector3<f64>>() / p.vertex_count() as f64;
            prop_assert!(p.contains_point(centroid));
        }
    }
}
