use super::*;
use nalgebra::{vector, Vector3};
use proptest::prelude::*;

#[test]
fn plane_from_points_is_ccw_outward() {
    let p = Plane::from_points(
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
    )
    .unwrap();
    assert!((p.normal - vector![0.0, 0.0, 1.0]).norm() < 1e-12);
    assert!(p.distance.abs() < 1e-12);
    assert_eq!(p.point_status(vector![0.3, 0.3, 1.0], 1e-4), PointStatus::Above);
    assert_eq!(p.point_status(vector![0.3, 0.3, -1.0], 1e-4), PointStatus::Below);
    assert_eq!(p.point_status(vector![5.0, -2.0, 5e-5], 1e-4), PointStatus::Inside);
    let f = p.flip();
    assert_eq!(f.point_status(vector![0.0, 0.0, 1.0], 1e-4), PointStatus::Below);
    // colinear input
    assert!(Plane::from_points(
        vector![0.0, 0.0, 0.0],
        vector![1.0, 1.0, 1.0],
        vector![2.0, 2.0, 2.0]
    )
    .is_none());
}

#[test]
fn ray_plane_intersection_and_miss() {
    let plane = Plane::new_at(vector![0.0, 0.0, 2.0], vector![0.0, 0.0, 1.0]);
    let ray = Ray::new(vector![0.0, 0.0, 0.0], vector![0.0, 0.0, 3.0]);
    assert!((ray.intersect_plane(&plane) - 2.0).abs() < 1e-12);
    assert!((ray.point_at(2.0) - vector![0.0, 0.0, 2.0]).norm() < 1e-12);
    // parallel
    let par = Ray::new(vector![0.0, 0.0, 0.0], vector![1.0, 0.0, 0.0]);
    assert!(par.intersect_plane(&plane).is_nan());
    // pointing away
    let away = Ray::new(vector![0.0, 0.0, 0.0], vector![0.0, 0.0, -1.0]);
    assert!(away.intersect_plane(&plane).is_nan());
}

#[test]
fn bbox_sentinel_and_merge() {
    let b = BBox3::empty();
    assert!(b.is_empty());
    assert!(b.min.x.is_nan());
    assert!(!b.contains(Vector3::zeros()));
    let b = BBox3::from_points([vector![1.0, -1.0, 0.0], vector![-2.0, 3.0, 0.5]]);
    assert_eq!(b.min, vector![-2.0, -1.0, 0.0]);
    assert_eq!(b.max, vector![1.0, 3.0, 0.5]);
    assert!(b.contains(vector![0.0, 0.0, 0.25]));
    assert!(!b.contains(vector![0.0, 0.0, 1.0]));
}

#[test]
fn correct_snaps_within_eps_only() {
    assert_eq!(correct(1.0004, 0, 0.001), 1.0);
    assert_eq!(correct(1.2, 0, 0.001), 1.2);
    // grid of 1/4
    assert_eq!(correct(0.2501, 2, 0.001), 0.25);
    assert_eq!(correct(-3.9995, 0, 0.001), -4.0);
    let v = correct_vec(vector![0.00001, 2.5, 7.0009], 0, 0.001);
    assert_eq!(v, vector![0.0, 2.5, 7.0]);
}

#[test]
fn swizzle_roundtrip_and_is_left_sign() {
    let p = vector![1.0, 2.0, 3.0];
    for axis in [Axis::X, Axis::Y, Axis::Z] {
        assert_eq!(unswizzle(swizzle(p, axis), axis), p);
    }
    assert_eq!(swizzle(p, Axis::X), vector![2.0, 3.0, 1.0]);
    assert_eq!(swizzle(p, Axis::Y), vector![3.0, 1.0, 2.0]);
    let a = vector![0.0, 0.0, 0.0];
    let b = vector![1.0, 0.0, 0.0];
    assert!(is_left(a, b, vector![0.5, 1.0, 0.0]) > 0.0);
    assert!(is_left(a, b, vector![0.5, -1.0, 0.0]) < 0.0);
    assert_eq!(is_left(a, b, vector![3.0, 0.0, 0.0]), 0.0);
    assert_eq!(Axis::dominant(vector![0.1, -0.9, 0.5]), Axis::Y);
}

#[test]
fn colinear_and_segment_helpers() {
    let a = vector![0.0, 0.0, 0.0];
    let b = vector![2.0, 2.0, 2.0];
    assert!(is_colinear(a, b, vector![5.0, 5.0, 5.0], 1e-5));
    assert!(is_colinear(a, a, vector![5.0, 1.0, 5.0], 1e-5));
    assert!(!is_colinear(a, b, vector![1.0, 0.0, 0.0], 1e-5));
    assert!(segment_contains(a, b, vector![1.0, 1.0, 1.0], 1e-9));
    assert!(!segment_contains(a, b, vector![3.0, 3.0, 3.0], 1e-3));
    assert!((segment_distance(a, b, vector![3.0, 3.0, 3.0]) - 3f64.sqrt()).abs() < 1e-12);
}

#[test]
fn hull2d_square_with_interior_and_edge_points() {
    let pts = vec![
        vector![1.0, 1.0, 0.0],
        vector![0.0, 0.0, 0.0],
        vector![0.5, 0.5, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.5, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![1.0, 0.0, 0.0],
    ];
    let hull = ConvexHull2D::new(&pts);
    assert!(hull.has_result());
    // anchor = min y, max x
    assert_eq!(
        hull.result(),
        &[
            vector![1.0, 0.0, 0.0],
            vector![1.0, 1.0, 0.0],
            vector![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 0.0],
        ]
    );
}

#[test]
fn hull2d_keeps_farther_of_colinear_points() {
    // Anchor (3,0); (2,1) and (1,2) lie on the same ray from it.
    let pts = vec![
        vector![3.0, 0.0, 0.0],
        vector![2.0, 1.0, 0.0],
        vector![1.0, 2.0, 0.0],
        vector![0.0, 0.0, 0.0],
    ];
    let hull = convex_hull_2d(&pts).unwrap();
    assert_eq!(hull.len(), 3);
    assert!(!hull.contains(&vector![2.0, 1.0, 0.0]));
    assert!(hull.contains(&vector![1.0, 2.0, 0.0]));
}

#[test]
fn hull2d_degenerate_inputs() {
    let colinear = [
        vector![0.0, 0.0, 0.0],
        vector![1.0, 1.0, 1.0],
        vector![2.0, 2.0, 2.0],
    ];
    let hull = ConvexHull2D::new(&colinear);
    assert!(!hull.has_result());
    assert!(hull.result().is_empty());
    assert!(!ConvexHull2D::new(&colinear[..2]).has_result());
    assert!(!ConvexHull2D::new(&[]).has_result());
    let dupes = [vector![1.0, 2.0, 3.0]; 5];
    assert!(convex_hull_2d(&dupes).is_none());
}

#[test]
fn hull2d_vertical_plane_is_ccw_about_dominant_axis() {
    // Points in the plane x = 4; dominant axis X, projected coordinates (y, z).
    let pts = vec![
        vector![4.0, 0.0, 0.0],
        vector![4.0, 0.0, 2.0],
        vector![4.0, 2.0, 2.0],
        vector![4.0, 2.0, 0.0],
        vector![4.0, 1.0, 1.0],
    ];
    let hull = convex_hull_2d(&pts).unwrap();
    assert_eq!(hull.len(), 4);
    let n = (hull[1] - hull[0]).cross(&(hull[2] - hull[0]));
    assert!(n.x > 0.0);
    assert!(hull.iter().all(|p| p.x == 4.0));
}

#[test]
fn draw_points_is_replayable() {
    let shape = rand::CloudShape::OnSphere {
        center: vector![1.0, 0.0, 0.0],
        radius: 2.0,
    };
    let a = rand::draw_points(shape, 16, rand::ReplayToken::new(7, 0));
    let b = rand::draw_points(shape, 16, rand::ReplayToken::new(7, 0));
    let c = rand::draw_points(shape, 16, rand::ReplayToken::new(7, 1));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a
        .iter()
        .all(|p| ((p - vector![1.0, 0.0, 0.0]).norm() - 2.0).abs() < 1e-9));
    let plane = rand::CloudShape::OnPlane {
        center: Vector3::zeros(),
        normal: vector![0.0, 1.0, 1.0],
        radius: 1.0,
    };
    let pts = rand::draw_points(plane, 32, rand::ReplayToken::new(1, 2));
    assert!(pts.iter().all(|p| (p.y + p.z).abs() < 1e-9 && p.norm() <= 1.0 + 1e-9));
}

// Embeddings of the xy plane into 3D with each of the three dominant axes.
fn embed(kind: u8, x: f64, y: f64) -> Vector3<f64> {
    match kind {
        0 => vector![x, y, 0.25 * x - 0.5 * y + 3.0],
        1 => vector![0.3 * x + 0.1 * y - 1.0, x, y],
        _ => vector![y, 0.2 * x + 0.4 * y, x],
    }
}

fn embed_axis(kind: u8) -> Axis {
    match kind {
        0 => Axis::Z,
        1 => Axis::X,
        _ => Axis::Y,
    }
}

fn cyclic_eq(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if a.is_empty() {
        return true;
    }
    (0..b.len()).any(|s| (0..a.len()).all(|i| a[i] == b[(s + i) % b.len()]))
}

proptest! {
    #[test]
    fn hull2d_orientation_containment_idempotence(
        coords in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 3..40),
        kind in 0u8..3,
    ) {
        let pts: Vec<Vector3<f64>> = coords.iter().map(|&(x, y)| embed(kind, x, y)).collect();
        let hull = ConvexHull2D::new(&pts);
        prop_assume!(hull.has_result());
        let h = hull.result();
        let axis = embed_axis(kind);
        let s: Vec<Vector3<f64>> = h.iter().map(|p| swizzle(*p, axis)).collect();
        let n = s.len();
        // counter-clockwise, strictly convex
        for i in 0..n {
            prop_assert!(is_left(s[i], s[(i + 1) % n], s[(i + 2) % n]) >= 0.0);
        }
        // every input point on or inside
        for p in &pts {
            let q = swizzle(*p, axis);
            for i in 0..n {
                let a = s[i];
                let b = s[(i + 1) % n];
                let tol = 1e-9 * (1.0 + (b - a).norm() * (q - a).norm());
                prop_assert!(is_left(a, b, q) >= -tol);
            }
        }
        // hull of the hull is the hull
        let again = ConvexHull2D::new(h);
        prop_assert!(cyclic_eq(again.result(), h));
    }
}
