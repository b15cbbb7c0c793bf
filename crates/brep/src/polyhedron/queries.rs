//! Read-only lookups: positional matching, closest-entity searches, ray
//! picking and point containment.

use nalgebra::Vector3;

use super::entities::{EdgeId, FaceId, VertexId};
use super::Polyhedron;
use crate::geom::cfg::{ALMOST_ZERO, COLINEAR_EPSILON, POINT_STATUS_EPSILON};
use crate::geom::{PointStatus, Ray};

/// Result of [`Polyhedron::pick_face`]. A miss has no face and a NaN
/// distance.
#[derive(Clone, Copy, Debug)]
pub struct FaceHit {
    pub face: Option<FaceId>,
    pub distance: f64,
}

impl FaceHit {
    #[inline]
    pub fn miss() -> Self {
        Self {
            face: None,
            distance: f64::NAN,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.face.is_some()
    }
}

#[inline]
fn same_position(a: Vector3<f64>, b: Vector3<f64>, eps: f64) -> bool {
    (a - b).amax() <= eps
}

impl Polyhedron {
    /// Whether some vertex lies within `eps` of `position` in every
    /// coordinate.
    pub fn has_vertex(&self, position: Vector3<f64>, eps: f64) -> bool {
        self.vertices
            .iter()
            .any(|(_, v)| same_position(v.position, position, eps))
    }

    pub fn has_all_vertices(&self, positions: &[Vector3<f64>], eps: f64) -> bool {
        positions.iter().all(|&p| self.has_vertex(p, eps))
    }

    pub fn has_any_vertex(&self, positions: &[Vector3<f64>], eps: f64) -> bool {
        positions.iter().any(|&p| self.has_vertex(p, eps))
    }

    /// Edge between the two positions, in either direction.
    pub fn has_edge(&self, p1: Vector3<f64>, p2: Vector3<f64>, eps: f64) -> bool {
        self.edges().any(|e| {
            let (a, b) = self.edge_vertices(e);
            let (a, b) = (self.position(a), self.position(b));
            (same_position(a, p1, eps) && same_position(b, p2, eps))
                || (same_position(a, p2, eps) && same_position(b, p1, eps))
        })
    }

    /// Face whose boundary visits `positions` in this cyclic order, starting
    /// anywhere.
    pub fn has_face(&self, positions: &[Vector3<f64>], eps: f64) -> bool {
        self.faces().any(|f| self.face_matches(f, positions, eps))
    }

    fn face_matches(&self, f: FaceId, positions: &[Vector3<f64>], eps: f64) -> bool {
        let pts = self.face_vertex_positions(f);
        let n = pts.len();
        if n != positions.len() || n == 0 {
            return false;
        }
        (0..n).any(|start| {
            positions
                .iter()
                .enumerate()
                .all(|(i, &p)| same_position(pts[(start + i) % n], p, eps))
        })
    }

    /// Vertex closest to `position` and strictly closer than `max_distance`.
    pub fn find_closest_vertex(
        &self,
        position: Vector3<f64>,
        max_distance: f64,
    ) -> Option<VertexId> {
        let mut best = max_distance * max_distance;
        let mut found = None;
        for (v, vertex) in self.vertices.iter() {
            let d2 = (vertex.position - position).norm_squared();
            if d2 < best {
                best = d2;
                found = Some(v);
            }
        }
        found
    }

    /// Edge minimizing the larger of its endpoints' distances to `p1` and
    /// `p2` (each endpoint matched to the nearer position).
    pub fn find_closest_edge(
        &self,
        p1: Vector3<f64>,
        p2: Vector3<f64>,
        max_distance: f64,
    ) -> Option<EdgeId> {
        let mut best = max_distance;
        let mut found = None;
        for e in self.edges() {
            let (a, b) = self.edge_vertices(e);
            let (a, b) = (self.position(a), self.position(b));
            let d1 = (a - p1).norm().min((b - p1).norm());
            let d2 = (a - p2).norm().min((b - p2).norm());
            let d = d1.max(d2);
            if d < best {
                best = d;
                found = Some(e);
            }
        }
        found
    }

    /// Face whose vertices best match `positions` in cyclic order: the face
    /// minimizing the largest vertex-to-position distance.
    pub fn find_closest_face(
        &self,
        positions: &[Vector3<f64>],
        max_distance: f64,
    ) -> Option<FaceId> {
        let mut best = max_distance;
        let mut found = None;
        for f in self.faces() {
            let d = self.face_distance(f, positions, max_distance);
            if d < best {
                best = d;
                found = Some(f);
            }
        }
        found
    }

    /// Largest distance between the face's vertices and `positions`, aligned
    /// at the vertex closest to the first position. `max_distance` if the
    /// sizes differ or no vertex is close enough to start from.
    fn face_distance(&self, f: FaceId, positions: &[Vector3<f64>], max_distance: f64) -> f64 {
        let pts = self.face_vertex_positions(f);
        let n = pts.len();
        if n != positions.len() || n == 0 {
            return max_distance;
        }
        let mut closest = max_distance;
        let mut start = None;
        for (i, p) in pts.iter().enumerate() {
            let d = (p - positions[0]).norm();
            if d < closest {
                closest = d;
                start = Some(i);
            }
        }
        let Some(start) = start else {
            return max_distance;
        };
        (1..n).fold(closest, |acc, i| {
            acc.max((pts[(start + i) % n] - positions[i]).norm())
        })
    }

    /// First face hit by `ray`. A solid is only hit from outside; a single
    /// polygon is hit from either side.
    pub fn pick_face(&self, ray: &Ray) -> FaceHit {
        let both_sides = self.is_polygon();
        let mut best = FaceHit::miss();
        for f in self.faces() {
            let normal = self.face_normal(f);
            let cos = normal.dot(&ray.direction);
            if cos.abs() <= ALMOST_ZERO || (!both_sides && cos > 0.0) {
                continue;
            }
            let t = ray.intersect_plane(&self.face_geometric_plane(f));
            if t.is_nan() || (best.is_hit() && t >= best.distance) {
                continue;
            }
            if self.face_contains_projected(f, normal, ray.point_at(t)) {
                best = FaceHit {
                    face: Some(f),
                    distance: t,
                };
            }
        }
        best
    }

    /// `p` (assumed on the face plane) lies inside the convex boundary.
    fn face_contains_projected(&self, f: FaceId, normal: Vector3<f64>, p: Vector3<f64>) -> bool {
        self.boundary(f).all(|h| {
            let a = self.position(self.origin(h));
            let b = self.position(self.destination(h));
            let ab = b - a;
            normal.dot(&ab.cross(&(p - a))) >= -COLINEAR_EPSILON * ab.norm()
        })
    }

    /// Inside the solid or on its boundary.
    pub fn contains_point(&self, p: Vector3<f64>) -> bool {
        self.is_polyhedron()
            && self.bounds.contains(p)
            && self
                .faces()
                .all(|f| self.face_point_status(f, p, POINT_STATUS_EPSILON) != PointStatus::Above)
    }

    /// Every vertex of `other` lies inside this solid.
    pub fn contains_polyhedron(&self, other: &Polyhedron) -> bool {
        self.is_polyhedron()
            && other
                .vertices
                .iter()
                .all(|(_, v)| self.contains_point(v.position))
    }
}
