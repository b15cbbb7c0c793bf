//! Navigation, face geometry and boundary-ring surgery.
//!
//! Everything here is a building block for the algorithms in `construct`,
//! `edit` and `hull`; none of it keeps the global invariants on its own.

use nalgebra::Vector3;

use super::entities::{Edge, EdgeId, Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
use super::{Callback, Polyhedron};
use crate::geom::cfg::{COLINEAR_EPSILON, POINT_STATUS_EPSILON};
use crate::geom::{is_almost_zero, Plane, PointStatus};

/// Half-edges of one face boundary in ring order.
pub struct Boundary<'a> {
    poly: &'a Polyhedron,
    cursor: HalfEdgeId,
    remaining: usize,
}

impl Iterator for Boundary<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.cursor;
        self.cursor = self.poly.half_edges[h].next;
        self.remaining -= 1;
        Some(h)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Boundary<'_> {}

impl Polyhedron {
    // ---- navigation -------------------------------------------------------

    #[inline]
    pub fn origin(&self, h: HalfEdgeId) -> VertexId {
        self.half_edges[h].origin
    }

    #[inline]
    pub fn destination(&self, h: HalfEdgeId) -> VertexId {
        self.origin(self.half_edges[h].next)
    }

    #[inline]
    pub(crate) fn next(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[h].next
    }

    #[inline]
    pub(crate) fn previous(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[h].previous
    }

    /// The other half of `h`'s edge, if the edge is fully specified.
    #[inline]
    pub fn twin(&self, h: HalfEdgeId) -> Option<HalfEdgeId> {
        let e = self.half_edges[h].edge?;
        self.edges[e].twin_of(h)
    }

    /// Twin of a half-edge that must have one.
    pub(crate) fn expect_twin(&self, h: HalfEdgeId) -> HalfEdgeId {
        match self.twin(h) {
            Some(t) => t,
            None => panic!("half-edge {h:?} has no twin"),
        }
    }

    /// Face on the other side of `h`.
    #[inline]
    pub(crate) fn neighbour(&self, h: HalfEdgeId) -> Option<FaceId> {
        self.twin(h).and_then(|t| self.half_edges[t].face)
    }

    /// Next half-edge around `origin(h)`: the twin of `h`'s predecessor.
    #[inline]
    pub fn next_incident(&self, h: HalfEdgeId) -> Option<HalfEdgeId> {
        self.twin(self.previous(h))
    }

    pub fn boundary(&self, f: FaceId) -> Boundary<'_> {
        let face = &self.faces[f];
        Boundary {
            poly: self,
            cursor: face.boundary,
            remaining: face.len,
        }
    }

    pub fn face_vertices(&self, f: FaceId) -> impl Iterator<Item = VertexId> + '_ {
        self.boundary(f).map(move |h| self.origin(h))
    }

    pub fn face_vertex_positions(&self, f: FaceId) -> Vec<Vector3<f64>> {
        self.face_vertices(f).map(|v| self.position(v)).collect()
    }

    /// Half-edges leaving `v`, starting at its leaving half-edge. Stops early
    /// at an open edge.
    pub fn incident_half_edges(&self, v: VertexId) -> Vec<HalfEdgeId> {
        let mut out = Vec::new();
        let Some(start) = self.vertices[v].leaving else {
            return out;
        };
        let mut cur = start;
        loop {
            out.push(cur);
            match self.next_incident(cur) {
                Some(n) if n != start && out.len() <= self.half_edges.len() => cur = n,
                _ => break,
            }
        }
        out
    }

    /// Origin and destination of the edge's first half-edge.
    #[inline]
    pub fn edge_vertices(&self, e: EdgeId) -> (VertexId, VertexId) {
        let first = self.edges[e].first;
        (self.origin(first), self.destination(first))
    }

    #[inline]
    pub fn edge_vector(&self, e: EdgeId) -> Vector3<f64> {
        let (a, b) = self.edge_vertices(e);
        self.position(b) - self.position(a)
    }

    /// Faces of the first and second half-edge.
    #[inline]
    pub fn edge_faces(&self, e: EdgeId) -> (Option<FaceId>, Option<FaceId>) {
        let edge = &self.edges[e];
        (
            self.half_edges[edge.first].face,
            edge.second.and_then(|h| self.half_edges[h].face),
        )
    }

    // ---- face geometry ----------------------------------------------------

    /// Position of the face's entry vertex.
    #[inline]
    pub fn face_origin(&self, f: FaceId) -> Vector3<f64> {
        self.position(self.origin(self.faces[f].boundary))
    }

    /// Unit normal from the vertex positions: the first consecutive triple
    /// whose cross product is not almost zero, else the largest one. Zero for
    /// a face whose vertices are all colinear.
    pub fn face_normal(&self, f: FaceId) -> Vector3<f64> {
        let pts = self.face_vertex_positions(f);
        let n = pts.len();
        let mut best = Vector3::zeros();
        for i in 0..n {
            let (p1, p2, p3) = (pts[i], pts[(i + 1) % n], pts[(i + 2) % n]);
            let c = (p2 - p1).cross(&(p3 - p1));
            if !is_almost_zero(c) {
                return c.normalize();
            }
            if c.norm_squared() > best.norm_squared() {
                best = c;
            }
        }
        if best == Vector3::zeros() {
            best
        } else {
            best.normalize()
        }
    }

    pub fn face_centroid(&self, f: FaceId) -> Vector3<f64> {
        let pts = self.face_vertex_positions(f);
        pts.iter().sum::<Vector3<f64>>() / pts.len() as f64
    }

    /// Plane through the face's entry vertex with the geometric normal.
    #[inline]
    pub fn face_geometric_plane(&self, f: FaceId) -> Plane {
        Plane::new_at(self.face_origin(f), self.face_normal(f))
    }

    #[inline]
    pub fn face_point_status(&self, f: FaceId, p: Vector3<f64>, eps: f64) -> PointStatus {
        self.face_geometric_plane(f).point_status(p, eps)
    }

    fn face_vertices_on_plane(&self, f: FaceId, plane: &Plane) -> bool {
        self.face_vertices(f).all(|v| {
            plane.point_status(self.position(v), POINT_STATUS_EPSILON) == PointStatus::Inside
        })
    }

    /// Parallel normals and each face's vertices on the other's plane.
    pub fn coplanar(&self, a: FaceId, b: FaceId) -> bool {
        let na = self.face_normal(a);
        let nb = self.face_normal(b);
        if 1.0 - na.dot(&nb) >= COLINEAR_EPSILON {
            return false;
        }
        self.face_vertices_on_plane(b, &Plane::new_at(self.face_origin(a), na))
            && self.face_vertices_on_plane(a, &Plane::new_at(self.face_origin(b), nb))
    }

    // ---- construction primitives -------------------------------------------

    #[inline]
    pub(crate) fn add_vertex(&mut self, position: Vector3<f64>) -> VertexId {
        self.vertices.push_back(Vertex::new(position))
    }

    #[inline]
    pub(crate) fn add_half_edge(&mut self, origin: VertexId) -> HalfEdgeId {
        self.half_edges.push_back_with(|me| HalfEdge::detached(me, origin))
    }

    /// Links `ring` into a closed `next`/`previous` cycle.
    pub(crate) fn link_ring(&mut self, ring: &[HalfEdgeId]) {
        let n = ring.len();
        for i in 0..n {
            let h = &mut self.half_edges[ring[i]];
            h.next = ring[(i + 1) % n];
            h.previous = ring[(i + n - 1) % n];
        }
    }

    /// New face owning `ring` (linked here). Each origin's leaving half-edge is
    /// set to its ring member and the plane comes from the callback. Callers
    /// report `face_was_created` once the face's edges are in place.
    pub(crate) fn add_face(&mut self, ring: &[HalfEdgeId], cb: &dyn Callback) -> FaceId {
        debug_assert!(ring.len() >= 3);
        self.link_ring(ring);
        let f = self.faces.push_back(Face {
            boundary: ring[0],
            len: ring.len(),
            plane: Plane::new(Vector3::zeros(), 0.0),
        });
        for &h in ring {
            self.half_edges[h].face = Some(f);
            let origin = self.half_edges[h].origin;
            self.vertices[origin].leaving = Some(h);
        }
        self.refresh_plane(f, cb);
        f
    }

    /// Recomputes the cached plane of `f` through the callback.
    #[inline]
    pub(crate) fn refresh_plane(&mut self, f: FaceId, cb: &dyn Callback) {
        let plane = cb.plane(self, f);
        self.faces[f].plane = plane;
    }

    pub(crate) fn add_edge(&mut self, first: HalfEdgeId, second: Option<HalfEdgeId>) -> EdgeId {
        let e = self.edges.push_back(Edge { first, second });
        self.half_edges[first].edge = Some(e);
        if let Some(s) = second {
            self.half_edges[s].edge = Some(e);
        }
        e
    }

    // ---- boundary surgery ---------------------------------------------------

    /// Half-edges from `from` to `to` (inclusive) following `next`.
    fn ring_range(&self, from: HalfEdgeId, to: HalfEdgeId) -> Vec<HalfEdgeId> {
        let mut out = vec![from];
        let mut cur = from;
        while cur != to {
            cur = self.next(cur);
            debug_assert!(cur != from, "range end is not on the ring");
            out.push(cur);
        }
        out
    }

    /// Detaches `[from, to]` from the boundary of `f` and returns it in ring
    /// order. The detached half-edges lose their face and become one-element
    /// rings; their edges and origins are untouched.
    pub(crate) fn remove_from_boundary(
        &mut self,
        f: FaceId,
        from: HalfEdgeId,
        to: HalfEdgeId,
    ) -> Vec<HalfEdgeId> {
        let range = self.ring_range(from, to);
        let before = self.previous(from);
        let after = self.next(to);
        let face = &mut self.faces[f];
        debug_assert!(range.len() <= face.len);
        face.len -= range.len();
        if face.len > 0 {
            if range.contains(&face.boundary) {
                face.boundary = after;
            }
            self.half_edges[before].next = after;
            self.half_edges[after].previous = before;
        }
        for &h in &range {
            let he = &mut self.half_edges[h];
            he.face = None;
            he.next = h;
            he.previous = h;
        }
        range
    }

    /// Replaces `[from, to]` in the boundary of `f` by the chain `with` and
    /// deletes the replaced half-edges.
    pub(crate) fn replace_boundary(
        &mut self,
        f: FaceId,
        from: HalfEdgeId,
        to: HalfEdgeId,
        with: &[HalfEdgeId],
    ) {
        debug_assert!(!with.is_empty());
        let before = self.previous(from);
        let after = self.next(to);
        let removed = self.remove_from_boundary(f, from, to);
        debug_assert!(self.faces[f].len > 0, "cannot replace a whole boundary");
        for h in removed {
            self.half_edges.remove(h);
        }
        let mut prev = before;
        for &h in with {
            self.half_edges[prev].next = h;
            let he = &mut self.half_edges[h];
            he.previous = prev;
            he.face = Some(f);
            prev = h;
        }
        self.half_edges[prev].next = after;
        self.half_edges[after].previous = prev;
        self.faces[f].len += with.len();
    }

    /// Reverses the winding of `f`: every half-edge now runs from its old
    /// destination to its old origin, edges stay attached, and the cached
    /// plane is flipped.
    pub(crate) fn flip_face(&mut self, f: FaceId) {
        let ring: Vec<HalfEdgeId> = self.boundary(f).collect();
        let destinations: Vec<VertexId> = ring.iter().map(|&h| self.destination(h)).collect();
        for (&h, &dest) in ring.iter().zip(&destinations) {
            let he = &mut self.half_edges[h];
            std::mem::swap(&mut he.next, &mut he.previous);
            he.origin = dest;
            self.vertices[dest].leaving = Some(h);
        }
        let face = &mut self.faces[f];
        face.plane = face.plane.flip();
    }
}
