//! Construction: axis-aligned boxes, deep copies and point sets.

use std::collections::HashMap;

use nalgebra::Vector3;

use super::entities::{Face, HalfEdgeId, VertexId};
use super::{Callback, CopyCallback, DefaultCallback, Polyhedron};
use crate::geom::BBox3;

impl Polyhedron {
    /// Box with the given bounds, or a single point if `min == max`.
    pub fn from_bounds(bounds: BBox3) -> Self {
        Self::from_bounds_with(bounds, &mut DefaultCallback)
    }

    #[inline]
    pub fn from_min_max(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self::from_bounds(BBox3::new(min, max))
    }

    /// Box construction with hard-coded topology: 8 vertices, 6 quads and
    /// 12 edges, every face wound counter-clockwise seen from outside.
    ///
    /// Requires `min < max` in every coordinate unless `min == max`.
    pub fn from_bounds_with(bounds: BBox3, cb: &mut dyn Callback) -> Self {
        let mut p = Self::new();
        let (lo, hi) = (bounds.min, bounds.max);
        if lo == hi {
            let v = p.add_vertex(lo);
            p.update_bounds();
            cb.vertex_was_created(&p, v);
            return p;
        }

        let v1 = p.add_vertex(Vector3::new(lo.x, lo.y, lo.z));
        let v2 = p.add_vertex(Vector3::new(lo.x, lo.y, hi.z));
        let v3 = p.add_vertex(Vector3::new(lo.x, hi.y, lo.z));
        let v4 = p.add_vertex(Vector3::new(lo.x, hi.y, hi.z));
        let v5 = p.add_vertex(Vector3::new(hi.x, lo.y, lo.z));
        let v6 = p.add_vertex(Vector3::new(hi.x, lo.y, hi.z));
        let v7 = p.add_vertex(Vector3::new(hi.x, hi.y, lo.z));
        let v8 = p.add_vertex(Vector3::new(hi.x, hi.y, hi.z));

        let front = p.add_quad([v1, v5, v6, v2], cb);
        let left = p.add_quad([v1, v2, v4, v3], cb);
        let bottom = p.add_quad([v1, v3, v7, v5], cb);
        let top = p.add_quad([v2, v6, v8, v4], cb);
        let back = p.add_quad([v3, v4, v8, v7], cb);
        let right = p.add_quad([v5, v7, v8, v6], cb);

        let twins = [
            (front[3], left[0]),
            (left[3], bottom[0]),
            (front[0], bottom[3]),
            (left[1], top[3]),
            (top[0], front[2]),
            (left[2], back[0]),
            (bottom[1], back[3]),
            (top[2], back[1]),
            (front[1], right[3]),
            (right[0], bottom[2]),
            (right[2], top[1]),
            (right[1], back[2]),
        ];
        for (first, second) in twins {
            p.add_edge(first, Some(second));
        }
        p.update_bounds();

        for v in p.vertices.handles() {
            cb.vertex_was_created(&p, v);
        }
        for f in p.faces.handles() {
            cb.face_was_created(&p, f);
        }
        debug_assert!(p.check_invariant());
        p
    }

    fn add_quad(&mut self, corners: [VertexId; 4], cb: &dyn Callback) -> [HalfEdgeId; 4] {
        let ring = corners.map(|v| self.add_half_edge(v));
        self.add_face(&ring, cb);
        ring
    }

    /// Convex hull of `points`, built by incremental insertion.
    pub fn from_points(points: &[Vector3<f64>]) -> Self {
        Self::from_points_with(points, &mut DefaultCallback)
    }

    pub fn from_points_with(points: &[Vector3<f64>], cb: &mut dyn Callback) -> Self {
        let mut p = Self::new();
        p.add_points_with(points, cb);
        p
    }

    /// Deep copy in three passes: vertices, then faces with their boundary
    /// half-edges (indexed by the original half-edge), then edges, which
    /// reuse those half-edges or copy the ones that belong to no face.
    pub fn copy_with(&self, cb: &mut dyn CopyCallback) -> Polyhedron {
        let mut out = Polyhedron::new();

        let mut vmap: HashMap<VertexId, VertexId> = HashMap::with_capacity(self.vertex_count());
        for (v, vertex) in self.vertices.iter() {
            let copy = out.add_vertex(vertex.position);
            vmap.insert(v, copy);
            cb.vertex_was_copied(v, copy);
        }

        let mut hmap: HashMap<HalfEdgeId, HalfEdgeId> = HashMap::new();
        for (f, face) in self.faces.iter() {
            let ring: Vec<HalfEdgeId> = self
                .boundary(f)
                .map(|h| {
                    let copy = out.add_half_edge(vmap[&self.origin(h)]);
                    hmap.insert(h, copy);
                    copy
                })
                .collect();
            out.link_ring(&ring);
            let copy = out.faces.push_back(Face {
                boundary: ring[0],
                len: ring.len(),
                plane: face.plane,
            });
            for &h in &ring {
                out.half_edges[h].face = Some(copy);
            }
            cb.face_was_copied(f, copy);
        }

        let mut find_or_copy = |out: &mut Polyhedron, h: HalfEdgeId| -> HalfEdgeId {
            *hmap
                .entry(h)
                .or_insert_with(|| out.add_half_edge(vmap[&self.origin(h)]))
        };
        for (_, edge) in self.edges.iter() {
            let first = find_or_copy(&mut out, edge.first);
            let second = edge.second.map(|h| find_or_copy(&mut out, h));
            out.add_edge(first, second);
        }

        for (v, vertex) in self.vertices.iter() {
            out.vertices[vmap[&v]].leaving = vertex.leaving.and_then(|h| hmap.get(&h).copied());
        }
        out.update_bounds();
        out
    }
}

impl Clone for Polyhedron {
    fn clone(&self) -> Self {
        self.copy_with(&mut DefaultCallback)
    }
}

/// Same counts and every vertex, edge and face of `self` found in `other` at
/// exactly the same positions.
impl PartialEq for Polyhedron {
    fn eq(&self, other: &Self) -> bool {
        if self.vertex_count() != other.vertex_count()
            || self.edge_count() != other.edge_count()
            || self.face_count() != other.face_count()
        {
            return false;
        }
        self.vertices
            .iter()
            .all(|(_, v)| other.has_vertex(v.position, 0.0))
            && self.edges().all(|e| {
                let (a, b) = self.edge_vertices(e);
                other.has_edge(self.position(a), self.position(b), 0.0)
            })
            && self
                .faces()
                .all(|f| other.has_face(&self.face_vertex_positions(f), 0.0))
    }
}
