//! In-place mutations: edge collapse, degenerate-face removal, face merging
//! and corner chopping, edge healing and vertex snapping.
//!
//! Every public operation leaves the mesh satisfying `check_invariant`
//! (asserted in debug builds). Entities are unlinked from all rings before
//! their slots are freed.

use tracing::{debug, trace};

use super::entities::{EdgeId, FaceId, HalfEdgeId, VertexId};
use super::{Callback, DefaultCallback, Polyhedron};
use crate::geom::correct_vec;

impl Polyhedron {
    /// Collapses `e` by merging its second vertex into its first.
    ///
    /// Returns the edge that followed `e` in the edge list, advanced past any
    /// edge deleted along the way (`None` if no edge is left).
    pub fn remove_edge(&mut self, e: EdgeId) -> Option<EdgeId> {
        self.remove_edge_with(e, &mut DefaultCallback)
    }

    pub fn remove_edge_with(&mut self, e: EdgeId, cb: &mut dyn Callback) -> Option<EdgeId> {
        let first = self.edges[e].first;
        let Some(second) = self.edges[e].second else {
            panic!("cannot remove partially specified edge {e:?}");
        };
        let keep = self.origin(first);
        let gone = self.origin(second);
        trace!(?e, ?keep, ?gone, "remove edge");

        // Walk the ring of half-edges leaving `gone`; each one now leaves `keep`.
        while let Some(leaving) = self.vertices[gone].leaving {
            let following = self.next_incident(leaving);
            self.half_edges[leaving].origin = keep;
            self.vertices[gone].leaving = following.filter(|&h| self.origin(h) == gone);
        }

        self.unlink_collapsed(first, keep, cb);
        self.unlink_collapsed(second, keep, cb);
        self.half_edges.remove(first);
        self.half_edges.remove(second);

        cb.vertex_will_be_deleted(self, gone);
        self.vertices.remove(gone);
        let mut result = (self.edges.len() > 1).then(|| self.edges.next(e));
        self.edges.remove(e);

        // Collapsing may leave two faces around `keep` in one plane.
        'scan: while self.vertices.contains(keep) {
            for h in self.incident_half_edges(keep) {
                let (Some(f), Some(n)) = (self.half_edges[h].face, self.neighbour(h)) else {
                    continue;
                };
                if f != n && self.coplanar(f, n) {
                    result = self.merge_neighbours_with(h, result, cb);
                    continue 'scan;
                }
            }
            break;
        }

        if self.vertices.contains(keep) {
            let changed: Vec<FaceId> = self
                .incident_half_edges(keep)
                .into_iter()
                .filter_map(|h| self.half_edges[h].face)
                .collect();
            for f in changed {
                self.refresh_plane(f, &*cb);
                cb.face_did_change(self, f);
            }
        }

        self.update_bounds();
        // Collapsing a tetrahedron leaves two faces glued onto each other.
        debug_assert!(!self.is_polyhedron() || self.check_invariant());
        result
    }

    /// Takes a half-edge of the collapsed edge out of its face, removing the
    /// face if only two half-edges remain.
    fn unlink_collapsed(&mut self, h: HalfEdgeId, keep: VertexId, cb: &mut dyn Callback) {
        self.vertices[keep].leaving = self.twin(self.previous(h));
        let Some(f) = self.half_edges[h].face else {
            return;
        };
        self.remove_from_boundary(f, h, h);
        if self.faces[f].len == 2 {
            self.remove_degenerate_face(f, cb);
        }
    }

    /// Removes a two-sided face, gluing the faces on either side of it
    /// together along one edge.
    pub(crate) fn remove_degenerate_face(&mut self, f: FaceId, cb: &mut dyn Callback) {
        debug_assert_eq!(self.faces[f].len, 2);
        let h1 = self.faces[f].boundary;
        let h2 = self.next(h1);
        let (v1, v2) = (self.origin(h1), self.origin(h2));
        let t1 = self.expect_twin(h1);
        let t2 = self.expect_twin(h2);

        self.vertices[v1].leaving = Some(t2);
        self.vertices[v2].leaving = Some(t1);

        let (Some(kept), Some(dropped)) = (self.half_edges[h1].edge, self.half_edges[h2].edge)
        else {
            panic!("degenerate face {f:?} has a half-edge without an edge");
        };
        let edge = &mut self.edges[kept];
        edge.first = t1;
        edge.second = Some(t2);
        self.half_edges[t2].edge = Some(kept);
        self.edges.remove(dropped);

        cb.face_will_be_deleted(self, f);
        self.faces.remove(f);
        self.half_edges.remove(h1);
        self.half_edges.remove(h2);
    }

    /// Merges the face of `border` into the face across `border`.
    ///
    /// The shared border is extended in both directions over every half-edge
    /// that separates the same two faces. `valid_edge` is advanced past any
    /// edge deleted here and returned.
    pub fn merge_neighbours(
        &mut self,
        border: HalfEdgeId,
        valid_edge: Option<EdgeId>,
    ) -> Option<EdgeId> {
        self.merge_neighbours_with(border, valid_edge, &mut DefaultCallback)
    }

    pub fn merge_neighbours_with(
        &mut self,
        border: HalfEdgeId,
        valid_edge: Option<EdgeId>,
        cb: &mut dyn Callback,
    ) -> Option<EdgeId> {
        let Some(face) = self.half_edges[border].face else {
            panic!("half-edge {border:?} is not on a face boundary");
        };
        let Some(neighbour) = self.neighbour(border) else {
            panic!("half-edge {border:?} has no neighbouring face");
        };
        let len = self.faces[face].len;

        let mut border_first = border;
        let mut border_last = border;
        let mut border_len = 1;
        while border_len < len && self.neighbour(self.previous(border_first)) == Some(neighbour) {
            border_first = self.previous(border_first);
            border_len += 1;
        }
        while border_len < len && self.neighbour(self.next(border_last)) == Some(neighbour) {
            border_last = self.next(border_last);
            border_len += 1;
        }
        assert!(border_len < len, "faces {face:?} and {neighbour:?} overlap");

        let twin_last = self.expect_twin(border_first);
        let twin_first = self.expect_twin(border_last);
        let remaining_first = self.next(border_last);
        let remaining_last = self.previous(border_first);
        trace!(?face, ?neighbour, border_len, "merge faces");

        cb.faces_will_be_merged(self, neighbour, face);

        let corner_a = self.origin(border_first);
        let corner_b = self.origin(twin_first);
        self.vertices[corner_a].leaving = Some(self.next(twin_last));
        self.vertices[corner_b].leaving = Some(remaining_first);

        let border_ring = self.remove_from_boundary(face, border_first, border_last);
        let remaining = self.remove_from_boundary(face, remaining_first, remaining_last);
        self.replace_boundary(neighbour, twin_first, twin_last, &remaining);

        let doomed: Vec<EdgeId> = border_ring
            .iter()
            .filter_map(|&h| self.half_edges[h].edge)
            .collect();
        let valid_edge = self.advance_past(valid_edge, &doomed);

        for &h in &border_ring {
            if let Some(e) = self.half_edges[h].edge {
                self.edges.remove(e);
            }
            if h != border_first {
                let v = self.origin(h);
                cb.vertex_will_be_deleted(self, v);
                self.vertices.remove(v);
            }
            self.half_edges.remove(h);
        }
        self.faces.remove(face);
        self.refresh_plane(neighbour, &*cb);
        cb.face_did_change(self, neighbour);
        valid_edge
    }

    /// First edge at or after `edge` in list order that is not in `doomed`.
    fn advance_past(&self, edge: Option<EdgeId>, doomed: &[EdgeId]) -> Option<EdgeId> {
        let mut cur = edge?;
        for _ in 0..=doomed.len() {
            if !doomed.contains(&cur) {
                return Some(cur);
            }
            cur = self.edges.next(cur);
        }
        None
    }

    /// Cuts the corner at the origin of `h` off its face. The triangle over
    /// the predecessor of `h` and `h` itself becomes a face of its own,
    /// separated from the rest by a new edge. Undone by `merge_neighbours`
    /// across that edge.
    ///
    /// Panics if `h` is not on a face with more than three vertices.
    pub fn chop_corner(&mut self, h: HalfEdgeId) -> FaceId {
        self.chop_corner_with(h, &mut DefaultCallback)
    }

    pub fn chop_corner_with(&mut self, h: HalfEdgeId, cb: &mut dyn Callback) -> FaceId {
        let Some(face) = self.half_edges[h].face else {
            panic!("half-edge {h:?} is not on a face boundary");
        };
        assert!(self.faces[face].len > 3, "face {face:?} is a triangle");
        let previous = self.previous(h);
        let before = self.previous(previous);
        let after = self.next(h);
        let (from, to) = (self.origin(previous), self.destination(h));
        trace!(?face, ?from, ?to, "chop corner");

        self.remove_from_boundary(face, previous, h);
        let chord = self.add_half_edge(from);
        let chord_twin = self.add_half_edge(to);
        let he = &mut self.half_edges[chord];
        he.previous = before;
        he.next = after;
        he.face = Some(face);
        self.half_edges[before].next = chord;
        self.half_edges[after].previous = chord;
        self.faces[face].len += 1;

        let corner = self.add_face(&[previous, h, chord_twin], &*cb);
        self.add_edge(chord, Some(chord_twin));
        self.refresh_plane(face, &*cb);
        cb.face_was_split(self, face, corner);
        debug_assert!(!self.is_polyhedron() || self.check_invariant());
        corner
    }

    /// Chops corners off `f` until it is a triangle; returns the triangles
    /// split off, in order.
    pub fn triangulate_face(&mut self, f: FaceId) -> Vec<FaceId> {
        self.triangulate_face_with(f, &mut DefaultCallback)
    }

    pub fn triangulate_face_with(&mut self, f: FaceId, cb: &mut dyn Callback) -> Vec<FaceId> {
        let mut corners = Vec::with_capacity(self.faces[f].len.saturating_sub(3));
        while self.faces[f].len > 3 {
            let h = self.next(self.faces[f].boundary);
            corners.push(self.chop_corner_with(h, cb));
        }
        corners
    }

    /// Collapses every edge shorter than `min_length`.
    ///
    /// Unlike a single sweep over the edge list, passes repeat until one
    /// removes nothing, so collapses that create new short edges are healed
    /// too. Returns whether the result is still a genuine polyhedron; if so,
    /// every edge is at least `min_length` long.
    pub fn heal_edges(&mut self, min_length: f64) -> bool {
        self.heal_edges_with(min_length, &mut DefaultCallback)
    }

    pub fn heal_edges_with(&mut self, min_length: f64, cb: &mut dyn Callback) -> bool {
        let mut removed = 0;
        loop {
            let pass = self.heal_pass(min_length * min_length, cb);
            removed += pass;
            if pass == 0 || !self.is_polyhedron() || self.check_edge_lengths(min_length) {
                break;
            }
        }
        self.update_bounds();
        debug!(
            removed,
            vertices = self.vertex_count(),
            faces = self.face_count(),
            "healed edges"
        );
        debug_assert!(!self.is_polyhedron() || self.check_edge_lengths(min_length));
        self.is_polyhedron()
    }

    /// One sweep over the edge list. `examined` counts kept edges; when a
    /// collapse deletes more than the collapsed edge, the excess may have been
    /// examined already and is subtracted again.
    fn heal_pass(&mut self, min_length2: f64, cb: &mut dyn Callback) -> usize {
        let mut removed = 0;
        let mut examined: isize = 0;
        let mut cur = self.edges.front();
        while let Some(e) = cur {
            if examined >= self.edges.len() as isize || !self.is_polyhedron() {
                break;
            }
            if self.edge_vector(e).norm_squared() < min_length2 {
                let before = self.edges.len();
                cur = self.remove_edge_with(e, cb);
                let size_delta = (before - self.edges.len()) as isize - 1;
                examined -= size_delta;
                removed += 1;
            } else {
                cur = Some(self.edges.next(e));
                examined += 1;
            }
        }
        removed
    }

    /// Snaps every vertex coordinate onto the `2^-decimals` grid where it is
    /// within `eps` of it, then refreshes face planes and bounds.
    pub fn correct_vertex_positions(&mut self, decimals: u32, eps: f64) {
        self.correct_vertex_positions_with(decimals, eps, &mut DefaultCallback)
    }

    pub fn correct_vertex_positions_with(
        &mut self,
        decimals: u32,
        eps: f64,
        cb: &mut dyn Callback,
    ) {
        for v in self.vertices.handles() {
            let vertex = &mut self.vertices[v];
            vertex.position = correct_vec(vertex.position, decimals, eps);
        }
        self.update_bounds();
        self.update_face_planes(cb);
    }

    /// Recomputes every cached face plane and reports `face_did_change`.
    pub fn update_face_planes(&mut self, cb: &mut dyn Callback) {
        for f in self.faces.handles() {
            self.refresh_plane(f, &*cb);
            cb.face_did_change(self, f);
        }
    }
}
