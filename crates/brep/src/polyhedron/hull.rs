//! Incremental convex hull.
//!
//! Purpose
//! - Grow a polyhedron one point at a time through its degenerate stages:
//!   empty, point, segment, polygon, solid.
//!
//! Why this design
//! - Inserting into a solid removes every face the new point is not strictly
//!   below, so faces the point is coplanar with are rebuilt rather than
//!   patched. Points on or inside the surface are ignored.
//! - The replacement cone is woven onto the horizon with consecutive coplanar
//!   triangles fused into one face, so no merge pass is needed afterwards.
//! - Everything that can fail is decided before the first mutation; an
//!   ignored point leaves the polyhedron untouched.
//!
//! Code cross-refs: `convex_hull_2d`, `Polyhedron::add_point`

use std::collections::{HashMap, HashSet};

use nalgebra::Vector3;
use tracing::{debug, trace};

use super::entities::{Edge, FaceId, HalfEdgeId, VertexId};
use super::{Callback, DefaultCallback, Polyhedron};
use crate::geom::cfg::{ALMOST_ZERO, COLINEAR_EPSILON, POINT_STATUS_EPSILON};
use crate::geom::{convex_hull_2d, is_colinear, segment_contains, Plane, PointStatus};

impl Polyhedron {
    /// Adds `position` to the hull. Returns the vertex created (or moved) for
    /// it, `None` if the hull did not change.
    pub fn add_point(&mut self, position: Vector3<f64>) -> Option<VertexId> {
        self.add_point_with(position, &mut DefaultCallback)
    }

    pub fn add_point_with(
        &mut self,
        position: Vector3<f64>,
        cb: &mut dyn Callback,
    ) -> Option<VertexId> {
        let added = match self.vertex_count() {
            0 => Some(self.add_first_point(position, cb)),
            1 => self.add_second_point(position, cb),
            2 => self.add_third_point(position, cb),
            _ if self.is_polygon() => self.add_point_to_polygon(position, cb),
            _ => self.add_point_to_polyhedron(position, cb),
        };
        match added {
            Some(v) => {
                // a coplanar rebuild discards the old vertices and their bounds
                self.update_bounds();
                cb.vertex_was_added(self, v);
                debug_assert!(self.check_invariant());
            }
            None => trace!(?position, "point does not change the hull"),
        }
        added
    }

    /// Adds every point in order; returns how many changed the hull.
    pub fn add_points(&mut self, points: &[Vector3<f64>]) -> usize {
        self.add_points_with(points, &mut DefaultCallback)
    }

    pub fn add_points_with(&mut self, points: &[Vector3<f64>], cb: &mut dyn Callback) -> usize {
        let added = points
            .iter()
            .filter(|&&p| self.add_point_with(p, cb).is_some())
            .count();
        debug!(
            points = points.len(),
            added,
            vertices = self.vertex_count(),
            faces = self.face_count(),
            "added points"
        );
        added
    }

    fn add_first_point(&mut self, position: Vector3<f64>, cb: &mut dyn Callback) -> VertexId {
        let v = self.add_vertex(position);
        cb.vertex_was_created(self, v);
        v
    }

    /// Point to segment: two twin half-edges that own no face.
    fn add_second_point(
        &mut self,
        position: Vector3<f64>,
        cb: &mut dyn Callback,
    ) -> Option<VertexId> {
        let v1 = self.vertices.front()?;
        if self.position(v1) == position {
            return None;
        }
        let v2 = self.add_vertex(position);
        let h1 = self.add_half_edge(v1);
        let h2 = self.add_half_edge(v2);
        self.vertices[v1].leaving = Some(h1);
        self.vertices[v2].leaving = Some(h2);
        self.add_edge(h1, Some(h2));
        cb.vertex_was_created(self, v2);
        Some(v2)
    }

    /// Segment to longer segment or triangle.
    fn add_third_point(
        &mut self,
        position: Vector3<f64>,
        cb: &mut dyn Callback,
    ) -> Option<VertexId> {
        let v1 = self.vertices.front()?;
        let v2 = self.vertices.next(v1);
        let (a, b) = (self.position(v1), self.position(v2));

        if is_colinear(a, b, position, COLINEAR_EPSILON) {
            if segment_contains(a, b, position, ALMOST_ZERO) {
                return None;
            }
            // Replace whichever endpoint now lies between the other two points.
            let moved = if segment_contains(position, b, a, ALMOST_ZERO) {
                v1
            } else {
                v2
            };
            cb.vertex_will_be_removed(self, moved);
            self.vertices[moved].position = position;
            return Some(moved);
        }

        let (Some(h1), Some(h2)) = (self.vertices[v1].leaving, self.vertices[v2].leaving) else {
            panic!("segment vertices without leaving half-edges");
        };
        let Some(e) = self.half_edges[h1].edge else {
            panic!("segment half-edge {h1:?} has no edge");
        };
        self.edges[e] = Edge {
            first: h1,
            second: None,
        };
        self.half_edges[h2].edge = None;

        let v3 = self.add_vertex(position);
        let h3 = self.add_half_edge(v3);
        let f = self.add_face(&[h1, h2, h3], &*cb);
        self.add_edge(h2, None);
        self.add_edge(h3, None);
        cb.vertex_was_created(self, v3);
        cb.face_was_created(self, f);
        Some(v3)
    }

    fn add_point_to_polygon(
        &mut self,
        position: Vector3<f64>,
        cb: &mut dyn Callback,
    ) -> Option<VertexId> {
        let f = self.faces.front()?;
        let flip = match self.face_point_status(f, position, POINT_STATUS_EPSILON) {
            PointStatus::Inside => return self.add_coplanar_point(f, position, cb),
            PointStatus::Above => true,
            PointStatus::Below => false,
        };

        // The cone is woven below the face, so the face must point away from it.
        if flip {
            self.flip_face(f);
        }
        let horizon: Vec<HalfEdgeId> = self.boundary(f).collect();
        let Some(groups) = self.weave_groups(&horizon, position) else {
            if flip {
                self.flip_face(f);
            }
            return None;
        };
        if flip {
            cb.face_was_flipped(self, f);
        }
        Some(self.weave(&groups, position, cb))
    }

    /// Rebuilds the polygon from the 2D hull of its vertices and `position`,
    /// keeping its orientation.
    fn add_coplanar_point(
        &mut self,
        f: FaceId,
        position: Vector3<f64>,
        cb: &mut dyn Callback,
    ) -> Option<VertexId> {
        if self.has_vertex(position, 0.0) {
            return None;
        }
        let mut points = self.vertex_positions();
        points.push(position);
        let mut hull = convex_hull_2d(&points)?;
        if !hull.contains(&position) {
            return None;
        }
        let hull_normal = (hull[1] - hull[0]).cross(&(hull[2] - hull[0]));
        if hull_normal.dot(&self.face_normal(f)) < 0.0 {
            hull.reverse();
        }

        let dropped: Vec<VertexId> = self
            .vertices
            .iter()
            .filter(|(_, v)| !hull.contains(&v.position))
            .map(|(v, _)| v)
            .collect();
        for v in dropped {
            cb.vertex_will_be_removed(self, v);
        }
        self.discard_all(cb);
        self.make_polygon(&hull, cb);
        self.vertices
            .iter()
            .find(|(_, v)| v.position == position)
            .map(|(v, _)| v)
    }

    /// Deletes every entity with notifications.
    fn discard_all(&mut self, cb: &mut dyn Callback) {
        for f in self.faces.handles() {
            cb.face_will_be_deleted(self, f);
        }
        for v in self.vertices.handles() {
            cb.vertex_will_be_deleted(self, v);
        }
        self.clear();
    }

    /// Single face through `points` (in boundary order) with open edges.
    fn make_polygon(&mut self, points: &[Vector3<f64>], cb: &mut dyn Callback) -> FaceId {
        let vertices: Vec<VertexId> = points.iter().map(|&p| self.add_vertex(p)).collect();
        let ring: Vec<HalfEdgeId> = vertices.iter().map(|&v| self.add_half_edge(v)).collect();
        let f = self.add_face(&ring, &*cb);
        for &h in &ring {
            self.add_edge(h, None);
        }
        for &v in &vertices {
            cb.vertex_was_created(self, v);
        }
        cb.face_was_created(self, f);
        f
    }

    fn add_point_to_polyhedron(
        &mut self,
        position: Vector3<f64>,
        cb: &mut dyn Callback,
    ) -> Option<VertexId> {
        let statuses: Vec<(FaceId, PointStatus)> = self
            .faces()
            .map(|f| (f, self.face_point_status(f, position, POINT_STATUS_EPSILON)))
            .collect();
        if !statuses.iter().any(|(_, s)| *s == PointStatus::Above) {
            return None;
        }
        let removed: Vec<FaceId> = statuses
            .iter()
            .filter(|(_, s)| *s != PointStatus::Below)
            .map(|(f, _)| *f)
            .collect();

        let horizon = self.horizon(&removed)?;
        let groups = self.weave_groups(&horizon, position)?;
        trace!(
            removed = removed.len(),
            horizon = horizon.len(),
            groups = groups.len(),
            "weave cone"
        );
        self.cut_faces(&removed, &horizon, cb);
        Some(self.weave(&groups, position, cb))
    }

    /// Boundary half-edges of kept faces whose twins lie on removed faces,
    /// ordered into one loop. `None` if they do not form a single simple loop
    /// or a kept face touches the removed region in a single vertex.
    fn horizon(&self, removed: &[FaceId]) -> Option<Vec<HalfEdgeId>> {
        let touched: HashSet<VertexId> = removed
            .iter()
            .flat_map(|&f| self.face_vertices(f))
            .collect();
        let removed: HashSet<FaceId> = removed.iter().copied().collect();
        let mut by_origin: HashMap<VertexId, HalfEdgeId> = HashMap::new();
        for f in self.faces().filter(|f| !removed.contains(f)) {
            for h in self.boundary(f) {
                let across = self.neighbour(h)?;
                if removed.contains(&across) && by_origin.insert(self.origin(h), h).is_some() {
                    return None;
                }
            }
        }
        let pinched = self
            .faces()
            .filter(|f| !removed.contains(f))
            .flat_map(|f| self.face_vertices(f))
            .any(|v| touched.contains(&v) && !by_origin.contains_key(&v));
        if pinched {
            return None;
        }

        let start = *by_origin.values().next()?;
        let mut out = vec![start];
        let mut cur = start;
        loop {
            cur = *by_origin.get(&self.destination(cur))?;
            if cur == start {
                break;
            }
            out.push(cur);
            if out.len() > by_origin.len() {
                return None;
            }
        }
        (out.len() == by_origin.len() && out.len() >= 3).then_some(out)
    }

    /// Splits the horizon into runs whose cone triangles share a plane, the
    /// first run starting at a fold. Each run becomes one face.
    fn weave_groups(
        &self,
        horizon: &[HalfEdgeId],
        apex: Vector3<f64>,
    ) -> Option<Vec<Vec<HalfEdgeId>>> {
        let n = horizon.len();
        let ends = |h: HalfEdgeId| (self.position(self.origin(h)), self.position(self.destination(h)));
        if horizon.iter().any(|&h| {
            let (u, w) = ends(h);
            is_colinear(u, w, apex, COLINEAR_EPSILON)
        }) {
            return None;
        }

        let start = (0..n).find(|&s| {
            let (u, w) = ends(horizon[(s + n - 1) % n]);
            let (_, next) = ends(horizon[s]);
            Plane::from_points(w, u, apex).map_or(false, |plane| {
                plane.point_status(next, POINT_STATUS_EPSILON) == PointStatus::Below
            })
        })?;

        let mut groups: Vec<Vec<HalfEdgeId>> = Vec::new();
        let mut plane: Option<Plane> = None;
        for k in 0..n {
            let h = horizon[(start + k) % n];
            let (u, w) = ends(h);
            if let (Some(group), Some(pl)) = (groups.last_mut(), plane) {
                if pl.point_status(w, POINT_STATUS_EPSILON) == PointStatus::Inside {
                    group.push(h);
                    continue;
                }
            }
            plane = Some(Plane::from_points(w, u, apex)?);
            groups.push(vec![h]);
        }
        (groups.len() >= 3).then_some(groups)
    }

    /// Deletes the removed faces together with their interior edges and
    /// vertices. Horizon edges keep only their horizon half.
    fn cut_faces(&mut self, removed: &[FaceId], horizon: &[HalfEdgeId], cb: &mut dyn Callback) {
        let mut horizon_edges = HashSet::with_capacity(horizon.len());
        let mut horizon_vertices = HashSet::with_capacity(horizon.len());
        for &h in horizon {
            let Some(e) = self.half_edges[h].edge else {
                panic!("horizon half-edge {h:?} has no edge");
            };
            self.edges[e] = Edge {
                first: h,
                second: None,
            };
            let v = self.origin(h);
            self.vertices[v].leaving = Some(h);
            horizon_edges.insert(e);
            horizon_vertices.insert(v);
        }

        for &f in removed {
            cb.face_will_be_deleted(self, f);
            let ring: Vec<HalfEdgeId> = self.boundary(f).collect();
            for h in ring {
                if let Some(e) = self.half_edges[h].edge {
                    if !horizon_edges.contains(&e) && self.edges.contains(e) {
                        self.edges.remove(e);
                    }
                }
                let v = self.origin(h);
                if !horizon_vertices.contains(&v) && self.vertices.contains(v) {
                    cb.vertex_will_be_removed(self, v);
                    cb.vertex_will_be_deleted(self, v);
                    self.vertices.remove(v);
                }
                self.half_edges.remove(h);
            }
            self.faces.remove(f);
        }
    }

    /// Builds one face per horizon run, all meeting at a new apex vertex.
    fn weave(
        &mut self,
        groups: &[Vec<HalfEdgeId>],
        position: Vector3<f64>,
        cb: &mut dyn Callback,
    ) -> VertexId {
        let apex = self.add_vertex(position);
        cb.vertex_was_created(self, apex);

        let mut spokes: Vec<(HalfEdgeId, HalfEdgeId)> = Vec::with_capacity(groups.len());
        let mut created: Vec<FaceId> = Vec::with_capacity(groups.len());
        for group in groups {
            let mut ring = Vec::with_capacity(group.len() + 2);
            for &h in group.iter().rev() {
                let t = self.add_half_edge(self.destination(h));
                let Some(e) = self.half_edges[h].edge else {
                    panic!("horizon half-edge {h:?} has no edge");
                };
                self.edges[e].second = Some(t);
                self.half_edges[t].edge = Some(e);
                ring.push(t);
            }
            let to_apex = self.add_half_edge(self.origin(group[0]));
            let from_apex = self.add_half_edge(apex);
            ring.push(to_apex);
            ring.push(from_apex);
            created.push(self.add_face(&ring, &*cb));
            spokes.push((to_apex, from_apex));
        }

        // Run i starts where run i - 1 ends.
        let g = spokes.len();
        for i in 0..g {
            let (to_apex, _) = spokes[i];
            let (_, from_apex) = spokes[(i + g - 1) % g];
            self.add_edge(to_apex, Some(from_apex));
        }
        for f in created {
            cb.face_was_created(self, f);
        }
        apex
    }
}
