//! Pure invariant predicates.
//!
//! `check_invariant` is the aggregate asserted after every mutation; the
//! individual checks are public so that tests and callers can pinpoint a
//! failure. `validate` reports the first failing check as a `TopologyError`.

use std::collections::HashSet;

use thiserror::Error;

use super::entities::VertexId;
use super::Polyhedron;
use crate::geom::cfg::POINT_STATUS_EPSILON;
use crate::geom::PointStatus;

/// First invariant violated by a polyhedron.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("a face boundary half-edge has the wrong owner or a foreign edge")]
    FaceBoundary,
    #[error("a boundary half-edge has no twin on a face of this polyhedron")]
    FaceNeighbour,
    #[error("two faces share all of their vertices")]
    OverlappingFaces,
    #[error("a vertex has an invalid leaving half-edge")]
    VertexLeavingEdge,
    #[error("V + F - E is {0}, expected 2")]
    EulerCharacteristic(i64),
    #[error("an edge is not shared by two faces of this polyhedron")]
    NotClosed,
    #[error("a face has fewer than three vertices or an open edge")]
    DegenerateFace,
}

impl Polyhedron {
    /// Aggregate of the structural checks. Checks that only make sense for a
    /// closed solid are skipped for the degenerate stages.
    pub fn check_invariant(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), TopologyError> {
        if !self.check_face_boundaries() {
            return Err(TopologyError::FaceBoundary);
        }
        if !self.check_overlapping_faces() {
            return Err(TopologyError::OverlappingFaces);
        }
        if !self.is_polyhedron() {
            return Ok(());
        }
        if !self.check_face_neighbours() {
            return Err(TopologyError::FaceNeighbour);
        }
        if !self.check_vertex_leaving_edges() {
            return Err(TopologyError::VertexLeavingEdge);
        }
        if !self.check_euler_characteristic() {
            return Err(TopologyError::EulerCharacteristic(self.euler_characteristic()));
        }
        if !self.check_closed() {
            return Err(TopologyError::NotClosed);
        }
        if !self.check_no_degenerate_faces() {
            return Err(TopologyError::DegenerateFace);
        }
        Ok(())
    }

    /// Every boundary half-edge is owned by its face, is linked both ways and
    /// belongs to an edge of this polyhedron.
    pub fn check_face_boundaries(&self) -> bool {
        self.faces().all(|f| {
            if !self.half_edges.contains(self.faces[f].boundary) {
                return false;
            }
            let mut count = 0;
            let ring_ok = self.boundary(f).all(|h| {
                count += 1;
                let he = &self.half_edges[h];
                he.face == Some(f)
                    && self.half_edges.contains(he.next)
                    && self.half_edges[he.next].previous == h
                    && he.edge.map_or(false, |e| {
                        self.edges
                            .get(e)
                            .map_or(false, |edge| edge.first == h || edge.second == Some(h))
                    })
            });
            // The ring must close after exactly `len` steps.
            ring_ok && count == self.faces[f].len && {
                let start = self.faces[f].boundary;
                let mut cur = start;
                (0..count).for_each(|_| cur = self.next(cur));
                cur == start
            }
        })
    }

    /// Every boundary half-edge has a twin on a face of this polyhedron.
    pub fn check_face_neighbours(&self) -> bool {
        self.faces().all(|f| {
            self.boundary(f).all(|h| {
                self.twin(h)
                    .and_then(|t| self.half_edges.get(t))
                    .and_then(|t| t.face)
                    .map_or(false, |n| self.faces.contains(n))
            })
        })
    }

    /// No two faces consist of the same vertex set.
    pub fn check_overlapping_faces(&self) -> bool {
        let mut seen: HashSet<Vec<VertexId>> = HashSet::with_capacity(self.face_count());
        self.faces().all(|f| {
            let mut key: Vec<VertexId> = self.face_vertices(f).collect();
            key.sort_unstable();
            seen.insert(key)
        })
    }

    /// Every vertex leaves along a half-edge that starts at it and belongs to
    /// a fully specified edge of this polyhedron.
    pub fn check_vertex_leaving_edges(&self) -> bool {
        self.vertices.iter().all(|(v, vertex)| {
            let Some(h) = vertex.leaving else {
                return false;
            };
            let Some(he) = self.half_edges.get(h) else {
                return false;
            };
            he.origin == v
                && he
                    .edge
                    .and_then(|e| self.edges.get(e))
                    .map_or(false, |edge| edge.fully_specified())
        })
    }

    /// `V + F - E`.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count() as i64 + self.face_count() as i64 - self.edge_count() as i64
    }

    pub fn check_euler_characteristic(&self) -> bool {
        self.euler_characteristic() == 2
    }

    /// Every edge is fully specified and both of its faces belong to this
    /// polyhedron.
    pub fn check_closed(&self) -> bool {
        self.edges().all(|e| {
            let edge = &self.edges[e];
            edge.fully_specified()
                && matches!(self.edge_faces(e), (Some(a), Some(b))
                    if self.faces.contains(a) && self.faces.contains(b))
        })
    }

    pub fn check_no_degenerate_faces(&self) -> bool {
        self.faces().all(|f| {
            self.faces[f].len >= 3
                && self.boundary(f).all(|h| {
                    self.half_edges[h]
                        .edge
                        .map_or(false, |e| self.edges[e].fully_specified())
                })
        })
    }

    /// Every edge is at least `min_length` long.
    pub fn check_edge_lengths(&self, min_length: f64) -> bool {
        let min2 = min_length * min_length;
        self.edges()
            .all(|e| self.edge_vector(e).norm_squared() >= min2)
    }

    /// No vertex lies above any face.
    pub fn check_convex(&self) -> bool {
        self.faces().all(|f| {
            let plane = self.face_geometric_plane(f);
            self.vertices.iter().all(|(_, v)| {
                plane.point_status(v.position, POINT_STATUS_EPSILON) != PointStatus::Above
            })
        })
    }

    /// Every face vertex lies on the face's cached plane.
    pub fn check_face_planes(&self) -> bool {
        self.faces().all(|f| {
            let plane = self.faces[f].plane;
            self.face_vertices(f).all(|v| {
                plane.point_status(self.position(v), POINT_STATUS_EPSILON) == PointStatus::Inside
            })
        })
    }

    /// No edge separates two coplanar faces.
    pub fn check_no_coplanar_faces(&self) -> bool {
        self.edges().all(|e| match self.edge_faces(e) {
            (Some(a), Some(b)) => a != b && !self.coplanar(a, b),
            _ => true,
        })
    }
}
