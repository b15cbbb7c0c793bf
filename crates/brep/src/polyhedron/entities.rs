//! Topology entities of the half-edge mesh.
//!
//! All cross references are `slotmap` keys into the owning polyhedron's lists
//! and never imply ownership. The twin of a half-edge is not stored; it is the
//! other half of the half-edge's `Edge`.

use nalgebra::Vector3;

use slotmap::new_key_type;

use crate::geom::Plane;

new_key_type! {
    /// Key of a [`Vertex`].
    pub struct VertexId;
    /// Key of a [`HalfEdge`].
    pub struct HalfEdgeId;
    /// Key of an [`Edge`].
    pub struct EdgeId;
    /// Key of a [`Face`].
    pub struct FaceId;
}

/// Mesh vertex: a position and one outgoing half-edge.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub(crate) position: Vector3<f64>,
    pub(crate) leaving: Option<HalfEdgeId>,
}

impl Vertex {
    #[inline]
    pub(crate) fn new(position: Vector3<f64>) -> Self {
        Self {
            position,
            leaving: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    /// A half-edge originating at this vertex (`None` only for an isolated
    /// vertex, i.e. a single-point polyhedron).
    #[inline]
    pub fn leaving(&self) -> Option<HalfEdgeId> {
        self.leaving
    }
}

/// Directed edge fragment on a face boundary.
///
/// Invariants:
/// - `next`/`previous` form the boundary ring of `face`; a half-edge without a
///   face is a ring of its own.
/// - `edge` is `None` only transiently during construction.
#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub(crate) origin: VertexId,
    pub(crate) edge: Option<EdgeId>,
    pub(crate) face: Option<FaceId>,
    pub(crate) next: HalfEdgeId,
    pub(crate) previous: HalfEdgeId,
}

impl HalfEdge {
    /// A half-edge forming a one-element ring.
    #[inline]
    pub(crate) fn detached(me: HalfEdgeId, origin: VertexId) -> Self {
        Self {
            origin,
            edge: None,
            face: None,
            next: me,
            previous: me,
        }
    }

    #[inline]
    pub fn origin(&self) -> VertexId {
        self.origin
    }
    #[inline]
    pub fn edge(&self) -> Option<EdgeId> {
        self.edge
    }
    #[inline]
    pub fn face(&self) -> Option<FaceId> {
        self.face
    }
    #[inline]
    pub fn next(&self) -> HalfEdgeId {
        self.next
    }
    #[inline]
    pub fn previous(&self) -> HalfEdgeId {
        self.previous
    }
}

/// Undirected edge: a pair of twin half-edges.
#[derive(Clone, Debug)]
pub struct Edge {
    pub(crate) first: HalfEdgeId,
    pub(crate) second: Option<HalfEdgeId>,
}

impl Edge {
    #[inline]
    pub fn first(&self) -> HalfEdgeId {
        self.first
    }
    #[inline]
    pub fn second(&self) -> Option<HalfEdgeId> {
        self.second
    }
    #[inline]
    pub fn fully_specified(&self) -> bool {
        self.second.is_some()
    }

    /// The half of this edge that is not `h`.
    #[inline]
    pub fn twin_of(&self, h: HalfEdgeId) -> Option<HalfEdgeId> {
        if self.first == h {
            self.second
        } else if self.second == Some(h) {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Planar face bounded by a ring of half-edges.
#[derive(Clone, Debug)]
pub struct Face {
    pub(crate) boundary: HalfEdgeId,
    pub(crate) len: usize,
    pub(crate) plane: Plane,
}

impl Face {
    /// Entry half-edge of the boundary ring.
    #[inline]
    pub fn boundary(&self) -> HalfEdgeId {
        self.boundary
    }
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.len
    }
    /// Plane supplied by the callback when the face was created or last
    /// refreshed.
    #[inline]
    pub fn plane(&self) -> Plane {
        self.plane
    }
}
