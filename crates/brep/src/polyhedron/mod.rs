//! Half-edge boundary representation of convex polyhedra.
//!
//! Purpose
//! - Represent a convex solid (or one of its degenerate stages: point,
//!   segment, polygon) as vertices, edges and faces with consistent topology.
//! - Provide the primitive mutations (box construction, copy, point insertion,
//!   edge collapse, face merging, edge healing) and a suite of pure invariant
//!   checks that hold after every completed mutation.
//!
//! Why this design
//! - Entities live in ring-ordered slot maps (`list::List`) and refer to each
//!   other through typed `slotmap` keys, so a stale reference is detected
//!   instead of dangling.
//! - Face boundaries are rings threaded through the half-edges themselves
//!   (`next`/`previous`); a face stores one entry half-edge and the ring
//!   length.
//! - Plane computation and lifecycle notifications go through the
//!   `Callback` trait so that callers can keep derived state in sync.
//!
//! Code cross-refs: `Polyhedron`, `Callback`, `ConvexHull2D`, `TopologyError`

mod callback;
mod checks;
mod construct;
mod edit;
mod entities;
mod hull;
pub mod list;
mod queries;
mod topology;

pub use callback::{Callback, CopyCallback, DefaultCallback};
pub use checks::TopologyError;
pub use entities::{Edge, EdgeId, Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
pub use queries::FaceHit;
pub use topology::Boundary;

use nalgebra::Vector3;

use crate::geom::BBox3;
use list::List;

/// Convex polyhedron in half-edge form.
///
/// Invariants (see `check_invariant`):
/// - every face boundary is a closed ring of half-edges owned by that face;
/// - for a genuine polyhedron (more than three faces) every edge is fully
///   specified, the mesh is closed and `V + F - E == 2`;
/// - `bounds` is the bounding box of all vertex positions (NaN when empty).
#[derive(Debug)]
pub struct Polyhedron {
    pub(crate) vertices: List<VertexId, Vertex>,
    pub(crate) edges: List<EdgeId, Edge>,
    pub(crate) faces: List<FaceId, Face>,
    pub(crate) half_edges: List<HalfEdgeId, HalfEdge>,
    pub(crate) bounds: BBox3,
}

impl Default for Polyhedron {
    fn default() -> Self {
        Self::new()
    }
}

impl Polyhedron {
    /// Empty polyhedron; bounds are the NaN sentinel.
    pub fn new() -> Self {
        Self {
            vertices: List::new(),
            edges: List::new(),
            faces: List::new(),
            half_edges: List::new(),
            bounds: BBox3::empty(),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertex handles in list order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().map(|(h, _)| h)
    }
    /// Edge handles in list order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().map(|(h, _)| h)
    }
    /// Face handles in list order.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().map(|(h, _)| h)
    }

    #[inline]
    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v]
    }
    #[inline]
    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e]
    }
    #[inline]
    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f]
    }
    #[inline]
    pub fn half_edge(&self, h: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[h]
    }

    #[inline]
    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertices.contains(v)
    }
    #[inline]
    pub fn contains_edge(&self, e: EdgeId) -> bool {
        self.edges.contains(e)
    }
    #[inline]
    pub fn contains_face(&self, f: FaceId) -> bool {
        self.faces.contains(f)
    }

    #[inline]
    pub fn position(&self, v: VertexId) -> Vector3<f64> {
        self.vertices[v].position
    }

    /// Positions of all vertices in list order.
    pub fn vertex_positions(&self) -> Vec<Vector3<f64>> {
        self.vertices.iter().map(|(_, v)| v.position).collect()
    }

    #[inline]
    pub fn bounds(&self) -> BBox3 {
        self.bounds
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }
    #[inline]
    pub fn is_point(&self) -> bool {
        self.vertex_count() == 1
    }
    #[inline]
    pub fn is_edge(&self) -> bool {
        self.vertex_count() == 2
    }
    #[inline]
    pub fn is_polygon(&self) -> bool {
        self.face_count() == 1
    }
    /// A genuine solid: more than three faces.
    #[inline]
    pub fn is_polyhedron(&self) -> bool {
        self.face_count() > 3
    }
    /// Euler's formula for a closed surface of genus zero.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.vertex_count() + self.face_count() == self.edge_count() + 2
    }

    /// Drops every entity; bounds return to the NaN sentinel.
    pub fn clear(&mut self) {
        self.faces.clear();
        self.edges.clear();
        self.half_edges.clear();
        self.vertices.clear();
        self.bounds = BBox3::empty();
    }

    pub(crate) fn update_bounds(&mut self) {
        self.bounds = BBox3::from_points(self.vertices.iter().map(|(_, v)| v.position));
    }
}

#[cfg(test)]
mod tests_hull;
