//! Curated API for the CLI, benches and tests.
//!
//! Prefer these re-exports over deep module paths; the module layout behind
//! them is free to change.

// Numeric layer
pub use crate::geom::{
    convex_hull_2d, correct, correct_vec, is_colinear, is_left, BBox3, ConvexHull2D, KernelCfg,
    Plane, PointStatus, Ray,
};
// Random point clouds
pub use crate::geom::rand::{draw_points, CloudShape, ReplayToken};
// Half-edge mesh
pub use crate::polyhedron::{
    Boundary, Callback, CopyCallback, DefaultCallback, Edge, EdgeId, Face, FaceHit, FaceId,
    HalfEdge, HalfEdgeId, Polyhedron, TopologyError, Vertex, VertexId,
};
