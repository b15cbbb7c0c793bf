//! Half-edge boundary representation kernel for convex polyhedra.
//!
//! Layers, leaf to root:
//! - `geom`: planes, rays, boxes, tolerances and the 2D convex hull.
//! - `polyhedron`: the half-edge mesh, its mutations and invariant checks.
//!
//! API Policy
//! - `api` is the curated surface for the CLI and benches; module paths may
//!   move between versions.

pub mod api;
pub mod geom;
pub mod polyhedron;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom::{BBox3, KernelCfg, Plane, PointStatus, Ray};
pub use polyhedron::Polyhedron;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom::rand::{draw_points, CloudShape, ReplayToken};
    pub use crate::geom::{convex_hull_2d, BBox3, ConvexHull2D, KernelCfg, Plane, PointStatus, Ray};
    pub use crate::polyhedron::{Callback, DefaultCallback, FaceHit, Polyhedron, TopologyError};
    pub use nalgebra::{vector, Vector3 as Vec3};
}
