//! Numeric layer of the kernel: planes, rays, boxes, tolerances and the 2D
//! convex hull.
//!
//! Purpose
//! - Keep every epsilon-aware comparison in one place so that hull, distance
//!   and coplanarity checks agree with each other.
//! - Coordinates are `nalgebra::Vector3<f64>` throughout.
//!
//! Code cross-refs: `Plane`, `Ray`, `BBox3`, `KernelCfg`, `ConvexHull2D`

pub(crate) mod cfg;
pub mod hull2d;
pub mod rand;
mod types;
mod util;

pub use hull2d::{convex_hull_2d, ConvexHull2D};
pub use types::{BBox3, KernelCfg, PointStatus, Plane, Ray};
pub use util::{
    correct, correct_vec, is_colinear, is_left, segment_contains, segment_distance, swizzle,
    unswizzle, Axis,
};
pub(crate) use util::is_almost_zero;

#[cfg(test)]
mod tests;
