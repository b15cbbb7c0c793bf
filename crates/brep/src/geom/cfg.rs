//! Tolerance defaults for the polyhedron kernel (internal).
//!
//! Policy
//! - Defaults are fixed constants so that hull, distance and coplanarity
//!   checks agree with each other. The kernel operations read these
//!   constants directly; `KernelCfg` only mirrors them so front ends can
//!   derive flag defaults and report the active tolerances.

/// Vector components with magnitude at or below this are treated as zero
/// (face normals, ray/plane cosines, segment containment).
pub(crate) const ALMOST_ZERO: f64 = 0.001;
/// Half-thickness of a plane for above/below/inside classification.
pub(crate) const POINT_STATUS_EPSILON: f64 = 0.0001;
/// Maximum snapping distance used by `correct`.
pub(crate) const CORRECT_EPSILON: f64 = 0.001;
/// Sine of the largest angle still considered colinear; also bounds
/// `1 - n1·n2` for parallel face normals.
pub(crate) const COLINEAR_EPSILON: f64 = 0.00001;
/// Edges shorter than this are collapsed by `heal_edges` by default.
pub(crate) const MIN_EDGE_LENGTH: f64 = 0.01;
