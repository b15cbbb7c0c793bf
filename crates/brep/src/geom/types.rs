//! Basic 3D types and tolerances used by the polyhedron kernel.
//!
//! - `KernelCfg`: centralizes epsilons for plane classification, colinearity,
//!   position snapping and edge healing.
//! - `Plane`: oriented plane `n · x = d` with a unit normal.
//! - `Ray`: half-line used for face picking.
//! - `BBox3`: axis-aligned box with a NaN sentinel for "no points yet".

use nalgebra::Vector3;

use super::cfg::{
    ALMOST_ZERO, COLINEAR_EPSILON, CORRECT_EPSILON, MIN_EDGE_LENGTH, POINT_STATUS_EPSILON,
};

/// Snapshot of the kernel tolerances, used for front-end defaults and reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelCfg {
    pub eps_point_status: f64,
    pub eps_colinear: f64,
    pub eps_correct: f64,
    pub min_edge_length: f64,
}

impl Default for KernelCfg {
    fn default() -> Self {
        Self {
            eps_point_status: POINT_STATUS_EPSILON,
            eps_colinear: COLINEAR_EPSILON,
            eps_correct: CORRECT_EPSILON,
            min_edge_length: MIN_EDGE_LENGTH,
        }
    }
}

/// Location of a point relative to an oriented plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointStatus {
    Above,
    Below,
    Inside,
}

/// Oriented plane `normal · x = distance`.
///
/// Invariants:
/// - `normal` has unit length for planes built by `from_points` and `new_at`.
/// - "Above" is the half-space the normal points into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub distance: f64,
}

impl Plane {
    #[inline]
    pub fn new(normal: Vector3<f64>, distance: f64) -> Self {
        Self { normal, distance }
    }

    /// Plane with the given unit normal passing through `anchor`.
    #[inline]
    pub fn new_at(anchor: Vector3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            normal,
            distance: normal.dot(&anchor),
        }
    }

    /// Plane through three points; the normal points towards the side from
    /// which `a → b → c` appears counter-clockwise. `None` if the points are
    /// colinear.
    pub fn from_points(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> Option<Self> {
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        if !len.is_finite() || len <= f64::EPSILON {
            return None;
        }
        Some(Self::new_at(a, n / len))
    }

    /// Signed distance of `p` to the plane (positive above).
    #[inline]
    pub fn point_distance(&self, p: Vector3<f64>) -> f64 {
        self.normal.dot(&p) - self.distance
    }

    #[inline]
    pub fn point_status(&self, p: Vector3<f64>, eps: f64) -> PointStatus {
        let d = self.point_distance(p);
        if d > eps {
            PointStatus::Above
        } else if d < -eps {
            PointStatus::Below
        } else {
            PointStatus::Inside
        }
    }

    /// Same plane with the opposite orientation.
    #[inline]
    pub fn flip(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    /// A point on the plane (the foot of the origin).
    #[inline]
    pub fn anchor(&self) -> Vector3<f64> {
        self.normal * self.distance
    }
}

/// Ray `origin + t * direction`, `t >= 0`, with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Normalizes `direction`.
    #[inline]
    pub fn new(origin: Vector3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    #[inline]
    pub fn point_at(&self, t: f64) -> Vector3<f64> {
        self.origin + self.direction * t
    }

    /// Distance along the ray to `plane`, NaN if the ray is parallel to the
    /// plane or points away from it.
    pub fn intersect_plane(&self, plane: &Plane) -> f64 {
        let cos = plane.normal.dot(&self.direction);
        if cos.abs() <= ALMOST_ZERO {
            return f64::NAN;
        }
        let t = (plane.distance - plane.normal.dot(&self.origin)) / cos;
        if t < 0.0 {
            f64::NAN
        } else {
            t
        }
    }
}

/// Axis-aligned bounding box.
///
/// An empty box has all coordinates NaN; `merge_point` on an empty box yields
/// the degenerate box of that point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox3 {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Default for BBox3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl BBox3 {
    #[inline]
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn empty() -> Self {
        let nan = Vector3::repeat(f64::NAN);
        Self { min: nan, max: nan }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.iter().chain(self.max.iter()).any(|c| c.is_nan())
    }

    pub fn from_points<I: IntoIterator<Item = Vector3<f64>>>(points: I) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |acc, p| acc.merge_point(p))
    }

    pub fn merge_point(&self, p: Vector3<f64>) -> Self {
        if self.is_empty() {
            return Self { min: p, max: p };
        }
        Self {
            min: self.min.inf(&p),
            max: self.max.sup(&p),
        }
    }

    #[inline]
    pub fn contains(&self, p: Vector3<f64>) -> bool {
        !self.is_empty()
            && (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    #[inline]
    pub fn center(&self) -> Vector3<f64> {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }
}
