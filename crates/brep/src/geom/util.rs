use nalgebra::Vector3;

use super::cfg::ALMOST_ZERO;

/// Coordinate axis, used to pick a projection plane for planar point sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axis of the component with the largest magnitude.
    pub fn dominant(v: Vector3<f64>) -> Self {
        let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
        if ax >= ay && ax >= az {
            Axis::X
        } else if ay >= az {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}

/// Cyclic permutation that moves `axis` into the z slot. Being a rotation of
/// coordinates it preserves orientation, so "counter-clockwise in swizzled
/// xy" means counter-clockwise seen from the positive `axis` direction.
#[inline]
pub fn swizzle(p: Vector3<f64>, axis: Axis) -> Vector3<f64> {
    match axis {
        Axis::X => Vector3::new(p.y, p.z, p.x),
        Axis::Y => Vector3::new(p.z, p.x, p.y),
        Axis::Z => p,
    }
}

/// Inverse of [`swizzle`].
#[inline]
pub fn unswizzle(p: Vector3<f64>, axis: Axis) -> Vector3<f64> {
    match axis {
        Axis::X => Vector3::new(p.z, p.x, p.y),
        Axis::Y => Vector3::new(p.y, p.z, p.x),
        Axis::Z => p,
    }
}

/// Twice the signed area of the triangle `p1, p2, p3` in the xy plane.
///
/// Positive if `p3` lies left of the directed line `p1 → p2`, negative if it
/// lies right, zero if the three points are colinear.
#[inline]
pub fn is_left(p1: Vector3<f64>, p2: Vector3<f64>, p3: Vector3<f64>) -> f64 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p3.x - p1.x) * (p2.y - p1.y)
}

/// Colinearity test on the sine of the angle at `a`; coincident points count
/// as colinear.
pub fn is_colinear(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>, eps: f64) -> bool {
    let ab = b - a;
    let ac = c - a;
    let scale = ab.norm() * ac.norm();
    if scale <= f64::EPSILON {
        return true;
    }
    ab.cross(&ac).norm() <= eps * scale
}

/// Distance from `p` to the closed segment `[a, b]`.
pub fn segment_distance(a: Vector3<f64>, b: Vector3<f64>, p: Vector3<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (a + ab * t - p).norm()
}

/// Whether `p` lies on the closed segment `[a, b]` up to `eps`.
#[inline]
pub fn segment_contains(a: Vector3<f64>, b: Vector3<f64>, p: Vector3<f64>, eps: f64) -> bool {
    segment_distance(a, b, p) <= eps
}

/// All components at most `ALMOST_ZERO` in magnitude.
#[inline]
pub fn is_almost_zero(v: Vector3<f64>) -> bool {
    v.amax() <= ALMOST_ZERO
}

/// Snaps `v` to the closest multiple of `2^-decimals` if it is within `eps`
/// of it (measured in units of that grid), otherwise returns `v` unchanged.
pub fn correct(v: f64, decimals: u32, eps: f64) -> f64 {
    let m = f64::from(1u32 << decimals.min(31));
    let scaled = v * m;
    let r = scaled.round();
    if (scaled - r).abs() <= eps {
        r / m
    } else {
        v
    }
}

/// Component-wise [`correct`].
#[inline]
pub fn correct_vec(v: Vector3<f64>, decimals: u32, eps: f64) -> Vector3<f64> {
    v.map(|c| correct(c, decimals, eps))
}
