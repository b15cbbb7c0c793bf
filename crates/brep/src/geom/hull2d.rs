//! Convex hull of a planar point set embedded in 3D.
//!
//! Purpose
//! - Derive an ordered face boundary from an unordered set of coplanar points
//!   (used when a point is added to a planar polyhedron).
//!
//! Model
//! - Project onto the coordinate plane orthogonal to the dominant axis of the
//!   supporting plane's normal (`swizzle`), run a Graham scan there and map the
//!   result back. The hull is counter-clockwise seen from the positive
//!   dominant axis.
//! - Degenerate input (fewer than three points, all points colinear) is not an
//!   error: `has_result()` is false and `result()` is empty.

use nalgebra::Vector3;

use super::util::{is_left, swizzle, unswizzle, Axis};

/// Graham-scan hull of coplanar points.
#[derive(Clone, Debug, Default)]
pub struct ConvexHull2D {
    points: Vec<Vector3<f64>>,
}

impl ConvexHull2D {
    pub fn new(points: &[Vector3<f64>]) -> Self {
        Self {
            points: graham_scan(points).unwrap_or_default(),
        }
    }

    #[inline]
    pub fn has_result(&self) -> bool {
        self.points.len() >= 3
    }

    /// Hull vertices in counter-clockwise order; empty without a result.
    #[inline]
    pub fn result(&self) -> &[Vector3<f64>] {
        &self.points
    }

    #[inline]
    pub fn into_result(self) -> Vec<Vector3<f64>> {
        self.points
    }
}

/// Convenience wrapper: `None` for degenerate input.
pub fn convex_hull_2d(points: &[Vector3<f64>]) -> Option<Vec<Vector3<f64>>> {
    let hull = ConvexHull2D::new(points);
    hull.has_result().then(|| hull.into_result())
}

/// Normal of the plane spanned by `points[0]`, the first point distinct from
/// it, and the first point not colinear with those two.
fn find_spanning_normal(points: &[Vector3<f64>]) -> Option<Vector3<f64>> {
    let p0 = *points.first()?;
    let p1 = *points.iter().find(|p| **p != p0)?;
    let u = p1 - p0;
    points.iter().find_map(|p| {
        let n = u.cross(&(p - p0));
        (n != Vector3::zeros()).then_some(n)
    })
}

fn graham_scan(input: &[Vector3<f64>]) -> Option<Vec<Vector3<f64>>> {
    if input.len() < 3 {
        return None;
    }
    let axis = Axis::dominant(find_spanning_normal(input)?);
    let mut pts: Vec<Vector3<f64>> = input.iter().map(|p| swizzle(*p, axis)).collect();

    // Anchor: minimum y, ties broken by maximum x.
    let anchor_idx = (1..pts.len()).fold(0, |best, i| {
        let (a, b) = (pts[i], pts[best]);
        if a.y < b.y || (a.y == b.y && a.x > b.x) {
            i
        } else {
            best
        }
    });
    let anchor = pts.swap_remove(anchor_idx);
    pts.retain(|p| p.x != anchor.x || p.y != anchor.y);

    // Every remaining point lies at a polar angle in (0, π] around the anchor.
    let dist2 = |p: &Vector3<f64>| (p.x - anchor.x).powi(2) + (p.y - anchor.y).powi(2);
    pts.sort_by(|a, b| {
        let ta = (a.y - anchor.y).atan2(a.x - anchor.x);
        let tb = (b.y - anchor.y).atan2(b.x - anchor.x);
        ta.total_cmp(&tb).then_with(|| dist2(b).total_cmp(&dist2(a)))
    });

    // Among points on the same ray from the anchor keep only the farthest.
    let mut sorted: Vec<Vector3<f64>> = Vec::with_capacity(pts.len() + 1);
    sorted.push(anchor);
    for p in pts {
        if sorted.len() > 1 {
            let last = sorted[sorted.len() - 1];
            if is_left(anchor, last, p) == 0.0 {
                if dist2(&p) > dist2(&last) {
                    let n = sorted.len();
                    sorted[n - 1] = p;
                }
                continue;
            }
        }
        sorted.push(p);
    }
    if sorted.len() < 3 {
        return None;
    }

    let mut stack: Vec<Vector3<f64>> = Vec::with_capacity(sorted.len());
    stack.push(sorted[0]);
    stack.push(sorted[1]);
    for p in sorted.into_iter().skip(2) {
        while stack.len() >= 2 && is_left(stack[stack.len() - 2], stack[stack.len() - 1], p) <= 0.0
        {
            stack.pop();
        }
        stack.push(p);
    }
    if stack.len() < 3 {
        return None;
    }
    Some(stack.into_iter().map(|p| unswizzle(p, axis)).collect())
}
