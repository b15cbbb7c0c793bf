//! Random point clouds for hull construction (seeded, replayable).
//!
//! Purpose
//! - Deterministic inputs for benches, property tests and the CLI: points in
//!   a box, on a sphere, or on a tilted plane (for the 2D hull).
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::BBox3;

/// Where sampled points live.
#[derive(Clone, Copy, Debug)]
pub enum CloudShape {
    /// Uniform in the box.
    InBox(BBox3),
    /// Uniform on the sphere surface (every point is a hull vertex).
    OnSphere { center: Vector3<f64>, radius: f64 },
    /// Uniform in a disc of the given radius on the plane through `center`
    /// with normal `normal`.
    OnPlane {
        center: Vector3<f64>,
        normal: Vector3<f64>,
        radius: f64,
    },
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        StdRng::seed_from_u64(mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15))))
    }
}

/// Draw `n` points of the given shape.
pub fn draw_points(shape: CloudShape, n: usize, tok: ReplayToken) -> Vec<Vector3<f64>> {
    let mut rng = tok.to_std_rng();
    (0..n).map(|_| sample(&shape, &mut rng)).collect()
}

fn sample<R: Rng>(shape: &CloudShape, rng: &mut R) -> Vector3<f64> {
    match *shape {
        CloudShape::InBox(b) => Vector3::new(
            rng.gen_range(b.min.x..=b.max.x),
            rng.gen_range(b.min.y..=b.max.y),
            rng.gen_range(b.min.z..=b.max.z),
        ),
        CloudShape::OnSphere { center, radius } => center + unit_vector(rng) * radius,
        CloudShape::OnPlane {
            center,
            normal,
            radius,
        } => {
            let (u, v) = plane_basis(normal);
            let theta = rng.gen::<f64>() * std::f64::consts::TAU;
            let r = radius * rng.gen::<f64>().sqrt();
            center + u * (r * theta.cos()) + v * (r * theta.sin())
        }
    }
}

/// Uniform direction via normalized rejection sampling in the unit ball.
fn unit_vector<R: Rng>(rng: &mut R) -> Vector3<f64> {
    loop {
        let v: Vector3<f64> = Vector3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let n2 = v.norm_squared();
        if n2 > 1e-6 && n2 <= 1.0 {
            return v / n2.sqrt();
        }
    }
}

/// Orthonormal pair spanning the plane orthogonal to `normal`.
fn plane_basis(normal: Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let n = normal.normalize();
    let helper = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = n.cross(&helper).normalize();
    let v = n.cross(&u);
    (u, v)
}
