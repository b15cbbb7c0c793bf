//! Caller-supplied strategy for plane computation and lifecycle notification.
//!
//! The kernel calls exactly one hook per structural event it performs, with
//! the polyhedron in the state described by the hook's name: "will" hooks see
//! the entity still intact, "was"/"did" hooks see it fully linked.

use super::entities::{FaceId, VertexId};
use super::Polyhedron;
use crate::geom::Plane;

pub trait Callback {
    /// Supporting plane of `face`, oriented so that the boundary winds
    /// counter-clockwise around the normal.
    ///
    /// The default scans consecutive boundary triples for the first
    /// non-colinear one. Panics if every triple is colinear.
    fn plane(&self, poly: &Polyhedron, face: FaceId) -> Plane {
        default_plane(poly, face)
    }

    fn vertex_was_created(&mut self, _poly: &Polyhedron, _vertex: VertexId) {}
    fn vertex_will_be_deleted(&mut self, _poly: &Polyhedron, _vertex: VertexId) {}
    fn vertex_was_added(&mut self, _poly: &Polyhedron, _vertex: VertexId) {}
    /// A point insertion is about to drop `vertex` from the hull. Deletion
    /// (if any) is reported separately.
    fn vertex_will_be_removed(&mut self, _poly: &Polyhedron, _vertex: VertexId) {}
    fn face_was_created(&mut self, _poly: &Polyhedron, _face: FaceId) {}
    fn face_will_be_deleted(&mut self, _poly: &Polyhedron, _face: FaceId) {}
    fn face_did_change(&mut self, _poly: &Polyhedron, _face: FaceId) {}
    fn face_was_flipped(&mut self, _poly: &Polyhedron, _face: FaceId) {}
    /// `clone` was cut off `original` by `chop_corner`.
    fn face_was_split(&mut self, _poly: &Polyhedron, _original: FaceId, _clone: FaceId) {}
    /// `consumed` is about to be deleted; its area now belongs to `kept`.
    fn faces_will_be_merged(&mut self, _poly: &Polyhedron, _kept: FaceId, _consumed: FaceId) {}
}

/// No-op notifications, default planes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCallback;

impl Callback for DefaultCallback {}

/// Notifications emitted by [`Polyhedron::copy_with`].
pub trait CopyCallback {
    fn vertex_was_copied(&mut self, _original: VertexId, _copy: VertexId) {}
    fn face_was_copied(&mut self, _original: FaceId, _copy: FaceId) {}
}

impl CopyCallback for DefaultCallback {}

fn default_plane(poly: &Polyhedron, face: FaceId) -> Plane {
    let positions = poly.face_vertex_positions(face);
    let n = positions.len();
    assert!(n >= 3, "face {face:?} has only {n} vertices");
    (0..n)
        .find_map(|i| {
            Plane::from_points(positions[i], positions[(i + 1) % n], positions[(i + 2) % n])
        })
        .unwrap_or_else(|| panic!("face {face:?} has no non-colinear vertex triple"))
}
