//! Joint-angle geometry
//!
//! Angle computation between tracked landmarks. Every detector measurement
//! reduces to [`angle_at`] or a coordinate difference, so this is the
//! numeric foundation of the pipeline.

use crate::types::Landmark;

/// Angle in degrees at vertex `b` formed by rays `b -> a` and `b -> c`.
///
/// Computed via the dot-product/arccosine formula with the cosine argument
/// clamped to [-1, 1] to guard against floating-point drift. Returns `None`
/// when either ray has zero length (coincident points), which a frame with
/// duplicated landmarks can produce.
pub fn angle_at(a: Landmark, b: Landmark, c: Landmark) -> Option<f64> {
    let (v1x, v1y) = (a.x - b.x, a.y - b.y);
    let (v2x, v2y) = (c.x - b.x, c.y - b.y);

    let mag1 = (v1x * v1x + v1y * v1y).sqrt();
    let mag2 = (v2x * v2x + v2y * v2y).sqrt();
    if mag1 == 0.0 || mag2 == 0.0 {
        return None;
    }

    let cos = ((v1x * v2x + v1y * v2y) / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Euclidean distance between two landmarks in normalized image coordinates
pub fn distance(a: Landmark, b: Landmark) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}
