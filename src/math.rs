//! Small numeric helpers shared by the simulation and the compositor.

/// Clamp `val` into `[min, max]` (inclusive).
///
/// Unlike [`f64::clamp`] this never panics when `min > max`; `min` wins.
pub fn clamp(min: f64, max: f64, val: f64) -> f64 {
    if val < min {
        min
    } else if val > max {
        max
    } else {
        val
    }
}

/// Linearly interpolate between `a` and `b` by `t`.
///
/// `t` is not clamped, so values outside `[0, 1]` extrapolate.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Euclidean distance between two points.
pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

/// Shortest distance from point `p` to the segment `start..end`.
///
/// The projection of `p` onto the segment's line is clamped to the endpoints,
/// so a point beyond either end measures to the nearer endpoint. A zero-length
/// segment degenerates to point distance.
pub fn point_segment_distance(p: (f64, f64), start: (f64, f64), end: (f64, f64)) -> f64 {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= 0.0 {
        return distance(p, start);
    }

    let t = clamp(0.0, 1.0, ((p.0 - start.0) * dx + (p.1 - start.1) * dy) / len_sq);
    distance(p, (start.0 + t * dx, start.1 + t * dy))
}
