// Vector helpers for waypoint stepping

use nalgebra_glm as glm;

/// Linear interpolation for vectors
pub fn lerp_vec3(v1: &glm::DVec3, v2: &glm::DVec3, t: f64) -> glm::DVec3 {
    glm::lerp(v1, v2, t)
}

/// Unit vector from `from` to `to`, `None` when the points coincide
pub fn direction_towards(from: &glm::DVec3, to: &glm::DVec3) -> Option<glm::DVec3> {
    let offset = to - from;
    let length = glm::length(&offset);
    if length > 0.0 && length.is_finite() {
        Some(offset / length)
    } else {
        None
    }
}

/// Move `from` towards `to` by at most `max_step`.
/// Returns the new point and whether `to` was reached, in which case the
/// point is exactly `to`.
pub fn step_towards(from: &glm::DVec3, to: &glm::DVec3, max_step: f64) -> (glm::DVec3, bool) {
    let remaining = glm::distance(from, to);
    let step = max_step.max(0.0).min(remaining);
    if step >= remaining {
        return (*to, true);
    }
    match direction_towards(from, to) {
        Some(direction) => (from + direction * step, false),
        None => (*to, true),
    }
}
