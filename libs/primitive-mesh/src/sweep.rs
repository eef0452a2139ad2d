//! # Sweep Kernel
//!
//! Shared math for every curved builder:
//!
//! - chord-deviation step counts (how many equal angular steps keep a polygon
//!   within `deflection` of the true circle)
//! - full-turn recognition for sweep angles
//! - incremental rotation of ring vectors
//! - degenerate-direction fallbacks
//!
//! ## Step Formula
//!
//! ```text
//! step  = 2 * acos((r - deflection) / r)      if r > deflection
//!       = coarse_increment                    otherwise
//! count = ceil(total / step)
//! step  = total / count                       (sweep closes exactly)
//! ```
//!
//! ## Incremental Rotation
//!
//! Rings are produced by applying one fixed step rotation to the previous
//! vector instead of evaluating `sin`/`cos` for every angle. This keeps each
//! step to one quaternion-vector product. Rounding error accumulates linearly
//! with the step count (about `count * 1e-16` relative for f64), which stays
//! far below any visible threshold for the step counts the chord formula
//! produces. Builders that need an exact end ring compute it directly from the
//! full-angle rotation.

use crate::error::MeshError;
use config::constants::{approx_equal, TessellationConfig};
use glam::{DQuat, DVec3};
use std::f64::consts::TAU;

/// Slack subtracted from `total / step` before rounding up, so that exact
/// multiples (e.g. 360° / 10°) are not pushed to an extra step by rounding.
const STEP_RATIO_SLACK: f64 = 1e-9;

/// A validated sweep angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepAngle {
    /// Angle in radians, at most one full turn.
    pub radians: f64,
    /// True when the sweep is a closed revolution (no end caps).
    pub full: bool,
}

/// Validates a sweep angle and recognises full turns.
///
/// Angles within `angle_epsilon` of 2π, or larger than 2π, become exactly
/// one full turn. Zero, negative and non-finite angles are rejected.
///
/// # Example
///
/// ```rust
/// use config::constants::TessellationConfig;
/// use primitive_mesh::sweep::sweep_angle;
///
/// let cfg = TessellationConfig::default();
/// let sweep = sweep_angle(7.0, &cfg).unwrap();
/// assert!(sweep.full);
/// assert_eq!(sweep.radians, std::f64::consts::TAU);
/// ```
pub fn sweep_angle(angle: f64, cfg: &TessellationConfig) -> Result<SweepAngle, MeshError> {
    if !angle.is_finite() || angle <= 0.0 {
        return Err(MeshError::invalid_argument(format!(
            "sweep angle must be positive and finite: {angle}"
        )));
    }
    if angle >= TAU || approx_equal(angle, TAU, cfg.angle_epsilon) {
        return Ok(SweepAngle {
            radians: TAU,
            full: true,
        });
    }
    Ok(SweepAngle {
        radians: angle,
        full: false,
    })
}

/// An equal subdivision of an angular range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steps {
    /// Number of steps, at least 1.
    pub count: u32,
    /// Angle of one step; `count * increment == total`.
    pub increment: f64,
}

impl Steps {
    /// Splits `total` into the fewest equal steps no larger than `max_step`.
    pub fn over(total: f64, max_step: f64) -> Self {
        let ratio = total / max_step - STEP_RATIO_SLACK;
        let count = (ratio.ceil().max(1.0)) as u32;
        Self {
            count,
            increment: total / count as f64,
        }
    }

    /// Like [`Steps::over`], with the count rounded up to an even number.
    pub fn over_even(total: f64, max_step: f64) -> Self {
        let mut count = Self::over(total, max_step).count;
        if count % 2 == 1 {
            count += 1;
        }
        Self {
            count,
            increment: total / count as f64,
        }
    }

    /// Like [`Steps::over`], with the count rounded up to a multiple of four.
    pub fn over_quartered(total: f64, max_step: f64) -> Self {
        let mut count = Self::over(total, max_step).count;
        let rem = count % 4;
        if rem != 0 {
            count += 4 - rem;
        }
        Self {
            count,
            increment: total / count as f64,
        }
    }
}

/// Largest angular step whose chord stays within `deflection` of a circle of
/// the given radius.
pub fn chord_increment(radius: f64, cfg: &TessellationConfig) -> f64 {
    if radius <= cfg.deflection {
        cfg.coarse_increment
    } else {
        2.0 * ((radius - cfg.deflection) / radius).acos()
    }
}

/// Tolerance-driven subdivision of `total` for a circle of `radius`.
///
/// # Example
///
/// ```rust
/// use config::constants::TessellationConfig;
/// use primitive_mesh::sweep::chord_steps;
///
/// let cfg = TessellationConfig::default();
/// let steps = chord_steps(12.0, std::f64::consts::TAU, &cfg);
/// let deviation = 12.0 * (1.0 - (std::f64::consts::PI / steps.count as f64).cos());
/// assert!(deviation <= cfg.deflection + 1e-9);
/// ```
pub fn chord_steps(radius: f64, total: f64, cfg: &TessellationConfig) -> Steps {
    Steps::over(total, chord_increment(radius, cfg))
}

/// Fixed-increment subdivision of `total`, used by the non-adaptive sweeps.
pub fn fixed_steps(total: f64, cfg: &TessellationConfig) -> Steps {
    Steps::over(total, cfg.default_increment)
}

/// Rotation of `angle` radians about `axis` (normalized here).
///
/// A zero axis yields the identity.
pub fn axis_rotation(axis: DVec3, angle: f64) -> DQuat {
    match axis.try_normalize() {
        Some(axis) => DQuat::from_axis_angle(axis, angle),
        None => DQuat::IDENTITY,
    }
}

/// Rotation about `axis` that carries the direction `from` onto `to`.
///
/// Both directions are expected to be perpendicular to `axis`; the rotation
/// never leaves the plane they span, even when they are opposite.
pub fn align_about(from: DVec3, to: DVec3, axis: DVec3) -> DQuat {
    let axis = axis.normalize_or_zero();
    let angle = from.cross(to).dot(axis).atan2(from.dot(to));
    axis_rotation(axis, angle)
}

/// Successive images of `start` under repeated application of `step`.
///
/// The first item is `start` itself.
pub fn rotated_sequence(start: DVec3, step: DQuat, count: usize) -> impl Iterator<Item = DVec3> {
    std::iter::successors(Some(start), move |v| Some(step * *v)).take(count)
}

/// Points of a ring around `center`: `count` rotated copies of `radial`
/// followed by a copy of the first point, so consumers can stitch the seam
/// without wrapping indices.
pub fn closed_ring(center: DVec3, radial: DVec3, step: DQuat, count: u32) -> Vec<DVec3> {
    let mut ring: Vec<DVec3> = rotated_sequence(radial, step, count as usize)
        .map(|v| center + v)
        .collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

/// Normalizes `v`, substituting `fallback` for a zero or non-finite vector.
#[inline]
pub fn unit_or(v: DVec3, fallback: DVec3) -> DVec3 {
    v.try_normalize().unwrap_or(fallback)
}

/// Unit vector along `a × b`, or `fallback` when `a` and `b` are parallel.
///
/// Parallelism is judged on the unit directions, so the result does not
/// depend on the lengths of `a` and `b`. A zero input counts as parallel.
pub fn perpendicular(a: DVec3, b: DVec3, fallback: DVec3, cfg: &TessellationConfig) -> DVec3 {
    let cross = a.normalize_or_zero().cross(b.normalize_or_zero());
    if cross.length_squared() < cfg.parallel_epsilon {
        fallback
    } else {
        cross.normalize()
    }
}

/// Some unit vector perpendicular to `v`, preferring `v × Z` and falling back
/// to an axis-aligned direction when `v` is parallel to Z.
pub fn reference_perpendicular(v: DVec3, cfg: &TessellationConfig) -> DVec3 {
    let v = unit_or(v, DVec3::Z);
    let fallback = if v.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
    // Project the fallback so the result is exactly perpendicular
    let projected = unit_or(fallback - v * fallback.dot(v), DVec3::X);
    perpendicular(v, DVec3::Z, projected, cfg)
}

#[cfg(test)]
mod tests;
