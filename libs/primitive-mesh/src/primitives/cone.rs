//! # Conical Family
//!
//! Cone, truncated cone (snout) and the skew cylinder whose base lies on a
//! plane tilted against its axis.
//!
//! All three share one lateral convention: ring points are produced by
//! rotating a radial seed about the axis, and each side pair gets the normal
//! `tangent × (upper - lower)` where `tangent` rotates with the seed.

use super::Style;
use crate::error::{ensure_non_negative, ensure_positive, MeshError};
use crate::mesh::{Mesh, Topology};
use crate::sweep::{
    align_about, axis_rotation, chord_steps, closed_ring, fixed_steps, perpendicular,
    reference_perpendicular, rotated_sequence, unit_or,
};
use config::constants::TessellationConfig;
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, instrument};

/// Right or oblique circular cone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    /// Center of the base circle.
    pub center: DVec3,
    /// Axis from the base center towards the apex; also sets the base plane.
    pub height: DVec3,
    /// Lateral shift of the apex relative to `center + height`.
    pub offset: DVec3,
    /// Base radius.
    pub radius: f64,
}

impl Cone {
    /// Creates a right cone with no apex offset.
    pub fn new(center: DVec3, height: DVec3, radius: f64) -> Self {
        Self {
            center,
            height,
            offset: DVec3::ZERO,
            radius,
        }
    }
}

/// Truncated cone between two parallel circles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snout {
    pub center: DVec3,
    pub height: DVec3,
    pub offset: DVec3,
    pub bottom_radius: f64,
    pub top_radius: f64,
}

/// Cylinder whose bottom face lies on a plane that need not be
/// perpendicular to the axis, giving an elliptical base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkewCylinder {
    /// Center of the bottom face.
    pub origin: DVec3,
    /// Axis from the bottom center to the top center.
    pub height: DVec3,
    /// Outward normal of the bottom plane.
    pub bottom_normal: DVec3,
    pub radius: f64,
}

/// Unit base normal and the two in-plane seeds of a conical frame.
fn conical_frame(height: DVec3, cfg: &TessellationConfig) -> Result<(DVec3, DVec3, DVec3), MeshError> {
    let base_normal = (-height)
        .try_normalize()
        .ok_or_else(|| MeshError::invalid_argument("height vector must be non-zero"))?;
    let radial = reference_perpendicular(base_normal, cfg);
    let tangent = unit_or(height.cross(radial), radial.cross(base_normal));
    Ok((base_normal, radial, tangent))
}

/// Appends the lateral quad strip pairing `upper[i]` with `lower[i]`.
///
/// `tangent` is the facet tangent at the first pair and is rotated by `step`
/// for each following pair; the closing pair reuses the first normal.
fn lateral_strip(mesh: &mut Mesh, upper: &[DVec3], lower: &[DVec3], tangent: DVec3, step: DQuat) {
    let count = lower.len().saturating_sub(1).max(1);
    let tangents: Vec<DVec3> = rotated_sequence(tangent, step, count).collect();
    let first = mesh.next_index();
    for (i, (top, bottom)) in upper.iter().zip(lower).enumerate() {
        let normal = unit_or(tangents[i % count].cross(*top - *bottom), tangent);
        mesh.push(*top, normal);
        mesh.push(*bottom, normal);
    }
    mesh.close_range(Topology::QuadStrip, first);
}

/// Builds a cone: a lateral quad strip from the apex to the base ring,
/// followed by an optional base fan.
///
/// The apex is repeated for every side pair so each facet carries its own
/// normal.
#[instrument(skip_all)]
pub fn cone(desc: &Cone, style: &Style, cfg: &TessellationConfig) -> Result<Mesh, MeshError> {
    ensure_positive("cone radius", desc.radius)?;
    let (base_normal, radial, tangent) = conical_frame(desc.height, cfg)?;

    let steps = chord_steps(desc.radius, TAU, cfg);
    let step = axis_rotation(base_normal, steps.increment);
    let apex = desc.center + desc.height + desc.offset;
    let ring = closed_ring(desc.center, radial * desc.radius, step, steps.count);
    let apexes = vec![apex; ring.len()];

    let mut mesh = Mesh::with_capacity(style.color, 3 * ring.len() + 1);
    lateral_strip(&mut mesh, &apexes, &ring, tangent, step);
    if style.bottom_visible {
        mesh.add_fan(desc.center, &ring, base_normal);
    }

    debug!(
        steps = steps.count,
        vertices = mesh.vertex_count(),
        "built cone"
    );
    Ok(mesh)
}

/// Builds a truncated cone.
///
/// A radius that is effectively zero turns the snout into a cone. When the
/// bottom vanishes the cone is rebuilt from the top circle with the axis and
/// offset negated, and the top visibility flag controls its base.
#[instrument(skip_all)]
pub fn snout(desc: &Snout, style: &Style, cfg: &TessellationConfig) -> Result<Mesh, MeshError> {
    ensure_non_negative("snout bottom radius", desc.bottom_radius)?;
    ensure_non_negative("snout top radius", desc.top_radius)?;
    let bottom_vanishes = desc.bottom_radius <= cfg.length_epsilon;
    let top_vanishes = desc.top_radius <= cfg.length_epsilon;

    match (bottom_vanishes, top_vanishes) {
        (true, true) => {
            return Err(MeshError::invalid_argument(
                "snout needs at least one non-zero radius",
            ))
        }
        (true, false) => {
            debug!("zero bottom radius, building inverted cone");
            let inverted = Cone {
                center: desc.center + desc.height + desc.offset,
                height: -desc.height,
                offset: -desc.offset,
                radius: desc.top_radius,
            };
            let style = Style {
                bottom_visible: style.top_visible,
                ..*style
            };
            return cone(&inverted, &style, cfg);
        }
        (false, true) => {
            debug!("zero top radius, building cone");
            let apex_cone = Cone {
                center: desc.center,
                height: desc.height,
                offset: desc.offset,
                radius: desc.bottom_radius,
            };
            return cone(&apex_cone, style, cfg);
        }
        (false, false) => {}
    }

    let (base_normal, radial, tangent) = conical_frame(desc.height, cfg)?;
    let steps = chord_steps(desc.bottom_radius.max(desc.top_radius), TAU, cfg);
    let step = axis_rotation(base_normal, steps.increment);
    let top_center = desc.center + desc.height + desc.offset;
    let bottom = closed_ring(desc.center, radial * desc.bottom_radius, step, steps.count);
    let top = closed_ring(top_center, radial * desc.top_radius, step, steps.count);

    let mut mesh = Mesh::with_capacity(style.color, 4 * bottom.len() + 2);
    if style.bottom_visible {
        mesh.add_fan(desc.center, &bottom, base_normal);
    }
    if style.top_visible {
        mesh.add_fan(top_center, &top, -base_normal);
    }
    lateral_strip(&mut mesh, &top, &bottom, tangent, step);

    debug!(
        steps = steps.count,
        vertices = mesh.vertex_count(),
        "built snout"
    );
    Ok(mesh)
}

/// Builds a cylinder with an elliptical bottom face.
///
/// The bottom plane tilt `φ` between `-bottom_normal` and the axis stretches
/// the base into an ellipse with semi-axes `radius` and `radius / cos φ`.
/// Its frame is built in two stages: local Z is rotated onto the bottom
/// normal, then spun about that normal until local Y lies along the
/// unstretched direction `bottom_normal × axis`.
#[instrument(skip_all)]
pub fn skew_cylinder(
    desc: &SkewCylinder,
    style: &Style,
    cfg: &TessellationConfig,
) -> Result<Mesh, MeshError> {
    ensure_positive("cylinder radius", desc.radius)?;
    let axis = desc
        .height
        .try_normalize()
        .ok_or_else(|| MeshError::invalid_argument("cylinder height must be non-zero"))?;
    let bottom_normal = unit_or(desc.bottom_normal, -axis);
    let cos_tilt = bottom_normal.dot(-axis);
    if cos_tilt <= cfg.angle_epsilon {
        return Err(MeshError::invalid_argument(format!(
            "bottom plane must face away from the cylinder axis (cos tilt = {cos_tilt})"
        )));
    }
    let minor = desc.radius;
    let major = desc.radius / cos_tilt;

    let seed = perpendicular(
        bottom_normal,
        axis,
        reference_perpendicular(axis, cfg),
        cfg,
    );
    let lift = DQuat::from_rotation_arc(DVec3::Z, bottom_normal);
    let spin = align_about(lift * DVec3::Y, seed, bottom_normal);
    let frame = spin * lift;

    let steps = fixed_steps(TAU, cfg);
    let count = steps.count as usize;
    let step = axis_rotation(axis, steps.increment);
    let top_center = desc.origin + desc.height;

    let mut bottom: Vec<DVec3> = rotated_sequence(DVec3::Y, axis_rotation(-DVec3::Z, steps.increment), count)
        .map(|local| desc.origin + frame * DVec3::new(local.x * major, local.y * minor, 0.0))
        .collect();
    let radials: Vec<DVec3> = rotated_sequence(seed, step, count).collect();
    let mut top: Vec<DVec3> = radials
        .iter()
        .map(|v| top_center + *v * desc.radius)
        .collect();
    bottom.push(bottom[0]);
    top.push(top[0]);

    let mut mesh = Mesh::with_capacity(style.color, 4 * (count + 1) + 2);
    let first = mesh.next_index();
    for (i, (upper, lower)) in top.iter().zip(&bottom).enumerate() {
        let normal = radials[i % count];
        mesh.push(*upper, normal);
        mesh.push(*lower, normal);
    }
    mesh.close_range(Topology::TriangleStrip, first);
    if style.bottom_visible {
        mesh.add_fan(desc.origin, &bottom, bottom_normal);
    }
    if style.top_visible {
        mesh.add_fan(top_center, &top, axis);
    }

    debug!(
        steps = steps.count,
        cos_tilt,
        vertices = mesh.vertex_count(),
        "built skew cylinder"
    );
    Ok(mesh)
}
