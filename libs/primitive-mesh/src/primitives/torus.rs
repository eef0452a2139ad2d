//! # Circular Torus
//!
//! Sweeps a circular cross-section around a main axis.
//!
//! ## Algorithm
//!
//! Constant section:
//! 1. Main and section step counts come from the chord tolerance, using
//!    `|start - center| + radius` and `radius`
//! 2. The first ring is built by rotating the radial direction about the
//!    section plane normal
//! 3. Each following ring is the previous ring rotated by one main step;
//!    consecutive rings are joined by a quad strip whose normals point from
//!    the ring center to each vertex
//! 4. The last ring is taken from the full-angle rotation (or is the first
//!    ring for a closed revolution), so the sweep ends exactly
//!
//! Tapered section: fixed increments for both sweeps, the section radius
//! is interpolated linearly, and all rings are joined by one indexed
//! triangle strip whose first and transition triangles close the seams.

use super::Style;
use crate::error::{ensure_non_negative, ensure_positive, MeshError};
use crate::mesh::{Mesh, Topology};
use crate::sweep::{
    axis_rotation, chord_steps, closed_ring, fixed_steps, reference_perpendicular,
    rotated_sequence, sweep_angle, unit_or,
};
use config::constants::{approx_equal, TessellationConfig};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, instrument};

/// Torus with a constant circular cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularTorus {
    /// Point on the main axis.
    pub center: DVec3,
    /// Center of the first cross-section.
    pub start_point: DVec3,
    /// Main axis; the sweep turns counter-clockwise about it.
    pub normal: DVec3,
    /// Cross-section radius.
    pub radius: f64,
    /// Sweep angle in radians.
    pub angle: f64,
}

/// Torus whose cross-section radius changes linearly along the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaperedCircularTorus {
    pub center: DVec3,
    pub start_point: DVec3,
    pub normal: DVec3,
    pub start_radius: f64,
    pub end_radius: f64,
    pub angle: f64,
}

/// Orthonormal sweep frame at the start of a torus.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TorusFrame {
    /// Unit main axis.
    pub axis: DVec3,
    /// Unit direction from the axis towards the start point.
    pub radial: DVec3,
    /// `start_point - center`, unmodified.
    pub main_vec: DVec3,
}

impl TorusFrame {
    pub(crate) fn new(
        center: DVec3,
        start_point: DVec3,
        normal: DVec3,
        cfg: &TessellationConfig,
    ) -> Self {
        let axis = unit_or(normal, DVec3::Z);
        let main_vec = start_point - center;
        let in_plane = main_vec - axis * main_vec.dot(axis);
        let radial = match in_plane.try_normalize() {
            Some(radial)
                if in_plane.length_squared()
                    >= cfg.parallel_epsilon * main_vec.length_squared() =>
            {
                radial
            }
            _ => {
                debug!("torus start point lies on the main axis, using reference direction");
                reference_perpendicular(axis, cfg)
            }
        };
        Self {
            axis,
            radial,
            main_vec,
        }
    }
}

/// Builds a torus with a constant circular cross-section.
///
/// # Example
///
/// ```rust
/// use config::constants::TessellationConfig;
/// use glam::DVec3;
/// use primitive_mesh::primitives::{circular_torus, CircularTorus, Style};
///
/// let torus = CircularTorus {
///     center: DVec3::ZERO,
///     start_point: DVec3::new(10.0, 0.0, 0.0),
///     normal: DVec3::Z,
///     radius: 2.0,
///     angle: std::f64::consts::FRAC_PI_2,
/// };
/// let mesh = circular_torus(&torus, &Style::default(), &TessellationConfig::default()).unwrap();
/// assert!(mesh.validate());
/// ```
#[instrument(skip_all)]
pub fn circular_torus(
    torus: &CircularTorus,
    style: &Style,
    cfg: &TessellationConfig,
) -> Result<Mesh, MeshError> {
    ensure_positive("torus radius", torus.radius)?;
    let sweep = sweep_angle(torus.angle, cfg)?;
    let frame = TorusFrame::new(torus.center, torus.start_point, torus.normal, cfg);

    let main = chord_steps(frame.main_vec.length() + torus.radius, sweep.radians, cfg);
    let main_step = axis_rotation(frame.axis, main.increment);

    let sub = chord_steps(torus.radius, TAU, cfg);
    let sub_normal = frame.axis.cross(frame.radial);
    let sub_step = axis_rotation(sub_normal, sub.increment);

    let first_ring = closed_ring(
        torus.start_point,
        frame.radial * torus.radius,
        sub_step,
        sub.count,
    );
    let ring_len = first_ring.len();
    let mut mesh = Mesh::with_capacity(
        style.color,
        2 * ring_len * main.count as usize + 2 * (ring_len + 1),
    );

    if !sweep.full && style.bottom_visible {
        mesh.add_fan(torus.start_point, &first_ring, -sub_normal);
    }

    let full_turn = axis_rotation(frame.axis, sweep.radians);
    let (last_ring, last_center) = if sweep.full {
        (first_ring.clone(), torus.start_point)
    } else {
        let ring = first_ring
            .iter()
            .map(|p| torus.center + full_turn * (*p - torus.center))
            .collect();
        (ring, torus.center + full_turn * frame.main_vec)
    };

    let mut offsets: Vec<DVec3> = first_ring.iter().map(|p| *p - torus.center).collect();
    let mut prev_ring = first_ring;
    let mut prev_center = torus.start_point;
    for _ in 1..main.count {
        for offset in &mut offsets {
            *offset = main_step * *offset;
        }
        let ring: Vec<DVec3> = offsets.iter().map(|v| torus.center + *v).collect();
        let ring_center = torus.center + main_step * (prev_center - torus.center);
        stitch_rings(&mut mesh, &prev_ring, prev_center, &ring, ring_center, frame.axis);
        prev_ring = ring;
        prev_center = ring_center;
    }
    stitch_rings(&mut mesh, &prev_ring, prev_center, &last_ring, last_center, frame.axis);

    if !sweep.full && style.top_visible {
        mesh.add_fan(last_center, &last_ring, full_turn * sub_normal);
    }

    debug!(
        main_steps = main.count,
        section_steps = sub.count,
        full = sweep.full,
        vertices = mesh.vertex_count(),
        "built circular torus"
    );
    Ok(mesh)
}

/// Joins two closed rings with a quad strip carrying true surface normals.
fn stitch_rings(
    mesh: &mut Mesh,
    prev: &[DVec3],
    prev_center: DVec3,
    next: &[DVec3],
    next_center: DVec3,
    fallback: DVec3,
) {
    let first = mesh.next_index();
    for (a, b) in prev.iter().zip(next) {
        mesh.push(*a, unit_or(*a - prev_center, fallback));
        mesh.push(*b, unit_or(*b - next_center, fallback));
    }
    mesh.close_range(Topology::QuadStrip, first);
}

/// Builds a torus whose cross-section radius tapers from `start_radius` to
/// `end_radius`.
///
/// Equal radii delegate to [`circular_torus`].
#[instrument(skip_all)]
pub fn tapered_circular_torus(
    torus: &TaperedCircularTorus,
    style: &Style,
    cfg: &TessellationConfig,
) -> Result<Mesh, MeshError> {
    ensure_non_negative("torus start radius", torus.start_radius)?;
    ensure_non_negative("torus end radius", torus.end_radius)?;

    if approx_equal(torus.start_radius, torus.end_radius, cfg.length_epsilon) {
        debug!("equal section radii, building constant torus");
        let constant = CircularTorus {
            center: torus.center,
            start_point: torus.start_point,
            normal: torus.normal,
            radius: torus.start_radius,
            angle: torus.angle,
        };
        return circular_torus(&constant, style, cfg);
    }

    let sweep = sweep_angle(torus.angle, cfg)?;
    let frame = TorusFrame::new(torus.center, torus.start_point, torus.normal, cfg);

    let main = fixed_steps(sweep.radians, cfg);
    let main_step = axis_rotation(frame.axis, main.increment);
    let sub = fixed_steps(TAU, cfg);
    let n = sub.count as usize;
    let ring_count = main.count as usize + 1;
    let factor = (torus.end_radius - torus.start_radius) / main.count as f64;

    // Ring k: (section center, unit radial, section plane normal, radius)
    let mut sections = Vec::with_capacity(ring_count);
    let mut main_vec = frame.main_vec;
    let mut radial = frame.radial;
    let mut face_normal = frame.radial.cross(frame.axis);
    let mut radius = torus.start_radius;
    sections.push((torus.start_point, radial, face_normal, radius));
    for _ in 1..main.count {
        main_vec = main_step * main_vec;
        radial = main_step * radial;
        face_normal = main_step * face_normal;
        radius += factor;
        sections.push((torus.center + main_vec, radial, face_normal, radius));
    }
    let full_turn = axis_rotation(frame.axis, sweep.radians);
    let end_center = torus.center + full_turn * frame.main_vec;
    let end_face_normal = full_turn * frame.radial.cross(frame.axis);
    sections.push((
        end_center,
        full_turn * frame.radial,
        end_face_normal,
        torus.end_radius,
    ));

    let mut rings: Vec<Vec<DVec3>> = Vec::with_capacity(ring_count);
    let mut tangents: Vec<Vec<DVec3>> = Vec::with_capacity(ring_count);
    for (center, radial, face_normal, radius) in &sections {
        let step = axis_rotation(*face_normal, sub.increment);
        rings.push(
            rotated_sequence(*radial * *radius, step, n)
                .map(|v| *center + v)
                .collect(),
        );
        tangents.push(rotated_sequence(frame.axis, step, n).collect());
    }

    let mut mesh = Mesh::with_capacity(style.color, ring_count * n + 2 * (n + 2));
    for k in 0..ring_count {
        let (ahead, behind) = if k == 0 { (0, 1) } else { (k - 1, k) };
        for j in 0..n {
            let along = rings[ahead][j] - rings[behind][j];
            let normal = unit_or(tangents[k][j].cross(along), rings[k][j] - sections[k].0);
            mesh.push(rings[k][j], unit_or(normal, frame.axis));
        }
    }

    let index = |k: usize, j: usize| (k * n + j) as u32;
    let mut strip = Vec::with_capacity(2 * n * main.count as usize + 2);
    strip.push(index(0, n - 1));
    for k in 0..main.count as usize {
        for j in 0..n {
            strip.push(index(k, j));
            strip.push(index(k + 1, j));
        }
    }
    strip.push(index(ring_count - 1, 0));
    mesh.add_indexed(Topology::TriangleStrip, strip);

    if !sweep.full {
        if style.top_visible {
            let rim = close_loop(&rings[ring_count - 1]);
            mesh.add_fan(end_center, &rim, -end_face_normal);
        }
        if style.bottom_visible {
            let rim = close_loop(&rings[0]);
            mesh.add_fan(torus.start_point, &rim, frame.radial.cross(frame.axis));
        }
    }

    debug!(
        main_steps = main.count,
        section_steps = sub.count,
        full = sweep.full,
        vertices = mesh.vertex_count(),
        "built tapered circular torus"
    );
    Ok(mesh)
}

/// Copies an open ring and repeats its first point.
fn close_loop(ring: &[DVec3]) -> Vec<DVec3> {
    let mut rim = ring.to_vec();
    if let Some(&first) = ring.first() {
        rim.push(first);
    }
    rim
}
