//! # Rectangular Torus
//!
//! Sweeps a rectangular cross-section around a main axis. The section lies
//! in the plane spanned by the radial direction and the main axis, centered
//! on the start point.
//!
//! Corner order at every step:
//!
//! ```text
//!   c3 ---- c2        c0 = start - u*w/2 - n*h/2
//!   |        |        c1 = start + u*w/2 - n*h/2
//!   |   s    |        c2 = start + u*w/2 + n*h/2
//!   |        |        c3 = start - u*w/2 + n*h/2
//!   c0 ---- c1        (u radial, n main axis)
//! ```
//!
//! Faces are the corner pairs bottom `(c0, c1)`, outer `(c1, c2)`,
//! top `(c2, c3)` and inner `(c3, c0)`.

use super::torus::TorusFrame;
use super::Style;
use crate::error::{ensure_non_negative, ensure_positive, MeshError};
use crate::mesh::{Mesh, Topology};
use crate::sweep::{axis_rotation, chord_steps, fixed_steps, sweep_angle, unit_or};
use config::constants::{approx_equal, TessellationConfig};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Torus with a constant rectangular cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularTorus {
    /// Point on the main axis.
    pub center: DVec3,
    /// Center of the first cross-section.
    pub start_point: DVec3,
    /// Main axis; the sweep turns counter-clockwise about it.
    pub normal: DVec3,
    /// Section extent along the radial direction.
    pub width: f64,
    /// Section extent along the main axis.
    pub height: f64,
    /// Sweep angle in radians.
    pub angle: f64,
}

/// Rectangular torus whose section dimensions change linearly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaperedRectangularTorus {
    pub center: DVec3,
    pub start_point: DVec3,
    pub normal: DVec3,
    pub start_width: f64,
    pub start_height: f64,
    pub end_width: f64,
    pub end_height: f64,
    pub angle: f64,
}

/// Corner pairs of the four side faces, in emission order.
const FACES: [(usize, usize); 4] = [(0, 1), (1, 2), (2, 3), (3, 0)];

fn section_corners(center: DVec3, radial: DVec3, axis: DVec3, width: f64, height: f64) -> [DVec3; 4] {
    let u = radial * (width / 2.0);
    let n = axis * (height / 2.0);
    [center - u - n, center + u - n, center + u + n, center - u + n]
}

/// Builds a torus with a constant rectangular cross-section.
#[instrument(skip_all)]
pub fn rectangular_torus(
    torus: &RectangularTorus,
    style: &Style,
    cfg: &TessellationConfig,
) -> Result<Mesh, MeshError> {
    ensure_positive("torus width", torus.width)?;
    ensure_positive("torus height", torus.height)?;
    let sweep = sweep_angle(torus.angle, cfg)?;
    let frame = TorusFrame::new(torus.center, torus.start_point, torus.normal, cfg);
    let (u, n) = (frame.radial, frame.axis);

    let main = chord_steps(frame.main_vec.length() + torus.width / 2.0, sweep.radians, cfg);
    let main_step = axis_rotation(n, main.increment);
    let full_turn = axis_rotation(n, sweep.radians);

    // (corners, radial) at every step; the last entry is exact
    let corners = section_corners(torus.start_point, u, n, torus.width, torus.height);
    let mut sections = Vec::with_capacity(main.count as usize + 1);
    sections.push((corners, u));
    let mut offsets = corners.map(|c| c - torus.center);
    let mut radial = u;
    for _ in 1..main.count {
        offsets = offsets.map(|v| main_step * v);
        radial = main_step * radial;
        sections.push((offsets.map(|v| torus.center + v), radial));
    }
    if sweep.full {
        sections.push((corners, u));
    } else {
        sections.push((corners.map(|c| torus.center + full_turn * (c - torus.center)), full_turn * u));
    }

    let mut mesh = Mesh::with_capacity(style.color, 8 * sections.len() + 8);

    if !sweep.full && style.bottom_visible {
        let first = mesh.next_index();
        mesh.push_face(&corners, u.cross(n));
        mesh.close_range(Topology::Quads, first);
    }

    for (face, (a, b)) in FACES.iter().enumerate() {
        let first = mesh.next_index();
        for (section, radial) in &sections {
            let normal = match face {
                0 => -n,
                1 => *radial,
                2 => n,
                _ => -*radial,
            };
            mesh.push(section[*a], normal);
            mesh.push(section[*b], normal);
        }
        mesh.close_range(Topology::QuadStrip, first);
    }

    if !sweep.full && style.top_visible {
        let (end, end_radial) = sections[sections.len() - 1];
        let first = mesh.next_index();
        mesh.push_face(&end, n.cross(end_radial));
        mesh.close_range(Topology::Quads, first);
    }

    debug!(
        main_steps = main.count,
        full = sweep.full,
        vertices = mesh.vertex_count(),
        "built rectangular torus"
    );
    Ok(mesh)
}

/// Builds a rectangular torus whose width and height taper linearly.
///
/// Equal start and end dimensions delegate to [`rectangular_torus`].
#[instrument(skip_all)]
pub fn tapered_rectangular_torus(
    torus: &TaperedRectangularTorus,
    style: &Style,
    cfg: &TessellationConfig,
) -> Result<Mesh, MeshError> {
    ensure_non_negative("torus start width", torus.start_width)?;
    ensure_non_negative("torus start height", torus.start_height)?;
    ensure_non_negative("torus end width", torus.end_width)?;
    ensure_non_negative("torus end height", torus.end_height)?;

    if approx_equal(torus.start_width, torus.end_width, cfg.length_epsilon)
        && approx_equal(torus.start_height, torus.end_height, cfg.length_epsilon)
    {
        debug!("equal section dimensions, building constant torus");
        let constant = RectangularTorus {
            center: torus.center,
            start_point: torus.start_point,
            normal: torus.normal,
            width: torus.start_width,
            height: torus.start_height,
            angle: torus.angle,
        };
        return rectangular_torus(&constant, style, cfg);
    }

    let sweep = sweep_angle(torus.angle, cfg)?;
    let frame = TorusFrame::new(torus.center, torus.start_point, torus.normal, cfg);
    let n = frame.axis;

    let main = fixed_steps(sweep.radians, cfg);
    let steps = main.count as usize;
    let main_step = axis_rotation(n, main.increment);
    let full_turn = axis_rotation(n, sweep.radians);
    let width_step = (torus.end_width - torus.start_width) / steps as f64;
    let height_step = (torus.end_height - torus.start_height) / steps as f64;

    let mut rings: Vec<[DVec3; 4]> = Vec::with_capacity(steps + 1);
    let mut main_vec = frame.main_vec;
    let mut radial = frame.radial;
    for k in 0..steps {
        let width = torus.start_width + width_step * k as f64;
        let height = torus.start_height + height_step * k as f64;
        rings.push(section_corners(torus.center + main_vec, radial, n, width, height));
        main_vec = main_step * main_vec;
        radial = main_step * radial;
    }
    let end_radial = full_turn * frame.radial;
    rings.push(section_corners(
        torus.center + full_turn * frame.main_vec,
        end_radial,
        n,
        torus.end_width,
        torus.end_height,
    ));

    let mut mesh = Mesh::with_capacity(style.color, 8 * rings.len() + 8);
    for k in 0..rings.len() {
        let band = k.min(steps - 1);
        for (a, b) in FACES {
            let along = rings[band + 1][a] - rings[band][a];
            let across = rings[band][b] - rings[band][a];
            let fallback = match a {
                0 => -n,
                2 => n,
                _ => rings[k][a] - torus.center,
            };
            let normal = unit_or(along.cross(across), unit_or(fallback, n));
            mesh.push(rings[k][a], normal);
            mesh.push(rings[k][b], normal);
        }
    }

    for face in 0..FACES.len() {
        let indices = (0..rings.len())
            .flat_map(|k| {
                let base = (k * 8 + face * 2) as u32;
                [base, base + 1]
            })
            .collect();
        mesh.add_indexed(Topology::TriangleStrip, indices);
    }

    if !sweep.full {
        if style.top_visible {
            let first = mesh.next_index();
            mesh.push_face(&rings[steps], n.cross(end_radial));
            mesh.close_range(Topology::Quads, first);
        }
        if style.bottom_visible {
            let first = mesh.next_index();
            mesh.push_face(&rings[0], frame.radial.cross(n));
            mesh.close_range(Topology::Quads, first);
        }
    }

    debug!(
        main_steps = main.count,
        full = sweep.full,
        vertices = mesh.vertex_count(),
        "built tapered rectangular torus"
    );
    Ok(mesh)
}
