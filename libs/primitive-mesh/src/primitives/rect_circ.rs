//! # Rectangle to Circle Transition
//!
//! Loft from a rectangular base to a parallel circular top.
//!
//! The circle point count is a multiple of four so the circle splits into
//! quarter arcs starting at the back, right, front and left extremes. Each
//! rectangle side meets its extreme circle point in a flat triangle, and
//! each rectangle corner is joined to the quarter arc between two extremes
//! by a ruled strip.

use super::Style;
use crate::error::{ensure_positive, MeshError};
use crate::mesh::{Mesh, Topology};
use crate::sweep::{axis_rotation, perpendicular, reference_perpendicular, rotated_sequence, unit_or, Steps};
use config::constants::TessellationConfig;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, instrument};

/// Rectangle-to-circle transition solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectCirc {
    /// Center of the rectangular base.
    pub rect_center: DVec3,
    /// Full rectangle extent along its X direction.
    pub x_len: DVec3,
    /// Full rectangle extent across, perpendicular to `x_len` and `height`.
    pub y_len: f64,
    /// Axis from the rectangle center to the (unshifted) circle center.
    pub height: DVec3,
    /// Lateral shift of the circle.
    pub offset: DVec3,
    pub radius: f64,
}

/// Unit normal of a side triangle from its edges, turned to face `outward`.
fn sloped_normal([a, b, c]: [DVec3; 3], outward: DVec3) -> DVec3 {
    let normal = unit_or((b - a).cross(c - b), outward);
    if normal.dot(outward) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Builds the transition: top fan, bottom quad, side triangles, then the
/// four corner strips.
#[instrument(skip_all)]
pub fn rect_circ(desc: &RectCirc, style: &Style, cfg: &TessellationConfig) -> Result<Mesh, MeshError> {
    ensure_positive("transition radius", desc.radius)?;
    ensure_positive("transition depth", desc.y_len)?;
    let top_normal = desc
        .height
        .try_normalize()
        .ok_or_else(|| MeshError::invalid_argument("transition height must be non-zero"))?;
    let y_unit = perpendicular(desc.height, desc.x_len, reference_perpendicular(top_normal, cfg), cfg);
    let x_unit = unit_or(desc.x_len, y_unit.cross(top_normal));
    let y_vec = y_unit * desc.y_len;
    let circle_center = desc.rect_center + desc.height + desc.offset;

    let steps = Steps::over_quartered(TAU, cfg.default_increment);
    let count = steps.count as usize;
    let quarter = count / 4;
    let step = axis_rotation(top_normal, steps.increment);
    let circle: Vec<DVec3> = rotated_sequence(-y_unit * desc.radius, step, count)
        .map(|v| circle_center + v)
        .collect();
    let at = |i: usize| circle[i % count];

    let mut mesh = Mesh::with_capacity(style.color, count + 2 + 4 + 12 + 8 * (quarter + 1));

    let mut rim = circle.clone();
    rim.push(circle[0]);
    mesh.add_fan(circle_center, &rim, top_normal);

    let half_x = desc.x_len / 2.0;
    let half_y = y_vec / 2.0;
    let bp1 = desc.rect_center - half_x - half_y;
    let bp2 = desc.rect_center + half_x - half_y;
    let bp3 = desc.rect_center + half_x + half_y;
    let bp4 = desc.rect_center - half_x + half_y;
    let first = mesh.next_index();
    mesh.push_face(&[bp1, bp2, bp3, bp4], -top_normal);
    mesh.close_range(Topology::Quads, first);

    let first = mesh.next_index();
    for (side, outward) in [
        ([bp4, bp3, at(2 * quarter)], y_unit),
        ([bp1, bp2, at(0)], -y_unit),
        ([bp2, bp3, at(quarter)], x_unit),
        ([bp4, bp1, at(3 * quarter)], -x_unit),
    ] {
        mesh.push_face(&side, sloped_normal(side, outward));
    }
    mesh.close_range(Topology::Triangles, first);

    // (corner, first arc point, seed direction at that point)
    let corners = [
        (bp2, 0, x_unit),
        (bp3, quarter, y_unit),
        (bp4, 2 * quarter, -x_unit),
        (bp1, 3 * quarter, -y_unit),
    ];
    for (corner, start, seed) in corners {
        let first = mesh.next_index();
        for (i, direction) in rotated_sequence(seed, step, quarter + 1).enumerate() {
            let point = at(start + i);
            let normal = unit_or((corner - point).cross(direction), point - circle_center);
            mesh.push(point, normal);
            mesh.push(corner, normal);
        }
        mesh.close_range(Topology::QuadStrip, first);
    }

    debug!(
        steps = steps.count,
        vertices = mesh.vertex_count(),
        "built rectangle to circle transition"
    );
    Ok(mesh)
}
