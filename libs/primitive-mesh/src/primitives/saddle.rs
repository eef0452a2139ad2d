//! # Saddle
//!
//! Rectangular block with a cylindrical cradle cut into its top along the
//! X direction.
//!
//! When the cradle radius is smaller than half the block depth the top keeps
//! two flat strips beside a half-cylinder notch. A larger radius turns the
//! whole top into one shallow arc from the back edge to the front edge.

use super::Style;
use crate::error::{ensure_positive, MeshError};
use crate::mesh::{Mesh, Topology};
use crate::sweep::{axis_rotation, perpendicular, reference_perpendicular, unit_or, Steps};
use config::constants::TessellationConfig;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, instrument};

/// Saddle block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Saddle {
    /// Center of the bottom face.
    pub origin: DVec3,
    /// Full length along the cradle axis.
    pub x_len: DVec3,
    /// Full depth across the cradle.
    pub y_len: f64,
    /// Full height of the block.
    pub z_len: DVec3,
    /// Cradle radius.
    pub radius: f64,
}

/// Builds a saddle: a quads group (bottom, top flats, front, back), the
/// cradle quad strip and the left and right side strips.
#[instrument(skip_all)]
pub fn saddle(desc: &Saddle, style: &Style, cfg: &TessellationConfig) -> Result<Mesh, MeshError> {
    ensure_positive("saddle depth", desc.y_len)?;
    ensure_positive("saddle radius", desc.radius)?;
    ensure_positive("saddle length", desc.x_len.length())?;
    ensure_positive("saddle height", desc.z_len.length())?;

    let x_unit = unit_or(desc.x_len, DVec3::X);
    let z_unit = unit_or(desc.z_len, DVec3::Z);
    let y_normal = perpendicular(desc.z_len, desc.x_len, reference_perpendicular(z_unit, cfg), cfg);
    let y_vec = y_normal * desc.y_len;
    let half_x = desc.x_len / 2.0;
    let half_y = y_vec / 2.0;

    let bp1 = desc.origin - half_x - half_y;
    let bp2 = desc.origin + half_x - half_y;
    let bp3 = desc.origin + half_x + half_y;
    let bp4 = desc.origin - half_x + half_y;
    let [tp1, tp2, tp3, tp4] = [bp1, bp2, bp3, bp4].map(|p| p + desc.z_len);

    let half_depth = desc.y_len / 2.0;
    let flat = y_normal * (half_depth - desc.radius);
    let has_flats = desc.radius < half_depth;

    let mut mesh = Mesh::new(style.color);
    let first = mesh.next_index();
    mesh.push_face(&[bp1, bp2, bp3, bp4], -z_unit);
    if has_flats {
        mesh.push_face(&[tp1, tp2, tp2 + flat, tp1 + flat], z_unit);
        mesh.push_face(&[tp4 - flat, tp3 - flat, tp3, tp4], z_unit);
    }
    mesh.push_face(&[tp4, tp3, bp3, bp4], y_normal);
    mesh.push_face(&[bp1, bp2, tp2, tp1], -y_normal);
    mesh.close_range(Topology::Quads, first);

    let (arc_center, sweep) = if desc.radius > half_depth {
        let half_angle = (half_depth / desc.radius).asin();
        (
            tp1 + half_y + z_unit * (half_angle.cos() * desc.radius),
            2.0 * half_angle,
        )
    } else {
        (tp1 + half_y, PI)
    };
    let steps = Steps::over(sweep, cfg.default_increment);
    let count = steps.count as usize;
    let step = axis_rotation(x_unit, steps.increment);
    let arc_start = if has_flats { tp1 + flat } else { tp1 };

    let mut arc = Vec::with_capacity(count + 1);
    let mut to_center = arc_center - arc_start;
    let first = mesh.next_index();
    for _ in 0..=count {
        let point = arc_center - to_center;
        let normal = unit_or(to_center, z_unit);
        mesh.push(point, normal);
        mesh.push(point + desc.x_len, normal);
        arc.push(point);
        to_center = step * to_center;
    }
    mesh.close_range(Topology::QuadStrip, first);

    // Left side: bottom edge points paired with the arc above them
    let (rect_start, rect_len) = if has_flats {
        (bp1 + flat, desc.radius * 2.0)
    } else {
        (bp1, desc.y_len)
    };
    let rect_step = y_normal * (rect_len / count as f64);
    let mut left = Vec::with_capacity(2 * count + 6);
    if has_flats {
        left.extend([bp1, tp1]);
    }
    let mut rect_point = rect_start;
    for point in &arc {
        left.extend([rect_point, *point]);
        rect_point += rect_step;
    }
    if has_flats {
        left.extend([bp4, tp4]);
    }

    let first = mesh.next_index();
    mesh.push_face(&left, -x_unit);
    mesh.close_range(Topology::QuadStrip, first);

    let right: Vec<DVec3> = left.iter().map(|p| *p + desc.x_len).collect();
    let first = mesh.next_index();
    mesh.push_face(&right, x_unit);
    mesh.close_range(Topology::QuadStrip, first);

    debug!(
        arc_steps = steps.count,
        has_flats,
        vertices = mesh.vertex_count(),
        "built saddle"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn block(radius: f64) -> Saddle {
        Saddle {
            origin: DVec3::ZERO,
            x_len: DVec3::new(6.0, 0.0, 0.0),
            y_len: 4.0,
            z_len: DVec3::new(0.0, 0.0, 3.0),
            radius,
        }
    }

    #[test]
    fn test_small_radius_keeps_flats() {
        let cfg = TessellationConfig::default();
        let mesh = saddle(&block(1.0), &Style::default(), &cfg).unwrap();
        let count = Steps::over(PI, cfg.default_increment).count as usize;
        let lens: Vec<usize> = mesh.groups().iter().map(|g| g.len()).collect();
        assert_eq!(
            lens,
            vec![20, 2 * (count + 1), 2 * (count + 1) + 4, 2 * (count + 1) + 4]
        );
        assert!(mesh.validate());
    }

    #[test]
    fn test_notch_is_half_cylinder() {
        let cfg = TessellationConfig::default();
        let mesh = saddle(&block(1.0), &Style::default(), &cfg).unwrap();
        let arc = &mesh.groups()[1];
        let axis_point = DVec3::new(-3.0, 0.0, 3.0);
        let mut lowest = f64::MAX;
        for i in arc.indices() {
            let p = mesh.vertex(i);
            let radial = (p - axis_point) - DVec3::X * (p - axis_point).x;
            assert_relative_eq!(radial.length(), 1.0, epsilon = 1e-9);
            // Normals point from the surface towards the cradle axis
            assert!((mesh.normal(i) + radial).length() < 1e-9);
            lowest = lowest.min(p.z);
        }
        assert_relative_eq!(lowest, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_large_radius_spans_whole_top() {
        let cfg = TessellationConfig::default();
        let mesh = saddle(&block(4.0), &Style::default(), &cfg).unwrap();
        let groups = mesh.groups();
        assert_eq!(groups[0].len(), 12);
        let arc = groups[1].indices();
        let first = mesh.vertex(arc[0]);
        let last = mesh.vertex(arc[arc.len() - 2]);
        assert!((first - DVec3::new(-3.0, -2.0, 3.0)).length() < 1e-9);
        assert!((last - DVec3::new(-3.0, 2.0, 3.0)).length() < 1e-9);
        // No flats, so the side strips have no extra pairs
        assert_eq!(groups[2].len(), arc.len());
    }

    #[test]
    fn test_side_normals() {
        let cfg = TessellationConfig::default();
        let mesh = saddle(&block(1.0), &Style::default(), &cfg).unwrap();
        for i in mesh.groups()[2].indices() {
            assert_eq!(mesh.normal(i), -DVec3::X);
            assert_relative_eq!(mesh.vertex(i).x, -3.0, epsilon = 1e-12);
        }
        for i in mesh.groups()[3].indices() {
            assert_eq!(mesh.normal(i), DVec3::X);
            assert_relative_eq!(mesh.vertex(i).x, 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_millimetre_saddle_keeps_depth() {
        let cfg = TessellationConfig::default();
        let small = Saddle {
            origin: DVec3::ZERO,
            x_len: DVec3::new(0.002, 0.0, 0.0),
            y_len: 0.002,
            z_len: DVec3::new(0.0, 0.0, 0.002),
            radius: 0.0005,
        };
        let mesh = saddle(&small, &Style::default(), &cfg).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(max.y - min.y, 0.002, epsilon = 1e-12);
        assert_relative_eq!(max.x - min.x, 0.002, epsilon = 1e-12);
        assert_relative_eq!(max.z - min.z, 0.002, epsilon = 1e-12);

        let full = saddle(&block(1.0), &Style::default(), &cfg).unwrap();
        let layout = |m: &Mesh| -> Vec<(Topology, usize)> {
            m.groups().iter().map(|g| (g.topology(), g.len())).collect()
        };
        assert_eq!(layout(&mesh), layout(&full));
    }

    #[test]
    fn test_saddle_rejects_bad_input() {
        let cfg = TessellationConfig::default();
        let mut bad = block(1.0);
        bad.y_len = 0.0;
        assert!(saddle(&bad, &Style::default(), &cfg).is_err());
        let mut bad = block(1.0);
        bad.z_len = DVec3::ZERO;
        assert!(saddle(&bad, &Style::default(), &cfg).is_err());
    }
}
