//! # Sphere and Ellipsoid
//!
//! Latitude/longitude sweeps of a spherical or axis-symmetric ellipsoidal
//! sector.
//!
//! `angle` is the aperture of the sector measured across the top pole: a
//! full turn is the whole surface, π a hemisphere. The sweep starts on the
//! rim at polar angle `angle / 2` (measured from the top pole, which lies
//! opposite `bottom_normal`) and walks up to the top pole.
//!
//! The latitude count is made even and half of it is swept, so each band
//! spans `angle / count`. Every band is one quad strip; a partial sector
//! gets a flat fan across its rim.

use super::Style;
use crate::error::{ensure_non_negative, ensure_positive, MeshError};
use crate::mesh::{Mesh, Topology};
use crate::sweep::{axis_rotation, chord_increment, closed_ring, sweep_angle, unit_or, Steps};
use config::constants::TessellationConfig;
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use tracing::{debug, instrument};

/// Spherical sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: DVec3,
    /// Direction from the center towards the open (cap) side.
    pub bottom_normal: DVec3,
    pub radius: f64,
    /// Aperture in radians; a full turn is a closed sphere.
    pub angle: f64,
}

impl Sphere {
    /// Sphere sector of a spherical dish: a cap of `height` standing on a
    /// rim of `rim_radius` centered at `base_center`.
    ///
    /// The sphere radius is `(r² + h²) / 2h` and its center lies on the
    /// dish axis, below the base for shallow dishes and above it for deep
    /// ones.
    pub fn from_dish(base_center: DVec3, height: DVec3, rim_radius: f64) -> Result<Self, MeshError> {
        ensure_non_negative("dish rim radius", rim_radius)?;
        let h = height.length();
        ensure_positive("dish height", h)?;
        let up = height / h;

        let sum = rim_radius * rim_radius + h * h;
        let radius = sum / (2.0 * h);
        let base = PI / 2.0 - (2.0 * rim_radius * h / sum).clamp(-1.0, 1.0).asin();
        let angle = if rim_radius >= h {
            PI - 2.0 * base
        } else {
            PI + 2.0 * base
        };

        Ok(Self {
            center: base_center - up * (radius - h),
            bottom_normal: -up,
            radius,
            angle,
        })
    }
}

/// Ellipsoid of revolution sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub center: DVec3,
    /// Semi-axis towards the top pole; its length is the polar radius.
    pub polar_axis: DVec3,
    pub equatorial_radius: f64,
    /// Aperture in radians, as for [`Sphere`].
    pub angle: f64,
}

/// Builds a spherical sector.
///
/// # Example
///
/// ```rust
/// use config::constants::TessellationConfig;
/// use glam::DVec3;
/// use primitive_mesh::primitives::{sphere, Sphere, Style};
///
/// let hemisphere = Sphere {
///     center: DVec3::ZERO,
///     bottom_normal: -DVec3::Z,
///     radius: 5.0,
///     angle: std::f64::consts::PI,
/// };
/// let mesh = sphere(&hemisphere, &Style::default(), &TessellationConfig::default()).unwrap();
/// assert!(mesh.validate());
/// ```
#[instrument(skip_all)]
pub fn sphere(desc: &Sphere, style: &Style, cfg: &TessellationConfig) -> Result<Mesh, MeshError> {
    ensure_positive("sphere radius", desc.radius)?;
    let sweep = sweep_angle(desc.angle, cfg)?;
    let angle = sweep.radians;
    let bottom_normal = unit_or(desc.bottom_normal, -DVec3::Z);
    let radius = desc.radius;

    let increment = chord_increment(radius, cfg);
    let around = Steps::over(TAU, increment);
    let latitude = Steps::over_even(angle, increment);
    let bands = latitude.count / 2;

    let x_axis = DQuat::from_rotation_arc(DVec3::Z, bottom_normal) * DVec3::X;
    let y_axis = x_axis.cross(bottom_normal);
    let around_step = axis_rotation(-bottom_normal, around.increment);
    let latitude_step = axis_rotation(y_axis, latitude.increment);
    let rim = axis_rotation(y_axis, -angle / 2.0) * (-bottom_normal * radius);

    let ring_len = around.count as usize + 1;
    let mut mesh = Mesh::with_capacity(style.color, 2 * ring_len * bands as usize + ring_len + 1);

    if !sweep.full && style.bottom_visible {
        // Cap plane sits where the rim actually is, not at the center
        let cap_center = if angle > PI {
            desc.center + bottom_normal * (radius * ((angle - PI) / 2.0).sin())
        } else {
            desc.center - bottom_normal * (radius * ((PI - angle) / 2.0).sin())
        };
        let ring = closed_ring(desc.center, rim, around_step, around.count);
        mesh.add_fan(cap_center, &ring, bottom_normal);
    }

    let mut lower = rim;
    for _ in 0..bands {
        let upper = latitude_step * lower;
        let first = mesh.next_index();
        let ring_lower = closed_ring(desc.center, lower, around_step, around.count);
        let ring_upper = closed_ring(desc.center, upper, around_step, around.count);
        for (a, b) in ring_lower.iter().zip(&ring_upper) {
            mesh.push(*a, unit_or(*a - desc.center, -bottom_normal));
            mesh.push(*b, unit_or(*b - desc.center, -bottom_normal));
        }
        mesh.close_range(Topology::QuadStrip, first);
        lower = upper;
    }

    debug!(
        around = around.count,
        bands,
        full = sweep.full,
        vertices = mesh.vertex_count(),
        "built sphere"
    );
    Ok(mesh)
}

/// Builds an ellipsoidal sector.
///
/// Normals follow the gradient of the implicit surface rather than the
/// radial direction.
#[instrument(skip_all)]
pub fn ellipsoid(
    desc: &Ellipsoid,
    style: &Style,
    cfg: &TessellationConfig,
) -> Result<Mesh, MeshError> {
    ensure_positive("ellipsoid equatorial radius", desc.equatorial_radius)?;
    let polar = desc.polar_axis.length();
    ensure_positive("ellipsoid polar radius", polar)?;
    let sweep = sweep_angle(desc.angle, cfg)?;
    let angle = sweep.radians;
    let (a, b) = (polar, desc.equatorial_radius);
    let up = desc.polar_axis / polar;
    let bottom_normal = -up;

    let increment = chord_increment(b, cfg);
    let around = Steps::over(TAU, increment);
    let latitude = Steps::over_even(angle, increment);
    let bands = latitude.count / 2;

    let local_to_world = DQuat::from_rotation_arc(DVec3::Z, up);
    let around_step = axis_rotation(up, around.increment);
    let surface = |theta: f64| local_to_world * DVec3::new(b * theta.sin(), 0.0, a * theta.cos());
    let gradient = |theta: f64| {
        unit_or(
            local_to_world * DVec3::new(theta.sin() / b, 0.0, theta.cos() / a),
            up,
        )
    };

    let ring_len = around.count as usize + 1;
    let mut mesh = Mesh::with_capacity(style.color, 2 * ring_len * bands as usize + ring_len + 1);

    if !sweep.full && style.bottom_visible {
        let rim_angle = angle / 2.0;
        let cap_center = desc.center + local_to_world * DVec3::new(0.0, 0.0, a * rim_angle.cos());
        let ring = closed_ring(desc.center, surface(rim_angle), around_step, around.count);
        mesh.add_fan(cap_center, &ring, bottom_normal);
    }

    let mut theta = angle / 2.0;
    for _ in 0..bands {
        let next = theta - latitude.increment;
        let points = [
            closed_ring(desc.center, surface(theta), around_step, around.count),
            closed_ring(desc.center, surface(next), around_step, around.count),
        ];
        let normals = [
            closed_ring(DVec3::ZERO, gradient(theta), around_step, around.count),
            closed_ring(DVec3::ZERO, gradient(next), around_step, around.count),
        ];
        let first = mesh.next_index();
        for j in 0..ring_len {
            mesh.push(points[0][j], normals[0][j]);
            mesh.push(points[1][j], normals[1][j]);
        }
        mesh.close_range(Topology::QuadStrip, first);
        theta = next;
    }

    debug!(
        around = around.count,
        bands,
        full = sweep.full,
        vertices = mesh.vertex_count(),
        "built ellipsoid"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PrimitiveGroup;
    use approx::assert_relative_eq;

    fn ball(angle: f64) -> Sphere {
        Sphere {
            center: DVec3::new(1.0, -2.0, 3.0),
            bottom_normal: -DVec3::Z,
            radius: 5.0,
            angle,
        }
    }

    fn fan_center(mesh: &Mesh, group: &PrimitiveGroup) -> DVec3 {
        assert_eq!(group.topology(), Topology::TriangleFan);
        mesh.vertex(group.indices()[0])
    }

    #[test]
    fn test_full_sphere() {
        let cfg = TessellationConfig::default();
        let desc = ball(TAU);
        let mesh = sphere(&desc, &Style::default(), &cfg).unwrap();
        let latitude = Steps::over_even(TAU, chord_increment(5.0, &cfg));
        assert_eq!(mesh.group_count(), (latitude.count / 2) as usize);
        assert!(mesh
            .groups()
            .iter()
            .all(|g| g.topology() == Topology::QuadStrip));
        for (p, n) in mesh.vertices().iter().zip(mesh.normals()) {
            assert_relative_eq!((*p - desc.center).length(), 5.0, epsilon = 1e-9);
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-9);
            assert!((*n - (*p - desc.center) / 5.0).length() < 1e-9);
        }
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.z, -2.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hemisphere_cap() {
        let cfg = TessellationConfig::default();
        let desc = ball(PI);
        let mesh = sphere(&desc, &Style::default(), &cfg).unwrap();
        let cap = &mesh.groups()[0];
        assert_eq!(fan_center(&mesh, cap), desc.center);
        for i in cap.indices() {
            assert_eq!(mesh.normal(i), -DVec3::Z);
            assert_relative_eq!(mesh.vertex(i).z, 3.0, epsilon = 1e-9);
        }
        let (min, _) = mesh.bounding_box();
        assert_relative_eq!(min.z, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_large_sector_cap_below_center() {
        let cfg = TessellationConfig::default();
        let desc = ball(1.5 * PI);
        let mesh = sphere(&desc, &Style::default(), &cfg).unwrap();
        let cap = &mesh.groups()[0];
        let center = fan_center(&mesh, cap);
        let rim = mesh.vertex(cap.indices()[1]);
        assert_relative_eq!(center.z, rim.z, epsilon = 1e-9);
        assert!(center.z < desc.center.z);
    }

    #[test]
    fn test_sphere_hidden_cap() {
        let cfg = TessellationConfig::default();
        let style = Style::default().with_caps(true, false);
        let mesh = sphere(&ball(PI), &style, &cfg).unwrap();
        assert!(mesh
            .groups()
            .iter()
            .all(|g| g.topology() == Topology::QuadStrip));
    }

    #[test]
    fn test_sphere_rejects_bad_input() {
        let cfg = TessellationConfig::default();
        let mut bad = ball(PI);
        bad.radius = 0.0;
        assert!(sphere(&bad, &Style::default(), &cfg).is_err());
        assert!(sphere(&ball(-1.0), &Style::default(), &cfg).is_err());
    }

    #[test]
    fn test_dish_hemisphere() {
        let dish = Sphere::from_dish(DVec3::ZERO, DVec3::new(0.0, 0.0, 3.0), 3.0).unwrap();
        assert_relative_eq!(dish.radius, 3.0);
        assert_relative_eq!(dish.angle, PI, epsilon = 1e-12);
        assert!(dish.center.length() < 1e-12);
        assert_eq!(dish.bottom_normal, -DVec3::Z);
    }

    #[test]
    fn test_shallow_dish_spans_base_to_top() {
        let cfg = TessellationConfig::default();
        let dish = Sphere::from_dish(DVec3::ZERO, DVec3::new(0.0, 0.0, 2.0), 4.0).unwrap();
        assert_relative_eq!(dish.radius, 5.0, epsilon = 1e-12);
        assert_relative_eq!(dish.center.z, -3.0, epsilon = 1e-12);
        let mesh = sphere(&dish, &Style::default(), &cfg).unwrap();
        let cap = &mesh.groups()[0];
        assert!(fan_center(&mesh, cap).length() < 1e-9);
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 2.0, epsilon = 1e-9);
        for i in cap.indices().into_iter().skip(1) {
            assert_relative_eq!(mesh.vertex(i).length(), 4.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_deep_dish_center_above_base() {
        let dish = Sphere::from_dish(DVec3::ZERO, DVec3::new(0.0, 0.0, 4.0), 2.0).unwrap();
        assert_relative_eq!(dish.radius, 2.5, epsilon = 1e-12);
        assert_relative_eq!(dish.center.z, 1.5, epsilon = 1e-12);
        assert!(dish.angle > PI);
    }

    #[test]
    fn test_dish_rejects_zero_height() {
        assert!(Sphere::from_dish(DVec3::ZERO, DVec3::ZERO, 1.0).is_err());
    }

    fn egg(angle: f64) -> Ellipsoid {
        Ellipsoid {
            center: DVec3::ZERO,
            polar_axis: DVec3::new(0.0, 0.0, 6.0),
            equatorial_radius: 3.0,
            angle,
        }
    }

    #[test]
    fn test_ellipsoid_points_and_gradient_normals() {
        let cfg = TessellationConfig::default();
        let mesh = ellipsoid(&egg(TAU), &Style::default(), &cfg).unwrap();
        assert!(mesh.validate());
        for (p, n) in mesh.vertices().iter().zip(mesh.normals()) {
            let implicit = (p.x * p.x + p.y * p.y) / 9.0 + p.z * p.z / 36.0;
            assert_relative_eq!(implicit, 1.0, epsilon = 1e-9);
            let gradient = DVec3::new(p.x / 9.0, p.y / 9.0, p.z / 36.0).normalize();
            assert!((*n - gradient).length() < 1e-9);
        }
    }

    #[test]
    fn test_half_ellipsoid_cap_first() {
        let cfg = TessellationConfig::default();
        let mesh = ellipsoid(&egg(PI), &Style::default(), &cfg).unwrap();
        let groups = mesh.groups();
        let cap = &groups[0];
        assert_eq!(cap.topology(), Topology::TriangleFan);
        assert!(fan_center(&mesh, cap).length() < 1e-9);
        for i in cap.indices() {
            assert_eq!(mesh.normal(i), -DVec3::Z);
        }
        assert!(groups[1..]
            .iter()
            .all(|g| g.topology() == Topology::QuadStrip));
    }

    #[test]
    fn test_sphere_and_ellipsoid_share_group_layout() {
        let cfg = TessellationConfig::default();
        let ball = Sphere {
            center: DVec3::ZERO,
            bottom_normal: -DVec3::Z,
            radius: 3.0,
            angle: PI,
        };
        let round = Ellipsoid {
            center: DVec3::ZERO,
            polar_axis: DVec3::new(0.0, 0.0, 3.0),
            equatorial_radius: 3.0,
            angle: PI,
        };
        let a = sphere(&ball, &Style::default(), &cfg).unwrap();
        let b = ellipsoid(&round, &Style::default(), &cfg).unwrap();
        let layout = |m: &Mesh| -> Vec<(Topology, usize)> {
            m.groups().iter().map(|g| (g.topology(), g.len())).collect()
        };
        assert_eq!(layout(&a), layout(&b));
    }

    #[test]
    fn test_ellipsoid_rejects_zero_axis() {
        let cfg = TessellationConfig::default();
        let mut bad = egg(PI);
        bad.polar_axis = DVec3::ZERO;
        assert!(ellipsoid(&bad, &Style::default(), &cfg).is_err());
    }
}
