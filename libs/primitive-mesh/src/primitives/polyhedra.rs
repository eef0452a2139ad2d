//! # Polyhedra
//!
//! Closed-form solids with flat faces: rectangular pyramid frustum, wedge
//! and regular prism. Each face gets its own normal from its edge vectors.

use super::Style;
use crate::error::{ensure_non_negative, MeshError};
use crate::mesh::{Mesh, Topology};
use crate::sweep::{axis_rotation, reference_perpendicular, rotated_sequence, unit_or};
use config::constants::TessellationConfig;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, instrument};

/// Rectangular pyramid or frustum with an optionally shifted top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pyramid {
    /// Center of the bottom rectangle.
    pub origin: DVec3,
    /// Axis from the bottom center to the (unshifted) top center.
    pub height: DVec3,
    /// Direction of the rectangles' X extent.
    pub x_axis: DVec3,
    /// Lateral shift of the top rectangle.
    pub offset: DVec3,
    pub bottom_x: f64,
    pub bottom_y: f64,
    /// Zero top extents give a pointed pyramid.
    pub top_x: f64,
    pub top_y: f64,
}

/// Triangular prism spanned by two base edges and a height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wedge {
    pub origin: DVec3,
    pub edge1: DVec3,
    pub edge2: DVec3,
    pub height: DVec3,
}

/// Right prism over a regular polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prism {
    /// Center of the bottom polygon.
    pub origin: DVec3,
    pub height: DVec3,
    /// First corner of the bottom polygon.
    pub bottom_start: DVec3,
    /// Number of sides, at least 3.
    pub edges: u32,
}

/// Builds a pyramid frustum as one quads group: bottom, top, then the four
/// sides.
#[instrument(skip_all)]
pub fn pyramid(desc: &Pyramid, style: &Style, cfg: &TessellationConfig) -> Result<Mesh, MeshError> {
    ensure_non_negative("pyramid bottom x", desc.bottom_x)?;
    ensure_non_negative("pyramid bottom y", desc.bottom_y)?;
    ensure_non_negative("pyramid top x", desc.top_x)?;
    ensure_non_negative("pyramid top y", desc.top_y)?;
    let z = desc
        .height
        .try_normalize()
        .ok_or_else(|| MeshError::invalid_argument("pyramid height must be non-zero"))?;
    let x = unit_or(
        desc.x_axis - z * desc.x_axis.dot(z),
        reference_perpendicular(z, cfg),
    );
    let y = z.cross(x);

    let rectangle = |center: DVec3, dx: f64, dy: f64| {
        let (hx, hy) = (x * dx / 2.0, y * dy / 2.0);
        [
            center - hx - hy,
            center + hx - hy,
            center + hx + hy,
            center - hx + hy,
        ]
    };
    let [p1, p2, p3, p4] = rectangle(desc.origin, desc.bottom_x, desc.bottom_y);
    let top_center = desc.origin + desc.height + desc.offset;
    let [p5, p6, p7, p8] = rectangle(top_center, desc.top_x, desc.top_y);

    let mut mesh = Mesh::with_capacity(style.color, 24);
    let first = mesh.next_index();
    mesh.push_face(&[p1, p2, p3, p4], -z);
    mesh.push_face(&[p5, p6, p7, p8], z);
    // Side normals from the face diagonals stay defined when the top collapses
    for [a, b, c, d] in [
        [p1, p2, p6, p5],
        [p2, p3, p7, p6],
        [p3, p4, p8, p7],
        [p4, p1, p5, p8],
    ] {
        let normal = unit_or((c - a).cross(d - b), (a + b - desc.origin * 2.0).normalize_or_zero());
        mesh.push_face(&[a, b, c, d], normal);
    }
    mesh.close_range(Topology::Quads, first);

    debug!(vertices = mesh.vertex_count(), "built pyramid");
    Ok(mesh)
}

/// Builds a wedge: a triangles group with both caps and a quads group with
/// the three sides.
#[instrument(skip_all)]
pub fn wedge(desc: &Wedge, style: &Style, _cfg: &TessellationConfig) -> Result<Mesh, MeshError> {
    let Wedge {
        origin,
        edge1,
        edge2,
        height,
    } = *desc;
    let up = unit_or(height, DVec3::Z);
    let bottom_normal = unit_or(edge2.cross(edge1), -up);
    let v = [
        origin,
        origin + edge1,
        origin + edge2,
        origin + height,
        origin + edge1 + height,
        origin + edge2 + height,
    ];

    let mut mesh = Mesh::with_capacity(style.color, 18);
    let first = mesh.next_index();
    mesh.push_face(&v[..3], bottom_normal);
    mesh.push_face(&v[3..], -bottom_normal);
    mesh.close_range(Topology::Triangles, first);

    let first = mesh.next_index();
    mesh.push_face(&[v[0], v[1], v[4], v[3]], unit_or(edge1.cross(height), -bottom_normal.cross(up)));
    mesh.push_face(&[v[2], v[0], v[3], v[5]], unit_or(height.cross(edge2), bottom_normal.cross(up)));
    mesh.push_face(&[v[1], v[2], v[5], v[4]], unit_or((edge2 - edge1).cross(height), up.cross(bottom_normal)));
    mesh.close_range(Topology::Quads, first);

    debug!(vertices = mesh.vertex_count(), "built wedge");
    Ok(mesh)
}

/// Builds a regular prism: bottom fan, top fan and a quads group of sides.
///
/// The bottom corners are `bottom_start` rotated about the axis in equal
/// steps.
#[instrument(skip_all)]
pub fn prism(desc: &Prism, style: &Style, _cfg: &TessellationConfig) -> Result<Mesh, MeshError> {
    if desc.edges < 3 {
        return Err(MeshError::invalid_argument(format!(
            "prism needs at least 3 edges: {}",
            desc.edges
        )));
    }
    let edges = desc.edges as usize;
    let bottom_normal = unit_or(-desc.height, -DVec3::Z);
    let step = axis_rotation(bottom_normal, TAU / edges as f64);

    let mut bottom: Vec<DVec3> = rotated_sequence(desc.bottom_start - desc.origin, step, edges)
        .map(|v| desc.origin + v)
        .collect();
    bottom.push(bottom[0]);
    let top: Vec<DVec3> = bottom.iter().map(|p| *p + desc.height).collect();

    let mut mesh = Mesh::with_capacity(style.color, 2 * (edges + 2) + 4 * edges);
    mesh.add_fan(desc.origin, &bottom, bottom_normal);
    mesh.add_fan(desc.origin + desc.height, &top, -bottom_normal);

    let first = mesh.next_index();
    for i in 0..edges {
        let edge = bottom[i + 1] - bottom[i];
        let fallback = unit_or(bottom[i] - desc.origin, DVec3::X);
        let normal = unit_or(desc.height.cross(edge), fallback);
        mesh.push_face(&[bottom[i], bottom[i + 1], top[i + 1], top[i]], normal);
    }
    mesh.close_range(Topology::Quads, first);

    debug!(edges, vertices = mesh.vertex_count(), "built prism");
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Every face of a convex solid faces away from the vertex centroid.
    fn assert_convex_outward(mesh: &Mesh) {
        let centroid =
            mesh.vertices().iter().copied().sum::<DVec3>() / mesh.vertex_count() as f64;
        for (p, n) in mesh.vertices().iter().zip(mesh.normals()) {
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-9);
            assert!(n.dot(*p - centroid) > 0.0, "normal {n} at {p} faces inward");
        }
    }

    fn frustum() -> Pyramid {
        Pyramid {
            origin: DVec3::new(1.0, 1.0, 0.0),
            height: DVec3::new(0.0, 0.0, 4.0),
            x_axis: DVec3::X,
            offset: DVec3::new(0.5, 0.0, 0.0),
            bottom_x: 4.0,
            bottom_y: 2.0,
            top_x: 2.0,
            top_y: 1.0,
        }
    }

    #[test]
    fn test_pyramid_single_quads_group() {
        let cfg = TessellationConfig::default();
        let mesh = pyramid(&frustum(), &Style::default(), &cfg).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.group_count(), 1);
        assert_eq!(mesh.groups()[0].topology(), Topology::Quads);
        assert_eq!(mesh.normal(0), -DVec3::Z);
        assert_eq!(mesh.normal(4), DVec3::Z);
        assert_convex_outward(&mesh);
    }

    #[test]
    fn test_pyramid_top_corners() {
        let cfg = TessellationConfig::default();
        let mesh = pyramid(&frustum(), &Style::default(), &cfg).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::new(-1.0, 0.0, 0.0));
        assert_eq!(max, DVec3::new(3.0, 2.0, 4.0));
        assert_eq!(mesh.vertex(6), DVec3::new(2.5, 1.5, 4.0));
    }

    #[test]
    fn test_pointed_pyramid() {
        let cfg = TessellationConfig::default();
        let mut pointed = frustum();
        pointed.top_x = 0.0;
        pointed.top_y = 0.0;
        pointed.offset = DVec3::ZERO;
        let mesh = pyramid(&pointed, &Style::default(), &cfg).unwrap();
        assert!(mesh.validate());
        for n in &mesh.normals()[8..] {
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-9);
            assert!(n.z > 0.0);
        }
    }

    #[test]
    fn test_pyramid_rejects_bad_input() {
        let cfg = TessellationConfig::default();
        let mut bad = frustum();
        bad.height = DVec3::ZERO;
        assert!(pyramid(&bad, &Style::default(), &cfg).is_err());
        let mut bad = frustum();
        bad.top_y = -1.0;
        assert!(pyramid(&bad, &Style::default(), &cfg).is_err());
    }

    #[test]
    fn test_wedge_groups() {
        let cfg = TessellationConfig::default();
        let desc = Wedge {
            origin: DVec3::ZERO,
            edge1: DVec3::new(3.0, 0.0, 0.0),
            edge2: DVec3::new(0.0, 2.0, 0.0),
            height: DVec3::new(0.0, 0.0, 5.0),
        };
        let mesh = wedge(&desc, &Style::default(), &cfg).unwrap();
        let groups = mesh.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].topology(), Topology::Triangles);
        assert_eq!(groups[0].len(), 6);
        assert_eq!(groups[1].topology(), Topology::Quads);
        assert_eq!(groups[1].len(), 12);
        assert_eq!(mesh.normal(0), -DVec3::Z);
        assert_convex_outward(&mesh);
    }

    #[test]
    fn test_prism_hexagon() {
        let cfg = TessellationConfig::default();
        let desc = Prism {
            origin: DVec3::ZERO,
            height: DVec3::new(0.0, 0.0, 3.0),
            bottom_start: DVec3::new(2.0, 0.0, 0.0),
            edges: 6,
        };
        let mesh = prism(&desc, &Style::default(), &cfg).unwrap();
        let topologies: Vec<Topology> = mesh.groups().iter().map(|g| g.topology()).collect();
        assert_eq!(
            topologies,
            vec![Topology::TriangleFan, Topology::TriangleFan, Topology::Quads]
        );
        assert_eq!(mesh.groups()[0].len(), 8);
        assert_eq!(mesh.groups()[2].len(), 24);
        assert_eq!(mesh.vertex(8), DVec3::new(0.0, 0.0, 3.0));
        // Fan centers sit on the axis, so only check the rims and sides
        let sides = &mesh.groups()[2];
        for i in sides.indices() {
            let p = mesh.vertex(i);
            assert!(mesh.normal(i).dot(DVec3::new(p.x, p.y, 0.0)) > 0.0);
        }
        for i in mesh.groups()[1].indices() {
            assert_eq!(mesh.normal(i), DVec3::Z);
        }
    }

    #[test]
    fn test_prism_rejects_two_edges() {
        let cfg = TessellationConfig::default();
        let desc = Prism {
            origin: DVec3::ZERO,
            height: DVec3::Z,
            bottom_start: DVec3::X,
            edges: 2,
        };
        assert!(prism(&desc, &Style::default(), &cfg).is_err());
    }
}
