//! # Combiner
//!
//! Repackages caller-supplied polyhedral fragments into one [`Mesh`].
//!
//! ## Output Layout
//!
//! 1. One quads group: every 4-sided shell face, then every grid cell
//! 2. One triangles group: every 3-sided shell face
//! 3. One polygon group per input polygon
//!
//! Shading is flat: each face gets a single normal from its first three
//! vertices, `(v2 - v1) × (v3 - v2)`. Categories with no faces emit no group.

use crate::error::MeshError;
use crate::mesh::{Mesh, Rgba, Topology};
use crate::sweep::unit_or;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Faces over a shared vertex pool.
///
/// `faces` is a flat list where each face is its vertex count followed by
/// that many indices into `vertices`, e.g. `[4, 0, 1, 2, 3, 3, 0, 2, 4]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    pub vertices: Vec<DVec3>,
    pub faces: Vec<u32>,
}

/// Row-major grid of points; every 2×2 cell becomes a quad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridMesh {
    pub rows: u32,
    pub columns: u32,
    pub vertices: Vec<DVec3>,
}

/// Planar vertex loop of at least three points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<DVec3>,
}

/// Everything merged by one [`combine`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombineInput {
    pub color: Rgba,
    pub shells: Vec<Shell>,
    pub grids: Vec<GridMesh>,
    pub polygons: Vec<Polygon>,
}

impl CombineInput {
    /// Creates an empty input with the given color.
    pub fn new(color: Rgba) -> Self {
        Self {
            color,
            shells: Vec::new(),
            grids: Vec::new(),
            polygons: Vec::new(),
        }
    }
}

/// Flat normal of the face starting `a, b, c`.
fn face_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    unit_or((b - a).cross(c - b), DVec3::Z)
}

/// Merges shells, grids and polygons into a single mesh.
///
/// # Errors
///
/// Returns [`MeshError::InvalidArgument`] for a face index outside its
/// shell, a face list that ends inside a face, a grid whose point count is
/// not `rows * columns`, or a polygon with fewer than three points.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use primitive_mesh::combine::{combine, CombineInput, Polygon};
///
/// let mut input = CombineInput::new([1.0, 0.0, 0.0, 1.0]);
/// input.polygons.push(Polygon {
///     vertices: vec![DVec3::ZERO, DVec3::X, DVec3::Y],
/// });
/// let mesh = combine(&input).unwrap();
/// assert_eq!(mesh.group_count(), 1);
/// ```
#[instrument(skip_all)]
pub fn combine(input: &CombineInput) -> Result<Mesh, MeshError> {
    let mut mesh = Mesh::new(input.color);
    let mut triangles: Vec<(DVec3, DVec3)> = Vec::new();

    let quads_first = mesh.next_index();
    for (shell_index, shell) in input.shells.iter().enumerate() {
        let mut cursor = 0;
        while cursor < shell.faces.len() {
            let count = shell.faces[cursor] as usize;
            let end = cursor + 1 + count;
            let indices = shell.faces.get(cursor + 1..end).ok_or_else(|| {
                MeshError::invalid_argument(format!(
                    "shell {shell_index}: face at {cursor} needs {count} indices"
                ))
            })?;
            let points = indices
                .iter()
                .map(|&i| {
                    shell.vertices.get(i as usize).copied().ok_or_else(|| {
                        MeshError::invalid_argument(format!(
                            "shell {shell_index}: vertex index {i} out of range"
                        ))
                    })
                })
                .collect::<Result<Vec<DVec3>, MeshError>>()?;

            match count {
                4 => {
                    let normal = face_normal(points[0], points[1], points[2]);
                    mesh.push_face(&points, normal);
                }
                3 => {
                    let normal = face_normal(points[0], points[1], points[2]);
                    triangles.extend(points.iter().map(|p| (*p, normal)));
                }
                _ => warn!(shell = shell_index, count, "skipping shell face that is not a triangle or quad"),
            }
            cursor = end;
        }
    }

    for (grid_index, grid) in input.grids.iter().enumerate() {
        let (rows, columns) = (grid.rows as usize, grid.columns as usize);
        if rows.checked_mul(columns) != Some(grid.vertices.len()) {
            return Err(MeshError::invalid_argument(format!(
                "grid {grid_index}: {rows}x{columns} does not match {} points",
                grid.vertices.len()
            )));
        }
        let at = |row: usize, column: usize| grid.vertices[row * columns + column];
        for row in 0..rows.saturating_sub(1) {
            for column in 0..columns.saturating_sub(1) {
                let p1 = at(row, column);
                let p2 = at(row, column + 1);
                let p3 = at(row + 1, column + 1);
                let p4 = at(row + 1, column);
                mesh.push_face(&[p1, p2, p3, p4], face_normal(p1, p2, p3));
            }
        }
    }
    mesh.close_range(Topology::Quads, quads_first);

    let triangles_first = mesh.next_index();
    for (point, normal) in triangles {
        mesh.push(point, normal);
    }
    mesh.close_range(Topology::Triangles, triangles_first);

    for (polygon_index, polygon) in input.polygons.iter().enumerate() {
        let [a, b, c, ..] = polygon.vertices[..] else {
            return Err(MeshError::invalid_argument(format!(
                "polygon {polygon_index} has {} points, needs at least 3",
                polygon.vertices.len()
            )));
        };
        let first = mesh.next_index();
        mesh.push_face(&polygon.vertices, face_normal(a, b, c));
        mesh.close_range(Topology::Polygon, first);
    }

    debug!(
        vertices = mesh.vertex_count(),
        groups = mesh.group_count(),
        "combined geometry"
    );
    Ok(mesh)
}
