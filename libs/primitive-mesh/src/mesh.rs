//! # Mesh Data Structure
//!
//! Output representation shared by every builder: a vertex buffer, a
//! per-vertex normal buffer of the same length, one overall color and an
//! ordered list of primitive groups that reference the vertex buffer.

use crate::error::MeshError;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// RGBA color in range [0.0, 1.0], bound to the whole mesh.
pub type Rgba = [f32; 4];

/// Drawing topology of a primitive group.
///
/// Decomposition into triangles follows the usual GL conventions, see
/// [`Mesh::triangles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    TriangleFan,
    TriangleStrip,
    QuadStrip,
    Quads,
    Triangles,
    Polygon,
}

/// A draw range over the vertex buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveGroup {
    /// Consecutive vertices `first..first + count`.
    Range {
        topology: Topology,
        first: u32,
        count: u32,
    },
    /// Explicit vertex indices, used for the tapered sweeps.
    Indexed { topology: Topology, indices: Vec<u32> },
}

impl PrimitiveGroup {
    /// Returns the topology tag.
    pub fn topology(&self) -> Topology {
        match self {
            Self::Range { topology, .. } | Self::Indexed { topology, .. } => *topology,
        }
    }

    /// Returns the number of vertex references in the group.
    pub fn len(&self) -> usize {
        match self {
            Self::Range { count, .. } => *count as usize,
            Self::Indexed { indices, .. } => indices.len(),
        }
    }

    /// Returns true if the group references no vertices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the vertex indices referenced by the group, in draw order.
    pub fn indices(&self) -> Vec<u32> {
        match self {
            Self::Range { first, count, .. } => (*first..*first + *count).collect(),
            Self::Indexed { indices, .. } => indices.clone(),
        }
    }
}

/// A renderable surface approximation.
///
/// Meshes are produced by the builders in [`crate::primitives`] and
/// [`crate::combine`] and are read-only once returned. Deserialized meshes
/// pass through [`Mesh::validate`] and are rejected when it fails.
///
/// # Example
///
/// ```rust
/// use config::constants::TessellationConfig;
/// use glam::DVec3;
/// use primitive_mesh::primitives::{cone, Cone, Style};
///
/// let desc = Cone::new(DVec3::ZERO, DVec3::new(0.0, 0.0, 10.0), 5.0);
/// let mesh = cone(&desc, &Style::default(), &TessellationConfig::default()).unwrap();
/// assert!(mesh.validate());
/// assert_eq!(mesh.vertices().len(), mesh.normals().len());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MeshData")]
pub struct Mesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// One normal per vertex
    normals: Vec<DVec3>,
    /// Overall color
    color: Rgba,
    /// Draw ranges in emission order
    groups: Vec<PrimitiveGroup>,
}

impl Mesh {
    /// Creates an empty mesh with the given overall color.
    pub(crate) fn new(color: Rgba) -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            color,
            groups: Vec::new(),
        }
    }

    /// Creates an empty mesh with pre-allocated vertex capacity.
    pub(crate) fn with_capacity(color: Rgba, vertex_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            color,
            groups: Vec::new(),
        }
    }

    /// Appends a vertex with its normal and returns its index.
    pub(crate) fn push(&mut self, position: DVec3, normal: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        index
    }

    /// Index the next pushed vertex will receive.
    #[inline]
    pub(crate) fn next_index(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Records a range group covering every vertex pushed since `first`.
    ///
    /// Empty ranges are dropped.
    pub(crate) fn close_range(&mut self, topology: Topology, first: u32) {
        let count = self.next_index().saturating_sub(first);
        if count > 0 {
            self.groups.push(PrimitiveGroup::Range {
                topology,
                first,
                count,
            });
        }
    }

    /// Emits a flat triangle fan: `center` followed by `rim`, every vertex
    /// carrying `normal`. The rim is expected to repeat its first point.
    pub(crate) fn add_fan(&mut self, center: DVec3, rim: &[DVec3], normal: DVec3) {
        let first = self.next_index();
        self.push(center, normal);
        for p in rim {
            self.push(*p, normal);
        }
        self.close_range(Topology::TriangleFan, first);
    }

    /// Appends `points` sharing one face normal, without closing a group.
    pub(crate) fn push_face(&mut self, points: &[DVec3], normal: DVec3) {
        for p in points {
            self.push(*p, normal);
        }
    }

    /// Records an indexed group. Empty index lists are dropped.
    pub(crate) fn add_indexed(&mut self, topology: Topology, indices: Vec<u32>) {
        if !indices.is_empty() {
            self.groups.push(PrimitiveGroup::Indexed { topology, indices });
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of primitive groups.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the mesh is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the per-vertex normals.
    #[inline]
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    /// Returns the overall color.
    #[inline]
    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Returns the primitive groups in emission order.
    #[inline]
    pub fn groups(&self) -> &[PrimitiveGroup] {
        &self.groups
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the normal at the given index.
    #[inline]
    pub fn normal(&self, index: u32) -> DVec3 {
        self.normals[index as usize]
    }

    /// Returns the expanded index list of the group at `group`, if any.
    pub fn group_indices(&self, group: usize) -> Option<Vec<u32>> {
        self.groups.get(group).map(PrimitiveGroup::indices)
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - One normal per vertex
    /// - All group indices are in range
    /// - No empty groups
    /// - All coordinates are finite
    pub fn validate(&self) -> bool {
        if self.vertices.len() != self.normals.len() {
            return false;
        }

        let vertex_count = self.vertices.len() as u32;
        for group in &self.groups {
            if group.is_empty() {
                return false;
            }
            let in_range = match group {
                PrimitiveGroup::Range { first, count, .. } => {
                    first.checked_add(*count).is_some_and(|end| end <= vertex_count)
                }
                PrimitiveGroup::Indexed { indices, .. } => {
                    indices.iter().all(|&i| i < vertex_count)
                }
            };
            if !in_range {
                return false;
            }
        }

        self.vertices
            .iter()
            .chain(self.normals.iter())
            .all(|v| v.is_finite())
    }

    /// Decomposes every group into triangles.
    ///
    /// - Fans and polygons: `(v0, vi, vi+1)`
    /// - Strips: alternating winding, triangles with a repeated index skipped
    /// - Quad strips: quad `(v2i, v2i+1, v2i+3, v2i+2)` split along its diagonal
    /// - Quads: `(a, b, c)` and `(a, c, d)`
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        let mut result = Vec::new();
        for group in &self.groups {
            let idx = group.indices();
            match group.topology() {
                Topology::TriangleFan | Topology::Polygon => {
                    for i in 1..idx.len().saturating_sub(1) {
                        result.push([idx[0], idx[i], idx[i + 1]]);
                    }
                }
                Topology::TriangleStrip => {
                    for i in 0..idx.len().saturating_sub(2) {
                        let tri = if i % 2 == 0 {
                            [idx[i], idx[i + 1], idx[i + 2]]
                        } else {
                            [idx[i + 1], idx[i], idx[i + 2]]
                        };
                        if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
                            result.push(tri);
                        }
                    }
                }
                Topology::QuadStrip => {
                    let mut i = 0;
                    while i + 3 < idx.len() {
                        result.push([idx[i], idx[i + 1], idx[i + 3]]);
                        result.push([idx[i], idx[i + 3], idx[i + 2]]);
                        i += 2;
                    }
                }
                Topology::Quads => {
                    for quad in idx.chunks_exact(4) {
                        result.push([quad[0], quad[1], quad[2]]);
                        result.push([quad[0], quad[2], quad[3]]);
                    }
                }
                Topology::Triangles => {
                    for tri in idx.chunks_exact(3) {
                        result.push([tri[0], tri[1], tri[2]]);
                    }
                }
            }
        }
        result
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Exports vertices as f32 array for GPU.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn vertices_f32(&self) -> Vec<f32> {
        flatten_f32(&self.vertices)
    }

    /// Exports normals as f32 array for GPU.
    pub fn normals_f32(&self) -> Vec<f32> {
        flatten_f32(&self.normals)
    }

    /// Exports the triangle decomposition as a flat u32 index array.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangles().into_iter().flatten().collect()
    }
}

/// Unchecked wire form of [`Mesh`].
#[derive(Deserialize)]
struct MeshData {
    vertices: Vec<DVec3>,
    normals: Vec<DVec3>,
    color: Rgba,
    groups: Vec<PrimitiveGroup>,
}

impl TryFrom<MeshData> for Mesh {
    type Error = MeshError;

    fn try_from(data: MeshData) -> Result<Self, Self::Error> {
        let mesh = Self {
            vertices: data.vertices,
            normals: data.normals,
            color: data.color,
            groups: data.groups,
        };
        if mesh.validate() {
            Ok(mesh)
        } else {
            Err(MeshError::invalid_argument("deserialized mesh failed validation"))
        }
    }
}

fn flatten_f32(values: &[DVec3]) -> Vec<f32> {
    let mut result = Vec::with_capacity(values.len() * 3);
    for v in values {
        result.push(v.x as f32);
        result.push(v.y as f32);
        result.push(v.z as f32);
    }
    result
}
