//! # Primitive Mesh
//!
//! Adaptive mesh generation for parametric solid primitives.
//! Converts plain shape descriptors into render-ready vertex, normal and
//! draw-range buffers.
//!
//! ## Architecture
//!
//! ```text
//! descriptor + Style + TessellationConfig → builder → Mesh
//!                                              │
//!                                        sweep kernel
//! ```
//!
//! Every builder is an independent pure function; none calls another except
//! for documented delegation to a simpler shape (equal tapered radii, snout
//! with a vanishing end).
//!
//! ## Algorithms
//!
//! - **Step counts**: chord deviation bound, see [`sweep`]
//! - **Sweeps**: one fixed step rotation applied ring after ring
//! - **Normals**: true surface normals on curved faces, flat face normals
//!   from edge vectors on polyhedra
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::TessellationConfig;
//! use glam::DVec3;
//! use primitive_mesh::primitives::{snout, Snout, Style};
//!
//! let frustum = Snout {
//!     center: DVec3::ZERO,
//!     height: DVec3::new(0.0, 0.0, 4.0),
//!     offset: DVec3::ZERO,
//!     bottom_radius: 3.0,
//!     top_radius: 1.0,
//! };
//! let mesh = snout(&frustum, &Style::default(), &TessellationConfig::default())?;
//! assert!(mesh.validate());
//! # Ok::<(), primitive_mesh::MeshError>(())
//! ```

pub mod combine;
pub mod error;
pub mod mesh;
pub mod primitives;
pub mod sweep;

pub use config::constants::TessellationConfig;
pub use error::MeshError;
pub use mesh::{Mesh, PrimitiveGroup, Rgba, Topology};
pub use primitives::Style;
