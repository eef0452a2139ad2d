//! # Primitives
//!
//! Mesh builders for parametric solid primitives. Every builder is a pure
//! function of its descriptor, a [`Style`] and a [`TessellationConfig`]:
//!
//! | Builder | Descriptor | Subdivision |
//! |---------|------------|-------------|
//! | [`circular_torus`] | [`CircularTorus`] | chord tolerance |
//! | [`tapered_circular_torus`] | [`TaperedCircularTorus`] | fixed increment |
//! | [`rectangular_torus`] | [`RectangularTorus`] | chord tolerance |
//! | [`tapered_rectangular_torus`] | [`TaperedRectangularTorus`] | fixed increment |
//! | [`cone()`] / [`snout`] | [`Cone`] / [`Snout`] | chord tolerance |
//! | [`skew_cylinder`] | [`SkewCylinder`] | fixed increment |
//! | [`sphere()`] / [`ellipsoid`] | [`Sphere`] / [`Ellipsoid`] | chord tolerance |
//! | [`pyramid`] / [`wedge`] / [`prism`] | [`Pyramid`] / [`Wedge`] / [`Prism`] | none |
//! | [`saddle()`] | [`Saddle`] | fixed increment |
//! | [`rect_circ()`] | [`RectCirc`] | fixed increment |
//!
//! [`TessellationConfig`]: config::constants::TessellationConfig

pub mod cone;
pub mod polyhedra;
pub mod rect_circ;
pub mod rect_torus;
pub mod saddle;
pub mod sphere;
pub mod torus;

pub use cone::{cone, skew_cylinder, snout, Cone, SkewCylinder, Snout};
pub use polyhedra::{prism, pyramid, wedge, Prism, Pyramid, Wedge};
pub use rect_circ::{rect_circ, RectCirc};
pub use rect_torus::{
    rectangular_torus, tapered_rectangular_torus, RectangularTorus, TaperedRectangularTorus,
};
pub use saddle::{saddle, Saddle};
pub use sphere::{ellipsoid, sphere, Ellipsoid, Sphere};
pub use torus::{circular_torus, tapered_circular_torus, CircularTorus, TaperedCircularTorus};

use crate::mesh::Rgba;
use config::constants::DEFAULT_COLOR;
use serde::{Deserialize, Serialize};

/// Color and cap visibility for a builder call.
///
/// `top_visible` and `bottom_visible` control the closing faces of partial
/// sweeps and the end discs of cones, snouts, cylinders and dishes. Builders
/// without caps only use the color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: Rgba,
    pub top_visible: bool,
    pub bottom_visible: bool,
}

impl Style {
    /// Both caps visible, given color.
    pub fn new(color: Rgba) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Returns a copy with the given cap visibility.
    pub fn with_caps(self, top_visible: bool, bottom_visible: bool) -> Self {
        Self {
            top_visible,
            bottom_visible,
            ..self
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            top_visible: true,
            bottom_visible: true,
        }
    }
}
