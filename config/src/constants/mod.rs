//! # Configuration Constants
//!
//! Centralized constants for the tessellation kernel. All chord tolerances,
//! angular increments and comparison epsilons are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Resolution**: Chord deviation and fixed angular increments
//! - **Color**: Default mesh color

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Angular tolerance (radians) for recognising a full revolution and for
/// near-zero cosines.
///
/// # Example
///
/// ```rust
/// use config::constants::{approx_equal, ANGLE_EPSILON};
///
/// let angle = 2.0 * std::f64::consts::PI - 1e-6;
/// assert!(approx_equal(angle, std::f64::consts::TAU, ANGLE_EPSILON));
/// ```
pub const ANGLE_EPSILON: f64 = 1e-5;

/// Squared-length threshold below which the cross product of two unit
/// directions is treated as zero, meaning the directions are parallel.
/// Inputs are normalized first, so the threshold is independent of scale.
///
/// # Example
///
/// ```rust
/// use config::constants::PARALLEL_EPSILON;
///
/// let cross_len2 = 1e-7;
/// assert!(cross_len2 < PARALLEL_EPSILON);
/// ```
pub const PARALLEL_EPSILON: f64 = 1e-5;

/// Length tolerance (model units) below which a radius or section size
/// counts as vanished, and within which two sizes count as equal when
/// choosing a specialised builder.
///
/// # Example
///
/// ```rust
/// use config::constants::{approx_equal, LENGTH_EPSILON};
///
/// assert!(approx_equal(2.0, 2.0 + 1e-7, LENGTH_EPSILON));
/// assert!(!approx_equal(1e-3, 2e-3, LENGTH_EPSILON));
/// ```
pub const LENGTH_EPSILON: f64 = 1e-6;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Maximum chord deviation between a curved surface and its polygonal
/// approximation, in model units.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFLECTION;
///
/// // Half step angle for a circle of radius 10
/// let half = ((10.0 - DEFLECTION) / 10.0_f64).acos();
/// assert!(half > 0.0);
/// ```
pub const DEFLECTION: f64 = 0.5;

/// Fixed angular increment (degrees) used by sweeps that are not driven by
/// the chord tolerance: tapered tori, skew cylinders, saddles and
/// rectangle-to-circle transitions.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_INCREMENT_DEGREES;
///
/// let steps = (360.0 / DEFAULT_INCREMENT_DEGREES) as u32;
/// assert_eq!(steps, 36);
/// ```
pub const DEFAULT_INCREMENT_DEGREES: f64 = 10.0;

/// Coarse angular increment (degrees) used when a radius is not larger than
/// the chord tolerance and the deflection formula is meaningless.
pub const COARSE_INCREMENT_DEGREES: f64 = 60.0;

// =============================================================================
// COLOR CONSTANTS
// =============================================================================

/// Default color when none is specified (light gray).
///
/// RGBA values in range [0.0, 1.0].
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

// =============================================================================
// TESSELLATION CONFIG
// =============================================================================

/// Immutable snapshot of the tessellation settings handed to every builder.
///
/// Angles are stored in radians.
///
/// # Examples
/// ```
/// use config::constants::TessellationConfig;
/// let cfg = TessellationConfig::default();
/// assert!(cfg.deflection > 0.0);
/// assert!(cfg.default_increment < cfg.coarse_increment);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationConfig {
    /// Maximum chord deviation in model units.
    pub deflection: f64,
    /// Fixed angular step for non-adaptive sweeps (radians).
    pub default_increment: f64,
    /// Angular step used when the radius does not exceed `deflection` (radians).
    pub coarse_increment: f64,
    /// Tolerance for full-turn detection (radians).
    pub angle_epsilon: f64,
    /// Tolerance for vanishing and equal sizes (model units).
    pub length_epsilon: f64,
    /// Squared cross-product length below which directions are parallel.
    pub parallel_epsilon: f64,
}

impl TessellationConfig {
    /// Builds a configuration from a chord tolerance and a fixed increment
    /// given in degrees. Epsilons and the coarse increment keep their defaults.
    ///
    /// # Examples
    /// ```
    /// use config::constants::TessellationConfig;
    /// let cfg = TessellationConfig::new(0.1, 15.0).expect("valid config");
    /// assert!((cfg.default_increment - 15f64.to_radians()).abs() < 1e-12);
    /// assert!(TessellationConfig::new(-1.0, 15.0).is_err());
    /// ```
    pub fn new(deflection: f64, default_increment_degrees: f64) -> Result<Self, ConfigError> {
        if !deflection.is_finite() || deflection <= 0.0 {
            return Err(ConfigError::InvalidDeflection(deflection));
        }
        if !(default_increment_degrees > 0.0 && default_increment_degrees < 180.0) {
            return Err(ConfigError::InvalidIncrement(default_increment_degrees));
        }
        Ok(Self {
            deflection,
            default_increment: default_increment_degrees.to_radians(),
            ..Self::default()
        })
    }
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            deflection: DEFLECTION,
            default_increment: DEFAULT_INCREMENT_DEGREES.to_radians(),
            coarse_increment: COARSE_INCREMENT_DEGREES.to_radians(),
            angle_epsilon: ANGLE_EPSILON,
            length_epsilon: LENGTH_EPSILON,
            parallel_epsilon: PARALLEL_EPSILON,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Raised when the chord tolerance is zero, negative or not finite.
    InvalidDeflection(f64),
    /// Raised when the fixed increment is outside the open range (0°, 180°).
    InvalidIncrement(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDeflection(value) => {
                write!(f, "deflection must be positive: {value}")
            }
            ConfigError::InvalidIncrement(value) => {
                write!(f, "default increment must be within (0, 180) degrees: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks whether two values are equal within `epsilon`.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-7, 1e-5));
/// assert!(!approx_equal(1.0, 1.1, 1e-5));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}
