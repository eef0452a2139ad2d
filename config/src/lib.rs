//! # Config Crate
//!
//! Centralized configuration constants for the primitive mesh kernel.
//! Every tolerance and angular increment used by the sweep builders is
//! defined here so that tessellation behaviour is tuned in one place and
//! passed explicitly into each builder call.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{TessellationConfig, DEFLECTION};
//!
//! let cfg = TessellationConfig::default();
//! assert_eq!(cfg.deflection, DEFLECTION);
//!
//! // Tighter chord tolerance for close-up rendering
//! let fine = TessellationConfig::new(0.05, 5.0).unwrap();
//! assert!(fine.deflection < cfg.deflection);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **No Globals**: Builders receive a `TessellationConfig` value
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
