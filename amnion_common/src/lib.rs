//! AMNION Common Library
//!
//! Shared types, constants and configuration loading for the AMNION
//! controller workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Default limits and control-law constants
//! - [`config`] - Configuration loading traits and types
//! - [`controller`] - Safety states, frames, patches and verdicts
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use amnion_common::prelude::*;
//!
//! let limits = SafetyLimits::default();
//! assert!(limits.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod controller;
pub mod prelude;
