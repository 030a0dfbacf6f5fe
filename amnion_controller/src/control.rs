//! Control-law root.
//!
//! Maps a verdict and its patch onto a bounded [`ControlFrame`]:
//! envelope clamping in `envelope`, mode dispatch in `law`.
//!
//! [`ControlFrame`]: amnion_common::controller::control::ControlFrame

pub mod envelope;
pub mod law;

pub use law::ControlLawEngine;
