//! Controller shared types.
//!
//! Everything exchanged between the sanitizer, the safety evaluator, the
//! control law and the metrics collaborators lives here, organized by
//! domain: safety states, limits, sensor frames, patches, violation flags,
//! verdicts, control output and configuration.

pub mod config;
pub mod control;
pub mod flags;
pub mod limits;
pub mod patch;
pub mod sensor;
pub mod state;
pub mod verdict;
