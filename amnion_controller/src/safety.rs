//! Safety module root.
//!
//! Guard evaluation, violation streak counting and the SAFE_HALT latch.

pub mod evaluator;
pub mod latch;

pub use evaluator::SafetyEvaluator;
pub use latch::EscalationLatch;
