//! Attachmagick Pipeline Library
//!
//! The transform-execution pipeline: per-transform tasks chaining
//! convert → identify → stat → detect → persist, an orchestrator that runs
//! them concurrently behind a format gate, and the removal coordinator.

pub mod orchestration;
pub mod task;

// Re-export commonly used types
pub use orchestration::{AttachmentPipeline, ResultModel};
pub use task::TransformTask;
