//! Attachmagick Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! storage abstraction shared by the attachmagick pipeline crates.

pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod storage;

// Re-export commonly used types
pub use config::{PipelineConfig, PipelineConfigBuilder, DEFAULT_FORMATS};
pub use error::{AttachError, AttachResult};
pub use models::{Attachment, OptionValue, TransformResult, TransformSpec};
pub use schema::{FieldSchema, FieldType};
pub use storage::{StagedArtifact, StorageProvider};
