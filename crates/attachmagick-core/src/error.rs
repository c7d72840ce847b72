//! Error types module
//!
//! All failures in the pipeline are unified under the [`AttachError`] enum.
//! Configuration errors are fatal at construction time; every other variant
//! is terminal for its own unit of work only. There are no retries anywhere
//! in this crate family; callers retry wholesale if they want to.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    /// Missing required construction options or tmp-dir provisioning failure.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The attachment could not be identified as an allowlisted image format.
    #[error("File was not an image{}", format_suffix(.format))]
    UnsupportedFormat { format: Option<String> },

    #[error("Convert failed: {0}")]
    Convert(String),

    #[error("Identify failed: {0}")]
    Probe(String),

    #[error("MIME detection failed: {0}")]
    Detection(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A spawned transform or removal task panicked before reaching the join.
    #[error("Task panicked: {0}")]
    Join(String),
}

fn format_suffix(format: &Option<String>) -> String {
    match format {
        Some(f) => format!(" (identified as {})", f),
        None => String::new(),
    }
}

/// Result type for pipeline operations
pub type AttachResult<T> = Result<T, AttachError>;
