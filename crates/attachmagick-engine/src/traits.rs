//! Engine abstraction traits
//!
//! The pipeline never links an image codec. Conversion and probing go
//! through [`ImageEngine`], MIME sniffing through [`MimeDetector`], so tests
//! and alternative engines can swap in their own implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use attachmagick_core::AttachResult;

/// Structural metadata reported by the identify capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttributes {
    /// Engine format name, e.g. `JPEG`.
    pub format: String,
    /// Color depth in bits.
    pub depth: u32,
    pub width: u32,
    pub height: u32,
}

/// Opaque conversion capability: probe a file, or run a conversion with a
/// prebuilt argument list (see [`crate::args::build_convert_args`]).
#[async_trait]
pub trait ImageEngine: Send + Sync {
    /// Probe a file for format, depth, and dimensions. Fails with
    /// `AttachError::Probe` if the file cannot be identified.
    async fn identify(&self, path: &Path) -> AttachResult<ImageAttributes>;

    /// Run a conversion. Argument semantics are the engine's own business;
    /// invalid flags surface here as `AttachError::Convert`.
    async fn convert(&self, args: &[String]) -> AttachResult<()>;
}

/// Content-based MIME sniffing, independent of filename and of whatever
/// format the identify capability reported.
#[async_trait]
pub trait MimeDetector: Send + Sync {
    async fn detect(&self, path: &Path) -> AttachResult<String>;
}
