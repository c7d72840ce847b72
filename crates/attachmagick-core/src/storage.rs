//! Storage abstraction trait
//!
//! The pipeline persists artifacts through a pluggable [`StorageProvider`]
//! (local disk, object storage, ...). The provider owns its own lifecycle
//! and concurrency safety; this crate only calls `save` and `remove`.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::AttachResult;
use crate::models::TransformResult;

/// Descriptor for a freshly produced artifact handed to the provider:
/// the temp-file path, its byte size, and the sniffed MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub path: PathBuf,
    pub size: u64,
    pub content_type: String,
}

/// Pluggable persistence backend for transform artifacts.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Persist an artifact and return `(url, path)`: the publicly reachable
    /// URL and the provider's storage path for later removal.
    async fn save(&self, artifact: &StagedArtifact) -> AttachResult<(String, String)>;

    /// Remove a previously persisted artifact. Called only for results whose
    /// recorded storage path is non-empty.
    async fn remove(&self, stored: &TransformResult) -> AttachResult<()>;
}
