//! Transform task - one transform executed end-to-end
//!
//! Five strictly sequential stages: convert, re-identify, stat, detect-type,
//! persist. Each stage feeds the next; the first failure short-circuits and
//! the caller's result slot stays untouched. Tasks share nothing mutable, so
//! any number of them can run concurrently against the same attachment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::RngCore;

use attachmagick_core::{
    AttachResult, Attachment, StagedArtifact, StorageProvider, TransformResult, TransformSpec,
};
use attachmagick_engine::{build_convert_args, ImageEngine, MimeDetector};

/// Hex characters in a generated temp basename. Collisions across
/// concurrently running tasks are negligible at this length.
const BASENAME_LEN: usize = 20;

fn random_basename() -> String {
    let mut bytes = [0u8; BASENAME_LEN / 2];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Extension for a transform's output file: the spec's format override if
/// present, else the attachment's original extension, normalized to carry a
/// leading dot. Empty when neither exists.
fn output_extension(spec: &TransformSpec, attachment: &Attachment) -> String {
    let ext = spec.format.clone().or_else(|| attachment.extension());
    match ext {
        Some(ext) if !ext.is_empty() => {
            if ext.starts_with('.') {
                ext
            } else {
                format!(".{}", ext)
            }
        }
        _ => String::new(),
    }
}

/// Fresh randomized output path inside the configured temp directory.
pub(crate) fn output_file(tmp_dir: &Path, spec: &TransformSpec, attachment: &Attachment) -> PathBuf {
    tmp_dir.join(format!(
        "{}{}",
        random_basename(),
        output_extension(spec, attachment)
    ))
}

/// The per-transform execution unit. Consumed by [`run`](Self::run).
pub struct TransformTask {
    name: String,
    spec: TransformSpec,
    attachment: Attachment,
    output_file: PathBuf,
    engine: Arc<dyn ImageEngine>,
    detector: Arc<dyn MimeDetector>,
    storage: Arc<dyn StorageProvider>,
}

impl TransformTask {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        spec: TransformSpec,
        attachment: Attachment,
        output_file: PathBuf,
        engine: Arc<dyn ImageEngine>,
        detector: Arc<dyn MimeDetector>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            name,
            spec,
            attachment,
            output_file,
            engine,
            detector,
            storage,
        }
    }

    /// Run the transform end-to-end, producing a fully populated result.
    #[tracing::instrument(skip(self), fields(transform = %self.name, output = %self.output_file.display()))]
    pub async fn run(self) -> AttachResult<TransformResult> {
        let args = build_convert_args(&self.attachment.path, &self.spec, &self.output_file);
        self.engine.convert(&args).await?;

        let attributes = self.engine.identify(&self.output_file).await?;

        let size = tokio::fs::metadata(&self.output_file).await?.len();

        let content_type = self.detector.detect(&self.output_file).await?;

        let artifact = StagedArtifact {
            path: self.output_file.clone(),
            size,
            content_type: content_type.clone(),
        };
        let (url, path) = self.storage.save(&artifact).await?;

        tracing::info!(
            transform = %self.name,
            format = %attributes.format,
            size,
            storage_path = %path,
            "Transform complete"
        );

        Ok(TransformResult {
            format: attributes.format,
            depth: attributes.depth,
            width: attributes.width,
            height: attributes.height,
            size,
            url,
            path,
            name: self.attachment.name,
            content_type,
        })
    }
}
