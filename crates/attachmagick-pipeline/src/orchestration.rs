//! Pipeline orchestration: format gate → fan-out → fan-in
//!
//! [`AttachmentPipeline`] owns the validated configuration and the engine
//! seams. `process` runs one [`TransformTask`] per configured transform
//! concurrently and joins on all of them; a failure in one transform never
//! cancels its siblings, and the first error observed in spawn order is the
//! one reported. `remove` applies the same join semantics to storage
//! removals.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use attachmagick_core::schema;
use attachmagick_core::{
    AttachError, AttachResult, Attachment, FieldSchema, PipelineConfig, StorageProvider,
    TransformResult,
};
use attachmagick_engine::{ImageEngine, MagicMimeDetector, MagickEngine, MimeDetector};

use crate::task::{output_file, TransformTask};

/// Caller-supplied result model: one slot per transform name, populated in
/// place on success.
pub type ResultModel = HashMap<String, TransformResult>;

/// The attachment-transformation pipeline.
pub struct AttachmentPipeline {
    config: PipelineConfig,
    engine: Arc<dyn ImageEngine>,
    detector: Arc<dyn MimeDetector>,
}

impl AttachmentPipeline {
    pub fn new(
        config: PipelineConfig,
        engine: Arc<dyn ImageEngine>,
        detector: Arc<dyn MimeDetector>,
    ) -> Self {
        Self {
            config,
            engine,
            detector,
        }
    }

    /// Pipeline backed by the ImageMagick binaries and magic-byte MIME
    /// detection.
    pub fn with_magick(config: PipelineConfig) -> Self {
        Self::new(
            config,
            Arc::new(MagickEngine::new()),
            Arc::new(MagicMimeDetector::new()),
        )
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every configured transform against the attachment and record the
    /// outcomes onto `model`.
    ///
    /// The attachment is identified first; an unidentifiable file or a
    /// format outside the allowlist fails with
    /// [`AttachError::UnsupportedFormat`] before any transform runs or any
    /// temp file is created. Successful transforms populate their slot even
    /// when a sibling fails; failed slots are left untouched.
    #[tracing::instrument(skip(self, storage, model), fields(attachment = %attachment.name))]
    pub async fn process(
        &self,
        attachment: &Attachment,
        storage: Arc<dyn StorageProvider>,
        model: &mut ResultModel,
    ) -> AttachResult<()> {
        let attributes = match self.engine.identify(&attachment.path).await {
            Ok(attributes) => attributes,
            Err(e) => {
                tracing::debug!(error = %e, "Attachment could not be identified");
                return Err(AttachError::UnsupportedFormat { format: None });
            }
        };

        if !self.config.accepts_format(&attributes.format) {
            return Err(AttachError::UnsupportedFormat {
                format: Some(attributes.format),
            });
        }

        let mut handles = Vec::with_capacity(self.config.transforms().len());
        for (name, spec) in self.config.transforms() {
            let task = TransformTask::new(
                name.clone(),
                spec.clone(),
                attachment.clone(),
                output_file(self.config.tmp_dir(), spec, attachment),
                Arc::clone(&self.engine),
                Arc::clone(&self.detector),
                Arc::clone(&storage),
            );
            handles.push((name.clone(), tokio::spawn(task.run())));
        }

        let mut first_error = None;
        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(result)) => {
                    model.insert(name, result);
                }
                Ok(Err(e)) => {
                    tracing::warn!(transform = %name, error = %e, "Transform failed");
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    tracing::error!(transform = %name, error = %e, "Transform task panicked");
                    first_error.get_or_insert(AttachError::Join(e.to_string()));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Remove every persisted artifact recorded on `model`, concurrently.
    ///
    /// Transforms with an empty storage path are skipped silently; they
    /// never produced a persisted artifact. All removals run to completion
    /// and the first error observed wins.
    pub async fn remove(
        &self,
        storage: Arc<dyn StorageProvider>,
        model: &ResultModel,
    ) -> AttachResult<()> {
        let mut handles = Vec::new();
        for name in self.config.transforms().keys() {
            let Some(result) = model.get(name) else {
                continue;
            };
            if !result.is_persisted() {
                continue;
            }

            let storage = Arc::clone(&storage);
            let result = result.clone();
            handles.push((
                name.clone(),
                tokio::spawn(async move { storage.remove(&result).await }),
            ));
        }

        let mut first_error = None;
        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(transform = %name, error = %e, "Removal failed");
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    first_error.get_or_insert(AttachError::Join(e.to_string()));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Whether reprocessing would overwrite previously persisted artifacts:
    /// true when any configured transform's result records a storage path.
    pub fn will_overwrite(&self, model: &ResultModel) -> bool {
        self.config
            .transforms()
            .keys()
            .any(|name| model.get(name).is_some_and(TransformResult::is_persisted))
    }

    /// Field-shape descriptors the persistence layer must reserve, one per
    /// transform, using the conventional base file-field shape.
    pub fn field_schemas(&self) -> BTreeMap<String, FieldSchema> {
        self.field_schemas_with_base(&FieldSchema::file_base())
    }

    /// Same as [`field_schemas`](Self::field_schemas) with a caller-supplied
    /// base shape.
    pub fn field_schemas_with_base(&self, base: &FieldSchema) -> BTreeMap<String, FieldSchema> {
        schema::field_schemas(&self.config, base)
    }
}
