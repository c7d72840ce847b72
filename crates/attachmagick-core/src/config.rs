//! Configuration module
//!
//! [`PipelineConfig`] is built once at startup, validated eagerly, and
//! read-only afterwards. The temp directory is provisioned (created if
//! absent) during construction so that tasks never race on directory
//! creation; the resolved path is passed explicitly into every task.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{AttachError, AttachResult};
use crate::models::TransformSpec;

/// Image formats accepted by default when no allowlist is configured.
pub const DEFAULT_FORMATS: [&str; 4] = ["JPEG", "PNG", "GIF", "TIFF"];

/// Validated construction-time configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    transforms: BTreeMap<String, TransformSpec>,
    formats: Vec<String>,
    tmp_dir: PathBuf,
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Configured transforms, keyed by name.
    pub fn transforms(&self) -> &BTreeMap<String, TransformSpec> {
        &self.transforms
    }

    /// Whether an identified format is on the allowlist. Comparison is
    /// case-insensitive; the allowlist is stored uppercased.
    pub fn accepts_format(&self, format: &str) -> bool {
        let format = format.to_uppercase();
        self.formats.iter().any(|f| *f == format)
    }

    /// Shared temp directory for transform output files. Each task picks a
    /// randomized basename, so no locking is needed for temp-file access.
    pub fn tmp_dir(&self) -> &PathBuf {
        &self.tmp_dir
    }
}

/// Builder for [`PipelineConfig`]. `build` fails if no transforms were
/// supplied or the temp directory cannot be created.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    transforms: BTreeMap<String, TransformSpec>,
    formats: Option<Vec<String>>,
    tmp_dir: Option<PathBuf>,
}

impl PipelineConfigBuilder {
    /// Register a named transform.
    pub fn transform(mut self, name: impl Into<String>, spec: TransformSpec) -> Self {
        self.transforms.insert(name.into(), spec);
        self
    }

    /// Override the accepted-format allowlist (default: JPEG, PNG, GIF, TIFF).
    pub fn formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Override the temp directory (default: the system temp directory).
    pub fn tmp_dir(mut self, tmp_dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = Some(tmp_dir.into());
        self
    }

    pub fn build(self) -> AttachResult<PipelineConfig> {
        if self.transforms.is_empty() {
            return Err(AttachError::Config(
                "at least one transform is required".to_string(),
            ));
        }

        let formats = self
            .formats
            .unwrap_or_else(|| DEFAULT_FORMATS.iter().map(|f| f.to_string()).collect())
            .into_iter()
            .map(|f| f.to_uppercase())
            .collect();

        let tmp_dir = self.tmp_dir.unwrap_or_else(std::env::temp_dir);
        fs::create_dir_all(&tmp_dir).map_err(|e| {
            AttachError::Config(format!(
                "failed to create temp directory {}: {}",
                tmp_dir.display(),
                e
            ))
        })?;

        Ok(PipelineConfig {
            transforms: self.transforms,
            formats,
            tmp_dir,
        })
    }
}
