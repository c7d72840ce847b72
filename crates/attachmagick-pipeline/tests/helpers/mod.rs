//! Shared test doubles: a fake conversion engine and an in-memory storage
//! provider that records every save and remove.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use tokio::sync::Barrier;

use attachmagick_core::{
    AttachError, AttachResult, Attachment, PipelineConfig, StagedArtifact, StorageProvider,
    TransformResult, TransformSpec,
};
use attachmagick_engine::{ImageAttributes, ImageEngine, MimeDetector};

/// JPEG SOI marker plus APP0; enough for magic-byte sniffing.
pub const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

static TRACING: Once = Once::new();

/// Best-effort tracing init so `RUST_LOG` works when debugging tests.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Engine double. `identify` reports a fixed format (or fails when none is
/// configured); `convert` writes a JPEG header to the output path, failing
/// instead when the argument list carries an `-explode` flag.
pub struct FakeEngine {
    format: Option<String>,
    pub barrier: Option<Arc<Barrier>>,
}

impl FakeEngine {
    pub fn identifying(format: &str) -> Self {
        Self {
            format: Some(format.to_string()),
            barrier: None,
        }
    }

    pub fn unidentifiable() -> Self {
        Self {
            format: None,
            barrier: None,
        }
    }
}

#[async_trait]
impl ImageEngine for FakeEngine {
    async fn identify(&self, _path: &Path) -> AttachResult<ImageAttributes> {
        match &self.format {
            Some(format) => Ok(ImageAttributes {
                format: format.clone(),
                depth: 8,
                width: 100,
                height: 100,
            }),
            None => Err(AttachError::Probe("no decode delegate".to_string())),
        }
    }

    async fn convert(&self, args: &[String]) -> AttachResult<()> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if args.iter().any(|a| a == "-explode") {
            return Err(AttachError::Convert(
                "unrecognized option `-explode'".to_string(),
            ));
        }
        let output = args.last().expect("convert args are never empty");
        tokio::fs::write(output, JPEG_HEADER).await?;
        Ok(())
    }
}

/// Content-based detector double that trusts the JPEG header the fake
/// engine writes.
pub struct FakeDetector;

#[async_trait]
impl MimeDetector for FakeDetector {
    async fn detect(&self, path: &Path) -> AttachResult<String> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| AttachError::Detection(e.to_string()))?;
        if data.starts_with(&JPEG_HEADER[..3]) {
            Ok("image/jpeg".to_string())
        } else {
            Ok("application/octet-stream".to_string())
        }
    }
}

/// In-memory storage provider recording saves and removes.
#[derive(Default)]
pub struct MemoryStorage {
    pub saved: Mutex<Vec<StagedArtifact>>,
    pub removed: Mutex<Vec<String>>,
    pub fail_removes: bool,
}

impl MemoryStorage {
    pub fn failing_removes() -> Self {
        Self {
            fail_removes: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn save(&self, artifact: &StagedArtifact) -> AttachResult<(String, String)> {
        let basename = artifact
            .path
            .file_name()
            .expect("artifact paths always have a file name")
            .to_string_lossy()
            .into_owned();
        self.saved.lock().unwrap().push(artifact.clone());
        Ok((
            format!("http://files.test/{}", basename),
            format!("store/{}", basename),
        ))
    }

    async fn remove(&self, stored: &TransformResult) -> AttachResult<()> {
        if self.fail_removes {
            return Err(AttachError::Storage("bucket unreachable".to_string()));
        }
        self.removed.lock().unwrap().push(stored.path.clone());
        Ok(())
    }
}

/// Write a small JPEG-flavored source file and return its attachment.
pub async fn write_attachment(dir: &Path) -> Attachment {
    let path = dir.join("photo.jpg");
    tokio::fs::write(&path, JPEG_HEADER).await.unwrap();
    Attachment::new(path, "photo.jpg")
}

/// Two-transform config writing temp files under `tmp_dir`.
pub fn two_transform_config(tmp_dir: &Path) -> PipelineConfig {
    init_tracing();
    PipelineConfig::builder()
        .transform("large", TransformSpec::new().option("resize", "1200x1200"))
        .transform("thumb", TransformSpec::new().option("resize", "100x100"))
        .tmp_dir(tmp_dir)
        .build()
        .unwrap()
}

/// A persisted result record as `process` would leave it.
pub fn persisted_result(path: &str) -> TransformResult {
    TransformResult {
        format: "JPEG".to_string(),
        depth: 8,
        width: 100,
        height: 100,
        size: 4,
        url: format!("http://files.test/{}", path),
        path: path.to_string(),
        name: "photo.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
    }
}
