//! ImageMagick engine - shells out to the `convert` and `identify` binaries.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use async_trait::async_trait;

use attachmagick_core::{AttachError, AttachResult};

use crate::traits::{ImageAttributes, ImageEngine};

/// identify output template yielding `format depth width height`. The
/// trailing newline keeps multi-frame images (e.g. animated GIF) to one
/// parseable line per frame.
const IDENTIFY_FORMAT: &str = "%m %z %w %h\n";

/// Reject binary paths carrying shell metacharacters or traversal sequences.
fn validate_binary_path(path: &str) -> AttachResult<()> {
    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\')
        || path.contains("..")
    {
        return Err(AttachError::Config(format!(
            "invalid engine binary path: {}",
            path
        )));
    }
    Ok(())
}

/// [`ImageEngine`] backed by the ImageMagick command-line tools.
#[derive(Debug, Clone)]
pub struct MagickEngine {
    convert_path: String,
    identify_path: String,
}

impl MagickEngine {
    /// Engine using `convert` and `identify` from the PATH.
    pub fn new() -> Self {
        Self {
            convert_path: "convert".to_string(),
            identify_path: "identify".to_string(),
        }
    }

    /// Engine with explicit binary locations.
    pub fn with_paths(
        convert_path: impl Into<String>,
        identify_path: impl Into<String>,
    ) -> AttachResult<Self> {
        let convert_path = convert_path.into();
        let identify_path = identify_path.into();
        validate_binary_path(&convert_path)?;
        validate_binary_path(&identify_path)?;
        Ok(Self {
            convert_path,
            identify_path,
        })
    }
}

impl Default for MagickEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `identify -format "%m %z %w %h"` output.
fn parse_identify_output(stdout: &str) -> AttachResult<ImageAttributes> {
    let mut parts = stdout.split_whitespace();
    let (format, depth, width, height) = match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some(f), Some(d), Some(w), Some(h)) => (f, d, w, h),
        _ => {
            return Err(AttachError::Probe(format!(
                "unexpected identify output: {:?}",
                stdout
            )))
        }
    };

    let parse_u32 = |field: &str, value: &str| {
        value.parse::<u32>().map_err(|_| {
            AttachError::Probe(format!("identify reported non-numeric {}: {}", field, value))
        })
    };

    Ok(ImageAttributes {
        format: format.to_string(),
        depth: parse_u32("depth", depth)?,
        width: parse_u32("width", width)?,
        height: parse_u32("height", height)?,
    })
}

#[async_trait]
impl ImageEngine for MagickEngine {
    #[tracing::instrument(skip(self), fields(process.command = "identify"))]
    async fn identify(&self, path: &Path) -> AttachResult<ImageAttributes> {
        let output = Command::new(&self.identify_path)
            .arg("-format")
            .arg(IDENTIFY_FORMAT)
            .arg(path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AttachError::Probe(format!("failed to execute identify: {}", e)))?;

        if !output.status.success() {
            return Err(AttachError::Probe(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        // Multi-frame images (e.g. animated GIF) print one line per frame;
        // the first frame describes the image.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let first_line = stdout.lines().next().unwrap_or_default();
        parse_identify_output(first_line)
    }

    #[tracing::instrument(skip(self, args), fields(process.command = "convert"))]
    async fn convert(&self, args: &[String]) -> AttachResult<()> {
        tracing::debug!(args = ?args, "Running convert");

        let output = Command::new(&self.convert_path)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AttachError::Convert(format!("failed to execute convert: {}", e)))?;

        if !output.status.success() {
            return Err(AttachError::Convert(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(())
    }
}
