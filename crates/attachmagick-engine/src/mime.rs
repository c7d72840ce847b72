//! Content-based MIME detection using magic numbers
//!
//! Reads the leading bytes of a file and matches well-known image
//! signatures. Detection looks at content only; the filename and the
//! identify-reported format play no part.

use std::path::Path;

use async_trait::async_trait;

use attachmagick_core::{AttachError, AttachResult};

use crate::traits::MimeDetector;

/// Bytes read from the head of the file. WebP needs 12.
const SNIFF_LEN: usize = 12;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Detect a MIME type from leading file bytes.
fn sniff(data: &[u8]) -> &'static str {
    if data.len() < 4 {
        return FALLBACK_MIME;
    }

    // JPEG: FF D8 FF
    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return "image/jpeg";
    }

    // PNG: 89 50 4E 47
    if data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47 {
        return "image/png";
    }

    // GIF: GIF8
    if data.starts_with(b"GIF8") {
        return "image/gif";
    }

    // TIFF: II*\0 (little endian) or MM\0* (big endian)
    if data.starts_with(b"II\x2A\x00") || data.starts_with(b"MM\x00\x2A") {
        return "image/tiff";
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return "image/webp";
    }

    // BMP: BM
    if data.starts_with(b"BM") {
        return "image/bmp";
    }

    FALLBACK_MIME
}

/// [`MimeDetector`] matching magic numbers against the file head.
#[derive(Debug, Clone, Default)]
pub struct MagicMimeDetector;

impl MagicMimeDetector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MimeDetector for MagicMimeDetector {
    async fn detect(&self, path: &Path) -> AttachResult<String> {
        use tokio::io::AsyncReadExt;

        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| AttachError::Detection(format!("{}: {}", path.display(), e)))?;

        let mut head = [0u8; SNIFF_LEN];
        let mut read = 0;
        while read < SNIFF_LEN {
            let n = file
                .read(&mut head[read..])
                .await
                .map_err(|e| AttachError::Detection(format!("{}: {}", path.display(), e)))?;
            if n == 0 {
                break;
            }
            read += n;
        }

        Ok(sniff(&head[..read]).to_string())
    }
}
