//! Attachmagick Engine Library
//!
//! The conversion-engine boundary: traits for image probing/conversion and
//! MIME sniffing, the convert-argument builder, and implementations that
//! shell out to the ImageMagick `convert`/`identify` binaries.

pub mod args;
pub mod magick;
pub mod mime;
pub mod traits;

// Re-export commonly used types
pub use args::build_convert_args;
pub use magick::MagickEngine;
pub use mime::MagicMimeDetector;
pub use traits::{ImageAttributes, ImageEngine, MimeDetector};
