//! Domain models for attachment transformation
//!
//! A [`TransformSpec`] describes one named conversion as an ordered list of
//! engine options. Option order is preserved because the convert argument
//! list is positional: geometry has to land before `-composite`, and the
//! composite fix-up in the argument builder depends on token positions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Value of a single convert option: a scalar token or an ordered sequence
/// of tokens that expand in place after the flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Scalar(String),
    List(Vec<String>),
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Scalar(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Scalar(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        OptionValue::List(value)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(value: Vec<&str>) -> Self {
        OptionValue::List(value.into_iter().map(String::from).collect())
    }
}

/// One named transformation: ordered option/value pairs plus an optional
/// output format override. The `format` field controls the output file
/// extension and is never emitted as a convert flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformSpec {
    #[serde(default)]
    pub options: Vec<(String, OptionValue)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl TransformSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option, keeping insertion order.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.push((name.into(), value.into()));
        self
    }

    /// Set the desired output format (extension), e.g. `"png"`.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// A reference to the uploaded source file. Supplied per invocation and
/// never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Filesystem path of the uploaded file.
    pub path: PathBuf,
    /// Logical (display) name recorded onto each transform result.
    pub name: String,
}

impl Attachment {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Extension of the source file without the leading dot, if any.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
    }
}

/// Per-transform output record. Created empty by the caller and populated
/// exactly once by a successful transform task; a failed task leaves its
/// slot untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformResult {
    pub format: String,
    pub depth: u32,
    pub width: u32,
    pub height: u32,
    pub size: u64,
    pub url: String,
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

impl TransformResult {
    /// A non-empty storage path means the artifact was actually persisted
    /// through `StorageProvider::save`. The removal coordinator relies on
    /// this to decide which transforms to clean up.
    pub fn is_persisted(&self) -> bool {
        !self.path.is_empty()
    }
}
