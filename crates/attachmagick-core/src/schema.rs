//! Result schema declarator
//!
//! Exposes, per transform name, the shape of the fields a persistence layer
//! must reserve for a [`TransformResult`](crate::models::TransformResult).
//! This is metadata only: it stores nothing and depends on nothing but the
//! configuration, so repeated calls yield structurally identical output.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::PipelineConfig;

/// Field types a persistence layer has to map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    Text,
    Integer,
}

/// Ordered field-shape descriptor for one transform's result record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub fields: Vec<(String, FieldType)>,
}

impl FieldSchema {
    /// The conventional base file-field shape: what any stored file record
    /// carries regardless of image metadata.
    pub fn file_base() -> Self {
        FieldSchema {
            fields: vec![
                ("size".to_string(), FieldType::Integer),
                ("url".to_string(), FieldType::Text),
                ("path".to_string(), FieldType::Text),
                ("name".to_string(), FieldType::Text),
                ("type".to_string(), FieldType::Text),
            ],
        }
    }

    fn extended_with_image_fields(mut self) -> Self {
        self.fields.extend([
            ("format".to_string(), FieldType::Text),
            ("depth".to_string(), FieldType::Integer),
            ("width".to_string(), FieldType::Integer),
            ("height".to_string(), FieldType::Integer),
        ]);
        self
    }
}

/// Declare one field schema per configured transform name: the given base
/// shape extended with format/depth/width/height.
pub fn field_schemas(config: &PipelineConfig, base: &FieldSchema) -> BTreeMap<String, FieldSchema> {
    config
        .transforms()
        .keys()
        .map(|name| (name.clone(), base.clone().extended_with_image_fields()))
        .collect()
}
