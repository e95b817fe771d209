//! Key layout of each table, read from the `x-dynamodb` extension of its JSON
//! schema:
//!
//! ```json
//! {
//!   "x-dynamodb": { "partition_key": "usuarioId", "sort_key": "id" },
//!   "properties": { "usuarioId": { "type": "string" }, "id": { "type": ["string", "null"] } }
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use shared_types::{AttributeType, KeyAttribute, TableKeySchema};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ProvisionError;

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    #[serde(rename = "x-dynamodb")]
    dynamodb: Option<DynamoExtension>,
    #[serde(default)]
    properties: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct DynamoExtension {
    partition_key: Option<String>,
    sort_key: Option<String>,
}

impl SchemaDocument {
    /// Attribute type of `name`, `S` when the schema does not say.
    fn attribute_type(&self, name: &str) -> AttributeType {
        let declared = self.properties.get(name).and_then(|p| p.get("type"));
        let json_type = match declared {
            Some(serde_json::Value::String(t)) => Some(t.as_str()),
            Some(serde_json::Value::Array(types)) => types
                .iter()
                .filter_map(serde_json::Value::as_str)
                .find(|t| *t != "null"),
            _ => None,
        };
        json_type.map_or(AttributeType::S, AttributeType::from_json_type)
    }
}

pub fn parse_key_schema(raw: &str, path: &Path) -> Result<TableKeySchema, ProvisionError> {
    let invalid = |reason: String| ProvisionError::InvalidSchema {
        path: path.to_path_buf(),
        reason,
    };

    let document: SchemaDocument =
        serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
    let extension = document
        .dynamodb
        .as_ref()
        .ok_or_else(|| invalid("no x-dynamodb section".to_string()))?;
    let partition = extension
        .partition_key
        .as_deref()
        .ok_or_else(|| invalid("x-dynamodb.partition_key is missing".to_string()))?;

    Ok(TableKeySchema {
        partition_key: KeyAttribute::new(partition, document.attribute_type(partition)),
        sort_key: extension
            .sort_key
            .as_deref()
            .map(|sort| KeyAttribute::new(sort, document.attribute_type(sort))),
    })
}

pub fn load_key_schema(path: &Path) -> Result<TableKeySchema> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read table schema {}", path.display()))?;
    Ok(parse_key_schema(&raw, path)?)
}
