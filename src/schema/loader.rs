//! Schema loader
//!
//! Reads the JSON table description once at startup:
//!
//! ```json
//! {
//!   "table_name": "clientes",
//!   "fields": [
//!     {"name": "id", "type": "int", "primary_key": true},
//!     {"name": "cpf", "type": "string", "required": true,
//!      "validation": {"type": "cpf", "regex_rules": []},
//!      "mask": "999.999.999-99"}
//!   ]
//! }
//! ```
//!
//! Missing or malformed schema files are FATAL.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::types::{Field, FieldType, RegexRule, Schema, Validation, ValidationKind};

/// Raw schema document as it appears on disk
#[derive(Debug, Deserialize)]
struct SchemaDocument {
    table_name: String,
    #[serde(default)]
    fields: Vec<FieldDocument>,
}

#[derive(Debug, Deserialize)]
struct FieldDocument {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    validation: Option<ValidationDocument>,
    #[serde(default)]
    mask: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ValidationDocument {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    regex_rules: Option<Vec<RegexRuleDocument>>,
}

#[derive(Debug, Deserialize)]
struct RegexRuleDocument {
    pattern: String,
    #[serde(default)]
    message: String,
}

/// Loads schema documents into typed, immutable schemas.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Loads and checks the schema file at `path`.
    pub fn load(path: &Path) -> SchemaResult<Schema> {
        let content = fs::read_to_string(path)
            .map_err(|e| SchemaError::unreadable(path.display().to_string(), e))?;

        Self::parse(&content)
    }

    /// Parses and checks a schema document held in memory.
    pub fn parse(content: &str) -> SchemaResult<Schema> {
        let document: SchemaDocument = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed(format!("Invalid JSON schema: {}", e)))?;

        let fields = document
            .fields
            .into_iter()
            .map(resolve_field)
            .collect::<SchemaResult<Vec<_>>>()?;

        Schema::new(document.table_name, fields)
    }
}

/// Resolves type names, validation kinds and regex rules of one field.
fn resolve_field(doc: FieldDocument) -> SchemaResult<Field> {
    let field_type = FieldType::parse(&doc.type_name)
        .ok_or_else(|| SchemaError::unknown_field_type(&doc.name, &doc.type_name))?;

    let validation_doc = doc.validation.unwrap_or_default();
    let kind_name = validation_doc.kind.unwrap_or_default();
    let kind = ValidationKind::parse(&kind_name)
        .ok_or_else(|| SchemaError::unknown_validation_kind(&doc.name, &kind_name))?;

    let regex_rules = validation_doc
        .regex_rules
        .unwrap_or_default()
        .into_iter()
        .map(|rule| RegexRule::compile(&doc.name, &rule.pattern, rule.message))
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(Field {
        name: doc.name,
        field_type,
        primary_key: doc.primary_key,
        required: doc.required,
        validation: Validation { kind, regex_rules },
        mask: doc.mask.unwrap_or_default(),
    })
}
