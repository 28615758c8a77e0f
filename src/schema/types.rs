//! Schema type definitions
//!
//! Supported field types:
//! - int: 64-bit signed integer
//! - string: short UTF-8 string (VARCHAR)
//! - text: long UTF-8 string
//! - date: calendar date
//! - datetime: stored and echoed as submitted
//! - float: 64-bit floating point
//!
//! Type and validation names are resolved into enums once, when the schema
//! is loaded. Request handling never compares type strings.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use crate::record::FieldValue;

/// Declared column type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    String,
    Text,
    Date,
    Datetime,
    Float,
}

impl FieldType {
    /// Resolves a schema type name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(FieldType::Int),
            "string" => Some(FieldType::String),
            "text" => Some(FieldType::Text),
            "date" => Some(FieldType::Date),
            "datetime" => Some(FieldType::Datetime),
            "float" => Some(FieldType::Float),
            _ => None,
        }
    }

    /// Returns the type name as written in schema documents
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Float => "float",
        }
    }

    /// Whether list searches match against this column
    pub fn is_searchable(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Text)
    }

    /// HTML input type used when rendering the form
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldType::Int | FieldType::Float => "number",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime-local",
            FieldType::String | FieldType::Text => "text",
        }
    }
}

/// Built-in format validator attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationKind {
    /// No built-in format check
    #[default]
    None,
    Cpf,
    Cnpj,
    Email,
    Cep,
    Telefone,
}

impl ValidationKind {
    /// Resolves a validation type name. The empty string means no check.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "" => Some(ValidationKind::None),
            "cpf" => Some(ValidationKind::Cpf),
            "cnpj" => Some(ValidationKind::Cnpj),
            "email" => Some(ValidationKind::Email),
            "cep" => Some(ValidationKind::Cep),
            "telefone" => Some(ValidationKind::Telefone),
            _ => None,
        }
    }

    /// Returns the validation name as written in schema documents
    pub fn name(&self) -> &'static str {
        match self {
            ValidationKind::None => "",
            ValidationKind::Cpf => "cpf",
            ValidationKind::Cnpj => "cnpj",
            ValidationKind::Email => "email",
            ValidationKind::Cep => "cep",
            ValidationKind::Telefone => "telefone",
        }
    }
}

/// A user-supplied pattern with the message shown when it does not match
#[derive(Debug, Clone)]
pub struct RegexRule {
    pub pattern: Regex,
    pub message: String,
}

impl RegexRule {
    /// Compiles a rule for the given field
    pub fn compile(field: &str, pattern: &str, message: impl Into<String>) -> SchemaResult<Self> {
        let compiled =
            Regex::new(pattern).map_err(|e| SchemaError::invalid_regex(field, pattern, e))?;
        Ok(Self {
            pattern: compiled,
            message: message.into(),
        })
    }

    /// Whether the value satisfies the rule (unanchored search)
    pub fn matches(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }
}

/// Validation rules of a field
#[derive(Debug, Clone, Default)]
pub struct Validation {
    pub kind: ValidationKind,
    /// Applied in declared order, first failing rule wins
    pub regex_rules: Vec<RegexRule>,
}

/// Field definition
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name, also the storage column name
    pub name: String,
    pub field_type: FieldType,
    pub primary_key: bool,
    pub required: bool,
    pub validation: Validation,
    /// Display mask (`9` digit, `#` letter, `*` any); empty for none
    pub mask: String,
}

impl Field {
    /// Create an optional field without validation or mask
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            primary_key: false,
            required: false,
            validation: Validation::default(),
            mask: String::new(),
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as primary key
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Attach a built-in format validator
    pub fn with_validation(mut self, kind: ValidationKind) -> Self {
        self.validation.kind = kind;
        self
    }

    /// Attach a display mask
    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = mask.into();
        self
    }

    /// Append a regex rule
    pub fn with_regex(mut self, pattern: &str, message: &str) -> SchemaResult<Self> {
        let rule = RegexRule::compile(&self.name, pattern, message)?;
        self.validation.regex_rules.push(rule);
        Ok(self)
    }

    /// Whether the field carries a display mask
    pub fn has_mask(&self) -> bool {
        !self.mask.is_empty()
    }

    /// Integer primary keys are generated by the store; any other key is
    /// written from the submitted value.
    pub fn is_auto_increment(&self) -> bool {
        self.primary_key && self.field_type == FieldType::Int
    }
}

/// Complete table definition
///
/// Loaded once at startup and never mutated afterwards; request handlers
/// share it through an `Arc`.
#[derive(Debug, Clone)]
pub struct Schema {
    pub table_name: String,
    /// Ordered; the order drives form and table column layout
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a schema and check its structure
    pub fn new(table_name: impl Into<String>, fields: Vec<Field>) -> SchemaResult<Self> {
        let schema = Self {
            table_name: table_name.into(),
            fields,
        };
        schema.validate_structure()?;
        Ok(schema)
    }

    /// Validates the schema structure itself
    pub fn validate_structure(&self) -> SchemaResult<()> {
        if self.table_name.trim().is_empty() {
            return Err(SchemaError::malformed("'table_name' must not be empty"));
        }

        if self.fields.is_empty() {
            return Err(SchemaError::malformed("Schema must declare at least one field"));
        }

        let mut seen = HashSet::new();
        let mut primary: Option<&str> = None;

        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::malformed("Field name must not be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::duplicate_field(&field.name));
            }
            if field.primary_key {
                if let Some(first) = primary {
                    return Err(SchemaError::multiple_primary_keys(first, &field.name));
                }
                primary = Some(&field.name);
            }
        }

        Ok(())
    }

    /// Returns the primary key field, if any
    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.primary_key)
    }

    /// Returns the primary key field or a structural error
    pub fn require_primary_key(&self) -> SchemaResult<&Field> {
        self.primary_key()
            .ok_or_else(|| SchemaError::missing_primary_key(&self.table_name))
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields matched by list searches
    pub fn searchable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.field_type.is_searchable())
    }

    /// Converts a raw key taken from a request into the primary key's type
    pub fn parse_key(&self, raw: &str) -> SchemaResult<FieldValue> {
        let pk = self.require_primary_key()?;
        let raw = raw.trim();

        if raw.is_empty() {
            return Err(SchemaError::invalid_key(&pk.name, raw));
        }

        match pk.field_type {
            FieldType::Int => raw
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| SchemaError::invalid_key(&pk.name, raw)),
            _ => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}
