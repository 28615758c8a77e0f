//! Schema subsystem
//!
//! A schema describes the single table served by the application: its
//! ordered fields, their types, the primary key, required flags,
//! validation rules and display masks.
//!
//! # Design Principles
//!
//! - Loaded once at startup, immutable afterwards
//! - Type and validator names resolved to enums at load time
//! - Regex rules compiled at load time; a bad pattern aborts startup

mod errors;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::SchemaLoader;
pub use types::{Field, FieldType, RegexRule, Schema, Validation, ValidationKind};
