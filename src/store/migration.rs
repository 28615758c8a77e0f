//! Table provisioning
//!
//! Builds the `CREATE TABLE IF NOT EXISTS` statement for the schema.
//! Column types target MySQL 5.7+ and 8.0+.

use crate::schema::{FieldType, Schema};

/// MySQL column type for a schema field type
pub fn sql_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Int => "INT",
        FieldType::String => "VARCHAR(255)",
        FieldType::Text => "TEXT",
        FieldType::Date => "DATE",
        FieldType::Datetime => "DATETIME",
        FieldType::Float => "DECIMAL(10, 2)",
    }
}

/// DDL for the schema's table
pub fn create_table(schema: &Schema) -> String {
    let mut definitions: Vec<String> = schema
        .fields
        .iter()
        .map(|field| {
            let mut definition = format!("  {} {}", field.name, sql_type(field.field_type));
            if field.primary_key {
                if field.is_auto_increment() {
                    definition.push_str(" AUTO_INCREMENT");
                }
            } else if field.required {
                definition.push_str(" NOT NULL");
            } else {
                definition.push_str(" NULL");
            }
            definition
        })
        .collect();

    if let Some(pk) = schema.primary_key() {
        definitions.push(format!("  PRIMARY KEY ({})", pk.name));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;",
        schema.table_name,
        definitions.join(",\n")
    )
}
