//! SQL statement builders
//!
//! Identifiers (table and column names) come from the schema and are
//! trusted. Values are always bound as positional `?` parameters.

use super::errors::{StoreError, StoreResult};
use super::repository::PageRequest;
use crate::record::{CleanData, FieldValue};
use crate::schema::Schema;

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

impl Statement {
    fn new(sql: String, params: Vec<FieldValue>) -> Self {
        Self { sql, params }
    }
}

/// `INSERT` of every field present in `data` except a generated key.
pub fn insert(schema: &Schema, data: &CleanData) -> Statement {
    let mut columns = Vec::new();
    let mut params = Vec::new();

    for field in schema.fields.iter().filter(|f| !f.is_auto_increment()) {
        if let Some(value) = data.get(&field.name) {
            columns.push(field.name.as_str());
            params.push(value.clone());
        }
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.table_name,
        columns.join(", "),
        placeholders
    );

    Statement::new(sql, params)
}

/// `UPDATE` of every non-key field present in `data`, matched on the key.
pub fn update(schema: &Schema, id: &FieldValue, data: &CleanData) -> StoreResult<Statement> {
    let pk = schema.require_primary_key()?;

    let mut assignments = Vec::new();
    let mut params = Vec::new();

    for field in schema.fields.iter().filter(|f| !f.primary_key) {
        if let Some(value) = data.get(&field.name) {
            assignments.push(format!("{} = ?", field.name));
            params.push(value.clone());
        }
    }

    if assignments.is_empty() {
        return Err(StoreError::NothingToUpdate);
    }

    params.push(id.clone());
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        schema.table_name,
        assignments.join(", "),
        pk.name
    );

    Ok(Statement::new(sql, params))
}

pub fn delete(schema: &Schema, id: &FieldValue) -> StoreResult<Statement> {
    let pk = schema.require_primary_key()?;
    let sql = format!("DELETE FROM {} WHERE {} = ?", schema.table_name, pk.name);
    Ok(Statement::new(sql, vec![id.clone()]))
}

pub fn select_by_id(schema: &Schema, id: &FieldValue) -> StoreResult<Statement> {
    let pk = schema.require_primary_key()?;
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        column_list(schema),
        schema.table_name,
        pk.name
    );
    Ok(Statement::new(sql, vec![id.clone()]))
}

/// `COUNT(*)` of the rows matching the request's search term.
pub fn count(schema: &Schema, request: &PageRequest) -> Statement {
    let (clause, params) = search_clause(schema, &request.search);
    let sql = format!("SELECT COUNT(*) FROM {}{}", schema.table_name, clause);
    Statement::new(sql, params)
}

/// One page of rows matching the request's search term.
pub fn select_page(schema: &Schema, request: &PageRequest) -> Statement {
    let (clause, params) = search_clause(schema, &request.search);

    let order = schema
        .primary_key()
        .map(|pk| format!(" ORDER BY {}", pk.name))
        .unwrap_or_default();

    let sql = format!(
        "SELECT {} FROM {}{}{} LIMIT {} OFFSET {}",
        column_list(schema),
        schema.table_name,
        clause,
        order,
        request.size,
        request.offset()
    );

    Statement::new(sql, params)
}

/// `LIKE` over string/text columns, OR-combined. Empty when there is no
/// search term or no searchable column.
fn search_clause(schema: &Schema, search: &str) -> (String, Vec<FieldValue>) {
    if search.is_empty() {
        return (String::new(), Vec::new());
    }

    let pattern = format!("%{}%", search);
    let conditions: Vec<String> = schema
        .searchable_fields()
        .map(|f| format!("{} LIKE ?", f.name))
        .collect();

    if conditions.is_empty() {
        return (String::new(), Vec::new());
    }

    let params = vec![FieldValue::Text(pattern); conditions.len()];
    (format!(" WHERE {}", conditions.join(" OR ")), params)
}

/// Schema columns in declared order
fn column_list(schema: &Schema) -> String {
    schema
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
