//! Form validation pipeline
//!
//! Per field, in schema order:
//! 1. required and empty: "Campo obrigatório"
//! 2. optional and empty: explicit null
//! 3. built-in format validator
//! 4. regex rules in declared order, first failure wins
//! 5. type coercion
//!
//! The first error of a field ends its checks; errors of all fields are
//! collected in one pass.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use super::mask;
use crate::record::{CleanData, FieldValue};
use crate::schema::{Field, FieldType, Schema};

pub const REQUIRED_MESSAGE: &str = "Campo obrigatório";
pub const INTEGER_MESSAGE: &str = "Valor deve ser um número inteiro";
pub const DATE_MESSAGE: &str = "Data inválida. Use AAAA-MM-DD";
pub const NUMERIC_MESSAGE: &str = "Valor deve ser numérico";

/// Key for errors not tied to a single field
pub const FORM_ERROR_KEY: &str = "_form";

/// Accepted date layouts, tried in order
const DATE_LAYOUTS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Submitted form values, one string per field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
    /// Builds form values from raw pairs; repeated names keep the first value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (name, value) in pairs {
            values.entry(name.into()).or_insert_with(|| value.into());
        }
        Self(values)
    }

    /// Returns the submitted value, or the empty string when absent
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Field name to user-facing message
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Records a whole-submission failure under [`FORM_ERROR_KEY`]
    pub fn set_form_error(&mut self, message: impl Into<String>) {
        self.insert(FORM_ERROR_KEY, message);
    }

    pub fn form_error(&self) -> Option<&str> {
        self.get(FORM_ERROR_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Result of validating one submission
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub clean: CleanData,
    pub errors: FieldErrors,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Clean data when no field failed, the errors otherwise
    pub fn into_result(self) -> Result<CleanData, FieldErrors> {
        if self.errors.is_empty() {
            Ok(self.clean)
        } else {
            Err(self.errors)
        }
    }
}

/// Validates and coerces a form submission against the schema.
pub fn validate(form: &FormValues, schema: &Schema) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for field in &schema.fields {
        match validate_field(field, form.get(&field.name)) {
            Ok(value) => {
                outcome.clean.insert(field.name.clone(), value);
            }
            Err(message) => outcome.errors.insert(field.name.clone(), message),
        }
    }

    tracing::debug!(
        table = %schema.table_name,
        errors = outcome.errors.len(),
        "form validated"
    );

    outcome
}

/// Empty optional fields, keys included, come back as `Null`.
fn validate_field(field: &Field, value: &str) -> Result<FieldValue, String> {
    if value.is_empty() {
        if field.required {
            return Err(REQUIRED_MESSAGE.to_string());
        }
        return Ok(FieldValue::Null);
    }

    let kind = field.validation.kind;
    if !kind.check(value, field.required) {
        return Err(kind.message().to_string());
    }

    if let Some(rule) = field
        .validation
        .regex_rules
        .iter()
        .find(|rule| !rule.matches(value))
    {
        return Err(rule.message.clone());
    }

    coerce(field, value)
}

fn coerce(field: &Field, value: &str) -> Result<FieldValue, String> {
    match field.field_type {
        FieldType::Int => value
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|_| INTEGER_MESSAGE.to_string()),
        FieldType::Float => value
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| NUMERIC_MESSAGE.to_string()),
        FieldType::Date => parse_date(value)
            .map(FieldValue::Date)
            .ok_or_else(|| DATE_MESSAGE.to_string()),
        FieldType::String | FieldType::Text => Ok(FieldValue::Text(mask::clean(&field.mask, value))),
        FieldType::Datetime => Ok(FieldValue::Text(value.to_string())),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(value, layout).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationKind;

    fn form(pairs: &[(&str, &str)]) -> FormValues {
        FormValues::from_pairs(pairs.iter().copied())
    }

    fn schema(fields: Vec<Field>) -> Schema {
        Schema::new("t", fields).unwrap()
    }

    #[test]
    fn test_required_missing() {
        let s = schema(vec![Field::new("age", FieldType::Int).required()]);
        let outcome = validate(&form(&[]), &s);
        assert_eq!(outcome.errors.get("age"), Some(REQUIRED_MESSAGE));
        assert!(outcome.clean.is_empty());
    }

    #[test]
    fn test_optional_empty_is_null_even_with_validator() {
        let s = schema(vec![
            Field::new("email", FieldType::String).with_validation(ValidationKind::Email),
            Field::new("doc", FieldType::String)
                .with_validation(ValidationKind::Cpf)
                .with_regex("^x$", "nunca")
                .unwrap(),
        ]);
        let outcome = validate(&form(&[("email", "")]), &s);
        assert!(outcome.is_valid());
        assert_eq!(outcome.clean["email"], FieldValue::Null);
        assert_eq!(outcome.clean["doc"], FieldValue::Null);
    }

    #[test]
    fn test_cpf_failure_message() {
        let s = schema(vec![Field::new("doc", FieldType::String)
            .required()
            .with_validation(ValidationKind::Cpf)]);
        let outcome = validate(&form(&[("doc", "11111111111")]), &s);
        assert_eq!(outcome.errors.get("doc"), Some("CPF inválido"));
    }

    #[test]
    fn test_format_failure_skips_regex_and_coercion() {
        let s = schema(vec![Field::new("n", FieldType::Int)
            .required()
            .with_validation(ValidationKind::Cep)
            .with_regex("^never$", "regex ran")
            .unwrap()]);
        let outcome = validate(&form(&[("n", "abc")]), &s);
        assert_eq!(outcome.errors.get("n"), Some("CEP inválido"));
    }

    #[test]
    fn test_first_failing_regex_wins() {
        let s = schema(vec![Field::new("code", FieldType::String)
            .required()
            .with_regex("^[A-Z]", "Deve começar com maiúscula")
            .unwrap()
            .with_regex("[0-9]$", "Deve terminar com dígito")
            .unwrap()]);

        let outcome = validate(&form(&[("code", "abc")]), &s);
        assert_eq!(outcome.errors.get("code"), Some("Deve começar com maiúscula"));

        let outcome = validate(&form(&[("code", "Abc")]), &s);
        assert_eq!(outcome.errors.get("code"), Some("Deve terminar com dígito"));

        let outcome = validate(&form(&[("code", "Abc1")]), &s);
        assert_eq!(outcome.clean["code"], FieldValue::Text("Abc1".into()));
    }

    #[test]
    fn test_regex_failure_skips_coercion() {
        let s = schema(vec![Field::new("n", FieldType::Int)
            .required()
            .with_regex("^[0-9]+$", "Somente dígitos")
            .unwrap()]);
        let outcome = validate(&form(&[("n", "x")]), &s);
        assert_eq!(outcome.errors.get("n"), Some("Somente dígitos"));
    }

    #[test]
    fn test_int_coercion() {
        let s = schema(vec![Field::new("n", FieldType::Int).required()]);
        assert_eq!(validate(&form(&[("n", "42")]), &s).clean["n"], FieldValue::Int(42));
        assert_eq!(validate(&form(&[("n", "-7")]), &s).clean["n"], FieldValue::Int(-7));
        assert_eq!(
            validate(&form(&[("n", "4.2")]), &s).errors.get("n"),
            Some(INTEGER_MESSAGE)
        );
    }

    #[test]
    fn test_float_coercion() {
        let s = schema(vec![Field::new("x", FieldType::Float).required()]);
        assert_eq!(validate(&form(&[("x", "3.25")]), &s).clean["x"], FieldValue::Float(3.25));
        assert_eq!(
            validate(&form(&[("x", "3,25")]), &s).errors.get("x"),
            Some(NUMERIC_MESSAGE)
        );
    }

    #[test]
    fn test_date_with_fallback_layout() {
        let s = schema(vec![Field::new("d", FieldType::Date).required()]);
        let expected = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        assert_eq!(validate(&form(&[("d", "2024-01-31")]), &s).clean["d"], expected);
        assert_eq!(validate(&form(&[("d", "31/01/2024")]), &s).clean["d"], expected);

        let outcome = validate(&form(&[("d", "2024-13-40")]), &s);
        assert_eq!(outcome.errors.get("d"), Some(DATE_MESSAGE));
        assert!(outcome.errors.get("d").unwrap().starts_with("Data inválida"));
    }

    #[test]
    fn test_masked_text_is_cleaned() {
        let s = schema(vec![
            Field::new("cpf", FieldType::String).required().with_mask("999.999.999-99"),
            Field::new("nome", FieldType::Text).required(),
        ]);
        let outcome = validate(
            &form(&[("cpf", "123.456.789-01"), ("nome", "Ana Maria")]),
            &s,
        );
        assert_eq!(outcome.clean["cpf"], FieldValue::Text("12345678901".into()));
        assert_eq!(outcome.clean["nome"], FieldValue::Text("Ana Maria".into()));
    }

    #[test]
    fn test_datetime_kept_raw() {
        let s = schema(vec![Field::new("at", FieldType::Datetime).required()]);
        let outcome = validate(&form(&[("at", "2024-01-31T10:00")]), &s);
        assert_eq!(outcome.clean["at"], FieldValue::Text("2024-01-31T10:00".into()));
    }

    #[test]
    fn test_empty_optional_primary_key_is_null() {
        let s = schema(vec![
            Field::new("id", FieldType::Int).primary_key(),
            Field::new("nome", FieldType::String).required(),
        ]);
        let outcome = validate(&form(&[("id", ""), ("nome", "Ana")]), &s);
        assert!(outcome.is_valid());
        assert_eq!(outcome.clean.get("id"), Some(&FieldValue::Null));

        let outcome = validate(&form(&[("id", "9"), ("nome", "Ana")]), &s);
        assert_eq!(outcome.clean["id"], FieldValue::Int(9));
    }

    #[test]
    fn test_errors_collected_across_fields() {
        let s = schema(vec![
            Field::new("a", FieldType::Int).required(),
            Field::new("b", FieldType::Float).required(),
            Field::new("c", FieldType::String).required(),
        ]);
        let outcome = validate(&form(&[("a", "x"), ("b", "y"), ("c", "ok")]), &s);
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.clean["c"], FieldValue::Text("ok".into()));

        let errors = outcome.into_result().unwrap_err();
        assert!(errors.contains("a"));
        assert!(errors.contains("b"));
    }

    #[test]
    fn test_optional_present_malformed_passes_format_check() {
        let s = schema(vec![
            Field::new("email", FieldType::String).with_validation(ValidationKind::Email)
        ]);
        let outcome = validate(&form(&[("email", "not-an-email")]), &s);
        assert!(outcome.is_valid());
        assert_eq!(outcome.clean["email"], FieldValue::Text("not-an-email".into()));
    }

    #[test]
    fn test_form_values_keep_first() {
        let values = form(&[("a", "1"), ("a", "2")]);
        assert_eq!(values.get("a"), "1");
        assert_eq!(values.get("missing"), "");
    }

    #[test]
    fn test_form_error_key() {
        let mut errors = FieldErrors::new();
        errors.set_form_error("Erro interno ao atualizar.");
        assert_eq!(errors.form_error(), Some("Erro interno ao atualizar."));
        assert!(errors.contains(FORM_ERROR_KEY));
    }
}
