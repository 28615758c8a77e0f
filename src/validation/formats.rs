//! Contact and postal format validators
//!
//! Every validator takes the raw value plus the field's required flag and
//! passes unconditionally when the field is optional.

use regex::Regex;
use std::sync::OnceLock;

use super::documents::{is_valid_cnpj, is_valid_cpf};
use crate::schema::ValidationKind;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is valid")
    })
}

/// Validates an email address of the `local@domain.tld` shape
pub fn is_valid_email(value: &str, required: bool) -> bool {
    if !required {
        return true;
    }
    email_regex().is_match(value)
}

/// Validates a CEP: exactly 8 digits, no formatting
pub fn is_valid_cep(value: &str, required: bool) -> bool {
    if !required {
        return true;
    }
    value.len() == 8 && all_ascii_digits(value)
}

/// Validates a phone number: 10 or 11 digits, no formatting
pub fn is_valid_phone(value: &str, required: bool) -> bool {
    if !required {
        return true;
    }
    matches!(value.len(), 10 | 11) && all_ascii_digits(value)
}

fn all_ascii_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

impl ValidationKind {
    /// Runs the built-in check for this kind. `None` always passes.
    pub fn check(&self, value: &str, required: bool) -> bool {
        match self {
            ValidationKind::None => true,
            ValidationKind::Cpf => is_valid_cpf(value, required),
            ValidationKind::Cnpj => is_valid_cnpj(value, required),
            ValidationKind::Email => is_valid_email(value, required),
            ValidationKind::Cep => is_valid_cep(value, required),
            ValidationKind::Telefone => is_valid_phone(value, required),
        }
    }

    /// Message shown to the user when the check fails
    pub fn message(&self) -> &'static str {
        match self {
            ValidationKind::None => "",
            ValidationKind::Cpf => "CPF inválido",
            ValidationKind::Cnpj => "CNPJ inválido",
            ValidationKind::Email => "Email inválido",
            ValidationKind::Cep => "CEP inválido",
            ValidationKind::Telefone => "Telefone inválido",
        }
    }
}
