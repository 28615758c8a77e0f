//! Field validation and masking engine
//!
//! - [`documents`]: CPF and CNPJ check-digit validators
//! - [`formats`]: email, CEP and phone validators
//! - [`mask`]: punctuation cleaning and display formatting
//! - [`pipeline`]: per-submission orchestration and type coercion
//!
//! Nothing here performs I/O, blocks, or panics on user input.

pub mod documents;
pub mod formats;
pub mod mask;
pub mod pipeline;

pub use documents::{is_valid_cnpj, is_valid_cpf};
pub use formats::{is_valid_cep, is_valid_email, is_valid_phone};
pub use pipeline::{
    validate, FieldErrors, FormValues, ValidationOutcome, FORM_ERROR_KEY, REQUIRED_MESSAGE,
};
