//! Record values
//!
//! Validated form data flows into storage as [`CleanData`] (typed
//! [`FieldValue`]s); rows flow back out as [`Record`]s holding the string
//! or NULL each column was stored as.

mod value;

pub use value::{CleanData, FieldValue, Record, DATE_FORMAT};
