//! Positional input masks
//!
//! A mask is a template string where three characters are wildcards:
//!
//! | char | accepts        |
//! |------|----------------|
//! | `9`  | ASCII digit    |
//! | `#`  | any letter     |
//! | `*`  | any character  |
//!
//! Every other character is a literal separator. Masks are walked over
//! Unicode scalar values, never bytes.

use crate::record::Record;
use crate::schema::Schema;

pub const DIGIT: char = '9';
pub const LETTER: char = '#';
pub const ANY: char = '*';

/// Characters removed from masked input before it is stored
const PUNCTUATION: [char; 7] = ['.', '-', '(', ')', '/', ' ', '_'];

/// Strips formatting punctuation from `value`.
///
/// The punctuation set is fixed and independent of the mask's literals.
/// Fields without a mask keep their value untouched.
pub fn clean(mask: &str, value: &str) -> String {
    if mask.is_empty() {
        return value.to_string();
    }
    value.chars().filter(|c| !PUNCTUATION.contains(c)).collect()
}

/// Projects `value` through `mask` for display.
///
/// Literals missing from the input are inserted, literals already present
/// are consumed, so formatted input is not formatted twice. The walk stops
/// at the first character a wildcard rejects and returns what was built so
/// far.
pub fn format(mask: &str, value: &str) -> String {
    if mask.is_empty() {
        return value.to_string();
    }

    let mask: Vec<char> = mask.chars().collect();
    let input: Vec<char> = value.chars().collect();

    let mut out = String::with_capacity(mask.len());
    let mut mask_idx = 0;
    let mut input_idx = 0;

    while mask_idx < mask.len() && input_idx < input.len() {
        let slot = mask[mask_idx];
        let ch = input[input_idx];

        match accepts(slot, ch) {
            Some(true) => {
                out.push(ch);
                input_idx += 1;
            }
            Some(false) => break,
            None => {
                out.push(slot);
                if ch == slot {
                    input_idx += 1;
                }
            }
        }

        mask_idx += 1;
    }

    out
}

/// `Some(accepted)` for wildcard slots, `None` for literals.
fn accepts(slot: char, ch: char) -> Option<bool> {
    match slot {
        DIGIT => Some(ch.is_ascii_digit()),
        // letter numbers such as roman numerals are not letters
        LETTER => Some(ch.is_alphabetic() && !ch.is_numeric()),
        ANY => Some(true),
        _ => None,
    }
}

/// Formats every masked, non-null column of `record` for display.
pub fn format_record(schema: &Schema, record: &mut Record) {
    for field in schema.fields.iter().filter(|f| f.has_mask()) {
        if let Some(Some(raw)) = record.get_mut(&field.name) {
            *raw = format(&field.mask, raw);
        }
    }
}

/// Formats a page of records for display.
pub fn format_records(schema: &Schema, records: &mut [Record]) {
    for record in records {
        format_record(schema, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType};

    const CPF_MASK: &str = "999.999.999-99";
    const PHONE_MASK: &str = "(99) 99999-9999";

    #[test]
    fn test_format_inserts_literals() {
        assert_eq!(format(CPF_MASK, "12345678901"), "123.456.789-01");
        assert_eq!(format(PHONE_MASK, "11987654321"), "(11) 98765-4321");
        assert_eq!(format("99999-999", "01310100"), "01310-100");
    }

    #[test]
    fn test_format_is_idempotent_on_formatted_input() {
        assert_eq!(format(CPF_MASK, "123.456.789-01"), "123.456.789-01");
        assert_eq!(format(CPF_MASK, "123456.789-01"), "123.456.789-01");
    }

    #[test]
    fn test_format_stops_at_class_mismatch() {
        assert_eq!(format(CPF_MASK, "123a5678901"), "123.");
        assert_eq!(format("###-999", "AB1-234"), "AB");
    }

    #[test]
    fn test_format_short_input_is_partial() {
        assert_eq!(format(CPF_MASK, "1234"), "123.4");
        assert_eq!(format(CPF_MASK, ""), "");
    }

    #[test]
    fn test_format_truncates_long_input() {
        assert_eq!(format("99-99", "123456"), "12-34");
    }

    #[test]
    fn test_any_wildcard_and_letters() {
        assert_eq!(format("***-####", "x1?abcd"), "x1?-abcd");
        assert_eq!(format("##", "çã"), "çã");
    }

    #[test]
    fn test_digit_slot_rejects_numeric_symbols() {
        assert_eq!(format("99", "1²"), "1");
        assert_eq!(format("99", "½1"), "");
        assert_eq!(format("##", "aⅣ"), "a");
    }

    #[test]
    fn test_empty_mask_is_identity() {
        assert_eq!(format("", "abc"), "abc");
        assert_eq!(clean("", "a.b-c"), "a.b-c");
    }

    #[test]
    fn test_clean_strips_fixed_punctuation() {
        assert_eq!(clean(CPF_MASK, "123.456.789-01"), "12345678901");
        assert_eq!(clean(PHONE_MASK, "(11) 98765-4321"), "11987654321");
        assert_eq!(clean("99/99", "a_b/c d"), "abcd");
        // literals outside the punctuation set survive
        assert_eq!(clean("99:99", "12:34"), "12:34");
    }

    #[test]
    fn test_format_record_skips_nulls_and_unmasked() {
        let schema = Schema::new(
            "t",
            vec![
                Field::new("cpf", FieldType::String).with_mask(CPF_MASK),
                Field::new("tel", FieldType::String).with_mask(PHONE_MASK),
                Field::new("nome", FieldType::String),
            ],
        )
        .unwrap();

        let mut record = Record::new();
        record.insert("cpf".into(), Some("12345678901".into()));
        record.insert("tel".into(), None);
        record.insert("nome".into(), Some("12345678901".into()));

        format_record(&schema, &mut record);

        assert_eq!(record["cpf"].as_deref(), Some("123.456.789-01"));
        assert_eq!(record["tel"], None);
        assert_eq!(record["nome"].as_deref(), Some("12345678901"));
    }
}
