//! Brazilian document validators (CPF, CNPJ)
//!
//! Both documents end in two check digits computed with a weighted sum
//! modulo 11. Formatting characters are ignored: only ASCII digits count.

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;

const CNPJ_WEIGHTS_FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_WEIGHTS_SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Validates a CPF. Optional fields always pass.
pub fn is_valid_cpf(value: &str, required: bool) -> bool {
    if !required {
        return true;
    }

    let digits = just_digits(value);
    if digits.len() != CPF_LEN || all_same(&digits) {
        return false;
    }

    let first = check_digit(&digits[..9], (2..=10).rev());
    let second = check_digit(&digits[..10], (2..=11).rev());

    digits[9] == first && digits[10] == second
}

/// Validates a CNPJ. Optional fields always pass.
pub fn is_valid_cnpj(value: &str, required: bool) -> bool {
    if !required {
        return true;
    }

    let digits = just_digits(value);
    if digits.len() != CNPJ_LEN || all_same(&digits) {
        return false;
    }

    let first = check_digit(&digits[..12], CNPJ_WEIGHTS_FIRST);
    let second = check_digit(&digits[..13], CNPJ_WEIGHTS_SECOND);

    digits[12] == first && digits[13] == second
}

/// Weighted sum modulo 11; remainders below 2 map to 0.
fn check_digit(digits: &[u32], weights: impl IntoIterator<Item = u32>) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        rem if rem < 2 => 0,
        rem => 11 - rem,
    }
}

fn just_digits(value: &str) -> Vec<u32> {
    value
        .chars()
        .filter(|c| c.is_ascii_digit())
        .filter_map(|c| c.to_digit(10))
        .collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}
