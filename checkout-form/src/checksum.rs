//! Check-digit algorithms for CPF and card numbers.

use crate::format::digits;

/// Validate a CPF by its two trailing check digits. Separators are ignored.
///
/// Rejects anything that is not exactly 11 digits, and the eleven
/// repeated-digit sequences that satisfy the arithmetic but are never issued.
pub fn is_valid_cpf(value: &str) -> bool {
    let numbers: Vec<u32> = digits(value)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();
    if numbers.len() != 11 || numbers.iter().all(|&d| d == numbers[0]) {
        return false;
    }
    cpf_check_digit(&numbers[..9]) == numbers[9] && cpf_check_digit(&numbers[..10]) == numbers[10]
}

/// Weighted sum mod 11 mod 10, weights descending from `len + 1` to 2
pub fn cpf_check_digit(prefix: &[u32]) -> u32 {
    let top = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();
    (sum * 10) % 11 % 10
}

/// Luhn check over 13 to 19 digits. Separators are ignored.
pub fn is_valid_card_number(value: &str) -> bool {
    let numbers = digits(value);
    if !(13..=19).contains(&numbers.len()) {
        return false;
    }
    luhn_sum(&numbers) % 10 == 0
}

fn luhn_sum(numbers: &str) -> u32 {
    numbers
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum()
}

/// Digit that makes `prefix` followed by it pass the Luhn check
pub fn luhn_check_digit(prefix: &str) -> u32 {
    let with_zero = format!("{}0", digits(prefix));
    (10 - luhn_sum(&with_zero) % 10) % 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_valid_cpfs() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("52998224725"));
        assert!(is_valid_cpf("111.444.777-35"));
    }

    #[test]
    fn rejects_bad_cpfs() {
        assert!(!is_valid_cpf("529.982.247-24"));
        assert!(!is_valid_cpf("529.982.247-2"));
        assert!(!is_valid_cpf("5299822472500"));
        assert!(!is_valid_cpf(""));
    }

    #[test]
    fn rejects_repeated_digit_cpfs() {
        for d in 0..=9 {
            let cpf = d.to_string().repeat(11);
            assert!(!is_valid_cpf(&cpf), "{} should be rejected", cpf);
        }
    }

    #[test]
    fn luhn_accepts_test_cards() {
        assert!(is_valid_card_number("4539 1488 0343 6467"));
        assert!(is_valid_card_number("4111111111111111"));
        assert!(is_valid_card_number("378282246310005"));
        assert!(is_valid_card_number("5555555555554444"));
    }

    #[test]
    fn luhn_rejects_bad_sum_and_length() {
        assert!(!is_valid_card_number("4111111111111112"));
        // 12 digits with a valid sum is still too short
        assert!(!is_valid_card_number("000000000000"));
        assert!(!is_valid_card_number(&"0".repeat(20)));
        assert!(is_valid_card_number(&"0".repeat(13)));
    }

    #[test]
    fn check_digit_completes_prefix() {
        assert_eq!(luhn_check_digit("453914880343646"), 7);
        assert_eq!(luhn_check_digit("411111111111111"), 1);
        assert_eq!(cpf_check_digit(&[5, 2, 9, 9, 8, 2, 2, 4, 7]), 2);
        assert_eq!(cpf_check_digit(&[5, 2, 9, 9, 8, 2, 2, 4, 7, 2]), 5);
    }
}
