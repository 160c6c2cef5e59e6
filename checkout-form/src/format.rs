//! Input masks applied on every keystroke.
//!
//! Every formatter strips non-digits first and rebuilds the mask from the
//! digits alone, so feeding a formatted value back in returns it unchanged.

/// Maximum rendered length of a card number (16 digits + 3 spaces)
const CARD_NUMBER_MAX_LEN: usize = 19;

/// Keep only ASCII digits
pub fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Render a CPF as `XXX.XXX.XXX-XX`, progressively as digits arrive
pub fn format_cpf(value: &str) -> String {
    let numbers: String = digits(value).chars().take(11).collect();
    let n = numbers.len();
    match n {
        0..=3 => numbers,
        4..=6 => format!("{}.{}", &numbers[..3], &numbers[3..]),
        7..=9 => format!("{}.{}.{}", &numbers[..3], &numbers[3..6], &numbers[6..]),
        _ => format!(
            "{}.{}.{}-{}",
            &numbers[..3],
            &numbers[3..6],
            &numbers[6..9],
            &numbers[9..]
        ),
    }
}

/// Render a mobile number as `(DD) DDDDD-DDDD`
pub fn format_phone(value: &str) -> String {
    let numbers: String = digits(value).chars().take(11).collect();
    match numbers.len() {
        0 => String::new(),
        1..=2 => format!("({}", numbers),
        3..=7 => format!("({}) {}", &numbers[..2], &numbers[2..]),
        _ => format!("({}) {}-{}", &numbers[..2], &numbers[2..7], &numbers[7..]),
    }
}

/// Group card digits by four, cut at 19 characters
pub fn format_card_number(value: &str) -> String {
    let numbers = digits(value);
    let mut out = String::with_capacity(CARD_NUMBER_MAX_LEN);
    for (i, c) in numbers.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out.truncate(CARD_NUMBER_MAX_LEN);
    out
}

/// Render an expiry date as `MM/YY`
pub fn format_expiry(value: &str) -> String {
    let numbers: String = digits(value).chars().take(4).collect();
    if numbers.len() <= 2 {
        return numbers;
    }
    format!("{}/{}", &numbers[..2], &numbers[2..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_mask_grows_with_digits() {
        assert_eq!(format_cpf(""), "");
        assert_eq!(format_cpf("529"), "529");
        assert_eq!(format_cpf("5299"), "529.9");
        assert_eq!(format_cpf("5299822"), "529.982.2");
        assert_eq!(format_cpf("5299822472"), "529.982.247-2");
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
    }

    #[test]
    fn cpf_mask_drops_digits_past_eleven() {
        assert_eq!(format_cpf("529982247251234"), "529.982.247-25");
        assert_eq!(format_cpf("abc529.982.247-25"), "529.982.247-25");
    }

    #[test]
    fn phone_mask_grows_with_digits() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("1"), "(1");
        assert_eq!(format_phone("11"), "(11");
        assert_eq!(format_phone("11987"), "(11) 987");
        assert_eq!(format_phone("1198765"), "(11) 98765");
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("1198765432199"), "(11) 98765-4321");
    }

    #[test]
    fn card_number_grouped_and_capped() {
        assert_eq!(format_card_number("4539148803436467"), "4539 1488 0343 6467");
        assert_eq!(format_card_number("45391"), "4539 1");
        assert_eq!(format_card_number("4539"), "4539");
        assert_eq!(format_card_number("45391488034364671234"), "4539 1488 0343 6467");
        assert_eq!(format_card_number("4539 1488 0343 6467 1").len(), 19);
    }

    #[test]
    fn expiry_inserts_slash_after_month() {
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12");
        assert_eq!(format_expiry("123"), "12/3");
        assert_eq!(format_expiry("12/29"), "12/29");
        assert_eq!(format_expiry("122999"), "12/29");
    }
}
