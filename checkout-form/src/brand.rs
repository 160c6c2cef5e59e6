//! Card network detection from the leading digits of a card number.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::format::digits;

/// Issuing network inferred from a card number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Diners,
    Jcb,
    Elo,
    Hipercard,
    Maestro,
    Paypal,
    Unknown,
}

const ELO: &str = concat!(
    r"^4011(78|79)|^43(1274|8935)|^45(1416|7393|763(1|2))",
    r"|^50(4175|6699|67[0-7][0-9]|9000)|^627780|^63(6297|6368)",
    r"|^65(0(0(3([1-3]|[5-9])|4([0-9])|5[0-1])|4(0[5-9]|[1-3][0-9]|8[5-9]|9[0-9])",
    r"|5([0-2][0-9]|3[0-8]|4[1-9]|[5-8][0-9]|9[0-8])|7(0[0-9]|1[0-8]|2[0-7])",
    r"|9(0[1-9]|[1-6][0-9]|7[0-8]))|16(5[2-9]|[6-7][0-9])",
    r"|50(0[0-9]|1[0-9]|2[1-9]|[3-4][0-9]|5[0-8]))",
);

/// Ordered prefix table; the first matching row wins.
static BRAND_PATTERNS: LazyLock<Vec<(CardBrand, Regex)>> = LazyLock::new(|| {
    [
        (CardBrand::Visa, r"^4"),
        (CardBrand::Mastercard, r"^5[1-5]"),
        (CardBrand::Amex, r"^3[47]"),
        (CardBrand::Discover, r"^6(?:011|5)"),
        (CardBrand::Diners, r"^3(?:0[0-5]|[68])"),
        (CardBrand::Jcb, r"^(?:2131|1800|35)"),
        (CardBrand::Elo, ELO),
        (CardBrand::Hipercard, r"^(?:606282\d{10}(?:\d{3})?|3841\d{15})"),
    ]
    .into_iter()
    .filter_map(|(brand, pattern)| match Regex::new(pattern) {
        Ok(re) => Some((brand, re)),
        Err(e) => {
            tracing::error!("invalid card brand pattern for {}: {}", brand, e);
            None
        }
    })
    .collect()
});

impl CardBrand {
    /// Identify the network of a card number. Separators are ignored.
    pub fn identify(card_number: &str) -> Self {
        let numbers = digits(card_number);
        if numbers.is_empty() {
            return CardBrand::Unknown;
        }
        BRAND_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(&numbers))
            .map(|(brand, _)| *brand)
            .unwrap_or(CardBrand::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Amex => "amex",
            CardBrand::Discover => "discover",
            CardBrand::Diners => "diners",
            CardBrand::Jcb => "jcb",
            CardBrand::Elo => "elo",
            CardBrand::Hipercard => "hipercard",
            CardBrand::Maestro => "maestro",
            CardBrand::Paypal => "paypal",
            CardBrand::Unknown => "unknown",
        }
    }

    /// Path of the logo shown next to the card number field
    pub fn icon_path(&self) -> Option<String> {
        match self {
            CardBrand::Unknown => None,
            brand => Some(format!("/card-icons/{}.png", brand.as_str())),
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardBrand {
    type Err = std::convert::Infallible;

    /// Unrecognised names map to `Unknown`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "visa" => CardBrand::Visa,
            "mastercard" => CardBrand::Mastercard,
            "amex" => CardBrand::Amex,
            "discover" => CardBrand::Discover,
            "diners" => CardBrand::Diners,
            "jcb" => CardBrand::Jcb,
            "elo" => CardBrand::Elo,
            "hipercard" => CardBrand::Hipercard,
            "maestro" => CardBrand::Maestro,
            "paypal" => CardBrand::Paypal,
            _ => CardBrand::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert_eq!(BRAND_PATTERNS.len(), 8);
    }

    #[test]
    fn identifies_common_networks() {
        assert_eq!(CardBrand::identify("4539 1488 0343 6467"), CardBrand::Visa);
        assert_eq!(CardBrand::identify("5555555555554444"), CardBrand::Mastercard);
        assert_eq!(CardBrand::identify("378282246310005"), CardBrand::Amex);
        assert_eq!(CardBrand::identify("6011111111111117"), CardBrand::Discover);
        assert_eq!(CardBrand::identify("30569309025904"), CardBrand::Diners);
        assert_eq!(CardBrand::identify("3530111333300000"), CardBrand::Jcb);
        assert_eq!(CardBrand::identify("6277801234567890"), CardBrand::Elo);
        assert_eq!(CardBrand::identify("6062825624254001"), CardBrand::Hipercard);
    }

    #[test]
    fn earlier_rows_shadow_later_ones() {
        // 4011 78 is an Elo BIN but the Visa row comes first
        assert_eq!(CardBrand::identify("4011780000000000"), CardBrand::Visa);
        // 65 is claimed by Discover before Elo is consulted
        assert_eq!(CardBrand::identify("6500310000000000"), CardBrand::Discover);
    }

    #[test]
    fn unmatched_or_empty_is_unknown() {
        assert_eq!(CardBrand::identify(""), CardBrand::Unknown);
        assert_eq!(CardBrand::identify("9999"), CardBrand::Unknown);
        assert_eq!(CardBrand::identify("abc"), CardBrand::Unknown);
    }

    #[test]
    fn name_round_trips_through_from_str() {
        assert_eq!("Maestro".parse::<CardBrand>().unwrap(), CardBrand::Maestro);
        assert_eq!("nope".parse::<CardBrand>().unwrap(), CardBrand::Unknown);
        assert_eq!(CardBrand::Elo.icon_path().as_deref(), Some("/card-icons/elo.png"));
        assert_eq!(CardBrand::Unknown.icon_path(), None);
    }
}
