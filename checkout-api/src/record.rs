//! Stored form of a checkout submission.
//!
//! Card numbers are truncated to first six and last four digits and the CVV
//! is never written. Sinks only ever see [`StoredRecord`].

use chrono::{DateTime, SecondsFormat, Utc};
use checkout_form::{CardBrand, CheckoutPayload};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record appended to a sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: Uuid,
    pub card_name: String,
    pub document: String,
    pub card_number: String,
    pub card_expiry: String,
    pub card_brand: CardBrand,
    pub payment_method: String,
    pub submitted_at: DateTime<Utc>,
}

impl StoredRecord {
    pub fn from_payload(payload: &CheckoutPayload, submitted_at: DateTime<Utc>) -> Self {
        let digits = payload.card_digits();
        Self {
            id: Uuid::new_v4(),
            card_name: payload.card_name.trim().to_string(),
            document: payload.document.clone(),
            card_number: truncate_card_number(&digits),
            card_expiry: payload.card_expiry.clone(),
            card_brand: CardBrand::identify(&digits),
            payment_method: payload.payment_method.label().to_string(),
            submitted_at,
        }
    }

    /// Spreadsheet row, columns A to E
    pub fn sheet_row(&self) -> [String; 5] {
        [
            self.card_name.clone(),
            self.document.clone(),
            self.card_number.clone(),
            self.card_expiry.clone(),
            self.card_brand.to_string(),
        ]
    }

    /// Workbook table row
    pub fn table_row(&self) -> [String; 7] {
        [
            self.document.clone(),
            self.card_name.clone(),
            self.card_number.clone(),
            self.card_expiry.clone(),
            self.card_brand.to_string(),
            self.payment_method.clone(),
            self.submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ]
    }
}

/// Keep the first six and last four digits, mask the rest
pub fn truncate_card_number(digits: &str) -> String {
    let len = digits.len();
    if len <= 4 {
        return "*".repeat(len);
    }
    let head = if len >= 13 { 6 } else { 0 };
    let tail = 4;
    format!(
        "{}{}{}",
        &digits[..head],
        "*".repeat(len - head - tail),
        &digits[len - tail..]
    )
}
