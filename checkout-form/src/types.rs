//! Type definitions for the checkout form

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::brand::CardBrand;
use crate::error::ValidationError;
use crate::format::digits;

/// Logical fields of the checkout form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Name,
    Email,
    EmailConfirm,
    Phone,
    Document,
    CardNumber,
    CardName,
    CardExpiry,
    CardCvv,
}

impl FieldName {
    pub const ALL: [FieldName; 9] = [
        FieldName::Name,
        FieldName::Email,
        FieldName::EmailConfirm,
        FieldName::Phone,
        FieldName::Document,
        FieldName::CardNumber,
        FieldName::CardName,
        FieldName::CardExpiry,
        FieldName::CardCvv,
    ];

    /// Fields that must be filled and valid before the payment section appears
    pub const CONTACT: [FieldName; 5] = [
        FieldName::Name,
        FieldName::Email,
        FieldName::EmailConfirm,
        FieldName::Phone,
        FieldName::Document,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Email => "email",
            FieldName::EmailConfirm => "emailConfirm",
            FieldName::Phone => "phone",
            FieldName::Document => "document",
            FieldName::CardNumber => "cardNumber",
            FieldName::CardName => "cardName",
            FieldName::CardExpiry => "cardExpiry",
            FieldName::CardCvv => "cardCVV",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field editing state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    /// Set on first edit, never cleared
    pub touched: bool,
    pub error: Option<ValidationError>,
}

impl FieldState {
    /// Filled in and free of errors
    pub fn is_complete(&self) -> bool {
        !self.value.trim().is_empty() && self.error.is_none()
    }

    /// Error to render; untouched fields show nothing
    pub fn visible_error(&self) -> Option<String> {
        if self.touched {
            self.error.as_ref().map(ToString::to_string)
        } else {
            None
        }
    }
}

/// Whole-form state, one per form session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    fields: HashMap<FieldName, FieldState>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            fields: FieldName::ALL
                .iter()
                .map(|&name| (name, FieldState::default()))
                .collect(),
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, name: FieldName) -> &FieldState {
        // Every FieldName is inserted at construction and never removed
        &self.fields[&name]
    }

    pub fn value(&self, name: FieldName) -> &str {
        &self.field(name).value
    }

    pub(crate) fn set(&mut self, name: FieldName, value: String, error: Option<ValidationError>) {
        self.fields.insert(
            name,
            FieldState {
                value,
                touched: true,
                error,
            },
        );
    }

    /// Brand of the current card number, recomputed on every call
    pub fn card_brand(&self) -> CardBrand {
        CardBrand::identify(self.value(FieldName::CardNumber))
    }

    /// Whether the payment section is shown. Side-effect free.
    pub fn payment_visible(&self) -> bool {
        FieldName::CONTACT
            .iter()
            .all(|&name| self.field(name).is_complete())
    }

    /// Flatten the payment-side values into the submission payload
    pub fn to_payload(&self, payment_method: PaymentMethod) -> CheckoutPayload {
        CheckoutPayload {
            card_name: self.value(FieldName::CardName).to_string(),
            document: self.value(FieldName::Document).to_string(),
            card_number: self.value(FieldName::CardNumber).to_string(),
            card_expiry: self.value(FieldName::CardExpiry).to_string(),
            card_cvv: self.value(FieldName::CardCvv).to_string(),
            payment_method,
        }
    }
}

/// Credit or debit, chosen alongside the card details
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Credit,
    Debit,
}

impl PaymentMethod {
    /// Label written to stored records
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Credit => "Crédito",
            PaymentMethod::Debit => "Débito",
        }
    }
}

/// Body of `POST /api/save-form-data`
///
/// Custom `Debug` implementation redacts the card number and CVV
/// so the payload can be logged.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub card_name: String,
    pub document: String,
    pub card_number: String,
    pub card_expiry: String,
    #[serde(rename = "cardCVV")]
    pub card_cvv: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl fmt::Debug for CheckoutPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutPayload")
            .field("card_name", &self.card_name)
            .field("document", &self.document)
            .field("card_number", &"****")
            .field("card_expiry", &self.card_expiry)
            .field("card_cvv", &"***")
            .field("payment_method", &self.payment_method)
            .finish()
    }
}

impl CheckoutPayload {
    /// The five submitted values in wire order:
    /// card name, document, card number, expiry, CVV
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.card_name,
            &self.document,
            &self.card_number,
            &self.card_expiry,
            &self.card_cvv,
        ]
    }

    /// Card number with separators removed
    pub fn card_digits(&self) -> String {
        digits(&self.card_number)
    }
}

/// Response of `POST /api/save-form-data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_has_every_field_empty_and_untouched() {
        let form = FormState::new();
        for name in FieldName::ALL {
            let field = form.field(name);
            assert!(field.value.is_empty());
            assert!(!field.touched);
            assert!(field.error.is_none());
        }
        assert!(!form.payment_visible());
        assert_eq!(form.card_brand(), CardBrand::Unknown);
    }

    #[test]
    fn payload_uses_wire_names_and_redacts_debug() {
        let payload = CheckoutPayload {
            card_name: "Maria Silva".into(),
            document: "529.982.247-25".into(),
            card_number: "4539 1488 0343 6467".into(),
            card_expiry: "12/29".into(),
            card_cvv: "123".into(),
            payment_method: PaymentMethod::Credit,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["cardName"], "Maria Silva");
        assert_eq!(json["cardCVV"], "123");
        assert_eq!(json["paymentMethod"], "credit");

        let debug = format!("{:?}", payload);
        assert!(!debug.contains("4539"));
        assert!(!debug.contains("123\""));
        assert_eq!(payload.card_digits(), "4539148803436467");
    }

    #[test]
    fn payment_method_defaults_to_credit() {
        let payload: CheckoutPayload = serde_json::from_str(
            r#"{"cardName":"a","document":"b","cardNumber":"c","cardExpiry":"d","cardCVV":"e"}"#,
        )
        .unwrap();
        assert_eq!(payload.payment_method, PaymentMethod::Credit);
        assert_eq!(payload.fields(), ["a", "b", "c", "d", "e"]);
    }
}
