//! Keystroke handling for one form session.
//!
//! Input flows one way: raw text -> formatter -> validator -> [`FormState`].
//! The payment section's visibility is derived from the state on demand.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::brand::CardBrand;
use crate::format::{format_card_number, format_cpf, format_expiry, format_phone};
use crate::types::{FieldName, FieldState, FormState};
use crate::validate::{ValidationContext, ValidatorRegistry};

/// Source of the current date for expiry checks
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Apply the input mask for `field`; free-text fields pass through
pub fn format_field(field: FieldName, raw: &str) -> String {
    match field {
        FieldName::Document => format_cpf(raw),
        FieldName::Phone => format_phone(raw),
        FieldName::CardNumber => format_card_number(raw),
        FieldName::CardExpiry => format_expiry(raw),
        _ => raw.to_string(),
    }
}

/// One user's checkout form
pub struct CheckoutForm {
    state: FormState,
    validators: Arc<ValidatorRegistry>,
    clock: Arc<dyn Clock>,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self::new(Arc::new(ValidatorRegistry::default()), Arc::new(SystemClock))
    }
}

impl CheckoutForm {
    pub fn new(validators: Arc<ValidatorRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: FormState::new(),
            validators,
            clock,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn field(&self, name: FieldName) -> &FieldState {
        self.state.field(name)
    }

    /// Handle one edit of `field`. Returns the formatted value now held.
    ///
    /// Only the edited field is revalidated. Changing the email does not
    /// recheck an already-entered confirmation.
    pub fn input(&mut self, field: FieldName, raw: &str) -> &FieldState {
        let value = format_field(field, raw);
        let ctx = ValidationContext {
            email: self.state.value(FieldName::Email),
            today: self.clock.today(),
        };
        let error = self.validators.validate(field, &value, &ctx).err();
        if let Some(e) = &error {
            tracing::trace!(field = %field, error = %e, "field rejected");
        }
        self.state.set(field, value, error);
        self.state.field(field)
    }

    pub fn card_brand(&self) -> CardBrand {
        self.state.card_brand()
    }

    pub fn payment_visible(&self) -> bool {
        self.state.payment_visible()
    }

    /// Drop every value, as on returning to a fresh form
    pub fn reset(&mut self) {
        self.state = FormState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn form() -> CheckoutForm {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        CheckoutForm::new(Arc::new(ValidatorRegistry::default()), Arc::new(FixedClock(today)))
    }

    fn fill_contact(form: &mut CheckoutForm) {
        form.input(FieldName::Name, "Maria Silva");
        form.input(FieldName::Email, "maria@example.com");
        form.input(FieldName::EmailConfirm, "maria@example.com");
        form.input(FieldName::Phone, "11987654321");
        form.input(FieldName::Document, "52998224725");
    }

    #[test]
    fn input_is_formatted_then_validated() {
        let mut form = form();
        let field = form.input(FieldName::Document, "52998224725").clone();
        assert_eq!(field.value, "529.982.247-25");
        assert!(field.touched);
        assert!(field.error.is_none());

        let field = form.input(FieldName::Phone, "119876").clone();
        assert_eq!(field.value, "(11) 9876");
        assert_eq!(field.error, Some(ValidationError::InvalidPhone));
    }

    #[test]
    fn touched_never_reverts() {
        let mut form = form();
        form.input(FieldName::Name, "Maria");
        form.input(FieldName::Name, "");
        let field = form.field(FieldName::Name);
        assert!(field.touched);
        assert_eq!(field.error, Some(ValidationError::Required));
        assert_eq!(field.visible_error().as_deref(), Some("O campo é obrigatório"));
    }

    #[test]
    fn error_clears_when_value_is_fixed() {
        let mut form = form();
        form.input(FieldName::Email, "maria");
        assert_eq!(form.field(FieldName::Email).error, Some(ValidationError::InvalidEmail));
        form.input(FieldName::Email, "maria@example.com");
        assert!(form.field(FieldName::Email).error.is_none());
    }

    #[test]
    fn payment_section_waits_for_every_contact_field() {
        let mut form = form();
        form.input(FieldName::Name, "Maria Silva");
        form.input(FieldName::Email, "maria@example.com");
        form.input(FieldName::EmailConfirm, "maria@example.com");
        form.input(FieldName::Phone, "11987654321");
        assert!(!form.payment_visible());

        form.input(FieldName::Document, "52998224724");
        assert!(!form.payment_visible());

        form.input(FieldName::Document, "52998224725");
        assert!(form.payment_visible());

        form.input(FieldName::Phone, "1198765");
        assert!(!form.payment_visible());
    }

    #[test]
    fn confirmation_not_rechecked_when_email_changes() {
        let mut form = form();
        fill_contact(&mut form);
        form.input(FieldName::Email, "other@example.com");
        // The confirmation keeps its earlier verdict until it is edited itself
        assert!(form.field(FieldName::EmailConfirm).error.is_none());
        form.input(FieldName::EmailConfirm, "maria@example.com");
        assert_eq!(
            form.field(FieldName::EmailConfirm).error,
            Some(ValidationError::EmailMismatch)
        );
    }

    #[test]
    fn card_brand_follows_card_number() {
        let mut form = form();
        assert_eq!(form.card_brand(), CardBrand::Unknown);
        form.input(FieldName::CardNumber, "4539148803436467");
        assert_eq!(form.field(FieldName::CardNumber).value, "4539 1488 0343 6467");
        assert_eq!(form.card_brand(), CardBrand::Visa);
        form.input(FieldName::CardNumber, "3782");
        assert_eq!(form.card_brand(), CardBrand::Amex);
        assert_eq!(
            form.field(FieldName::CardNumber).error,
            Some(ValidationError::InvalidCardNumber)
        );
    }

    #[test]
    fn expiry_uses_injected_clock() {
        let mut form = form();
        form.input(FieldName::CardExpiry, "0524");
        assert_eq!(form.field(FieldName::CardExpiry).error, Some(ValidationError::Expired));
        form.input(FieldName::CardExpiry, "0624");
        assert!(form.field(FieldName::CardExpiry).error.is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = form();
        fill_contact(&mut form);
        form.reset();
        assert_eq!(form.state(), &FormState::new());
    }
}
