//! Field validation rules.
//!
//! Each field maps to one [`Validator`] in a [`ValidatorRegistry`]. The
//! required-field rule runs first for every field; the field's own rule only
//! sees non-blank input.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use crate::checksum::{is_valid_card_number, is_valid_cpf};
use crate::error::ValidationError;
use crate::format::digits;
use crate::types::FieldName;

/// Longest accepted full name
pub const NAME_MAX_LEN: usize = 50;

/// Values a rule may consult besides the field being validated
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Current value of the email field
    pub email: &'a str,
    /// Date expiry is checked against
    pub today: NaiveDate,
}

/// A single field rule
pub trait Validator: Send + Sync {
    fn validate(&self, value: &str, ctx: &ValidationContext<'_>) -> Result<(), ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&str, &ValidationContext<'_>) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, value: &str, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        self(value, ctx)
    }
}

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required);
    }
    Ok(())
}

pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > NAME_MAX_LEN {
        return Err(ValidationError::NameTooLong { max: NAME_MAX_LEN });
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !value.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_email_confirm(value: &str, email: &str) -> Result<(), ValidationError> {
    if value != email {
        return Err(ValidationError::EmailMismatch);
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if digits(value).len() != 11 {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    if !is_valid_cpf(value) {
        return Err(ValidationError::InvalidCpf);
    }
    Ok(())
}

pub fn validate_card_number(value: &str) -> Result<(), ValidationError> {
    if !is_valid_card_number(value) {
        return Err(ValidationError::InvalidCardNumber);
    }
    Ok(())
}

/// Check an `MM/YY` expiry against `today`. The card is valid through its
/// expiry month.
pub fn validate_expiry(value: &str, today: NaiveDate) -> Result<(), ValidationError> {
    let (month, year) = value
        .split_once('/')
        .ok_or(ValidationError::MalformedExpiry)?;
    let two_digits = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return Err(ValidationError::MalformedExpiry);
    }
    let month: u32 = month.parse().map_err(|_| ValidationError::MalformedExpiry)?;
    let year: u32 = year.parse().map_err(|_| ValidationError::MalformedExpiry)?;

    if !(1..=12).contains(&month) {
        return Err(ValidationError::InvalidMonth);
    }
    let current = ((today.year().rem_euclid(100)) as u32, today.month());
    if (year, month) < current {
        return Err(ValidationError::Expired);
    }
    Ok(())
}

/// Field name to rule mapping
pub struct ValidatorRegistry {
    rules: HashMap<FieldName, Box<dyn Validator>>,
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_fn(FieldName::Name, |v, _| validate_name(v));
        registry.register_fn(FieldName::Email, |v, _| validate_email(v));
        registry.register_fn(FieldName::EmailConfirm, |v, ctx| validate_email_confirm(v, ctx.email));
        registry.register_fn(FieldName::Phone, |v, _| validate_phone(v));
        registry.register_fn(FieldName::Document, |v, _| validate_cpf(v));
        registry.register_fn(FieldName::CardNumber, |v, _| validate_card_number(v));
        registry.register_fn(FieldName::CardExpiry, |v, ctx| validate_expiry(v, ctx.today));
        registry
    }
}

impl ValidatorRegistry {
    /// Registry with no field-specific rules; only the required rule applies
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Install or replace the rule for `field`
    pub fn register<V>(&mut self, field: FieldName, validator: V)
    where
        V: Validator + 'static,
    {
        self.rules.insert(field, Box::new(validator));
    }

    /// Install or replace the rule for `field` from a closure
    pub fn register_fn<F>(&mut self, field: FieldName, rule: F)
    where
        F: Fn(&str, &ValidationContext<'_>) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.register(field, rule);
    }

    /// Run the required rule, then the field's own rule if one is registered
    pub fn validate(
        &self,
        field: FieldName,
        value: &str,
        ctx: &ValidationContext<'_>,
    ) -> Result<(), ValidationError> {
        validate_required(value)?;
        match self.rules.get(&field) {
            Some(rule) => rule.validate(value, ctx),
            None => Ok(()),
        }
    }
}
