//! Error taxonomy for the checkout flow.
//!
//! - [`ValidationError`]: one field, shown inline, never blocks other fields
//! - [`SubmissionError`]: the record could not be handed off; the user may resubmit
//! - [`ConfigurationError`]: missing or malformed settings, fatal at startup

/// Field-level validation failure. `Display` yields the message shown under the field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("O campo é obrigatório")]
    Required,
    #[error("O nome deve ter no máximo {max} caracteres")]
    NameTooLong { max: usize },
    #[error("Email inválido")]
    InvalidEmail,
    #[error("Os emails não coincidem")]
    EmailMismatch,
    #[error("Número de telefone inválido")]
    InvalidPhone,
    #[error("CPF inválido")]
    InvalidCpf,
    #[error("Número de cartão inválido")]
    InvalidCardNumber,
    #[error("Data de validade inválida")]
    MalformedExpiry,
    #[error("Mês inválido")]
    InvalidMonth,
    #[error("Data de validade expirada")]
    Expired,
}

/// Failure while submitting a completed form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// Contact fields are incomplete, so the payment section is hidden
    #[error("form is not ready for submission")]
    NotReady,
    /// A submission is already in flight or its confirmation is still showing
    #[error("a submission is already in progress")]
    Busy,
    /// The record sink rejected the record. The message is shown verbatim.
    #[error("{0}")]
    Rejected(String),
    /// The endpoint could not be reached or answered with something unreadable
    #[error("{0}")]
    Transport(String),
}

impl SubmissionError {
    /// Message surfaced to the user
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Missing or invalid configuration for a gateway or record sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{0} environment variable is required")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}
