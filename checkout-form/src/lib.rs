//! Checkout form engine
//!
//! Input masks, field validation, payment-section visibility and the
//! submission lifecycle for the checkout page. Rendering is left to the
//! caller; records are handed off through a [`CheckoutGateway`].

pub mod brand;
pub mod checksum;
pub mod error;
pub mod form;
pub mod format;
pub mod gateway;
pub mod session;
pub mod submission;
pub mod types;
pub mod validate;

pub use brand::CardBrand;
pub use error::{ConfigurationError, SubmissionError, ValidationError};
pub use form::{CheckoutForm, Clock, FixedClock, SystemClock};
pub use gateway::{GatewayConfig, HttpGateway};
pub use session::CheckoutSession;
pub use submission::{
    CheckoutGateway, SubmissionMachine, SubmissionState, SubmissionStatus, TimedTransition,
    TIMED_TRANSITIONS,
};
pub use types::{CheckoutPayload, FieldName, FieldState, FormState, PaymentMethod, SubmitResponse};
pub use validate::{ValidationContext, Validator, ValidatorRegistry};
