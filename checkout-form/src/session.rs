//! A form session: one form plus the one submission machine that owns its
//! lifecycle. Dropping the session cancels any pending timed steps.

use crate::error::SubmissionError;
use crate::form::CheckoutForm;
use crate::submission::{CheckoutGateway, SubmissionMachine, SubmissionStatus};
use crate::types::{FieldName, FieldState, PaymentMethod};

pub struct CheckoutSession<G> {
    form: CheckoutForm,
    machine: SubmissionMachine<G>,
    payment_method: PaymentMethod,
}

impl<G: CheckoutGateway> CheckoutSession<G> {
    pub fn new(form: CheckoutForm, gateway: G) -> Self {
        Self {
            form,
            machine: SubmissionMachine::new(gateway),
            payment_method: PaymentMethod::default(),
        }
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    pub fn machine(&self) -> &SubmissionMachine<G> {
        &self.machine
    }

    pub fn input(&mut self, field: FieldName, raw: &str) -> &FieldState {
        self.form.input(field, raw)
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Submit button state: enabled only while the payment section is
    /// shown and nothing is in flight
    pub fn submit_enabled(&self) -> bool {
        self.form.payment_visible() && self.machine.status().can_submit()
    }

    pub async fn submit(&self) -> Result<(), SubmissionError> {
        self.machine
            .submit(self.form.state(), self.payment_method)
            .await
    }

    pub fn status(&self) -> SubmissionStatus {
        self.machine.status()
    }

    /// Leave the confirmation and start over with an empty form
    pub fn finish(&mut self) -> bool {
        if !self.machine.finish() {
            return false;
        }
        self.form.reset();
        self.payment_method = PaymentMethod::default();
        true
    }
}
