//! Submission lifecycle.
//!
//! ```text
//! Idle --submit--> Processing --ok--> Success(0) --3000ms--> Success(1)
//!                      |                                         |
//!                      +--err--> Idle                        1500ms
//!                                                                v
//!          Idle <--finish-- Redirecting(2) <---------------------+
//! ```
//!
//! The only suspending step is the gateway call. Timed steps run on a
//! background task that is aborted when the machine is dropped.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::SubmissionError;
use crate::types::{CheckoutPayload, FormState, PaymentMethod};

/// Lifecycle phase of a form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionState {
    Idle,
    Processing,
    Success,
    Redirecting,
}

/// Snapshot published to observers on every transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionStatus {
    pub state: SubmissionState,
    /// UI sequencing counter, 0 to 2
    pub animation_step: u8,
    /// Message from the last failed attempt, cleared on the next submit
    pub error: Option<String>,
}

impl SubmissionStatus {
    fn idle() -> Self {
        Self {
            state: SubmissionState::Idle,
            animation_step: 0,
            error: None,
        }
    }

    fn at(state: SubmissionState, animation_step: u8) -> Self {
        Self {
            state,
            animation_step,
            error: None,
        }
    }

    /// Whether the submit button accepts clicks
    pub fn can_submit(&self) -> bool {
        self.state == SubmissionState::Idle
    }

    /// The `Redirecting` phase is the terminal confirmation
    pub fn is_confirmed(&self) -> bool {
        self.state == SubmissionState::Redirecting
    }
}

/// One row of the timed-transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedTransition {
    pub from: (SubmissionState, u8),
    pub delay: Duration,
    pub to: (SubmissionState, u8),
}

/// Steps taken after the gateway accepts a record
pub const TIMED_TRANSITIONS: [TimedTransition; 2] = [
    TimedTransition {
        from: (SubmissionState::Success, 0),
        delay: Duration::from_millis(3000),
        to: (SubmissionState::Success, 1),
    },
    TimedTransition {
        from: (SubmissionState::Success, 1),
        delay: Duration::from_millis(1500),
        to: (SubmissionState::Redirecting, 2),
    },
];

/// Where a completed form is sent
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn submit(&self, payload: &CheckoutPayload) -> Result<(), SubmissionError>;
}

#[async_trait]
impl<G: CheckoutGateway + ?Sized> CheckoutGateway for Arc<G> {
    async fn submit(&self, payload: &CheckoutPayload) -> Result<(), SubmissionError> {
        (**self).submit(payload).await
    }
}

/// Drives one form session's submissions
pub struct SubmissionMachine<G> {
    gateway: G,
    status: Arc<watch::Sender<SubmissionStatus>>,
    transitions: Vec<TimedTransition>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<G: CheckoutGateway> SubmissionMachine<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_transitions(gateway, TIMED_TRANSITIONS.to_vec())
    }

    pub fn with_transitions(gateway: G, transitions: Vec<TimedTransition>) -> Self {
        let (status, _) = watch::channel(SubmissionStatus::idle());
        Self {
            gateway,
            status: Arc::new(status),
            transitions,
            timer: Mutex::new(None),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    /// Submit the payment fields of `form`.
    ///
    /// Legal only from `Idle` with the payment section visible. Contact
    /// fields gate submission; payment fields are sent as entered.
    pub async fn submit(
        &self,
        form: &FormState,
        payment_method: PaymentMethod,
    ) -> Result<(), SubmissionError> {
        if !form.payment_visible() {
            return Err(SubmissionError::NotReady);
        }
        let claimed = self.status.send_if_modified(|status| {
            if status.state != SubmissionState::Idle {
                return false;
            }
            *status = SubmissionStatus::at(SubmissionState::Processing, 0);
            true
        });
        if !claimed {
            return Err(SubmissionError::Busy);
        }

        let payload = form.to_payload(payment_method);
        tracing::debug!(?payload, "submitting checkout");

        match self.gateway.submit(&payload).await {
            Ok(()) => {
                tracing::info!("checkout accepted");
                self.status
                    .send_replace(SubmissionStatus::at(SubmissionState::Success, 0));
                self.arm_timers();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "checkout rejected");
                self.status.send_replace(SubmissionStatus {
                    state: SubmissionState::Idle,
                    animation_step: 0,
                    error: Some(e.user_message()),
                });
                Err(e)
            }
        }
    }

    /// Leave the confirmation and return to a fresh `Idle`.
    /// Returns false if the confirmation was not reached yet.
    pub fn finish(&self) -> bool {
        let done = self.status.send_if_modified(|status| {
            if status.state != SubmissionState::Redirecting {
                return false;
            }
            *status = SubmissionStatus::idle();
            true
        });
        if done {
            self.cancel_timers();
        }
        done
    }

    fn arm_timers(&self) {
        let status = Arc::clone(&self.status);
        let transitions = self.transitions.clone();
        let handle = tokio::spawn(async move {
            for step in transitions {
                tokio::time::sleep(step.delay).await;
                let advanced = status.send_if_modified(|current| {
                    if (current.state, current.animation_step) != step.from {
                        return false;
                    }
                    *current = SubmissionStatus::at(step.to.0, step.to.1);
                    true
                });
                if !advanced {
                    break;
                }
                tracing::trace!(state = ?step.to.0, step = step.to.1, "timed transition");
            }
        });
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(previous) = timer.replace(handle) {
                previous.abort();
            }
        }
    }

    fn cancel_timers(&self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}

impl<G> Drop for SubmissionMachine<G> {
    fn drop(&mut self) {
        if let Ok(timer) = self.timer.get_mut() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}
