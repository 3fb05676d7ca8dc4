use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::models::{LeadForm, SubmissionReceipt, SubmissionState};

pub const THANK_YOU_MESSAGE: &str =
    "פרטיך התקבלו בהצלחה. נציג יצור איתך קשר בהקדם כדי לתאם שיעור ניסיון.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeadError {
    #[error("cannot {action} a submission that is {from:?}")]
    InvalidTransition {
        from: SubmissionState,
        action: &'static str,
    },
}

/// Lifecycle of one registration form: Idle -> Submitting -> Submitted -> Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadSubmission {
    state: SubmissionState,
}

impl Default for LeadSubmission {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadSubmission {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn begin(&mut self) -> Result<(), LeadError> {
        self.transition(SubmissionState::Idle, SubmissionState::Submitting, "begin")
    }

    pub fn finish(&mut self) -> Result<(), LeadError> {
        self.transition(
            SubmissionState::Submitting,
            SubmissionState::Submitted,
            "finish",
        )
    }

    /// Back to an empty form after a successful submission.
    pub fn reset(&mut self) -> Result<(), LeadError> {
        self.transition(SubmissionState::Submitted, SubmissionState::Idle, "reset")
    }

    fn transition(
        &mut self,
        expected: SubmissionState,
        next: SubmissionState,
        action: &'static str,
    ) -> Result<(), LeadError> {
        if self.state != expected {
            return Err(LeadError::InvalidTransition {
                from: self.state,
                action,
            });
        }
        self.state = next;
        Ok(())
    }
}

/// Accepts trial-class registrations. Nothing is stored or forwarded; the
/// desk only logs the lead after a simulated round trip.
#[derive(Clone, Debug)]
pub struct LeadDesk {
    delay: Duration,
}

impl LeadDesk {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn submit(&self, lead: &LeadForm) -> Result<SubmissionReceipt, LeadError> {
        let mut submission = LeadSubmission::new();
        submission.begin()?;

        info!(
            name = %lead.name,
            branch = lead.branch.map(|b| b.as_str()).unwrap_or("any"),
            training_type = lead.training_type.map(|t| t.as_str()).unwrap_or("any"),
            "trial class registration received"
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        submission.finish()?;
        Ok(SubmissionReceipt {
            state: submission.state(),
            message: THANK_YOU_MESSAGE.to_string(),
        })
    }
}
