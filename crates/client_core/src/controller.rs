//! Request lifecycle: form edits, guarded submission, and response intake.
//!
//! `LifecycleController` is the only writer of `LifecycleState`; presentation
//! code gets `&LifecycleState` and reads through its getters.

use shared::{
    domain::{FormField, RawFormValues},
    protocol::{Prediction, PredictionRequest},
    validation::{build_payload, ValidationErrors},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{PredictionError, PredictionService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct LifecycleState {
    values: RawFormValues,
    errors: ValidationErrors,
    in_flight: bool,
    prediction: Option<Prediction>,
    error_message: Option<String>,
}

impl LifecycleState {
    pub fn values(&self) -> &RawFormValues {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.in_flight
    }

    pub fn phase(&self) -> LifecyclePhase {
        if self.in_flight {
            LifecyclePhase::Submitting
        } else if self.error_message.is_some() {
            LifecyclePhase::Failed
        } else if self.prediction.is_some() {
            LifecyclePhase::Succeeded
        } else {
            LifecyclePhase::Idle
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitRejected {
    #[error("a prediction request is already in flight")]
    InFlight,
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(ValidationErrors),
}

/// Handle for the one outstanding request. `generation` must be handed back
/// to `complete`.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub generation: u64,
    pub request: PredictionRequest,
}

#[derive(Debug, Default)]
pub struct LifecycleController {
    state: LifecycleState,
    generation: u64,
    outstanding: Option<u64>,
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.state.values.set(field, value);
    }

    /// Validates the current form and, if it is clean, moves to `Submitting`.
    ///
    /// Rejected submissions never produce a request. An invalid form keeps
    /// the current phase and publishes the errors for display.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitRejected> {
        if self.state.in_flight {
            debug!("submit ignored while a request is in flight");
            return Err(SubmitRejected::InFlight);
        }

        let request = match build_payload(&self.state.values) {
            Ok(request) => request,
            Err(errors) => {
                info!(invalid_fields = errors.len(), "submit blocked by validation");
                self.state.errors = errors.clone();
                return Err(SubmitRejected::Invalid(errors));
            }
        };

        self.generation += 1;
        self.outstanding = Some(self.generation);
        self.state.errors = ValidationErrors::default();
        self.state.prediction = None;
        self.state.error_message = None;
        self.state.in_flight = true;
        info!(generation = self.generation, "prediction request submitted");

        Ok(SubmitTicket {
            generation: self.generation,
            request,
        })
    }

    /// Records the outcome of the request issued under `generation`.
    ///
    /// Returns `false` and leaves state untouched when that request is no
    /// longer outstanding (superseded by a reset).
    pub fn complete(
        &mut self,
        generation: u64,
        outcome: Result<Prediction, PredictionError>,
    ) -> bool {
        if self.outstanding != Some(generation) {
            debug!(
                generation,
                current = self.generation,
                "dropping stale prediction response"
            );
            return false;
        }

        self.outstanding = None;
        self.state.in_flight = false;
        match outcome {
            Ok(prediction) => {
                info!(price = prediction.predicted_price, "prediction succeeded");
                self.state.prediction = Some(prediction);
                self.state.error_message = None;
            }
            Err(err) => {
                let message = err.user_message();
                warn!(error = %message, "prediction failed");
                self.state.error_message = Some(message);
                self.state.prediction = None;
            }
        }
        true
    }

    pub async fn submit<S>(&mut self, service: &S) -> Result<LifecyclePhase, SubmitRejected>
    where
        S: PredictionService + ?Sized,
    {
        let ticket = self.begin_submit()?;
        let outcome = service.predict(&ticket.request).await;
        self.complete(ticket.generation, outcome);
        Ok(self.state.phase())
    }

    /// Back to an empty `Idle` form from any phase. Any outstanding request
    /// becomes stale.
    pub fn reset(&mut self) {
        if self.outstanding.take().is_some() {
            debug!(generation = self.generation, "reset abandoned in-flight request");
        }
        self.state = LifecycleState::default();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
