//! Shipment creation wizard
//!
//! Like the recovery machine, submission is split into
//! [`ShipmentWizard::begin_submit`] and [`ShipmentWizard::complete_submit`] so
//! the round trip can be driven from outside; [`ShipmentWizard::submit`] does
//! both against a backend.

use tracing::{debug, info, warn};

use crate::error::{RemoteRejection, ShipdeskError, ShipdeskResult};

use super::backend::ShipmentBackend;
use super::draft::{ShipmentDraft, ShipmentField, ShipmentReceipt, ShipmentRequest};
use super::step::ShipmentStep;

/// State of one shipment being created
#[derive(Debug, Default)]
pub struct ShipmentWizard {
    step: ShipmentStep,
    draft: ShipmentDraft,
    error: Option<String>,
    submitting: bool,
    receipt: Option<ShipmentReceipt>,
}

impl ShipmentWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> ShipmentStep {
        self.step
    }

    pub fn draft(&self) -> &ShipmentDraft {
        &self.draft
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The receipt, once the shipment was accepted
    pub fn receipt(&self) -> Option<&ShipmentReceipt> {
        self.receipt.as_ref()
    }

    pub fn set_field(
        &mut self,
        field: ShipmentField,
        value: impl Into<String>,
    ) -> ShipdeskResult<()> {
        self.ensure_idle()?;
        if field.step() != self.step {
            return Err(ShipdeskError::wrong_step("edit this field", self.step.title()));
        }
        self.draft.set(field, value.into());
        if self.error.take().is_some() {
            debug!(?field, "input changed, clearing step error");
        }
        Ok(())
    }

    /// Validate the current step and move to the next one
    pub fn next(&mut self) -> ShipdeskResult<ShipmentStep> {
        self.ensure_idle()?;
        let Some(next) = self.step.next() else {
            return Err(ShipdeskError::wrong_step("continue", self.step.title()));
        };
        if let Err(err) = self.draft.validate_step(self.step) {
            self.error = Some(err.to_string());
            return Err(err.into());
        }
        self.move_to(next);
        Ok(next)
    }

    pub fn back(&mut self) -> ShipdeskResult<ShipmentStep> {
        self.ensure_idle()?;
        let Some(previous) = self.step.previous() else {
            return Err(ShipdeskError::wrong_step("go back", self.step.title()));
        };
        self.move_to(previous);
        Ok(previous)
    }

    /// Validate the whole draft and mark the submission in flight
    pub fn begin_submit(&mut self) -> ShipdeskResult<ShipmentRequest> {
        self.ensure_idle()?;
        if self.step != ShipmentStep::Confirm {
            return Err(ShipdeskError::wrong_step("submit", self.step.title()));
        }
        let request = match self.draft.to_request() {
            Ok(request) => request,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err.into());
            }
        };
        self.error = None;
        self.submitting = true;
        debug!("shipment submission started");
        Ok(request)
    }

    /// Apply the backend's answer to a submission started with `begin_submit`
    pub fn complete_submit(
        &mut self,
        outcome: Result<ShipmentReceipt, RemoteRejection>,
    ) -> ShipdeskResult<&ShipmentReceipt> {
        if !self.submitting {
            return Err(ShipdeskError::wrong_step("complete a submission", self.step.title()));
        }
        self.submitting = false;
        match outcome {
            Ok(receipt) => {
                info!(tracking = %receipt.tracking_number, "shipment submitted");
                self.move_to(ShipmentStep::Submitted);
                Ok(&*self.receipt.insert(receipt))
            }
            Err(rejection) => {
                warn!(reason = rejection.message(), "shipment rejected");
                self.error = Some(format!("failed to submit shipment: {rejection}"));
                Err(rejection.into())
            }
        }
    }

    pub async fn submit(
        &mut self,
        backend: &dyn ShipmentBackend,
    ) -> ShipdeskResult<&ShipmentReceipt> {
        let request = self.begin_submit()?;
        let guard = SubmitGuard {
            wizard: Some(self),
        };
        let outcome = backend.submit(&request).await;
        guard.complete(outcome)
    }

    /// Forget a submission whose answer will never arrive
    pub fn abandon_submit(&mut self) -> bool {
        if !self.submitting {
            return false;
        }
        warn!("shipment submission abandoned before completion");
        self.submitting = false;
        true
    }

    fn ensure_idle(&self) -> ShipdeskResult<()> {
        if self.submitting {
            debug!("ignoring shipment input while submitting");
            return Err(ShipdeskError::Busy);
        }
        Ok(())
    }

    fn move_to(&mut self, step: ShipmentStep) {
        info!(from = %self.step, to = %step, "shipment step changed");
        self.step = step;
        self.error = None;
    }
}

/// Clears `submitting` if the submission is dropped before it completes
struct SubmitGuard<'a> {
    wizard: Option<&'a mut ShipmentWizard>,
}

impl<'a> SubmitGuard<'a> {
    fn complete(
        mut self,
        outcome: Result<ShipmentReceipt, RemoteRejection>,
    ) -> ShipdeskResult<&'a ShipmentReceipt> {
        match self.wizard.take() {
            Some(wizard) => wizard.complete_submit(outcome),
            None => Err(ShipdeskError::wrong_step("complete a submission", "confirm")),
        }
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if let Some(wizard) = self.wizard.take() {
            wizard.abandon_submit();
        }
    }
}
