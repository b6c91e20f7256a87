//! Recovery wizard state machine
//!
//! The machine is synchronous. Every step action is split in two:
//! `begin_*` validates the step's input and marks the action in flight, and
//! [`RecoveryMachine::complete`] applies the backend's answer. Whoever drives
//! the machine performs the round trip in between.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::RecoverySettings;
use crate::error::{RemoteRejection, ShipdeskError, ShipdeskResult};
use crate::validation::{self, ValidationError};

use super::backend::{ActionKind, PendingAction};
use super::notice::Notice;
use super::step::{Field, PasswordField, Step, StepState};

/// Message raised after a successful resend
pub const CODE_SENT_NOTICE: &str = "verification code sent";

/// Validation limits applied by the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryRules {
    pub code_length: usize,
    pub min_password_length: usize,
    pub notice_duration: Duration,
}

impl Default for RecoveryRules {
    fn default() -> Self {
        Self::from(&RecoverySettings::default())
    }
}

impl From<&RecoverySettings> for RecoveryRules {
    fn from(settings: &RecoverySettings) -> Self {
        Self {
            code_length: settings.code_length,
            min_password_length: settings.min_password_length,
            notice_duration: settings.notice_duration(),
        }
    }
}

/// The error currently shown on the active step
#[derive(Debug, Clone, PartialEq, Eq)]
struct StepError {
    message: String,
    fields: &'static [Field],
}

fn validation_fields(err: &ValidationError) -> &'static [Field] {
    match err {
        ValidationError::EmailRequired | ValidationError::InvalidEmail => &[Field::Email],
        ValidationError::MalformedCode { .. } => &[Field::Code],
        ValidationError::PasswordTooShort { .. } => &[Field::NewPassword],
        ValidationError::PasswordMismatch => &[Field::NewPassword, Field::ConfirmPassword],
        ValidationError::MissingRequiredFields | ValidationError::InvalidWeight => &[],
    }
}

fn rejection_fields(kind: ActionKind) -> &'static [Field] {
    match kind {
        ActionKind::SendCode => &[Field::Email],
        ActionKind::ResendCode | ActionKind::VerifyCode => &[Field::Code],
        ActionKind::ResetPassword => &[Field::NewPassword, Field::ConfirmPassword],
    }
}

/// State of one mounted password recovery wizard
#[derive(Debug)]
pub struct RecoveryMachine {
    rules: RecoveryRules,
    state: StepState,
    email: Option<String>,
    in_flight: Option<ActionKind>,
    error: Option<StepError>,
    notice: Option<Notice>,
}

impl Default for RecoveryMachine {
    fn default() -> Self {
        Self::new(RecoveryRules::default())
    }
}

impl RecoveryMachine {
    /// Create a machine on the first step
    pub fn new(rules: RecoveryRules) -> Self {
        Self {
            rules,
            state: StepState::initial(),
            email: None,
            in_flight: None,
            error: None,
            notice: None,
        }
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    pub fn state(&self) -> &StepState {
        &self.state
    }

    /// The confirmed email address, once the first step has succeeded
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The action currently awaiting its backend answer
    pub fn in_flight(&self) -> Option<ActionKind> {
        self.in_flight
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    /// The transient notice, if one is raised and not yet expired
    pub fn notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| !n.is_expired())
            .map(|n| n.message.as_str())
    }

    /// When the current notice disappears
    pub fn notice_deadline(&self) -> Option<Instant> {
        self.notice.as_ref().map(Notice::deadline)
    }

    /// Drop the notice once it has expired
    pub fn expire_notice(&mut self) -> bool {
        if self.notice.as_ref().is_some_and(Notice::is_expired) {
            self.notice = None;
            return true;
        }
        false
    }

    pub fn is_password_visible(&self, which: PasswordField) -> bool {
        self.state.is_password_visible(which)
    }

    /// Replace the value of an input on the active step
    ///
    /// Clears the step error if the error concerns this input.
    pub fn input(&mut self, field: Field, value: impl Into<String>) -> ShipdeskResult<()> {
        self.ensure_idle()?;
        let step = self.step();
        let value = value.into();
        match (&mut self.state, field) {
            (StepState::EmailEntry { email }, Field::Email) => *email = value,
            (StepState::CodeVerification { code }, Field::Code) => *code = value,
            (StepState::PasswordReset { new_password, .. }, Field::NewPassword) => {
                new_password.set(value)
            }
            (StepState::PasswordReset { confirm_password, .. }, Field::ConfirmPassword) => {
                confirm_password.set(value)
            }
            _ => return Err(ShipdeskError::wrong_step("edit this field", step.name())),
        }

        if self.error.as_ref().is_some_and(|e| e.fields.contains(&field)) {
            debug!(?field, "input changed, clearing step error");
            self.error = None;
        }
        Ok(())
    }

    /// Show or hide one of the password inputs
    ///
    /// Allowed while loading; it has no effect on validation.
    pub fn toggle_password_visibility(&mut self, which: PasswordField) -> ShipdeskResult<bool> {
        let step = self.step();
        match (&mut self.state, which) {
            (StepState::PasswordReset { new_password, .. }, PasswordField::New) => {
                Ok(new_password.toggle_visibility())
            }
            (StepState::PasswordReset { confirm_password, .. }, PasswordField::Confirm) => {
                Ok(confirm_password.toggle_visibility())
            }
            _ => Err(ShipdeskError::wrong_step("toggle password visibility", step.name())),
        }
    }

    /// Validate the email input and start sending the code
    pub fn begin_submit_email(&mut self) -> ShipdeskResult<PendingAction> {
        self.ensure_idle()?;
        let email = match &self.state {
            StepState::EmailEntry { email } => email.trim().to_string(),
            _ => return Err(self.wrong_step("submit email")),
        };
        self.check(validation::validate_email(&email))?;
        Ok(self.start(PendingAction::SendCode { email }))
    }

    /// Validate the code format and start checking it
    pub fn begin_verify_code(&mut self) -> ShipdeskResult<PendingAction> {
        self.ensure_idle()?;
        let code = match &self.state {
            StepState::CodeVerification { code } => code.clone(),
            _ => return Err(self.wrong_step("verify code")),
        };
        self.check(validation::validate_code(&code, self.rules.code_length))?;
        Ok(self.start(PendingAction::VerifyCode {
            email: self.confirmed_email(),
            code,
        }))
    }

    /// Start sending another code to the confirmed address
    pub fn begin_resend_code(&mut self) -> ShipdeskResult<PendingAction> {
        self.ensure_idle()?;
        if self.step() != Step::CodeVerification {
            return Err(self.wrong_step("resend code"));
        }
        Ok(self.start(PendingAction::ResendCode {
            email: self.confirmed_email(),
        }))
    }

    /// Validate both password inputs and start storing the new password
    pub fn begin_reset_password(&mut self) -> ShipdeskResult<PendingAction> {
        self.ensure_idle()?;
        let (result, new_password) = match &self.state {
            StepState::PasswordReset {
                new_password,
                confirm_password,
            } => (
                validation::validate_new_password(
                    new_password.expose(),
                    confirm_password.expose(),
                    self.rules.min_password_length,
                ),
                new_password.to_zeroizing(),
            ),
            _ => return Err(self.wrong_step("reset password")),
        };
        self.check(result)?;
        Ok(self.start(PendingAction::ResetPassword {
            email: self.confirmed_email(),
            new_password,
        }))
    }

    /// Apply the backend's answer to the action in flight
    ///
    /// Returns the step the machine is on afterwards. A rejection becomes the
    /// step error and is also returned.
    pub fn complete(
        &mut self,
        action: PendingAction,
        outcome: Result<(), RemoteRejection>,
    ) -> ShipdeskResult<Step> {
        let kind = action.kind();
        if self.in_flight != Some(kind) {
            return Err(self.wrong_step("complete an action that is not in flight"));
        }
        self.in_flight = None;

        if let Err(rejection) = outcome {
            warn!(?kind, reason = rejection.message(), "action rejected");
            self.error = Some(StepError {
                message: rejection.message().to_string(),
                fields: rejection_fields(kind),
            });
            return Err(rejection.into());
        }

        match action {
            PendingAction::SendCode { email } => {
                self.email = Some(email);
                self.advance(StepState::code_verification());
            }
            PendingAction::ResendCode { .. } => {
                info!("verification code re-sent");
                self.notice = Some(Notice::new(CODE_SENT_NOTICE, self.rules.notice_duration));
            }
            PendingAction::VerifyCode { .. } => self.advance(StepState::password_reset()),
            PendingAction::ResetPassword { .. } => self.advance(StepState::Success),
        }
        Ok(self.step())
    }

    /// Drop the action in flight without an outcome
    ///
    /// Used when the caller stops awaiting the round trip. The step and its
    /// inputs stay as they were, so the action can be retried.
    pub fn abandon(&mut self, kind: ActionKind) -> bool {
        if self.in_flight != Some(kind) {
            return false;
        }
        warn!(?kind, "action abandoned before completion");
        self.in_flight = None;
        true
    }

    /// Route to navigate to when leaving from the success step
    pub fn login_route(&self) -> ShipdeskResult<&'static str> {
        if !self.step().is_terminal() {
            return Err(self.wrong_step("go to login"));
        }
        Ok(crate::navigation::LOGIN_ROUTE)
    }

    fn ensure_idle(&self) -> ShipdeskResult<()> {
        if let Some(kind) = self.in_flight {
            debug!(?kind, "ignoring input while an action is in flight");
            return Err(ShipdeskError::Busy);
        }
        Ok(())
    }

    fn wrong_step(&self, action: &'static str) -> ShipdeskError {
        ShipdeskError::wrong_step(action, self.step().name())
    }

    /// Record a failed validation as the step error
    fn check(&mut self, result: Result<(), ValidationError>) -> ShipdeskResult<()> {
        self.error = None;
        if let Err(err) = result {
            debug!(step = %self.step(), error = %err, "validation failed");
            self.error = Some(StepError {
                message: err.to_string(),
                fields: validation_fields(&err),
            });
            return Err(err.into());
        }
        Ok(())
    }

    fn start(&mut self, action: PendingAction) -> PendingAction {
        self.error = None;
        self.notice = None;
        self.in_flight = Some(action.kind());
        debug!(kind = ?action.kind(), "action started");
        action
    }

    fn confirmed_email(&self) -> String {
        self.email.clone().unwrap_or_default()
    }

    fn advance(&mut self, next: StepState) {
        let from = self.step();
        debug_assert!(next.step() > from, "recovery steps only move forward");
        self.state = next;
        self.error = None;
        self.notice = None;
        info!(%from, to = %self.step(), "recovery wizard advanced");
    }
}
