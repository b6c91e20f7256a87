//! Mounted recovery wizard
//!
//! [`RecoveryWizard`] binds a [`RecoveryMachine`] to a backend and a
//! navigator and runs each step action to completion. Mounting creates a fresh
//! state; dropping the wizard is the unmount and releases everything,
//! zeroing any password still held.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span, Instrument};

use crate::config::RecoverySettings;
use crate::error::{RemoteRejection, ShipdeskResult};
use crate::models::SessionId;
use crate::navigation::Navigator;

use super::backend::{ActionKind, PendingAction, RecoveryBackend};
use super::machine::{RecoveryMachine, RecoveryRules};
use super::step::{Field, PasswordField, Step};

/// Read-only view of the wizard for rendering
///
/// Passwords and codes are never part of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardSnapshot {
    pub step: Step,
    pub email: Option<String>,
    pub is_loading: bool,
    pub progress_label: Option<&'static str>,
    pub error_message: Option<String>,
    pub notice: Option<String>,
    pub show_new_password: bool,
    pub show_confirm_password: bool,
    /// Number of commands the driver has handled so far
    pub commands_processed: u64,
}

impl WizardSnapshot {
    fn of(machine: &RecoveryMachine) -> Self {
        Self {
            step: machine.step(),
            email: machine.email().map(str::to_owned),
            is_loading: machine.is_loading(),
            progress_label: machine.in_flight().map(|k| k.progress_label()),
            error_message: machine.error_message().map(str::to_owned),
            notice: machine.notice().map(str::to_owned),
            show_new_password: machine.is_password_visible(PasswordField::New),
            show_confirm_password: machine.is_password_visible(PasswordField::Confirm),
            commands_processed: 0,
        }
    }
}

/// A password recovery wizard mounted in a hosting shell
pub struct RecoveryWizard {
    session: SessionId,
    machine: RecoveryMachine,
    backend: Arc<dyn RecoveryBackend>,
    navigator: Arc<dyn Navigator>,
}

impl RecoveryWizard {
    /// Mount a fresh wizard on the email step
    pub fn mount(
        settings: &RecoverySettings,
        backend: Arc<dyn RecoveryBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = SessionId::new();
        info!(%session, "recovery wizard mounted");
        Self {
            session,
            machine: RecoveryMachine::new(RecoveryRules::from(settings)),
            backend,
            navigator,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn machine(&self) -> &RecoveryMachine {
        &self.machine
    }

    pub(crate) fn machine_mut(&mut self) -> &mut RecoveryMachine {
        &mut self.machine
    }

    pub(crate) fn backend(&self) -> Arc<dyn RecoveryBackend> {
        Arc::clone(&self.backend)
    }

    pub fn step(&self) -> Step {
        self.machine.step()
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot::of(&self.machine)
    }

    /// Submit `email` and wait for the code to be sent
    pub async fn submit_email(&mut self, email: &str) -> ShipdeskResult<Step> {
        self.machine.input(Field::Email, email)?;
        let action = self.machine.begin_submit_email()?;
        self.run(action).await
    }

    /// Check `code` and wait for the answer
    pub async fn verify_code(&mut self, code: &str) -> ShipdeskResult<Step> {
        self.machine.input(Field::Code, code)?;
        let action = self.machine.begin_verify_code()?;
        self.run(action).await
    }

    /// Send another code to the confirmed address
    pub async fn resend_code(&mut self) -> ShipdeskResult<Step> {
        let action = self.machine.begin_resend_code()?;
        self.run(action).await
    }

    /// Set the new password and wait for it to be stored
    pub async fn reset_password(
        &mut self,
        new_password: &str,
        confirm_password: &str,
    ) -> ShipdeskResult<Step> {
        self.machine.input(Field::NewPassword, new_password)?;
        self.machine.input(Field::ConfirmPassword, confirm_password)?;
        let action = self.machine.begin_reset_password()?;
        self.run(action).await
    }

    pub fn toggle_password_visibility(&mut self, which: PasswordField) -> ShipdeskResult<bool> {
        self.machine.toggle_password_visibility(which)
    }

    /// Leave the finished wizard for the login page
    pub fn go_to_login(&self) -> ShipdeskResult<()> {
        let route = self.machine.login_route()?;
        info!(session = %self.session, route, "navigating after recovery");
        self.navigator.navigate(route);
        Ok(())
    }

    async fn run(&mut self, action: PendingAction) -> ShipdeskResult<Step> {
        let kind = action.kind();
        let span = info_span!("recovery_action", session = %self.session, ?kind);
        let guard = InFlightGuard {
            machine: &mut self.machine,
            kind,
            armed: true,
        };
        let outcome = action.execute(&*self.backend).instrument(span).await;
        guard.complete(action, outcome)
    }
}

/// Releases the action in flight if the round trip is dropped before it
/// completes
struct InFlightGuard<'a> {
    machine: &'a mut RecoveryMachine,
    kind: ActionKind,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn complete(
        mut self,
        action: PendingAction,
        outcome: Result<(), RemoteRejection>,
    ) -> ShipdeskResult<Step> {
        self.armed = false;
        self.machine.complete(action, outcome)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.machine.abandon(self.kind);
        }
    }
}

impl Drop for RecoveryWizard {
    fn drop(&mut self) {
        info!(session = %self.session, step = %self.machine.step(), "recovery wizard unmounted");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::error::ShipdeskError;
    use crate::navigation::testing::RecordingNavigator;
    use crate::wizard::backend::testing::InstantBackend;
    use crate::wizard::backend::SimulatedRecoveryBackend;

    fn mount_simulated() -> (RecoveryWizard, RecordingNavigator) {
        let settings = RecoverySettings::default();
        let navigator = RecordingNavigator::default();
        let wizard = RecoveryWizard::mount(
            &settings,
            Arc::new(SimulatedRecoveryBackend::new(settings.clone())),
            Arc::new(navigator.clone()),
        );
        (wizard, navigator)
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_recovery_flow() {
        let (mut wizard, navigator) = mount_simulated();
        let started = Instant::now();

        assert_eq!(
            wizard.submit_email("test@example.com").await.unwrap(),
            Step::CodeVerification
        );
        assert_eq!(started.elapsed().as_millis(), 1500);
        assert_eq!(wizard.snapshot().email.as_deref(), Some("test@example.com"));

        assert_eq!(wizard.verify_code("12345").await.unwrap(), Step::PasswordReset);
        assert_eq!(
            wizard
                .reset_password("newpassword123", "newpassword123")
                .await
                .unwrap(),
            Step::Success
        );
        assert!(!wizard.snapshot().is_loading);

        wizard.go_to_login().unwrap();
        assert_eq!(navigator.routes(), vec!["/login"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_errors() {
        let (mut wizard, _) = mount_simulated();

        let err = wizard.submit_email("").await.unwrap_err();
        assert_eq!(err.to_string(), "email is required");

        let err = wizard.submit_email("invalid-email").await.unwrap_err();
        assert_eq!(err.to_string(), "please enter a valid email address");
        assert_eq!(
            wizard.snapshot().error_message.as_deref(),
            Some("please enter a valid email address")
        );
        assert_eq!(wizard.step(), Step::EmailEntry);
    }

    #[tokio::test(start_paused = true)]
    async fn test_code_errors() {
        let (mut wizard, _) = mount_simulated();
        wizard.submit_email("test@example.com").await.unwrap();

        for code in ["123", "abcde"] {
            let before = Instant::now();
            let err = wizard.verify_code(code).await.unwrap_err();
            assert!(err.is_validation());
            assert_eq!(
                err.to_string(),
                "please enter a valid 5-digit verification code"
            );
            // format errors never reach the backend
            assert_eq!(before.elapsed(), Duration::ZERO);
        }

        let before = Instant::now();
        let err = wizard.verify_code("99999").await.unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "invalid verification code");
        assert_eq!(before.elapsed().as_millis(), 1000);
        assert_eq!(wizard.step(), Step::CodeVerification);
    }

    #[tokio::test(start_paused = true)]
    async fn test_password_errors() {
        let (mut wizard, _) = mount_simulated();
        wizard.submit_email("test@example.com").await.unwrap();
        wizard.verify_code("12345").await.unwrap();

        let err = wizard.reset_password("123", "123").await.unwrap_err();
        assert_eq!(err.to_string(), "password must be at least 8 characters");

        let err = wizard
            .reset_password("newpassword123", "different123")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "passwords do not match");
        assert_eq!(wizard.step(), Step::PasswordReset);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resend_notice_expires() {
        let (mut wizard, _) = mount_simulated();
        wizard.submit_email("test@example.com").await.unwrap();

        assert_eq!(wizard.resend_code().await.unwrap(), Step::CodeVerification);
        assert_eq!(
            wizard.snapshot().notice.as_deref(),
            Some("verification code sent")
        );

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(wizard.snapshot().notice, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_action_does_not_stay_loading() {
        let (mut wizard, _) = mount_simulated();

        let timed_out = tokio::time::timeout(
            Duration::from_millis(100),
            wizard.submit_email("test@example.com"),
        )
        .await;
        assert!(timed_out.is_err());

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(!wizard.snapshot().is_loading);
        assert_eq!(wizard.step(), Step::EmailEntry);

        assert_eq!(
            wizard.submit_email("test@example.com").await.unwrap(),
            Step::CodeVerification
        );
    }

    #[tokio::test]
    async fn test_rejected_send_stays_on_email_entry() {
        let mut backend = InstantBackend::new();
        backend.reject_send = true;
        let mut wizard = RecoveryWizard::mount(
            &RecoverySettings::default(),
            Arc::new(backend.clone()),
            Arc::new(RecordingNavigator::default()),
        );

        let err = wizard.submit_email("test@example.com").await.unwrap_err();

        assert!(err.is_rejection());
        assert_eq!(wizard.step(), Step::EmailEntry);
        let snapshot = wizard.snapshot();
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.email, None);
        assert_eq!(
            snapshot.error_message.as_deref(),
            Some("no account for this email")
        );
        assert_eq!(backend.calls(), vec!["send:test@example.com"]);

        // editing the email clears the rejection
        wizard
            .machine_mut()
            .input(Field::Email, "other@example.com")
            .unwrap();
        assert_eq!(wizard.snapshot().error_message, None);
    }

    #[tokio::test]
    async fn test_injected_backend_sees_confirmed_email() {
        let backend = InstantBackend::new();
        let navigator = RecordingNavigator::default();
        let mut wizard = RecoveryWizard::mount(
            &RecoverySettings::default(),
            Arc::new(backend.clone()),
            Arc::new(navigator.clone()),
        );

        wizard.submit_email(" test@example.com ").await.unwrap();
        wizard.resend_code().await.unwrap();
        wizard.verify_code("12345").await.unwrap();
        wizard
            .reset_password("newpassword123", "newpassword123")
            .await
            .unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                "send:test@example.com",
                "resend:test@example.com",
                "verify:test@example.com:12345",
                "reset:test@example.com",
            ]
        );
    }

    #[tokio::test]
    async fn test_go_to_login_only_from_success() {
        let navigator = RecordingNavigator::default();
        let wizard = RecoveryWizard::mount(
            &RecoverySettings::default(),
            Arc::new(InstantBackend::new()),
            Arc::new(navigator.clone()),
        );

        let err = wizard.go_to_login().unwrap_err();
        assert!(matches!(err, ShipdeskError::WrongStep { .. }));
        assert!(navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn test_each_login_action_navigates_once() {
        let navigator = RecordingNavigator::default();
        let mut wizard = RecoveryWizard::mount(
            &RecoverySettings::default(),
            Arc::new(InstantBackend::new()),
            Arc::new(navigator.clone()),
        );
        wizard.submit_email("test@example.com").await.unwrap();
        wizard.verify_code("12345").await.unwrap();
        wizard
            .reset_password("newpassword123", "newpassword123")
            .await
            .unwrap();

        wizard.go_to_login().unwrap();
        assert_eq!(navigator.routes(), vec!["/login"]);
    }

    #[test]
    fn test_fresh_mounts_do_not_share_state() {
        let settings = RecoverySettings::default();
        let first = RecoveryWizard::mount(
            &settings,
            Arc::new(InstantBackend::new()),
            Arc::new(RecordingNavigator::default()),
        );
        let second = RecoveryWizard::mount(
            &settings,
            Arc::new(InstantBackend::new()),
            Arc::new(RecordingNavigator::default()),
        );

        assert_ne!(first.session(), second.session());
        assert_eq!(second.step(), Step::EmailEntry);
    }
}
