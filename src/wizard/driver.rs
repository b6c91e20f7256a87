//! Event loop for a mounted recovery wizard
//!
//! The driver owns the wizard and handles one user command at a time. When a
//! command starts a backend round trip, the round trip runs alongside the
//! command queue. Commands that arrive meanwhile are ignored, except
//! visibility toggles. A fresh [`WizardSnapshot`] is published after every
//! change. Dropping every [`WizardHandle`] unmounts the wizard.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info_span, warn, Instrument};

use crate::error::{RemoteRejection, ShipdeskError, ShipdeskResult};

use super::backend::PendingAction;
use super::controller::{RecoveryWizard, WizardSnapshot};
use super::step::{Field, PasswordField};

const COMMAND_BUFFER: usize = 32;

/// A discrete user event for the recovery wizard
#[derive(Debug, Clone)]
pub enum WizardCommand {
    /// Replace the value of an input on the active step
    Input { field: Field, value: String },
    SubmitEmail,
    VerifyCode,
    ResendCode,
    ResetPassword,
    TogglePasswordVisibility(PasswordField),
    GoToLogin,
}

impl WizardCommand {
    /// Visibility toggles are not step input and are accepted while loading
    fn allowed_while_loading(&self) -> bool {
        matches!(self, Self::TogglePasswordVisibility(_))
    }
}

type Completion = (PendingAction, Result<(), RemoteRejection>);
type InFlight = Pin<Box<dyn Future<Output = Completion> + Send>>;

/// Hosting-shell side of a running driver
///
/// Clones share one command queue. Each command gets its queue position when
/// it is sent, so [`settle`](Self::settle) on any clone waits for that clone's
/// own commands.
#[derive(Debug, Clone)]
pub struct WizardHandle {
    commands: mpsc::Sender<WizardCommand>,
    state: watch::Receiver<WizardSnapshot>,
    queued: Arc<Mutex<u64>>,
    last_sent: u64,
}

impl WizardHandle {
    /// Queue a command
    pub async fn send(&mut self, command: WizardCommand) -> ShipdeskResult<()> {
        let permit = self
            .commands
            .reserve()
            .await
            .map_err(|_| ShipdeskError::Unmounted)?;
        // numbering and enqueueing happen together so positions follow queue order
        let mut queued = self.queued.lock().unwrap_or_else(PoisonError::into_inner);
        *queued += 1;
        permit.send(command);
        self.last_sent = *queued;
        Ok(())
    }

    /// Latest published state
    pub fn snapshot(&self) -> WizardSnapshot {
        self.state.borrow().clone()
    }

    /// Wait until every command sent through this handle has been handled and
    /// no action is in flight
    pub async fn settle(&mut self) -> ShipdeskResult<WizardSnapshot> {
        let sent = self.last_sent;
        let snapshot = self
            .state
            .wait_for(|s| s.commands_processed >= sent && !s.is_loading)
            .await
            .map_err(|_| ShipdeskError::Unmounted)?;
        Ok(snapshot.clone())
    }

    /// Like [`settle`](Self::settle), passing each new progress label to
    /// `report` while an action runs
    pub async fn settle_reporting(
        &mut self,
        mut report: impl FnMut(&'static str),
    ) -> ShipdeskResult<WizardSnapshot> {
        let sent = self.last_sent;
        let mut last_label = None;
        loop {
            let snapshot = self.state.borrow_and_update().clone();
            if snapshot.progress_label != last_label {
                if let Some(label) = snapshot.progress_label {
                    report(label);
                }
                last_label = snapshot.progress_label;
            }
            if snapshot.commands_processed >= sent && !snapshot.is_loading {
                return Ok(snapshot);
            }
            self.state
                .changed()
                .await
                .map_err(|_| ShipdeskError::Unmounted)?;
        }
    }

    /// Wait for the next published change
    pub async fn changed(&mut self) -> ShipdeskResult<WizardSnapshot> {
        self.state
            .changed()
            .await
            .map_err(|_| ShipdeskError::Unmounted)?;
        Ok(self.state.borrow_and_update().clone())
    }
}

/// Runs a [`RecoveryWizard`] against a command queue
pub struct WizardDriver {
    wizard: RecoveryWizard,
    commands: mpsc::Receiver<WizardCommand>,
    state: watch::Sender<WizardSnapshot>,
    in_flight: Option<InFlight>,
    processed: u64,
}

impl WizardDriver {
    /// Wrap `wizard` and return the handle that feeds it
    pub fn new(wizard: RecoveryWizard) -> (Self, WizardHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(wizard.snapshot());
        let driver = Self {
            wizard,
            commands: command_rx,
            state: state_tx,
            in_flight: None,
            processed: 0,
        };
        let handle = WizardHandle {
            commands: command_tx,
            state: state_rx,
            queued: Arc::default(),
            last_sent: 0,
        };
        (driver, handle)
    }

    /// Spawn the driver on the current tokio runtime
    pub fn spawn(wizard: RecoveryWizard) -> (WizardHandle, JoinHandle<()>) {
        let (driver, handle) = Self::new(wizard);
        (handle, tokio::spawn(driver.run()))
    }

    /// Handle commands until every handle is dropped
    ///
    /// An action already in flight is allowed to finish first.
    pub async fn run(mut self) {
        let span = info_span!("wizard_driver", session = %self.wizard.session());
        async move {
            let mut open = true;
            while open || self.in_flight.is_some() {
                let notice_deadline = self.wizard.machine().notice_deadline();
                tokio::select! {
                    completion = settle(&mut self.in_flight), if self.in_flight.is_some() => {
                        self.in_flight = None;
                        let (action, outcome) = completion;
                        self.finish(action, outcome);
                        self.publish();
                    }
                    command = self.commands.recv(), if open => match command {
                        Some(command) => {
                            self.handle(command);
                            self.processed += 1;
                            self.publish();
                        }
                        None => open = false,
                    },
                    _ = sleep_until(notice_deadline), if notice_deadline.is_some() => {
                        self.wizard.machine_mut().expire_notice();
                        self.publish();
                    }
                }
            }
            debug!("command queue closed, unmounting");
        }
        .instrument(span)
        .await
    }

    fn handle(&mut self, command: WizardCommand) {
        if self.in_flight.is_some() && !command.allowed_while_loading() {
            debug!(?command, "ignoring command while loading");
            return;
        }

        let machine = self.wizard.machine_mut();
        let started = match command {
            WizardCommand::Input { field, value } => machine.input(field, value).map(|_| None),
            WizardCommand::SubmitEmail => machine.begin_submit_email().map(Some),
            WizardCommand::VerifyCode => machine.begin_verify_code().map(Some),
            WizardCommand::ResendCode => machine.begin_resend_code().map(Some),
            WizardCommand::ResetPassword => machine.begin_reset_password().map(Some),
            WizardCommand::TogglePasswordVisibility(which) => {
                machine.toggle_password_visibility(which).map(|_| None)
            }
            WizardCommand::GoToLogin => self.wizard.go_to_login().map(|_| None),
        };

        match started {
            Ok(Some(action)) => {
                let backend = self.wizard.backend();
                self.in_flight = Some(Box::pin(async move {
                    let outcome = action.execute(&*backend).await;
                    (action, outcome)
                }));
            }
            Ok(None) => {}
            Err(err) if err.is_user_facing() => debug!(error = %err, "command failed validation"),
            Err(err) => warn!(error = %err, "command rejected"),
        }
    }

    /// Apply a finished round trip; returns whether the machine accepted it
    fn finish(&mut self, action: PendingAction, outcome: Result<(), RemoteRejection>) -> bool {
        match self.wizard.machine_mut().complete(action, outcome) {
            Ok(step) => {
                debug!(%step, "action completed");
                true
            }
            // recorded as the step error
            Err(err) if err.is_rejection() => true,
            Err(err) => {
                warn!(error = %err, "action outcome not applied");
                false
            }
        }
    }

    fn publish(&self) {
        let mut snapshot = self.wizard.snapshot();
        snapshot.commands_processed = self.processed;
        self.state.send_replace(snapshot);
    }
}

async fn settle(in_flight: &mut Option<InFlight>) -> Completion {
    match in_flight {
        Some(action) => action.await,
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::RecoverySettings;
    use crate::navigation::testing::RecordingNavigator;
    use crate::wizard::backend::SimulatedRecoveryBackend;
    use crate::wizard::step::Step;

    fn spawn_simulated() -> (WizardHandle, JoinHandle<()>, RecordingNavigator) {
        let settings = RecoverySettings::default();
        let navigator = RecordingNavigator::default();
        let wizard = RecoveryWizard::mount(
            &settings,
            Arc::new(SimulatedRecoveryBackend::new(settings.clone())),
            Arc::new(navigator.clone()),
        );
        let (handle, task) = WizardDriver::spawn(wizard);
        (handle, task, navigator)
    }

    fn input(field: Field, value: &str) -> WizardCommand {
        WizardCommand::Input {
            field,
            value: value.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_is_published_during_round_trip() {
        let (mut handle, _task, _) = spawn_simulated();

        handle.send(input(Field::Email, "test@example.com")).await.unwrap();
        handle.send(WizardCommand::SubmitEmail).await.unwrap();

        let loading = handle
            .state
            .wait_for(|s| s.is_loading)
            .await
            .unwrap()
            .clone();
        assert_eq!(loading.step, Step::EmailEntry);
        assert_eq!(loading.progress_label, Some("Sending..."));

        let settled = handle.settle().await.unwrap();
        assert_eq!(settled.step, Step::CodeVerification);
        assert_eq!(settled.email.as_deref(), Some("test@example.com"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_reporting_sees_progress_label() {
        let (mut handle, _task, _) = spawn_simulated();

        handle.send(input(Field::Email, "test@example.com")).await.unwrap();
        handle.send(WizardCommand::SubmitEmail).await.unwrap();

        let mut labels = Vec::new();
        let settled = handle
            .settle_reporting(|label| labels.push(label))
            .await
            .unwrap();

        assert_eq!(labels, vec!["Sending..."]);
        assert_eq!(settled.step, Step::CodeVerification);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cloned_handle_settles_its_own_commands() {
        let (mut first, _task, _) = spawn_simulated();
        for value in ["a", "ab", "abc"] {
            first.send(input(Field::Email, value)).await.unwrap();
        }
        first.settle().await.unwrap();

        let mut second = first.clone();
        second.send(input(Field::Email, "test@example.com")).await.unwrap();
        second.send(WizardCommand::SubmitEmail).await.unwrap();

        let settled = second.settle().await.unwrap();
        assert_eq!(settled.commands_processed, 5);
        assert_eq!(settled.step, Step::CodeVerification);
        assert_eq!(settled.email.as_deref(), Some("test@example.com"));
    }

    #[tokio::test]
    async fn test_unexpected_completion_is_not_applied() {
        let settings = RecoverySettings::default();
        let wizard = RecoveryWizard::mount(
            &settings,
            Arc::new(SimulatedRecoveryBackend::new(settings.clone())),
            Arc::new(RecordingNavigator::default()),
        );
        let (mut driver, _handle) = WizardDriver::new(wizard);

        let stray = PendingAction::VerifyCode {
            email: "test@example.com".into(),
            code: "12345".into(),
        };
        assert!(!driver.finish(stray, Ok(())));
        assert_eq!(driver.wizard.step(), Step::EmailEntry);
        assert!(!driver.wizard.machine().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_ignored_while_loading() {
        let (mut handle, _task, _) = spawn_simulated();

        handle.send(input(Field::Email, "test@example.com")).await.unwrap();
        handle.send(WizardCommand::SubmitEmail).await.unwrap();
        handle.state.wait_for(|s| s.is_loading).await.unwrap();

        // a second submit and an edit during the round trip are dropped
        handle.send(input(Field::Email, "other@example.com")).await.unwrap();
        handle.send(WizardCommand::SubmitEmail).await.unwrap();

        let settled = handle.settle().await.unwrap();
        assert_eq!(settled.step, Step::CodeVerification);
        assert_eq!(settled.email.as_deref(), Some("test@example.com"));
        assert_eq!(settled.error_message, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_flow_through_driver() {
        let (mut handle, task, navigator) = spawn_simulated();

        handle.send(WizardCommand::SubmitEmail).await.unwrap();
        let snapshot = handle.settle().await.unwrap();
        assert_eq!(snapshot.error_message.as_deref(), Some("email is required"));

        handle.send(input(Field::Email, "test@example.com")).await.unwrap();
        assert_eq!(handle.settle().await.unwrap().error_message, None);

        handle.send(WizardCommand::SubmitEmail).await.unwrap();
        assert_eq!(handle.settle().await.unwrap().step, Step::CodeVerification);

        handle.send(input(Field::Code, "99999")).await.unwrap();
        handle.send(WizardCommand::VerifyCode).await.unwrap();
        let snapshot = handle.settle().await.unwrap();
        assert_eq!(snapshot.step, Step::CodeVerification);
        assert_eq!(
            snapshot.error_message.as_deref(),
            Some("invalid verification code")
        );

        handle.send(input(Field::Code, "12345")).await.unwrap();
        handle.send(WizardCommand::VerifyCode).await.unwrap();
        assert_eq!(handle.settle().await.unwrap().step, Step::PasswordReset);

        handle.send(input(Field::NewPassword, "newpassword123")).await.unwrap();
        handle.send(input(Field::ConfirmPassword, "newpassword123")).await.unwrap();
        handle.send(WizardCommand::ResetPassword).await.unwrap();
        assert_eq!(handle.settle().await.unwrap().step, Step::Success);

        handle.send(WizardCommand::GoToLogin).await.unwrap();
        handle.settle().await.unwrap();
        assert_eq!(navigator.routes(), vec!["/login"]);

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_accepted_while_loading() {
        let (mut handle, _task, _) = spawn_simulated();
        handle.send(input(Field::Email, "test@example.com")).await.unwrap();
        handle.send(WizardCommand::SubmitEmail).await.unwrap();
        handle.settle().await.unwrap();
        handle.send(input(Field::Code, "12345")).await.unwrap();
        handle.send(WizardCommand::VerifyCode).await.unwrap();
        handle.settle().await.unwrap();

        handle.send(input(Field::NewPassword, "newpassword123")).await.unwrap();
        handle.send(input(Field::ConfirmPassword, "newpassword123")).await.unwrap();
        handle.send(WizardCommand::ResetPassword).await.unwrap();
        handle.state.wait_for(|s| s.is_loading).await.unwrap();

        handle
            .send(WizardCommand::TogglePasswordVisibility(PasswordField::Confirm))
            .await
            .unwrap();
        let snapshot = handle
            .state
            .wait_for(|s| s.show_confirm_password)
            .await
            .unwrap()
            .clone();
        assert!(snapshot.is_loading);
        assert!(!snapshot.show_new_password);

        assert_eq!(handle.settle().await.unwrap().step, Step::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resend_notice_is_withdrawn_after_expiry() {
        let (mut handle, _task, _) = spawn_simulated();
        handle.send(input(Field::Email, "test@example.com")).await.unwrap();
        handle.send(WizardCommand::SubmitEmail).await.unwrap();
        handle.settle().await.unwrap();

        handle.send(WizardCommand::ResendCode).await.unwrap();
        let snapshot = handle.settle().await.unwrap();
        assert_eq!(snapshot.notice.as_deref(), Some("verification code sent"));
        assert_eq!(snapshot.step, Step::CodeVerification);

        let cleared = handle.changed().await.unwrap();
        assert_eq!(cleared.notice, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_waits_for_in_flight_action() {
        let (mut handle, task, _) = spawn_simulated();
        handle.send(input(Field::Email, "test@example.com")).await.unwrap();
        handle.send(WizardCommand::SubmitEmail).await.unwrap();
        handle.state.wait_for(|s| s.is_loading).await.unwrap();

        let state = handle.state.clone();
        drop(handle);
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.borrow().step, Step::CodeVerification);
    }
}
