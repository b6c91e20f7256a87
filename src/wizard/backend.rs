//! Remote operations behind the recovery wizard
//!
//! The wizard awaits a [`RecoveryBackend`] for every step action. The
//! [`SimulatedRecoveryBackend`] stands in for the account service with fixed
//! delays and a single accepted code.

use async_trait::async_trait;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::RecoverySettings;
use crate::error::RemoteRejection;

/// Account-service operations needed to recover a password
#[async_trait]
pub trait RecoveryBackend: Send + Sync {
    /// Send a verification code to `email`
    async fn send_code(&self, email: &str) -> Result<(), RemoteRejection>;

    /// Send another code to `email`
    async fn resend_code(&self, email: &str) -> Result<(), RemoteRejection> {
        self.send_code(email).await
    }

    /// Check the code the user typed
    async fn verify_code(&self, email: &str, code: &str) -> Result<(), RemoteRejection>;

    /// Store the new password
    async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), RemoteRejection>;
}

/// Backend that sleeps for the configured delays and never touches a network
#[derive(Debug, Clone)]
pub struct SimulatedRecoveryBackend {
    settings: RecoverySettings,
}

impl SimulatedRecoveryBackend {
    pub fn new(settings: RecoverySettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl RecoveryBackend for SimulatedRecoveryBackend {
    async fn send_code(&self, email: &str) -> Result<(), RemoteRejection> {
        debug!(email, "simulating verification code delivery");
        tokio::time::sleep(self.settings.send_code_delay()).await;
        Ok(())
    }

    async fn resend_code(&self, email: &str) -> Result<(), RemoteRejection> {
        debug!(email, "simulating verification code re-delivery");
        tokio::time::sleep(self.settings.resend_delay()).await;
        Ok(())
    }

    async fn verify_code(&self, _email: &str, code: &str) -> Result<(), RemoteRejection> {
        tokio::time::sleep(self.settings.verify_delay()).await;
        if code == self.settings.reference_code {
            Ok(())
        } else {
            Err(RemoteRejection::new("invalid verification code"))
        }
    }

    async fn reset_password(
        &self,
        _email: &str,
        _new_password: &str,
    ) -> Result<(), RemoteRejection> {
        tokio::time::sleep(self.settings.reset_delay()).await;
        Ok(())
    }
}

/// Which backend operation an action performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    SendCode,
    ResendCode,
    VerifyCode,
    ResetPassword,
}

impl ActionKind {
    /// Loading label shown while the action is in flight
    pub fn progress_label(self) -> &'static str {
        match self {
            Self::SendCode | Self::ResendCode => "Sending...",
            Self::VerifyCode => "Verifying...",
            Self::ResetPassword => "Resetting password...",
        }
    }
}

/// A validated request waiting for its backend round trip
#[derive(Debug, Clone)]
pub enum PendingAction {
    SendCode {
        email: String,
    },
    ResendCode {
        email: String,
    },
    VerifyCode {
        email: String,
        code: String,
    },
    ResetPassword {
        email: String,
        new_password: Zeroizing<String>,
    },
}

impl PendingAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::SendCode { .. } => ActionKind::SendCode,
            Self::ResendCode { .. } => ActionKind::ResendCode,
            Self::VerifyCode { .. } => ActionKind::VerifyCode,
            Self::ResetPassword { .. } => ActionKind::ResetPassword,
        }
    }

    /// Run the action against `backend`
    pub async fn execute(&self, backend: &dyn RecoveryBackend) -> Result<(), RemoteRejection> {
        match self {
            Self::SendCode { email } => backend.send_code(email).await,
            Self::ResendCode { email } => backend.resend_code(email).await,
            Self::VerifyCode { email, code } => backend.verify_code(email, code).await,
            Self::ResetPassword {
                email,
                new_password,
            } => backend.reset_password(email, new_password).await,
        }
    }
}


#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_send_takes_configured_delay() {
        let backend = SimulatedRecoveryBackend::new(RecoverySettings::default());
        let started = Instant::now();

        backend.send_code("test@example.com").await.unwrap();

        assert_eq!(started.elapsed().as_millis(), 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_verify_accepts_reference_code_only() {
        let backend = SimulatedRecoveryBackend::new(RecoverySettings::default());

        assert!(backend.verify_code("test@example.com", "12345").await.is_ok());
        let rejection = backend
            .verify_code("test@example.com", "99999")
            .await
            .unwrap_err();
        assert_eq!(rejection.message(), "invalid verification code");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_action_dispatches_to_backend() {
        let backend = testing::InstantBackend::new();
        let action = PendingAction::VerifyCode {
            email: "test@example.com".into(),
            code: "12345".into(),
        };

        assert_eq!(action.kind(), ActionKind::VerifyCode);
        action.execute(&backend).await.unwrap();
        assert_eq!(backend.calls(), vec!["verify:test@example.com:12345"]);
    }
}
