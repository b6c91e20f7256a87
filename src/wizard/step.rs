//! Recovery wizard steps
//!
//! [`Step`] is the ordered tag; [`StepState`] carries the inputs that only
//! live while their step is active.

use std::fmt;

use serde::Serialize;

use crate::models::SecretInput;

/// Position in the recovery flow, ordered from first to last
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    EmailEntry,
    CodeVerification,
    PasswordReset,
    Success,
}

impl Step {
    /// Human-readable name, used in errors and logs
    pub fn name(self) -> &'static str {
        match self {
            Self::EmailEntry => "email entry",
            Self::CodeVerification => "code verification",
            Self::PasswordReset => "password reset",
            Self::Success => "success",
        }
    }

    /// Heading shown for the step
    pub fn title(self) -> &'static str {
        match self {
            Self::EmailEntry => "Reset your password",
            Self::CodeVerification => "Verify your email",
            Self::PasswordReset => "Create new password",
            Self::Success => "Password reset successful",
        }
    }

    /// Whether no further transition exists
    pub fn is_terminal(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An editable input of the recovery wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Code,
    NewPassword,
    ConfirmPassword,
}

impl Field {
    /// The step on which this field is shown
    pub fn step(self) -> Step {
        match self {
            Self::Email => Step::EmailEntry,
            Self::Code => Step::CodeVerification,
            Self::NewPassword | Self::ConfirmPassword => Step::PasswordReset,
        }
    }
}

/// One of the two password inputs, each with its own visibility toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordField {
    New,
    Confirm,
}

/// The active step together with the inputs it owns
///
/// Leaving a step drops its payload, so codes and passwords never outlive
/// the step that collected them.
#[derive(Debug, Clone)]
pub enum StepState {
    EmailEntry {
        email: String,
    },
    CodeVerification {
        code: String,
    },
    PasswordReset {
        new_password: SecretInput,
        confirm_password: SecretInput,
    },
    Success,
}

impl StepState {
    /// Fresh state for the first step
    pub fn initial() -> Self {
        Self::EmailEntry {
            email: String::new(),
        }
    }

    /// Fresh state for code entry
    pub fn code_verification() -> Self {
        Self::CodeVerification {
            code: String::new(),
        }
    }

    /// Fresh state for choosing a new password
    pub fn password_reset() -> Self {
        Self::PasswordReset {
            new_password: SecretInput::new(),
            confirm_password: SecretInput::new(),
        }
    }

    /// The tag of this state
    pub fn step(&self) -> Step {
        match self {
            Self::EmailEntry { .. } => Step::EmailEntry,
            Self::CodeVerification { .. } => Step::CodeVerification,
            Self::PasswordReset { .. } => Step::PasswordReset,
            Self::Success => Step::Success,
        }
    }

    /// Whether the given password input is shown in clear text
    pub fn is_password_visible(&self, which: PasswordField) -> bool {
        match (self, which) {
            (Self::PasswordReset { new_password, .. }, PasswordField::New) => {
                new_password.is_visible()
            }
            (Self::PasswordReset { confirm_password, .. }, PasswordField::Confirm) => {
                confirm_password.is_visible()
            }
            _ => false,
        }
    }
}
