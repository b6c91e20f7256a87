//! Password recovery wizard
//!
//! Walks a user from email entry through code verification and a new
//! password to a success screen:
//!
//! - `step`: the ordered steps and the inputs each one owns
//! - `machine`: the synchronous state machine with two-phase actions
//! - `backend`: the account-service operations the wizard awaits
//! - `controller`: a mounted wizard bound to a backend and a navigator
//! - `driver`: the single-task event loop feeding commands to a mounted wizard
//! - `notice`: transient confirmations
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shipdesk::wizard::{RecoveryWizard, SimulatedRecoveryBackend, Step};
//!
//! let backend = Arc::new(SimulatedRecoveryBackend::new(settings.recovery.clone()));
//! let navigator = Arc::new(|route: &str| println!("-> {route}"));
//! let mut wizard = RecoveryWizard::mount(&settings.recovery, backend, navigator);
//!
//! assert_eq!(wizard.submit_email("test@example.com").await?, Step::CodeVerification);
//! ```

pub mod backend;
pub mod controller;
pub mod driver;
pub mod machine;
pub mod notice;
pub mod step;

pub use backend::{ActionKind, PendingAction, RecoveryBackend, SimulatedRecoveryBackend};
pub use controller::{RecoveryWizard, WizardSnapshot};
pub use driver::{WizardCommand, WizardDriver, WizardHandle};
pub use machine::{RecoveryMachine, RecoveryRules, CODE_SENT_NOTICE};
pub use notice::Notice;
pub use step::{Field, PasswordField, Step, StepState};
