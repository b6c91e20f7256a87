//! `recover` command: the interactive password recovery wizard

use std::sync::Arc;

use crate::config::Settings;
use crate::display::{format_status, format_step_header};
use crate::error::{ShipdeskError, ShipdeskResult};
use crate::navigation::Navigator;
use crate::wizard::{
    Field, PasswordField, RecoveryWizard, SimulatedRecoveryBackend, Step, WizardCommand,
    WizardDriver, WizardHandle, WizardSnapshot,
};

use super::{prompt_async, prompt_secret, prompt_string};

const RESEND: &str = ":resend";
const SHOW: &str = ":show";

/// Navigator that reports the route on stdout
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, route: &str) {
        println!("Redirecting to {route}");
    }
}

/// Walk the recovery wizard until the user returns to login
pub async fn handle_recover_command(settings: &Settings) -> ShipdeskResult<()> {
    let backend = Arc::new(SimulatedRecoveryBackend::new(settings.recovery.clone()));
    let wizard = RecoveryWizard::mount(&settings.recovery, backend, Arc::new(PrintNavigator));

    let (mut handle, task) = WizardDriver::spawn(wizard);
    let mut shown_step = None;
    let mut snapshot = handle.settle().await?;

    loop {
        if shown_step != Some(snapshot.step) {
            println!();
            println!("{}", format_step_header(&snapshot));
            shown_step = Some(snapshot.step);
        }

        match snapshot.step {
            Step::EmailEntry => {
                let email = prompt_async(|| prompt_string("Email: ")).await?;
                handle
                    .send(WizardCommand::Input {
                        field: Field::Email,
                        value: email,
                    })
                    .await?;
                handle.send(WizardCommand::SubmitEmail).await?;
            }
            Step::CodeVerification => {
                let code = prompt_async(|| prompt_string("Verification code: ")).await?;
                if code == RESEND {
                    handle.send(WizardCommand::ResendCode).await?;
                } else {
                    handle
                        .send(WizardCommand::Input {
                            field: Field::Code,
                            value: code,
                        })
                        .await?;
                    handle.send(WizardCommand::VerifyCode).await?;
                }
            }
            Step::PasswordReset => {
                let new_password =
                    read_password(&mut handle, PasswordField::New, "New password: ").await?;
                handle
                    .send(WizardCommand::Input {
                        field: Field::NewPassword,
                        value: new_password,
                    })
                    .await?;
                let confirm =
                    read_password(&mut handle, PasswordField::Confirm, "Confirm password: ")
                        .await?;
                handle
                    .send(WizardCommand::Input {
                        field: Field::ConfirmPassword,
                        value: confirm,
                    })
                    .await?;
                handle.send(WizardCommand::ResetPassword).await?;
            }
            Step::Success => {
                prompt_async(|| prompt_string("Press Enter to go back to login ")).await?;
                handle.send(WizardCommand::GoToLogin).await?;
                handle.settle().await?;
                break;
            }
        }

        snapshot = handle.settle_reporting(|label| println!("{label}")).await?;
        print_status(&snapshot);
    }

    drop(handle);
    task.await
        .map_err(|e| ShipdeskError::Io(format!("wizard task failed: {e}")))?;
    Ok(())
}

/// Read a password input, handling the visibility toggle
async fn read_password(
    handle: &mut WizardHandle,
    which: PasswordField,
    prompt: &'static str,
) -> ShipdeskResult<String> {
    loop {
        let value = if is_visible(&handle.snapshot(), which) {
            prompt_async(move || prompt_string(prompt)).await?
        } else {
            prompt_async(move || prompt_secret(prompt)).await?
        };

        if value.trim() != SHOW {
            return Ok(value);
        }
        handle
            .send(WizardCommand::TogglePasswordVisibility(which))
            .await?;
        let shown = is_visible(&handle.settle().await?, which);
        println!("Password {}", if shown { "shown" } else { "hidden" });
    }
}

fn is_visible(snapshot: &WizardSnapshot, which: PasswordField) -> bool {
    match which {
        PasswordField::New => snapshot.show_new_password,
        PasswordField::Confirm => snapshot.show_confirm_password,
    }
}

fn print_status(snapshot: &WizardSnapshot) {
    let status = format_status(snapshot);
    if !status.is_empty() {
        println!("{status}");
    }
}
