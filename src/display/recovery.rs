//! Recovery wizard display formatting

use crate::navigation::BACK_TO_LOGIN_HREF;
use crate::wizard::{Step, WizardSnapshot};

/// Message shown on the success step
pub const RESET_DONE_MESSAGE: &str = "Your password has been reset successfully.";

/// Format the heading block for the snapshot's step
pub fn format_step_header(snapshot: &WizardSnapshot) -> String {
    let title = snapshot.step.title();
    let mut output = format!("{}\n{}\n", title, "=".repeat(title.len()));

    let body = match (snapshot.step, snapshot.email.as_deref()) {
        (Step::EmailEntry, _) => format!(
            "Enter your account email and we will send you a verification code.\n\
             Remembered it? Back to login: {BACK_TO_LOGIN_HREF}"
        ),
        (Step::CodeVerification, Some(email)) => {
            format!("Enter the verification code sent to {email}. Type :resend for a new code.")
        }
        (Step::CodeVerification, None) => "Enter the verification code.".to_string(),
        (Step::PasswordReset, _) => {
            "Choose a new password. Type :show to toggle visibility.".to_string()
        }
        (Step::Success, _) => RESET_DONE_MESSAGE.to_string(),
    };
    output.push_str(&body);
    output
}

/// Format progress, error and notice lines; empty when there is nothing to show
pub fn format_status(snapshot: &WizardSnapshot) -> String {
    let mut lines = Vec::new();
    if let Some(label) = snapshot.progress_label {
        lines.push(label.to_string());
    }
    if let Some(error) = &snapshot.error_message {
        lines.push(format!("Error: {error}"));
    }
    if let Some(notice) = &snapshot.notice {
        lines.push(format!("Note: {notice}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(step: Step) -> WizardSnapshot {
        WizardSnapshot {
            step,
            email: Some("test@example.com".into()),
            is_loading: false,
            progress_label: None,
            error_message: None,
            notice: None,
            show_new_password: false,
            show_confirm_password: false,
            commands_processed: 0,
        }
    }

    #[test]
    fn test_header_mentions_email_on_code_step() {
        let header = format_step_header(&snapshot(Step::CodeVerification));
        assert!(header.starts_with("Verify your email\n"));
        assert!(header.contains("sent to test@example.com"));
    }

    #[test]
    fn test_email_header_links_back_to_login() {
        let header = format_step_header(&snapshot(Step::EmailEntry));
        assert!(header.ends_with("Back to login: /login"));
    }

    #[test]
    fn test_success_header() {
        let header = format_step_header(&snapshot(Step::Success));
        assert!(header.contains("Password reset successful"));
        assert!(header.contains(RESET_DONE_MESSAGE));
    }

    #[test]
    fn test_status_lines() {
        let mut snap = snapshot(Step::CodeVerification);
        assert_eq!(format_status(&snap), "");

        snap.progress_label = Some("Verifying...");
        snap.error_message = Some("invalid verification code".into());
        assert_eq!(
            format_status(&snap),
            "Verifying...\nError: invalid verification code"
        );
    }
}
