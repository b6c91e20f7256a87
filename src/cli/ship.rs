//! `ship` command: the interactive shipment wizard

use crate::config::Settings;
use crate::display::{format_receipt, format_review, format_step_indicator};
use crate::error::ShipdeskResult;
use crate::shipment::{ShipmentField, ShipmentStep, ShipmentWizard, SimulatedShipmentBackend};

use super::prompt_string;

const BACK: &str = ":back";

/// Walk the shipment wizard until the shipment is submitted
pub async fn handle_ship_command(settings: &Settings) -> ShipdeskResult<()> {
    let backend = SimulatedShipmentBackend::new(settings.shipment.clone());
    let mut wizard = ShipmentWizard::new();

    println!("Create a shipment. Type {BACK} to return to the previous step.");

    while wizard.step() != ShipmentStep::Submitted {
        println!();
        println!("{}", format_step_indicator(wizard.step()));
        println!();

        let went_back = match wizard.step() {
            ShipmentStep::Confirm => confirm(&mut wizard, &backend).await?,
            _ => fill_step(&mut wizard)?,
        };
        if went_back {
            wizard.back()?;
        }
    }

    Ok(())
}

/// Prompt for each field of the current step, then continue
///
/// Returns `true` when the user asked to go back.
fn fill_step(wizard: &mut ShipmentWizard) -> ShipdeskResult<bool> {
    for field in ShipmentField::on_step(wizard.step()) {
        let current = wizard.draft().get(*field).to_string();
        let suffix = if field.is_required() { "" } else { " (optional)" };
        let prompt = if current.is_empty() {
            format!("{}{}: ", field.label(), suffix)
        } else {
            format!("{}{} [{}]: ", field.label(), suffix, current)
        };

        let value = prompt_string(&prompt)?;
        if value == BACK {
            return Ok(wizard.step().previous().is_some());
        }
        if !value.is_empty() {
            wizard.set_field(*field, value)?;
        }
    }

    match wizard.next() {
        Ok(_) => {}
        Err(err) if err.is_validation() => println!("Error: {err}"),
        Err(err) => return Err(err),
    }
    Ok(false)
}

async fn confirm(
    wizard: &mut ShipmentWizard,
    backend: &SimulatedShipmentBackend,
) -> ShipdeskResult<bool> {
    println!("{}", format_review(wizard.draft()));
    let answer = prompt_string("Submit this shipment? [y/N or :back] ")?;
    if answer == BACK {
        return Ok(true);
    }
    if !answer.eq_ignore_ascii_case("y") {
        return Ok(false);
    }

    println!("Submitting...");
    let outcome = wizard.submit(backend).await.cloned();
    match outcome {
        Ok(receipt) => {
            println!();
            print!("{}", format_receipt(&receipt));
            Ok(false)
        }
        Err(err) if err.is_user_facing() => {
            if let Some(message) = wizard.error_message() {
                println!("Error: {message}");
            }
            Ok(false)
        }
        Err(err) => Err(err),
    }
}
