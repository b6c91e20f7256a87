//! Shipment display formatting
//!
//! Formats the step indicator, the review shown before submitting, and the
//! receipt shown afterwards.

use crate::shipment::{ShipmentDraft, ShipmentField, ShipmentReceipt, ShipmentStep};

/// Format the step indicator, marking the current step
pub fn format_step_indicator(current: ShipmentStep) -> String {
    ShipmentStep::INDICATOR
        .iter()
        .map(|step| {
            let marker = if step.index() < current.index() || current == ShipmentStep::Submitted {
                "x"
            } else if *step == current {
                ">"
            } else {
                " "
            };
            format!("[{}] {}. {}", marker, step.index() + 1, step.title())
        })
        .collect::<Vec<_>>()
        .join("   ")
}

/// Format the draft as a two-column review
pub fn format_review(draft: &ShipmentDraft) -> String {
    let fields = [ShipmentStep::OriginAndClient, ShipmentStep::Package]
        .into_iter()
        .flat_map(ShipmentField::on_step);

    let label_width = fields
        .clone()
        .map(|f| f.label().len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!("{:<label_width$}  {}\n", "Field", "Value"));
    output.push_str(&format!("{:-<label_width$}  {:-<20}\n", "", ""));

    for field in fields {
        let value = draft.get(*field).trim();
        let value = if value.is_empty() { "-" } else { value };
        output.push_str(&format!("{:<label_width$}  {}\n", field.label(), value));
    }

    output
}

/// Format a receipt for an accepted shipment
pub fn format_receipt(receipt: &ShipmentReceipt) -> String {
    let mut output = String::new();
    output.push_str("Shipment submitted\n");
    output.push_str(&format!("  Tracking number: {}\n", receipt.tracking_number));
    output.push_str(&format!("  Shipment ID:     {}\n", receipt.id));
    output.push_str(&format!(
        "  Submitted:       {}\n",
        receipt.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::draft::complete_draft;

    #[test]
    fn test_step_indicator_marks_current() {
        let indicator = format_step_indicator(ShipmentStep::Package);
        assert_eq!(
            indicator,
            "[x] 1. Origin & Client   [>] 2. Package   [ ] 3. Confirm"
        );
    }

    #[test]
    fn test_step_indicator_all_done_after_submit() {
        let indicator = format_step_indicator(ShipmentStep::Submitted);
        assert_eq!(indicator.matches("[x]").count(), 3);
    }

    #[test]
    fn test_review_lists_every_field() {
        let review = format_review(&complete_draft());
        assert!(review.contains("Package origin country"));
        assert!(review.contains("Ama Mensah"));
        // empty description
        assert!(review.lines().any(|l| l.starts_with("Description") && l.ends_with('-')));
    }

    #[test]
    fn test_receipt_shows_tracking_number() {
        let receipt = ShipmentReceipt::issue();
        let output = format_receipt(&receipt);
        assert!(output.contains(&receipt.tracking_number));
    }
}
