//! Display formatting for terminal output
//!
//! Plain-text rendering of wizard state, shipment reviews and receipts.

pub mod recovery;
pub mod shipment;

pub use recovery::{format_status, format_step_header, RESET_DONE_MESSAGE};
pub use shipment::{format_receipt, format_review, format_step_indicator};
