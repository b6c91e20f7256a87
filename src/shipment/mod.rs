//! Shipment creation wizard
//!
//! Collects origin and client details, then package details, shows a review
//! and submits the shipment to a [`ShipmentBackend`].

pub mod backend;
pub mod draft;
pub mod step;
pub mod wizard;

pub use backend::{ShipmentBackend, SimulatedShipmentBackend};
pub use draft::{
    ClientDetails, PackageDetails, ShipmentDraft, ShipmentField, ShipmentReceipt, ShipmentRequest,
};
pub use step::ShipmentStep;
pub use wizard::ShipmentWizard;
