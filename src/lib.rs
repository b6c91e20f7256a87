//! Shipdesk - shipment and account-recovery wizards for the ShipDesk client
//!
//! This library provides the step-driven flows of the ShipDesk logistics
//! client: a password recovery wizard that talks to an asynchronous account
//! backend, and a shipment creation wizard.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `validation`: Input checks shared by both wizards
//! - `models`: Identifiers and secret input values
//! - `navigation`: Route handling for the hosting shell
//! - `wizard`: The password recovery state machine, controller and driver
//! - `shipment`: The shipment creation wizard
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//! - `logging`: Tracing setup
//!
//! # Example
//!
//! ```rust,ignore
//! use shipdesk::config::{Settings, ShipdeskPaths};
//!
//! let paths = ShipdeskPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod shipment;
pub mod validation;
pub mod wizard;

pub use error::{ShipdeskError, ShipdeskResult};
