//! Shipment form data
//!
//! The draft holds raw text as typed; [`ShipmentDraft::to_request`] turns a
//! complete draft into the typed request sent to the backend.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ShipmentId;
use crate::validation::{self, ValidationError};

use super::step::ShipmentStep;

/// An input of the shipment form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipmentField {
    OriginCountry,
    ClientName,
    ClientEmail,
    ClientPhone,
    PackageType,
    Weight,
    Description,
}

impl ShipmentField {
    /// The step on which this field is shown
    pub fn step(self) -> ShipmentStep {
        match self {
            Self::OriginCountry | Self::ClientName | Self::ClientEmail | Self::ClientPhone => {
                ShipmentStep::OriginAndClient
            }
            Self::PackageType | Self::Weight | Self::Description => ShipmentStep::Package,
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Self::Description)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OriginCountry => "Package origin country",
            Self::ClientName => "Client name",
            Self::ClientEmail => "Client email",
            Self::ClientPhone => "Client phone",
            Self::PackageType => "Package type",
            Self::Weight => "Weight (kg)",
            Self::Description => "Description",
        }
    }

    /// Fields shown on `step`, in display order
    pub fn on_step(step: ShipmentStep) -> &'static [ShipmentField] {
        match step {
            ShipmentStep::OriginAndClient => &[
                Self::OriginCountry,
                Self::ClientName,
                Self::ClientEmail,
                Self::ClientPhone,
            ],
            ShipmentStep::Package => &[Self::PackageType, Self::Weight, Self::Description],
            ShipmentStep::Confirm | ShipmentStep::Submitted => &[],
        }
    }
}

impl fmt::Display for ShipmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentDraft {
    pub origin_country: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub package_type: String,
    pub weight: String,
    pub description: String,
}

impl ShipmentDraft {
    pub fn get(&self, field: ShipmentField) -> &str {
        match field {
            ShipmentField::OriginCountry => &self.origin_country,
            ShipmentField::ClientName => &self.client_name,
            ShipmentField::ClientEmail => &self.client_email,
            ShipmentField::ClientPhone => &self.client_phone,
            ShipmentField::PackageType => &self.package_type,
            ShipmentField::Weight => &self.weight,
            ShipmentField::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: ShipmentField, value: String) {
        let slot = match field {
            ShipmentField::OriginCountry => &mut self.origin_country,
            ShipmentField::ClientName => &mut self.client_name,
            ShipmentField::ClientEmail => &mut self.client_email,
            ShipmentField::ClientPhone => &mut self.client_phone,
            ShipmentField::PackageType => &mut self.package_type,
            ShipmentField::Weight => &mut self.weight,
            ShipmentField::Description => &mut self.description,
        };
        *slot = value;
    }

    /// Check the fields of one step
    ///
    /// Missing required fields are reported before format problems.
    pub fn validate_step(&self, step: ShipmentStep) -> Result<(), ValidationError> {
        let fields = ShipmentField::on_step(step);
        validation::require_all(
            fields
                .iter()
                .filter(|f| f.is_required())
                .map(|f| self.get(*f)),
        )?;
        match step {
            ShipmentStep::OriginAndClient => validation::validate_email(&self.client_email),
            ShipmentStep::Package => validation::parse_weight(&self.weight).map(|_| ()),
            ShipmentStep::Confirm | ShipmentStep::Submitted => Ok(()),
        }
    }

    /// Validate every step and build the request
    pub fn to_request(&self) -> Result<ShipmentRequest, ValidationError> {
        self.validate_step(ShipmentStep::OriginAndClient)?;
        self.validate_step(ShipmentStep::Package)?;
        let description = self.description.trim();
        Ok(ShipmentRequest {
            origin_country: self.origin_country.trim().to_string(),
            client: ClientDetails {
                name: self.client_name.trim().to_string(),
                email: self.client_email.trim().to_string(),
                phone: self.client_phone.trim().to_string(),
            },
            package: PackageDetails {
                package_type: self.package_type.trim().to_string(),
                weight_kg: validation::parse_weight(&self.weight)?,
                description: (!description.is_empty()).then(|| description.to_string()),
            },
        })
    }
}

/// Who the shipment is for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// What is being shipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDetails {
    pub package_type: String,
    pub weight_kg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A validated shipment ready to submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub origin_country: String,
    pub client: ClientDetails,
    pub package: PackageDetails,
}

/// Acknowledgement of an accepted shipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentReceipt {
    pub id: ShipmentId,
    pub tracking_number: String,
    pub submitted_at: DateTime<Utc>,
}

impl ShipmentReceipt {
    /// Issue a receipt for a newly accepted shipment
    pub fn issue() -> Self {
        let id = ShipmentId::new();
        Self {
            id,
            tracking_number: id.tracking_number(),
            submitted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
pub(crate) fn complete_draft() -> ShipmentDraft {
    ShipmentDraft {
        origin_country: "Ghana".into(),
        client_name: "Ama Mensah".into(),
        client_email: "ama@example.com".into(),
        client_phone: "+233 20 000 0000".into(),
        package_type: "Documents".into(),
        weight: "1.5".into(),
        description: String::new(),
    }
}
