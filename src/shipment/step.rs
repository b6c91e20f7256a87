//! Shipment wizard steps

use std::fmt;

use serde::Serialize;

/// Position in the shipment flow, ordered from first to last
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStep {
    #[default]
    OriginAndClient,
    Package,
    Confirm,
    Submitted,
}

impl ShipmentStep {
    /// Steps shown in the step indicator
    pub const INDICATOR: [ShipmentStep; 3] = [Self::OriginAndClient, Self::Package, Self::Confirm];

    pub fn title(self) -> &'static str {
        match self {
            Self::OriginAndClient => "Origin & Client",
            Self::Package => "Package",
            Self::Confirm => "Confirm",
            Self::Submitted => "Submitted",
        }
    }

    /// Zero-based position in the step indicator
    pub fn index(self) -> usize {
        match self {
            Self::OriginAndClient => 0,
            Self::Package => 1,
            Self::Confirm | Self::Submitted => 2,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::OriginAndClient => Some(Self::Package),
            Self::Package => Some(Self::Confirm),
            Self::Confirm | Self::Submitted => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Package => Some(Self::OriginAndClient),
            Self::Confirm => Some(Self::Package),
            Self::OriginAndClient | Self::Submitted => None,
        }
    }
}

impl fmt::Display for ShipmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_titles() {
        let titles: Vec<_> = ShipmentStep::INDICATOR.iter().map(|s| s.title()).collect();
        assert_eq!(titles, ["Origin & Client", "Package", "Confirm"]);
    }

    #[test]
    fn test_next_and_previous() {
        assert_eq!(ShipmentStep::OriginAndClient.next(), Some(ShipmentStep::Package));
        assert_eq!(ShipmentStep::Confirm.next(), None);
        assert_eq!(ShipmentStep::Confirm.previous(), Some(ShipmentStep::Package));
        assert_eq!(ShipmentStep::OriginAndClient.previous(), None);
        assert_eq!(ShipmentStep::Submitted.previous(), None);
    }
}
