//! Shipment submission backend

use async_trait::async_trait;
use tracing::debug;

use crate::config::ShipmentSettings;
use crate::error::RemoteRejection;

use super::draft::{ShipmentReceipt, ShipmentRequest};

/// Accepts shipment requests
#[async_trait]
pub trait ShipmentBackend: Send + Sync {
    async fn submit(&self, request: &ShipmentRequest) -> Result<ShipmentReceipt, RemoteRejection>;
}

/// Backend that waits the configured delay and accepts everything
#[derive(Debug, Clone)]
pub struct SimulatedShipmentBackend {
    settings: ShipmentSettings,
}

impl SimulatedShipmentBackend {
    pub fn new(settings: ShipmentSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ShipmentBackend for SimulatedShipmentBackend {
    async fn submit(&self, request: &ShipmentRequest) -> Result<ShipmentReceipt, RemoteRejection> {
        debug!(origin = %request.origin_country, "simulating shipment submission");
        tokio::time::sleep(self.settings.submit_delay()).await;
        Ok(ShipmentReceipt::issue())
    }
}
