//! Fire station dispatch
//!
//! The countdown controller hands expired (or owner-confirmed) incidents to a
//! [`Dispatcher`]. No real notification channel exists; [`SimulatedStation`]
//! logs the dispatch and keeps a receipt so callers can inspect what was sent.

use crate::types::{Incident, IncidentId};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// Why an incident was sent to the fire station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchReason {
    /// Nobody cancelled the alert before the countdown ran out
    CountdownExpired,
    /// The owner pressed "notify now"
    OwnerRequested,
}

/// Proof that an incident was handed to a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub dispatch_id: Uuid,
    pub incident_id: IncidentId,
    pub station: String,
    pub reason: DispatchReason,
    pub dispatched_at: DateTime<Utc>,
}

/// Performs the dispatch side effect for an incident
pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(&self, incident: &Incident, reason: DispatchReason) -> Result<DispatchReceipt>;
}

/// Dispatcher that only records what it would have sent
pub struct SimulatedStation {
    station: String,
    receipts: RwLock<Vec<DispatchReceipt>>,
}

impl SimulatedStation {
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            receipts: RwLock::new(Vec::new()),
        }
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    /// All receipts issued so far, oldest first
    pub fn receipts(&self) -> Result<Vec<DispatchReceipt>> {
        let receipts = self
            .receipts
            .read()
            .map_err(|_| Error::internal("Dispatch log read error"))?;
        Ok(receipts.clone())
    }

    pub fn dispatch_count(&self) -> usize {
        self.receipts.read().map(|r| r.len()).unwrap_or_default()
    }

    /// Number of dispatches recorded for one incident
    pub fn dispatches_for(&self, incident_id: &IncidentId) -> usize {
        self.receipts
            .read()
            .map(|r| r.iter().filter(|d| d.incident_id == *incident_id).count())
            .unwrap_or_default()
    }
}

impl Default for SimulatedStation {
    fn default() -> Self {
        Self::new("Fire Station #1")
    }
}

impl Dispatcher for SimulatedStation {
    fn dispatch(&self, incident: &Incident, reason: DispatchReason) -> Result<DispatchReceipt> {
        let receipt = DispatchReceipt {
            dispatch_id: Uuid::new_v4(),
            incident_id: incident.id,
            station: self.station.clone(),
            reason,
            dispatched_at: Utc::now(),
        };

        tracing::warn!(
            "🚒 Fire station notified: station={}, incident={}, severity={}, address={}, reason={:?}",
            self.station,
            incident.id,
            incident.severity,
            incident.owner_info.address,
            reason
        );

        self.receipts
            .write()
            .map_err(|_| Error::internal("Dispatch log write error"))?
            .push(receipt.clone());

        Ok(receipt)
    }
}
