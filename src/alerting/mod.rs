//! Incident alert lifecycle for the owner and fire-station views

pub mod countdown;
pub mod dispatch;
pub mod generator;
pub mod owner;
pub mod provider;

use crate::types::Coordinates;
use crate::{Error, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use countdown::{AlertCountdown, AlertEvent, CountdownConfig, CountdownController, TickOutcome};
pub use dispatch::{DispatchReason, DispatchReceipt, Dispatcher, SimulatedStation};
pub use generator::{GeneratorConfig, IncidentGenerator};
pub use owner::OwnerMonitor;
pub use provider::{IncidentBoard, ProviderMonitor};

/// Handle to a running scan loop
///
/// Dropping the handle aborts the loop so a torn-down view leaves no timers
/// behind; [`MonitorHandle::shutdown`] stops it gracefully instead.
pub struct MonitorHandle {
    stop_signal: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    fn new(stop_signal: mpsc::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            stop_signal,
            task: Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the loop and wait for it to release its timers
    pub async fn shutdown(mut self) -> Result<()> {
        let _ = self.stop_signal.send(()).await;

        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| Error::internal(format!("Monitor task failed: {e}")))?;
        }

        Ok(())
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Alert helpers shared by both dashboards
pub struct AlertUtils;

impl AlertUtils {
    /// Driving directions to an incident location
    pub fn directions_url(coordinates: &Coordinates) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            coordinates.lat, coordinates.lng
        )
    }

    /// Owner-facing status line for an alert countdown
    pub fn countdown_message(remaining: u32) -> String {
        if remaining > 0 {
            format!(
                "Alert will be automatically sent to fire station in {remaining} seconds unless cancelled."
            )
        } else {
            "Alert has been sent to fire station automatically.".to_string()
        }
    }
}
