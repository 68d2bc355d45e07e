//! Fire station dashboard: concurrent incidents over protected properties
//!
//! Unlike the owner view there is no countdown here. Incidents stay on the
//! board until a responder resolves them.

use crate::alerting::MonitorHandle;
use crate::alerting::generator::IncidentGenerator;
use crate::config::AlertConfig;
use crate::types::{Incident, IncidentId, IncidentStatus, Property, User};
use crate::{Error, Result, alert_error};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, mpsc};
use tokio::time::Instant;

/// Active incidents in arrival order plus the one opened for detail
#[derive(Debug, Default)]
pub struct IncidentBoard {
    incidents: Vec<Incident>,
    selected: Option<IncidentId>,
    resolved_total: u64,
}

impl IncidentBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a newly received incident
    pub fn add(&mut self, incident: Incident) -> Result<()> {
        if !incident.is_active() {
            return Err(alert_error!(
                "Only active incidents can be posted, {} is {:?}",
                incident.id,
                incident.status
            ));
        }

        if self.incidents.iter().any(|i| i.id == incident.id) {
            return Err(alert_error!("Incident {} is already on the board", incident.id));
        }

        self.incidents.push(incident);
        Ok(())
    }

    /// Mark an incident resolved and take it off the board
    pub fn resolve(&mut self, id: &IncidentId) -> Result<Incident> {
        let index = self
            .incidents
            .iter()
            .position(|i| i.id == *id)
            .ok_or_else(|| Error::not_found("Incident", id))?;

        let mut incident = self.incidents.remove(index);
        incident.status = IncidentStatus::Resolved;

        if self.selected == Some(*id) {
            self.selected = None;
        }
        self.resolved_total += 1;

        tracing::info!(
            "✅ Incident resolved: incident={}, address={}",
            incident.id,
            incident.owner_info.address
        );
        Ok(incident)
    }

    pub fn select(&mut self, id: &IncidentId) -> Result<()> {
        if !self.incidents.iter().any(|i| i.id == *id) {
            return Err(Error::not_found("Incident", id));
        }
        self.selected = Some(*id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Incident> {
        self.selected
            .and_then(|id| self.incidents.iter().find(|i| i.id == id))
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn resolved_total(&self) -> u64 {
        self.resolved_total
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

pub struct ProviderMonitor {
    user: User,
    properties: Vec<Property>,
    board: Arc<RwLock<IncidentBoard>>,
    generator: Mutex<IncidentGenerator>,
    scan_interval: Duration,
}

impl ProviderMonitor {
    pub fn new(user: User, properties: Vec<Property>, config: &AlertConfig) -> Result<Self> {
        let generator_config = config.provider_generator_config();

        Ok(Self {
            user,
            properties,
            board: Arc::new(RwLock::new(IncidentBoard::new())),
            generator: Mutex::new(IncidentGenerator::new(&generator_config)?),
            scan_interval: generator_config.interval,
        })
    }

    /// Replace the detection source, keeping the configured scan period
    pub fn with_generator(mut self, generator: IncidentGenerator) -> Self {
        self.generator = Mutex::new(generator);
        self
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn board(&self) -> &Arc<RwLock<IncidentBoard>> {
        &self.board
    }

    /// One scan over the protected properties
    pub async fn scan_once(&self) -> Result<Option<Incident>> {
        let incident = self
            .generator
            .lock()
            .await
            .generate_for_property(&self.properties);

        let Some(incident) = incident else {
            return Ok(None);
        };

        tracing::warn!(
            "🚨 Incoming fire incident: incident={}, severity={}, address={}",
            incident.id,
            incident.severity,
            incident.owner_info.address
        );
        self.board.write().await.add(incident.clone())?;

        Ok(Some(incident))
    }

    pub async fn resolve(&self, id: &IncidentId) -> Result<Incident> {
        self.board.write().await.resolve(id)
    }

    /// Run the periodic scan until the handle is shut down or dropped
    pub fn spawn(self: &Arc<Self>) -> MonitorHandle {
        let (stop_tx, mut stop_rx) = mpsc::channel(1);
        let monitor = Arc::clone(self);
        let period = self.scan_interval;
        let first_scan = Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first_scan, period);

            tracing::info!(
                "🚒 Provider monitor started: station={}, properties={}",
                monitor.user.name,
                monitor.properties.len()
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = monitor.scan_once().await {
                            tracing::error!("❌ Provider scan failed: {}", e);
                        }
                    }
                    _ = stop_rx.recv() => {
                        tracing::info!("🛑 Provider monitor stopping");
                        break;
                    }
                }
            }

            tracing::info!("✅ Provider monitor stopped");
        });

        MonitorHandle::new(stop_tx, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerting::generator::GeneratorConfig;
    use crate::types::{Coordinates, OwnerInfo, Severity};

    fn incident() -> Incident {
        Incident::new(
            None,
            Severity::Low,
            "snapshot",
            OwnerInfo {
                name: "Brown Family".to_string(),
                address: "789 Pine Rd".to_string(),
                contact: "+1-555-4321".to_string(),
                coordinates: Coordinates::new(40.7282, -74.0776),
            },
        )
    }

    #[test]
    fn test_board_holds_concurrent_incidents() {
        let mut board = IncidentBoard::new();
        let first = incident();
        let second = incident();

        board.add(first.clone()).unwrap();
        board.add(second.clone()).unwrap();
        assert!(board.add(first.clone()).is_err());

        assert_eq!(board.len(), 2);
        assert_eq!(board.incidents()[0].id, first.id);
    }

    #[test]
    fn test_resolve_selected_clears_selection() {
        let mut board = IncidentBoard::new();
        let first = incident();
        let second = incident();
        board.add(first.clone()).unwrap();
        board.add(second.clone()).unwrap();

        board.select(&first.id).unwrap();
        let resolved = board.resolve(&first.id).unwrap();

        assert_eq!(resolved.status, IncidentStatus::Resolved);
        assert!(board.selected().is_none());
        assert_eq!(board.len(), 1);
        assert_eq!(board.resolved_total(), 1);

        board.select(&second.id).unwrap();
        assert!(board.resolve(&first.id).is_err());
        assert_eq!(board.selected().map(|i| i.id), Some(second.id));
    }

    #[test]
    fn test_board_rejects_finished_incidents() {
        let mut board = IncidentBoard::new();
        let mut cancelled = incident();
        cancelled.status = IncidentStatus::Cancelled;

        assert!(board.add(cancelled).is_err());
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_scan_posts_to_board() {
        let config = AlertConfig::default();
        let always = GeneratorConfig {
            interval: Duration::from_secs(10),
            probability: 1.0,
        };
        let station = crate::session::auth::mock_user(crate::types::Role::Provider);
        let monitor = ProviderMonitor::new(station, Property::demo_properties(), &config)
            .unwrap()
            .with_generator(IncidentGenerator::seeded(&always, 5).unwrap());

        let incident = monitor.scan_once().await.unwrap().unwrap();
        assert_eq!(monitor.board().read().await.len(), 1);

        let resolved = monitor.resolve(&incident.id).await.unwrap();
        assert_eq!(resolved.id, incident.id);
        assert!(monitor.board().read().await.is_empty());
    }
}
