//! Owner dashboard: camera registry, fire detection scan and alert countdown

use crate::Result;
use crate::alerting::MonitorHandle;
use crate::alerting::countdown::CountdownController;
use crate::alerting::dispatch::Dispatcher;
use crate::alerting::generator::{GeneratorConfig, IncidentGenerator};
use crate::config::AlertConfig;
use crate::registry::CameraRegistry;
use crate::types::{Incident, User};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, mpsc};
use tokio::time::Instant;

pub struct OwnerMonitor<D: Dispatcher> {
    user: User,
    registry: Arc<RwLock<CameraRegistry>>,
    countdown: CountdownController<D>,
    generator: Mutex<IncidentGenerator>,
    scan_interval: Duration,
}

impl<D: Dispatcher> OwnerMonitor<D> {
    pub fn new(
        user: User,
        registry: CameraRegistry,
        dispatcher: Arc<D>,
        config: &AlertConfig,
    ) -> Result<Self> {
        let generator_config = config.owner_generator_config();

        Ok(Self {
            user,
            registry: Arc::new(RwLock::new(registry)),
            countdown: CountdownController::new(config.countdown_config(), dispatcher)?,
            generator: Mutex::new(IncidentGenerator::new(&generator_config)?),
            scan_interval: generator_config.interval,
        })
    }

    /// Replace the detection source, keeping the configured scan period
    pub fn with_generator(mut self, generator: IncidentGenerator) -> Self {
        self.generator = Mutex::new(generator);
        self
    }

    /// Override the scan period and detection chance
    pub fn with_generator_config(mut self, config: &GeneratorConfig) -> Result<Self> {
        self.generator = Mutex::new(IncidentGenerator::new(config)?);
        self.scan_interval = config.interval;
        Ok(self)
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn registry(&self) -> &Arc<RwLock<CameraRegistry>> {
        &self.registry
    }

    pub fn countdown(&self) -> &CountdownController<D> {
        &self.countdown
    }

    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    /// One detection scan; starts the countdown when an incident is raised
    ///
    /// Only one alert is tracked at a time, so nothing is generated while a
    /// countdown is still running.
    pub async fn scan_once(&self) -> Result<Option<Incident>> {
        if self.countdown.is_active().await {
            return Ok(None);
        }

        let monitoring = self.registry.read().await.monitoring();
        let incident = self
            .generator
            .lock()
            .await
            .generate_for_camera(&monitoring, &self.user);

        let Some(incident) = incident else {
            return Ok(None);
        };

        tracing::info!(
            "🔥 Fire detected: incident={}, camera={:?}, severity={}",
            incident.id,
            incident.camera_id,
            incident.severity
        );
        self.countdown.start(incident.clone()).await?;

        Ok(Some(incident))
    }

    /// Run the periodic scan until the handle is shut down or dropped
    pub fn spawn(self: &Arc<Self>) -> MonitorHandle {
        let (stop_tx, mut stop_rx) = mpsc::channel(1);
        let teardown = DiscardOnDrop(Arc::clone(self));
        let period = self.scan_interval;
        let first_scan = Instant::now() + period;

        let task = tokio::spawn(async move {
            let monitor = &teardown.0;
            let mut interval = tokio::time::interval_at(first_scan, period);

            tracing::info!(
                "👁️  Owner monitor started: user={}, scan interval={:?}",
                monitor.user.id,
                period
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = monitor.scan_once().await {
                            tracing::error!("❌ Owner scan failed: {}", e);
                        }
                    }
                    _ = stop_rx.recv() => {
                        tracing::info!("🛑 Owner monitor stopping");
                        break;
                    }
                }
            }

            monitor.countdown.shutdown().await;
            tracing::info!("✅ Owner monitor stopped");
        });

        MonitorHandle::new(stop_tx, task)
    }
}

/// Lives inside the scan task; an aborted task drops it and takes the
/// in-flight alert and its timer down with it
struct DiscardOnDrop<D: Dispatcher>(Arc<OwnerMonitor<D>>);

impl<D: Dispatcher> Drop for DiscardOnDrop<D> {
    fn drop(&mut self) {
        self.0.countdown.discard();
    }
}
