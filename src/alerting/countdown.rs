//! Alert countdown before automatic fire station dispatch
//!
//! When a fire is detected on an owner's camera the owner gets a fixed window
//! (30 seconds by default) to cancel a false alarm. The countdown ticks once
//! per second while the incident is active:
//! - cancel before zero: incident becomes `cancelled`, nothing is sent
//! - reaching zero: incident becomes `dispatched`, the station is notified once
//! - notify now: incident becomes `dispatched` immediately
//!
//! [`AlertCountdown`] is the synchronous state machine. [`CountdownController`]
//! drives it from a tokio interval and owns the single active alert of an
//! owner view.

use crate::alerting::dispatch::{DispatchReason, DispatchReceipt, Dispatcher};
use crate::types::{Incident, IncidentId, IncidentStatus};
use crate::{Result, alert_error};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::AbortHandle;
use tokio::time::{Duration, Instant};

/// Countdown decrement period
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Buffered alert events per subscriber
const EVENT_CAPACITY: usize = 64;

/// Countdown settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Starting value in seconds
    pub seconds: u32,
    /// Remaining seconds at or below which the alert is urgent
    pub urgent_threshold: u32,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            seconds: 30,
            urgent_threshold: 10,
        }
    }
}

impl CountdownConfig {
    pub fn validate(&self) -> Result<()> {
        if self.seconds == 0 {
            return Err(crate::Error::config("Countdown must last at least one second"));
        }

        if self.urgent_threshold > self.seconds {
            return Err(crate::Error::config(
                "Urgent threshold must not exceed the countdown length",
            ));
        }

        Ok(())
    }
}

/// Result of a single countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining: u32, urgent: bool },
    Expired,
}

/// Countdown state for one incident
#[derive(Debug, Clone)]
pub struct AlertCountdown {
    incident: Incident,
    remaining: u32,
    urgent_threshold: u32,
}

impl AlertCountdown {
    /// Start counting down for an active incident
    pub fn new(incident: Incident, config: &CountdownConfig) -> Result<Self> {
        config.validate()?;

        if !incident.is_active() {
            return Err(alert_error!(
                "Cannot start countdown for incident {} in status {:?}",
                incident.id,
                incident.status
            ));
        }

        Ok(Self {
            incident,
            remaining: config.seconds,
            urgent_threshold: config.urgent_threshold,
        })
    }

    pub fn incident(&self) -> &Incident {
        &self.incident
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn status(&self) -> IncidentStatus {
        self.incident.status
    }

    pub fn is_urgent(&self) -> bool {
        self.incident.is_active() && self.remaining <= self.urgent_threshold
    }

    /// Decrement by one second; reaching zero marks the incident dispatched
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.ensure_active("tick")?;

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.incident.status = IncidentStatus::Dispatched;
            return Ok(TickOutcome::Expired);
        }

        Ok(TickOutcome::Running {
            remaining: self.remaining,
            urgent: self.is_urgent(),
        })
    }

    /// Owner dismissed the alert
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_active("cancel")?;
        self.incident.status = IncidentStatus::Cancelled;
        Ok(())
    }

    /// Owner asked for immediate dispatch
    pub fn notify_now(&mut self) -> Result<()> {
        self.ensure_active("notify")?;
        self.incident.status = IncidentStatus::Dispatched;
        Ok(())
    }

    pub fn into_incident(self) -> Incident {
        self.incident
    }

    fn ensure_active(&self, action: &str) -> Result<()> {
        if self.incident.status.is_terminal() {
            return Err(alert_error!(
                "Cannot {} incident {}: already {:?}",
                action,
                self.incident.id,
                self.incident.status
            ));
        }
        Ok(())
    }
}

/// Alert lifecycle notifications for observers of an owner view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AlertEvent {
    Started {
        incident_id: IncidentId,
        remaining: u32,
    },
    Tick {
        incident_id: IncidentId,
        remaining: u32,
        urgent: bool,
    },
    Dispatched {
        incident_id: IncidentId,
        reason: DispatchReason,
    },
    /// The dispatcher refused the incident; nothing reached the station
    DispatchFailed {
        incident_id: IncidentId,
        reason: DispatchReason,
        message: String,
    },
    Cancelled {
        incident_id: IncidentId,
    },
}

struct RunningAlert {
    countdown: AlertCountdown,
    stop_signal: mpsc::Sender<()>,
}

/// Owns the single active alert of an owner view and its one-second timer
pub struct CountdownController<D: Dispatcher> {
    config: CountdownConfig,
    dispatcher: Arc<D>,
    active: Arc<Mutex<Option<RunningAlert>>>,
    /// Abort handle of the current timer task, kept outside `active` so it
    /// can be reached from synchronous teardown even while a tick holds the lock
    timer: StdMutex<Option<AbortHandle>>,
    events: broadcast::Sender<AlertEvent>,
}

impl<D: Dispatcher> CountdownController<D> {
    pub fn new(config: CountdownConfig, dispatcher: Arc<D>) -> Result<Self> {
        config.validate()?;

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            config,
            dispatcher,
            active: Arc::new(Mutex::new(None)),
            timer: StdMutex::new(None),
            events,
        })
    }

    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<D> {
        &self.dispatcher
    }

    /// Receive lifecycle events for alerts started after this call
    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.events.subscribe()
    }

    /// Begin the countdown for a freshly detected incident
    pub async fn start(&self, incident: Incident) -> Result<()> {
        let mut active = self.active.lock().await;

        if let Some(running) = active.as_ref() {
            return Err(alert_error!(
                "Incident {} is already counting down",
                running.countdown.incident().id
            ));
        }

        let countdown = AlertCountdown::new(incident, &self.config)?;
        let incident_id = countdown.incident().id;
        let remaining = countdown.remaining();

        let (stop_tx, stop_rx) = mpsc::channel(1);
        let task = tokio::spawn(run_countdown(
            incident_id,
            Instant::now() + TICK_PERIOD,
            Arc::clone(&self.active),
            Arc::clone(&self.dispatcher),
            self.events.clone(),
            stop_rx,
        ));

        *active = Some(RunningAlert {
            countdown,
            stop_signal: stop_tx,
        });
        self.replace_timer(Some(task.abort_handle()));
        drop(active);

        tracing::info!(
            "🔥 Fire alert started: incident={}, countdown={}s",
            incident_id,
            remaining
        );
        let _ = self.events.send(AlertEvent::Started {
            incident_id,
            remaining,
        });

        Ok(())
    }

    /// Dismiss the active alert; nothing is sent to the station
    pub async fn cancel(&self) -> Result<Incident> {
        let mut countdown = self.take_running().await?;
        countdown.cancel()?;

        let incident = countdown.into_incident();
        tracing::info!("✋ Fire alert cancelled by owner: incident={}", incident.id);
        let _ = self.events.send(AlertEvent::Cancelled {
            incident_id: incident.id,
        });

        Ok(incident)
    }

    /// Dispatch the active alert without waiting for the countdown
    ///
    /// The alert stays active, timer running, if the dispatcher fails.
    pub async fn notify_now(&self) -> Result<DispatchReceipt> {
        let mut active = self.active.lock().await;
        let running = active
            .as_ref()
            .ok_or_else(|| alert_error!("No active alert"))?;

        let mut confirmed = running.countdown.clone();
        confirmed.notify_now()?;
        let incident = confirmed.into_incident();
        let reason = DispatchReason::OwnerRequested;

        let receipt = match self.dispatcher.dispatch(&incident, reason) {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::error!(
                    "❌ Dispatch on request failed, alert still active: incident={}, {}",
                    incident.id,
                    e
                );
                let _ = self.events.send(AlertEvent::DispatchFailed {
                    incident_id: incident.id,
                    reason,
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        if let Some(running) = active.take() {
            let _ = running.stop_signal.try_send(());
        }
        drop(active);

        tracing::info!("📞 Fire station notified on request: incident={}", incident.id);
        let _ = self.events.send(AlertEvent::Dispatched {
            incident_id: incident.id,
            reason,
        });

        Ok(receipt)
    }

    pub async fn is_active(&self) -> bool {
        self.active.lock().await.is_some()
    }

    pub async fn remaining(&self) -> Option<u32> {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|running| running.countdown.remaining())
    }

    pub async fn is_urgent(&self) -> bool {
        self.active
            .lock()
            .await
            .as_ref()
            .is_some_and(|running| running.countdown.is_urgent())
    }

    pub async fn active_incident(&self) -> Option<Incident> {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|running| running.countdown.incident().clone())
    }

    /// Stop the timer and drop any in-flight alert without side effects
    pub async fn shutdown(&self) {
        self.replace_timer(None);

        if let Some(running) = self.active.lock().await.take() {
            let _ = running.stop_signal.try_send(());
            tracing::debug!(
                "Discarded in-flight alert on shutdown: incident={}",
                running.countdown.incident().id
            );
        }
    }

    /// Synchronous teardown for drop paths
    ///
    /// The timer is always aborted. The alert slot is cleared when the lock is
    /// free; an aborted timer can no longer dispatch either way.
    pub fn discard(&self) {
        self.replace_timer(None);

        if let Ok(mut active) = self.active.try_lock() {
            if let Some(running) = active.take() {
                tracing::debug!(
                    "Discarded in-flight alert on teardown: incident={}",
                    running.countdown.incident().id
                );
            }
        }
    }

    /// Install the abort handle of a new timer, aborting the previous one
    fn replace_timer(&self, next: Option<AbortHandle>) {
        let previous = {
            let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *timer, next)
        };

        if let Some(previous) = previous {
            previous.abort();
        }
    }

    async fn take_running(&self) -> Result<AlertCountdown> {
        let running = self
            .active
            .lock()
            .await
            .take()
            .ok_or_else(|| alert_error!("No active alert"))?;

        let _ = running.stop_signal.try_send(());
        Ok(running.countdown)
    }
}

impl<D: Dispatcher> Drop for CountdownController<D> {
    fn drop(&mut self) {
        self.discard();
    }
}

enum Step {
    Running { remaining: u32, urgent: bool },
    Expired(Incident),
    Detached,
}

async fn run_countdown<D: Dispatcher>(
    incident_id: IncidentId,
    first_tick: Instant,
    active: Arc<Mutex<Option<RunningAlert>>>,
    dispatcher: Arc<D>,
    events: broadcast::Sender<AlertEvent>,
    mut stop_signal: mpsc::Receiver<()>,
) {
    let mut interval = tokio::time::interval_at(first_tick, TICK_PERIOD);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match advance(incident_id, &active).await {
                    Ok(Step::Running { remaining, urgent }) => {
                        tracing::debug!(
                            "⏱️  Alert countdown: incident={}, remaining={}s",
                            incident_id,
                            remaining
                        );
                        let _ = events.send(AlertEvent::Tick { incident_id, remaining, urgent });
                    }
                    Ok(Step::Expired(incident)) => {
                        let event = expire(&incident, dispatcher.as_ref());
                        let _ = events.send(event);
                        break;
                    }
                    Ok(Step::Detached) => break,
                    Err(e) => {
                        tracing::error!(
                            "❌ Countdown tick failed: incident={}, {}",
                            incident_id,
                            e
                        );
                        break;
                    }
                }
            }
            _ = stop_signal.recv() => {
                tracing::debug!("Countdown stopped: incident={}", incident_id);
                break;
            }
        }
    }
}

/// Hand an expired incident to the station and report what happened
fn expire<D: Dispatcher>(incident: &Incident, dispatcher: &D) -> AlertEvent {
    let reason = DispatchReason::CountdownExpired;

    match dispatcher.dispatch(incident, reason) {
        Ok(receipt) => {
            tracing::info!(
                "🚨 Countdown expired, alert dispatched: incident={}, dispatch={}",
                incident.id,
                receipt.dispatch_id
            );
            AlertEvent::Dispatched {
                incident_id: incident.id,
                reason,
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Automatic dispatch failed: incident={}, severity={}, address={}, {}",
                incident.id,
                incident.severity,
                incident.owner_info.address,
                e
            );
            AlertEvent::DispatchFailed {
                incident_id: incident.id,
                reason,
                message: e.to_string(),
            }
        }
    }
}

async fn advance(incident_id: IncidentId, active: &Mutex<Option<RunningAlert>>) -> Result<Step> {
    let mut guard = active.lock().await;

    let outcome = match guard.as_mut() {
        Some(running) if running.countdown.incident().id == incident_id => {
            running.countdown.tick()?
        }
        _ => return Ok(Step::Detached),
    };

    Ok(match outcome {
        TickOutcome::Running { remaining, urgent } => Step::Running { remaining, urgent },
        TickOutcome::Expired => guard
            .take()
            .map(|running| Step::Expired(running.countdown.into_incident()))
            .unwrap_or(Step::Detached),
    })
}
