//! Alert lifecycle integration tests on a paused tokio clock

use firewatch::{
    Result,
    alerting::{
        AlertEvent, CountdownController, DispatchReason, IncidentGenerator, OwnerMonitor,
        ProviderMonitor, SimulatedStation, generator::owner_incident,
    },
    config::{AlertConfig, Config},
    registry::{CameraConfig, CameraRegistry},
    session::{AuthFlow, AuthStep, FileStore, SessionManager, existing_user},
    types::{Camera, CameraKind, Incident, Property, Role},
};
use std::sync::Arc;
use tokio::time::{Duration, sleep};

fn fresh_incident() -> Incident {
    let camera = Camera::new("Front Entrance".to_string(), CameraKind::Usb);
    owner_incident(&camera, &existing_user())
}

fn controller() -> (CountdownController<SimulatedStation>, Arc<SimulatedStation>) {
    let station = Arc::new(SimulatedStation::default());
    let controller =
        CountdownController::new(AlertConfig::default().countdown_config(), Arc::clone(&station))
            .unwrap();
    (controller, station)
}

#[tokio::test(start_paused = true)]
async fn test_countdown_expiry_dispatches_exactly_once() -> Result<()> {
    println!("⏳ Testing 30 second countdown without cancellation...");

    let (controller, station) = controller();
    let incident = fresh_incident();

    controller.start(incident.clone()).await?;
    assert_eq!(controller.remaining().await, Some(30));

    sleep(Duration::from_millis(30_500)).await;

    assert!(!controller.is_active().await);
    assert_eq!(station.dispatch_count(), 1);
    assert_eq!(station.dispatches_for(&incident.id), 1);

    let receipt = &station.receipts()?[0];
    assert_eq!(receipt.reason, DispatchReason::CountdownExpired);
    println!("✅ Incident cleared and dispatched once");

    // Nothing fires later on
    sleep(Duration::from_secs(60)).await;
    assert_eq!(station.dispatch_count(), 1);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancel_at_tick_ten_never_dispatches() -> Result<()> {
    println!("✋ Testing cancellation at tick 10...");

    let (controller, station) = controller();
    let incident = fresh_incident();
    controller.start(incident.clone()).await?;

    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(controller.remaining().await, Some(20));

    let cancelled = controller.cancel().await?;
    assert_eq!(cancelled.id, incident.id);
    assert!(cancelled.status.is_terminal());
    assert!(!controller.is_active().await);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(station.dispatch_count(), 0);
    println!("✅ Cancelled alert cleared with no dispatch");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_countdown_decreases_by_one_each_second() -> Result<()> {
    let (controller, _station) = controller();
    controller.start(fresh_incident()).await?;

    // Sample half a second after each tick boundary
    sleep(Duration::from_millis(500)).await;
    assert_eq!(controller.remaining().await, Some(30));

    for elapsed in 1..30u32 {
        sleep(Duration::from_secs(1)).await;
        assert_eq!(controller.remaining().await, Some(30 - elapsed));
    }

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_event_stream_follows_lifecycle() -> Result<()> {
    let (controller, _station) = controller();
    let mut events = controller.subscribe();
    let incident = fresh_incident();

    controller.start(incident.clone()).await?;

    assert_eq!(
        events.recv().await.unwrap(),
        AlertEvent::Started {
            incident_id: incident.id,
            remaining: 30
        }
    );

    for expected in (1..30).rev() {
        match events.recv().await.unwrap() {
            AlertEvent::Tick {
                incident_id,
                remaining,
                urgent,
            } => {
                assert_eq!(incident_id, incident.id);
                assert_eq!(remaining, expected);
                assert_eq!(urgent, expected <= 10);
            }
            other => panic!("Expected tick {expected}, got {other:?}"),
        }
    }

    assert_eq!(
        events.recv().await.unwrap(),
        AlertEvent::Dispatched {
            incident_id: incident.id,
            reason: DispatchReason::CountdownExpired
        }
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_owner_monitor_end_to_end() -> Result<()> {
    println!("📷 Testing owner monitor scan → countdown → dispatch...");

    let config = Config::for_testing()?;
    let station = Arc::new(SimulatedStation::default());

    let mut registry = CameraRegistry::with_demo_cameras();
    let backyard = registry.cameras()[1].id;
    registry.toggle_monitoring(&backyard)?;

    let monitor = Arc::new(OwnerMonitor::new(
        existing_user(),
        registry,
        Arc::clone(&station),
        &config.alerts,
    )?);
    let handle = monitor.spawn();

    // First scan fires one second in
    sleep(Duration::from_millis(1_500)).await;
    let first = monitor
        .countdown()
        .active_incident()
        .await
        .expect("scan should raise an alert");
    assert_eq!(first.camera_id, Some(backyard));
    assert_eq!(monitor.countdown().remaining().await, Some(30));

    // Countdown runs out 30 seconds after the alert started
    sleep(Duration::from_secs(30)).await;
    assert_eq!(station.dispatches_for(&first.id), 1);

    // Tearing the view down discards whatever alert is in flight
    handle.shutdown().await?;
    assert!(!monitor.countdown().is_active().await);

    let dispatched = station.dispatch_count();
    sleep(Duration::from_secs(120)).await;
    assert_eq!(station.dispatch_count(), dispatched);
    println!("✅ Owner view lifecycle verified");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_owner_monitor_idle_without_monitoring_cameras() -> Result<()> {
    let config = Config::for_testing()?;
    let station = Arc::new(SimulatedStation::default());

    let monitor = Arc::new(OwnerMonitor::new(
        existing_user(),
        CameraRegistry::with_demo_cameras(),
        Arc::clone(&station),
        &config.alerts,
    )?);
    let handle = monitor.spawn();

    sleep(Duration::from_secs(20)).await;
    assert!(!monitor.countdown().is_active().await);

    // Turning monitoring on makes the camera eligible at the next scan
    let camera = monitor.registry().read().await.cameras()[0].id;
    monitor.registry().write().await.toggle_monitoring(&camera)?;
    sleep(Duration::from_millis(1_500)).await;
    assert!(monitor.countdown().is_active().await);

    handle.shutdown().await?;
    assert_eq!(station.dispatch_count(), 0);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_provider_monitor_collects_concurrent_incidents() -> Result<()> {
    println!("🚒 Testing provider incident board...");

    let config = Config::for_testing()?;
    let mut flow = AuthFlow::new(Role::Provider, &config.auth)?;
    flow.submit_password("firestation2024".to_string())?;
    let station_user = flow.complete_google().await?;

    let monitor = Arc::new(
        ProviderMonitor::new(station_user, Property::demo_properties(), &config.alerts)?
            .with_generator(IncidentGenerator::seeded(
                &config.alerts.provider_generator_config(),
                2024,
            )?),
    );
    let handle = monitor.spawn();

    sleep(Duration::from_millis(3_500)).await;
    let incidents = monitor.board().read().await.incidents().to_vec();
    assert_eq!(incidents.len(), 3);

    {
        let mut board = monitor.board().write().await;
        board.select(&incidents[1].id)?;
        board.resolve(&incidents[1].id)?;
        assert!(board.selected().is_none());
        assert_eq!(board.len(), 2);
    }

    handle.shutdown().await?;
    sleep(Duration::from_secs(30)).await;
    assert_eq!(monitor.board().read().await.len(), 2);
    println!("✅ Provider board verified");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_persists_session_to_disk() -> Result<()> {
    let config = Config::for_testing()?;
    let session = SessionManager::new(FileStore::new(&config.session.store_dir));

    assert!(session.restore()?.is_none());

    let mut flow = AuthFlow::new(Role::Owner, &config.auth)?;
    flow.submit_password(String::new())?;
    assert_eq!(flow.step(), AuthStep::Google);
    let user = flow.complete_google().await?;
    session.sign_in(&user)?;

    // A fresh manager over the same directory sees the same user
    let reloaded = SessionManager::from_config(&config.session);
    assert_eq!(reloaded.restore()?, Some(user));

    reloaded.sign_out()?;
    assert!(session.restore()?.is_none());

    std::fs::remove_dir_all(&config.session.store_dir).ok();
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_registry_edits_while_monitoring() -> Result<()> {
    let station = Arc::new(SimulatedStation::default());
    let monitor = OwnerMonitor::new(
        existing_user(),
        CameraRegistry::new(),
        station,
        &AlertConfig::default(),
    )?;

    let mut registry = monitor.registry().write().await;
    let before = registry.len();
    assert!(registry.add(CameraConfig::usb("")).is_err());
    assert_eq!(registry.len(), before);

    let id = registry.add(CameraConfig::rtsp("Porch", "rtsp://192.168.1.7:554/live"))?;
    registry.select(&id)?;
    registry.remove(&id)?;
    assert!(registry.selected().is_none());

    Ok(())
}
