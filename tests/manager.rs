use std::error::Error;

use remotepad::input::{
    classifier::Scheme,
    device::{DeviceNotifier, DpadMode},
    event::{PadEvent, RegionEvent},
    manager::Manager,
    region::{Corner, DpadRegion, Side},
    sample::AxisSample,
};
use tokio::sync::mpsc;

/// Drain every event left in the output channel once the manager has stopped
async fn collect_events(mut rx: mpsc::Receiver<PadEvent>) -> Vec<PadEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn press(device: &str, region: impl Into<DpadRegion>) -> PadEvent {
    PadEvent::new(device.to_string(), RegionEvent::Press(region.into()))
}

fn release(device: &str, region: impl Into<DpadRegion>) -> PadEvent {
    PadEvent::new(device.to_string(), RegionEvent::Release(region.into()))
}

#[tokio::test]
async fn test_manager_emits_region_events() -> Result<(), Box<dyn Error>> {
    let notifier = DeviceNotifier::default();
    let (tx, rx) = mpsc::channel(32);
    let mut manager = Manager::new(Scheme::Corner, &notifier, tx);
    let client = manager.client();
    let task = tokio::spawn(async move { manager.run().await });

    notifier.connected("pad", "Test pad", DpadMode::Absolute);
    let samples = [(0.0, 0.0), (-0.5, 0.5), (-0.5, 0.5), (0.0, 0.0), (0.5, -0.5)];
    for sample in samples {
        client
            .process_sample("pad".to_string(), AxisSample::from(sample))
            .await?;
    }

    let region = client.get_active_region("pad".to_string()).await?;
    assert_eq!(region, Some(DpadRegion::Corner(Corner::BottomRight)));

    client.stop().await?;
    assert!(task.await?.is_ok());

    let events = collect_events(rx).await;
    assert_eq!(
        events,
        vec![
            press("pad", Corner::TopLeft),
            release("pad", Corner::TopLeft),
            press("pad", Corner::BottomRight),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_manager_drops_unknown_device() -> Result<(), Box<dyn Error>> {
    let notifier = DeviceNotifier::default();
    let (tx, rx) = mpsc::channel(32);
    let mut manager = Manager::new(Scheme::Side, &notifier, tx);
    let client = manager.client();
    let task = tokio::spawn(async move { manager.run().await });

    client
        .process_sample("ghost".to_string(), AxisSample::new(0.0, 0.9))
        .await?;
    assert!(client.get_devices().await?.is_empty());
    assert_eq!(client.get_active_region("ghost".to_string()).await?, None);

    client.stop().await?;
    assert!(task.await?.is_ok());
    assert!(collect_events(rx).await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_manager_scheme_override_and_mode() -> Result<(), Box<dyn Error>> {
    let notifier = DeviceNotifier::default();
    let (tx, rx) = mpsc::channel(32);
    let mut manager = Manager::new(Scheme::Side, &notifier, tx);
    manager.set_scheme_override("stick".to_string(), Scheme::Corner);
    let client = manager.client();
    let task = tokio::spawn(async move { manager.run().await });

    notifier.connected("stick", "Thumbstick", DpadMode::Absolute);
    notifier.connected("pad", "Touchpad", DpadMode::Absolute);
    notifier.mode_changed("stick", DpadMode::Slide);

    client
        .process_sample("pad".to_string(), AxisSample::new(0.9, 0.0))
        .await?;
    client
        .process_sample("stick".to_string(), AxisSample::new(0.5, 0.5))
        .await?;

    let devices = client.get_devices().await?;
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id, "pad");
    assert_eq!(devices[0].scheme, Scheme::Side);
    assert_eq!(devices[0].mode, DpadMode::Absolute);
    assert_eq!(devices[0].active_region, DpadRegion::Side(Side::Right));
    assert_eq!(devices[1].id, "stick");
    assert_eq!(devices[1].scheme, Scheme::Corner);
    assert_eq!(devices[1].mode, DpadMode::Slide);
    assert_eq!(devices[1].active_region, DpadRegion::Corner(Corner::TopRight));

    client.stop().await?;
    assert!(task.await?.is_ok());

    let events = collect_events(rx).await;
    assert_eq!(
        events,
        vec![press("pad", Side::Right), press("stick", Corner::TopRight)]
    );

    Ok(())
}

#[tokio::test]
async fn test_manager_disconnect_keeps_queued_samples() -> Result<(), Box<dyn Error>> {
    let notifier = DeviceNotifier::default();
    let (tx, rx) = mpsc::channel(32);
    let mut manager = Manager::new(Scheme::Side, &notifier, tx);
    let client = manager.client();
    let task = tokio::spawn(async move { manager.run().await });

    notifier.connected("pad", "Touchpad", DpadMode::Absolute);
    client
        .process_sample("pad".to_string(), AxisSample::new(-0.9, 0.0))
        .await?;
    notifier.disconnected("pad");

    // The first query may have been queued before the disconnect was seen
    client.get_devices().await?;
    assert!(client.get_devices().await?.is_empty());

    // Samples after the disconnect are dropped
    client
        .process_sample("pad".to_string(), AxisSample::new(0.0, 0.0))
        .await?;

    client.stop().await?;
    assert!(task.await?.is_ok());

    // No release is forced when a device goes away
    let events = collect_events(rx).await;
    assert_eq!(events, vec![press("pad", Side::Left)]);

    Ok(())
}

#[tokio::test]
async fn test_manager_reconnect_resets_state() -> Result<(), Box<dyn Error>> {
    let notifier = DeviceNotifier::default();
    let (tx, rx) = mpsc::channel(32);
    let mut manager = Manager::new(Scheme::Side, &notifier, tx);
    let client = manager.client();
    let task = tokio::spawn(async move { manager.run().await });

    notifier.connected("pad", "Touchpad", DpadMode::Absolute);
    client
        .process_sample("pad".to_string(), AxisSample::new(0.0, 0.9))
        .await?;
    let region = client.get_active_region("pad".to_string()).await?;
    assert_eq!(region, Some(DpadRegion::Side(Side::Up)));

    notifier.connected("pad", "Touchpad", DpadMode::Absolute);
    client
        .process_sample("pad".to_string(), AxisSample::new(0.0, 0.9))
        .await?;

    client.stop().await?;
    assert!(task.await?.is_ok());

    let events = collect_events(rx).await;
    assert_eq!(events, vec![press("pad", Side::Up), press("pad", Side::Up)]);

    Ok(())
}
