use std::error::Error;

use tokio::{sync::mpsc, task::JoinSet};

use crate::config::{PadConfig, SourceDeviceConfig};

use super::{
    device::DeviceNotifier,
    event::PadEvent,
    manager::{client::ManagerClient, Manager},
    source::{
        evdev::EvdevPad, replay::ReplaySource, InputError, SourceDriver, SourceDriverOptions,
    },
};

/// Run the pad manager along with every source device in the given config.
/// Region events are sent to the given output channel. Returns once every
/// source device has stopped.
pub async fn run(
    config: &PadConfig,
    output: mpsc::Sender<PadEvent>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let notifier = DeviceNotifier::default();
    let mut manager = Manager::new(config.scheme, &notifier, output);
    for device in config.devices.iter() {
        if let Some(scheme) = device.scheme {
            manager.set_scheme_override(device.id.clone(), scheme);
        }
    }
    let client = manager.client();
    let manager_task = tokio::spawn(async move { manager.run().await });

    let mut sources = JoinSet::new();
    for device in config.devices.iter() {
        if let Err(e) = spawn_source(&mut sources, device, &client, &notifier) {
            log::error!("Unable to start source device '{}': {e}", device.id);
        }
    }
    if sources.is_empty() {
        log::warn!("No source devices were started");
    }

    while let Some(result) = sources.join_next().await {
        match result {
            Ok(Ok(())) => (),
            Ok(Err(e)) => log::debug!("Source device task failed: {e}"),
            Err(e) => log::error!("Source device task panicked: {e}"),
        }
    }

    log::debug!("All source devices stopped. Stopping pad manager.");
    client.stop().await?;
    manager_task.await??;

    Ok(())
}

/// Open the given source device and start polling it
fn spawn_source(
    tasks: &mut JoinSet<Result<(), InputError>>,
    config: &SourceDeviceConfig,
    client: &ManagerClient,
    notifier: &DeviceNotifier,
) -> Result<(), InputError> {
    let options = SourceDriverOptions {
        poll_rate: config.poll_rate(),
        ..Default::default()
    };

    if let Some(evdev) = config.evdev.as_ref() {
        let device = EvdevPad::new(evdev)?;
        let driver = SourceDriver::new_with_options(
            config.id.clone(),
            device,
            client.clone(),
            notifier.clone(),
            options,
        );
        tasks.spawn(driver.run());
        return Ok(());
    }

    if let Some(replay) = config.replay.as_ref() {
        let device = ReplaySource::open(&replay.path)?;
        let driver = SourceDriver::new_with_options(
            config.id.clone(),
            device,
            client.clone(),
            notifier.clone(),
            options,
        );
        tasks.spawn(driver.run());
        return Ok(());
    }

    log::warn!("Source device '{}' has no evdev or replay section", config.id);
    Ok(())
}
