pub mod client;
pub mod command;

use std::{collections::HashMap, error::Error};

use serde::Serialize;
use tabled::Tabled;
use tokio::sync::{broadcast, broadcast::error::RecvError, mpsc};

use crate::input::{
    classifier::Scheme,
    device::{DeviceEvent, DeviceNotifier, DpadMode},
    event::PadEvent,
    region::DpadRegion,
    sample::AxisSample,
    tracker::SchemeTracker,
};

use self::{client::ManagerClient, command::ManagerCommand};

/// Size of the command channel buffer for processing samples and commands.
const BUFFER_SIZE: usize = 16384;

/// Summary of a connected device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct DeviceSummary {
    pub id: String,
    pub name: String,
    pub scheme: Scheme,
    pub mode: DpadMode,
    #[tabled(rename = "active region")]
    pub active_region: DpadRegion,
}

/// A disconnected device waiting for the commands queued ahead of its
/// disconnect to be processed
#[derive(Debug)]
struct PendingRemoval {
    id: String,
    session: u64,
    remaining: usize,
}

/// State kept for each connected device
#[derive(Debug)]
struct ManagedPad {
    name: String,
    mode: DpadMode,
    session: u64,
    tracker: SchemeTracker,
}

/// Manages one region tracker per connected input device.
///
/// The [Manager] listens for device lifecycle events to know which devices
/// exist, classifies the samples they send over its command channel, and
/// forwards every resulting region event to the output channel.
pub struct Manager {
    /// The transmit side of the [rx] channel used to send [ManagerCommand]
    /// messages. This can be cloned to create clients.
    tx: mpsc::Sender<ManagerCommand>,
    /// The receive side of the channel used to listen for [ManagerCommand]
    /// messages from clients.
    rx: mpsc::Receiver<ManagerCommand>,
    /// Devices that disconnected while commands were still queued
    pending_removals: Vec<PendingRemoval>,
    /// Lifecycle events published by source devices
    device_events: broadcast::Receiver<DeviceEvent>,
    /// Destination for region events
    output: mpsc::Sender<PadEvent>,
    /// Default classification scheme for new devices
    scheme: Scheme,
    /// Classification schemes for specific device ids
    scheme_overrides: HashMap<String, Scheme>,
    /// Currently connected devices by id
    devices: HashMap<String, ManagedPad>,
    next_session: u64,
}

impl Manager {
    /// Returns a new [Manager]. The manager subscribes to the given notifier
    /// immediately, so it observes every device event published after this
    /// call.
    pub fn new(scheme: Scheme, notifier: &DeviceNotifier, output: mpsc::Sender<PadEvent>) -> Self {
        let (tx, rx) = mpsc::channel(BUFFER_SIZE);
        Self {
            tx,
            rx,
            pending_removals: Vec::new(),
            device_events: notifier.subscribe(),
            output,
            scheme,
            scheme_overrides: HashMap::new(),
            devices: HashMap::new(),
            next_session: 0,
        }
    }

    /// Use the given scheme for the device with the given id
    pub fn set_scheme_override(&mut self, device_id: String, scheme: Scheme) {
        self.scheme_overrides.insert(device_id, scheme);
    }

    /// Returns a client that can be used to send commands to the manager
    pub fn client(&self) -> ManagerClient {
        self.tx.clone().into()
    }

    /// Starts listening for device events and [ManagerCommand] messages and
    /// dispatches them until a [ManagerCommand::Stop] is received.
    pub async fn run(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        log::debug!("Starting pad manager with {} scheme", self.scheme);
        let mut listening = true;

        loop {
            // Device events are polled first so that a device is known before
            // the first sample it sends is processed.
            tokio::select! {
                biased;
                event = self.device_events.recv(), if listening => match event {
                    Ok(event) => self.on_device_event(event),
                    Err(RecvError::Lagged(count)) => {
                        log::warn!("Missed {count} device event(s)");
                    }
                    Err(RecvError::Closed) => {
                        log::debug!("Device notifier closed");
                        listening = false;
                    }
                },
                cmd = self.rx.recv() => {
                    let Some(cmd) = cmd else {
                        break;
                    };
                    log::trace!("Received command: {cmd:?}");
                    if matches!(cmd, ManagerCommand::Stop) {
                        break;
                    }
                    self.on_command(cmd).await;
                    self.on_command_processed();
                }
            }
        }

        log::debug!("Pad manager stopped");
        Ok(())
    }

    /// Handle the given device lifecycle event
    fn on_device_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Connected { id, name, mode } => {
                let scheme = self
                    .scheme_overrides
                    .get(&id)
                    .copied()
                    .unwrap_or(self.scheme);
                log::info!("Device connected: {id} ({name}) using {scheme} scheme in {mode} mode");
                if self.devices.contains_key(&id) {
                    log::warn!("Device {id} was already connected. Resetting its state.");
                }
                let session = self.next_session;
                self.next_session += 1;
                let pad = ManagedPad {
                    name,
                    mode,
                    session,
                    tracker: SchemeTracker::new(scheme),
                };
                self.devices.insert(id, pad);
            }
            DeviceEvent::Disconnected { id } => {
                let Some(session) = self.devices.get(&id).map(|pad| pad.session) else {
                    log::debug!("Ignoring disconnect of unknown device: {id}");
                    return;
                };
                // Samples sent before the disconnect may still be queued, so
                // only remove the device once those commands are processed.
                let remaining = self.rx.len();
                if remaining == 0 {
                    self.remove_device(&id, session);
                    return;
                }
                log::trace!("Removing device {id} after {remaining} queued command(s)");
                self.pending_removals.push(PendingRemoval {
                    id,
                    session,
                    remaining,
                });
            }
            DeviceEvent::ModeChanged { id, mode } => {
                let Some(pad) = self.devices.get_mut(&id) else {
                    log::debug!("Ignoring mode change of unknown device: {id}");
                    return;
                };
                log::info!("Device {id} switched to {mode} mode");
                pad.mode = mode;
            }
        }
    }

    /// Remove disconnected devices whose queued commands have all been
    /// processed
    fn on_command_processed(&mut self) {
        if self.pending_removals.is_empty() {
            return;
        }
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_removals)
            .into_iter()
            .map(|mut removal| {
                removal.remaining = removal.remaining.saturating_sub(1);
                removal
            })
            .partition(|removal| removal.remaining == 0);
        self.pending_removals = waiting;
        for removal in ready {
            self.remove_device(&removal.id, removal.session);
        }
    }

    fn remove_device(&mut self, id: &str, session: u64) {
        let is_same_session = self
            .devices
            .get(id)
            .map(|pad| pad.session == session)
            .unwrap_or(false);
        if !is_same_session {
            return;
        }
        let Some(pad) = self.devices.remove(id) else {
            return;
        };
        let region = pad.tracker.active_region();
        if !region.is_none() {
            log::debug!("Abandoning active region {region} of device {id}");
        }
        log::info!("Device disconnected: {id} ({})", pad.name);
    }

    /// Handle the given command
    async fn on_command(&mut self, cmd: ManagerCommand) {
        match cmd {
            ManagerCommand::ProcessSample(id, sample) => {
                self.process_sample(id, sample).await;
            }
            ManagerCommand::GetActiveRegion(id, sender) => {
                let region = self.devices.get(&id).map(|pad| pad.tracker.active_region());
                if let Err(e) = sender.send(region).await {
                    log::error!("Failed to send active region: {e:?}");
                }
            }
            ManagerCommand::GetDevices(sender) => {
                if let Err(e) = sender.send(self.summaries()).await {
                    log::error!("Failed to send device list: {e:?}");
                }
            }
            ManagerCommand::Stop => (),
        }
    }

    /// Classify the given sample and forward any region events
    async fn process_sample(&mut self, id: String, sample: AxisSample) {
        let Some(pad) = self.devices.get_mut(&id) else {
            log::debug!("Dropping sample from unknown device {id}: {sample:?}");
            return;
        };
        let transition = pad.tracker.handle_sample(sample.x, sample.y);
        for event in transition {
            let event = PadEvent::new(id.clone(), event);
            log::debug!("Region event: {event}");
            if let Err(e) = self.output.send(event).await {
                log::warn!("Unable to forward region event: {e}");
            }
        }
    }

    /// Returns a summary of every connected device sorted by id
    fn summaries(&self) -> Vec<DeviceSummary> {
        let mut summaries: Vec<DeviceSummary> = self
            .devices
            .iter()
            .map(|(id, pad)| DeviceSummary {
                id: id.clone(),
                name: pad.name.clone(),
                scheme: pad.tracker.scheme(),
                mode: pad.mode,
                active_region: pad.tracker.active_region(),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }
}
