//! Device lifecycle notifications
//!
//! Sources announce when they connect, disconnect or change their D-pad
//! reporting mode through a [DeviceNotifier]. The notifier is created once and
//! handed explicitly to every component that needs to publish or observe
//! these events.

use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default number of lifecycle events buffered for slow subscribers
const DEFAULT_CAPACITY: usize = 64;

/// How a device reports its D-pad surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DpadMode {
    /// The reported position is where the finger is on the surface
    #[default]
    Absolute,
    /// The reported position is relative to where the finger first landed
    Slide,
}

impl DpadMode {
    /// Returns the other mode
    pub fn toggled(&self) -> Self {
        match self {
            DpadMode::Absolute => DpadMode::Slide,
            DpadMode::Slide => DpadMode::Absolute,
        }
    }
}

impl Display for DpadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DpadMode::Absolute => write!(f, "absolute"),
            DpadMode::Slide => write!(f, "slide"),
        }
    }
}

/// Lifecycle events for input devices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    Connected {
        id: String,
        name: String,
        mode: DpadMode,
    },
    Disconnected {
        id: String,
    },
    ModeChanged {
        id: String,
        mode: DpadMode,
    },
}

impl DeviceEvent {
    /// Returns the id of the device this event is about
    pub fn device_id(&self) -> &str {
        match self {
            DeviceEvent::Connected { id, .. } => id,
            DeviceEvent::Disconnected { id } => id,
            DeviceEvent::ModeChanged { id, .. } => id,
        }
    }
}

/// Publishes [DeviceEvent] messages to any number of subscribers
#[derive(Debug, Clone)]
pub struct DeviceNotifier {
    tx: broadcast::Sender<DeviceEvent>,
}

impl Default for DeviceNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DeviceNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Returns a receiver for all events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.tx.subscribe()
    }

    /// Publish the given event. Events published while nobody is subscribed
    /// are dropped.
    pub fn publish(&self, event: DeviceEvent) {
        log::debug!("Publishing device event: {event:?}");
        if self.tx.send(event).is_err() {
            log::trace!("No subscribers for device event");
        }
    }

    /// Announce that the given device is connected
    pub fn connected(&self, id: &str, name: &str, mode: DpadMode) {
        self.publish(DeviceEvent::Connected {
            id: id.to_string(),
            name: name.to_string(),
            mode,
        });
    }

    /// Announce that the given device is gone
    pub fn disconnected(&self, id: &str) {
        self.publish(DeviceEvent::Disconnected { id: id.to_string() });
    }

    /// Announce that the given device switched reporting mode
    pub fn mode_changed(&self, id: &str, mode: DpadMode) {
        self.publish(DeviceEvent::ModeChanged {
            id: id.to_string(),
            mode,
        });
    }
}
