pub mod evdev;
pub mod replay;


use std::{io, time::Duration};

use thiserror::Error;
use tokio::time::MissedTickBehavior;

use crate::config::PadAxis;

use super::{
    device::{DeviceNotifier, DpadMode},
    manager::client::{ClientError, ManagerClient},
    sample::AxisSample,
};

/// Possible errors while reading from a source device
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read from device: {0}")]
    Io(#[from] io::Error),
    #[error("system call failed: {0}")]
    Nix(#[from] nix::Error),
    #[error("invalid sample record on line {line}: {source}")]
    Decode {
        line: usize,
        source: serde_json::Error,
    },
    #[error("device does not report axis {0:?}")]
    MissingAxis(PadAxis),
    #[error("no more samples")]
    EndOfStream,
    #[error("failed to forward sample: {0}")]
    Client(#[from] ClientError),
}

/// Events produced by a [SampleSource]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceEvent {
    /// A new axis reading
    Sample(AxisSample),
    /// The user asked to switch between absolute and slide mode
    ToggleMode,
}

/// A device that produces axis samples when polled
pub trait SampleSource: Send {
    /// Human readable name of the device
    fn name(&self) -> String;

    /// Read any pending events without blocking. Returns
    /// [InputError::EndOfStream] when the source has nothing more to give.
    fn poll(&mut self) -> Result<Vec<SourceEvent>, InputError>;

    /// Switch how the source reports positions. Sources that only report
    /// absolute positions ignore this.
    fn set_mode(&mut self, _mode: DpadMode) {}
}

/// Options for running a [SourceDriver]
#[derive(Debug, Clone)]
pub struct SourceDriverOptions {
    pub poll_rate: Duration,
    pub mode: DpadMode,
}

impl Default for SourceDriverOptions {
    fn default() -> Self {
        Self {
            poll_rate: Duration::from_millis(crate::config::DEFAULT_POLL_RATE_MS),
            mode: DpadMode::Absolute,
        }
    }
}

/// Polls a [SampleSource] and forwards its samples to the pad manager. The
/// driver announces the device as connected when it starts and as
/// disconnected when the source fails or runs out of samples.
pub struct SourceDriver<T: SampleSource> {
    id: String,
    device: T,
    options: SourceDriverOptions,
    manager: ManagerClient,
    notifier: DeviceNotifier,
}

impl<T: SampleSource> SourceDriver<T> {
    pub fn new_with_options(
        id: String,
        device: T,
        manager: ManagerClient,
        notifier: DeviceNotifier,
        options: SourceDriverOptions,
    ) -> Self {
        Self {
            id,
            device,
            options,
            manager,
            notifier,
        }
    }

    /// Poll the source until it fails or runs out of samples
    pub async fn run(mut self) -> Result<(), InputError> {
        let name = self.device.name();
        log::info!("Starting source device '{}': {name}", self.id);
        self.device.set_mode(self.options.mode);
        self.notifier.connected(&self.id, &name, self.options.mode);

        let mut interval = tokio::time::interval(self.options.poll_rate);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let result = loop {
            interval.tick().await;
            let events = match self.device.poll() {
                Ok(events) => events,
                Err(InputError::EndOfStream) => {
                    log::debug!("Source device '{}' has no more samples", self.id);
                    break Ok(());
                }
                Err(e) => break Err(e),
            };
            if let Err(e) = self.process_events(events).await {
                break Err(e);
            }
        };

        if let Err(e) = result.as_ref() {
            log::error!("Source device '{}' stopped with error: {e}", self.id);
        }
        log::info!("Source device '{}' disconnected", self.id);
        self.notifier.disconnected(&self.id);

        result
    }

    async fn process_events(&mut self, events: Vec<SourceEvent>) -> Result<(), InputError> {
        for event in events {
            match event {
                SourceEvent::Sample(sample) => {
                    self.manager.process_sample(self.id.clone(), sample).await?;
                }
                SourceEvent::ToggleMode => {
                    self.options.mode = self.options.mode.toggled();
                    self.device.set_mode(self.options.mode);
                    log::debug!("Source device '{}' switched to {} mode", self.id, self.options.mode);
                    self.notifier.mode_changed(&self.id, self.options.mode);
                }
            }
        }

        Ok(())
    }
}
