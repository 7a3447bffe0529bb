use tokio::sync::mpsc;

use crate::input::{region::DpadRegion, sample::AxisSample};

use super::DeviceSummary;

/// Manager commands define all the different ways to interact with the
/// [super::Manager] over a channel. These commands are processed in an
/// asynchronous task and dispatched as they come in.
#[derive(Debug, Clone)]
pub enum ManagerCommand {
    /// Classify a sample from the given device
    ProcessSample(String, AxisSample),
    /// Get the active region of the given device, or `None` if the device is
    /// not connected
    GetActiveRegion(String, mpsc::Sender<Option<DpadRegion>>),
    /// Get a summary of every connected device
    GetDevices(mpsc::Sender<Vec<DeviceSummary>>),
    Stop,
}
