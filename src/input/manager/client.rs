use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{channel, error::SendTimeoutError, Receiver, Sender};

use crate::input::{region::DpadRegion, sample::AxisSample};
use crate::sync::{ReceiveTimeoutError, TimeoutReceiver};

use super::{command::ManagerCommand, DeviceSummary};

/// Maximum duration to wait for a response from a command. If this timeout
/// is reached, that typically indicates a deadlock somewhere in the code.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Possible errors for a manager client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("service encountered an error processing the request: {0}")]
    ServiceError(String),
    #[error("manager no longer exists")]
    ChannelClosed,
}

/// A client for the pad manager
#[derive(Debug, Clone)]
pub struct ManagerClient {
    tx: Sender<ManagerCommand>,
}

impl From<Sender<ManagerCommand>> for ManagerClient {
    fn from(tx: Sender<ManagerCommand>) -> Self {
        ManagerClient::new(tx)
    }
}

impl ManagerClient {
    pub fn new(tx: Sender<ManagerCommand>) -> Self {
        Self { tx }
    }

    /// Send the given command to the manager. This method uses a timeout to
    /// detect potential deadlocks.
    async fn send(&self, cmd: ManagerCommand) -> Result<(), ClientError> {
        let result = self.tx.send_timeout(cmd, DEFAULT_TIMEOUT).await;
        let Err(err) = result else {
            return Ok(());
        };
        match err {
            SendTimeoutError::Timeout(ref cmd) => {
                log::error!("POSSIBLE DEADLOCK: timed out after {DEFAULT_TIMEOUT:?} sending command to manager: {cmd:?}");
                Err(ClientError::ServiceError(err.to_string()))
            }
            SendTimeoutError::Closed(_) => Err(ClientError::ChannelClosed),
        }
    }

    /// Use the given receiver to wait for a response from the manager.
    /// This method uses a timeout to detect potential deadlocks.
    async fn recv<T>(mut rx: Receiver<T>) -> Option<T>
    where
        T: Send + Sync,
    {
        let result = rx.recv_timeout(DEFAULT_TIMEOUT).await;
        let Err(err) = result else {
            return result.ok();
        };
        match err {
            ReceiveTimeoutError::Timeout => {
                log::error!("POSSIBLE DEADLOCK: timed out after {DEFAULT_TIMEOUT:?} waiting for response from manager");
                None
            }
            ReceiveTimeoutError::Closed => None,
        }
    }

    /// Process the given sample from the given device
    pub async fn process_sample(&self, device_id: String, sample: AxisSample) -> Result<(), ClientError> {
        self.send(ManagerCommand::ProcessSample(device_id, sample))
            .await
    }

    /// Returns the active region of the given device, or `None` if no device
    /// with that id is connected.
    pub async fn get_active_region(&self, device_id: String) -> Result<Option<DpadRegion>, ClientError> {
        let (tx, rx) = channel(1);
        self.send(ManagerCommand::GetActiveRegion(device_id, tx))
            .await?;
        if let Some(region) = Self::recv(rx).await {
            return Ok(region);
        }
        Err(ClientError::ChannelClosed)
    }

    /// Returns a summary of all connected devices
    pub async fn get_devices(&self) -> Result<Vec<DeviceSummary>, ClientError> {
        let (tx, rx) = channel(1);
        self.send(ManagerCommand::GetDevices(tx)).await?;
        if let Some(devices) = Self::recv(rx).await {
            return Ok(devices);
        }
        Err(ClientError::ChannelClosed)
    }

    /// Stop the manager
    pub async fn stop(&self) -> Result<(), ClientError> {
        self.send(ManagerCommand::Stop).await
    }
}
