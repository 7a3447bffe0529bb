pub mod path;


use std::{io, path::Path, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::classifier::Scheme;

/// Default rate at which source devices are polled for new samples
pub const DEFAULT_POLL_RATE_MS: u64 = 8;

/// Default radius around the center of an evdev surface that counts as rest
pub const DEFAULT_DEADZONE: f64 = 0.05;

/// Represents all possible errors loading a [PadConfig]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
    #[error("No configuration file found")]
    NotFound,
}

/// Top level configuration for the remotepad service
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct PadConfig {
    pub version: u32,
    pub kind: String,
    pub name: String,
    /// Classification scheme used for devices that do not override it
    #[serde(default)]
    pub scheme: Scheme,
    /// How emitted region events are written
    pub output: Option<OutputConfig>,
    /// Source devices to read axis samples from
    #[serde(default)]
    pub devices: Vec<SourceDeviceConfig>,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            version: 1,
            kind: "RemotePad".to_string(),
            name: "Default".to_string(),
            scheme: Scheme::default(),
            output: None,
            devices: Vec::new(),
        }
    }
}

impl PadConfig {
    /// Load a [PadConfig] from the given YAML string
    pub fn from_yaml(content: String) -> Result<PadConfig, LoadError> {
        let config: PadConfig = serde_yaml::from_str(content.as_str())?;
        Ok(config)
    }

    /// Load a [PadConfig] from the given YAML file path
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<PadConfig, LoadError> {
        let file = std::fs::File::open(path)?;
        let config: PadConfig = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Returns the output format to use for emitted events
    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .map(|output| output.format)
            .unwrap_or_default()
    }

    /// Returns the device config with the given id
    pub fn get_device(&self, id: &str) -> Option<&SourceDeviceConfig> {
        self.devices.iter().find(|device| device.id == id)
    }
}

/// Output configuration for emitted region events
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Format of emitted region events
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Write events through the logger
    #[default]
    Log,
    /// Write one JSON object per event to stdout
    Json,
}

/// A source of axis samples
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct SourceDeviceConfig {
    /// Unique identifier used in emitted events
    pub id: String,
    /// Optional classification scheme override for this device
    pub scheme: Option<Scheme>,
    /// How often to poll the device in milliseconds
    pub poll_rate_ms: Option<u64>,
    /// Read samples from an evdev input device
    pub evdev: Option<EvdevConfig>,
    /// Read samples from a recorded sample file
    pub replay: Option<ReplayConfig>,
}

impl SourceDeviceConfig {
    /// Returns the scheme for this device, falling back to the given default
    pub fn scheme_or(&self, default: Scheme) -> Scheme {
        self.scheme.unwrap_or(default)
    }

    /// Returns the poll rate for this device
    pub fn poll_rate(&self) -> Duration {
        Duration::from_millis(self.poll_rate_ms.unwrap_or(DEFAULT_POLL_RATE_MS))
    }
}

/// Configuration for an evdev source device
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct EvdevConfig {
    /// Device node path (e.g. "/dev/input/event5")
    pub path: String,
    /// Axis to read horizontal deflection from
    #[serde(default = "default_x_axis")]
    pub x_axis: PadAxis,
    /// Axis to read vertical deflection from
    #[serde(default = "default_y_axis")]
    pub y_axis: PadAxis,
    /// Invert the Y axis. Evdev Y values grow downward, so this defaults to
    /// true to make "up" positive.
    pub invert_y: Option<bool>,
    /// Report a centered sample when the finger leaves the surface
    pub center_on_release: Option<bool>,
    /// Button that toggles between absolute and slide mode
    pub toggle_button: Option<ToggleButton>,
    /// Grab the device so that other applications do not see its events
    pub grab: Option<bool>,
    /// Samples closer than this to the center (0.0 - 1.0) are reported as
    /// the center
    pub deadzone: Option<f64>,
}

fn default_x_axis() -> PadAxis {
    PadAxis::X
}

fn default_y_axis() -> PadAxis {
    PadAxis::Y
}

impl EvdevConfig {
    pub fn invert_y(&self) -> bool {
        self.invert_y.unwrap_or(true)
    }

    pub fn center_on_release(&self) -> bool {
        self.center_on_release.unwrap_or(true)
    }

    pub fn grab(&self) -> bool {
        self.grab.unwrap_or(false)
    }

    pub fn deadzone(&self) -> f64 {
        self.deadzone.unwrap_or(DEFAULT_DEADZONE).clamp(0.0, 1.0)
    }
}

/// Absolute axes that can be used as a D-pad surface
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PadAxis {
    X,
    Y,
    Rx,
    Ry,
    Hat0x,
    Hat0y,
    MtPositionX,
    MtPositionY,
}

/// Buttons that can toggle the D-pad reporting mode
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToggleButton {
    /// Touchpad click
    Left,
    /// Gamepad south face button
    South,
    /// Gamepad select button
    Select,
}

/// Configuration for a recorded sample file
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ReplayConfig {
    /// Path to a newline-delimited JSON sample file
    pub path: String,
}

/// Load the configuration from the given path, or from the first config
/// found in the default search locations.
pub fn load_config(path: Option<&Path>) -> Result<PadConfig, LoadError> {
    if let Some(path) = path {
        log::debug!("Loading config from {path:?}");
        return PadConfig::from_yaml_path(path);
    }

    let Some(path) = path::find_config_file() else {
        return Err(LoadError::NotFound);
    };
    log::debug!("Loading config from {path:?}");
    PadConfig::from_yaml_path(path)
}
