//! Runtime settings.
//!
//! Read from `config.toml` under the user config directory
//! (`~/.config/phomemo/config.toml` on Linux) or from an explicit path.
//! Every field has a default, so the file and each of its tables are
//! optional:
//!
//! ```toml
//! [tools]
//! bluetoothctl = "bluetoothctl"
//! rfcomm = "rfcomm"
//!
//! [serial]
//! device_prefix = "/dev/"
//! connect_timeout_secs = 10
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::port::DEFAULT_DEVICE_PREFIX;
use crate::error::PhomemoError;
use crate::transport::DEFAULT_CONNECT_TIMEOUT;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tools: ToolSettings,
    pub serial: SerialSettings,
}

/// Names or paths of the OS tools used for discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub bluetoothctl: String,
    pub rfcomm: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            bluetoothctl: "bluetoothctl".to_string(),
            rfcomm: "rfcomm".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Prepended to the RFCOMM channel id to form the device path.
    pub device_prefix: String,

    /// Bound on opening the serial device, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            device_prefix: DEFAULT_DEVICE_PREFIX.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs(),
        }
    }
}

impl SerialSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Settings {
    /// Default settings file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("phomemo").join("config.toml"))
    }

    /// Load settings.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used if present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, PhomemoError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path),
                None => {
                    debug!("no settings file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a settings file.
    pub fn from_file(path: &Path) -> Result<Self, PhomemoError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PhomemoError::Settings(format!("{}: {}", path.display(), e)))?;
        let settings = Self::parse(&content)
            .map_err(|e| PhomemoError::Settings(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
