//! # Port Resolver
//!
//! Maps a printer address to its bound RFCOMM device.
//!
//! ```text
//! rfcomm0: AA:BB:CC:DD:EE:FF channel 1 clean
//! ^^^^^^^  -> /dev/rfcomm0
//! ```
//!
//! The binding table is only consulted once the link inspector reports the
//! device connected with the Serial Port profile.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{BluetoothInspector, LinkInspector, PortBinder};
use crate::error::PhomemoError;

/// Default device namespace for RFCOMM channels.
pub const DEFAULT_DEVICE_PREFIX: &str = "/dev/";

/// A local serial device bound to the printer.
///
/// Only valid while the link stays up; resolve again after a disconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialEndpoint {
    path: PathBuf,
}

impl SerialEndpoint {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for SerialEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Channel id (`rfcomm0`) from the last binding line that mentions `address`.
pub fn parse_rfcomm_binding<'a>(output: &'a str, address: &str) -> Option<&'a str> {
    output
        .lines()
        .filter(|line| line.contains(address))
        .filter_map(|line| line.split_once(':').map(|(id, _)| id.trim()))
        .last()
        .filter(|id| !id.is_empty())
}

/// # Port Resolver
#[derive(Debug, Clone)]
pub struct PortResolver<T> {
    tools: T,
    device_prefix: String,
}

impl<T: BluetoothInspector + PortBinder> PortResolver<T> {
    pub fn new(tools: T) -> Self {
        Self::with_prefix(tools, DEFAULT_DEVICE_PREFIX)
    }

    pub fn with_prefix(tools: T, device_prefix: &str) -> Self {
        Self {
            tools,
            device_prefix: device_prefix.to_string(),
        }
    }

    /// Serial device for `address`.
    ///
    /// `Ok(None)` when the device is not connected with the Serial Port
    /// profile (the binding table is not queried at all), or when no binding
    /// mentions the address.
    pub fn resolve(&self, address: &str) -> Result<Option<SerialEndpoint>, PhomemoError> {
        if !LinkInspector::new(&self.tools).is_connected(address)? {
            debug!(address, "not connected, skipping rfcomm lookup");
            return Ok(None);
        }

        let output = self.tools.rfcomm_bindings(address)?;
        let Some(channel) = parse_rfcomm_binding(&output, address) else {
            debug!(address, "no rfcomm binding");
            return Ok(None);
        };

        let endpoint = SerialEndpoint::new(format!("{}{}", self.device_prefix, channel));
        info!(address, port = %endpoint, "resolved serial port");
        Ok(Some(endpoint))
    }
}
