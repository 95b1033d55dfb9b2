//! # Link State Inspector
//!
//! Decides from `bluetoothctl info` output whether the printer can take a
//! print job right now. Two plain substring checks, no parsing:
//!
//! ```text
//! Device AA:BB:CC:DD:EE:FF (public)
//!         Name: D30
//!         Paired: yes
//!         Connected: yes                                  <- required
//!         UUID: Serial Port               (00001101-...)  <- required
//! ```
//!
//! A connected device without the Serial Port profile cannot print, so it
//! counts as not connected. Nothing is cached; every call re-runs the query.

use tracing::debug;

use super::BluetoothInspector;
use crate::error::PhomemoError;

const CONNECTED_MARKER: &str = "Connected: yes";
const SERIAL_PORT_MARKER: &str = "UUID: Serial Port";

/// Link state of a paired printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Connected and offering the Serial Port profile: printable
    ConnectedWithSerialPort,
    /// Connected, but no Serial Port profile
    ConnectedWithoutSerialPort,
    /// Info available, link down
    NotConnected,
    /// The info query printed nothing
    DeviceInfoUnavailable,
}

impl LinkState {
    /// Classify raw info text.
    ///
    /// ```
    /// use phomemo::discovery::LinkState;
    ///
    /// let info = "Connected: yes\nUUID: Serial Port (00001101-...)";
    /// assert_eq!(LinkState::classify(Some(info)), LinkState::ConnectedWithSerialPort);
    /// assert_eq!(LinkState::classify(None), LinkState::DeviceInfoUnavailable);
    /// ```
    pub fn classify(info: Option<&str>) -> Self {
        let Some(info) = info.filter(|s| !s.is_empty()) else {
            return LinkState::DeviceInfoUnavailable;
        };

        if !info.contains(CONNECTED_MARKER) {
            return LinkState::NotConnected;
        }
        if info.contains(SERIAL_PORT_MARKER) {
            LinkState::ConnectedWithSerialPort
        } else {
            LinkState::ConnectedWithoutSerialPort
        }
    }

    /// Only [`LinkState::ConnectedWithSerialPort`] can print.
    pub fn is_connected(self) -> bool {
        self == LinkState::ConnectedWithSerialPort
    }
}

/// # Link State Inspector
#[derive(Debug, Clone, Copy)]
pub struct LinkInspector<I> {
    inspector: I,
}

impl<I: BluetoothInspector> LinkInspector<I> {
    pub fn new(inspector: I) -> Self {
        Self { inspector }
    }

    /// Raw info text for `address`, or `None` if the query printed nothing.
    pub fn info(&self, address: &str) -> Result<Option<String>, PhomemoError> {
        let text = self.inspector.device_info(address)?;
        Ok(if text.is_empty() { None } else { Some(text) })
    }

    /// Fresh link state for `address`.
    pub fn state(&self, address: &str) -> Result<LinkState, PhomemoError> {
        let info = self.info(address)?;
        let state = LinkState::classify(info.as_deref());
        debug!(address, ?state, "link state");
        Ok(state)
    }

    /// True only when connected with the Serial Port profile.
    pub fn is_connected(&self, address: &str) -> Result<bool, PhomemoError> {
        Ok(self.state(address)?.is_connected())
    }
}
