//! # Printer Discovery
//!
//! Finds a paired Phomemo printer and the serial device it is reachable on.
//!
//! ## Layers
//!
//! | Module | Question answered | OS tool |
//! |--------|-------------------|---------|
//! | [`locator`] | Which paired device is a D30/D35? | `bluetoothctl devices` |
//! | [`link`] | Is it connected with Serial Port profile? | `bluetoothctl info <addr>` |
//! | [`port`] | Which `/dev/rfcommN` is bound to it? | `rfcomm --device <addr>` |
//!
//! The OS tools are reached through two traits, [`BluetoothInspector`] and
//! [`PortBinder`]. [`SystemTools`] implements both by running the real
//! binaries; everything above it only parses text, so it can be driven with
//! fixture output.
//!
//! ## Bluetooth Setup (Linux)
//!
//! The printer must already be paired and bound to an RFCOMM device:
//!
//! ```bash
//! $ bluetoothctl
//! [bluetooth]# scan on
//! # Look for "D30" and note its address
//! [bluetooth]# pair AA:BB:CC:DD:EE:FF
//! [bluetooth]# connect AA:BB:CC:DD:EE:FF
//!
//! $ sudo rfcomm bind 0 AA:BB:CC:DD:EE:FF 1
//! # This creates /dev/rfcomm0
//! ```

pub mod link;
pub mod locator;
pub mod port;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;

pub use link::{LinkInspector, LinkState};
pub use locator::{DeviceLocator, PrinterIdentity};
pub use port::{PortResolver, SerialEndpoint};
pub use system::SystemTools;

use crate::error::PhomemoError;

/// Access to the OS Bluetooth manager.
///
/// Implementations return the tool's raw stdout. Failing to run the tool at
/// all is an error; empty output is not.
pub trait BluetoothInspector {
    /// Output of the paired-device listing (`bluetoothctl devices`).
    fn list_devices(&self) -> Result<String, PhomemoError>;

    /// Output of the per-device info query (`bluetoothctl info <address>`).
    fn device_info(&self, address: &str) -> Result<String, PhomemoError>;
}

/// Access to the OS RFCOMM binding table.
pub trait PortBinder {
    /// Output of the binding query for `address` (`rfcomm --device <address>`).
    fn rfcomm_bindings(&self, address: &str) -> Result<String, PhomemoError>;
}

impl<T: BluetoothInspector + ?Sized> BluetoothInspector for &T {
    fn list_devices(&self) -> Result<String, PhomemoError> {
        (**self).list_devices()
    }

    fn device_info(&self, address: &str) -> Result<String, PhomemoError> {
        (**self).device_info(address)
    }
}

impl<T: PortBinder + ?Sized> PortBinder for &T {
    fn rfcomm_bindings(&self, address: &str) -> Result<String, PhomemoError> {
        (**self).rfcomm_bindings(address)
    }
}
