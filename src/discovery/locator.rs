//! # Device Locator
//!
//! Picks the printer out of the paired-device listing.
//!
//! ## Listing Format
//!
//! ```text
//! Device 11:22:33:44:55:66 Living Room Speaker
//! Device AA:BB:CC:DD:EE:FF D30
//! ```
//!
//! Each line is split on single spaces into at most three fields: a flag
//! token, the address, and the name (which keeps its own spaces). The name
//! must equal a registry model name exactly. When several lines match, the
//! last one wins.

use std::fmt;

use tracing::{debug, info};

use super::BluetoothInspector;
use crate::error::PhomemoError;
use crate::printer::PrinterConfig;

/// A paired printer of a recognized model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterIdentity {
    pub model: &'static PrinterConfig,
    pub address: String,
}

impl PrinterIdentity {
    pub fn name(&self) -> &'static str {
        self.model.name
    }
}

impl fmt::Display for PrinterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.model.name, self.address)
    }
}

/// Parse a device listing. Returns the last line naming a known model.
pub fn parse_device_listing(listing: &str) -> Option<PrinterIdentity> {
    let mut found = None;

    for line in listing.lines() {
        let mut parts = line.splitn(3, ' ');
        let (Some(_flag), Some(address), Some(name)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        if let Some(model) = PrinterConfig::by_name(name) {
            debug!(address, name, "matched paired device");
            found = Some(PrinterIdentity {
                model,
                address: address.to_string(),
            });
        }
    }

    found
}

/// # Device Locator
///
/// Holds the identity found by the most recent [`locate`](Self::locate).
///
/// ```
/// use phomemo::discovery::{BluetoothInspector, DeviceLocator};
/// use phomemo::PhomemoError;
///
/// struct Listing;
///
/// impl BluetoothInspector for Listing {
///     fn list_devices(&self) -> Result<String, PhomemoError> {
///         Ok("Device AA:BB:CC:DD:EE:FF D30\n".to_string())
///     }
///     fn device_info(&self, _: &str) -> Result<String, PhomemoError> {
///         Ok(String::new())
///     }
/// }
///
/// let mut locator = DeviceLocator::new(Listing);
/// let printer = locator.locate()?.unwrap();
/// assert_eq!(printer.address, "AA:BB:CC:DD:EE:FF");
/// # Ok::<(), PhomemoError>(())
/// ```
#[derive(Debug)]
pub struct DeviceLocator<I> {
    inspector: I,
    identity: Option<PrinterIdentity>,
}

impl<I: BluetoothInspector> DeviceLocator<I> {
    pub fn new(inspector: I) -> Self {
        Self {
            inspector,
            identity: None,
        }
    }

    /// Query paired devices and cache the result.
    ///
    /// `Ok(None)` means no paired device of a known model; that is a normal
    /// outcome. Only a failure to run the listing tool is an error, and it
    /// leaves the previous result in place.
    pub fn locate(&mut self) -> Result<Option<&PrinterIdentity>, PhomemoError> {
        let listing = self.inspector.list_devices()?;
        self.identity = parse_device_listing(&listing);

        match &self.identity {
            Some(id) => info!(model = id.name(), address = %id.address, "found printer"),
            None => info!("no paired printer of a known model"),
        }
        Ok(self.identity.as_ref())
    }

    /// Result of the last successful [`locate`](Self::locate).
    pub fn identity(&self) -> Option<&PrinterIdentity> {
        self.identity.as_ref()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::testing::FakeTools;

    #[test]
    fn test_no_match_is_none() {
        let listings = [
            "",
            "\n",
            "Device 11:22:33:44:55:66 Speaker\n",
            "Device 11:22:33:44:55:66 D30X\nDevice 22:33:44:55:66:77 d35\n",
            "Device AA:BB:CC:DD:EE:FF\n",
            "garbage",
        ];
        for listing in listings {
            assert_eq!(parse_device_listing(listing), None, "listing {:?}", listing);
        }
    }

    #[test]
    fn test_single_match() {
        let id = parse_device_listing("Device AA:BB:CC:DD:EE:FF D30\n").unwrap();
        assert_eq!(id.address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(id.name(), "D30");
    }

    #[test]
    fn test_last_match_wins() {
        let listing = "\
Device 11:11:11:11:11:11 D30
Device 22:22:22:22:22:22 Headphones
Device 33:33:33:33:33:33 D35
Device 44:44:44:44:44:44 Keyboard
";
        let id = parse_device_listing(listing).unwrap();
        assert_eq!(id.address, "33:33:33:33:33:33");
        assert_eq!(id.name(), "D35");
    }

    #[test]
    fn test_name_keeps_spaces() {
        // "Phomemo D30" is a different name, not a D30
        assert_eq!(
            parse_device_listing("Device AA:BB:CC:DD:EE:FF Phomemo D30\n"),
            None
        );
    }

    #[test]
    fn test_locate_caches_and_refreshes() {
        let tools = FakeTools::new("Device AA:BB:CC:DD:EE:FF D35\n", "", "");
        let mut locator = DeviceLocator::new(&tools);
        assert!(locator.identity().is_none());

        locator.locate().unwrap();
        assert_eq!(locator.identity().map(|i| i.name()), Some("D35"));

        let tools = FakeTools::new("Device 11:22:33:44:55:66 Mouse\n", "", "");
        let mut locator = DeviceLocator::new(&tools);
        assert!(locator.locate().unwrap().is_none());
        assert!(locator.identity().is_none());
    }

    #[test]
    fn test_display() {
        let id = parse_device_listing("Device AA:BB:CC:DD:EE:FF D30").unwrap();
        assert_eq!(id.to_string(), "D30 (AA:BB:CC:DD:EE:FF)");
    }
}
