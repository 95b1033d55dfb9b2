//! # Printer
//!
//! Hardware profiles ([`config`]) and the [`Phomemo`] handle that runs the
//! whole discover → check → resolve → print sequence.
//!
//! ## Usage
//!
//! ```no_run
//! use phomemo::{Phomemo, Settings};
//!
//! let settings = Settings::load(None)?;
//! let printer = Phomemo::discover(&settings)?;
//!
//! if !printer.is_connected()? {
//!     eprintln!("Printer not connected");
//!     std::process::exit(1);
//! }
//! printer.print_file("QR-part-42.png")?;
//!
//! # Ok::<(), phomemo::PhomemoError>(())
//! ```

pub mod config;

pub use config::{KNOWN_PRINTERS, PrinterConfig};

use std::path::Path;

use tracing::info;

use crate::discovery::{
    BluetoothInspector, DeviceLocator, LinkInspector, LinkState, PortBinder, PortResolver,
    PrinterIdentity, SerialEndpoint, SystemTools,
};
use crate::error::PhomemoError;
use crate::protocol::job::PrintJob;
use crate::protocol::raster::RasterImage;
use crate::session::PrintSession;
use crate::settings::{SerialSettings, Settings};
use crate::transport::{PortOpener, SerialOpener};

/// # Phomemo Printer Handle
///
/// Remembers the identity found by the last [`find`](Self::find). Link
/// state and the serial port are looked up again on every call, because
/// either can change whenever the printer is switched off or walks out of
/// range.
#[derive(Debug)]
pub struct Phomemo<T = SystemTools, O = SerialOpener> {
    tools: T,
    opener: O,
    serial: SerialSettings,
    identity: Option<PrinterIdentity>,
}

impl Phomemo {
    /// Handle backed by the real OS tools and serial devices, with
    /// discovery already run.
    pub fn discover(settings: &Settings) -> Result<Self, PhomemoError> {
        let mut printer = Self::new(
            SystemTools::new(&settings.tools),
            SerialOpener,
            settings.serial.clone(),
        );
        printer.find()?;
        Ok(printer)
    }
}

impl<T, O> Phomemo<T, O>
where
    T: BluetoothInspector + PortBinder,
    O: PortOpener,
{
    /// Handle with no identity yet; call [`find`](Self::find).
    pub fn new(tools: T, opener: O, serial: SerialSettings) -> Self {
        Self {
            tools,
            opener,
            serial,
            identity: None,
        }
    }

    /// (Re)run discovery. `Ok(None)` when no known model is paired.
    pub fn find(&mut self) -> Result<Option<&PrinterIdentity>, PhomemoError> {
        let mut locator = DeviceLocator::new(&self.tools);
        self.identity = locator.locate()?.cloned();
        Ok(self.identity.as_ref())
    }

    pub fn identity(&self) -> Option<&PrinterIdentity> {
        self.identity.as_ref()
    }

    /// Model name, or `"Printer Not Found"`.
    pub fn name(&self) -> &str {
        self.identity.as_ref().map_or("Printer Not Found", |i| i.name())
    }

    /// Raw Bluetooth info text. `None` when no printer was found or the
    /// query printed nothing.
    pub fn info(&self) -> Result<Option<String>, PhomemoError> {
        match &self.identity {
            Some(id) => LinkInspector::new(&self.tools).info(&id.address),
            None => Ok(None),
        }
    }

    pub fn link_state(&self) -> Result<LinkState, PhomemoError> {
        match &self.identity {
            Some(id) => LinkInspector::new(&self.tools).state(&id.address),
            None => Ok(LinkState::DeviceInfoUnavailable),
        }
    }

    pub fn is_connected(&self) -> Result<bool, PhomemoError> {
        Ok(self.link_state()?.is_connected())
    }

    /// Serial device bound to the printer, if connected and bound.
    pub fn port(&self) -> Result<Option<SerialEndpoint>, PhomemoError> {
        match &self.identity {
            Some(id) => PortResolver::with_prefix(&self.tools, &self.serial.device_prefix)
                .resolve(&id.address),
            None => Ok(None),
        }
    }

    /// One-line description, e.g. `Phomemo(D30,mac=AA:BB:CC:DD:EE:FF,port=/dev/rfcomm0)`.
    pub fn summary(&self) -> Result<String, PhomemoError> {
        let mac = self
            .identity
            .as_ref()
            .map_or("<MAC Address Not Found>", |i| i.address.as_str());
        let mut s = format!("Phomemo({},mac={}", self.name(), mac);
        if let Some(port) = self.port()? {
            s.push_str(&format!(",port={}", port));
        }
        s.push(')');
        Ok(s)
    }

    /// Print an image.
    ///
    /// ## Errors
    ///
    /// - `NotConnected` if no printer was found or its link is down
    /// - `PortUnavailable` if no RFCOMM binding exists or the device won't open
    /// - `TransmissionFailed` if the link drops mid-job
    pub fn print_image(&self, image: &RasterImage) -> Result<(), PhomemoError> {
        let id = self
            .identity
            .as_ref()
            .ok_or(PhomemoError::NotConnected { address: None })?;

        if !self.is_connected()? {
            return Err(PhomemoError::NotConnected {
                address: Some(id.address.clone()),
            });
        }

        let endpoint = self.port()?.ok_or_else(|| PhomemoError::PortUnavailable {
            path: id.address.clone(),
            reason: "no RFCOMM binding for device".to_string(),
        })?;

        let job = PrintJob::for_model(image, id.model);
        info!(
            printer = %id,
            width = image.width(),
            height = image.height(),
            "sending label"
        );
        PrintSession::new(&self.opener)
            .connect_timeout(self.serial.connect_timeout())
            .run(Some(&endpoint), &job)
    }

    /// Print an image file.
    ///
    /// The file is checked and decoded before the printer is contacted, so a
    /// typo in the path never touches Bluetooth.
    pub fn print_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PhomemoError> {
        let image = RasterImage::open(path)?;
        self.print_image(&image)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::testing::FakeTools;
    use std::io;
    use std::time::Duration;

    const LISTING: &str = "Device AA:BB:CC:DD:EE:FF D30\n";
    const CONNECTED: &str = "Connected: yes\nUUID: Serial Port (00001101)\n";
    const BINDING: &str = "rfcomm0: AA:BB:CC:DD:EE:FF channel 1 clean\n";

    /// Opener that must never be reached.
    struct NoOpen;

    impl PortOpener for NoOpen {
        type Port = io::Sink;

        fn open(&self, endpoint: &SerialEndpoint, _: Duration) -> io::Result<io::Sink> {
            panic!("unexpected open of {}", endpoint)
        }
    }

    fn printer(tools: &FakeTools) -> Phomemo<&FakeTools, NoOpen> {
        let mut p = Phomemo::new(tools, NoOpen, SerialSettings::default());
        p.find().unwrap();
        p
    }

    #[test]
    fn test_not_found_defaults() {
        let tools = FakeTools::new("", CONNECTED, BINDING);
        let p = printer(&tools);

        assert!(p.identity().is_none());
        assert_eq!(p.name(), "Printer Not Found");
        assert_eq!(p.info().unwrap(), None);
        assert!(!p.is_connected().unwrap());
        assert_eq!(p.port().unwrap(), None);
        assert_eq!(
            p.summary().unwrap(),
            "Phomemo(Printer Not Found,mac=<MAC Address Not Found>)"
        );
        // Nothing but the listing was queried
        assert_eq!(tools.calls.borrow().as_slice(), ["devices"]);
    }

    #[test]
    fn test_summary_with_port() {
        let tools = FakeTools::new(LISTING, CONNECTED, BINDING);
        let p = printer(&tools);
        assert_eq!(
            p.summary().unwrap(),
            "Phomemo(D30,mac=AA:BB:CC:DD:EE:FF,port=/dev/rfcomm0)"
        );
    }

    #[test]
    fn test_print_without_printer_is_not_connected() {
        let tools = FakeTools::new("", "", "");
        let err = printer(&tools)
            .print_image(&RasterImage::filled(320, 96, 0))
            .unwrap_err();
        assert!(matches!(err, PhomemoError::NotConnected { address: None }));
    }

    #[test]
    fn test_print_while_disconnected_fails_fast() {
        let tools = FakeTools::new(LISTING, "Connected: no\n", BINDING);
        let err = printer(&tools)
            .print_image(&RasterImage::filled(320, 96, 0))
            .unwrap_err();

        match err {
            PhomemoError::NotConnected { address } => {
                assert_eq!(address.as_deref(), Some("AA:BB:CC:DD:EE:FF"))
            }
            other => panic!("expected NotConnected, got {:?}", other),
        }
        assert!(!tools.called("rfcomm"));
    }

    #[test]
    fn test_print_without_binding_is_port_unavailable() {
        let tools = FakeTools::new(LISTING, CONNECTED, "");
        let err = printer(&tools)
            .print_image(&RasterImage::filled(320, 96, 0))
            .unwrap_err();
        assert!(matches!(err, PhomemoError::PortUnavailable { .. }));
    }

    #[test]
    fn test_print_missing_file_before_discovery_queries() {
        let tools = FakeTools::new(LISTING, CONNECTED, BINDING);
        let p = printer(&tools);
        tools.calls.borrow_mut().clear();

        let err = p.print_file("/nonexistent/label.png").unwrap_err();

        assert!(matches!(err, PhomemoError::InputFileMissing(_)));
        assert!(tools.calls.borrow().is_empty());
    }
}
