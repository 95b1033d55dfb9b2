//! # Phomemo - Bluetooth Label Printer Library
//!
//! Phomemo is a Rust library for printing labels on Phomemo D30/D35 thermal
//! label printers over Bluetooth RFCOMM on Linux. It provides:
//!
//! - **Discovery**: find the paired printer, check its link, resolve its
//!   `/dev/rfcommN` device (via `bluetoothctl` and `rfcomm`)
//! - **Protocol implementation**: job header packets and raster encoding
//! - **Transport**: raw-mode serial device with a bounded open
//! - **Print session**: ordered, flushed delivery of one job
//!
//! ## Quick Start
//!
//! ```no_run
//! use phomemo::{Phomemo, RasterImage, Settings};
//!
//! // Find the paired D30/D35
//! let printer = Phomemo::discover(&Settings::default())?;
//! println!("{}", printer.summary()?);
//!
//! // A 320x96 label with a solid bar on the left
//! let mut pixels = vec![0u8; 320 * 96];
//! for row in pixels.chunks_mut(320) {
//!     row[..16].fill(255);
//! }
//! let label = RasterImage::new(320, 96, pixels)?;
//!
//! printer.print_image(&label)?;
//!
//! # Ok::<(), phomemo::PhomemoError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`discovery`] | Device locator, link state, port resolver |
//! | [`protocol`] | Job packets and raster encoding |
//! | [`transport`] | Serial device access |
//! | [`session`] | Print session state machine |
//! | [`printer`] | Printer profiles and the [`Phomemo`] handle |
//! | [`settings`] | Runtime settings file |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! - Phomemo D30 (12mm labels, 203 DPI, Bluetooth SPP)
//! - Phomemo D35
//!
//! The printer must already be paired and bound to an RFCOMM device; see
//! [`discovery`].

pub mod discovery;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod session;
pub mod settings;
pub mod transport;

// Re-exports for convenience
pub use error::PhomemoError;
pub use printer::{Phomemo, PrinterConfig};
pub use protocol::raster::RasterImage;
pub use settings::Settings;
