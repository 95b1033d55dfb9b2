//! # Printer Transport Layer
//!
//! Byte-stream access to the printer.
//!
//! ## Available Transports
//!
//! - [`serial`]: RFCOMM serial device (`/dev/rfcommN`, Linux)
//!
//! Sessions open ports through the [`PortOpener`] trait so tests can stand in
//! an in-memory port.

pub mod serial;

pub use serial::{DEFAULT_CONNECT_TIMEOUT, PortOpener, SerialOpener, SerialTransport};
