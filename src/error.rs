//! # Error Types
//!
//! This module defines error types used throughout the phomemo library.
//!
//! A printer that is simply not paired is not an error: discovery returns
//! `Ok(None)` for that case. The variants here separate "fix your Bluetooth
//! link" ([`PhomemoError::NotConnected`], [`PhomemoError::PortUnavailable`])
//! from "the link is up but the job broke" ([`PhomemoError::TransmissionFailed`]).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Where in a print job a write or flush failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// While sending job header control packet `packet` (0-based).
    Header { packet: usize },
    /// While sending raster chunk `index` (0-based).
    Chunk { index: usize },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Header { packet } => write!(f, "job header packet {}", packet),
            Stage::Chunk { index } => write!(f, "raster chunk {}", index),
        }
    }
}

/// Main error type for phomemo operations
#[derive(Debug, Error)]
pub enum PhomemoError {
    /// Paired device has no usable link (not connected, or no Serial Port profile)
    #[error("Printer not connected{}", address_suffix(.address))]
    NotConnected { address: Option<String> },

    /// Serial device could not be resolved or opened
    #[error("Printer port unavailable: {path}: {reason}")]
    PortUnavailable { path: String, reason: String },

    /// Write or flush failed part way through a print job
    #[error("Transmission failed at {stage}: {source}")]
    TransmissionFailed {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },

    /// Image file to print does not exist
    #[error("File not found: {}", .0.display())]
    InputFileMissing(PathBuf),

    /// An OS tool (bluetoothctl, rfcomm) could not be executed
    #[error("Failed to run '{tool}': {source}")]
    ToolFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Raster input does not describe a valid bitmap
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Settings file could not be read or parsed
    #[error("Settings error: {0}")]
    Settings(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn address_suffix(address: &Option<String>) -> String {
    address.as_ref().map(|a| format!(" ({})", a)).unwrap_or_default()
}

impl PhomemoError {
    /// True for errors the user fixes by (re)connecting the printer.
    pub fn is_link_problem(&self) -> bool {
        matches!(
            self,
            PhomemoError::NotConnected { .. } | PhomemoError::PortUnavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_connected_message() {
        let e = PhomemoError::NotConnected { address: None };
        assert_eq!(e.to_string(), "Printer not connected");

        let e = PhomemoError::NotConnected {
            address: Some("AA:BB:CC:DD:EE:FF".to_string()),
        };
        assert_eq!(e.to_string(), "Printer not connected (AA:BB:CC:DD:EE:FF)");
    }

    #[test]
    fn test_transmission_failed_names_stage() {
        let e = PhomemoError::TransmissionFailed {
            stage: Stage::Chunk { index: 2 },
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"),
        };
        assert_eq!(e.to_string(), "Transmission failed at raster chunk 2: gone");
        assert!(!e.is_link_problem());
    }

    #[test]
    fn test_link_problems_are_distinguishable() {
        let e = PhomemoError::PortUnavailable {
            path: "/dev/rfcomm0".to_string(),
            reason: "timed out".to_string(),
        };
        assert!(e.is_link_problem());
        assert!(PhomemoError::NotConnected { address: None }.is_link_problem());
    }
}
