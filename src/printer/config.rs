//! # Printer Configuration
//!
//! Hardware profiles for the supported Phomemo label printers. The list of
//! profiles doubles as the device registry: discovery only accepts paired
//! devices whose Bluetooth name equals one of these model names.
//!
//! ## Supported Printers
//!
//! | Model | Width (dots) | Resolution | Label height | Rows per chunk |
//! |-------|--------------|------------|--------------|----------------|
//! | D30 | 320 | 203 DPI | 96 | 255 |
//! | D35 | 320 | 203 DPI | 96 | 255 |
//!
//! ## Usage
//!
//! ```
//! use phomemo::printer::PrinterConfig;
//!
//! let config = PrinterConfig::by_name("D30").unwrap();
//! println!("Print width: {} dots ({} bytes)",
//!          config.width_dots,
//!          config.width_bytes);
//! ```

/// # Printer Configuration
///
/// Defines the hardware characteristics of a label printer.
///
/// ## Physical Properties
///
/// - **width_dots**: Print width in dots; the raster encoder expects images
///   exactly this wide
/// - **width_bytes**: Width in bytes (width_dots / 8)
/// - **label_height**: Height of the stock 40x12mm label in dots
///
/// ## Protocol Limits
///
/// - **max_chunk_rows**: Maximum rows per raster command, used by
///   [`raster::encode_for`](crate::protocol::raster::encode_for). Values
///   above 255 are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Model name as advertised over Bluetooth
    pub name: &'static str,

    /// Print width in dots (pixels)
    pub width_dots: u16,

    /// Print width in bytes (width_dots / 8)
    pub width_bytes: u16,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Label height in dots
    pub label_height: u16,

    /// Maximum rows per raster chunk
    pub max_chunk_rows: u16,
}

/// Every model the locator recognizes, in registry order.
pub const KNOWN_PRINTERS: &[PrinterConfig] = &[PrinterConfig::D30, PrinterConfig::D35];

impl PrinterConfig {
    /// # Phomemo D30
    ///
    /// Handheld label maker, 12mm tape.
    pub const D30: Self = Self {
        name: "D30",
        width_dots: 320,
        width_bytes: 40,
        dpi: 203,
        label_height: 96,
        max_chunk_rows: 255,
    };

    /// # Phomemo D35
    ///
    /// Same print head and command set as the D30.
    pub const D35: Self = Self {
        name: "D35",
        width_dots: 320,
        width_bytes: 40,
        dpi: 203,
        label_height: 96,
        max_chunk_rows: 255,
    };

    /// Look up a model by its exact Bluetooth name.
    ///
    /// Matching is case-sensitive and does not trim: `"D30 "` is not a D30.
    ///
    /// ```
    /// use phomemo::printer::PrinterConfig;
    ///
    /// assert_eq!(PrinterConfig::by_name("D35"), Some(&PrinterConfig::D35));
    /// assert_eq!(PrinterConfig::by_name("d30"), None);
    /// ```
    pub fn by_name(name: &str) -> Option<&'static PrinterConfig> {
        KNOWN_PRINTERS.iter().find(|p| p.name == name)
    }

    /// Names of all recognized models.
    pub fn known_names() -> impl Iterator<Item = &'static str> {
        KNOWN_PRINTERS.iter().map(|p| p.name)
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::D30
    }
}

// ============================================================================
// TESTS
// ============================================================================
