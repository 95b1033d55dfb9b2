//! # Phomemo Protocol Implementation
//!
//! Wire format for the D30/D35 label printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Fixed job header packets and the raster command header
//! - [`raster`]: Ink images, bit packing, and chunking
//! - [`job`]: Ordered write units for one print
//!
//! ## Usage Example
//!
//! ```
//! use phomemo::protocol::{job::PrintJob, raster::RasterImage};
//!
//! // A 320x96 label with a solid bar across the top 8 rows
//! let mut pixels = vec![0u8; 320 * 96];
//! pixels[..320 * 8].fill(255);
//! let image = RasterImage::new(320, 96, pixels)?;
//!
//! let job = PrintJob::from_image(&image);
//! let bytes = job.to_bytes();
//! // Send `job` to the printer via a PrintSession...
//! # assert!(!bytes.is_empty());
//! # Ok::<(), phomemo::PhomemoError>(())
//! ```

pub mod commands;
pub mod job;
pub mod raster;
