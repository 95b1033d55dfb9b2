//! # Print Job
//!
//! The ordered write units for one image: the seven job header packets, then
//! one unit per raster chunk. Each unit is written and flushed on its own by
//! [`crate::session::PrintSession`].

use super::commands;
use super::raster::{self, Chunk, RasterImage};
use crate::printer::PrinterConfig;

/// One write unit of a print job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Job header control packet `index`
    Header { index: usize, bytes: Vec<u8> },
    /// Raster chunk `index` with its header
    Chunk { index: usize, bytes: Vec<u8> },
}

impl Packet {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Packet::Header { bytes, .. } | Packet::Chunk { bytes, .. } => bytes,
        }
    }
}

/// # Print Job
///
/// ```
/// use phomemo::protocol::{job::PrintJob, raster::RasterImage};
///
/// let job = PrintJob::from_image(&RasterImage::filled(320, 96, 0));
/// assert_eq!(job.packets().len(), 7 + 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    packets: Vec<Packet>,
}

impl PrintJob {
    /// Frame already-encoded chunks.
    pub fn new(chunks: &[Chunk]) -> Self {
        let header = commands::job_header()
            .into_iter()
            .enumerate()
            .map(|(index, bytes)| Packet::Header { index, bytes });
        let body = chunks.iter().enumerate().map(|(index, c)| Packet::Chunk {
            index,
            bytes: c.to_bytes(),
        });
        Self {
            packets: header.chain(body).collect(),
        }
    }

    /// Encode and frame an image for the D30.
    pub fn from_image(image: &RasterImage) -> Self {
        Self::for_model(image, &PrinterConfig::D30)
    }

    /// Encode and frame an image for `model`.
    pub fn for_model(image: &RasterImage, model: &PrinterConfig) -> Self {
        Self::new(&raster::encode_for(image, model))
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// Number of raster chunks in the job.
    pub fn chunk_count(&self) -> usize {
        self.packets
            .iter()
            .filter(|p| matches!(p, Packet::Chunk { .. }))
            .count()
    }

    /// Every byte of the job, in send order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.packets.iter().flat_map(|p| p.bytes().iter().copied()).collect()
    }
}
