//! # Raster Encoding
//!
//! Converts a monochrome bitmap into the printer's raster chunks.
//!
//! ## Ink Samples
//!
//! A [`RasterImage`] holds one 8-bit **ink** sample per dot: 0 is bare
//! paper, 255 is full ink. Samples above [`THRESHOLD`] print. Images loaded
//! from files are luminance, so they are inverted on the way in
//! ([`RasterImage::from_luma`]): a black QR module on a white label becomes
//! ink, the white background does not.
//!
//! ## Bit Packing
//!
//! Each row packs into bytes, one bit per dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = print, 0 = no print
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! ```
//!
//! Widths that are not a multiple of 8 are zero-padded: the row takes
//! `ceil(width / 8)` bytes and the unused low bits of the last byte are 0.
//!
//! ## Chunking
//!
//! The raster command carries at most 255 rows, so images are split into
//! slices of up to [`MAX_CHUNK_ROWS`] rows. A 300-row image becomes two
//! chunks (255 + 45); a 255-row image is exactly one.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use tracing::warn;

use super::commands;
use crate::error::PhomemoError;
use crate::printer::PrinterConfig;

/// Samples strictly greater than this print.
pub const THRESHOLD: u8 = 127;

/// Maximum rows in one raster chunk.
pub const MAX_CHUNK_ROWS: usize = 255;

/// # Raster Image
///
/// Row-major ink samples. Owned by the caller; encoding only borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap raw ink samples.
    ///
    /// ## Errors
    ///
    /// `InvalidImage` if `pixels.len() != width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, PhomemoError> {
        let expected = width.checked_mul(height).ok_or_else(|| {
            PhomemoError::InvalidImage(format!("{}x{} overflows", width, height))
        })?;
        if pixels.len() != expected {
            return Err(PhomemoError::InvalidImage(format!(
                "expected {} samples for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// An image with every sample set to `ink`.
    ///
    /// ## Panics
    ///
    /// If `width * height` overflows `usize`. Use [`new`](Self::new) for
    /// untrusted dimensions.
    pub fn filled(width: usize, height: usize, ink: u8) -> Self {
        let len = match width.checked_mul(height) {
            Some(len) => len,
            None => panic!("{}x{} image overflows usize", width, height),
        };
        Self {
            width,
            height,
            pixels: vec![ink; len],
        }
    }

    /// Convert a luminance image (0 = black) to ink samples.
    pub fn from_luma(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        Self {
            width: w as usize,
            height: h as usize,
            pixels: img.as_raw().iter().map(|&l| 255 - l).collect(),
        }
    }

    /// Convert any decoded image via its 8-bit luminance.
    ///
    /// Transparent pixels are whatever their color channels say; labels are
    /// expected to be opaque.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        Self::from_luma(&img.to_luma8())
    }

    /// Decode an image file.
    ///
    /// ## Errors
    ///
    /// - `InputFileMissing` if `path` is not a file
    /// - `Image` if decoding fails
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PhomemoError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PhomemoError::InputFileMissing(path.to_path_buf()));
        }
        let img = image::open(path)?;
        Ok(Self::from_dynamic(&img))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples of row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Bytes per packed row (`ceil(width / 8)`).
    pub fn width_bytes(&self) -> usize {
        self.width.div_ceil(8)
    }
}

/// Pack one row of ink samples, MSB first, zero-padding the last byte.
///
/// ```
/// use phomemo::protocol::raster::pack_row;
///
/// assert_eq!(pack_row(&[255, 0, 255, 0, 255, 0, 255, 0]), vec![0xAA]);
/// // 10 dots -> 2 bytes, trailing 6 bits zero
/// assert_eq!(pack_row(&[255; 10]), vec![0xFF, 0xC0]);
/// ```
pub fn pack_row(samples: &[u8]) -> Vec<u8> {
    samples
        .chunks(8)
        .map(|dots| {
            dots.iter().enumerate().fold(0u8, |byte, (bit, &s)| {
                if s > THRESHOLD {
                    byte | (0x80 >> bit)
                } else {
                    byte
                }
            })
        })
        .collect()
}

/// # Raster Chunk
///
/// Up to [`MAX_CHUNK_ROWS`] packed rows of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Index of the first image row in this chunk
    pub first_row: usize,
    /// Number of rows in this chunk
    pub rows: usize,
    /// Bytes per packed row
    pub width_bytes: usize,
    /// Packed rows, top to bottom
    pub data: Vec<u8>,
}

impl Chunk {
    /// Packed bytes of row `y` within this chunk.
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.width_bytes..(y + 1) * self.width_bytes]
    }

    /// Wire form: raster header followed by the packed rows.
    pub fn to_bytes(&self) -> Vec<u8> {
        commands::raster_chunk(&self.data)
    }
}

/// Encode an image into raster chunks for the D30, top to bottom.
///
/// An image with no rows produces no chunks.
pub fn encode(image: &RasterImage) -> Vec<Chunk> {
    encode_for(image, &PrinterConfig::D30)
}

/// Encode for a specific model, using its print width and row limit.
///
/// A width other than `model.width_dots` is encoded as given but logged,
/// since the printer will shear or clip it.
pub fn encode_for(image: &RasterImage, model: &PrinterConfig) -> Vec<Chunk> {
    if image.width() != model.width_dots as usize {
        warn!(
            model = model.name,
            width = image.width(),
            expected = model.width_dots,
            "image width does not match print width"
        );
    }
    encode_with_limit(image, model.max_chunk_rows as usize)
}

/// Encode with a custom row limit per chunk (clamped to 1..=255).
pub fn encode_with_limit(image: &RasterImage, max_rows: usize) -> Vec<Chunk> {
    let max_rows = max_rows.clamp(1, MAX_CHUNK_ROWS);
    let width_bytes = image.width_bytes();
    (0..image.height())
        .step_by(max_rows)
        .map(|start| {
            let end = (start + max_rows).min(image.height());
            let mut data = Vec::with_capacity(width_bytes * (end - start));
            for y in start..end {
                data.extend(pack_row(image.row(y)));
            }
            Chunk {
                first_row: start,
                rows: end - start,
                width_bytes,
                data,
            }
        })
        .collect()
}

/// Render chunks back to a luminance image (black = printed dot).
///
/// Used for previews; the result shows exactly what the threshold kept.
/// Columns past a chunk's packed width stay white.
pub fn preview(chunks: &[Chunk], width: usize) -> GrayImage {
    let height: usize = chunks.iter().map(|c| c.rows).sum();
    let mut img = GrayImage::from_pixel(width as u32, height as u32, image::Luma([255]));

    for chunk in chunks {
        for y in 0..chunk.rows {
            let row = chunk.row(y);
            for x in 0..width.min(chunk.width_bytes * 8) {
                let is_black = (row[x / 8] >> (7 - (x % 8))) & 1 == 1;
                if is_black {
                    img.put_pixel(x as u32, (chunk.first_row + y) as u32, image::Luma([0]));
                }
            }
        }
    }
    img
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = RasterImage::new(8, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, PhomemoError::InvalidImage(_)));
    }

    #[test]
    fn test_pack_row_threshold_is_strict() {
        assert_eq!(pack_row(&[127; 8]), vec![0x00]);
        assert_eq!(pack_row(&[128; 8]), vec![0xFF]);
    }

    #[test]
    fn test_pack_row_msb_first() {
        let mut samples = [0u8; 16];
        samples[0] = 255;
        samples[15] = 255;
        assert_eq!(pack_row(&samples), vec![0x80, 0x01]);
    }

    #[test]
    fn test_pack_row_zero_pads_partial_byte() {
        // 12 dots, all ink: second byte keeps only its top 4 bits
        assert_eq!(pack_row(&[255; 12]), vec![0xFF, 0xF0]);
        assert_eq!(pack_row(&[255; 1]), vec![0x80]);
        assert_eq!(pack_row(&[]), Vec::<u8>::new());
    }

    #[test]
    fn test_all_black_label_sets_every_bit() {
        let black = GrayImage::from_pixel(320, 96, image::Luma([0]));
        let chunks = encode(&RasterImage::from_luma(&black));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].rows, 96);
        assert_eq!(chunks[0].data, vec![0xFF; 40 * 96]);
    }

    #[test]
    fn test_all_white_label_sets_no_bits() {
        let white = GrayImage::from_pixel(320, 96, image::Luma([255]));
        let chunks = encode(&RasterImage::from_luma(&white));

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].data.iter().all(|&b| b == 0));
        assert_eq!(chunks[0].data.len(), 40 * 96);
    }

    #[test]
    fn test_chunking_300_rows() {
        let chunks = encode(&RasterImage::filled(320, 300, 0));
        let heights: Vec<_> = chunks.iter().map(|c| c.rows).collect();
        assert_eq!(heights, vec![255, 45]);
        assert_eq!(chunks[1].first_row, 255);
        assert_eq!(chunks[1].data.len(), 45 * 40);
    }

    #[test]
    fn test_chunking_exact_boundary() {
        let chunks = encode(&RasterImage::filled(320, 255, 0));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].rows, 255);
    }

    #[test]
    fn test_chunking_510_rows_no_empty_tail() {
        let chunks = encode(&RasterImage::filled(320, 510, 0));
        let heights: Vec<_> = chunks.iter().map(|c| c.rows).collect();
        assert_eq!(heights, vec![255, 255]);
    }

    #[test]
    fn test_empty_image_has_no_chunks() {
        assert!(encode(&RasterImage::filled(320, 0, 0)).is_empty());
    }

    #[test]
    fn test_rows_keep_top_to_bottom_order() {
        // Row y is ink only in dot y, so each packed row is distinct
        let mut pixels = vec![0u8; 8 * 8];
        for y in 0..8 {
            pixels[y * 8 + y] = 255;
        }
        let image = RasterImage::new(8, 8, pixels).unwrap();
        let chunks = encode_with_limit(&image, 3);

        let heights: Vec<_> = chunks.iter().map(|c| c.rows).collect();
        assert_eq!(heights, vec![3, 3, 2]);

        let all: Vec<u8> = chunks.iter().flat_map(|c| c.data.clone()).collect();
        assert_eq!(all, vec![0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01]);
    }

    #[test]
    fn test_non_multiple_of_8_width() {
        let chunks = encode(&RasterImage::filled(10, 2, 255));
        assert_eq!(chunks[0].width_bytes, 2);
        assert_eq!(chunks[0].data, vec![0xFF, 0xC0, 0xFF, 0xC0]);
    }

    #[test]
    fn test_chunk_wire_bytes() {
        let chunks = encode(&RasterImage::filled(320, 2, 255));
        let bytes = chunks[0].to_bytes();
        assert_eq!(&bytes[..14], &commands::RASTER_HEADER);
        assert_eq!(bytes.len(), 14 + 80);
    }

    #[test]
    fn test_encode_does_not_mutate_input() {
        let image = RasterImage::filled(16, 4, 200);
        let before = image.clone();
        let _ = encode(&image);
        assert_eq!(image, before);
    }

    #[test]
    fn test_preview_matches_threshold() {
        let mut luma = GrayImage::from_pixel(16, 2, image::Luma([255]));
        luma.put_pixel(3, 1, image::Luma([10]));
        luma.put_pixel(4, 1, image::Luma([200]));

        let chunks = encode(&RasterImage::from_luma(&luma));
        let img = preview(&chunks, 16);

        assert_eq!(img.get_pixel(3, 1).0, [0]);
        assert_eq!(img.get_pixel(4, 1).0, [255]);
        assert_eq!(img.get_pixel(0, 0).0, [255]);
    }

    #[test]
    fn test_preview_wider_than_chunks_stays_white() {
        let chunks = encode(&RasterImage::filled(8, 2, 255));
        let img = preview(&chunks, 16);

        assert_eq!(img.dimensions(), (16, 2));
        assert_eq!(img.get_pixel(7, 1).0, [0]);
        assert_eq!(img.get_pixel(8, 1).0, [255]);
        assert_eq!(img.get_pixel(15, 0).0, [255]);
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn test_filled_overflow_panics() {
        let _ = RasterImage::filled(usize::MAX, 2, 0);
    }

    #[test]
    fn test_encode_for_uses_model_row_limit() {
        let model = PrinterConfig {
            max_chunk_rows: 100,
            ..PrinterConfig::D30
        };
        let chunks = encode_for(&RasterImage::filled(320, 250, 0), &model);
        let rows: Vec<_> = chunks.iter().map(|c| c.rows).collect();
        assert_eq!(rows, vec![100, 100, 50]);
    }

    #[test]
    fn test_encode_for_clamps_oversized_limit() {
        let model = PrinterConfig {
            max_chunk_rows: 1000,
            ..PrinterConfig::D35
        };
        let chunks = encode_for(&RasterImage::filled(320, 300, 0), &model);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].rows, 255);
    }
}
