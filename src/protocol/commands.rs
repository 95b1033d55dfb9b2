//! # Phomemo Job Commands
//!
//! Fixed control sequences understood by the D30/D35 firmware.
//!
//! The printer speaks an ESC/POS dialect wrapped in vendor `1F 11 xx`
//! packets. None of these packets are parameterised by this driver: they are
//! sent byte for byte as captured from the vendor app.
//!
//! ## Job Layout
//!
//! ```text
//! ┌──────────────────────────┐
//! │ JOB_HEADER[0..7]         │  one write + flush per packet
//! ├──────────────────────────┤
//! │ RASTER_HEADER + rows     │  chunk 0 (≤ 255 rows)
//! │ RASTER_HEADER + rows     │  chunk 1
//! │ ...                      │
//! └──────────────────────────┘
//! ```
//!
//! The printer never answers on this channel, so there is nothing to read
//! back between packets.

/// Vendor packet prefix (`1F 11`).
pub const VENDOR_PREFIX: [u8; 2] = [0x1F, 0x11];

/// ESC (Escape) - ESC/POS command prefix
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - ESC/POS extended command prefix
pub const GS: u8 = 0x1D;

/// # Job Header Packets
///
/// Seven packets that open a print job: job start, feed configuration, and
/// the two job-control sequences the firmware expects before raster data.
///
/// | # | Hex | Notes |
/// |---|-----|-------|
/// | 0 | `1F 11 38` | job start |
/// | 1 | `1F 11 12 1F 11 13` | feed configuration |
/// | 2 | `1F 11 09` | |
/// | 3 | `1F 11 11` | |
/// | 4 | `1F 11 19` | |
/// | 5 | `1F 11 07` | |
/// | 6 | `1F 11 0A 1F 11 02 02` | job control |
///
/// Packets 1 and 3 contain 0x11/0x13 (XON/XOFF), which is why the serial
/// device must have software flow control disabled.
pub const JOB_HEADER: [&[u8]; 7] = [
    &[0x1F, 0x11, 0x38],
    &[0x1F, 0x11, 0x12, 0x1F, 0x11, 0x13],
    &[0x1F, 0x11, 0x09],
    &[0x1F, 0x11, 0x11],
    &[0x1F, 0x11, 0x19],
    &[0x1F, 0x11, 0x07],
    &[0x1F, 0x11, 0x0A, 0x1F, 0x11, 0x02, 0x02],
];

/// # Raster Command Header
///
/// Prefix of every raster chunk. Reproduced byte-exact; the printer is known
/// to accept it, so it is not recomputed from the chunk dimensions.
///
/// | Bytes | Meaning |
/// |-------|---------|
/// | `1F 11 24 00` | vendor: enter raster mode |
/// | `1B 40` | ESC @ (initialize) |
/// | `1D 76 30 00` | GS v 0, m = 0 (normal density) |
/// | `0C 00` | xL xH |
/// | `40 01` | yL yH |
pub const RASTER_HEADER: [u8; 14] = [
    0x1F, 0x11, 0x24, 0x00, // vendor raster mode
    ESC, b'@', // init
    GS, b'v', b'0', 0x00, // GS v 0, m = 0
    0x0C, 0x00, // xL xH
    0x40, 0x01, // yL yH
];

/// Job header packets as owned buffers, in send order.
pub fn job_header() -> Vec<Vec<u8>> {
    JOB_HEADER.iter().map(|p| p.to_vec()).collect()
}

/// Prefix `rows` with the raster header.
///
/// `rows` is the packed bitmap of one chunk, top row first.
pub fn raster_chunk(rows: &[u8]) -> Vec<u8> {
    let mut cmd = Vec::with_capacity(RASTER_HEADER.len() + rows.len());
    cmd.extend_from_slice(&RASTER_HEADER);
    cmd.extend_from_slice(rows);
    cmd
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Decode a hex literal like "1f1138".
    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn test_job_header_bytes() {
        let expected = [
            "1f1138",
            "1f11121f1113",
            "1f1109",
            "1f1111",
            "1f1119",
            "1f1107",
            "1f110a1f110202",
        ];
        let packets = job_header();
        assert_eq!(packets.len(), 7);
        for (packet, want) in packets.iter().zip(expected) {
            assert_eq!(packet, &hex(want));
        }
    }

    #[test]
    fn test_every_header_packet_is_vendor_prefixed() {
        for packet in JOB_HEADER {
            assert_eq!(&packet[..2], &VENDOR_PREFIX);
        }
    }

    #[test]
    fn test_raster_header_bytes() {
        assert_eq!(RASTER_HEADER.to_vec(), hex("1f1124001b401d7630000c004001"));
        assert_eq!(RASTER_HEADER.len(), 14);
    }

    #[test]
    fn test_raster_chunk_layout() {
        let rows = vec![0xAA; 40 * 3];
        let cmd = raster_chunk(&rows);

        assert_eq!(&cmd[..14], &RASTER_HEADER);
        assert_eq!(&cmd[14..], &rows[..]);
        assert_eq!(cmd.len(), 14 + 120);
    }

    #[test]
    fn test_raster_chunk_empty_rows() {
        assert_eq!(raster_chunk(&[]), RASTER_HEADER.to_vec());
    }
}
