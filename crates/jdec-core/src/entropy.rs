//! Extraction of entropy-coded scan data.
//!
//! The scan data following an SOS segment is copied into a separate buffer with byte
//! stuffing removed, so that the bit reader never has to look at markers. Restart markers are
//! dropped from the data but their offsets are kept for resynchronisation.

use crate::error::{JpegError, Result};
use crate::marker::Marker;

/// A restart marker found inside scan data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartMarker {
    /// Offset into the destuffed data at which the next interval starts.
    pub offset: usize,
    /// Modulo-8 sequence number (RST0..RST7).
    pub number: u8,
}

/// Destuffed entropy-coded data of one scan.
#[derive(Debug, Clone)]
pub struct EntropyStream {
    /// Scan bytes with `FF 00` collapsed to `FF` and fill/restart bytes removed.
    pub data: Vec<u8>,
    /// Restart markers in stream order.
    pub restart_markers: Vec<RestartMarker>,
    /// Offset in the source buffer of the `0xFF` that introduced the terminating marker.
    pub end: usize,
    /// The marker that ended the scan data.
    pub terminator: Marker,
}

impl EntropyStream {
    /// Copy scan data out of `buffer`, starting at `start`, until a marker other than RSTn.
    ///
    /// Fails with a structural error when the buffer ends before such a marker is found.
    pub fn extract(buffer: &[u8], start: usize) -> Result<Self> {
        let mut data = Vec::with_capacity(buffer.len().saturating_sub(start));
        let mut restart_markers = Vec::new();
        let mut pos = start;

        loop {
            let byte = *buffer.get(pos).ok_or_else(|| {
                JpegError::structural(format!(
                    "scan data starting at byte {start} is not terminated by a marker"
                ))
            })?;

            if byte != 0xFF {
                data.push(byte);
                pos += 1;
                continue;
            }

            let next = *buffer.get(pos + 1).ok_or_else(|| {
                JpegError::structural("scan data ends inside a marker")
            })?;

            match next {
                0x00 => {
                    data.push(0xFF);
                    pos += 2;
                }
                // Fill byte: the second 0xFF may start the actual marker.
                0xFF => pos += 1,
                0xD0..=0xD7 => {
                    restart_markers.push(RestartMarker {
                        offset: data.len(),
                        number: next - 0xD0,
                    });
                    pos += 2;
                }
                code => {
                    let terminator = Marker::from_u8(code).ok_or_else(|| {
                        JpegError::structural(format!("invalid marker 0xFF{code:02X} in scan"))
                    })?;
                    log::debug!(
                        "extracted {} entropy-coded bytes ({} restart markers), ended by {}",
                        data.len(),
                        restart_markers.len(),
                        terminator
                    );
                    return Ok(EntropyStream {
                        data,
                        restart_markers,
                        end: pos,
                        terminator,
                    });
                }
            }
        }
    }
}
