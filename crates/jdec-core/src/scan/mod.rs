//! MCU walk over one sequential scan.
//!
//! Turns the entropy-coded data of a scan into coefficient blocks stored in each component's
//! block grid. Dequantization and the inverse transform happen later, once all scans are in.
//!
//! - `baseline` - Huffman decoding of a single block

mod baseline;

pub use baseline::decode_block;

use std::slice;

use crate::bit_reader::BitReader;
use crate::component::FrameInfo;
use crate::entropy::{EntropyStream, RestartMarker};
use crate::error::{JpegError, Result};
use crate::huffman::{HuffmanClass, HuffmanTable, HuffmanTables};
use crate::parser::ScanHeader;

/// Decoder state a scan reads but does not own.
pub struct ScanContext<'a> {
    pub tables: &'a HuffmanTables,
    pub zigzag: &'a [usize; 64],
    /// MCUs between restart markers, 0 when restarts are disabled.
    pub restart_interval: u16,
    pub strict_restart: bool,
    /// How many more MCUs this decode may spend.
    pub mcu_budget: u64,
}

/// MCU grid of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McuLayout {
    pub mcus_x: usize,
    pub mcus_y: usize,
}

impl McuLayout {
    /// An interleaved scan uses the frame's MCU grid; a single-component scan visits each
    /// block of that component's own sample grid once.
    pub fn for_scan(frame: &FrameInfo, header: &ScanHeader) -> Self {
        if header.is_interleaved() {
            McuLayout {
                mcus_x: frame.mcus_x(),
                mcus_y: frame.mcus_y(),
            }
        } else {
            let (mcus_x, mcus_y) = frame.component_blocks(header.components[0].index);
            McuLayout { mcus_x, mcus_y }
        }
    }

    pub fn total(&self) -> usize {
        self.mcus_x * self.mcus_y
    }
}

/// Decode every MCU of a scan into the frame's component block grids.
///
/// Returns the number of MCUs decoded.
pub fn decode_scan(
    frame: &mut FrameInfo,
    header: &ScanHeader,
    stream: &EntropyStream,
    ctx: &ScanContext<'_>,
) -> Result<u64> {
    let layout = McuLayout::for_scan(frame, header);
    let total = layout.total() as u64;
    if total > ctx.mcu_budget {
        return Err(JpegError::LimitExceeded {
            what: "MCU count",
            actual: total,
            limit: ctx.mcu_budget,
        });
    }

    let mut tables: Vec<(&HuffmanTable, &HuffmanTable)> = Vec::with_capacity(header.components.len());
    for sc in &header.components {
        let dc = ctx
            .tables
            .get(HuffmanClass::Dc, sc.dc_table_id)
            .ok_or_else(|| JpegError::semantic(format!("DC Huffman table {} missing", sc.dc_table_id)))?;
        let ac = ctx
            .tables
            .get(HuffmanClass::Ac, sc.ac_table_id)
            .ok_or_else(|| JpegError::semantic(format!("AC Huffman table {} missing", sc.ac_table_id)))?;
        tables.push((dc, ac));
    }

    log::debug!(
        "decoding scan: {} component(s), {}x{} MCUs, restart interval {}",
        header.components.len(),
        layout.mcus_x,
        layout.mcus_y,
        ctx.restart_interval
    );

    let interleaved = header.is_interleaved();
    let mut reader = BitReader::new(&stream.data);
    let mut predictors = vec![0i16; header.components.len()];
    let mut restarts = Restarts {
        markers: stream.restart_markers.iter(),
        expected: 0,
        strict: ctx.strict_restart,
    };
    let interval = ctx.restart_interval as usize;

    for mcu in 0..layout.total() {
        if interval > 0 && mcu > 0 && mcu % interval == 0 {
            restarts.resync(&mut reader, mcu)?;
            predictors.fill(0);
        }

        let mcu_x = mcu % layout.mcus_x;
        let mcu_y = mcu / layout.mcus_x;
        log::trace!("MCU {mcu} at ({mcu_x}, {mcu_y})");

        for (slot, sc) in header.components.iter().enumerate() {
            let (dc_table, ac_table) = tables[slot];
            let component = &mut frame.components[sc.index];

            if interleaved {
                let h = component.h_sampling as usize;
                let v = component.v_sampling as usize;
                for by in 0..v {
                    for bx in 0..h {
                        let block = component.block_mut(mcu_y * v + by, mcu_x * h + bx);
                        decode_block(
                            &mut reader,
                            dc_table,
                            ac_table,
                            &mut predictors[slot],
                            ctx.zigzag,
                            block,
                        )?;
                    }
                }
            } else {
                let block = component.block_mut(mcu_y, mcu_x);
                decode_block(
                    &mut reader,
                    dc_table,
                    ac_table,
                    &mut predictors[slot],
                    ctx.zigzag,
                    block,
                )?;
            }
        }
    }

    for sc in &header.components {
        let component = &mut frame.components[sc.index];
        component.dc_table_id = sc.dc_table_id;
        component.ac_table_id = sc.ac_table_id;
        component.covered = true;
    }

    log::debug!(
        "scan done: {} MCUs from {} of {} entropy-coded bytes",
        total,
        reader.position(),
        stream.data.len()
    );

    Ok(total)
}

/// Walks the restart markers recorded by the entropy extractor.
struct Restarts<'a> {
    markers: slice::Iter<'a, RestartMarker>,
    expected: u8,
    strict: bool,
}

impl Restarts<'_> {
    /// Move the reader to the start of the next restart interval.
    fn resync(&mut self, reader: &mut BitReader<'_>, mcu: usize) -> Result<()> {
        reader.align();
        let position = reader.position();

        let Some(marker) = self.markers.next().copied() else {
            if self.strict {
                return Err(JpegError::desync(
                    position,
                    format!("restart marker missing before MCU {mcu}"),
                ));
            }
            log::warn!("restart marker missing before MCU {mcu}, continuing without one");
            return Ok(());
        };

        if marker.offset != position {
            if self.strict {
                return Err(JpegError::desync(
                    position,
                    format!(
                        "restart marker RST{} expected at byte {position} but found at {}",
                        marker.number, marker.offset
                    ),
                ));
            }
            log::warn!(
                "resynchronising at RST{}: byte {position} -> {}",
                marker.number,
                marker.offset
            );
            reader.seek(marker.offset);
        }

        if marker.number != self.expected {
            log::warn!(
                "restart marker out of sequence: expected RST{}, found RST{}",
                self.expected,
                marker.number
            );
        }
        self.expected = (marker.number + 1) & 7;

        log::debug!("restart at MCU {mcu}, RST{}", marker.number);
        Ok(())
    }
}
