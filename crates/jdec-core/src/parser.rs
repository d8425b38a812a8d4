//! Segment payload parsers.
//!
//! Each function takes the payload of one marker segment (the bytes after the two length
//! bytes) and returns the decoded structure. Installing the result into decoder state is the
//! dispatcher's job.

use crate::component::{Component, FrameInfo};
use crate::error::{JpegError, Result};
use crate::huffman::{HuffmanClass, HuffmanTable, HuffmanTables};
use crate::quantization::{Precision, QuantizationTable};

/// Maximum number of blocks in one MCU of an interleaved scan (ITU T.81 B.2.3).
const MAX_BLOCKS_PER_MCU: usize = 10;

/// One component of a scan header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    /// Index into `FrameInfo::components`.
    pub index: usize,
    pub dc_table_id: u8,
    pub ac_table_id: u8,
}

/// Start-of-scan header contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    pub components: Vec<ScanComponent>,
    pub spectral_start: u8,
    pub spectral_end: u8,
    pub approx_high: u8,
    pub approx_low: u8,
}

impl ScanHeader {
    pub fn is_interleaved(&self) -> bool {
        self.components.len() > 1
    }
}

/// Parse an SOFn payload.
pub fn parse_sof(sof: u8, data: &[u8]) -> Result<FrameInfo> {
    if data.len() < 6 {
        return Err(JpegError::structural("SOF segment too short"));
    }

    let precision = data[0];
    let height = u16::from_be_bytes([data[1], data[2]]);
    let width = u16::from_be_bytes([data[3], data[4]]);
    let num_components = data[5] as usize;

    if precision != 8 {
        return Err(JpegError::unsupported(format!(
            "{precision}-bit sample precision"
        )));
    }
    if height == 0 {
        return Err(JpegError::unsupported("image height defined by a DNL segment"));
    }
    if width == 0 {
        return Err(JpegError::structural("frame width is zero"));
    }
    if !(1..=4).contains(&num_components) {
        return Err(JpegError::structural(format!(
            "frame declares {num_components} components, expected 1 to 4"
        )));
    }
    if data.len() < 6 + num_components * 3 {
        return Err(JpegError::structural("SOF segment too short for components"));
    }

    let mut components: Vec<Component> = Vec::with_capacity(num_components);
    for chunk in data[6..6 + num_components * 3].chunks_exact(3) {
        let id = chunk[0];
        let h_sampling = chunk[1] >> 4;
        let v_sampling = chunk[1] & 0x0F;
        let quant_table_id = chunk[2];

        if !(1..=4).contains(&h_sampling) || !(1..=4).contains(&v_sampling) {
            return Err(JpegError::structural(format!(
                "component {id} has invalid sampling factors {h_sampling}x{v_sampling}"
            )));
        }
        if quant_table_id > 3 {
            return Err(JpegError::structural(format!(
                "component {id} selects quantization table {quant_table_id}"
            )));
        }
        if components.iter().any(|c| c.id == id) {
            return Err(JpegError::structural(format!(
                "component id {id} declared twice"
            )));
        }

        components.push(Component::new(id, h_sampling, v_sampling, quant_table_id));
    }

    Ok(FrameInfo {
        sof,
        precision,
        width,
        height,
        components,
    })
}

/// Parse a DQT payload, which may define several tables.
///
/// Values are reordered from zigzag to natural order with `zigzag`.
pub fn parse_dqt(data: &[u8], zigzag: &[usize; 64]) -> Result<Vec<QuantizationTable>> {
    let mut tables = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let pq_tq = data[pos];
        let id = pq_tq & 0x0F;
        let precision = match pq_tq >> 4 {
            0 => Precision::Bits8,
            1 => Precision::Bits16,
            other => {
                return Err(JpegError::structural(format!(
                    "quantization table {id} has invalid precision {other}"
                )))
            }
        };
        pos += 1;

        if id > 3 {
            return Err(JpegError::structural(format!(
                "invalid quantization table id {id}"
            )));
        }

        let width = match precision {
            Precision::Bits8 => 1,
            Precision::Bits16 => 2,
        };
        let raw = data
            .get(pos..pos + 64 * width)
            .ok_or_else(|| JpegError::structural("DQT segment too short"))?;
        pos += 64 * width;

        let mut values = [0u16; 64];
        for (k, natural) in zigzag.iter().enumerate() {
            values[*natural] = match precision {
                Precision::Bits8 => raw[k] as u16,
                Precision::Bits16 => u16::from_be_bytes([raw[2 * k], raw[2 * k + 1]]),
            };
        }

        tables.push(QuantizationTable {
            id,
            precision,
            values,
        });
    }

    Ok(tables)
}

/// Parse a DHT payload, which may define several tables.
pub fn parse_dht(data: &[u8]) -> Result<Vec<HuffmanTable>> {
    let mut tables = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let tc_th = data[pos];
        let class = HuffmanClass::from_u8(tc_th >> 4)?;
        let id = tc_th & 0x0F;
        pos += 1;

        if id > 3 {
            return Err(JpegError::structural(format!(
                "invalid Huffman table id {id}"
            )));
        }

        let mut counts = [0u8; 16];
        counts.copy_from_slice(
            data.get(pos..pos + 16)
                .ok_or_else(|| JpegError::structural("DHT segment too short for code counts"))?,
        );
        pos += 16;

        let total: usize = counts.iter().map(|&n| n as usize).sum();
        let symbols = data
            .get(pos..pos + total)
            .ok_or_else(|| JpegError::structural("DHT segment too short for symbols"))?
            .to_vec();
        pos += total;

        tables.push(HuffmanTable::new(class, id, counts, symbols)?);
    }

    Ok(tables)
}

/// Parse an SOS payload against the current frame and installed Huffman tables.
pub fn parse_sos(data: &[u8], frame: &FrameInfo, tables: &HuffmanTables) -> Result<ScanHeader> {
    let num_components = *data
        .first()
        .ok_or_else(|| JpegError::structural("SOS segment is empty"))? as usize;

    if !(1..=4).contains(&num_components) {
        return Err(JpegError::structural(format!(
            "scan declares {num_components} components, expected 1 to 4"
        )));
    }
    if data.len() != 1 + num_components * 2 + 3 {
        return Err(JpegError::structural(format!(
            "SOS segment length {} does not match {num_components} components",
            data.len()
        )));
    }

    let mut components: Vec<ScanComponent> = Vec::with_capacity(num_components);
    for chunk in data[1..1 + num_components * 2].chunks_exact(2) {
        let id = chunk[0];
        let dc_table_id = chunk[1] >> 4;
        let ac_table_id = chunk[1] & 0x0F;

        let index = frame.component_index(id).ok_or_else(|| {
            JpegError::semantic(format!("scan references unknown component {id}"))
        })?;
        if components.iter().any(|c| c.index == index) {
            return Err(JpegError::structural(format!(
                "component {id} appears twice in one scan"
            )));
        }
        if tables.get(HuffmanClass::Dc, dc_table_id).is_none() {
            return Err(JpegError::semantic(format!(
                "component {id} uses undefined DC Huffman table {dc_table_id}"
            )));
        }
        if tables.get(HuffmanClass::Ac, ac_table_id).is_none() {
            return Err(JpegError::semantic(format!(
                "component {id} uses undefined AC Huffman table {ac_table_id}"
            )));
        }

        components.push(ScanComponent {
            index,
            dc_table_id,
            ac_table_id,
        });
    }

    let tail = &data[1 + num_components * 2..];
    let header = ScanHeader {
        components,
        spectral_start: tail[0],
        spectral_end: tail[1],
        approx_high: tail[2] >> 4,
        approx_low: tail[2] & 0x0F,
    };

    if header.spectral_start != 0
        || header.spectral_end != 63
        || header.approx_high != 0
        || header.approx_low != 0
    {
        return Err(JpegError::structural(format!(
            "sequential scan with spectral selection {}..={} and approximation {}/{}",
            header.spectral_start, header.spectral_end, header.approx_high, header.approx_low
        )));
    }

    if header.is_interleaved() {
        let blocks: usize = header
            .components
            .iter()
            .map(|c| {
                let component = &frame.components[c.index];
                component.h_sampling as usize * component.v_sampling as usize
            })
            .sum();
        if blocks > MAX_BLOCKS_PER_MCU {
            return Err(JpegError::structural(format!(
                "interleaved scan has {blocks} blocks per MCU, more than {MAX_BLOCKS_PER_MCU}"
            )));
        }
    }

    Ok(header)
}

/// Parse a DRI payload into the restart interval in MCUs (0 disables restarts).
pub fn parse_dri(data: &[u8]) -> Result<u16> {
    match data {
        [hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(JpegError::structural(format!(
            "DRI segment has {} bytes, expected 2",
            data.len()
        ))),
    }
}
