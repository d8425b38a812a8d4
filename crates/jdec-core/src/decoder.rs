//! The decoder context and marker dispatch.
//!
//! A [`Decoder`] owns everything one decode needs: the input buffer and read cursor, the table
//! sets, the frame with its coefficient storage, and the restart interval. Segments are parsed
//! in file order; each scan is entropy-decoded as soon as its SOS is reached, and the transform
//! chain runs once at EOI.

use crate::component::FrameInfo;
use crate::entropy::EntropyStream;
use crate::error::{JpegError, Result};
use crate::huffman::HuffmanTables;
use crate::marker::Marker;
use crate::options::DecoderOptions;
use crate::parser::{parse_dht, parse_dqt, parse_dri, parse_sof, parse_sos};
use crate::quantization::QuantizationTables;
use crate::raster::{assemble, DecodedImage};
use crate::scan::{decode_scan, ScanContext};
use crate::transform::{self, Idct};
use crate::zigzag::zigzag_order;

/// What the dispatcher should do after handling a marker.
enum Step {
    Continue,
    /// An SOS marker was reached while only headers were requested.
    ScanReached,
    EndOfImage,
}

pub struct Decoder<'a> {
    data: &'a [u8],
    position: usize,
    options: DecoderOptions,
    zigzag: [usize; 64],
    frame: Option<FrameInfo>,
    huffman_tables: HuffmanTables,
    quantization_tables: QuantizationTables,
    restart_interval: u16,
    mcus_decoded: u64,
    scans_decoded: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, DecoderOptions::default())
    }

    pub fn with_options(data: &'a [u8], options: DecoderOptions) -> Self {
        Decoder {
            data,
            position: 0,
            options,
            zigzag: zigzag_order(),
            frame: None,
            huffman_tables: HuffmanTables::default(),
            quantization_tables: QuantizationTables::default(),
            restart_interval: 0,
            mcus_decoded: 0,
            scans_decoded: 0,
        }
    }

    /// Frame header, once an SOF segment has been parsed.
    pub fn info(&self) -> Option<&FrameInfo> {
        self.frame.as_ref()
    }

    pub fn huffman_tables(&self) -> &HuffmanTables {
        &self.huffman_tables
    }

    pub fn quantization_tables(&self) -> &QuantizationTables {
        &self.quantization_tables
    }

    /// Parse segments up to the first SOS and return the frame header.
    ///
    /// Tables defined before the first scan are available afterwards through
    /// [`huffman_tables`](Self::huffman_tables) and
    /// [`quantization_tables`](Self::quantization_tables). [`decode`](Self::decode) picks up
    /// where this stopped.
    pub fn read_headers(&mut self) -> Result<&FrameInfo> {
        self.start()?;
        loop {
            match self.step(true)? {
                Step::Continue => {}
                Step::ScanReached | Step::EndOfImage => break,
            }
        }
        self.frame
            .as_ref()
            .ok_or_else(|| JpegError::structural("no frame header before the first scan"))
    }

    /// Decode the whole image.
    pub fn decode(mut self) -> Result<DecodedImage> {
        self.start()?;
        loop {
            match self.step(false)? {
                Step::Continue | Step::ScanReached => {}
                Step::EndOfImage => break,
            }
        }
        self.finish()
    }

    /// Check the input limits and the SOI signature, once.
    fn start(&mut self) -> Result<()> {
        if self.position > 0 {
            return Ok(());
        }
        if self.data.len() > self.options.max_input_bytes {
            return Err(JpegError::LimitExceeded {
                what: "input size",
                actual: self.data.len() as u64,
                limit: self.options.max_input_bytes as u64,
            });
        }
        if !self.data.starts_with(&[0xFF, Marker::SOI.to_u8()]) {
            return Err(JpegError::structural("missing SOI marker"));
        }
        self.position = 2;
        log::debug!("decoding {} bytes", self.data.len());
        Ok(())
    }

    /// Read and handle one marker.
    fn step(&mut self, headers_only: bool) -> Result<Step> {
        let marker_start = self.position;
        let marker = self.next_marker()?;

        match marker {
            Marker::EOI => {
                if self.position < self.data.len() {
                    log::warn!(
                        "ignoring {} bytes after EOI",
                        self.data.len() - self.position
                    );
                }
                return Ok(Step::EndOfImage);
            }
            Marker::SOS if headers_only => {
                self.position = marker_start;
                return Ok(Step::ScanReached);
            }
            Marker::SOI => return Err(JpegError::structural("unexpected second SOI marker")),
            Marker::RST(n) => {
                log::warn!("ignoring RST{n} marker outside of scan data");
                return Ok(Step::Continue);
            }
            Marker::TEM => return Ok(Step::Continue),
            _ => {}
        }

        let payload = self.read_segment(marker)?;
        log::debug!("{marker} segment, {} bytes", payload.len());

        match marker {
            Marker::SOF(n) => self.handle_sof(n, payload)?,
            Marker::DHT => {
                for table in parse_dht(payload)? {
                    log::debug!(
                        "Huffman table {:?}/{}: {} symbols",
                        table.class,
                        table.id,
                        table.symbols().len()
                    );
                    if let Some(old) = self.huffman_tables.insert(table)? {
                        log::warn!("Huffman table {:?}/{} redefined", old.class, old.id);
                    }
                }
            }
            Marker::DQT => {
                for table in parse_dqt(payload, &self.zigzag)? {
                    log::debug!("quantization table {} ({:?})", table.id, table.precision);
                    if let Some(old) = self.quantization_tables.insert(table)? {
                        log::warn!("quantization table {} redefined", old.id);
                    }
                }
            }
            Marker::DRI => {
                self.restart_interval = parse_dri(payload)?;
                log::debug!("restart interval {} MCUs", self.restart_interval);
            }
            Marker::SOS => self.handle_sos(payload)?,
            Marker::DAC => return Err(JpegError::unsupported("arithmetic coding")),
            Marker::DNL => log::warn!("ignoring DNL segment"),
            Marker::APP(_) | Marker::COM => {}
            other => log::warn!("skipping unknown {other} segment"),
        }

        Ok(Step::Continue)
    }

    fn handle_sof(&mut self, n: u8, payload: &[u8]) -> Result<()> {
        if self.frame.is_some() {
            return Err(JpegError::structural("more than one frame header"));
        }
        if !matches!(n, 0..=2) {
            return Err(JpegError::unsupported(Marker::sof_description(n)));
        }

        let mut frame = parse_sof(n, payload)?;
        let pixels = frame.width as u64 * frame.height as u64;
        if pixels > self.options.max_pixels {
            return Err(JpegError::LimitExceeded {
                what: "pixel count",
                actual: pixels,
                limit: self.options.max_pixels,
            });
        }

        log::debug!(
            "frame: {} {}x{}, {} component(s), MCU grid {}x{}",
            frame.description(),
            frame.width,
            frame.height,
            frame.components.len(),
            frame.mcus_x(),
            frame.mcus_y()
        );

        if frame.is_sequential_huffman() {
            let (mcus_x, mcus_y) = (frame.mcus_x(), frame.mcus_y());
            for component in frame.components.iter_mut() {
                component.allocate(mcus_x, mcus_y);
                log::debug!(
                    "component {}: sampling {}x{}, quantization table {}, {}x{} blocks",
                    component.id,
                    component.h_sampling,
                    component.v_sampling,
                    component.quant_table_id,
                    component.blocks_wide,
                    component.blocks_tall
                );
            }
        }

        self.frame = Some(frame);
        Ok(())
    }

    fn handle_sos(&mut self, payload: &[u8]) -> Result<()> {
        let frame = self
            .frame
            .as_mut()
            .ok_or_else(|| JpegError::structural("scan before frame header"))?;
        if frame.is_progressive() {
            return Err(JpegError::unsupported("progressive DCT"));
        }

        let header = parse_sos(payload, frame, &self.huffman_tables)?;
        let stream = EntropyStream::extract(self.data, self.position)?;

        let ctx = ScanContext {
            tables: &self.huffman_tables,
            zigzag: &self.zigzag,
            restart_interval: self.restart_interval,
            strict_restart: self.options.strict_restart,
            mcu_budget: self.options.max_mcus.saturating_sub(self.mcus_decoded),
        };
        self.mcus_decoded += decode_scan(frame, &header, &stream, &ctx)?;
        self.scans_decoded += 1;
        self.position = stream.end;

        Ok(())
    }

    /// Dequantize, transform and assemble once all scans are in.
    fn finish(mut self) -> Result<DecodedImage> {
        let mut frame = self
            .frame
            .take()
            .ok_or_else(|| JpegError::structural("no frame header before EOI"))?;
        if self.scans_decoded == 0 {
            return Err(JpegError::structural("no scan before EOI"));
        }
        if let Some(component) = frame.components.iter().find(|c| !c.covered) {
            return Err(JpegError::semantic(format!(
                "component {} is not included in any scan",
                component.id
            )));
        }

        transform::apply(&mut frame, &self.quantization_tables, &Idct::new())?;
        Ok(assemble(&frame))
    }

    /// Find the next marker, skipping fill bytes and any stray data before it.
    fn next_marker(&mut self) -> Result<Marker> {
        let mut skipped = 0usize;
        loop {
            let byte = self.byte_at(self.position)?;
            if byte != 0xFF {
                skipped += 1;
                self.position += 1;
                continue;
            }

            let start = self.position;
            let mut pos = start + 1;
            while self.byte_at(pos)? == 0xFF {
                pos += 1;
            }
            let code = self.byte_at(pos)?;
            self.position = pos + 1;

            match Marker::from_u8(code) {
                Some(marker) => {
                    if skipped > 0 {
                        log::warn!("skipped {skipped} bytes of garbage before {marker}");
                    }
                    return Ok(marker);
                }
                // A stuffed zero outside scan data.
                None => skipped += self.position - start,
            }
        }
    }

    /// Read the length field of `marker` and return its payload, advancing past it.
    fn read_segment(&mut self, marker: Marker) -> Result<&'a [u8]> {
        let data = self.data;
        let length_bytes = data
            .get(self.position..self.position + 2)
            .ok_or_else(|| JpegError::structural(format!("{marker} segment truncated")))?;
        let length = u16::from_be_bytes([length_bytes[0], length_bytes[1]]) as usize;
        if length < 2 {
            return Err(JpegError::structural(format!(
                "{marker} segment length {length} is too small"
            )));
        }

        let start = self.position + 2;
        let end = self.position + length;
        let payload = data.get(start..end).ok_or_else(|| {
            JpegError::structural(format!(
                "{marker} segment of {length} bytes runs past the end of the data"
            ))
        })?;
        self.position = end;
        Ok(payload)
    }

    fn byte_at(&self, pos: usize) -> Result<u8> {
        self.data
            .get(pos)
            .copied()
            .ok_or_else(|| JpegError::structural("unexpected end of data before EOI"))
    }
}
