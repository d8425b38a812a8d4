//! Test-side baseline JPEG encoder.
//!
//! Builds byte streams from already quantized coefficient blocks, so decode results can be
//! compared against values computed directly from those coefficients.

#![allow(dead_code)]

use jdec_core::ZIGZAG_TO_NATURAL;

/// Luminance tables from ITU T.81 Annex K.3.
pub const LUMA_DC_COUNTS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
pub const LUMA_DC_SYMBOLS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
pub const LUMA_AC_COUNTS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 0x7d];
pub const LUMA_AC_SYMBOLS: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xa1, 0x08, 0x23, 0x42, 0xb1, 0xc1, 0x15, 0x52, 0xd1, 0xf0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0a, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2a, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7a, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7,
    0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3, 0xc4, 0xc5,
    0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda, 0xe1, 0xe2,
    0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

pub type Block = [i16; 64];

/// Huffman code lookup, symbol -> (code, length).
pub struct HuffmanEncoder {
    codes: [Option<(u16, u8)>; 256],
}

impl HuffmanEncoder {
    pub fn new(counts: &[u8; 16], symbols: &[u8]) -> Self {
        let mut codes = [None; 256];
        let mut symbols = symbols.iter();
        let mut code: u16 = 0;
        for (len, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                let symbol = *symbols.next().expect("counts exceed symbols");
                codes[symbol as usize] = Some((code, len as u8 + 1));
                code += 1;
            }
            code <<= 1;
        }
        HuffmanEncoder { codes }
    }

    pub fn encode(&self, symbol: u8) -> (u16, u8) {
        self.codes[symbol as usize].unwrap_or_else(|| panic!("symbol 0x{symbol:02X} not in table"))
    }
}

/// Bit writer with byte stuffing and 1-bit padding.
#[derive(Default)]
pub struct BitWriter {
    data: Vec<u8>,
    bits: u32,
    num_bits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bits(&mut self, value: u16, count: u8) {
        assert!(count <= 16);
        if count == 0 {
            return;
        }
        let mask = (1u32 << count) - 1;
        self.bits = (self.bits << count) | (value as u32 & mask);
        self.num_bits += count;

        while self.num_bits >= 8 {
            self.num_bits -= 8;
            let byte = (self.bits >> self.num_bits) as u8;
            self.write_byte(byte);
        }
        self.bits &= (1u32 << self.num_bits) - 1;
    }

    pub fn write_huffman(&mut self, symbol: u8, table: &HuffmanEncoder) {
        let (code, len) = table.encode(symbol);
        self.write_bits(code, len);
    }

    fn write_byte(&mut self, byte: u8) {
        self.data.push(byte);
        if byte == 0xFF {
            self.data.push(0x00);
        }
    }

    /// Pad to a byte boundary with 1 bits.
    pub fn flush(&mut self) {
        if self.num_bits > 0 {
            let padding = 8 - self.num_bits;
            let value = (self.bits << padding) | ((1u32 << padding) - 1);
            self.write_byte(value as u8);
            self.num_bits = 0;
            self.bits = 0;
        }
    }

    /// Flush and append a restart marker.
    pub fn write_restart(&mut self, number: u8) {
        self.flush();
        self.data.extend([0xFF, 0xD0 + (number & 7)]);
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush();
        self.data
    }
}

/// Magnitude category and raw bits of a coefficient.
pub fn encode_coefficient(value: i16) -> (u8, u16) {
    if value == 0 {
        return (0, 0);
    }
    let magnitude = value.unsigned_abs();
    let size = 16 - magnitude.leading_zeros() as u8;
    let bits = if value < 0 {
        ((1u32 << size) - 1 - magnitude as u32) as u16
    } else {
        magnitude
    };
    (size, bits)
}

/// Entropy-code one block given in natural order.
pub fn encode_block(
    writer: &mut BitWriter,
    block: &Block,
    predictor: &mut i16,
    dc: &HuffmanEncoder,
    ac: &HuffmanEncoder,
) {
    let diff = block[0] - *predictor;
    *predictor = block[0];
    let (size, bits) = encode_coefficient(diff);
    writer.write_huffman(size, dc);
    writer.write_bits(bits, size);

    let mut run = 0u8;
    for &natural in &ZIGZAG_TO_NATURAL[1..] {
        let value = block[natural];
        if value == 0 {
            run += 1;
            continue;
        }
        while run >= 16 {
            writer.write_huffman(0xF0, ac);
            run -= 16;
        }
        let (size, bits) = encode_coefficient(value);
        writer.write_huffman((run << 4) | size, ac);
        writer.write_bits(bits, size);
        run = 0;
    }
    if run > 0 {
        writer.write_huffman(0x00, ac);
    }
}

#[derive(Clone, Copy)]
pub struct ComponentSpec {
    pub id: u8,
    pub h: u8,
    pub v: u8,
    pub quant_table: u8,
}

/// Builds baseline JPEG files around caller-supplied coefficient grids.
///
/// Each component's blocks are given row-major over the component's full MCU-aligned grid,
/// `mcus_x * h` blocks wide and `mcus_y * v` tall (see [`JpegBuilder::block_grid`]).
pub struct JpegBuilder {
    pub width: u16,
    pub height: u16,
    pub sof: u8,
    pub components: Vec<ComponentSpec>,
    pub quant_tables: Vec<(u8, [u16; 64])>,
    pub restart_interval: u16,
}

impl JpegBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        JpegBuilder {
            width,
            height,
            sof: 0,
            components: Vec::new(),
            quant_tables: Vec::new(),
            restart_interval: 0,
        }
    }

    pub fn component(mut self, id: u8, h: u8, v: u8, quant_table: u8) -> Self {
        self.components.push(ComponentSpec {
            id,
            h,
            v,
            quant_table,
        });
        self
    }

    /// Quantization table given in natural order.
    pub fn quant_table(mut self, id: u8, values: [u16; 64]) -> Self {
        self.quant_tables.push((id, values));
        self
    }

    pub fn restart_interval(mut self, interval: u16) -> Self {
        self.restart_interval = interval;
        self
    }

    pub fn sof(mut self, sof: u8) -> Self {
        self.sof = sof;
        self
    }

    fn h_max(&self) -> usize {
        self.components.iter().map(|c| c.h as usize).max().unwrap_or(1)
    }

    fn v_max(&self) -> usize {
        self.components.iter().map(|c| c.v as usize).max().unwrap_or(1)
    }

    pub fn mcu_grid(&self) -> (usize, usize) {
        (
            (self.width as usize).div_ceil(8 * self.h_max()),
            (self.height as usize).div_ceil(8 * self.v_max()),
        )
    }

    /// Allocated block grid of component `c`, `(wide, tall)`.
    pub fn block_grid(&self, c: usize) -> (usize, usize) {
        let (mx, my) = self.mcu_grid();
        (mx * self.components[c].h as usize, my * self.components[c].v as usize)
    }

    /// Blocks visited by a single-component scan of component `c`, `(wide, tall)`.
    pub fn scan_extent(&self, c: usize) -> (usize, usize) {
        let spec = self.components[c];
        let w = (self.width as usize * spec.h as usize).div_ceil(self.h_max());
        let h = (self.height as usize * spec.v as usize).div_ceil(self.v_max());
        (w.div_ceil(8), h.div_ceil(8))
    }

    /// Header segments up to, not including, the first SOS.
    pub fn headers(&self) -> Vec<u8> {
        let mut out = vec![0xFF, 0xD8];

        for (id, values) in &self.quant_tables {
            out.extend([0xFF, 0xDB, 0x00, 0x43, *id]);
            for &natural in ZIGZAG_TO_NATURAL.iter() {
                out.push(values[natural] as u8);
            }
        }

        let len = 8 + 3 * self.components.len() as u16;
        out.extend([0xFF, 0xC0 + self.sof]);
        out.extend(len.to_be_bytes());
        out.push(8);
        out.extend(self.height.to_be_bytes());
        out.extend(self.width.to_be_bytes());
        out.push(self.components.len() as u8);
        for c in &self.components {
            out.extend([c.id, (c.h << 4) | c.v, c.quant_table]);
        }

        for (class, counts, symbols) in [
            (0x00u8, &LUMA_DC_COUNTS, &LUMA_DC_SYMBOLS[..]),
            (0x10u8, &LUMA_AC_COUNTS, &LUMA_AC_SYMBOLS[..]),
        ] {
            let len = 3 + 16 + symbols.len() as u16;
            out.extend([0xFF, 0xC4]);
            out.extend(len.to_be_bytes());
            out.push(class);
            out.extend(counts.iter());
            out.extend(symbols.iter());
        }

        if self.restart_interval > 0 {
            out.extend([0xFF, 0xDD, 0x00, 0x04]);
            out.extend(self.restart_interval.to_be_bytes());
        }

        out
    }

    fn sos(&self, components: &[usize]) -> Vec<u8> {
        let len = 6 + 2 * components.len() as u16;
        let mut out = vec![0xFF, 0xDA];
        out.extend(len.to_be_bytes());
        out.push(components.len() as u8);
        for &c in components {
            out.extend([self.components[c].id, 0x00]);
        }
        out.extend([0, 63, 0]);
        out
    }

    /// One interleaved scan over all components.
    pub fn build(&self, blocks: &[Vec<Block>]) -> Vec<u8> {
        let mut out = self.headers();
        let all: Vec<usize> = (0..self.components.len()).collect();
        out.extend(self.sos(&all));
        out.extend(self.interleaved_data(blocks));
        out.extend([0xFF, 0xD9]);
        out
    }

    /// One single-component scan per entry of `order`.
    pub fn build_separate_scans(&self, blocks: &[Vec<Block>], order: &[usize]) -> Vec<u8> {
        let mut out = self.headers();
        for &c in order {
            out.extend(self.sos(&[c]));
            out.extend(self.single_data(blocks, c));
        }
        out.extend([0xFF, 0xD9]);
        out
    }

    fn interleaved_data(&self, blocks: &[Vec<Block>]) -> Vec<u8> {
        let dc = HuffmanEncoder::new(&LUMA_DC_COUNTS, &LUMA_DC_SYMBOLS);
        let ac = HuffmanEncoder::new(&LUMA_AC_COUNTS, &LUMA_AC_SYMBOLS);
        let (mx, my) = self.mcu_grid();
        let mut writer = BitWriter::new();
        let mut predictors = vec![0i16; self.components.len()];
        let mut restart = 0u8;

        for mcu in 0..mx * my {
            if self.restart_interval > 0 && mcu > 0 && mcu % self.restart_interval as usize == 0 {
                writer.write_restart(restart);
                restart = restart.wrapping_add(1);
                predictors.fill(0);
            }
            let (x, y) = (mcu % mx, mcu / mx);
            for (c, spec) in self.components.iter().enumerate() {
                let (wide, _) = self.block_grid(c);
                for by in 0..spec.v as usize {
                    for bx in 0..spec.h as usize {
                        let row = y * spec.v as usize + by;
                        let col = x * spec.h as usize + bx;
                        encode_block(
                            &mut writer,
                            &blocks[c][row * wide + col],
                            &mut predictors[c],
                            &dc,
                            &ac,
                        );
                    }
                }
            }
        }

        writer.into_bytes()
    }

    fn single_data(&self, blocks: &[Vec<Block>], c: usize) -> Vec<u8> {
        let dc = HuffmanEncoder::new(&LUMA_DC_COUNTS, &LUMA_DC_SYMBOLS);
        let ac = HuffmanEncoder::new(&LUMA_AC_COUNTS, &LUMA_AC_SYMBOLS);
        let (wide, _) = self.block_grid(c);
        let (ex, ey) = self.scan_extent(c);
        let mut writer = BitWriter::new();
        let mut predictor = 0i16;
        let mut restart = 0u8;

        for mcu in 0..ex * ey {
            if self.restart_interval > 0 && mcu > 0 && mcu % self.restart_interval as usize == 0 {
                writer.write_restart(restart);
                restart = restart.wrapping_add(1);
                predictor = 0;
            }
            let (x, y) = (mcu % ex, mcu / ex);
            encode_block(&mut writer, &blocks[c][y * wide + x], &mut predictor, &dc, &ac);
        }

        writer.into_bytes()
    }
}

/// A block with only a DC coefficient.
pub fn dc_block(dc: i16) -> Block {
    let mut block = [0i16; 64];
    block[0] = dc;
    block
}

/// Flat quantization table.
pub fn flat_quant(step: u16) -> [u16; 64] {
    [step; 64]
}

/// Direct evaluation of dequantize, inverse DCT and level shift for one block.
pub fn reference_samples(block: &Block, quant: &[u16; 64]) -> [u8; 64] {
    use std::f64::consts::PI;
    let alpha = |k: usize| if k == 0 { 1.0 / 2f64.sqrt() } else { 1.0 };
    let mut out = [0u8; 64];
    for y in 0..8 {
        for x in 0..8 {
            let mut sum = 0.0;
            for v in 0..8 {
                for u in 0..8 {
                    let coefficient = block[v * 8 + u] as f64 * quant[v * 8 + u] as f64;
                    sum += alpha(u)
                        * alpha(v)
                        * coefficient
                        * ((2 * x + 1) as f64 * u as f64 * PI / 16.0).cos()
                        * ((2 * y + 1) as f64 * v as f64 * PI / 16.0).cos();
                }
            }
            out[y * 8 + x] = ((0.25 * sum).round() + 128.0).clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Offset just past the last SOS segment header.
pub fn last_scan_start(jpeg: &[u8]) -> usize {
    let sos = jpeg
        .windows(2)
        .rposition(|w| w == [0xFF, 0xDA])
        .expect("no SOS marker");
    let len = u16::from_be_bytes([jpeg[sos + 2], jpeg[sos + 3]]) as usize;
    sos + 2 + len
}

/// Replace the entropy-coded data of the last scan, keeping everything from its terminating
/// marker on.
pub fn replace_scan_data(jpeg: &[u8], data: &[u8]) -> Vec<u8> {
    let start = last_scan_start(jpeg);
    let end = jpeg.len() - 2;
    let mut out = jpeg[..start].to_vec();
    out.extend_from_slice(data);
    out.extend_from_slice(&jpeg[end..]);
    out
}

/// Insert `junk` right before the first restart marker of the last scan.
pub fn insert_before_first_restart(jpeg: &[u8], junk: &[u8]) -> Vec<u8> {
    let start = last_scan_start(jpeg);
    let rst = start
        + jpeg[start..]
            .windows(2)
            .position(|w| w[0] == 0xFF && (0xD0..=0xD7).contains(&w[1]))
            .expect("no restart marker");
    let mut out = jpeg[..rst].to_vec();
    out.extend_from_slice(junk);
    out.extend_from_slice(&jpeg[rst..]);
    out
}
