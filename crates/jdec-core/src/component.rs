//! Frame geometry and per-component coefficient storage.

use std::fmt;

use crate::marker::Marker;

/// 64 coefficients in natural (row-major) order.
///
/// Holds frequency-domain values after entropy decoding and spatial samples after the
/// inverse transform.
pub type CoefficientBlock = [i16; 64];

/// One image component as declared in the frame header.
#[derive(Clone)]
pub struct Component {
    pub id: u8,
    pub h_sampling: u8,
    pub v_sampling: u8,
    pub quant_table_id: u8,
    /// Huffman table selectors, set by the most recent scan that included this component.
    pub dc_table_id: u8,
    pub ac_table_id: u8,
    /// Block grid covering the whole MCU grid, row-major.
    pub blocks: Vec<CoefficientBlock>,
    pub blocks_wide: usize,
    pub blocks_tall: usize,
    /// Set once a scan has decoded this component.
    pub covered: bool,
}

impl Component {
    pub fn new(id: u8, h_sampling: u8, v_sampling: u8, quant_table_id: u8) -> Self {
        Component {
            id,
            h_sampling,
            v_sampling,
            quant_table_id,
            dc_table_id: 0,
            ac_table_id: 0,
            blocks: Vec::new(),
            blocks_wide: 0,
            blocks_tall: 0,
            covered: false,
        }
    }

    /// Size the block grid for an `mcus_x` by `mcus_y` MCU grid.
    pub fn allocate(&mut self, mcus_x: usize, mcus_y: usize) {
        self.blocks_wide = mcus_x * self.h_sampling as usize;
        self.blocks_tall = mcus_y * self.v_sampling as usize;
        self.blocks = vec![[0i16; 64]; self.blocks_wide * self.blocks_tall];
    }

    #[inline]
    pub fn block(&self, row: usize, col: usize) -> &CoefficientBlock {
        &self.blocks[row * self.blocks_wide + col]
    }

    #[inline]
    pub fn block_mut(&mut self, row: usize, col: usize) -> &mut CoefficientBlock {
        &mut self.blocks[row * self.blocks_wide + col]
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("h_sampling", &self.h_sampling)
            .field("v_sampling", &self.v_sampling)
            .field("quant_table_id", &self.quant_table_id)
            .field("dc_table_id", &self.dc_table_id)
            .field("ac_table_id", &self.ac_table_id)
            .field("blocks", &format_args!("{}x{}", self.blocks_wide, self.blocks_tall))
            .field("covered", &self.covered)
            .finish()
    }
}

/// Frame header (SOFn) contents.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    /// Low nibble of the SOF marker code.
    pub sof: u8,
    pub precision: u8,
    pub width: u16,
    pub height: u16,
    pub components: Vec<Component>,
}

impl FrameInfo {
    pub fn is_baseline(&self) -> bool {
        self.sof == 0
    }

    /// SOF0 and SOF1 frames are Huffman-coded sequential DCT.
    pub fn is_sequential_huffman(&self) -> bool {
        matches!(self.sof, 0 | 1)
    }

    pub fn is_progressive(&self) -> bool {
        matches!(self.sof, 2 | 6 | 10 | 14)
    }

    pub fn description(&self) -> &'static str {
        Marker::sof_description(self.sof)
    }

    pub fn h_max(&self) -> u8 {
        self.components.iter().map(|c| c.h_sampling).max().unwrap_or(1)
    }

    pub fn v_max(&self) -> u8 {
        self.components.iter().map(|c| c.v_sampling).max().unwrap_or(1)
    }

    /// Number of MCU columns of an interleaved scan.
    pub fn mcus_x(&self) -> usize {
        (self.width as usize).div_ceil(8 * self.h_max() as usize)
    }

    /// Number of MCU rows of an interleaved scan.
    pub fn mcus_y(&self) -> usize {
        (self.height as usize).div_ceil(8 * self.v_max() as usize)
    }

    /// Blocks needed to cover component `index`'s own sample grid, `(wide, tall)`.
    ///
    /// This is the extent of a non-interleaved scan of that component (ITU T.81 A.1.1).
    pub fn component_blocks(&self, index: usize) -> (usize, usize) {
        let component = &self.components[index];
        let width = (self.width as usize * component.h_sampling as usize)
            .div_ceil(self.h_max() as usize);
        let height = (self.height as usize * component.v_sampling as usize)
            .div_ceil(self.v_max() as usize);
        (width.div_ceil(8), height.div_ceil(8))
    }

    pub fn component_index(&self, id: u8) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }
}
