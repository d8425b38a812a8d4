//! Dequantization, inverse DCT and level shift.
//!
//! Runs over every block of every component after entropy decoding. Blocks are independent of
//! one another here, unlike during entropy decoding.

use std::f32::consts::{FRAC_1_SQRT_2, PI};

use crate::component::{CoefficientBlock, FrameInfo};
use crate::error::{JpegError, Result};
use crate::quantization::{QuantizationTable, QuantizationTables};

/// Multiply each coefficient by its quantization step.
///
/// Saturates instead of wrapping; a corrupt stream may carry huge coefficients.
pub fn dequantize(block: &mut CoefficientBlock, table: &QuantizationTable) {
    for (coefficient, &step) in block.iter_mut().zip(table.values.iter()) {
        let product = *coefficient as i32 * step as i32;
        *coefficient = product.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    }
}

/// Separable 8x8 inverse DCT with a precomputed basis.
pub struct Idct {
    /// `basis[x][u] = a(u) * cos((2x + 1) u pi / 16) / 2` with `a(0) = 1/sqrt(2)`, `a(u) = 1`
    /// otherwise. The 1-D passes each carry half of the 2-D `1/4` scale.
    basis: [[f32; 8]; 8],
}

impl Default for Idct {
    fn default() -> Self {
        Self::new()
    }
}

impl Idct {
    pub fn new() -> Self {
        let mut basis = [[0f32; 8]; 8];
        for (x, row) in basis.iter_mut().enumerate() {
            for (u, value) in row.iter_mut().enumerate() {
                let alpha = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
                *value = alpha * ((2 * x + 1) as f32 * u as f32 * PI / 16.0).cos() / 2.0;
            }
        }
        Idct { basis }
    }

    /// Transform a dequantized block into spatial samples, rounded to the nearest integer.
    ///
    /// Samples are still centred on zero; see [`level_shift`].
    pub fn inverse(&self, block: &mut CoefficientBlock) {
        // Horizontal pass: rows of frequencies to rows of samples.
        let mut rows = [[0f32; 8]; 8];
        for (v, row) in rows.iter_mut().enumerate() {
            let coefficients = &block[v * 8..v * 8 + 8];
            for (x, out) in row.iter_mut().enumerate() {
                *out = coefficients
                    .iter()
                    .zip(self.basis[x].iter())
                    .map(|(&c, &b)| c as f32 * b)
                    .sum();
            }
        }

        // Vertical pass.
        for y in 0..8 {
            for x in 0..8 {
                let sample: f32 = (0..8).map(|v| self.basis[y][v] * rows[v][x]).sum();
                block[y * 8 + x] = sample.round() as i16;
            }
        }
    }
}

/// Add 128 and clamp to the 8-bit sample range.
pub fn level_shift(block: &mut CoefficientBlock) {
    for sample in block.iter_mut() {
        *sample = (*sample as i32 + 128).clamp(0, 255) as i16;
    }
}

/// Run the transform chain over every block of every component.
pub fn apply(frame: &mut FrameInfo, tables: &QuantizationTables, idct: &Idct) -> Result<()> {
    for component in frame.components.iter_mut() {
        let table = tables.get(component.quant_table_id).ok_or_else(|| {
            JpegError::semantic(format!(
                "component {} uses undefined quantization table {}",
                component.id, component.quant_table_id
            ))
        })?;

        for block in component.blocks.iter_mut() {
            dequantize(block, table);
            idct.inverse(block);
            level_shift(block);
        }

        log::debug!(
            "component {}: transformed {} blocks with quantization table {}",
            component.id,
            component.blocks.len(),
            table.id
        );
    }

    Ok(())
}
