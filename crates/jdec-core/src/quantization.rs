//! Quantization tables.

use std::fmt::Write as _;

use crate::error::{JpegError, Result};

/// Element precision of a quantization table (the Pq nibble of DQT).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Bits8,
    Bits16,
}

/// A quantization table in natural (row-major) order.
///
/// DQT segments carry values in zigzag order; the parser reorders them on the way in so the
/// table lines up with coefficient blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    pub id: u8,
    pub precision: Precision,
    pub values: [u16; 64],
}

impl QuantizationTable {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u16 {
        self.values[row * 8 + col]
    }

    /// Format table as ASCII art for display.
    pub fn to_ascii_table(&self) -> String {
        let mut out = String::new();

        out.push_str("|    |");
        for x in 0..8 {
            let _ = write!(out, "   x{x} |");
        }
        out.push('\n');

        out.push_str("|----|");
        out.push_str(&"------|".repeat(8));
        out.push('\n');

        for y in 0..8 {
            let _ = write!(out, "| y{y} ");
            for x in 0..8 {
                let _ = write!(out, "| {:4} ", self.get(y, x));
            }
            out.push_str("|\n");
        }

        out
    }
}

/// The four quantization table slots.
#[derive(Debug, Clone, Default)]
pub struct QuantizationTables {
    slots: [Option<QuantizationTable>; 4],
}

impl QuantizationTables {
    /// Install a table, returning the one it replaces.
    pub fn insert(&mut self, table: QuantizationTable) -> Result<Option<QuantizationTable>> {
        let slot = self.slots.get_mut(table.id as usize).ok_or_else(|| {
            JpegError::structural(format!(
                "quantization table id {} exceeds the maximum of 3",
                table.id
            ))
        })?;
        Ok(slot.replace(table))
    }

    pub fn get(&self, id: u8) -> Option<&QuantizationTable> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuantizationTable> {
        self.slots.iter().flatten()
    }
}
