//! Canonical Huffman tables.
//!
//! A table is stored the way a DHT segment carries it: sixteen per-length code counts and the
//! symbols ordered by code length. Codes are never materialised for decoding; the decoder
//! walks the length tiers with running `first`/`index` accumulators (ITU T.81 F.2.2.3).

use std::fmt::Write as _;

use crate::bit_reader::BitReader;
use crate::error::{JpegError, Result};

/// Table class, the high nibble of a DHT table selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanClass {
    Dc,
    Ac,
}

impl HuffmanClass {
    pub fn from_u8(class: u8) -> Result<Self> {
        match class {
            0 => Ok(HuffmanClass::Dc),
            1 => Ok(HuffmanClass::Ac),
            _ => Err(JpegError::structural(format!(
                "invalid Huffman table class {class}"
            ))),
        }
    }
}

/// An explicit code assignment, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalCode {
    pub symbol: u8,
    /// Code length in bits, 1..=16.
    pub length: u8,
    pub code: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    pub class: HuffmanClass,
    pub id: u8,
    /// `counts[i]` is the number of codes of length `i + 1`.
    counts: [u8; 16],
    /// Symbols in order of increasing code length.
    symbols: Vec<u8>,
}

impl HuffmanTable {
    /// Build a table, checking that the counts describe a valid prefix code for `symbols`.
    pub fn new(class: HuffmanClass, id: u8, counts: [u8; 16], symbols: Vec<u8>) -> Result<Self> {
        let total: usize = counts.iter().map(|&n| n as usize).sum();
        if total != symbols.len() {
            return Err(JpegError::structural(format!(
                "Huffman table {id}: {total} codes declared but {} symbols given",
                symbols.len()
            )));
        }
        if total > 256 {
            return Err(JpegError::structural(format!(
                "Huffman table {id} has {total} symbols, more than 256"
            )));
        }

        // Codes of each length must fit in that length.
        let mut code: u32 = 0;
        for (len, &count) in counts.iter().enumerate() {
            code += count as u32;
            if code > 1u32 << (len + 1) {
                return Err(JpegError::structural(format!(
                    "Huffman table {id} assigns too many codes of length {}",
                    len + 1
                )));
            }
            code <<= 1;
        }

        Ok(HuffmanTable {
            class,
            id,
            counts,
            symbols,
        })
    }

    pub fn counts(&self) -> &[u8; 16] {
        &self.counts
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Decode one symbol, reading the code one bit at a time.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<u8> {
        let mut code = reader.read_bit()? as i32;
        let mut first: i32 = 0;
        let mut index: i32 = 0;

        for (tier, &count) in self.counts.iter().enumerate() {
            let count = count as i32;
            let offset = code - first;
            if offset >= 0 && offset < count {
                let position = (index + offset) as usize;
                return self.symbols.get(position).copied().ok_or_else(|| {
                    JpegError::desync(
                        reader.position(),
                        format!(
                            "Huffman table {} symbol index {position} out of range",
                            self.id
                        ),
                    )
                });
            }

            first = (first + count) << 1;
            index += count;
            if tier < 15 {
                code = (code << 1) | reader.read_bit()? as i32;
            }
        }

        Err(JpegError::desync(
            reader.position(),
            format!("no code of table {} matches within 16 bits", self.id),
        ))
    }

    /// Assign the canonical code of every symbol, in symbol-list order.
    pub fn canonical_codes(&self) -> Vec<CanonicalCode> {
        let mut codes = Vec::with_capacity(self.symbols.len());
        let mut symbols = self.symbols.iter();
        let mut next_code: u32 = 0;

        for (len, &count) in self.counts.iter().enumerate() {
            for _ in 0..count {
                if let Some(&symbol) = symbols.next() {
                    codes.push(CanonicalCode {
                        symbol,
                        length: len as u8 + 1,
                        code: next_code as u16,
                    });
                }
                next_code += 1;
            }
            next_code <<= 1;
        }

        codes
    }

    /// Render the code assignment as text, one `symbol length code` line per symbol.
    pub fn to_code_listing(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} table {} ({} symbols)",
            match self.class {
                HuffmanClass::Dc => "DC",
                HuffmanClass::Ac => "AC",
            },
            self.id,
            self.symbols.len()
        );
        for entry in self.canonical_codes() {
            let _ = writeln!(
                out,
                "  0x{:02X}  {:2}  {:0width$b}",
                entry.symbol,
                entry.length,
                entry.code,
                width = entry.length as usize
            );
        }
        out
    }
}

/// The four DC and four AC table slots of a baseline decoder.
#[derive(Debug, Clone, Default)]
pub struct HuffmanTables {
    dc: [Option<HuffmanTable>; 4],
    ac: [Option<HuffmanTable>; 4],
}

impl HuffmanTables {
    /// Install a table, returning the one it replaces.
    pub fn insert(&mut self, table: HuffmanTable) -> Result<Option<HuffmanTable>> {
        let id = table.id as usize;
        if id > 3 {
            return Err(JpegError::structural(format!(
                "Huffman table id {id} exceeds the maximum of 3"
            )));
        }
        let slot = match table.class {
            HuffmanClass::Dc => &mut self.dc[id],
            HuffmanClass::Ac => &mut self.ac[id],
        };
        Ok(slot.replace(table))
    }

    pub fn get(&self, class: HuffmanClass, id: u8) -> Option<&HuffmanTable> {
        let slots = match class {
            HuffmanClass::Dc => &self.dc,
            HuffmanClass::Ac => &self.ac,
        };
        slots.get(id as usize).and_then(Option::as_ref)
    }

    /// Installed tables, DC first.
    pub fn iter(&self) -> impl Iterator<Item = &HuffmanTable> {
        self.dc.iter().chain(self.ac.iter()).flatten()
    }
}
