//! Huffman decoding of one sequential-mode 8x8 block.

use crate::bit_reader::BitReader;
use crate::component::CoefficientBlock;
use crate::error::{JpegError, Result};
use crate::huffman::HuffmanTable;

/// Largest DC difference magnitude category (ITU T.81 table F.1, 8-bit samples).
const MAX_DC_BITS: u8 = 11;
/// Largest AC magnitude category (table F.2).
const MAX_AC_BITS: u8 = 10;

/// End of block: all remaining coefficients are zero.
const EOB: u8 = 0x00;
/// Zero run length: sixteen zero coefficients.
const ZRL: u8 = 0xF0;

/// Decode one block into `block` (natural order).
///
/// `predictor` holds the previous DC value of the component and is updated in place.
pub fn decode_block(
    reader: &mut BitReader<'_>,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    predictor: &mut i16,
    zigzag: &[usize; 64],
    block: &mut CoefficientBlock,
) -> Result<()> {
    block.fill(0);

    let dc_bits = dc_table.decode(reader)?;
    if dc_bits > MAX_DC_BITS {
        return Err(JpegError::semantic(format!(
            "DC difference category {dc_bits} exceeds {MAX_DC_BITS}"
        )));
    }
    let diff = reader.receive_extend(dc_bits)?;
    *predictor = predictor.wrapping_add(diff);
    block[zigzag[0]] = *predictor;

    let mut k = 1;
    while k < 64 {
        let symbol = ac_table.decode(reader)?;
        let run = (symbol >> 4) as usize;
        let bits = symbol & 0x0F;

        if bits == 0 {
            match symbol {
                EOB => break,
                ZRL => {
                    k += 16;
                    if k > 64 {
                        return Err(JpegError::desync(
                            reader.position(),
                            "zero run extends past the end of the block",
                        ));
                    }
                }
                _ => {
                    return Err(JpegError::desync(
                        reader.position(),
                        format!("invalid AC symbol 0x{symbol:02X}"),
                    ))
                }
            }
            continue;
        }

        if bits > MAX_AC_BITS {
            return Err(JpegError::semantic(format!(
                "AC coefficient category {bits} exceeds {MAX_AC_BITS}"
            )));
        }

        k += run;
        if k > 63 {
            return Err(JpegError::desync(
                reader.position(),
                "coefficient index past the end of the block",
            ));
        }
        block[zigzag[k]] = reader.receive_extend(bits)?;
        k += 1;
    }

    log::trace!("block decoded: dc={} last index={}", block[0], k.min(64) - 1);

    Ok(())
}
