use std::path::Path;

use crate::{CliError, CliResult};

pub mod decode;
pub mod inspect;

fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// An 8x8 grayscale baseline JPEG whose single DC coefficient decodes to 138 everywhere.
#[cfg(test)]
pub(crate) fn gray_8x8_jpeg() -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8];

    jpeg.extend([0xFF, 0xDB, 0x00, 0x43, 0x00]);
    jpeg.extend([8u8; 64]);

    jpeg.extend([0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x08, 0x00, 0x08, 0x01]);
    jpeg.extend([0x01, 0x11, 0x00]);

    // DC: "0" -> category 0, "1" -> category 4.
    jpeg.extend([0xFF, 0xC4, 0x00, 0x15, 0x00, 0x02]);
    jpeg.extend([0u8; 15]);
    jpeg.extend([0x00, 0x04]);
    // AC: "0" -> end of block.
    jpeg.extend([0xFF, 0xC4, 0x00, 0x14, 0x10, 0x01]);
    jpeg.extend([0u8; 15]);
    jpeg.push(0x00);

    jpeg.extend([0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    // 1 1010 0 111: DC +10, EOB, padding.
    jpeg.push(0xD7);

    jpeg.extend([0xFF, 0xD9]);
    jpeg
}
