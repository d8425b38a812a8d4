//! Baseline and extended-sequential JPEG decoder.
//!
//! Decodes Huffman-coded sequential DCT JPEG streams (SOF0/SOF1, 8-bit) into interleaved 8-bit
//! samples: grayscale for one component, RGB for three (and four, with the last channel passed
//! through).
//!
//! ```no_run
//! let data = std::fs::read("photo.jpg").unwrap();
//! let image = jdec_core::decode(&data).unwrap();
//! println!("{}x{} with {} channels", image.width, image.height, image.channels);
//! ```
//!
//! Pipeline, in order:
//! - [`Decoder`] walks the marker segments ([`parser`]) and fills the table sets
//! - [`EntropyStream`] destuffs each scan's entropy-coded data
//! - [`scan`] decodes MCUs through [`BitReader`] and [`HuffmanTable`] into coefficient blocks
//! - [`transform`] dequantizes and inverse-transforms every block
//! - [`raster`] upsamples, colour-converts and lays out the pixels

pub mod bit_reader;
pub mod color;
pub mod component;
pub mod decoder;
pub mod entropy;
pub mod error;
pub mod huffman;
pub mod marker;
pub mod options;
pub mod parser;
pub mod quantization;
pub mod raster;
pub mod scan;
pub mod transform;
pub mod zigzag;

pub use bit_reader::BitReader;
pub use component::{CoefficientBlock, Component, FrameInfo};
pub use decoder::Decoder;
pub use entropy::{EntropyStream, RestartMarker};
pub use error::{ErrorKind, JpegError, Result};
pub use huffman::{CanonicalCode, HuffmanClass, HuffmanTable, HuffmanTables};
pub use marker::Marker;
pub use options::DecoderOptions;
pub use quantization::{Precision, QuantizationTable, QuantizationTables};
pub use raster::DecodedImage;
pub use zigzag::{zigzag_order, ZIGZAG_TO_NATURAL};

/// Decode a complete JPEG file held in memory with default options.
pub fn decode(data: &[u8]) -> Result<DecodedImage> {
    Decoder::new(data).decode()
}
