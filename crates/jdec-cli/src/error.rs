use std::path::PathBuf;

use jdec_core::JpegError;
use thiserror::Error;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// The input is not a decodable JPEG.
    #[error(transparent)]
    Decode(#[from] JpegError),

    /// Represents a failure to read the input file.
    #[error("Read error on {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Represents a failure to write the output file.
    #[error("Write error on {}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Represents a failure of the bitmap encoder.
    #[error("Image encoding error")]
    Image(#[from] image::ImageError),

    /// The decoded raster has a channel layout the bitmap writer cannot store.
    #[error("Cannot store a {0}-channel image as a bitmap, use --raw instead")]
    UnsupportedChannels(usize),
}
