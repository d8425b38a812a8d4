use std::path::{Path, PathBuf};

use clap::Args;
use image::{ColorType, ImageFormat};
use jdec_core::{DecodedImage, Decoder, DecoderOptions};

use super::read_input;
use crate::{CliError, CliResult};

/// Decodes a baseline JPEG into a BMP bitmap
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// JPEG image to decode, used readonly.
    #[arg(short = 'i', long = "in", value_name = "jpeg file", required = true)]
    pub input: PathBuf,

    /// Decoded image will be stored as file
    #[arg(short = 'o', long = "out", value_name = "output file", required = true)]
    pub write_to_file: PathBuf,

    /// Store the interleaved samples as they are instead of a bitmap
    #[arg(long)]
    pub raw: bool,
}

impl DecodeArgs {
    pub fn run(self, options: DecoderOptions) -> CliResult<()> {
        let data = read_input(&self.input)?;
        let image = Decoder::with_options(&data, options).decode()?;
        log::info!(
            "decoded {}: {}x{}, {} channel(s)",
            self.input.display(),
            image.width,
            image.height,
            image.channels
        );

        if self.raw {
            write_raw(&image, &self.write_to_file)
        } else {
            write_bitmap(&image, &self.write_to_file)
        }
    }
}

fn write_raw(image: &DecodedImage, path: &Path) -> CliResult<()> {
    std::fs::write(path, &image.pixels).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_bitmap(image: &DecodedImage, path: &Path) -> CliResult<()> {
    let color = match image.channels {
        1 => ColorType::L8,
        3 => ColorType::Rgb8,
        n => return Err(CliError::UnsupportedChannels(n)),
    };
    image::save_buffer_with_format(
        path,
        &image.pixels,
        image.width,
        image.height,
        color,
        ImageFormat::Bmp,
    )?;
    Ok(())
}
