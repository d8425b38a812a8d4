//! Assembly of component block grids into an interleaved pixel buffer.

use crate::color::{convert_ycbcr_in_place, Upsampler};
use crate::component::FrameInfo;

/// A decoded image: 8-bit samples, row-major, channels interleaved per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    /// Sampling factors of the first component.
    pub h_sampling: u8,
    pub v_sampling: u8,
    /// `width * height * channels` bytes. RGB for three- and four-component frames (the
    /// fourth channel is passed through), otherwise the component samples as decoded.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Samples of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        &self.pixels[start..start + self.channels]
    }
}

/// Lay out the transformed blocks of `frame` as an interleaved raster and colour-convert it.
///
/// The image is walked one 8x8 tile at a time, clipped at the right and bottom edges. Each
/// component is addressed through its own block grid, upsampled by nearest neighbour.
pub fn assemble(frame: &FrameInfo) -> DecodedImage {
    let width = frame.width as usize;
    let height = frame.height as usize;
    let channels = frame.components.len();
    let (h_max, v_max) = (frame.h_max(), frame.v_max());

    let upsamplers: Vec<Upsampler> = frame
        .components
        .iter()
        .map(|c| Upsampler::new(c.h_sampling, c.v_sampling, h_max, v_max))
        .collect();

    let mut pixels = vec![0u8; width * height * channels];

    for tile_y in (0..height).step_by(8) {
        for tile_x in (0..width).step_by(8) {
            let rows = (height - tile_y).min(8);
            let cols = (width - tile_x).min(8);

            for y in tile_y..tile_y + rows {
                for x in tile_x..tile_x + cols {
                    let out = (y * width + x) * channels;
                    for (c, (component, upsampler)) in
                        frame.components.iter().zip(upsamplers.iter()).enumerate()
                    {
                        let (sx, sy) = upsampler.source(x, y);
                        let block = component.block(sy / 8, sx / 8);
                        pixels[out + c] = block[(sy % 8) * 8 + sx % 8] as u8;
                    }
                }
            }
        }
    }

    if channels >= 3 {
        convert_ycbcr_in_place(&mut pixels, channels);
    }

    let first = &frame.components[0];
    log::debug!(
        "assembled {width}x{height} raster with {channels} channel(s), sampling {}x{}",
        first.h_sampling,
        first.v_sampling
    );

    DecodedImage {
        width: frame.width as u32,
        height: frame.height as u32,
        channels,
        h_sampling: first.h_sampling,
        v_sampling: first.v_sampling,
        pixels,
    }
}
