//! Chroma upsampling and YCbCr to RGB conversion.

/// Nearest-neighbour mapping from image coordinates to one component's sample grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upsampler {
    h_sampling: usize,
    v_sampling: usize,
    h_max: usize,
    v_max: usize,
}

impl Upsampler {
    pub fn new(h_sampling: u8, v_sampling: u8, h_max: u8, v_max: u8) -> Self {
        Upsampler {
            h_sampling: h_sampling as usize,
            v_sampling: v_sampling as usize,
            h_max: h_max as usize,
            v_max: v_max as usize,
        }
    }

    /// Sample coordinates `(sx, sy)` that pixel `(x, y)` reads from.
    ///
    /// A component sampled at `Hi` of `Hmax` covers `Hmax / Hi` pixels per sample; every one of
    /// them reads the same sample.
    #[inline]
    pub fn source(&self, x: usize, y: usize) -> (usize, usize) {
        (
            x * self.h_sampling / self.h_max,
            y * self.v_sampling / self.v_max,
        )
    }

    pub fn is_identity(&self) -> bool {
        self.h_sampling == self.h_max && self.v_sampling == self.v_max
    }
}

#[inline]
fn clamp_round(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Convert one full-range YCbCr sample to RGB (JFIF conversion).
#[inline]
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    let y = y as f32;
    let cb = cb as f32 - 128.0;
    let cr = cr as f32 - 128.0;

    [
        clamp_round(y + 1.402 * cr),
        clamp_round(y - 0.3441 * cb - 0.71414 * cr),
        clamp_round(y + 1.772 * cb),
    ]
}

/// Convert the first three channels of every pixel in place.
///
/// Channels past the third are left untouched. Buffers with fewer than three channels are
/// not colour and are not modified.
pub fn convert_ycbcr_in_place(pixels: &mut [u8], channels: usize) {
    if channels < 3 {
        return;
    }
    for pixel in pixels.chunks_exact_mut(channels) {
        let rgb = ycbcr_to_rgb(pixel[0], pixel[1], pixel[2]);
        pixel[..3].copy_from_slice(&rgb);
    }
}
