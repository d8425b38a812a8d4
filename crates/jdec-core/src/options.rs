//! Decoder configuration.

/// Limits and policy knobs for a single decode.
///
/// The defaults accept any sane camera image while rejecting inputs whose declared geometry
/// would allocate gigabytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Reject inputs larger than this many bytes.
    pub max_input_bytes: usize,
    /// Reject frames whose `width * height` exceeds this.
    pub max_pixels: u64,
    /// Upper bound on the number of MCUs decoded across all scans.
    pub max_mcus: u64,
    /// Fail instead of resynchronising when a restart marker is not where it should be.
    pub strict_restart: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: 64 * 1024 * 1024,
            max_pixels: 1 << 28,
            max_mcus: u64::MAX,
            strict_restart: false,
        }
    }
}

impl DecoderOptions {
    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    pub fn with_max_mcus(mut self, max_mcus: u64) -> Self {
        self.max_mcus = max_mcus;
        self
    }

    pub fn with_strict_restart(mut self, strict_restart: bool) -> Self {
        self.strict_restart = strict_restart;
        self
    }
}
