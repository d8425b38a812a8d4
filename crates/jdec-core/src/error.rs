//! Error types for JPEG decoding.

use std::fmt;
use thiserror::Error;

/// Result type alias for decoder operations.
pub type Result<T> = std::result::Result<T, JpegError>;

/// Coarse error class, for callers that only want to branch on what went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    EntropyDesync,
    Semantic,
    Exhaustion,
    Unsupported,
    LimitExceeded,
}

/// Errors that can occur while decoding a JPEG stream.
///
/// None of these are recoverable for the image being decoded; no partial raster is ever
/// returned alongside an error.
#[derive(Error)]
pub enum JpegError {
    /// Missing SOI, truncated segment or file, segment fields out of range.
    #[error("malformed JPEG structure: {reason}")]
    Structural { reason: String },

    /// The entropy-coded data does not match the Huffman tables in use.
    #[error("entropy-coded data out of sync at byte {position}: {reason}")]
    EntropyDesync { position: usize, reason: String },

    /// Well-formed segments that reference something that does not exist or is out of bounds.
    #[error("invalid JPEG content: {reason}")]
    Semantic { reason: String },

    /// More bits were requested than the entropy-coded segment holds.
    #[error("entropy-coded data exhausted at byte {position} while reading {requested} bits")]
    Exhaustion { position: usize, requested: u8 },

    /// Progressive, lossless, hierarchical or arithmetic-coded streams.
    #[error("unsupported JPEG feature: {feature}")]
    Unsupported { feature: String },

    /// A caller supplied work budget was exceeded.
    #[error("decode limit exceeded: {what} is {actual}, limit is {limit}")]
    LimitExceeded {
        what: &'static str,
        actual: u64,
        limit: u64,
    },
}

impl JpegError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JpegError::Structural { .. } => ErrorKind::Structural,
            JpegError::EntropyDesync { .. } => ErrorKind::EntropyDesync,
            JpegError::Semantic { .. } => ErrorKind::Semantic,
            JpegError::Exhaustion { .. } => ErrorKind::Exhaustion,
            JpegError::Unsupported { .. } => ErrorKind::Unsupported,
            JpegError::LimitExceeded { .. } => ErrorKind::LimitExceeded,
        }
    }

    pub(crate) fn structural(reason: impl Into<String>) -> Self {
        JpegError::Structural {
            reason: reason.into(),
        }
    }

    pub(crate) fn semantic(reason: impl Into<String>) -> Self {
        JpegError::Semantic {
            reason: reason.into(),
        }
    }

    pub(crate) fn desync(position: usize, reason: impl Into<String>) -> Self {
        JpegError::EntropyDesync {
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(feature: impl Into<String>) -> Self {
        JpegError::Unsupported {
            feature: feature.into(),
        }
    }
}

impl fmt::Debug for JpegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use Display for Debug so unwrap() shows user-friendly messages
        write!(f, "{self}")
    }
}
