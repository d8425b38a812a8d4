//! Marker codes of the JPEG interchange format (ITU T.81 table B.1).

use std::fmt;

/// A marker code, the byte that follows `0xFF` outside entropy-coded data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Marker {
    /// Start of frame; the payload is the low nibble of the code (0xC0..=0xCF minus DHT, JPG, DAC).
    SOF(u8),
    DHT,
    DAC,
    JPG,
    /// Restart marker, modulo-8 sequence number.
    RST(u8),
    SOI,
    EOI,
    SOS,
    DQT,
    DNL,
    DRI,
    DHP,
    EXP,
    APP(u8),
    JPGn(u8),
    COM,
    TEM,
    /// Reserved codes 0x02..=0xBF.
    RES(u8),
}

impl Marker {
    /// Map a marker code to a `Marker`.
    ///
    /// `0x00` (a stuffed zero) and `0xFF` (a fill byte) are not markers.
    pub fn from_u8(code: u8) -> Option<Marker> {
        use Marker::*;
        Some(match code {
            0x00 | 0xFF => return None,
            0x01 => TEM,
            0x02..=0xBF => RES(code),
            0xC4 => DHT,
            0xC8 => JPG,
            0xCC => DAC,
            0xC0..=0xCF => SOF(code - 0xC0),
            0xD0..=0xD7 => RST(code - 0xD0),
            0xD8 => SOI,
            0xD9 => EOI,
            0xDA => SOS,
            0xDB => DQT,
            0xDC => DNL,
            0xDD => DRI,
            0xDE => DHP,
            0xDF => EXP,
            0xE0..=0xEF => APP(code - 0xE0),
            0xF0..=0xFD => JPGn(code - 0xF0),
            0xFE => COM,
        })
    }

    pub fn to_u8(self) -> u8 {
        use Marker::*;
        match self {
            TEM => 0x01,
            RES(code) => code,
            SOF(n) => 0xC0 + n,
            DHT => 0xC4,
            JPG => 0xC8,
            DAC => 0xCC,
            RST(n) => 0xD0 + n,
            SOI => 0xD8,
            EOI => 0xD9,
            SOS => 0xDA,
            DQT => 0xDB,
            DNL => 0xDC,
            DRI => 0xDD,
            DHP => 0xDE,
            EXP => 0xDF,
            APP(n) => 0xE0 + n,
            JPGn(n) => 0xF0 + n,
            COM => 0xFE,
        }
    }

    /// Whether a two-byte length and a payload follow the marker.
    pub fn has_length(self) -> bool {
        !matches!(
            self,
            Marker::SOI | Marker::EOI | Marker::RST(_) | Marker::TEM
        )
    }

    /// Human readable name of a start-of-frame variant.
    pub fn sof_description(n: u8) -> &'static str {
        match n {
            0 => "baseline DCT",
            1 => "extended sequential DCT",
            2 => "progressive DCT",
            3 => "lossless",
            5 => "differential sequential DCT",
            6 => "differential progressive DCT",
            7 => "differential lossless",
            9 => "extended sequential DCT, arithmetic coding",
            10 => "progressive DCT, arithmetic coding",
            11 => "lossless, arithmetic coding",
            13 => "differential sequential DCT, arithmetic coding",
            14 => "differential progressive DCT, arithmetic coding",
            15 => "differential lossless, arithmetic coding",
            _ => "unknown frame type",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::SOF(n) => write!(f, "SOF{n}"),
            Marker::RST(n) => write!(f, "RST{n}"),
            Marker::APP(n) => write!(f, "APP{n}"),
            Marker::JPGn(n) => write!(f, "JPG{n}"),
            Marker::RES(code) => write!(f, "RES(0x{code:02X})"),
            other => write!(f, "{other:?}"),
        }
    }
}
