//! Shared types: [`ByteOrder`] and [`EncodingFormat`].

use std::fmt;

use serde::Serialize;

use crate::{MseedError, Result};

/// Byte order declared by Blockette 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    /// Convert the Blockette 1000 word-order code (0 = little, 1 = big).
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Little),
            1 => Ok(Self::Big),
            _ => Err(MseedError::UnsupportedByteOrder(code)),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Big => write!(f, "big-endian"),
            Self::Little => write!(f, "little-endian"),
        }
    }
}

/// Encoding format for sample data in a miniSEED v2 record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EncodingFormat {
    /// ASCII text (code 0).
    Ascii,
    /// 16-bit signed integer (code 1).
    Int16,
    /// 32-bit signed integer (code 3).
    Int32,
    /// 32-bit IEEE float (code 4).
    Float32,
    /// 64-bit IEEE double (code 5).
    Float64,
    /// Steim-1 compressed integers (code 10).
    Steim1,
    /// Steim-2 compressed integers (code 11).
    Steim2,
}

impl EncodingFormat {
    /// Convert a raw encoding code (from Blockette 1000) to an `EncodingFormat`.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Ascii),
            1 => Ok(Self::Int16),
            3 => Ok(Self::Int32),
            4 => Ok(Self::Float32),
            5 => Ok(Self::Float64),
            10 => Ok(Self::Steim1),
            11 => Ok(Self::Steim2),
            _ => Err(MseedError::UnsupportedEncoding(code)),
        }
    }

    /// Convert to the raw encoding code used in Blockette 1000.
    pub fn to_code(self) -> u8 {
        match self {
            Self::Ascii => 0,
            Self::Int16 => 1,
            Self::Int32 => 3,
            Self::Float32 => 4,
            Self::Float64 => 5,
            Self::Steim1 => 10,
            Self::Steim2 => 11,
        }
    }

    /// Width in bytes of one uncompressed sample, `None` for ASCII and Steim.
    pub fn sample_width(self) -> Option<usize> {
        match self {
            Self::Int16 => Some(2),
            Self::Int32 | Self::Float32 => Some(4),
            Self::Float64 => Some(8),
            Self::Ascii | Self::Steim1 | Self::Steim2 => None,
        }
    }
}

impl fmt::Display for EncodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascii => write!(f, "ASCII"),
            Self::Int16 => write!(f, "INT16"),
            Self::Int32 => write!(f, "INT32"),
            Self::Float32 => write!(f, "FLOAT32"),
            Self::Float64 => write!(f, "FLOAT64"),
            Self::Steim1 => write!(f, "Steim1"),
            Self::Steim2 => write!(f, "Steim2"),
        }
    }
}
