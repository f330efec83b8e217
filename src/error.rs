//! Error types for miniSEED record decoding.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MseedError {
    #[error("record too short: expected at least {expected} bytes, got {actual}")]
    RecordTooShort { expected: usize, actual: usize },

    #[error("invalid data start offset {0}: below the 48-byte fixed header")]
    InvalidDataOffset(u16),

    #[error("blockette 1000 not found")]
    MissingBlockette1000,

    #[error("unsupported byte order {0}: only big-endian records are decoded")]
    UnsupportedByteOrder(u8),

    #[error("blockette count mismatch: header declares {declared}, chain has {found}")]
    BlocketteCountMismatch { declared: u8, found: usize },

    #[error("blockette at offset {offset} exceeds header region of {len} bytes")]
    BlocketteOutOfBounds { offset: usize, len: usize },

    #[error("invalid record length exponent: {0}")]
    InvalidRecordLength(u8),

    #[error("unsupported encoding format: {0}")]
    UnsupportedEncoding(u8),

    #[error("steim2 nibble={nibble:#04b} has invalid decode nibble {dnib:#04b}")]
    InvalidDecodeNibble { nibble: u8, dnib: u8 },

    #[error("sample count mismatch: header says {expected}, decoded {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("reverse integration constant mismatch: expected {expected}, reconstructed {actual}")]
    ReverseIntegrationMismatch { expected: i32, actual: i32 },

    #[error("sample rate unresolved: factor {factor}, multiplier {multiplier}")]
    UnresolvedSampleRate { factor: i16, multiplier: i16 },

    #[error("invalid blockette 100 sample rate: {0}")]
    InvalidSampleRate(f64),

    #[error("end time out of range: start + {span_ms} ms")]
    EndTimeOutOfRange { span_ms: i64 },
}

/// Broad category of a [`MseedError`].
///
/// All errors abort decoding of the current record; the category lets a
/// caller decide whether to skip the record or treat the stream as corrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The bytes do not describe a record this decoder accepts.
    Format,
    /// The payload decoded but disagrees with the header's own checks.
    Integrity,
    /// Header metadata needed for timing could not be derived.
    UnresolvedMetadata,
}

impl MseedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SampleCountMismatch { .. } | Self::ReverseIntegrationMismatch { .. } => {
                ErrorKind::Integrity
            }
            Self::UnresolvedSampleRate { .. }
            | Self::InvalidSampleRate(_)
            | Self::EndTimeOutOfRange { .. } => ErrorKind::UnresolvedMetadata,
            _ => ErrorKind::Format,
        }
    }
}

pub type Result<T> = std::result::Result<T, MseedError>;
