//! Fixed header and blockette parsing.
//!
//! [`Header::parse`] takes the header region of a record (the 48-byte fixed
//! header plus every blockette it references, i.e. bytes `0..data_offset`)
//! and resolves encoding, byte order, record length, timing and sample rate.

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::blockette::{self, Blockette};
use crate::bytes::ByteReader;
use crate::time::{BTIME_OFFSET, BTime};
use crate::types::{ByteOrder, EncodingFormat};
use crate::{MseedError, Result};

/// Length of the SEED 2.4 fixed section of data header.
pub const FIXED_HEADER_LEN: usize = 48;

/// Activity, I/O-and-clock, and data-quality flag bytes (offsets 36-38).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub activity: u8,
    pub clock: u8,
    pub quality: u8,
}

impl Flags {
    /// Activity bit 1: the header time correction is already applied.
    pub fn correction_applied(&self) -> bool {
        BTime::correction_applied(self.activity)
    }
}

/// Decoded miniSEED v2 header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub sequence_number: String,
    pub data_quality: char,
    pub station: String,
    pub location: String,
    pub channel: String,
    pub network: String,

    pub encoding: EncodingFormat,
    pub byte_order: ByteOrder,
    /// Record length in bytes.
    pub record_length: usize,

    // Blockette 1001, when present
    pub timing_quality: Option<u8>,
    pub micro_seconds: Option<i8>,
    pub n_frames: Option<u8>,

    pub sample_rate: f64,
    pub n_blockettes: u8,
    pub n_samples: usize,
    pub flags: Flags,
    /// Time correction in 0.0001 s units.
    pub timing_correction: i32,

    pub btime: BTime,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Fields collected from the blockette chain before they are validated.
#[derive(Debug, Default)]
struct BlocketteFields {
    /// Encoding, byte order, and record length exponent from blockette 1000.
    data_only: Option<(u8, u8, u8)>,
    timing_quality: Option<u8>,
    micro_seconds: Option<i8>,
    n_frames: Option<u8>,
    sample_rate: Option<f64>,
}

impl BlocketteFields {
    fn collect(blockettes: &[Blockette]) -> Self {
        let mut fields = Self::default();
        for b in blockettes {
            match *b {
                Blockette::DataOnly {
                    encoding,
                    byte_order,
                    record_length_exp,
                } => {
                    fields.data_only = Some((encoding, byte_order, record_length_exp));
                }
                Blockette::DataExtension {
                    timing_quality,
                    micro_seconds,
                    frame_count,
                } => {
                    fields.timing_quality = Some(timing_quality);
                    fields.micro_seconds = Some(micro_seconds);
                    fields.n_frames = Some(frame_count);
                }
                Blockette::SampleRate { sample_rate } => {
                    fields.sample_rate = Some(f64::from(sample_rate));
                }
                Blockette::Other { .. } => {}
            }
        }
        fields
    }
}

impl Header {
    /// Parse the header region of a record.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < FIXED_HEADER_LEN {
            return Err(MseedError::RecordTooShort {
                expected: FIXED_HEADER_LEN,
                actual: data.len(),
            });
        }
        let r = ByteReader::new(data);

        let sequence_number = r.ascii(0, 6)?;
        let data_quality = r.u8(6)? as char;
        let n_blockettes = r.u8(39)?;

        let fields = BlocketteFields::collect(&blockette::read_blockettes(data, n_blockettes)?);

        let (encoding_code, byte_order_code, exp) =
            fields.data_only.ok_or(MseedError::MissingBlockette1000)?;

        // Only big-endian records are decoded
        let byte_order = ByteOrder::from_code(byte_order_code)?;
        if byte_order != ByteOrder::Big {
            return Err(MseedError::UnsupportedByteOrder(byte_order_code));
        }

        let n_samples = r.u16(30)? as usize;

        let factor = r.i16(32)?;
        let multiplier = r.i16(34)?;
        let sample_rate = match fields.sample_rate {
            Some(rate) if rate.is_finite() && rate > 0.0 => rate,
            Some(rate) => return Err(MseedError::InvalidSampleRate(rate)),
            None => compute_sample_rate(factor, multiplier)
                .ok_or(MseedError::UnresolvedSampleRate { factor, multiplier })?,
        };

        let flags = Flags {
            activity: r.u8(36)?,
            clock: r.u8(37)?,
            quality: r.u8(38)?,
        };

        let timing_correction = r.i32(40)?;

        let btime = BTime::parse(&r, BTIME_OFFSET)?;
        let start = btime.to_datetime(timing_correction, flags.activity);
        let span_ms = (1000.0 * n_samples as f64 / sample_rate) as i64;
        let end = Duration::try_milliseconds(span_ms)
            .and_then(|span| start.checked_add_signed(span))
            .ok_or(MseedError::EndTimeOutOfRange { span_ms })?;

        let encoding = EncodingFormat::from_code(encoding_code)?;
        if exp >= 32 {
            return Err(MseedError::InvalidRecordLength(exp));
        }
        let record_length = 1usize << exp;

        let header = Self {
            sequence_number,
            data_quality,
            station: r.ascii_trimmed(8, 5)?,
            location: r.ascii_trimmed(13, 2)?,
            channel: r.ascii_trimmed(15, 3)?,
            network: r.ascii_trimmed(18, 2)?,
            encoding,
            byte_order,
            record_length,
            timing_quality: fields.timing_quality,
            micro_seconds: fields.micro_seconds,
            n_frames: fields.n_frames,
            sample_rate,
            n_blockettes,
            n_samples,
            flags,
            timing_correction,
            btime,
            start,
            end,
        };

        debug!(
            "header {}.{}.{}.{}: {} samples, {} Hz, {}, {} bytes",
            header.network,
            header.station,
            header.location,
            header.channel,
            header.n_samples,
            header.sample_rate,
            header.encoding,
            header.record_length
        );

        Ok(header)
    }
}

/// Derive the sample rate from the fixed header factor/multiplier pair.
///
/// Returns `None` when either value is zero.
pub fn compute_sample_rate(factor: i16, multiplier: i16) -> Option<f64> {
    let f = f64::from(factor);
    let m = f64::from(multiplier);
    match (factor.signum(), multiplier.signum()) {
        (1, 1) => Some(m * f),
        (1, -1) => Some(-f / m),
        (-1, 1) => Some(-m / f),
        (-1, -1) => Some(1.0 / (f * m)),
        _ => None,
    }
}
