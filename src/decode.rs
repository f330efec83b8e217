//! Decode miniSEED v2 records from raw bytes.
//!
//! The main entry point is [`decode()`], which parses a single record into
//! an [`MseedRecord`]. Locating record boundaries in a larger stream is
//! left to the caller.

use log::debug;

use crate::bytes::ByteReader;
use crate::header::{FIXED_HEADER_LEN, Header};
use crate::record::{MseedRecord, Samples};
use crate::steim;
use crate::types::EncodingFormat;
use crate::{MseedError, Result};

/// Offset of the data-start field in the fixed header.
const DATA_OFFSET_FIELD: usize = 44;

/// Decode a single big-endian miniSEED v2 record from raw bytes.
///
/// `data` must hold at least one whole record as declared by Blockette
/// 1000; anything after the record length is ignored.
pub fn decode(data: &[u8]) -> Result<MseedRecord> {
    let data_offset = ByteReader::new(data).u16(DATA_OFFSET_FIELD)?;
    if (data_offset as usize) < FIXED_HEADER_LEN {
        return Err(MseedError::InvalidDataOffset(data_offset));
    }
    let data_offset = data_offset as usize;

    if data.len() < data_offset {
        return Err(MseedError::RecordTooShort {
            expected: data_offset,
            actual: data.len(),
        });
    }
    let header = Header::parse(&data[..data_offset])?;

    if data.len() < header.record_length {
        return Err(MseedError::RecordTooShort {
            expected: header.record_length,
            actual: data.len(),
        });
    }
    if header.record_length < data_offset {
        return Err(MseedError::InvalidRecordLength(
            header.record_length.trailing_zeros() as u8,
        ));
    }
    let payload = &data[data_offset..header.record_length];

    let samples = decode_data(payload, &header)?;
    Ok(MseedRecord::new(header, samples))
}

/// Decode a record payload according to the header's encoding.
pub fn decode_data(data: &[u8], header: &Header) -> Result<Samples> {
    let num_samples = header.n_samples;
    debug!(
        "decoding {} data: {num_samples} samples from {} bytes",
        header.encoding,
        data.len()
    );

    match header.encoding {
        EncodingFormat::Ascii => Ok(decode_ascii(data)),
        EncodingFormat::Int16 => {
            let (r, offsets) = sample_offsets(data, num_samples, header.encoding)?;
            let samples = offsets
                .map(|at| r.i16(at).map(i32::from))
                .collect::<Result<_>>()?;
            Ok(Samples::Int(samples))
        }
        EncodingFormat::Int32 => {
            let (r, offsets) = sample_offsets(data, num_samples, header.encoding)?;
            let samples = offsets.map(|at| r.i32(at)).collect::<Result<_>>()?;
            Ok(Samples::Int(samples))
        }
        EncodingFormat::Float32 => {
            let (r, offsets) = sample_offsets(data, num_samples, header.encoding)?;
            let samples = offsets.map(|at| r.f32(at)).collect::<Result<_>>()?;
            Ok(Samples::Float(samples))
        }
        EncodingFormat::Float64 => {
            let (r, offsets) = sample_offsets(data, num_samples, header.encoding)?;
            let samples = offsets.map(|at| r.f64(at)).collect::<Result<_>>()?;
            Ok(Samples::Double(samples))
        }
        EncodingFormat::Steim1 => {
            let samples = steim::decode_steim1(data, num_samples, header.n_frames)?;
            Ok(Samples::Int(samples))
        }
        EncodingFormat::Steim2 => {
            let samples = steim::decode_steim2(data, num_samples, header.n_frames)?;
            Ok(Samples::Int(samples))
        }
    }
}

/// Byte offsets of `num_samples` uncompressed values, after checking that
/// they all fit in `data`.
fn sample_offsets(
    data: &[u8],
    num_samples: usize,
    encoding: EncodingFormat,
) -> Result<(ByteReader<'_>, impl Iterator<Item = usize>)> {
    let width = encoding
        .sample_width()
        .ok_or(MseedError::UnsupportedEncoding(encoding.to_code()))?;
    let needed = num_samples * width;
    if data.len() < needed {
        return Err(MseedError::RecordTooShort {
            expected: needed,
            actual: data.len(),
        });
    }
    Ok((ByteReader::new(data), (0..num_samples).map(move |i| i * width)))
}

fn decode_ascii(data: &[u8]) -> Samples {
    Samples::Text(data.iter().map(|&b| b as char).collect())
}
