//! Blockette chain traversal.
//!
//! Blockettes are linked through a 2-byte "next offset" field, starting at
//! the offset stored at byte 46 of the fixed header. An offset of zero ends
//! the chain. Only the types this decoder needs are parsed; every other
//! type is returned as [`Blockette::Other`] so the chain can still be
//! followed and counted.

use log::trace;

use crate::bytes::ByteReader;
use crate::{MseedError, Result};

/// Offset of the first-blockette pointer in the fixed header.
pub const FIRST_BLOCKETTE_OFFSET: usize = 46;

/// A blockette decoded from the header region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Blockette {
    /// Blockette 100: sample rate overriding the factor/multiplier pair.
    SampleRate { sample_rate: f32 },
    /// Blockette 1000: data-only SEED blockette.
    DataOnly {
        encoding: u8,
        byte_order: u8,
        /// Record length as a power of two.
        record_length_exp: u8,
    },
    /// Blockette 1001: data extension blockette.
    DataExtension {
        timing_quality: u8,
        micro_seconds: i8,
        frame_count: u8,
    },
    /// Any other blockette type; skipped.
    Other { blockette_type: u16 },
}

impl Blockette {
    /// Parse the blockette starting at `offset`.
    pub fn parse(reader: &ByteReader<'_>, offset: usize) -> Result<Self> {
        let blockette = match reader.u16(offset)? {
            100 => Self::SampleRate {
                sample_rate: reader.f32(offset + 4)?,
            },
            1000 => Self::DataOnly {
                encoding: reader.u8(offset + 4)?,
                byte_order: reader.u8(offset + 5)?,
                record_length_exp: reader.u8(offset + 6)?,
            },
            1001 => Self::DataExtension {
                timing_quality: reader.u8(offset + 4)?,
                micro_seconds: reader.i8(offset + 5)?,
                frame_count: reader.u8(offset + 7)?,
            },
            blockette_type => Self::Other { blockette_type },
        };
        Ok(blockette)
    }

    pub fn blockette_type(&self) -> u16 {
        match self {
            Self::SampleRate { .. } => 100,
            Self::DataOnly { .. } => 1000,
            Self::DataExtension { .. } => 1001,
            Self::Other { blockette_type } => *blockette_type,
        }
    }
}

/// Iterator over the blockette chain of a header region.
///
/// Yields at most `limit` blockettes; a chain that continues past the limit
/// (including one that loops back on itself) yields a
/// [`MseedError::BlocketteCountMismatch`] and stops.
pub struct BlocketteChain<'a> {
    reader: ByteReader<'a>,
    next: usize,
    count: usize,
    limit: u8,
    done: bool,
}

impl<'a> BlocketteChain<'a> {
    /// Start the chain from the pointer stored in the fixed header.
    pub fn new(header: &'a [u8], limit: u8) -> Result<Self> {
        let reader = ByteReader::new(header);
        let next = reader.u16(FIRST_BLOCKETTE_OFFSET)? as usize;
        Ok(Self {
            reader,
            next,
            count: 0,
            limit,
            done: false,
        })
    }

    /// Number of blockettes traversed so far.
    pub fn traversed(&self) -> usize {
        self.count
    }

    fn step(&mut self) -> Result<Blockette> {
        let offset = self.next;
        // type tag and next pointer must both fit
        if offset + 4 > self.reader.len() {
            return Err(MseedError::BlocketteOutOfBounds {
                offset,
                len: self.reader.len(),
            });
        }

        self.count += 1;
        if self.count > self.limit as usize {
            return Err(MseedError::BlocketteCountMismatch {
                declared: self.limit,
                found: self.count,
            });
        }

        let blockette = Blockette::parse(&self.reader, offset)?;
        self.next = self.reader.u16(offset + 2)? as usize;
        trace!(
            "blockette {} at offset {offset}, next {}",
            blockette.blockette_type(),
            self.next
        );
        Ok(blockette)
    }
}

impl Iterator for BlocketteChain<'_> {
    type Item = Result<Blockette>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next == 0 {
            return None;
        }
        let item = self.step();
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

/// Collect the full blockette chain, checking it against the declared count.
pub fn read_blockettes(header: &[u8], declared: u8) -> Result<Vec<Blockette>> {
    let mut chain = BlocketteChain::new(header, declared)?;
    let blockettes = chain.by_ref().collect::<Result<Vec<_>>>()?;

    if chain.traversed() != declared as usize {
        return Err(MseedError::BlocketteCountMismatch {
            declared,
            found: chain.traversed(),
        });
    }

    Ok(blockettes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 48-byte fixed header area followed by the given blockettes, chained
    /// in order.
    fn header_with(blockettes: &[Vec<u8>]) -> Vec<u8> {
        let mut data = vec![0u8; 48];
        let mut offset = 48usize;
        if !blockettes.is_empty() {
            data[46..48].copy_from_slice(&(offset as u16).to_be_bytes());
        }
        for (i, b) in blockettes.iter().enumerate() {
            let mut b = b.clone();
            let next = if i + 1 < blockettes.len() {
                offset + b.len()
            } else {
                0
            };
            b[2..4].copy_from_slice(&(next as u16).to_be_bytes());
            offset += b.len();
            data.extend_from_slice(&b);
        }
        data
    }

    fn b1000(encoding: u8, byte_order: u8, exp: u8) -> Vec<u8> {
        let mut b = vec![0u8; 8];
        b[0..2].copy_from_slice(&1000u16.to_be_bytes());
        b[4] = encoding;
        b[5] = byte_order;
        b[6] = exp;
        b
    }

    fn b1001(quality: u8, micro: i8, frames: u8) -> Vec<u8> {
        let mut b = vec![0u8; 8];
        b[0..2].copy_from_slice(&1001u16.to_be_bytes());
        b[4] = quality;
        b[5] = micro as u8;
        b[7] = frames;
        b
    }

    fn b100(rate: f32) -> Vec<u8> {
        let mut b = vec![0u8; 12];
        b[0..2].copy_from_slice(&100u16.to_be_bytes());
        b[4..8].copy_from_slice(&rate.to_be_bytes());
        b
    }

    #[test]
    fn test_chain_all_known_types() {
        let header = header_with(&[b1000(11, 1, 9), b1001(80, -3, 7), b100(40.0)]);
        let blockettes = read_blockettes(&header, 3).unwrap();
        assert_eq!(
            blockettes,
            vec![
                Blockette::DataOnly {
                    encoding: 11,
                    byte_order: 1,
                    record_length_exp: 9
                },
                Blockette::DataExtension {
                    timing_quality: 80,
                    micro_seconds: -3,
                    frame_count: 7
                },
                Blockette::SampleRate { sample_rate: 40.0 },
            ]
        );
    }

    #[test]
    fn test_unknown_type_is_skipped_but_counted() {
        let mut other = vec![0u8; 16];
        other[0..2].copy_from_slice(&500u16.to_be_bytes());
        let header = header_with(&[other, b1000(10, 1, 12)]);
        let blockettes = read_blockettes(&header, 2).unwrap();
        assert_eq!(blockettes[0], Blockette::Other { blockette_type: 500 });
        assert_eq!(blockettes[1].blockette_type(), 1000);
    }

    #[test]
    fn test_empty_chain() {
        let header = header_with(&[]);
        assert!(read_blockettes(&header, 0).unwrap().is_empty());
    }

    #[test]
    fn test_count_mismatch_short_chain() {
        let header = header_with(&[b1000(10, 1, 12)]);
        assert_eq!(
            read_blockettes(&header, 2),
            Err(MseedError::BlocketteCountMismatch {
                declared: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_count_mismatch_long_chain() {
        let header = header_with(&[b1000(10, 1, 12), b1001(0, 0, 7)]);
        assert_eq!(
            read_blockettes(&header, 1),
            Err(MseedError::BlocketteCountMismatch {
                declared: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_looping_chain_terminates() {
        let mut header = header_with(&[b1000(10, 1, 12)]);
        // point the blockette back at itself
        header[50..52].copy_from_slice(&48u16.to_be_bytes());
        assert!(matches!(
            read_blockettes(&header, 1),
            Err(MseedError::BlocketteCountMismatch { declared: 1, .. })
        ));
    }

    #[test]
    fn test_offset_past_header() {
        let mut header = header_with(&[b1000(10, 1, 12)]);
        header[46..48].copy_from_slice(&200u16.to_be_bytes());
        assert_eq!(
            read_blockettes(&header, 1),
            Err(MseedError::BlocketteOutOfBounds {
                offset: 200,
                len: 56
            })
        );
    }
}
