//! Steim1 and Steim2 decompression.
//!
//! These are differential integer compression schemes used in seismological
//! data (SEED/miniSEED format). See Appendix B of the SEED Manual v2.4.
//!
//! The payload is a sequence of 64-byte frames of sixteen 32-bit words.
//! Word 0 of every frame is a control word holding one 2-bit nibble per
//! word; in frame 0, words 1 and 2 hold the forward (X₀) and reverse (Xₙ)
//! integration constants. Every other word carries one or more packed
//! differences, selected by its nibble (and, for Steim2, by the word's own
//! top two bits, the "dnib").

use log::{debug, trace, warn};

use crate::bytes::ByteReader;
use crate::{MseedError, Result};

const FRAME_SIZE: usize = 64; // 16 x 32-bit words
const WORDS_PER_FRAME: usize = 16;

fn extract_nibble(control_word: u32, word_index: usize) -> u8 {
    let shift = 30 - (word_index * 2);
    ((control_word >> shift) & 0x03) as u8
}

fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    (value as i32).wrapping_shl(shift).wrapping_shr(shift)
}

/// `count` signed differences of `bits` width, packed right-aligned and
/// read most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Packing {
    count: u32,
    bits: u32,
}

impl Packing {
    const fn new(count: u32, bits: u32) -> Self {
        Self { count, bits }
    }

    fn unpack(self, word: u32, diffs: &mut Vec<i32>) {
        let mask = if self.bits == 32 {
            u32::MAX
        } else {
            (1u32 << self.bits) - 1
        };
        for k in 0..self.count {
            let shift = (self.count - k - 1) * self.bits;
            diffs.push(sign_extend((word >> shift) & mask, self.bits));
        }
    }
}

fn steim1_packing(nibble: u8) -> Option<Packing> {
    match nibble {
        0b00 => None, // no data
        0b01 => Some(Packing::new(4, 8)), // four 8-bit diffs
        0b10 => Some(Packing::new(2, 16)), // two 16-bit diffs
        0b11 => Some(Packing::new(1, 32)), // one 32-bit diff
        _ => unreachable!(),
    }
}

fn steim2_packing(nibble: u8, word: u32) -> Result<Option<Packing>> {
    let dnib = ((word >> 30) & 0x03) as u8;

    let packing = match (nibble, dnib) {
        (0b00, _) => return Ok(None),
        (0b01, _) => Packing::new(4, 8),
        (0b10, 0b01) => Packing::new(1, 30),
        (0b10, 0b10) => Packing::new(2, 15),
        (0b10, 0b11) => Packing::new(3, 10),
        (0b11, 0b00) => Packing::new(5, 6),
        (0b11, 0b01) => Packing::new(6, 5),
        (0b11, 0b10) => Packing::new(7, 4),
        _ => return Err(MseedError::InvalidDecodeNibble { nibble, dnib }),
    };
    Ok(Some(packing))
}

/// Frame layout of a Steim-compressed payload.
#[derive(Debug, Clone, Copy)]
pub struct SteimFrames<'a> {
    reader: ByteReader<'a>,
    num_frames: usize,
}

impl<'a> SteimFrames<'a> {
    /// Lay out `data` as Steim frames.
    ///
    /// `num_frames` comes from Blockette 1001; when absent (or zero) every
    /// whole frame in `data` is used.
    pub fn new(data: &'a [u8], num_frames: Option<u8>) -> Result<Self> {
        let num_frames = match num_frames {
            Some(n) if n > 0 => n as usize,
            _ => data.len() / FRAME_SIZE,
        };

        let needed = num_frames.max(1) * FRAME_SIZE;
        if data.len() < needed {
            return Err(MseedError::RecordTooShort {
                expected: needed,
                actual: data.len(),
            });
        }

        Ok(Self {
            reader: ByteReader::new(data),
            num_frames,
        })
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Forward integration constant X₀ (frame 0, word 1).
    pub fn first(&self) -> Result<i32> {
        self.reader.i32(4)
    }

    /// Reverse integration constant Xₙ (frame 0, word 2).
    pub fn last(&self) -> Result<i32> {
        self.reader.i32(8)
    }

    /// Every data word with its control nibble, in frame order.
    ///
    /// Skips the control words and the integration constants in frame 0.
    pub fn data_words(&self) -> impl Iterator<Item = Result<(u8, u32)>> + '_ {
        (0..self.num_frames).flat_map(move |frame_idx| {
            let frame_offset = frame_idx * FRAME_SIZE;
            let control_word = self.reader.u32(frame_offset);

            (1..WORDS_PER_FRAME)
                .filter(move |&word_idx| !(frame_idx == 0 && (word_idx == 1 || word_idx == 2)))
                .map(move |word_idx| -> Result<(u8, u32)> {
                    let control_word = control_word.clone()?;
                    let word = self.reader.u32(frame_offset + word_idx * 4)?;
                    Ok((extract_nibble(control_word, word_idx), word))
                })
        })
    }

    /// Unpack every difference in the payload.
    fn differences<F>(&self, mut packing: F) -> Result<Vec<i32>>
    where
        F: FnMut(u8, u32) -> Result<Option<Packing>>,
    {
        let mut diffs = Vec::with_capacity(self.num_frames * (WORDS_PER_FRAME - 1) * 4);
        for item in self.data_words() {
            let (nibble, word) = item?;
            if let Some(p) = packing(nibble, word)? {
                p.unpack(word, &mut diffs);
            }
        }
        trace!(
            "{} differences from {} frames",
            diffs.len(),
            self.num_frames
        );
        Ok(diffs)
    }
}

/// Integrate differences into samples, seeded with X₀.
///
/// `diffs[0]` is the difference to the sample before X₀ and is not used:
/// `samples[0] = first` and `samples[i] = samples[i - 1] + diffs[i]`.
pub fn integrate(first: i32, diffs: &[i32]) -> Vec<i32> {
    std::iter::once(first)
        .chain(diffs.iter().skip(1).scan(first, |acc, &d| {
            *acc = acc.wrapping_add(d);
            Some(*acc)
        }))
        .collect()
}

/// Check the reconstructed samples against the header count and Xₙ.
fn verify(samples: &[i32], num_samples: usize, last: i32, scheme: &str) -> Result<()> {
    if samples.len() != num_samples {
        warn!(
            "{scheme}: decoded {} samples, header declares {num_samples}",
            samples.len()
        );
        return Err(MseedError::SampleCountMismatch {
            expected: num_samples,
            actual: samples.len(),
        });
    }

    let actual = samples.last().copied().unwrap_or_default();
    if actual != last {
        warn!("{scheme}: reverse integration constant {last}, reconstructed {actual}");
        return Err(MseedError::ReverseIntegrationMismatch {
            expected: last,
            actual,
        });
    }

    Ok(())
}

/// Decode Steim1 compressed data into i32 samples.
///
/// `num_frames` is the Blockette 1001 frame count, if any.
pub fn decode_steim1(data: &[u8], num_samples: usize, num_frames: Option<u8>) -> Result<Vec<i32>> {
    let frames = SteimFrames::new(data, num_frames)?;
    let first = frames.first()?;
    let last = frames.last()?;
    debug!(
        "steim1: {} frames, x0={first}, xn={last}",
        frames.num_frames()
    );

    let diffs = frames.differences(|nibble, _| Ok(steim1_packing(nibble)))?;
    let samples = integrate(first, &diffs);
    verify(&samples, num_samples, last, "steim1")?;
    Ok(samples)
}

/// Decode Steim2 compressed data into i32 samples.
///
/// Extends Steim1 with additional packing formats using "dnib" (bits 31-30 of data word).
pub fn decode_steim2(data: &[u8], num_samples: usize, num_frames: Option<u8>) -> Result<Vec<i32>> {
    let frames = SteimFrames::new(data, num_frames)?;
    let first = frames.first()?;
    let last = frames.last()?;
    debug!(
        "steim2: {} frames, x0={first}, xn={last}",
        frames.num_frames()
    );

    let diffs = frames.differences(steim2_packing)?;
    let samples = integrate(first, &diffs);
    verify(&samples, num_samples, last, "steim2")?;
    Ok(samples)
}
