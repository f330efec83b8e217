//! Bounds-checked big-endian reads at fixed offsets.
//!
//! miniSEED v2 headers are addressed by absolute byte offset rather than
//! read sequentially, so [`ByteReader`] is a thin view over a slice that
//! never advances. Every read checks its bounds and fails with
//! [`MseedError::RecordTooShort`] instead of panicking.

use crate::{MseedError, Result};

#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return `len` bytes starting at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset.checked_add(len).ok_or(MseedError::RecordTooShort {
            expected: usize::MAX,
            actual: self.data.len(),
        })?;
        self.data.get(offset..end).ok_or(MseedError::RecordTooShort {
            expected: end,
            actual: self.data.len(),
        })
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(offset, N)?);
        Ok(out)
    }

    pub fn u8(&self, offset: usize) -> Result<u8> {
        Ok(self.array::<1>(offset)?[0])
    }

    pub fn i8(&self, offset: usize) -> Result<i8> {
        Ok(i8::from_be_bytes(self.array(offset)?))
    }

    pub fn u16(&self, offset: usize) -> Result<u16> {
        Ok(u16::from_be_bytes(self.array(offset)?))
    }

    pub fn i16(&self, offset: usize) -> Result<i16> {
        Ok(i16::from_be_bytes(self.array(offset)?))
    }

    pub fn u32(&self, offset: usize) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array(offset)?))
    }

    pub fn i32(&self, offset: usize) -> Result<i32> {
        Ok(i32::from_be_bytes(self.array(offset)?))
    }

    pub fn f32(&self, offset: usize) -> Result<f32> {
        Ok(f32::from_be_bytes(self.array(offset)?))
    }

    pub fn f64(&self, offset: usize) -> Result<f64> {
        Ok(f64::from_be_bytes(self.array(offset)?))
    }

    /// Read a fixed-width ASCII field, one char per byte.
    pub fn ascii(&self, offset: usize, len: usize) -> Result<String> {
        Ok(self.bytes(offset, len)?.iter().map(|&b| b as char).collect())
    }

    /// Read a fixed-width ASCII field with space padding trimmed.
    pub fn ascii_trimmed(&self, offset: usize, len: usize) -> Result<String> {
        Ok(self.ascii(offset, len)?.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_reads() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x3F, 0x80, 0x00, 0x00];
        let r = ByteReader::new(&data);
        assert_eq!(r.u8(0).unwrap(), 0xFF);
        assert_eq!(r.i8(0).unwrap(), -1);
        assert_eq!(r.u16(0).unwrap(), 0xFFFE);
        assert_eq!(r.i16(0).unwrap(), -2);
        assert_eq!(r.u16(2).unwrap(), 1);
        assert_eq!(r.i32(0).unwrap(), -131_071);
        assert_eq!(r.u32(2).unwrap(), 0x0001_3F80);
        assert_eq!(r.f32(4).unwrap(), 1.0);
    }

    #[test]
    fn test_f64_read() {
        let data = 2.5f64.to_be_bytes();
        assert_eq!(ByteReader::new(&data).f64(0).unwrap(), 2.5);
    }

    #[test]
    fn test_ascii_trim() {
        let data = b"ANMO 00BHZ";
        let r = ByteReader::new(data);
        assert_eq!(r.ascii(0, 5).unwrap(), "ANMO ");
        assert_eq!(r.ascii_trimmed(0, 5).unwrap(), "ANMO");
        assert_eq!(r.ascii_trimmed(5, 2).unwrap(), "00");
    }

    #[test]
    fn test_out_of_bounds() {
        let data = [0u8; 3];
        let r = ByteReader::new(&data);
        assert_eq!(
            r.u32(0),
            Err(MseedError::RecordTooShort {
                expected: 4,
                actual: 3
            })
        );
        assert!(r.u8(3).is_err());
        assert!(r.bytes(usize::MAX, 2).is_err());
    }
}
