//! BTIME record start times.
//!
//! The fixed header stores the start time as a compact calendar value
//! ([`BTime`]). Reconstruction yields a UTC timestamp with millisecond
//! resolution: the 0.0001 s fraction and the header's timing correction are
//! both truncated to whole milliseconds.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::Result;
use crate::bytes::ByteReader;

/// Offset of BTIME within the fixed header.
pub const BTIME_OFFSET: usize = 20;

/// Activity flag bit: time correction already applied to the start time.
pub const CORRECTION_APPLIED: u8 = 0x02;

/// BTIME timestamp (10 bytes in the fixed header).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BTime {
    pub year: u16,
    pub day: u16,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub fract: u16, // 0.0001 second units
}

impl BTime {
    /// Read a BTIME from its 10-byte header field starting at `offset`.
    pub fn parse(reader: &ByteReader<'_>, offset: usize) -> Result<Self> {
        Ok(Self {
            year: reader.u16(offset)?,
            day: reader.u16(offset + 2)?,
            hour: reader.u8(offset + 4)?,
            minute: reader.u8(offset + 5)?,
            second: reader.u8(offset + 6)?,
            // byte 7 is unused
            fract: reader.u16(offset + 8)?,
        })
    }

    /// Whether the activity flags mark the timing correction as applied.
    pub fn correction_applied(activity: u8) -> bool {
        activity & CORRECTION_APPLIED != 0
    }

    /// Reconstruct the absolute start time.
    ///
    /// The day-of-year is added to January 1st as an offset, so out-of-range
    /// values roll over into neighbouring months or years instead of failing.
    /// `correction` is in 0.0001 s units and is added unless `activity`
    /// already marks it as applied.
    pub fn to_datetime(&self, correction: i32, activity: u8) -> DateTime<Utc> {
        let jan1 = NaiveDate::from_ymd_opt(i32::from(self.year), 1, 1)
            .unwrap_or(NaiveDate::MIN)
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc();

        let mut start = jan1
            + Duration::days(i64::from(self.day) - 1)
            + Duration::hours(i64::from(self.hour))
            + Duration::minutes(i64::from(self.minute))
            + Duration::seconds(i64::from(self.second))
            + Duration::milliseconds(i64::from(self.fract / 10));

        if !Self::correction_applied(activity) {
            // integer division truncates toward zero
            start += Duration::milliseconds(i64::from(correction / 10));
        }

        start
    }
}

impl fmt::Display for BTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:03} {:02}:{:02}:{:02}.{:04}",
            self.year, self.day, self.hour, self.minute, self.second, self.fract
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    fn btime(year: u16, day: u16, fract: u16) -> BTime {
        BTime {
            year,
            day,
            hour: 10,
            minute: 30,
            second: 45,
            fract,
        }
    }

    #[test]
    fn test_parse_btime() {
        let mut raw = [0u8; 10];
        raw[0..2].copy_from_slice(&2024u16.to_be_bytes());
        raw[2..4].copy_from_slice(&15u16.to_be_bytes());
        raw[4] = 10;
        raw[5] = 30;
        raw[6] = 45;
        raw[8..10].copy_from_slice(&1234u16.to_be_bytes());
        let bt = BTime::parse(&ByteReader::new(&raw), 0).unwrap();
        assert_eq!(bt, btime(2024, 15, 1234));
    }

    #[test]
    fn test_parse_btime_truncated() {
        let raw = [0u8; 9];
        assert!(BTime::parse(&ByteReader::new(&raw), 0).is_err());
    }

    #[test]
    fn test_day_of_year() {
        let t = btime(2024, 15, 0).to_datetime(0, 0);
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap());

        // 2024 is a leap year: day 60 is February 29th
        let t = btime(2024, 60, 0).to_datetime(0, 0);
        assert_eq!((t.month(), t.day()), (2, 29));

        let t = btime(2023, 365, 0).to_datetime(0, 0);
        assert_eq!((t.year(), t.month(), t.day()), (2023, 12, 31));
    }

    #[test]
    fn test_day_rollover() {
        // day 366 in a non-leap year rolls into the next year
        let t = btime(2023, 366, 0).to_datetime(0, 0);
        assert_eq!((t.year(), t.month(), t.day()), (2024, 1, 1));
    }

    #[test]
    fn test_fraction_truncated_to_millis() {
        let t = btime(2024, 1, 1239).to_datetime(0, 0);
        assert_eq!(t.timestamp_subsec_millis(), 123);
        assert_eq!(t.nanosecond(), 123_000_000);
    }

    #[test]
    fn test_timing_correction_applied() {
        let base = btime(2024, 1, 0).to_datetime(0, 0);

        // 0.0259 s -> 25 ms
        let t = btime(2024, 1, 0).to_datetime(259, 0);
        assert_eq!((t - base).num_milliseconds(), 25);

        // negative corrections truncate toward zero
        let t = btime(2024, 1, 0).to_datetime(-259, 0);
        assert_eq!((t - base).num_milliseconds(), -25);
    }

    #[test]
    fn test_timing_correction_skipped_when_flagged() {
        let base = btime(2024, 1, 0).to_datetime(0, 0);
        let t = btime(2024, 1, 0).to_datetime(5000, CORRECTION_APPLIED);
        assert_eq!(t, base);

        // other activity bits do not suppress the correction
        let t = btime(2024, 1, 0).to_datetime(5000, 0x01 | 0x04);
        assert_eq!((t - base).num_milliseconds(), 500);
    }

    #[test]
    fn test_btime_display() {
        assert_eq!(btime(2024, 15, 1234).to_string(), "2024-015 10:30:45.1234");
    }
}
