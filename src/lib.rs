//! Pure Rust miniSEED v2 record decoder.
//!
//! Zero `unsafe`, zero C dependencies. Parses the 48-byte fixed header and
//! its blockette chain, reconstructs the record start time, and decodes
//! ASCII, INT16/32, FLOAT32/64, and Steim1/2 compressed payloads. Only
//! big-endian records are accepted.
//!
//! # Decoding a record
//!
//! ```
//! use miniseed_record::{decode, Samples};
//!
//! // Fixed header + Blockette 1000 (FLOAT32, big-endian, 512 bytes)
//! let mut bytes = vec![0u8; 512];
//! bytes[0..6].copy_from_slice(b"000001");
//! bytes[6] = b'D';
//! bytes[8..13].copy_from_slice(b"ANMO ");
//! bytes[13..15].copy_from_slice(b"00");
//! bytes[15..18].copy_from_slice(b"BHZ");
//! bytes[18..20].copy_from_slice(b"IU");
//! bytes[20..22].copy_from_slice(&2025u16.to_be_bytes()); // year
//! bytes[22..24].copy_from_slice(&100u16.to_be_bytes()); // day of year
//! bytes[30..32].copy_from_slice(&3u16.to_be_bytes()); // samples
//! bytes[32..34].copy_from_slice(&1i16.to_be_bytes()); // rate factor
//! bytes[34..36].copy_from_slice(&100i16.to_be_bytes()); // rate multiplier
//! bytes[39] = 1; // blockettes
//! bytes[44..46].copy_from_slice(&64u16.to_be_bytes()); // data offset
//! bytes[46..48].copy_from_slice(&48u16.to_be_bytes()); // first blockette
//! bytes[48..50].copy_from_slice(&1000u16.to_be_bytes());
//! bytes[52] = 4; // FLOAT32
//! bytes[53] = 1; // big-endian
//! bytes[54] = 9; // 2^9 = 512 bytes
//! for (i, v) in [1.0f32, 2.0, 3.0].iter().enumerate() {
//!     bytes[64 + i * 4..68 + i * 4].copy_from_slice(&v.to_be_bytes());
//! }
//!
//! let record = decode(&bytes).unwrap();
//! assert_eq!(record.id(), "IU.ANMO.00.BHZ");
//! assert_eq!(record.header.sample_rate, 100.0);
//! assert_eq!(record.data, Samples::Float(vec![1.0, 2.0, 3.0]));
//! ```
//!
//! # Errors
//!
//! Every failure aborts decoding of the record. [`MseedError::kind`]
//! groups errors into format, integrity, and unresolved-metadata failures
//! so stream readers can decide whether to skip a record.

pub mod blockette;
pub mod bytes;
pub mod decode;
pub mod error;
pub mod header;
pub mod record;
pub mod steim;
pub mod time;
pub mod types;

pub use error::{ErrorKind, MseedError, Result};
pub use header::{Flags, Header};
pub use record::{MseedRecord, Payload, Samples};
pub use time::BTime;
pub use types::{ByteOrder, EncodingFormat};

pub use decode::decode;
