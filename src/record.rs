//! Decoded miniSEED record type.
//!
//! [`MseedRecord`] owns the parsed [`Header`] and the decoded [`Samples`]
//! of one record. It is built once by [`decode`](crate::decode()) and never
//! modified afterwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::header::Header;

/// A decoded miniSEED v2 record.
#[derive(Debug, Clone, PartialEq)]
pub struct MseedRecord {
    pub header: Header,
    pub data: Samples,
}

/// Flattened view of a record: timing, identifiers, and samples.
///
/// Timestamps serialize as milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload<'a> {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end: DateTime<Utc>,
    pub data: &'a Samples,
    pub network: &'a str,
    pub station: &'a str,
    pub location: &'a str,
    pub channel: &'a str,
    pub sample_rate: f64,
    pub id: String,
}

impl MseedRecord {
    pub fn new(header: Header, data: Samples) -> Self {
        Self { header, data }
    }

    /// Return the stream identifier: `"NET.STA.LOC.CHA"`.
    pub fn id(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.header.network, self.header.station, self.header.location, self.header.channel
        )
    }

    /// Bundle timing, identifiers, and samples into one view.
    pub fn payload(&self) -> Payload<'_> {
        Payload {
            start: self.header.start,
            end: self.header.end,
            data: &self.data,
            network: &self.header.network,
            station: &self.header.station,
            location: &self.header.location,
            channel: &self.header.channel,
            sample_rate: self.header.sample_rate,
            id: self.id(),
        }
    }
}

impl fmt::Display for MseedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} Hz | {} samples ({})",
            self.id(),
            self.header.start.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.header.sample_rate,
            self.data.len(),
            self.header.encoding,
        )
    }
}

/// Decoded sample data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Samples {
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// ASCII payload, one char per byte.
    Text(String),
}

impl Samples {
    /// Number of samples, or of characters for text payloads.
    pub fn len(&self) -> usize {
        match self {
            Samples::Int(v) => v.len(),
            Samples::Float(v) => v.len(),
            Samples::Double(v) => v.len(),
            Samples::Text(s) => s.chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
