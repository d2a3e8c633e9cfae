use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::dates;

/// Canonical on-disk and in-editor timestamp format.
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid datetime format: '{0}'. Expected YYYY-MM-DD HH:MM[:SS]")]
    InvalidDatetime(String),
    #[error("Missing '{0}' field")]
    MissingField(&'static str),
    #[error("'{0}' cannot be empty")]
    EmptyField(&'static str),
    #[error("Invalid bucket '{0}'. Expected one of: personal_development, thing, economic")]
    InvalidBucket(String),
    #[error("Entry {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    PersonalDevelopment,
    Thing,
    Economic,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::PersonalDevelopment, Bucket::Thing, Bucket::Economic];

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::PersonalDevelopment => "personal_development",
            Bucket::Thing => "thing",
            Bucket::Economic => "economic",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let normalized = value.trim().to_ascii_lowercase();
        Bucket::ALL
            .into_iter()
            .find(|b| b.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidBucket(value.to_string()))
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which records a view shows. `Tab` walks All -> each bucket -> All.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BucketFilter {
    #[default]
    All,
    Only(Bucket),
}

impl BucketFilter {
    pub fn matches(self, record: &Record) -> bool {
        match self {
            BucketFilter::All => true,
            BucketFilter::Only(bucket) => record.bucket == Some(bucket),
        }
    }

    pub fn cycle(self, forward: bool) -> Self {
        let mut ring = vec![BucketFilter::All];
        ring.extend(Bucket::ALL.into_iter().map(BucketFilter::Only));
        let pos = ring.iter().position(|f| *f == self).unwrap_or(0);
        let len = ring.len();
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        ring[next]
    }

    pub fn bucket(self) -> Option<Bucket> {
        match self {
            BucketFilter::All => None,
            BucketFilter::Only(bucket) => Some(bucket),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BucketFilter::All => "all",
            BucketFilter::Only(bucket) => bucket.as_str(),
        }
    }
}

/// One time-stamped entry. Records carry no surrogate key: the full field
/// tuple is the identity used to find a record again after the list is
/// replaced by the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub x: NaiveDateTime,
    pub y: String,
    pub z: String,
    pub bucket: Option<Bucket>,
}

impl Record {
    pub fn new(x: NaiveDateTime, y: impl Into<String>, z: impl Into<String>) -> Self {
        Self {
            x,
            y: y.into(),
            z: z.into(),
            bucket: None,
        }
    }

    pub fn with_bucket(mut self, bucket: Option<Bucket>) -> Self {
        self.bucket = bucket;
        self
    }

    /// Blank record used to seed the editor when creating.
    pub fn seed(day: NaiveDate, bucket: Option<Bucket>) -> Self {
        Self {
            x: dates::at_default_time(day),
            y: String::new(),
            z: String::new(),
            bucket,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.x.date()
    }

    pub fn timestamp_label(&self) -> String {
        self.x.format(DATETIME_FMT).to_string()
    }

    /// Check the fields a stored record must have.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.y.trim().is_empty() {
            return Err(ValidationError::EmptyField("y"));
        }
        Ok(())
    }
}

/// Parse the timestamp forms accepted from files and the editor.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = value.trim();
    let candidate = trimmed.strip_suffix('Z').unwrap_or(trimmed).replacen('T', " ", 1);

    const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&candidate, fmt) {
            // Records are second precision.
            return Ok(dates::truncate_subsec(dt));
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(&candidate, "%Y-%m-%d") {
        if let Some(dt) = day.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(ValidationError::InvalidDatetime(trimmed.to_string()))
}
