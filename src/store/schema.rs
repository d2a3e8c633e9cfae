use serde::{Deserialize, Serialize};

use crate::model::{Bucket, Record, ValidationError, parse_datetime};

/// Minimum fields in a CSV row: `x,y,z`.
pub const CSV_MIN_FIELDS: usize = 3;

/// Fields of one CSV row, in file order.
pub fn record_to_row(record: &Record) -> Vec<String> {
    let mut row = vec![record.timestamp_label(), record.y.clone(), record.z.clone()];
    if let Some(bucket) = record.bucket {
        row.push(bucket.as_str().to_string());
    }
    row
}

pub fn record_from_row(row: &csv::StringRecord) -> Result<Record, ValidationError> {
    let field = |idx: usize, name: &'static str| row.get(idx).ok_or(ValidationError::MissingField(name));
    let x = parse_datetime(field(0, "x")?)?;
    let y = field(1, "y")?;
    let z = field(2, "z")?;
    let bucket = match row.get(3).map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(Bucket::parse(raw)?),
    };
    Ok(Record::new(x, y, z).with_bucket(bucket))
}

/// One record as written to and read back from the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorEntry {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub z: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
}

impl From<&Record> for EditorEntry {
    fn from(record: &Record) -> Self {
        Self {
            x: Some(record.timestamp_label()),
            y: Some(record.y.clone()),
            z: Some(record.z.clone()),
            bucket: record.bucket.map(|b| b.as_str().to_string()),
        }
    }
}

impl EditorEntry {
    pub fn into_record(self) -> Result<Record, ValidationError> {
        let x = parse_datetime(self.x.as_deref().ok_or(ValidationError::MissingField("x"))?)?;
        let y = self.y.ok_or(ValidationError::MissingField("y"))?;
        let bucket = match self.bucket.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(Bucket::parse(raw)?),
        };
        let record = Record::new(x, y.trim(), self.z.unwrap_or_default().trim()).with_bucket(bucket);
        record.validate()?;
        Ok(record)
    }
}

/// Editor file contents: a single object or an array of them. `Many` is
/// tried first so that `[]` reads as an empty list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditorPayload {
    Many(Vec<EditorEntry>),
    One(EditorEntry),
}

impl EditorPayload {
    pub fn from_records(records: &[Record]) -> Self {
        match records {
            [single] => EditorPayload::One(single.into()),
            many => EditorPayload::Many(many.iter().map(EditorEntry::from).collect()),
        }
    }

    /// Validate every entry. Errors in an array name the failing position.
    pub fn into_records(self) -> Result<Vec<Record>, ValidationError> {
        match self {
            EditorPayload::One(entry) => Ok(vec![entry.into_record()?]),
            EditorPayload::Many(entries) => entries
                .into_iter()
                .enumerate()
                .map(|(index, entry)| {
                    entry.into_record().map_err(|source| ValidationError::Entry {
                        index: index + 1,
                        source: Box::new(source),
                    })
                })
                .collect(),
        }
    }
}
