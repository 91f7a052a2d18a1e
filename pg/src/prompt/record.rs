//! Record conversion
//!
//! A record is the plain JSON object form of a prompt, used for files and
//! exports. Missing fields read as blank and bad timestamps read as "now";
//! only an unrecognized `type` rejects the whole record.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use super::kind::PromptKind;
use super::model::Prompt;
use crate::error::PromptError;

/// Plain key/value form of a prompt
pub type Record = serde_json::Map<String, Value>;

impl Prompt {
    /// Convert to a record with `title`, `type`, the kind's fields and ISO-8601 timestamps
    pub fn to_record(&self) -> Result<Record, PromptError> {
        match serde_json::to_value(self)? {
            Value::Object(record) => Ok(record),
            other => Err(PromptError::Json(serde::ser::Error::custom(format!(
                "prompt serialized to a non-object value: {}",
                other
            )))),
        }
    }

    /// Rebuild a prompt from a record
    pub fn from_record(record: &Record) -> Result<Self, PromptError> {
        record_kind(record)?;
        Ok(serde_json::from_value(Value::Object(record.clone()))?)
    }
}

/// The kind named by a record's `type` field
pub fn record_kind(record: &Record) -> Result<PromptKind, PromptError> {
    let tag = record.get("type").and_then(Value::as_str).unwrap_or_default();
    tag.parse().map_err(|_| PromptError::UnknownKind(tag.to_string()))
}

/// Pretty-print as JSON with the 4-space indent used by prompt files
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// A string field of a record, blank when absent or not a string
pub fn record_str<'a>(record: &'a Record, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or_default()
}
