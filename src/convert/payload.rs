//! `data.data_string` unwrapping.
//!
//! The source document carries its records as JSON text inside a string:
//!
//! ```json
//! { "data": { "data_string": "{\"data\":{\"series\":[ ... ]}}" } }
//! ```
//!
//! Exports sometimes escape that text once more (`{\\\"data\\\"...`). Each
//! extra layer is a JSON string-literal encoding, so a layer is removed by
//! decoding the text as the body of a JSON string literal. That is the exact
//! inverse of the encoder: `\"`, `\\`, `\n` and `\uXXXX` inside the payload
//! survive intact.

use std::borrow::Cow;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::data::model::{FieldValue, Record, Table};
use crate::error::{Error, Result};

/// Escaping layers tried before giving up.
pub const MAX_LAYERS: usize = 4;

// ---------------------------------------------------------------------------
// RawPayload – the outer document
// ---------------------------------------------------------------------------

/// The outer JSON document. Only `data.data_string` is read.
#[derive(Debug, Deserialize)]
pub struct RawPayload {
    data: Option<RawData>,
}

#[derive(Debug, Deserialize)]
struct RawData {
    data_string: Option<JsonValue>,
}

impl RawPayload {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::MalformedPayload(format!("source document is not valid JSON: {e}")))
    }

    /// The embedded, still-encoded payload text.
    pub fn data_string(&self) -> Result<&str> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| Error::MalformedPayload("missing data".to_string()))?;
        match &data.data_string {
            Some(JsonValue::String(s)) => Ok(s),
            Some(other) => Err(Error::MalformedPayload(format!(
                "data.data_string is {}, expected a string",
                kind(other)
            ))),
            None => Err(Error::MalformedPayload(
                "missing data.data_string".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// unescape
// ---------------------------------------------------------------------------

/// Remove one layer of JSON string-literal escaping.
///
/// `{\"a\":\"x\\\"y\"}` becomes `{"a":"x\"y"}`. Text with a bare `"` or an
/// invalid escape was never string-escaped and is rejected.
pub fn unescape(text: &str) -> Result<String> {
    serde_json::from_str::<String>(&format!("\"{text}\""))
        .map_err(|e| Error::MalformedPayload(format!("data_string cannot be unescaped: {e}")))
}

// ---------------------------------------------------------------------------
// InnerPayload – the decoded data_string
// ---------------------------------------------------------------------------

/// The decoded `data_string` object.
#[derive(Debug, Clone)]
pub struct InnerPayload {
    root: Map<String, JsonValue>,
}

impl InnerPayload {
    /// Decode `data_string`, peeling escaping layers until a JSON object
    /// appears. A layer that decodes to a JSON string is unwrapped too.
    pub fn decode(data_string: &str) -> Result<Self> {
        let mut text = Cow::Borrowed(data_string);
        for layer in 0..=MAX_LAYERS {
            match serde_json::from_str::<JsonValue>(&text) {
                Ok(JsonValue::Object(root)) => {
                    if layer > 0 {
                        log::debug!("data_string decoded after {layer} unescape layer(s)");
                    }
                    return Ok(InnerPayload { root });
                }
                Ok(JsonValue::String(inner)) => text = Cow::Owned(inner),
                Ok(other) => {
                    return Err(Error::MalformedPayload(format!(
                        "data_string decodes to {}, expected an object",
                        kind(&other)
                    )));
                }
                Err(parse_err) => {
                    let invalid = || {
                        Error::MalformedPayload(format!("data_string is not valid JSON: {parse_err}"))
                    };
                    let unescaped = unescape(&text).map_err(|_| invalid())?;
                    if unescaped == *text {
                        return Err(invalid());
                    }
                    text = Cow::Owned(unescaped);
                }
            }
        }
        Err(Error::MalformedPayload(format!(
            "data_string is still encoded after {MAX_LAYERS} layers"
        )))
    }

    /// The record objects at `data.series`, in source order.
    pub fn series(&self) -> Result<Vec<&Map<String, JsonValue>>> {
        let data = self
            .root
            .get("data")
            .ok_or_else(|| Error::PathNotFound("data".to_string()))?;
        let series = data
            .get("series")
            .ok_or_else(|| Error::PathNotFound("data.series".to_string()))?;
        let items = series
            .as_array()
            .ok_or_else(|| Error::PathNotFound("data.series is not a list".to_string()))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_object().ok_or_else(|| {
                    Error::PathNotFound(format!("data.series[{i}] is not an object"))
                })
            })
            .collect()
    }

    /// `data.series` as a table. Columns are the union of the records'
    /// fields in first-seen order.
    pub fn records(&self) -> Result<Table> {
        let objects = self.series()?;
        if objects.is_empty() {
            return Err(Error::NoRecords("data.series".to_string()));
        }

        let records: Vec<Record> = objects
            .iter()
            .map(|obj| {
                obj.iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                    .collect()
            })
            .collect();

        Ok(Table::from_ordered(
            records,
            objects.iter().flat_map(|obj| obj.keys().map(String::as_str)),
        ))
    }
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}
