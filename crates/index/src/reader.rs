//! Parsing of search index payloads into [`SearchIndex`].

use std::str::FromStr;

use exn::{OptionExt, ResultExt};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::consts::{DEFAULT_VARIABLE, DOCS_KEY};
use crate::error::{Error, ErrorKind, Result};
use crate::models::{Category, Record, SearchIndex};
use crate::source::Compression;
use crate::sniff::{looks_like_index, split_assignment};

/// A decoded (but not yet parsed) search index payload.
#[derive(Debug, Clone)]
pub struct IndexReader {
    variable: Option<String>,
    body: String,
}
impl IndexReader {
    /// Construct a reader from raw bytes, decompressing them first if they
    /// start with gzip magic bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if decompression fails or the payload is not UTF-8.
    #[instrument(skip(bytes), fields(payload_size = bytes.len()))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let payload = Compression::from_magic_bytes(bytes).decompress(bytes)?;
        Self::from_utf8(&payload)
    }

    /// Construct a reader from an already decompressed payload. Compression
    /// is not detected again, so the payload is read exactly as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not UTF-8.
    pub fn from_utf8(payload: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(payload)
            .or_raise(|| ErrorKind::MalformedDocument("payload is not valid UTF-8".to_string()))?;
        Ok(Self::from_text(text))
    }

    /// Construct a reader from already decoded text.
    pub fn from_text(text: &str) -> Self {
        let (variable, body) = split_assignment(text);
        Self {
            variable: variable.map(str::to_string),
            body: body.to_string(),
        }
    }

    /// Variable the payload assigns to, if it is a JavaScript assignment.
    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    /// Cheap check of the payload's header; parsing performs the full check,
    /// so this is only useful when you don't plan on reading the records.
    pub fn is_valid(&self) -> bool {
        looks_like_index(self.body.as_bytes())
    }

    /// Parses every record, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The body is not valid JSON
    /// - The JSON is not an object holding a `docs` array
    /// - Any record is missing a required field, or has a field of the wrong
    ///   type or an unknown category
    #[instrument(skip(self), fields(body_size = self.body.len(), records))]
    pub fn index(self) -> Result<SearchIndex> {
        let value: Value = match serde_json::from_str(&self.body) {
            Ok(value) => value,
            Err(err) => exn::bail!(ErrorKind::MalformedJson(err.to_string())),
        };
        let docs = value
            .as_object()
            .and_then(|object| object.get(DOCS_KEY))
            .and_then(Value::as_array)
            .ok_or_raise(|| ErrorKind::InvalidDocument)?;
        let records = docs
            .iter()
            .enumerate()
            .map(|(position, value)| record(value).or_raise(|| ErrorKind::InvalidRecord(position)))
            .collect::<Result<Vec<_>>>()?;
        tracing::Span::current().record("records", records.len());
        let variable = self.variable.unwrap_or_else(|| DEFAULT_VARIABLE.to_string());
        Ok(SearchIndex::new(variable, records))
    }
}
impl FromStr for IndexReader {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_text(s))
    }
}
impl FromStr for SearchIndex {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        IndexReader::from_text(s).index()
    }
}
impl TryFrom<IndexReader> for SearchIndex {
    type Error = Error;
    fn try_from(reader: IndexReader) -> Result<Self> {
        reader.index()
    }
}

/// Reads one record from its JSON object.
#[instrument(level = "trace", skip(value))]
fn record(value: &Value) -> Result<Record> {
    let object = value.as_object().ok_or_raise(|| ErrorKind::ParseError {
        field: "record",
        value: kind_of(value).to_string(),
    })?;
    let category: Category = required(object, "category")?.parse()?;
    Ok(Record {
        location: required(object, "location")?.into(),
        page: required(object, "page")?.to_string(),
        title: required(object, "title")?.to_string(),
        text: optional(object, "text")?.unwrap_or_default().to_string(),
        category,
    })
}

fn required<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a str> {
    optional(object, field)?.ok_or_raise(|| ErrorKind::MissingField(field))
}

/// A missing field and a `null` field are treated the same.
fn optional<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<Option<&'a str>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => exn::bail!(ErrorKind::ParseError {
            field,
            value: kind_of(other).to_string(),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
