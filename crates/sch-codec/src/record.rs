use serde_json::{Map, Value};

use crate::error::{CodecError, CodecResult};

/// A JSON object: the unit every blueprint reads and writes.
pub type Record = Map<String, Value>;

/// Field holding a record's kind discriminant.
pub const TYPE_FIELD: &str = "type";

/// A new record carrying `kind` as its type tag.
pub fn typed(kind: &str) -> Record {
    let mut record = Record::new();
    record.insert(TYPE_FIELD.into(), Value::String(kind.into()));
    record
}

/// The record's type tag, if it has a string one.
pub fn kind_of(record: &Record) -> Option<&str> {
    record.get(TYPE_FIELD).and_then(Value::as_str)
}

/// Whether the record's type tag equals `kind`, ignoring ASCII case.
pub fn has_kind(record: &Record, kind: &str) -> bool {
    kind_of(record).is_some_and(|k| k.eq_ignore_ascii_case(kind))
}

/// Turn a parsed JSON value into a record.
pub fn into_record(value: Value) -> CodecResult<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CodecError::malformed(
            "<root>",
            format!("must be an object, found {}", describe(&other)),
        )),
    }
}

/// The value of a required field.
pub fn require<'a>(record: &'a Record, field: &str) -> CodecResult<&'a Value> {
    record.get(field).ok_or_else(|| CodecError::missing(field))
}

/// A required string field.
pub fn require_str<'a>(record: &'a Record, field: &str) -> CodecResult<&'a str> {
    let value = require(record, field)?;
    value.as_str().ok_or_else(|| wrong_shape(field, "a string", value))
}

/// A required numeric field.
pub fn require_f64(record: &Record, field: &str) -> CodecResult<f64> {
    let value = require(record, field)?;
    value.as_f64().ok_or_else(|| wrong_shape(field, "a number", value))
}

/// A required integer field.
pub fn require_i64(record: &Record, field: &str) -> CodecResult<i64> {
    let value = require(record, field)?;
    value.as_i64().ok_or_else(|| wrong_shape(field, "an integer", value))
}

/// A required nested object.
pub fn require_object<'a>(record: &'a Record, field: &str) -> CodecResult<&'a Record> {
    let value = require(record, field)?;
    value.as_object().ok_or_else(|| wrong_shape(field, "an object", value))
}

/// A required array field.
pub fn require_array<'a>(record: &'a Record, field: &str) -> CodecResult<&'a Vec<Value>> {
    let value = require(record, field)?;
    value.as_array().ok_or_else(|| wrong_shape(field, "an array", value))
}

/// An optional string field; present but not a string is malformed.
pub fn optional_str<'a>(record: &'a Record, field: &str) -> CodecResult<Option<&'a str>> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(wrong_shape(field, "a string", other)),
    }
}

/// Whether `field` holds an object.
pub fn has_object(record: &Record, field: &str) -> bool {
    record.get(field).is_some_and(Value::is_object)
}

/// Whether `field` holds an array.
pub fn has_array(record: &Record, field: &str) -> bool {
    record.get(field).is_some_and(Value::is_array)
}

/// Whether `field` holds a number.
pub fn has_number(record: &Record, field: &str) -> bool {
    record.get(field).is_some_and(Value::is_number)
}

/// Whether `field` holds a string.
pub fn has_str(record: &Record, field: &str) -> bool {
    record.get(field).is_some_and(Value::is_string)
}

fn wrong_shape(field: &str, expected: &str, found: &Value) -> CodecError {
    CodecError::malformed(field, format!("must be {expected}, found {}", describe(found)))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
