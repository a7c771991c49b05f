//! Lenient integer fields in request bodies.

use serde_json::Value;

/// A body field that was present but could not be read as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotAnInteger;

/// Read a loosely typed JSON field as an integer.
///
/// Clients send ids and quantities both as numbers and as numeric strings, so
/// the body is kept untyped and each handler decides what a bad value means.
pub(crate) trait IntegerFieldExt {
    /// `Ok(None)` for an absent, null or blank field.
    fn integer(&self) -> Result<Option<i64>, NotAnInteger>;
}

impl IntegerFieldExt for Option<Value> {
    fn integer(&self) -> Result<Option<i64>, NotAnInteger> {
        match self {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => number.as_i64().map(Some).ok_or(NotAnInteger),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => text
                .trim()
                .parse::<i64>()
                .ok()
                .map(Some)
                .ok_or(NotAnInteger),
            Some(_) => Err(NotAnInteger),
        }
    }
}
