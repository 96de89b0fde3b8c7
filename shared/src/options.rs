//! # Option-Map Accessor
//!
//! Every value that crosses the bridge arrives as an untyped key/value map
//! (a JSON object). The getters here are total over a missing key or an
//! explicit `null`: both yield the supplied default. A value that is present
//! but has the wrong type is reported as a [`ConfigValueError`] instead of
//! being coerced into something the caller did not send.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::LatLng;

/// An untyped option map as received from the application layer.
pub type OptionMap = Map<String, Value>;

/// A present value had a type the getter cannot accept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("option `{key}` must be {expected}, found {found}")]
pub struct ConfigValueError {
    /// Key that was looked up
    pub key: String,
    /// Human readable description of the accepted type
    pub expected: &'static str,
    /// JSON type that was actually present
    pub found: &'static str,
}

impl ConfigValueError {
    pub(crate) fn new(key: &str, expected: &'static str, value: &Value) -> Self {
        Self {
            key: key.to_owned(),
            expected,
            found: json_type(value),
        }
    }
}

/// Name of the JSON type of `value`, used in error messages.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}

fn present<'a>(key: &str, map: &'a OptionMap) -> Option<&'a Value> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value),
    }
}

/// Integer value of `key`; fractional numbers are truncated.
pub fn get_int(key: &str, map: &OptionMap, default: i64) -> Result<i64, ConfigValueError> {
    match present(key, map) {
        None => Ok(default),
        Some(value) => number_as_int(value).ok_or_else(|| ConfigValueError::new(key, "a number", value)),
    }
}

pub fn get_bool(key: &str, map: &OptionMap, default: bool) -> Result<bool, ConfigValueError> {
    match present(key, map) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(value) => Err(ConfigValueError::new(key, "a boolean", value)),
    }
}

pub fn get_double(key: &str, map: &OptionMap, default: f64) -> Result<f64, ConfigValueError> {
    match present(key, map) {
        None => Ok(default),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| ConfigValueError::new(key, "a finite number", &Value::Number(n.clone()))),
        Some(value) => Err(ConfigValueError::new(key, "a number", value)),
    }
}

/// String value of `key`. Numbers and booleans are stringified because some
/// callers send numeric settings (text sizes) either way.
pub fn get_string(key: &str, map: &OptionMap) -> Result<Option<String>, ConfigValueError> {
    match present(key, map) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(value) => Err(ConfigValueError::new(key, "a string", value)),
    }
}

pub fn get_map<'a>(key: &str, map: &'a OptionMap) -> Result<Option<&'a OptionMap>, ConfigValueError> {
    match present(key, map) {
        None => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(value) => Err(ConfigValueError::new(key, "a map", value)),
    }
}

pub fn get_array<'a>(key: &str, map: &'a OptionMap) -> Result<Option<&'a [Value]>, ConfigValueError> {
    match present(key, map) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.as_slice())),
        Some(value) => Err(ConfigValueError::new(key, "an array", value)),
    }
}

/// `{lat, lng}` pair; `None` unless both coordinates are present.
pub fn get_lat_lng(map: &OptionMap) -> Result<Option<LatLng>, ConfigValueError> {
    if present("lat", map).is_none() || present("lng", map).is_none() {
        return Ok(None);
    }
    Ok(Some(LatLng {
        lat: get_double("lat", map, 0.0)?,
        lng: get_double("lng", map, 0.0)?,
    }))
}

/// Whether `key` is present with a non-null value.
pub fn has(key: &str, map: &OptionMap) -> bool {
    present(key, map).is_some()
}

pub(crate) fn number_as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        _ => None,
    }
}
