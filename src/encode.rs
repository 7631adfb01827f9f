//! JSON encoding for values carrying boxed numerics
//!
//! Boxed integers and floats encode as plain JSON numbers, arrays as nested
//! JSON arrays following their shape. Host extensions encode through
//! [`Extension::to_json`](crate::value::Extension::to_json) and fail with
//! `Error::NotSerializable` when they have no JSON form.

use crate::error::{Error, Result};
use crate::value::{ArrayData, Mapping, NativeScalar, Numeric, NumericArray, Value};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value as JsonValue};

/// Encode a value into a `serde_json::Value`
pub fn encode(value: &Value) -> Result<JsonValue> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Int(n) => Ok(JsonValue::from(*n)),
        Value::Float(x) => encode_float(*x),
        Value::String(s) => Ok(JsonValue::String(s.clone())),
        Value::Numeric(n) => encode_numeric(n),
        Value::Extension(ext) => ext.to_json().ok_or_else(|| Error::NotSerializable {
            type_name: ext.type_name().to_string(),
        }),
        Value::Sequence(items) => items
            .iter()
            .map(encode)
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        Value::Mapping(mapping) => encode_mapping(mapping).map(JsonValue::Object),
    }
}

/// Encode a mapping into a JSON object, preserving key order
pub fn encode_mapping(mapping: &Mapping) -> Result<Map<String, JsonValue>> {
    let mut obj = Map::with_capacity(mapping.len());
    for (key, value) in mapping.iter() {
        obj.insert(key.to_string(), encode(value)?);
    }
    Ok(obj)
}

pub fn to_string(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&encode(value)?)?)
}

pub fn to_string_pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(&encode(value)?)?)
}

fn encode_numeric(numeric: &Numeric) -> Result<JsonValue> {
    match numeric {
        Numeric::Integer(n) => Ok(JsonValue::from(*n)),
        Numeric::Float(x) => encode_float(*x),
        Numeric::Array(arr) => encode_array(arr),
    }
}

fn encode_float(x: f64) -> Result<JsonValue> {
    Number::from_f64(x)
        .map(JsonValue::Number)
        .ok_or_else(|| Error::NotSerializable {
            type_name: String::from("non-finite float"),
        })
}

fn encode_native(scalar: NativeScalar) -> Result<JsonValue> {
    match scalar {
        NativeScalar::Bool(b) => Ok(JsonValue::Bool(b)),
        NativeScalar::Int(n) => Ok(JsonValue::from(n)),
        NativeScalar::Float(x) => encode_float(x),
    }
}

/// Encode an array as nested lists, one nesting level per dimension
fn encode_array(arr: &NumericArray) -> Result<JsonValue> {
    let mut offset = 0;
    encode_dims(arr.data(), arr.shape(), &mut offset)
}

fn encode_dims(data: &ArrayData, shape: &[usize], offset: &mut usize) -> Result<JsonValue> {
    match shape.split_first() {
        None => {
            let scalar = data.get(*offset).ok_or_else(|| Error::ShapeMismatch {
                shape: shape.to_vec(),
                expected: *offset + 1,
                actual: data.len(),
            })?;
            *offset += 1;
            encode_native(scalar)
        }
        Some((&dim, rest)) => (0..dim)
            .map(|_| encode_dims(data, rest, offset))
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode(self)
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode_mapping(self)
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}
