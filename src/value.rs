//! Helpers over `sea_query::Value`.
//!
//! Every `None`-carrying variant is SQL NULL. Equivalence is looser than
//! `PartialEq`: integers compare across widths, floats compare numerically and
//! every NULL form equals every other (and equals an unassigned attribute).

use sea_query::Value;
use serde_json::Value as JsonValue;
use std::borrow::Cow;

/// Returns `true` for any NULL-carrying variant.
pub fn is_null(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::TinyUnsigned(None)
            | Value::SmallUnsigned(None)
            | Value::Unsigned(None)
            | Value::BigUnsigned(None)
            | Value::Float(None)
            | Value::Double(None)
            | Value::String(None)
            | Value::Char(None)
            | Value::Bytes(None)
            | Value::Json(None)
    )
}

/// The NULL used when no column type is known.
pub fn null() -> Value {
    Value::String(None)
}

enum Scalar<'a> {
    Null,
    Int(i128),
    Real(f64),
    Text(Cow<'a, str>),
    Bytes(&'a [u8]),
    Other(&'a Value),
}

fn scalar(value: Option<&Value>) -> Scalar<'_> {
    let Some(value) = value else {
        return Scalar::Null;
    };
    if is_null(value) {
        return Scalar::Null;
    }
    match value {
        Value::Bool(Some(b)) => Scalar::Int(i128::from(*b)),
        Value::TinyInt(Some(i)) => Scalar::Int(i128::from(*i)),
        Value::SmallInt(Some(i)) => Scalar::Int(i128::from(*i)),
        Value::Int(Some(i)) => Scalar::Int(i128::from(*i)),
        Value::BigInt(Some(i)) => Scalar::Int(i128::from(*i)),
        Value::TinyUnsigned(Some(u)) => Scalar::Int(i128::from(*u)),
        Value::SmallUnsigned(Some(u)) => Scalar::Int(i128::from(*u)),
        Value::Unsigned(Some(u)) => Scalar::Int(i128::from(*u)),
        Value::BigUnsigned(Some(u)) => Scalar::Int(i128::from(*u)),
        Value::Float(Some(f)) => Scalar::Real(f64::from(*f)),
        Value::Double(Some(d)) => Scalar::Real(*d),
        Value::String(Some(s)) => Scalar::Text(Cow::Borrowed(s.as_str())),
        Value::Char(Some(c)) => Scalar::Text(Cow::Owned(c.to_string())),
        Value::Bytes(Some(b)) => Scalar::Bytes(b.as_slice()),
        other => Scalar::Other(other),
    }
}

/// Compare two optional attribute values the way record equality does.
pub fn equivalent(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (scalar(a), scalar(b)) {
        (Scalar::Null, Scalar::Null) => true,
        (Scalar::Int(x), Scalar::Int(y)) => x == y,
        (Scalar::Real(x), Scalar::Real(y)) => x == y,
        #[allow(clippy::cast_precision_loss)]
        (Scalar::Int(x), Scalar::Real(y)) | (Scalar::Real(y), Scalar::Int(x)) => x as f64 == y,
        (Scalar::Text(x), Scalar::Text(y)) => x == y,
        (Scalar::Bytes(x), Scalar::Bytes(y)) => x == y,
        (Scalar::Other(x), Scalar::Other(y)) => x == y,
        _ => false,
    }
}

/// Convert a stored value into `T`.
///
/// SQLite hands back untyped NULLs and 64-bit integers, so when the direct
/// conversion fails the value is retried in its other representations
/// (narrower integer widths, `bool` for 0/1, `f64`, a typed NULL).
pub(crate) fn convert<T: sea_query::ValueType>(value: Value) -> Option<T> {
    let alternatives = alternatives(&value);
    if let Ok(converted) = <T as sea_query::ValueType>::try_from(value) {
        return Some(converted);
    }
    alternatives.into_iter().find_map(|alt| <T as sea_query::ValueType>::try_from(alt).ok())
}

fn alternatives(value: &Value) -> Vec<Value> {
    if is_null(value) {
        return vec![
            Value::Bool(None),
            Value::TinyInt(None),
            Value::SmallInt(None),
            Value::Int(None),
            Value::BigInt(None),
            Value::TinyUnsigned(None),
            Value::SmallUnsigned(None),
            Value::Unsigned(None),
            Value::BigUnsigned(None),
            Value::Float(None),
            Value::Double(None),
            Value::String(None),
            Value::Char(None),
            Value::Bytes(None),
            Value::Json(None),
        ];
    }
    match scalar(Some(value)) {
        Scalar::Int(i) => {
            let mut out = Vec::new();
            if let Ok(v) = i64::try_from(i) {
                out.push(Value::BigInt(Some(v)));
            }
            if let Ok(v) = i32::try_from(i) {
                out.push(Value::Int(Some(v)));
            }
            if let Ok(v) = i16::try_from(i) {
                out.push(Value::SmallInt(Some(v)));
            }
            if let Ok(v) = i8::try_from(i) {
                out.push(Value::TinyInt(Some(v)));
            }
            if let Ok(v) = u64::try_from(i) {
                out.push(Value::BigUnsigned(Some(v)));
            }
            if let Ok(v) = u32::try_from(i) {
                out.push(Value::Unsigned(Some(v)));
            }
            if let Ok(v) = u16::try_from(i) {
                out.push(Value::SmallUnsigned(Some(v)));
            }
            if let Ok(v) = u8::try_from(i) {
                out.push(Value::TinyUnsigned(Some(v)));
            }
            if i == 0 || i == 1 {
                out.push(Value::Bool(Some(i == 1)));
            }
            #[allow(clippy::cast_precision_loss)]
            out.push(Value::Double(Some(i as f64)));
            out
        }
        #[allow(clippy::cast_possible_truncation)]
        Scalar::Real(f) => vec![Value::Double(Some(f)), Value::Float(Some(f as f32))],
        Scalar::Text(s) => {
            let mut out = vec![Value::String(Some(s.to_string()))];
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                out.push(Value::Char(Some(c)));
            }
            out
        }
        _ => Vec::new(),
    }
}

/// Render a value as JSON (NULL → `null`, bytes → array of numbers).
pub fn to_json(value: &Value) -> JsonValue {
    match scalar(Some(value)) {
        Scalar::Null => JsonValue::Null,
        Scalar::Int(i) => i64::try_from(i)
            .map(JsonValue::from)
            .unwrap_or_else(|_| JsonValue::from(i.to_string())),
        Scalar::Real(f) => JsonValue::from(f),
        Scalar::Text(s) => JsonValue::String(s.into_owned()),
        Scalar::Bytes(b) => JsonValue::from(b.to_vec()),
        Scalar::Other(Value::Json(Some(j))) => (**j).clone(),
        Scalar::Other(other) => JsonValue::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_none_variant_is_null() {
        assert!(is_null(&Value::Int(None)));
        assert!(is_null(&Value::String(None)));
        assert!(is_null(&Value::Bytes(None)));
        assert!(!is_null(&Value::Int(Some(0))));
        assert!(!is_null(&Value::String(Some(String::new()))));
    }

    #[test]
    fn test_nulls_and_absence_are_equivalent() {
        assert!(equivalent(None, Some(&Value::Int(None))));
        assert!(equivalent(Some(&Value::String(None)), Some(&Value::BigInt(None))));
        assert!(!equivalent(None, Some(&Value::Int(Some(0)))));
    }

    #[test]
    fn test_integers_compare_across_widths() {
        assert!(equivalent(Some(&Value::Int(Some(1))), Some(&Value::BigInt(Some(1)))));
        assert!(equivalent(Some(&Value::Bool(Some(true))), Some(&Value::BigInt(Some(1)))));
        assert!(!equivalent(Some(&Value::Int(Some(1))), Some(&Value::BigInt(Some(2)))));
    }

    #[test]
    fn test_text_does_not_equal_number() {
        assert!(!equivalent(
            Some(&Value::String(Some("1".to_string()))),
            Some(&Value::BigInt(Some(1)))
        ));
    }

    #[test]
    fn test_convert_widens_and_narrows_integers() {
        assert_eq!(convert::<i64>(Value::BigInt(Some(42))), Some(42));
        assert_eq!(convert::<i32>(Value::BigInt(Some(42))), Some(42));
        assert_eq!(convert::<bool>(Value::BigInt(Some(1))), Some(true));
        assert_eq!(convert::<f64>(Value::BigInt(Some(2))), Some(2.0));
        assert_eq!(convert::<i8>(Value::BigInt(Some(1000))), None);
    }

    #[test]
    fn test_convert_untyped_null_into_option() {
        assert_eq!(convert::<Option<i64>>(Value::String(None)), Some(None));
        assert_eq!(convert::<Option<String>>(Value::String(None)), Some(None));
        assert_eq!(convert::<String>(Value::String(None)), None);
    }

    #[test]
    fn test_convert_text() {
        assert_eq!(
            convert::<String>(Value::String(Some("hi".to_string()))),
            Some("hi".to_string())
        );
        assert_eq!(convert::<i64>(Value::String(Some("1".to_string()))), None);
    }

    #[test]
    fn test_to_json() {
        assert_eq!(to_json(&Value::BigInt(Some(5))), JsonValue::from(5));
        assert_eq!(to_json(&Value::String(None)), JsonValue::Null);
        assert_eq!(
            to_json(&Value::String(Some("hi".to_string()))),
            JsonValue::String("hi".to_string())
        );
    }
}
