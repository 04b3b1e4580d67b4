//! Deserialization helpers for shapes the export spells more than one way.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::recognized::{ExternalName, Recognized};

/// Bonus currencies arrive either as a mapping keyed by currency name or as a
/// plain list of names. Both normalize to the list of names in source order;
/// an empty or absent table becomes `None`.
pub(crate) fn bonus_currencies<'de, D, T>(
    deserializer: D,
) -> Result<Option<Vec<Recognized<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: ExternalName,
{
    let names: Vec<String> = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Object(map) => map.into_iter().map(|(name, _)| name).collect(),
        Value::Array(values) => values
            .into_iter()
            .map(|value| match value {
                Value::String(name) => Ok(name),
                other => Err(D::Error::custom(format!(
                    "expected a currency name, received {other}"
                ))),
            })
            .collect::<Result<_, _>>()?,
        other => {
            return Err(D::Error::custom(format!(
                "expected a mapping or a sequence, received {other}"
            )));
        }
    };

    if names.is_empty() {
        return Ok(None);
    }
    Ok(Some(names.iter().map(|name| Recognized::from_external(name)).collect()))
}

/// Integers sometimes arrive as integral floats (`3.0`).
pub(crate) fn lax_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
                .map(|float| float as i64)
        }),
        _ => None,
    }
}

/// Flags arrive as JSON booleans or as `0`/`1`.
pub(crate) fn lax_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(_) => match lax_integer(value) {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    }
}

fn expected_integer<E: serde::de::Error>() -> E {
    E::custom("expected an integer")
}

/// `deserialize_with` form of [`lax_integer`] for fields inside nested tables.
pub(crate) fn lax_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    lax_integer(&value).ok_or_else(expected_integer)
}

/// Like [`lax_i64`], with `null` read as absent.
pub(crate) fn lax_opt_i64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => lax_integer(&value).map(Some).ok_or_else(expected_integer),
    }
}

pub(crate) fn lax_i64_vec<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<i64>, D::Error> {
    Vec::<Value>::deserialize(deserializer)?
        .iter()
        .map(|value| lax_integer(value).ok_or_else(expected_integer))
        .collect()
}

/// `deserialize_with` form of [`lax_bool`]. `null` reads as `false`.
pub(crate) fn lax_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        value => lax_bool(&value).ok_or_else(|| D::Error::custom("expected a boolean or 0/1")),
    }
}
