use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Storage kind of one registered resource field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text column.
    Text,
    /// Integer column.
    Integer,
    /// Boolean flag column stored as 0/1.
    Flag,
}

impl FieldKind {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Flag => "flag",
        }
    }

    /// Coerces a submitted value into the representation stored for this kind.
    ///
    /// Form posts deliver everything as strings, so numeric and flag columns
    /// accept their textual spelling as well.
    pub fn coerce(&self, value: &Value) -> Result<Value, String> {
        match self {
            Self::Text => match value {
                Value::String(content) => Ok(Value::String(content.clone())),
                Value::Number(number) => Ok(Value::String(number.to_string())),
                Value::Bool(flag) => Ok(Value::String((if *flag { "1" } else { "0" }).to_owned())),
                _ => Err(format!("expected text, got {}", json_kind(value))),
            },
            Self::Integer => match value {
                Value::Number(number) => integer_from_number(number)
                    .map(Value::from)
                    .ok_or_else(|| format!("expected an integer, got '{number}'")),
                Value::String(content) => parse_integer(content)
                    .map(Value::from)
                    .ok_or_else(|| format!("expected an integer, got '{content}'")),
                Value::Bool(flag) => Ok(Value::from(i64::from(*flag))),
                _ => Err(format!("expected an integer, got {}", json_kind(value))),
            },
            Self::Flag => match value {
                Value::Bool(flag) => Ok(Value::Bool(*flag)),
                Value::Number(number) => match integer_from_number(number) {
                    Some(0) => Ok(Value::Bool(false)),
                    Some(1) => Ok(Value::Bool(true)),
                    _ => Err(format!("expected a flag, got '{number}'")),
                },
                Value::String(content) => match content.trim().to_ascii_lowercase().as_str() {
                    "" | "0" | "false" | "off" => Ok(Value::Bool(false)),
                    "1" | "true" | "on" => Ok(Value::Bool(true)),
                    other => Err(format!("expected a flag, got '{other}'")),
                },
                _ => Err(format!("expected a flag, got {}", json_kind(value))),
            },
        }
    }
}

/// Compares two fact values the way condition expressions and change
/// detection expect: numbers by magnitude, numeric strings against numbers,
/// booleans against 0/1, containers element by element.
#[must_use]
pub fn loosely_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Number(left), Value::Number(right)) => numbers_equal(left, right),
        (Value::Number(number), Value::String(text))
        | (Value::String(text), Value::Number(number)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .zip(number.as_f64())
            .is_some_and(|(parsed, number)| parsed == number),
        (Value::Bool(flag), Value::Number(number)) | (Value::Number(number), Value::Bool(flag)) => {
            integer_from_number(number) == Some(i64::from(*flag))
        }
        (Value::Bool(flag), text @ Value::String(_))
        | (text @ Value::String(_), Value::Bool(flag)) => {
            FieldKind::Flag.coerce(text) == Ok(Value::Bool(*flag))
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(left, right)| loosely_equal(left, right))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left.iter().all(|(key, value)| {
                    right
                        .get(key)
                        .is_some_and(|other| loosely_equal(value, other))
                })
        }
        _ => false,
    }
}

/// Reads an integer out of a fact value, accepting numeric strings.
#[must_use]
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => integer_from_number(number),
        Value::String(content) => parse_integer(content),
        _ => None,
    }
}

fn numbers_equal(left: &Number, right: &Number) -> bool {
    match (left.as_i64(), right.as_i64()) {
        (Some(left), Some(right)) => left == right,
        _ => left
            .as_f64()
            .zip(right.as_f64())
            .is_some_and(|(left, right)| left == right),
    }
}

fn integer_from_number(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|value| value.fract() == 0.0 && value.abs() < 9.0e15)
            .map(|value| value as i64)
    })
}

fn parse_integer(content: &str) -> Option<i64> {
    let trimmed = content.trim();
    trimmed.parse::<i64>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.fract() == 0.0 && value.abs() < 9.0e15)
            .map(|value| value as i64)
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
