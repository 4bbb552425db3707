use std::{cmp::Ordering, fmt::Display};

use serde::{Deserialize, Serialize};

/// Supported column types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Float,
    Text,
}

impl DataType {
    /// Maps a DDL type name to a column type. Anything unrecognized is TEXT.
    pub fn from_name(name: &str) -> Self {
        match name.to_uppercase().as_ref() {
            "INT" => DataType::Integer,
            "FLOAT" => DataType::Float,
            _ => DataType::Text,
        }
    }

    /// Whether a value may be stored in a column of this type.
    ///
    /// INT takes integers only, FLOAT widens integers, TEXT takes text only.
    /// NULL belongs to no type.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (DataType::Integer, Value::Integer(_))
                | (DataType::Float, Value::Integer(_) | Value::Float(_))
                | (DataType::Text, Value::Text(_))
        )
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DataType::Integer => "INT",
            DataType::Float => "FLOAT",
            DataType::Text => "TEXT",
        })
    }
}

/// Runtime value stored in a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Coerces a raw literal token into a typed value.
    ///
    /// `NULL` (any case) is Null, a single-quoted token is Text with the quotes
    /// removed, an all-digit token is Integer, anything else that parses as a
    /// float is Float, and whatever is left is kept verbatim as Text.
    pub fn from_literal(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("NULL") {
            return Value::Null;
        }
        if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
            return Value::Text(raw[1..raw.len() - 1].to_string());
        }
        if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
            // Too large for i64 falls through to the float parse below
            if let Ok(i) = raw.parse() {
                return Value::Integer(i);
            }
        }
        match raw.parse::<f64>() {
            Ok(f) => Value::Float(f),
            Err(_) => Value::Text(raw.to_string()),
        }
    }

    /// Type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INT",
            Self::Float(_) => "FLOAT",
            Self::Text(_) => "TEXT",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }

    /// Orders two values of compatible types.
    ///
    /// Integers and floats compare numerically with each other, text compares
    /// lexicographically. Every other pairing (including anything with Null)
    /// has no ordering.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => compare_int_float(*a, *b),
            (Value::Float(a), Value::Integer(b)) => compare_int_float(*b, *a).map(Ordering::reverse),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            (_, _) => None,
        }
    }

    /// Equality used by `=`, `!=` and join matching.
    ///
    /// Same as [`Value::compare`] returning `Equal`, except that Null equals Null.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }
}

/// Exact integer/float ordering; casting the integer to f64 would round
/// anything beyond 2^53.
fn compare_int_float(i: i64, f: f64) -> Option<Ordering> {
    // i64 covers [-2^63, 2^63); both bounds are exact as f64
    let (min, max) = (i64::MIN as f64, -(i64::MIN as f64));
    if f.is_nan() {
        None
    } else if f >= max {
        Some(Ordering::Less)
    } else if f < min {
        Some(Ordering::Greater)
    } else {
        let whole = f.trunc();
        // The fractional part decides when the whole parts tie
        Some(i.cmp(&(whole as i64)).then_with(|| {
            whole.partial_cmp(&f).unwrap_or(Ordering::Equal)
        }))
    }
}

/// Renders a float like `2.0`, `0.5` or `1e+16`: exponents carry a sign and
/// at least two digits.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    let repr = format!("{:?}", v);
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// A row is a vector of values, one per column
pub type Row = Vec<Value>;
