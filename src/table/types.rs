use std::fmt;

use chrono::NaiveDate;

/// Logical type of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Float,
    Int,
    Str,
    Date,
}

/// A single cell. `Null` marks a missing value in a column of any type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f64),
    Int(i64),
    Str(String),
    Date(NaiveDate),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The type this value belongs to, or `None` for `Null`.
    pub fn dtype(&self) -> Option<DataType> {
        match self {
            Value::Float(_) => Some(DataType::Float),
            Value::Int(_) => Some(DataType::Int),
            Value::Str(_) => Some(DataType::Str),
            Value::Date(_) => Some(DataType::Date),
            Value::Null => None,
        }
    }

    /// Numeric view; integers widen to f64, everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Hash/Eq-safe key for duplicate detection. Floats compare by bit
    /// pattern, nulls compare equal to each other.
    pub fn key(&self) -> ValueKey<'_> {
        match self {
            Value::Float(v) => ValueKey::Float(v.to_bits()),
            Value::Int(v) => ValueKey::Int(*v),
            Value::Str(s) => ValueKey::Str(s),
            Value::Date(d) => ValueKey::Date(*d),
            Value::Null => ValueKey::Null,
        }
    }
}

impl fmt::Display for Value {
    /// Plain-text rendering used by the flat-file emitters; nulls render
    /// as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d),
            Value::Null => Ok(()),
        }
    }
}

/// Borrowed comparison key for a `Value`, see [`Value::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey<'a> {
    Float(u64),
    Int(i64),
    Str(&'a str),
    Date(NaiveDate),
    Null,
}
