use alloc::borrow::Cow;
use alloc::string::String;

use crate::{Array, Datetime, Table};

/// A TOML value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// A UTF-8 string. Borrowed from the source when no escape processing was needed, owned
    /// otherwise.
    String(Cow<'a, str>),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit floating point number.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// An offset date-time, local date-time, local date or local time.
    Datetime(Datetime),
    /// An array of values.
    Array(Array<'a>),
    /// A table.
    Table(Table<'a>),
}

impl<'a> Value<'a> {
    /// The name of this value's type, for error messages.
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Datetime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }

    /// If this is a `Value::String`, returns the inner string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If this is a `Value::Integer`, returns the inner integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// If this is a `Value::Float`, returns the inner float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// If this is a `Value::Boolean`, returns the inner boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// If this is a `Value::Datetime`, returns the inner datetime.
    pub fn as_datetime(&self) -> Option<&Datetime> {
        match self {
            Value::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    /// If this is a `Value::Array`, returns the inner array.
    pub fn as_array(&self) -> Option<&Array<'a>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// If this is a `Value::Table`, returns the inner table.
    pub fn as_table(&self) -> Option<&Table<'a>> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Is this value a table or array? These are the only two types a `parse_float` converter is
    /// forbidden from producing.
    pub(crate) fn is_table_or_array(&self) -> bool {
        matches!(self, Value::Table(_) | Value::Array(_))
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value<'_> {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value<'_> {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Datetime> for Value<'_> {
    fn from(dt: Datetime) -> Self {
        Value::Datetime(dt)
    }
}

impl<'a> From<Array<'a>> for Value<'a> {
    fn from(a: Array<'a>) -> Self {
        Value::Array(a)
    }
}

impl<'a> From<Table<'a>> for Value<'a> {
    fn from(t: Table<'a>) -> Self {
        Value::Table(t)
    }
}

impl<'a, T> FromIterator<T> for Value<'a>
where
    T: Into<Value<'a>>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}
