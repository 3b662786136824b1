//! Column types a field can be cast to and the values a cell can hold.
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Visitor};

/// Target type of a column. Declared in the configuration or inferred from
/// the data when the field carries no declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
}

/// Returned when a configuration names a type that is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl fmt::Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown column type `{}`, expected one of string, integer, float, boolean",
            self.0
        )
    }
}

impl std::error::Error for UnknownType {}

impl FromStr for ColumnType {
    type Err = UnknownType;

    fn from_str(name: &str) -> Result<ColumnType, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "str" | "string" | "object" | "text" => Ok(ColumnType::String),
            "int" | "integer" | "int64" | "int32" => Ok(ColumnType::Integer),
            "float" | "float64" | "double" | "number" => Ok(ColumnType::Float),
            "bool" | "boolean" => Ok(ColumnType::Boolean),
            _ => Err(UnknownType(name.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<ColumnType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;

        name.parse().map_err(de::Error::custom)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();

    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl ColumnType {
    /// Casts one cell. Empty cells become `Value::Null` whatever the type;
    /// `None` means the text is not a valid value of this type.
    pub fn cast(self, raw: &str) -> Option<Value> {
        if raw.is_empty() {
            return Some(Value::Null);
        }

        match self {
            ColumnType::String => Some(Value::Str(raw.to_string())),
            ColumnType::Integer => raw.trim().parse().ok().map(Value::Int),
            ColumnType::Float => raw.trim().parse().ok().map(Value::Float),
            ColumnType::Boolean => parse_bool(raw).map(Value::Bool),
        }
    }

    /// Picks the narrowest type every non-empty cell of a column can be cast
    /// to, trying integer, float and boolean before falling back to string.
    /// Only finite numbers count as floats here, so text such as `Nan` or
    /// `Inf` stays a string unless the column is declared `float`.
    pub fn infer<'a, I>(cells: I) -> ColumnType
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = false;
        let mut integer = true;
        let mut float = true;
        let mut boolean = true;

        for cell in cells.into_iter().filter(|c| !c.is_empty()) {
            seen = true;
            let cell = cell.trim();

            integer = integer && cell.parse::<i64>().is_ok();
            float = float && cell.parse::<f64>().map_or(false, f64::is_finite);
            boolean = boolean && parse_bool(cell).is_some();

            if !(integer || float || boolean) {
                break;
            }
        }

        match (seen, integer, float, boolean) {
            (false, ..) => ColumnType::String,
            (true, true, ..) => ColumnType::Integer,
            (true, _, true, _) => ColumnType::Float,
            (true, _, _, true) => ColumnType::Boolean,
            _ => ColumnType::String,
        }
    }
}

/// A single cell of a `Table`.
///
/// Equality is type sensitive: `Int(1)` is not equal to `Float(1.0)` nor to
/// `Str("1")`. A NaN float equals any other NaN, so a NaN cell equals itself.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

/// Renders the value as it is written to a CSV cell. Floats keep a decimal
/// point or an exponent so they read back as floats.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Str(ref s) => f.write_str(s),
        }
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar value (string, number, boolean or null)")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| E::custom(format!("integer {} is out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Str(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }
}

/// Filter values are YAML scalars; sequences and mappings are rejected.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarVisitor)
    }
}
