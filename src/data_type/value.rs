//! # The values of realized samples
//!
//! Values are read back from a materialized sample and are substituted as literals
//! into the constraints of dependent relations.
//!

use chrono;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::DataType;

/// A value read from a realized sample
///
/// Deserialization is untagged so that plain JSON scalars map to the closest variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Date(chrono::NaiveDate),
    DateTime(chrono::NaiveDateTime),
    Text(String),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Unknown,
            Value::Boolean(_) => DataType::Boolean,
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Date(_) => DataType::Date,
            Value::DateTime(_) => DataType::DateTime,
            Value::Text(_) => DataType::Text,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::Text(t) => write!(f, "{t}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<chrono::NaiveDate> for Value {
    fn from(value: chrono::NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<chrono::NaiveDateTime> for Value {
    fn from(value: chrono::NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    #[test]
    fn test_data_types() {
        assert_eq!(Value::from(5).data_type(), DataType::Integer);
        assert_eq!(Value::from("a").data_type(), DataType::Text);
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert!(Value::from(None::<f64>).is_null());
    }

    #[test]
    fn test_json_serde() {
        let values: Vec<Value> =
            serde_json::from_str(r#"[null, true, 3, 1.5, "2015-09-05", "2015-09-05T23:56:04", "abc"]"#)
                .expect("values");
        println!("values = {:?}", values);
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::from(true),
                Value::from(3),
                Value::from(1.5),
                Value::from(chrono::NaiveDate::from_ymd_opt(2015, 9, 5).unwrap()),
                Value::from(
                    chrono::NaiveDateTime::parse_from_str("2015-09-05 23:56:04", "%Y-%m-%d %H:%M:%S")
                        .unwrap()
                ),
                Value::from("abc"),
            ]
        );
        let json = serde_json::to_string(&values).expect("json");
        println!("json = {json}");
        assert!(json.starts_with("[null,true,3,1.5,"));
    }
}
