//! # The data types of relation attributes
//!
//! Attributes only carry a semantic type, as reported by the source catalog.
//! Realized sample values are represented by [Value].
//!

pub mod value;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use value::Value;

/// The semantic type of an attribute
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    Decimal,
    Text,
    Date,
    Time,
    DateTime,
    Binary,
    Json,
    Unknown,
}

/// Map catalog type names (with or without parameters) to a semantic type
impl From<&str> for DataType {
    fn from(name: &str) -> Self {
        let name = name.trim().to_uppercase();
        let base = name.split('(').next().unwrap_or_default().trim();
        match base {
            "BOOLEAN" | "BOOL" => DataType::Boolean,
            "INT" | "INTEGER" | "BIGINT" | "SMALLINT" | "TINYINT" | "BYTEINT" | "INT2" | "INT4"
            | "INT8" | "SERIAL" | "BIGSERIAL" => DataType::Integer,
            "FLOAT" | "FLOAT4" | "FLOAT8" | "DOUBLE" | "DOUBLE PRECISION" | "REAL" => {
                DataType::Float
            }
            "NUMBER" | "NUMERIC" | "DECIMAL" => DataType::Decimal,
            "VARCHAR" | "CHAR" | "CHARACTER" | "CHARACTER VARYING" | "STRING" | "TEXT" => {
                DataType::Text
            }
            "DATE" => DataType::Date,
            "TIME" => DataType::Time,
            "DATETIME" | "TIMESTAMP" | "TIMESTAMP_NTZ" | "TIMESTAMP_LTZ" | "TIMESTAMP_TZ"
            | "TIMESTAMPTZ" => DataType::DateTime,
            "BINARY" | "VARBINARY" | "BYTEA" => DataType::Binary,
            "JSON" | "JSONB" | "VARIANT" | "OBJECT" | "ARRAY" => DataType::Json,
            _ => DataType::Unknown,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Decimal => "decimal",
            DataType::Text => "text",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::DateTime => "date_time",
            DataType::Binary => "binary",
            DataType::Json => "json",
            DataType::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_catalog_names() {
        assert_eq!(DataType::from("NUMBER(38,0)"), DataType::Decimal);
        assert_eq!(DataType::from("varchar(16777216)"), DataType::Text);
        assert_eq!(DataType::from("TIMESTAMP_NTZ"), DataType::DateTime);
        assert_eq!(DataType::from("bigint"), DataType::Integer);
        assert_eq!(DataType::from("GEOGRAPHY"), DataType::Unknown);
        assert_eq!(DataType::from("double precision"), DataType::Float);
    }

    #[test]
    fn test_display() {
        println!("{}", DataType::DateTime);
        assert_eq!(DataType::DateTime.to_string(), "date_time");
    }
}
