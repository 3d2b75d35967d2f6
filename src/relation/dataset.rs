//! The realized sample of a relation, column by column
//!

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

use crate::data_type::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    columns: BTreeMap<String, Vec<Value>>,
}

impl Dataset {
    pub fn new() -> Dataset {
        Dataset::default()
    }

    /// Add or replace a column
    pub fn with_column<S: Into<String>, V: Into<Value>, I: IntoIterator<Item = V>>(
        mut self,
        name: S,
        values: I,
    ) -> Dataset {
        self.columns
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Build a dataset from rows of (column, value) pairs, missing cells are null
    pub fn from_rows<S, V, R, I>(rows: I) -> Dataset
    where
        S: Into<String>,
        V: Into<Value>,
        R: IntoIterator<Item = (S, V)>,
        I: IntoIterator<Item = R>,
    {
        let mut columns: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        let mut row_count = 0;
        for row in rows {
            for (name, value) in row {
                let column = columns.entry(name.into()).or_default();
                column.resize(row_count, Value::Null);
                column.push(value.into());
            }
            row_count += 1;
        }
        for column in columns.values_mut() {
            column.resize(row_count, Value::Null);
        }
        Dataset { columns }
    }

    /// Lookup a column by name, exactly first then ignoring case
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .get(name)
            .or_else(|| {
                self.columns
                    .iter()
                    .find(|(column, _)| column.eq_ignore_ascii_case(name))
                    .map(|(_, values)| values)
            })
            .map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.columns
                .iter()
                .map(|(name, values)| format!("{name}: [{}]", values.iter().join(", ")))
                .join("\n")
        )
    }
}
