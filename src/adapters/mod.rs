//! # Dialect specific statement builders
//!
//! A [StatementAdapter] turns the abstract constraints of a relation into SQL fragments.
//! The trait provides ANSI flavored defaults; each dialect is a struct overriding what differs:
//!     - how identifiers are quoted and relations are named
//!     - how a sample method is written
//!     - how views are introspected
//!     - how a filtered statement is sampled again
//!
//! Constraint keys are column names used unquoted, the way the catalog reports them.
//!

pub mod postgres;
pub mod snowflake;

use itertools::Itertools;
use sqlparser::ast;
use std::{error, fmt, result};

use crate::{data_type::Value, namer, relation::Relation, sampling::SampleMethod};

pub use postgres::PostgresAdapter;
pub use snowflake::SnowflakeAdapter;

// Error management

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    MissingColumn(String),
    UnsupportedSampleMethod(String),
    Other(String),
}

impl Error {
    pub fn missing_column(column: impl fmt::Display, relation: impl fmt::Display) -> Error {
        Error::MissingColumn(format!("{} is not a realized column of {}", column, relation))
    }
    pub fn unsupported_sample_method(
        sample_method: impl fmt::Display,
        dialect: impl fmt::Display,
    ) -> Error {
        Error::UnsupportedSampleMethod(format!(
            "{} is not supported by {}",
            sample_method, dialect
        ))
    }
    pub fn other(desc: impl fmt::Display) -> Error {
        Error::Other(format!("{}", desc))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingColumn(desc) => writeln!(f, "MissingColumn: {}", desc),
            Error::UnsupportedSampleMethod(desc) => writeln!(f, "UnsupportedSampleMethod: {}", desc),
            Error::Other(err) => writeln!(f, "{}", err),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

/// The fragment builders of a SQL dialect
pub trait StatementAdapter {
    /// The name of the dialect
    fn name(&self) -> &str;

    fn quote_style(&self) -> char {
        '"'
    }

    fn quote(&self, identifier: &str) -> String {
        ast::Ident::with_quote(self.quote_style(), identifier).to_string()
    }

    /// The fully qualified and quoted name of the relation
    fn quoted_dot_notation(&self, relation: &Relation) -> String {
        ast::ObjectName(
            relation
                .name()
                .path()
                .into_iter()
                .map(|name| ast::Ident::with_quote(self.quote_style(), name))
                .collect(),
        )
        .to_string()
    }

    /// A CTE name unique to the relation
    fn scoped_cte(&self, relation: &Relation, prefix: &str) -> String {
        namer::name_from_content(prefix, relation.name())
    }

    /// A SQL literal
    fn literal(&self, value: &Value) -> String {
        let value = match value {
            Value::Null => ast::Value::Null,
            Value::Boolean(b) => ast::Value::Boolean(*b),
            Value::Integer(i) => ast::Value::Number(format!("{}", i), false),
            Value::Float(x) if x.is_finite() => ast::Value::Number(format!("{}", x), false),
            Value::Float(_) => ast::Value::Null,
            Value::Date(_) | Value::DateTime(_) | Value::Text(_) => {
                ast::Value::SingleQuotedString(value.to_string())
            }
        };
        value.to_string()
    }

    /// The sampling clause appended to a `FROM`
    fn sample_clause(&self, sample_method: &SampleMethod) -> Result<String>;

    fn population_count_statement(&self, relation: &Relation) -> String {
        format!(
            "SELECT COUNT(*) AS population_size FROM {}",
            self.quoted_dot_notation(relation)
        )
    }

    /// A statement returning the definition of a view
    fn view_creation_statement(&self, relation: &Relation) -> Result<String>;

    fn unsampled_statement(&self, relation: &Relation) -> Result<String> {
        Ok(format!("SELECT * FROM {}", self.quoted_dot_notation(relation)))
    }

    fn sample_statement_from_relation(
        &self,
        relation: &Relation,
        sample_method: Option<&SampleMethod>,
    ) -> Result<String> {
        let statement = format!("SELECT * FROM {}", self.quoted_dot_notation(relation));
        Ok(match sample_method {
            Some(sample_method) => format!("{statement} {}", self.sample_clause(sample_method)?),
            None => statement,
        })
    }

    /// Restrict `local_key` of the relation being compiled to the live values of `remote_key` in `other`
    fn upstream_constraint_statement(
        &self,
        other: &Relation,
        local_key: &str,
        remote_key: &str,
    ) -> Result<String> {
        Ok(format!(
            "{local_key} IN (SELECT {remote_key} FROM {})",
            self.quoted_dot_notation(other)
        ))
    }

    /// Restrict `local_key` to the values of `remote_key` realized in `parent`.
    /// When analyzing, the parent is not realized and its source relation is used instead.
    fn predicate_constraint_statement(
        &self,
        parent: &Relation,
        analyze: bool,
        local_key: &str,
        remote_key: &str,
    ) -> Result<String> {
        if analyze {
            return Ok(format!(
                "{local_key} IN (SELECT {remote_key} AS {local_key} FROM {})",
                self.quoted_dot_notation(parent)
            ));
        }
        let values: Vec<String> = match parent.data() {
            Some(data) => data
                .column(remote_key)
                .ok_or_else(|| Error::missing_column(remote_key, parent.name()))?
                .iter()
                .filter(|value| !value.is_null())
                .map(|value| self.literal(value))
                .unique()
                .collect(),
            None => {
                log::warn!(
                    "{} is not realized, {local_key} will match no value",
                    parent.name()
                );
                Vec::new()
            }
        };
        let values = if values.is_empty() {
            "NULL".to_string()
        } else {
            values.join(",")
        };
        Ok(format!("{local_key} IN ({values})"))
    }

    /// At most `max_number_of_outliers` rows of `subject` whose `subject_key` has no match in `constraint_key`
    fn union_constraint_statement(
        &self,
        subject: &Relation,
        constraint: &Relation,
        subject_key: &str,
        constraint_key: &str,
        max_number_of_outliers: usize,
    ) -> Result<String> {
        Ok(format!(
            "(SELECT * FROM {} WHERE {subject_key} NOT IN (SELECT {constraint_key} FROM {}) LIMIT {max_number_of_outliers})",
            self.quoted_dot_notation(subject),
            self.quoted_dot_notation(constraint),
        ))
    }

    /// Sample a constrained statement. Without sample method the statement is returned as is.
    fn directionally_wrap_statement(
        &self,
        statement: &str,
        relation: &Relation,
        sample_method: Option<&SampleMethod>,
    ) -> Result<String> {
        let Some(sample_method) = sample_method else {
            return Ok(statement.to_string());
        };
        let final_sample = self.scoped_cte(relation, namer::FINAL_SAMPLE);
        let directional_sample = self.scoped_cte(relation, namer::DIRECTIONAL_SAMPLE);
        Ok(format!(
            "WITH {final_sample} AS (\n{statement}\n),\n{directional_sample} AS (\nSELECT * FROM {final_sample} {}\n)\nSELECT * FROM {directional_sample}",
            self.sample_clause(sample_method)?
        ))
    }

    /// Count the rows of the sample and of the population instead of returning the sample
    fn analyze_wrap_statement(&self, statement: &str, relation: &Relation) -> Result<String> {
        let population = self.scoped_cte(relation, namer::COUNT_POPULATION);
        let core_sample = self.scoped_cte(relation, namer::CORE_SAMPLE);
        Ok(format!(
            "WITH {population} AS (\n{}\n),\n{core_sample} AS (\n{statement}\n),\n{core_sample}_COUNT AS (\nSELECT COUNT(*) AS sample_size FROM {core_sample}\n)\nSELECT s.sample_size AS sample_size, p.population_size AS population_size\nFROM {core_sample}_COUNT s\nINNER JOIN {population} p ON 1=1\nLIMIT 1",
            self.population_count_statement(relation)
        ))
    }
}

impl<A: StatementAdapter + ?Sized> StatementAdapter for &A {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn quote_style(&self) -> char {
        (**self).quote_style()
    }
    fn quoted_dot_notation(&self, relation: &Relation) -> String {
        (**self).quoted_dot_notation(relation)
    }
    fn scoped_cte(&self, relation: &Relation, prefix: &str) -> String {
        (**self).scoped_cte(relation, prefix)
    }
    fn literal(&self, value: &Value) -> String {
        (**self).literal(value)
    }
    fn sample_clause(&self, sample_method: &SampleMethod) -> Result<String> {
        (**self).sample_clause(sample_method)
    }
    fn population_count_statement(&self, relation: &Relation) -> String {
        (**self).population_count_statement(relation)
    }
    fn view_creation_statement(&self, relation: &Relation) -> Result<String> {
        (**self).view_creation_statement(relation)
    }
    fn unsampled_statement(&self, relation: &Relation) -> Result<String> {
        (**self).unsampled_statement(relation)
    }
    fn sample_statement_from_relation(
        &self,
        relation: &Relation,
        sample_method: Option<&SampleMethod>,
    ) -> Result<String> {
        (**self).sample_statement_from_relation(relation, sample_method)
    }
    fn upstream_constraint_statement(
        &self,
        other: &Relation,
        local_key: &str,
        remote_key: &str,
    ) -> Result<String> {
        (**self).upstream_constraint_statement(other, local_key, remote_key)
    }
    fn predicate_constraint_statement(
        &self,
        parent: &Relation,
        analyze: bool,
        local_key: &str,
        remote_key: &str,
    ) -> Result<String> {
        (**self).predicate_constraint_statement(parent, analyze, local_key, remote_key)
    }
    fn union_constraint_statement(
        &self,
        subject: &Relation,
        constraint: &Relation,
        subject_key: &str,
        constraint_key: &str,
        max_number_of_outliers: usize,
    ) -> Result<String> {
        (**self).union_constraint_statement(
            subject,
            constraint,
            subject_key,
            constraint_key,
            max_number_of_outliers,
        )
    }
    fn directionally_wrap_statement(
        &self,
        statement: &str,
        relation: &Relation,
        sample_method: Option<&SampleMethod>,
    ) -> Result<String> {
        (**self).directionally_wrap_statement(statement, relation, sample_method)
    }
    fn analyze_wrap_statement(&self, statement: &str, relation: &Relation) -> Result<String> {
        (**self).analyze_wrap_statement(statement, relation)
    }
}
