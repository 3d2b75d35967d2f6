//! This module defines the `Relation` struct
//! A `Relation` is a table or a view of the source database, the unit of sampling.
//! It carries the flags and the sampling driving the compilation of its statement,
//! and, once compiled, the statements themselves.
//!

pub mod attribute;
pub mod builder;
pub mod dataset;

use serde::{Deserialize, Serialize};
use std::{error, fmt, result};

use crate::sampling::Sampling;
pub use attribute::Attribute;
pub use builder::RelationBuilder;
pub use dataset::Dataset;

// Error management

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    InvalidRelation(String),
    InvalidName(String),
    Other(String),
}

impl Error {
    pub fn invalid_relation(relation: impl fmt::Display) -> Error {
        Error::InvalidRelation(format!("{} is invalid", relation))
    }
    pub fn invalid_name(name: impl fmt::Display) -> Error {
        Error::InvalidName(format!("{} is invalid", name))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRelation(desc) => writeln!(f, "InvalidRelation: {}", desc),
            Error::InvalidName(desc) => writeln!(f, "InvalidName: {}", desc),
            Error::Other(err) => writeln!(f, "{}", err),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

pub const DEFAULT_MAX_NUMBER_OF_OUTLIERS: usize = 2000;

/// The fully qualified name of a relation
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    database: String,
    schema: String,
    name: String,
}

impl QualifiedName {
    pub fn new<D: Into<String>, S: Into<String>, N: Into<String>>(
        database: D,
        schema: S,
        name: N,
    ) -> QualifiedName {
        QualifiedName {
            database: database.into(),
            schema: schema.into(),
            name: name.into(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path as a list of names
    pub fn path(&self) -> [&str; 3] {
        [&self.database, &self.schema, &self.name]
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.name)
    }
}

/// Parse `database.schema.name`
impl TryFrom<&str> for QualifiedName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.split('.').collect::<Vec<_>>().as_slice() {
            [database, schema, name]
                if !database.is_empty() && !schema.is_empty() && !name.is_empty() =>
            {
                Ok(QualifiedName::new(*database, *schema, *name))
            }
            _ => Err(Error::invalid_name(value)),
        }
    }
}

/// A table or a view to sample
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    name: QualifiedName,
    is_view: bool,
    unsampled: bool,
    include_outliers: bool,
    max_number_of_outliers: usize,
    sampling: Sampling,
    attributes: Vec<Attribute>,
    data: Option<Dataset>,
    core_query: Option<String>,
    compiled_query: Option<String>,
}

impl Relation {
    pub fn new(name: QualifiedName, attributes: Vec<Attribute>) -> Relation {
        Relation {
            name,
            is_view: false,
            unsampled: false,
            include_outliers: false,
            max_number_of_outliers: DEFAULT_MAX_NUMBER_OF_OUTLIERS,
            sampling: Sampling::default(),
            attributes,
            data: None,
            core_query: None,
            compiled_query: None,
        }
    }

    pub fn builder() -> RelationBuilder {
        RelationBuilder::new()
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn is_view(&self) -> bool {
        self.is_view
    }

    pub fn unsampled(&self) -> bool {
        self.unsampled
    }

    pub fn include_outliers(&self) -> bool {
        self.include_outliers
    }

    pub fn max_number_of_outliers(&self) -> usize {
        self.max_number_of_outliers
    }

    pub fn sampling(&self) -> &Sampling {
        &self.sampling
    }

    pub fn sampling_mut(&mut self) -> &mut Sampling {
        &mut self.sampling
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Lookup an attribute ignoring case
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name().eq_ignore_ascii_case(name))
    }

    /// The realized sample, if the relation has been materialized
    pub fn data(&self) -> Option<&Dataset> {
        self.data.as_ref()
    }

    pub fn core_query(&self) -> Option<&str> {
        self.core_query.as_deref()
    }

    pub fn compiled_query(&self) -> Option<&str> {
        self.compiled_query.as_deref()
    }

    pub fn set_is_view(&mut self, is_view: bool) {
        self.is_view = is_view;
    }

    pub fn set_unsampled(&mut self, unsampled: bool) {
        self.unsampled = unsampled;
    }

    pub fn set_include_outliers(&mut self, include_outliers: bool) {
        self.include_outliers = include_outliers;
    }

    pub fn set_max_number_of_outliers(&mut self, max_number_of_outliers: usize) {
        self.max_number_of_outliers = max_number_of_outliers;
    }

    pub fn set_sampling(&mut self, sampling: Sampling) {
        self.sampling = sampling;
    }

    pub fn set_data(&mut self, data: Option<Dataset>) {
        self.data = data;
    }

    /// A copy of the relation with both statements overwritten
    pub fn with_queries(self, core_query: String, compiled_query: String) -> Relation {
        Relation {
            core_query: Some(core_query),
            compiled_query: Some(compiled_query),
            ..self
        }
    }

    /// A copy of the relation with its realized sample
    pub fn with_data(self, data: Option<Dataset>) -> Relation {
        Relation { data, ..self }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_view { "VIEW" } else { "TABLE" };
        write!(f, "{kind} {} ({})", self.name, self.sampling)?;
        if self.unsampled {
            write!(f, " unsampled")?;
        }
        if self.include_outliers {
            write!(f, " with up to {} outliers", self.max_number_of_outliers)?;
        }
        Ok(())
    }
}
