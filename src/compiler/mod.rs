//! # Compilation of the sampling statement of a relation
//!
//! The [Compiler] reads the direct neighbors of a relation in the [DependencyGraph] and
//! asks a [StatementAdapter] for the fragments constraining its sample:
//!     - predicates restricting keys to those of neighbors
//!     - unions adding a bounded number of outliers
//!
//! Two strategies are offered, differing in how edges are read (see [legacy] and [updated]).
//! Compilation reads the graph only and returns an updated copy of the relation.
//!

pub mod legacy;
pub mod updated;

use serde::{Deserialize, Serialize};
use std::{error, fmt, result, str::FromStr};

use crate::{
    adapters::{self, StatementAdapter},
    graph::{self, DependencyGraph},
    relation::Relation,
};

// Error management

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    InvalidConfiguration(String),
    Adapter(adapters::Error),
    Graph(graph::Error),
    Other(String),
}

impl Error {
    pub fn invalid_configuration(desc: impl fmt::Display) -> Error {
        Error::InvalidConfiguration(format!("{} is not a valid configuration", desc))
    }
    pub fn other(desc: impl fmt::Display) -> Error {
        Error::Other(format!("{}", desc))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfiguration(desc) => writeln!(f, "InvalidConfiguration: {}", desc),
            Error::Adapter(err) => writeln!(f, "Adapter: {}", err),
            Error::Graph(err) => writeln!(f, "Graph: {}", err),
            Error::Other(err) => writeln!(f, "{}", err),
        }
    }
}

impl error::Error for Error {}

impl From<adapters::Error> for Error {
    fn from(err: adapters::Error) -> Self {
        Error::Adapter(err)
    }
}

impl From<graph::Error> for Error {
    fn from(err: graph::Error) -> Self {
        Error::Graph(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// The way edges are read
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Every parallel edge, sampling suppressed by the last predecessor edge
    #[default]
    Legacy,
    /// The first edge of each pair, sampling always re-applied
    Updated,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "legacy" => Ok(Strategy::Legacy),
            "updated" => Ok(Strategy::Updated),
            _ => Err(Error::invalid_configuration(format!("compile method {s:?}"))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Legacy => write!(f, "legacy"),
            Strategy::Updated => write!(f, "updated"),
        }
    }
}

/// The fragments collected from the neighbors of a relation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Constraints {
    predicates: Vec<String>,
    unions: Vec<String>,
    do_not_sample: bool,
}

impl Constraints {
    pub fn new() -> Self {
        Constraints::default()
    }

    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    pub fn unions(&self) -> &[String] {
        &self.unions
    }

    pub fn do_not_sample(&self) -> bool {
        self.do_not_sample
    }

    pub fn push_predicate(&mut self, predicate: String) {
        log::debug!("predicate: {predicate}");
        self.predicates.push(predicate);
    }

    pub fn push_union(&mut self, union: String) {
        log::debug!("union: {union}");
        self.unions.push(union);
    }

    pub fn set_do_not_sample(&mut self, do_not_sample: bool) {
        self.do_not_sample = do_not_sample;
    }

    /// The sampling statement of the relation under these constraints
    pub fn assemble<A: StatementAdapter + ?Sized>(
        &self,
        relation: &Relation,
        adapter: &A,
    ) -> adapters::Result<String> {
        let sample_method = relation.sampling().sample_method();
        let mut query = adapter.sample_statement_from_relation(
            relation,
            if self.predicates.is_empty() {
                Some(sample_method)
            } else {
                None
            },
        )?;
        if !self.predicates.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.predicates.join(" AND "));
            query = adapter.directionally_wrap_statement(
                &query,
                relation,
                if self.do_not_sample {
                    None
                } else {
                    Some(sample_method)
                },
            )?;
        }
        for union in &self.unions {
            query.push_str(" UNION ");
            query.push_str(union);
        }
        Ok(query)
    }
}

/// Compiles relations with a given [Strategy]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Compiler {
    strategy: Strategy,
}

impl Compiler {
    pub fn new(strategy: Strategy) -> Self {
        Compiler { strategy }
    }

    /// A compiler from a strategy name, `legacy` or `updated`
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Compiler::new(name.parse()?))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// A copy of `relation` with its core and compiled queries set
    pub fn compile<A: StatementAdapter + ?Sized>(
        &self,
        relation: &Relation,
        graph: &DependencyGraph,
        adapter: &A,
        analyze: bool,
    ) -> Result<Relation> {
        log::debug!(
            "Compiling {} with the {} strategy for {}",
            relation.name(),
            self.strategy,
            adapter.name()
        );
        if relation.is_view() {
            let core_query = adapter.view_creation_statement(relation)?;
            let compiled_query = adapter.view_creation_statement(relation)?;
            return Ok(relation.clone().with_queries(core_query, compiled_query));
        }
        let core_query = if relation.unsampled() {
            adapter.unsampled_statement(relation)?
        } else {
            let constraints = match self.strategy {
                Strategy::Legacy => legacy::constraints(relation, graph, adapter, analyze)?,
                Strategy::Updated => updated::constraints(relation, graph, adapter, analyze)?,
            };
            constraints.assemble(relation, adapter)?
        };
        let compiled_query = if analyze {
            adapter.analyze_wrap_statement(&core_query, relation)?
        } else {
            core_query.clone()
        };
        Ok(relation.clone().with_queries(core_query, compiled_query))
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compiler({})", self.strategy)
    }
}
