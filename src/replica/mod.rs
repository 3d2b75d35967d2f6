//! # Building a replica
//!
//! A [Replica] compiles the relations of a [DependencyGraph] parents first and hands every
//! compiled relation to a [Materializer], which runs it against the source and returns the
//! realized sample. Realized samples are stored on the relations so that their children
//! can be restricted to the keys actually sampled.
//!

pub mod config;
pub mod report;

use std::{error, fmt, io, result};

use crate::{
    adapters::StatementAdapter,
    compiler::{self, Compiler},
    graph::{self, DependencyGraph},
    relation::{Dataset, Relation},
    sampling,
};
pub use config::Config;
pub use report::AnalyzeReport;

// Error management

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Config(String),
    Materialization(String),
    Compiler(compiler::Error),
    Graph(graph::Error),
    Other(String),
}

impl Error {
    pub fn config(desc: impl fmt::Display) -> Error {
        Error::Config(format!("{}", desc))
    }
    pub fn materialization(relation: impl fmt::Display, desc: impl fmt::Display) -> Error {
        Error::Materialization(format!("{} could not be materialized: {}", relation, desc))
    }
    pub fn other(desc: impl fmt::Display) -> Error {
        Error::Other(format!("{}", desc))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(desc) => writeln!(f, "Config: {}", desc),
            Error::Materialization(desc) => writeln!(f, "Materialization: {}", desc),
            Error::Compiler(err) => writeln!(f, "Compiler: {}", err),
            Error::Graph(err) => writeln!(f, "Graph: {}", err),
            Error::Other(err) => writeln!(f, "{}", err),
        }
    }
}

impl error::Error for Error {}

impl From<compiler::Error> for Error {
    fn from(err: compiler::Error) -> Self {
        Error::Compiler(err)
    }
}
impl From<graph::Error> for Error {
    fn from(err: graph::Error) -> Self {
        Error::Graph(err)
    }
}
impl From<sampling::Error> for Error {
    fn from(err: sampling::Error) -> Self {
        Error::Config(err.to_string())
    }
}
impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Config(err.to_string())
    }
}
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Runs statements against the source database
pub trait Materializer {
    /// The number of rows of the relation in the source
    fn population(&mut self, relation: &Relation) -> Result<u64>;
    /// Run the compiled query of the relation.
    /// When analyzing, the dataset holds `sample_size` and `population_size`.
    fn materialize(&mut self, relation: &Relation) -> Result<Option<Dataset>>;
}

/// Compiles and materializes the relations of a graph
#[derive(Clone, Debug)]
pub struct Replica<A> {
    compiler: Compiler,
    adapter: A,
    analyze: bool,
}

impl<A: StatementAdapter> Replica<A> {
    pub fn new(compiler: Compiler, adapter: A, analyze: bool) -> Self {
        Replica {
            compiler,
            adapter,
            analyze,
        }
    }

    pub fn from_config(config: &Config, adapter: A) -> Result<Self> {
        Ok(Replica::new(
            Compiler::new(config.strategy()?),
            adapter,
            config.analyze,
        ))
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn analyze(&self) -> bool {
        self.analyze
    }

    /// Compile and materialize every relation, parents before children
    pub fn build<M: Materializer>(
        &self,
        graph: &mut DependencyGraph,
        materializer: &mut M,
    ) -> Result<AnalyzeReport> {
        let mut report = AnalyzeReport::new();
        for name in graph.topological_order()? {
            let mut relation = graph.relation(&name)?.clone();
            let population = materializer.population(&relation)?;
            if !relation.is_view() && !relation.unsampled() {
                relation.sampling_mut().prepare(population);
            }
            log::info!(
                "Compiling {name} ({population} rows) sampled by {}",
                relation.sampling().sample_method()
            );
            let relation = self
                .compiler
                .compile(&relation, graph, &self.adapter, self.analyze)?;
            let data = materializer.materialize(&relation)?;
            let relation = if self.analyze {
                let data = data.ok_or_else(|| {
                    Error::materialization(&name, "the analysis returned no row")
                })?;
                let sample_size = count(&name, &data, "sample_size")?;
                let population_size = count(&name, &data, "population_size")?;
                log::info!("{name} sampled {sample_size} of {population_size} rows");
                report.push(name.clone(), population_size, sample_size);
                relation
            } else {
                let sample_size = data.as_ref().map_or(0, Dataset::len) as u64;
                log::info!("{name} realized {sample_size} rows");
                report.push(name.clone(), population, sample_size);
                relation.with_data(data)
            };
            graph.replace(relation)?;
        }
        Ok(report)
    }
}

/// The first integer of a column of an analysis result
fn count(name: impl fmt::Display, data: &Dataset, column: &str) -> Result<u64> {
    let value = data
        .column(column)
        .and_then(|values| values.first())
        .ok_or_else(|| Error::materialization(&name, format!("{column} is missing")))?;
    match value {
        crate::data_type::Value::Integer(count) if *count >= 0 => Ok(*count as u64),
        value => Err(Error::materialization(
            &name,
            format!("{column} is not a count: {value}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::{PostgresAdapter, SnowflakeAdapter},
        builder::{Ready, With},
        compiler::Strategy,
        data_type::DataType,
        graph::Edge,
        relation::QualifiedName,
        sampling::{SampleKind, Units},
    };
    use std::collections::HashMap;

    /// Serves fixed populations and samples, records the queries it runs
    #[derive(Default)]
    struct InMemory {
        populations: HashMap<QualifiedName, u64>,
        samples: HashMap<QualifiedName, Dataset>,
        queries: Vec<(QualifiedName, String)>,
    }

    impl Materializer for InMemory {
        fn population(&mut self, relation: &Relation) -> Result<u64> {
            Ok(self.populations.get(relation.name()).copied().unwrap_or(0))
        }

        fn materialize(&mut self, relation: &Relation) -> Result<Option<Dataset>> {
            let query = relation
                .compiled_query()
                .ok_or_else(|| Error::materialization(relation.name(), "not compiled"))?;
            self.queries
                .push((relation.name().clone(), query.to_string()));
            Ok(self.samples.get(relation.name()).cloned())
        }
    }

    fn qualified(name: &str) -> QualifiedName {
        QualifiedName::new("DB", "PUBLIC", name)
    }

    fn graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        // Children are inserted first
        for name in ["ORDERS", "USERS"] {
            graph
                .add_relation(
                    Relation::builder()
                        .qualified_name(qualified(name))
                        .with(("ID", DataType::Integer))
                        .build(),
                )
                .unwrap();
        }
        graph
            .add_edge(
                &qualified("USERS"),
                &qualified("ORDERS"),
                Edge::directional("USER_ID", "ID"),
            )
            .unwrap();
        graph
    }

    #[test]
    fn test_build() {
        crate::setup::try_init_with_level(log::LevelFilter::Debug).ok();
        let mut graph = graph();
        let mut materializer = InMemory::default();
        materializer.populations.insert(qualified("USERS"), 10_000);
        materializer.populations.insert(qualified("ORDERS"), 50_000);
        materializer
            .samples
            .insert(qualified("USERS"), Dataset::new().with_column("ID", [4, 8, 15]));
        materializer.samples.insert(
            qualified("ORDERS"),
            Dataset::new()
                .with_column("ID", [1, 2])
                .with_column("USER_ID", [4, 8]),
        );
        let replica = Replica::new(Compiler::default(), SnowflakeAdapter, false);
        let report = replica.build(&mut graph, &mut materializer).unwrap();
        println!("{report}");
        // Parents first
        assert_eq!(materializer.queries[0].0, qualified("USERS"));
        assert_eq!(materializer.queries[1].0, qualified("ORDERS"));
        assert!(materializer.queries[1].1.contains("USER_ID IN (4,8,15)"));
        let users = graph.relation(&qualified("USERS")).unwrap();
        assert_eq!(users.data().unwrap().len(), 3);
        assert_eq!(
            users.sampling().sample_method().units(),
            Units::Rows(4147)
        );
        assert_eq!(users.sampling().sample_method().kind(), SampleKind::Bernoulli);
        assert_eq!(report.row(&qualified("ORDERS")).unwrap().sample_size, 2);
        assert_eq!(
            report.row(&qualified("USERS")).unwrap().population_size,
            10_000
        );
    }

    #[test]
    fn test_build_analyze() {
        let mut graph = graph();
        let mut materializer = InMemory::default();
        for (name, sample_size, population_size) in [("USERS", 4147, 10_000), ("ORDERS", 3900, 50_000)] {
            materializer.samples.insert(
                qualified(name),
                Dataset::new()
                    .with_column("SAMPLE_SIZE", [sample_size])
                    .with_column("POPULATION_SIZE", [population_size]),
            );
        }
        let config = Config::from_json(r#"{"compile_method": "updated", "analyze": true}"#).unwrap();
        let replica = Replica::from_config(&config, SnowflakeAdapter).unwrap();
        assert_eq!(replica.compiler().strategy(), Strategy::Updated);
        let report = replica.build(&mut graph, &mut materializer).unwrap();
        println!("{report}");
        assert!(materializer.queries[1]
            .1
            .contains(r#"USER_ID IN (SELECT ID AS USER_ID FROM "DB"."PUBLIC"."USERS")"#));
        assert!(materializer.queries.iter().all(|(_, query)| query.contains("population_size")));
        assert_eq!(report.row(&qualified("ORDERS")).unwrap().population_size, 50_000);
        assert_eq!(report.row(&qualified("USERS")).unwrap().sample_size, 4147);
        // Nothing is realized when analyzing
        assert!(graph.relations().all(|relation| relation.data().is_none()));
    }

    #[test]
    fn test_build_postgres_with_default_config() {
        let mut graph = graph();
        let config = Config::default();
        config.apply(&mut graph).unwrap();
        let mut materializer = InMemory::default();
        for name in ["USERS", "ORDERS"] {
            materializer.populations.insert(qualified(name), 1_000_000);
        }
        materializer
            .samples
            .insert(qualified("USERS"), Dataset::new().with_column("ID", [4, 8, 15]));
        let replica = Replica::from_config(&config, PostgresAdapter).unwrap();
        let report = replica.build(&mut graph, &mut materializer).unwrap();
        println!("{report}");
        assert_eq!(
            materializer.queries[0].1,
            r#"SELECT * FROM "PUBLIC"."USERS" ORDER BY RANDOM() LIMIT 4147"#
        );
        assert!(materializer.queries[1].1.contains("USER_ID IN (4,8,15)"));
        assert!(materializer.queries[1].1.contains("ORDER BY RANDOM() LIMIT 4147"));
        assert_eq!(report.row(&qualified("USERS")).unwrap().sample_size, 3);
    }

    #[test]
    fn test_build_errors() {
        let mut materializer = InMemory::default();
        let replica = Replica::new(Compiler::default(), SnowflakeAdapter, true);
        assert!(matches!(
            replica.build(&mut graph(), &mut materializer),
            Err(Error::Materialization(_))
        ));
        let mut cyclic = graph();
        cyclic
            .add_edge(
                &qualified("ORDERS"),
                &qualified("USERS"),
                Edge::directional("ID", "LAST_ORDER_ID"),
            )
            .unwrap();
        assert!(matches!(
            replica.build(&mut cyclic, &mut materializer),
            Err(Error::Graph(graph::Error::Cycle(_)))
        ));
    }
}
