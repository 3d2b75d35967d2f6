//! # Replicant
//! Sampled, referentially consistent replicas of relational databases
//!
//! ## What is Replicant?
//! Replicant compiles, for each relation of a source database, the SQL statement extracting a
//! sample of it, such that the samples of related relations remain consistent with each other.
//!
//! ### Dependency graph
//! Relations are the nodes of a [DependencyGraph]. An edge from a parent to a child states that
//! a column of the child references a column of the parent. Directional edges restrict the child
//! to the keys realized in the sample of the parent, bidirectional edges also restrict the parent
//! to the keys present in the child.
//!
//! ### Compilation
//! The [Compiler] turns a relation and its direct neighbors into a statement, using a
//! [StatementAdapter] for the SQL dialect of the source (Snowflake and PostgreSQL are provided).
//!
//! ### Sample sizes
//! Unless fixed, the number of rows sampled is given by Cochran's formula for a margin of error
//! and a confidence level.
//!

pub mod adapters;
pub mod builder;
pub mod compiler;
pub mod data_type;
pub mod display;
pub mod encoder;
pub mod graph;
pub mod namer;
pub mod relation;
pub mod replica;
pub mod sampling;
pub mod setup;

pub use adapters::{PostgresAdapter, SnowflakeAdapter, StatementAdapter};
pub use builder::{Ready, With, WithIterator};
pub use compiler::{Compiler, Strategy};
pub use data_type::{value::Value, DataType};
pub use graph::{DependencyGraph, Direction, Edge};
pub use relation::{Dataset, QualifiedName, Relation};
pub use replica::{Config, Materializer, Replica};
pub use sampling::{sample_size::CochransSampleSize, SampleMethod, Sampling};
/// Expose sqlparser::ast as part of replicant
pub use sqlparser::ast;
