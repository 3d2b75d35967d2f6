//! The legacy strategy
//!
//! Every edge between the relation and a neighbor is read, parallel edges included.
//! Sampling of the filtered statement is suppressed when the last predecessor edge read is bidirectional.
//!

use super::{Constraints, Result};
use crate::{adapters::StatementAdapter, graph::DependencyGraph, relation::Relation};

pub fn constraints<A: StatementAdapter + ?Sized>(
    relation: &Relation,
    graph: &DependencyGraph,
    adapter: &A,
    analyze: bool,
) -> Result<Constraints> {
    let name = relation.name();
    let mut constraints = Constraints::new();
    for child in graph.successors(name)? {
        for edge in graph.edges_between(name, child.name())? {
            if edge.is_bidirectional() {
                constraints.push_predicate(adapter.upstream_constraint_statement(
                    child,
                    edge.remote_attribute(),
                    edge.local_attribute(),
                )?);
            }
            if relation.include_outliers() {
                constraints.push_union(adapter.union_constraint_statement(
                    relation,
                    child,
                    edge.remote_attribute(),
                    edge.local_attribute(),
                    relation.max_number_of_outliers(),
                )?);
            }
        }
    }
    for parent in graph.predecessors(name)? {
        for edge in graph.edges_between(parent.name(), name)? {
            // Last write wins
            constraints.set_do_not_sample(edge.is_bidirectional());
            constraints.push_predicate(adapter.predicate_constraint_statement(
                parent,
                analyze,
                edge.local_attribute(),
                edge.remote_attribute(),
            )?);
            if relation.include_outliers() {
                constraints.push_union(adapter.union_constraint_statement(
                    relation,
                    parent,
                    edge.local_attribute(),
                    edge.remote_attribute(),
                    relation.max_number_of_outliers(),
                )?);
            }
        }
    }
    Ok(constraints)
}
