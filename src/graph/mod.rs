//! # The dependency graph of relations
//!
//! A directed graph whose nodes are [Relation]s and whose edges carry the attributes linking
//! a parent relation to a child relation.
//! Nodes and edges are kept in insertion order, and parallel edges are stored as such:
//! it is up to the reader to decide how to deal with them.
//!

pub mod dot;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, HashMap},
    error, fmt, result,
    str::FromStr,
};

use crate::relation::{QualifiedName, Relation};

// Error management

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    UnknownRelation(String),
    DuplicateRelation(String),
    InvalidDirection(String),
    Cycle(String),
    Other(String),
}

impl Error {
    pub fn unknown_relation(relation: impl fmt::Display) -> Error {
        Error::UnknownRelation(format!("{} is not in the graph", relation))
    }
    pub fn duplicate_relation(relation: impl fmt::Display) -> Error {
        Error::DuplicateRelation(format!("{} is already in the graph", relation))
    }
    pub fn invalid_direction(direction: impl fmt::Display) -> Error {
        Error::InvalidDirection(format!(
            "{} is not a direction, expected directional or bidirectional",
            direction
        ))
    }
    pub fn cycle<I: IntoIterator<Item = T>, T: fmt::Display>(relations: I) -> Error {
        Error::Cycle(format!(
            "The relations {} depend on each other",
            relations.into_iter().join(", ")
        ))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownRelation(desc) => writeln!(f, "UnknownRelation: {}", desc),
            Error::DuplicateRelation(desc) => writeln!(f, "DuplicateRelation: {}", desc),
            Error::InvalidDirection(desc) => writeln!(f, "InvalidDirection: {}", desc),
            Error::Cycle(desc) => writeln!(f, "Cycle: {}", desc),
            Error::Other(err) => writeln!(f, "{}", err),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

/// How two relations constrain each other
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The child is restricted to the values already realized in the parent
    Directional,
    /// Parent and child restrict each other (close to a 1:1 relationship)
    Bidirectional,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "directional" => Ok(Direction::Directional),
            "bidirectional" => Ok(Direction::Bidirectional),
            _ => Err(Error::invalid_direction(s)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Directional => write!(f, "directional"),
            Direction::Bidirectional => write!(f, "bidirectional"),
        }
    }
}

/// The metadata of an edge from a parent to a child.
/// `remote_attribute` is the column of the parent, `local_attribute` the column of the child.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    direction: Direction,
    local_attribute: String,
    remote_attribute: String,
}

impl Edge {
    pub fn new<L: Into<String>, R: Into<String>>(
        direction: Direction,
        local_attribute: L,
        remote_attribute: R,
    ) -> Edge {
        Edge {
            direction,
            local_attribute: local_attribute.into(),
            remote_attribute: remote_attribute.into(),
        }
    }

    pub fn directional<L: Into<String>, R: Into<String>>(local_attribute: L, remote_attribute: R) -> Edge {
        Edge::new(Direction::Directional, local_attribute, remote_attribute)
    }

    pub fn bidirectional<L: Into<String>, R: Into<String>>(local_attribute: L, remote_attribute: R) -> Edge {
        Edge::new(Direction::Bidirectional, local_attribute, remote_attribute)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_bidirectional(&self) -> bool {
        self.direction == Direction::Bidirectional
    }

    pub fn local_attribute(&self) -> &str {
        &self.local_attribute
    }

    pub fn remote_attribute(&self) -> &str {
        &self.remote_attribute
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.remote_attribute, self.local_attribute, self.direction
        )
    }
}

/// A directed multigraph of relations
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    relations: Vec<Relation>,
    index: HashMap<QualifiedName, usize>,
    /// (parent, child, edge) by insertion order
    edges: Vec<(usize, usize, Edge)>,
}

impl DependencyGraph {
    pub fn new() -> DependencyGraph {
        DependencyGraph::default()
    }

    /// Add a relation, relations are unique by name
    pub fn add_relation(&mut self, relation: Relation) -> Result<()> {
        if self.index.contains_key(relation.name()) {
            return Err(Error::duplicate_relation(relation.name()));
        }
        self.index
            .insert(relation.name().clone(), self.relations.len());
        self.relations.push(relation);
        Ok(())
    }

    /// Add an edge from `parent` to `child`, parallel edges are kept
    pub fn add_edge(&mut self, parent: &QualifiedName, child: &QualifiedName, edge: Edge) -> Result<()> {
        let parent = self.position(parent)?;
        let child = self.position(child)?;
        self.edges.push((parent, child, edge));
        Ok(())
    }

    fn position(&self, name: &QualifiedName) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::unknown_relation(name))
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.index.contains_key(name)
    }

    pub fn relation(&self, name: &QualifiedName) -> Result<&Relation> {
        Ok(&self.relations[self.position(name)?])
    }

    pub fn relation_mut(&mut self, name: &QualifiedName) -> Result<&mut Relation> {
        let position = self.position(name)?;
        Ok(&mut self.relations[position])
    }

    /// Replace the relation with the same name
    pub fn replace(&mut self, relation: Relation) -> Result<Relation> {
        let position = self.position(relation.name())?;
        Ok(std::mem::replace(&mut self.relations[position], relation))
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter()
    }

    pub fn relations_mut(&mut self) -> impl Iterator<Item = &mut Relation> {
        self.relations.iter_mut()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Relation, &Relation, &Edge)> {
        self.edges
            .iter()
            .map(|(parent, child, edge)| (&self.relations[*parent], &self.relations[*child], edge))
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// The distinct children of a relation, in the order of their first edge
    pub fn successors(&self, name: &QualifiedName) -> Result<Vec<&Relation>> {
        let position = self.position(name)?;
        Ok(self
            .edges
            .iter()
            .filter(|(parent, _, _)| *parent == position)
            .map(|(_, child, _)| *child)
            .unique()
            .map(|child| &self.relations[child])
            .collect())
    }

    /// The distinct parents of a relation, in the order of their first edge
    pub fn predecessors(&self, name: &QualifiedName) -> Result<Vec<&Relation>> {
        let position = self.position(name)?;
        Ok(self
            .edges
            .iter()
            .filter(|(_, child, _)| *child == position)
            .map(|(parent, _, _)| *parent)
            .unique()
            .map(|parent| &self.relations[parent])
            .collect())
    }

    /// All the edges from `parent` to `child`, in insertion order
    pub fn edges_between(&self, parent: &QualifiedName, child: &QualifiedName) -> Result<Vec<&Edge>> {
        let parent = self.position(parent)?;
        let child = self.position(child)?;
        Ok(self
            .edges
            .iter()
            .filter(|(p, c, _)| *p == parent && *c == child)
            .map(|(_, _, edge)| edge)
            .collect())
    }

    /// The first edge from `parent` to `child`
    pub fn edge(&self, parent: &QualifiedName, child: &QualifiedName) -> Result<Option<&Edge>> {
        Ok(self.edges_between(parent, child)?.into_iter().next())
    }

    /// Order relations so that every parent comes before its children.
    /// Ties are broken by insertion order.
    pub fn topological_order(&self) -> Result<Vec<QualifiedName>> {
        let mut in_degrees = vec![0usize; self.relations.len()];
        for (_, child, _) in &self.edges {
            in_degrees[*child] += 1;
        }
        let mut ready: BTreeSet<usize> = in_degrees
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(position, _)| position)
            .collect();
        let mut order = Vec::with_capacity(self.relations.len());
        while let Some(position) = ready.pop_first() {
            order.push(position);
            for (_, child, _) in self.edges.iter().filter(|(parent, _, _)| *parent == position) {
                in_degrees[*child] -= 1;
                if in_degrees[*child] == 0 {
                    ready.insert(*child);
                }
            }
        }
        if order.len() < self.relations.len() {
            return Err(Error::cycle(
                in_degrees
                    .iter()
                    .enumerate()
                    .filter(|(_, degree)| **degree > 0)
                    .map(|(position, _)| self.relations[position].name()),
            ));
        }
        Ok(order
            .into_iter()
            .map(|position| self.relations[position].name().clone())
            .collect())
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} relations, {} edges", self.relations.len(), self.edges.len())?;
        for (parent, child, edge) in self.edges() {
            writeln!(f, "{} -> {}: {}", parent.name(), child.name(), edge)?;
        }
        Ok(())
    }
}
