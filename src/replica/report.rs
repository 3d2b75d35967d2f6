//! A summary of the sizes of the samples of a replica
//!

use colored::{ColoredString, Colorize};
use std::fmt;

use crate::relation::QualifiedName;

/// The sizes of the sample of a relation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub relation: QualifiedName,
    pub population_size: u64,
    pub sample_size: u64,
}

impl ReportRow {
    /// The share of the population sampled, in percent
    pub fn coverage(&self) -> f64 {
        if self.population_size == 0 {
            0.0
        } else {
            100.0 * self.sample_size as f64 / self.population_size as f64
        }
    }

    fn colored_coverage(&self, width: usize) -> ColoredString {
        let coverage = format!("{:>width$.2} %", self.coverage());
        if self.sample_size == 0 {
            coverage.red()
        } else if self.coverage() < 1.0 {
            coverage.yellow()
        } else {
            coverage.green()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyzeReport {
    rows: Vec<ReportRow>,
}

impl AnalyzeReport {
    pub fn new() -> Self {
        AnalyzeReport::default()
    }

    pub fn push(&mut self, relation: QualifiedName, population_size: u64, sample_size: u64) {
        self.rows.push(ReportRow {
            relation,
            population_size,
            sample_size,
        });
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn row(&self, relation: &QualifiedName) -> Option<&ReportRow> {
        self.rows.iter().find(|row| &row.relation == relation)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_sample_size(&self) -> u64 {
        self.rows.iter().map(|row| row.sample_size).sum()
    }
}

const RELATION: &str = "RELATION";
const POPULATION: &str = "POPULATION";
const SAMPLE: &str = "SAMPLE";
const COVERAGE: &str = "COVERAGE";

impl fmt::Display for AnalyzeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.rows.iter().map(|row| row.relation.to_string()).collect();
        let name_width = names.iter().map(String::len).chain([RELATION.len()]).max().unwrap_or(0);
        let population_width = self
            .rows
            .iter()
            .map(|row| row.population_size.to_string().len())
            .chain([POPULATION.len()])
            .max()
            .unwrap_or(0);
        let sample_width = self
            .rows
            .iter()
            .map(|row| row.sample_size.to_string().len())
            .chain([SAMPLE.len()])
            .max()
            .unwrap_or(0);
        writeln!(
            f,
            "{}",
            format!(
                "{RELATION:<name_width$}  {POPULATION:>population_width$}  {SAMPLE:>sample_width$}  {COVERAGE:>10}"
            )
            .bold()
        )?;
        for (name, row) in names.iter().zip(&self.rows) {
            writeln!(
                f,
                "{name:<name_width$}  {:>population_width$}  {:>sample_width$}  {}",
                row.population_size,
                row.sample_size,
                row.colored_coverage(8),
            )?;
        }
        Ok(())
    }
}
