//! The replica configuration, read from JSON
//!
//! ```json
//! {
//!     "compile_method": "updated",
//!     "analyze": false,
//!     "sampling": {"margin_of_error": 0.05, "confidence": 0.95, "min_sample_size": 100},
//!     "include_outliers": true,
//!     "specified_relations": [
//!         {"database": "SNOWYDB", "schema": ".*", "relation": "USER_.*", "unsampled": true}
//!     ]
//! }
//! ```
//!

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::io;

use super::{Error, Result};
use crate::{
    compiler::Strategy,
    graph::DependencyGraph,
    relation::{QualifiedName, Relation, DEFAULT_MAX_NUMBER_OF_OUTLIERS},
    sampling::{
        sample_size::CochransSampleSize, SampleMethod, Sampling, DEFAULT_MIN_SAMPLE_SIZE,
    },
};

/// The parameters of an estimated sampling
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub margin_of_error: f64,
    pub confidence: f64,
    pub min_sample_size: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        let estimator = CochransSampleSize::default();
        SamplingConfig {
            margin_of_error: estimator.margin_of_error(),
            confidence: estimator.confidence(),
            min_sample_size: DEFAULT_MIN_SAMPLE_SIZE,
        }
    }
}

impl TryFrom<SamplingConfig> for Sampling {
    type Error = Error;

    fn try_from(value: SamplingConfig) -> Result<Self> {
        Ok(Sampling::estimated(
            CochransSampleSize::new(value.margin_of_error, value.confidence)?,
            value.min_sample_size,
        ))
    }
}

/// Overrides for the relations matching all three patterns
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecifiedRelation {
    pub database: String,
    pub schema: String,
    pub relation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsampled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_outliers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_number_of_outliers: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingConfig>,
    /// A fixed sample method, takes precedence over `sampling`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_method: Option<SampleMethod>,
}

impl SpecifiedRelation {
    pub fn new<D: Into<String>, S: Into<String>, R: Into<String>>(
        database: D,
        schema: S,
        relation: R,
    ) -> Self {
        SpecifiedRelation {
            database: database.into(),
            schema: schema.into(),
            relation: relation.into(),
            unsampled: None,
            include_outliers: None,
            max_number_of_outliers: None,
            sampling: None,
            sample_method: None,
        }
    }

    fn pattern(&self) -> Result<Pattern> {
        Ok(Pattern {
            database: anchored(&self.database)?,
            schema: anchored(&self.schema)?,
            relation: anchored(&self.relation)?,
        })
    }

    fn apply(&self, relation: &mut Relation) -> Result<()> {
        if let Some(unsampled) = self.unsampled {
            relation.set_unsampled(unsampled);
        }
        if let Some(include_outliers) = self.include_outliers {
            relation.set_include_outliers(include_outliers);
        }
        if let Some(max_number_of_outliers) = self.max_number_of_outliers {
            relation.set_max_number_of_outliers(max_number_of_outliers);
        }
        if let Some(sample_method) = self.sample_method {
            relation.set_sampling(Sampling::fixed(sample_method));
        } else if let Some(sampling) = self.sampling {
            relation.set_sampling(sampling.try_into()?);
        }
        Ok(())
    }
}

/// Case insensitive, matching whole names only
fn anchored(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(true)
        .build()?)
}

struct Pattern {
    database: Regex,
    schema: Regex,
    relation: Regex,
}

impl Pattern {
    fn is_match(&self, name: &QualifiedName) -> bool {
        self.database.is_match(name.database())
            && self.schema.is_match(name.schema())
            && self.relation.is_match(name.name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `legacy` or `updated`
    pub compile_method: String,
    pub analyze: bool,
    pub sampling: SamplingConfig,
    pub include_outliers: bool,
    pub max_number_of_outliers: usize,
    pub specified_relations: Vec<SpecifiedRelation>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            compile_method: Strategy::default().to_string(),
            analyze: false,
            sampling: SamplingConfig::default(),
            include_outliers: false,
            max_number_of_outliers: DEFAULT_MAX_NUMBER_OF_OUTLIERS,
            specified_relations: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn strategy(&self) -> Result<Strategy> {
        Ok(self.compile_method.parse()?)
    }

    pub fn default_sampling(&self) -> Result<Sampling> {
        self.sampling.try_into()
    }

    /// Set the defaults on every relation of the graph, then the overrides of matching
    /// specified relations, later entries overriding earlier ones
    pub fn apply(&self, graph: &mut DependencyGraph) -> Result<()> {
        let sampling = self.default_sampling()?;
        let specified: Vec<(Pattern, &SpecifiedRelation)> = self
            .specified_relations
            .iter()
            .map(|specified| Ok((specified.pattern()?, specified)))
            .collect::<Result<_>>()?;
        for relation in graph.relations_mut() {
            relation.set_include_outliers(self.include_outliers);
            relation.set_max_number_of_outliers(self.max_number_of_outliers);
            relation.set_sampling(sampling.clone());
            for (pattern, specified) in &specified {
                if pattern.is_match(relation.name()) {
                    log::debug!("{} matches {}", relation.name(), specified.relation);
                    specified.apply(relation)?;
                }
            }
        }
        Ok(())
    }
}
