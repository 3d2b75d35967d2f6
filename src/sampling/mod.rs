//! # Sampling strategies
//!
//! A [Sampling] is attached to every relation before compilation.
//! It holds the [SampleMethod] applied to the relation, and optionally a sample size estimator
//! used to size the method once the population of the relation is known.
//!

pub mod sample_size;

use serde::{Deserialize, Serialize};
use std::{error, fmt, result};

pub use sample_size::{CochransSampleSize, SampleSize};

// Error management

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    InvalidParameter(String),
    Other(String),
}

impl Error {
    pub fn invalid_parameter(desc: impl fmt::Display) -> Error {
        Error::InvalidParameter(format!("{}", desc))
    }
    pub fn other(desc: impl fmt::Display) -> Error {
        Error::Other(format!("{}", desc))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter(desc) => writeln!(f, "InvalidParameter: {}", desc),
            Error::Other(err) => writeln!(f, "{}", err),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

pub const DEFAULT_PERCENT: f64 = 10.0;
pub const DEFAULT_MIN_SAMPLE_SIZE: u64 = 1000;

/// The sampling algorithm
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    /// Row level sampling
    Bernoulli,
    /// Block level sampling
    System,
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleKind::Bernoulli => write!(f, "BERNOULLI"),
            SampleKind::System => write!(f, "SYSTEM"),
        }
    }
}

/// How much to sample
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// A fixed number of rows
    Rows(u64),
    /// A percentage of the rows, in (0, 100]
    Percent(f64),
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Rows(rows) => write!(f, "{rows} ROWS"),
            Units::Percent(percent) => write!(f, "{percent}"),
        }
    }
}

/// A sample method: an algorithm and an amount
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SampleMethodParameters", into = "SampleMethodParameters")]
pub struct SampleMethod {
    kind: SampleKind,
    units: Units,
}

impl SampleMethod {
    pub fn new(kind: SampleKind, units: Units) -> Result<Self> {
        match units {
            Units::Rows(0) => Err(Error::invalid_parameter(
                "A sample must contain at least 1 row",
            )),
            Units::Percent(percent) if !(percent > 0.0 && percent <= 100.0) => {
                Err(Error::invalid_parameter(format!(
                    "Sample percentage must be in (0, 100], is {percent}"
                )))
            }
            _ => Ok(SampleMethod { kind, units }),
        }
    }

    pub fn bernoulli_rows(rows: u64) -> Result<Self> {
        SampleMethod::new(SampleKind::Bernoulli, Units::Rows(rows))
    }

    pub fn bernoulli_percent(percent: f64) -> Result<Self> {
        SampleMethod::new(SampleKind::Bernoulli, Units::Percent(percent))
    }

    pub fn system_rows(rows: u64) -> Result<Self> {
        SampleMethod::new(SampleKind::System, Units::Rows(rows))
    }

    pub fn system_percent(percent: f64) -> Result<Self> {
        SampleMethod::new(SampleKind::System, Units::Percent(percent))
    }

    pub fn kind(&self) -> SampleKind {
        self.kind
    }

    pub fn units(&self) -> Units {
        self.units
    }
}

impl fmt::Display for SampleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.units)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SampleMethodParameters {
    pub kind: SampleKind,
    pub units: Units,
}

impl TryFrom<SampleMethodParameters> for SampleMethod {
    type Error = Error;

    fn try_from(value: SampleMethodParameters) -> Result<Self> {
        SampleMethod::new(value.kind, value.units)
    }
}

impl From<SampleMethod> for SampleMethodParameters {
    fn from(value: SampleMethod) -> Self {
        SampleMethodParameters {
            kind: value.kind,
            units: value.units,
        }
    }
}

/// The sampling of a relation
#[derive(Clone, Debug, PartialEq)]
pub struct Sampling {
    sample_method: SampleMethod,
    estimator: Option<CochransSampleSize>,
    min_sample_size: u64,
}

impl Sampling {
    /// A sampling always applying the same method
    pub fn fixed(sample_method: SampleMethod) -> Sampling {
        Sampling {
            sample_method,
            estimator: None,
            min_sample_size: 1,
        }
    }

    /// A sampling sized from the population once [Sampling::prepare] is called
    pub fn estimated(estimator: CochransSampleSize, min_sample_size: u64) -> Sampling {
        Sampling {
            sample_method: SampleMethod {
                kind: SampleKind::Bernoulli,
                units: Units::Percent(DEFAULT_PERCENT),
            },
            estimator: Some(estimator),
            min_sample_size: min_sample_size.max(1),
        }
    }

    pub fn sample_method(&self) -> &SampleMethod {
        &self.sample_method
    }

    pub fn estimator(&self) -> Option<&CochransSampleSize> {
        self.estimator.as_ref()
    }

    pub fn min_sample_size(&self) -> u64 {
        self.min_sample_size
    }

    /// Size the sample method from the population, when an estimator is set
    pub fn prepare(&mut self, population: u64) -> &SampleMethod {
        if let Some(estimator) = &self.estimator {
            let rows = estimator.size(population).max(self.min_sample_size);
            log::debug!("{estimator} sized a population of {population} to {rows} rows");
            self.sample_method = SampleMethod {
                kind: SampleKind::Bernoulli,
                units: Units::Rows(rows),
            };
        }
        &self.sample_method
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling::estimated(CochransSampleSize::default(), DEFAULT_MIN_SAMPLE_SIZE)
    }
}

impl From<SampleMethod> for Sampling {
    fn from(value: SampleMethod) -> Self {
        Sampling::fixed(value)
    }
}

impl fmt::Display for Sampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.estimator {
            Some(estimator) => write!(
                f,
                "{} sized by {} (min {})",
                self.sample_method, estimator, self.min_sample_size
            ),
            None => write!(f, "{}", self.sample_method),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_methods() {
        let method = SampleMethod::bernoulli_rows(1500).unwrap();
        println!("method = {method}");
        assert_eq!(method.to_string(), "BERNOULLI (1500 ROWS)");
        let method = SampleMethod::system_percent(12.5).unwrap();
        println!("method = {method}");
        assert_eq!(method.to_string(), "SYSTEM (12.5)");
        assert!(SampleMethod::bernoulli_rows(0).is_err());
        assert!(SampleMethod::bernoulli_percent(0.0).is_err());
        assert!(SampleMethod::bernoulli_percent(100.5).is_err());
        assert!(matches!(
            SampleMethod::system_percent(f64::NAN),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_prepare() {
        let mut sampling = Sampling::default();
        println!("sampling = {sampling}");
        assert_eq!(sampling.sample_method().units(), Units::Percent(DEFAULT_PERCENT));
        sampling.prepare(1_000_000);
        println!("sampling = {sampling}");
        assert_eq!(sampling.sample_method(), &SampleMethod::bernoulli_rows(4147).unwrap());
        // The minimum sample size wins over small estimates
        let mut sampling = Sampling::estimated(CochransSampleSize::new(0.05, 0.95).unwrap(), 1000);
        assert_eq!(sampling.prepare(10).units(), Units::Rows(1000));
        // A fixed sampling is left untouched
        let method = SampleMethod::system_percent(5.0).unwrap();
        let mut sampling = Sampling::fixed(method);
        assert_eq!(sampling.prepare(1_000_000), &method);
    }

    #[test]
    fn test_serde() {
        let method: SampleMethod =
            serde_json::from_str(r#"{"kind": "bernoulli", "units": {"rows": 1500}}"#).unwrap();
        assert_eq!(method, SampleMethod::bernoulli_rows(1500).unwrap());
        assert!(serde_json::from_str::<SampleMethod>(
            r#"{"kind": "system", "units": {"percent": 120.0}}"#
        )
        .is_err());
    }
}
