//! # Sample size estimation
//!
//! Cochran's formula for the minimum sample size of a large population.
//!

use serde::{Deserialize, Serialize};
use statrs::function::erf::erf_inv;
use std::{f64::consts::SQRT_2, fmt, ops::RangeInclusive};

use super::{Error, Result};

const MARGIN_OF_ERROR_RANGE: RangeInclusive<f64> = 0.01..=0.1;
const CONFIDENCE_RANGE: RangeInclusive<f64> = 0.01..=0.99;
/// The proportion maximizing the variance of a Bernoulli variable
const PROBABILITY: f64 = 0.5;

/// A way to compute a sample size from a population size
pub trait SampleSize {
    fn size(&self, population: u64) -> u64;
}

/// Cochran's sample size for a margin of error and a confidence level
///
/// The population size is not used: no finite-population correction is applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CochransParameters", into = "CochransParameters")]
pub struct CochransSampleSize {
    margin_of_error: f64,
    confidence: f64,
}

impl CochransSampleSize {
    /// `margin_of_error` must be in [0.01, 0.1] and `confidence` in [0.01, 0.99]
    pub fn new(margin_of_error: f64, confidence: f64) -> Result<Self> {
        if !MARGIN_OF_ERROR_RANGE.contains(&margin_of_error) {
            return Err(Error::invalid_parameter(format!(
                "Margin of error must be between {} and {}, is {margin_of_error}",
                MARGIN_OF_ERROR_RANGE.start(),
                MARGIN_OF_ERROR_RANGE.end()
            )));
        }
        if !CONFIDENCE_RANGE.contains(&confidence) {
            return Err(Error::invalid_parameter(format!(
                "Confidence must be between {} and {}, is {confidence}",
                CONFIDENCE_RANGE.start(),
                CONFIDENCE_RANGE.end()
            )));
        }
        Ok(CochransSampleSize {
            margin_of_error,
            confidence,
        })
    }

    pub fn margin_of_error(&self) -> f64 {
        self.margin_of_error
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// The two-tailed critical value of the standard normal distribution
    pub fn z_score(&self) -> f64 {
        let cumulative_probability = 1.0 - (1.0 - self.confidence) / 2.0;
        SQRT_2 * erf_inv(2.0 * cumulative_probability - 1.0)
    }
}

/// 2% margin of error at 99% confidence
impl Default for CochransSampleSize {
    fn default() -> Self {
        CochransSampleSize {
            margin_of_error: 0.02,
            confidence: 0.99,
        }
    }
}

impl SampleSize for CochransSampleSize {
    fn size(&self, _population: u64) -> u64 {
        let z = self.z_score();
        (z * z * PROBABILITY * (1.0 - PROBABILITY) / (self.margin_of_error * self.margin_of_error))
            .ceil() as u64
    }
}

impl fmt::Display for CochransSampleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cochran(margin_of_error={}, confidence={})",
            self.margin_of_error, self.confidence
        )
    }
}

/// The serialized form of [CochransSampleSize], validated on the way in
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CochransParameters {
    pub margin_of_error: f64,
    pub confidence: f64,
}

impl TryFrom<CochransParameters> for CochransSampleSize {
    type Error = Error;

    fn try_from(value: CochransParameters) -> Result<Self> {
        CochransSampleSize::new(value.margin_of_error, value.confidence)
    }
}

impl From<CochransSampleSize> for CochransParameters {
    fn from(value: CochransSampleSize) -> Self {
        CochransParameters {
            margin_of_error: value.margin_of_error,
            confidence: value.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cochran_sizes() {
        let sample_size = CochransSampleSize::new(0.05, 0.95).unwrap();
        println!("{sample_size} z = {}", sample_size.z_score());
        assert_eq!(sample_size.size(1_000_000), 385);
        let sample_size = CochransSampleSize::new(0.02, 0.99).unwrap();
        println!("{sample_size} z = {}", sample_size.z_score());
        assert_eq!(sample_size.size(1_000_000), 4147);
    }

    #[test]
    fn test_z_score() {
        use statrs::distribution::{ContinuousCDF, Normal};
        let normal = Normal::new(0.0, 1.0).unwrap();
        for confidence in [0.5, 0.8, 0.9, 0.95, 0.99] {
            let z = CochransSampleSize::new(0.05, confidence).unwrap().z_score();
            let expected = normal.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
            println!("confidence = {confidence} z = {z} expected = {expected}");
            assert!((z - expected).abs() < 1e-6);
        }
        assert_eq!(CochransSampleSize::default().size(0), 4147);
    }

    #[test]
    fn test_population_is_ignored() {
        let sample_size = CochransSampleSize::new(0.05, 0.95).unwrap();
        let sizes: Vec<u64> = [0, 1, 100, 10_000, u64::MAX]
            .into_iter()
            .map(|population| sample_size.size(population))
            .collect();
        println!("sizes = {:?}", sizes);
        assert!(sizes.iter().all(|&size| size == 385));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(CochransSampleSize::new(0.01, 0.01).is_ok());
        assert!(CochransSampleSize::new(0.1, 0.99).is_ok());
        // The smallest sizes are still positive
        assert!(CochransSampleSize::new(0.1, 0.01).unwrap().size(10) >= 1);
    }

    #[test]
    fn test_invalid_parameters() {
        let err = CochransSampleSize::new(0.5, 0.95).unwrap_err();
        println!("{err}");
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(err.to_string().contains("0.5"));
        assert!(err.to_string().contains("0.01 and 0.1"));
        let err = CochransSampleSize::new(0.05, 0.995).unwrap_err();
        println!("{err}");
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(err.to_string().contains("0.995"));
        assert!(CochransSampleSize::new(0.009, 0.95).is_err());
        assert!(CochransSampleSize::new(0.05, 0.0).is_err());
        assert!(CochransSampleSize::new(f64::NAN, 0.95).is_err());
    }

    #[test]
    fn test_serde() {
        let sample_size: CochransSampleSize =
            serde_json::from_str(r#"{"margin_of_error": 0.05, "confidence": 0.95}"#).unwrap();
        assert_eq!(sample_size.size(10), 385);
        assert!(serde_json::from_str::<CochransSampleSize>(
            r#"{"margin_of_error": 0.5, "confidence": 0.95}"#
        )
        .is_err());
    }
}
