//! # Naming utilities
//!
//! Module dedicated to naming objects derived from relations, such as CTEs and graph nodes
//!

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use crate::encoder::IDENTIFIER_SUFFIX;

pub const FINAL_SAMPLE: &str = "FINAL_SAMPLE";
pub const DIRECTIONAL_SAMPLE: &str = "DIRECTIONAL_SAMPLE";
pub const CORE_SAMPLE: &str = "CORE_SAMPLE";
pub const COUNT_POPULATION: &str = "COUNT_POPULATION";

/// A function used to hash named objects
fn hash<H: Hash>(content: &H) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// A deterministic name made of a prefix and a short digest of the content
pub fn name_from_content<S: Into<String>, H: Hash>(prefix: S, content: &H) -> String {
    format!("{}_{}", prefix.into(), IDENTIFIER_SUFFIX.encode(hash(content)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_based_namer() {
        println!("foo name = {}", name_from_content("foo", &"A"));
        println!("foo name = {}", name_from_content("foo", &"B"));
        assert_eq!(name_from_content("foo", &"A"), name_from_content("foo", &"A"));
        assert_ne!(name_from_content("foo", &"A"), name_from_content("foo", &"B"));
        assert!(name_from_content(FINAL_SAMPLE, &"A").starts_with("FINAL_SAMPLE_"));
    }
}
