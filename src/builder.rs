//! # Builder utilities
//!
//! This module contains utilities to ease and standardize the writing of builders
//! such as: [crate::relation::RelationBuilder]
//!

use std::{error, fmt};

/// A trait for builder ad-hoc polymorphism
pub trait With<Input, Output = Self> {
    fn with(self, input: Input) -> Output;
}

/// Implement With for the unit type
impl<T, W: Default + With<T>> With<T, W> for () {
    fn with(self, input: T) -> W {
        W::default().with(input)
    }
}

pub trait WithIterator<Input> {
    fn with_iter<I: IntoIterator<Item = Input>>(self, iter: I) -> Self;
}

impl<Input, W: With<Input>> WithIterator<Input> for W {
    fn with_iter<I: IntoIterator<Item = Input>>(self, iter: I) -> Self {
        iter.into_iter().fold(self, |w, i| w.with(i))
    }
}

/// A trait enabling build when a builder is ready
pub trait Ready<Output>: Sized {
    type Error: error::Error + fmt::Display;
    /// Build and panic in case of error
    fn build(self) -> Output {
        match self.try_build() {
            Ok(output) => output,
            Err(err) => panic!("{err}"),
        }
    }
    /// Try to build
    fn try_build(self) -> Result<Output, Self::Error>;
}
