//! UTF-8 stages of the preparation pipeline.
//!
//! Map, Prohibit and CheckBidi keep their place in the pipeline but only
//! implement the minimal contract: case folding for Map, identity for the
//! other two.

use unicode_normalization::UnicodeNormalization;

use super::PrepareStep;
use crate::error::Result;

/// Case folding, when enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapStep {
    fold_case: bool,
}

impl MapStep {
    pub fn new(fold_case: bool) -> Self {
        Self { fold_case }
    }
}

impl PrepareStep for MapStep {
    fn apply(&self, input: String) -> Result<String> {
        if self.fold_case {
            return Ok(input.to_lowercase());
        }
        Ok(input)
    }
}

/// Unicode normalization form KC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStep;

impl PrepareStep for NormalizeStep {
    fn apply(&self, input: String) -> Result<String> {
        Ok(input.nfkc().collect())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProhibitStep;

impl PrepareStep for ProhibitStep {
    fn apply(&self, input: String) -> Result<String> {
        Ok(input)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckBidiStep;

impl PrepareStep for CheckBidiStep {
    fn apply(&self, input: String) -> Result<String> {
        Ok(input)
    }
}
