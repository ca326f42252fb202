//! Equality matching rules.
//!
//! Both operands are content octets as stored in the attribute value. The
//! string rules prepare them with the [`StringPreparer`] for the rule's string
//! type before comparing.

use tracing::debug;
use x501_der::PrimitiveTag;

use crate::string_prep::StringPreparer;

/// Outcome of a matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Match,
    NoMatch,
    /// The operands could not be compared, e.g. preparation failed.
    Undefined,
}

impl MatchResult {
    /// `Undefined` counts as no match.
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

impl From<bool> for MatchResult {
    fn from(value: bool) -> Self {
        if value {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchingRule {
    /// octetStringMatch: byte for byte.
    Binary,
    /// caseIgnoreMatch for values of the given string type.
    CaseIgnore(PrimitiveTag),
    /// caseExactMatch for values of the given string type.
    CaseExact(PrimitiveTag),
}

impl MatchingRule {
    /// The same rule for values of another string type.
    pub fn for_string_type(self, tag: PrimitiveTag) -> Self {
        match self {
            MatchingRule::Binary => MatchingRule::Binary,
            MatchingRule::CaseIgnore(_) => MatchingRule::CaseIgnore(tag),
            MatchingRule::CaseExact(_) => MatchingRule::CaseExact(tag),
        }
    }

    fn preparer(&self) -> Option<StringPreparer> {
        match self {
            MatchingRule::Binary => None,
            MatchingRule::CaseIgnore(tag) => {
                Some(StringPreparer::for_string_type(*tag).with_case_folding(true))
            }
            MatchingRule::CaseExact(tag) => Some(StringPreparer::for_string_type(*tag)),
        }
    }

    pub fn compare(&self, assertion: &[u8], value: &[u8]) -> MatchResult {
        let Some(preparer) = self.preparer() else {
            return MatchResult::from(assertion == value);
        };
        match (preparer.prepare(assertion), preparer.prepare(value)) {
            (Ok(assertion), Ok(value)) => MatchResult::from(assertion == value),
            (Err(e), _) | (_, Err(e)) => {
                debug!(rule = ?self, error = %e, "string preparation failed");
                MatchResult::Undefined
            }
        }
    }
}
