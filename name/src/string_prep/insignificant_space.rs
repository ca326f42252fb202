use std::sync::LazyLock;

use regex::Regex;

use super::PrepareStep;
use crate::error::{Error, Result};

static ONLY_SPACES: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\p{Zs}*$"));
static OUTER_SPACES: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\p{Zs}+|\p{Zs}+$"));
static SPACE_RUN: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\p{Zs}+"));

fn regex(cell: &'static LazyLock<std::result::Result<Regex, regex::Error>>) -> Result<&'static Regex> {
    LazyLock::force(cell).as_ref().map_err(|e| Error::Regex(e.clone()))
}

/// Insignificant space handling (RFC 4518 §2.6.1).
///
/// A value of only space separators becomes two spaces. Anything else is
/// trimmed, every inner run of separators becomes two spaces, and the
/// result is wrapped in single spaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsignificantSpaceStep;

impl PrepareStep for InsignificantSpaceStep {
    fn apply(&self, input: String) -> Result<String> {
        if regex(&ONLY_SPACES)?.is_match(&input) {
            return Ok("  ".to_string());
        }
        let trimmed = regex(&OUTER_SPACES)?.replace_all(&input, "");
        let collapsed = regex(&SPACE_RUN)?.replace_all(&trimmed, "  ");
        Ok(format!(" {} ", collapsed))
    }
}
