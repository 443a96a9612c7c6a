use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },
}

/// A single compiled, case-insensitive pattern.
///
/// Immutable after construction so one instance can be shared across
/// concurrent requests.
pub struct PatternMatcher {
    pattern: String,
    matcher: RegexMatcher,
}

impl PatternMatcher {
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(true)
            .multi_line(false)
            .build(pattern)
            .map_err(|e| FilterError::InvalidRegex {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
        })
    }

    #[inline]
    pub fn is_match(&self, message: &str) -> bool {
        self.matcher.is_match(message.as_bytes()).unwrap_or(false)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl std::fmt::Debug for PatternMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PatternMatcher").field(&self.pattern).finish()
    }
}
