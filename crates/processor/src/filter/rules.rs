//! Rules: suppression rules for munki diagnostic messages.
//!
//! Provides the stock network-error patterns, the rule/category model,
//! and [`SuppressionRules`], the compiled rule set shared by every request.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::filter::engine::{FilterError, PatternMatcher};

/// Well-known munki network errors that admins cannot act on.
pub struct Patterns;

impl Patterns {
    /// NSURLErrorNotConnectedToInternet
    pub const OFFLINE: &'static str = r"\(-1009,.*Internet connection appears to be offline";

    /// NSURLErrorTimedOut
    pub const TIMED_OUT: &'static str = r"\(-1001,.*request timed out";

    /// NSURLErrorNetworkConnectionLost
    pub const CONNECTION_LOST: &'static str = r"\(-1005,.*network connection was lost";

    /// NSURLErrorCannotConnectToHost
    pub const CANNOT_CONNECT: &'static str = r"\(-1004,.*Could not connect to the server";

    /// NSURLErrorCannotFindHost
    pub const HOST_NOT_FOUND: &'static str =
        r"\(-1003,.*A server with the specified hostname could not be found";

    pub fn network_errors() -> Vec<String> {
        [
            Self::OFFLINE,
            Self::TIMED_OUT,
            Self::CONNECTION_LOST,
            Self::CANNOT_CONNECT,
            Self::HOST_NOT_FOUND,
        ]
        .iter()
        .map(|p| p.to_string())
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCategory {
    Error,
    Warning,
}

impl MessageCategory {
    /// Report key holding this category's messages.
    pub fn source_key(&self) -> &'static str {
        match self {
            MessageCategory::Error => "Errors",
            MessageCategory::Warning => "Warnings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressionRule {
    pub pattern: String,
    pub category: MessageCategory,
}

impl SuppressionRule {
    pub fn error(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            category: MessageCategory::Error,
        }
    }

    pub fn warning(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            category: MessageCategory::Warning,
        }
    }
}

/// Compiled, ordered suppression rules per category.
#[derive(Debug, Default)]
pub struct SuppressionRules {
    errors: Vec<PatternMatcher>,
    warnings: Vec<PatternMatcher>,
}

impl SuppressionRules {
    pub fn compile(rules: &[SuppressionRule]) -> Result<Self, FilterError> {
        let mut compiled = Self::default();
        for rule in rules {
            let matcher = PatternMatcher::new(&rule.pattern)?;
            match rule.category {
                MessageCategory::Error => compiled.errors.push(matcher),
                MessageCategory::Warning => compiled.warnings.push(matcher),
            }
        }
        Ok(compiled)
    }

    pub fn from_patterns(errors: &[String], warnings: &[String]) -> Result<Self, FilterError> {
        let rules: Vec<SuppressionRule> = errors
            .iter()
            .map(SuppressionRule::error)
            .chain(warnings.iter().map(SuppressionRule::warning))
            .collect();
        Self::compile(&rules)
    }

    /// Stock rules: munki network errors, no warning rules.
    pub fn munki_defaults() -> Result<Self, FilterError> {
        Self::from_patterns(&Patterns::network_errors(), &[])
    }

    fn rules(&self, category: MessageCategory) -> &[PatternMatcher] {
        match category {
            MessageCategory::Error => &self.errors,
            MessageCategory::Warning => &self.warnings,
        }
    }

    pub fn len(&self, category: MessageCategory) -> usize {
        self.rules(category).len()
    }

    /// Returns the first pattern of `category` matching `message`.
    pub fn suppressed_by(&self, category: MessageCategory, message: &str) -> Option<&str> {
        self.rules(category)
            .iter()
            .find(|rule| rule.is_match(message))
            .map(PatternMatcher::pattern)
    }

    /// Drops suppressed messages; survivors keep their order.
    pub fn retain(&self, category: MessageCategory, messages: Vec<String>) -> Vec<String> {
        if self.rules(category).is_empty() {
            return messages;
        }

        messages
            .into_iter()
            .filter(|message| match self.suppressed_by(category, message) {
                Some(pattern) => {
                    trace!(category = ?category, pattern, message = %message, "suppressed message");
                    false
                }
                None => true,
            })
            .collect()
    }
}

// ── Tests ───────────────────────────────────────────────────────
