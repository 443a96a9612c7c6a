//! Filter module: case-insensitive pattern matching and the suppression
//! rules applied to munki errors and warnings.

pub mod engine;
pub mod rules;

pub use engine::{FilterError, PatternMatcher};
pub use rules::{MessageCategory, Patterns, SuppressionRule, SuppressionRules};
