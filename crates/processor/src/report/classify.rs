//! Classify: extracts Errors/Warnings and drops suppressed messages.

use crate::filter::{MessageCategory, SuppressionRules};
use crate::parser::CanonicalRecord;
use crate::report::model::NormalizedReport;

pub struct MessageClassifier {
    rules: SuppressionRules,
}

impl MessageClassifier {
    pub fn new(rules: SuppressionRules) -> Self {
        Self { rules }
    }

    /// Surviving messages for `category`, in report order.
    ///
    /// A missing or non-sequence key means no diagnostics.
    pub fn classify(&self, record: &CanonicalRecord, category: MessageCategory) -> Vec<String> {
        let messages: Vec<String> = match record
            .get(category.source_key())
            .and_then(|value| value.as_sequence())
        {
            Some(items) => items.iter().map(|item| item.to_string()).collect(),
            None => return Vec::new(),
        };

        self.rules.retain(category, messages)
    }

    /// Fills both message lists (and their counts) on `report`.
    pub fn apply(&self, record: &CanonicalRecord, report: &mut NormalizedReport) {
        for category in [MessageCategory::Error, MessageCategory::Warning] {
            report.set_messages(category, self.classify(record, category));
        }
    }
}
