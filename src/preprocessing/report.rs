//! Recovered conditions collected while applying a blueprint.

use crate::error::RecoveredCondition;
use std::collections::{BTreeMap, BTreeSet};

/// Conditions handled by a fallback during one apply call.
///
/// Entries are kept in sorted maps so the report is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    degenerate: BTreeSet<String>,
    unseen: BTreeMap<(String, String), usize>,
}

impl ApplyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_degenerate(&mut self, column: &str) {
        self.degenerate.insert(column.to_string());
    }

    pub(crate) fn record_unseen(&mut self, column: &str, value: &str) {
        *self
            .unseen
            .entry((column.to_string(), value.to_string()))
            .or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.degenerate.is_empty() && self.unseen.is_empty()
    }

    /// Total unseen values recorded for `column`.
    pub fn unseen_count(&self, column: &str) -> usize {
        self.unseen
            .iter()
            .filter(|((c, _), _)| c == column)
            .map(|(_, &n)| n)
            .sum()
    }

    /// All conditions: degenerate columns first, then unseen values.
    pub fn conditions(&self) -> Vec<RecoveredCondition> {
        let degenerate = self
            .degenerate
            .iter()
            .map(|column| RecoveredCondition::DegenerateColumn {
                column: column.clone(),
            });
        let unseen = self
            .unseen
            .iter()
            .map(|((column, value), &count)| RecoveredCondition::UnseenCategory {
                column: column.clone(),
                value: value.clone(),
                count,
            });
        degenerate.chain(unseen).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_aggregates_unseen() {
        let mut report = ApplyReport::new();
        report.record_unseen("Neighborhood", "Atlantis");
        report.record_unseen("Neighborhood", "Atlantis");
        report.record_unseen("Neighborhood", "Eldorado");
        report.record_unseen("Roof_Style", "Dome");

        assert_eq!(report.unseen_count("Neighborhood"), 3);
        assert_eq!(report.unseen_count("Roof_Style"), 1);
        assert_eq!(report.unseen_count("Lot_Shape"), 0);
        assert_eq!(
            report.conditions()[0],
            RecoveredCondition::UnseenCategory {
                column: "Neighborhood".to_string(),
                value: "Atlantis".to_string(),
                count: 2,
            }
        );
    }

    #[test]
    fn test_report_degenerate_first() {
        let mut report = ApplyReport::new();
        report.record_unseen("a", "z");
        report.record_degenerate("Pool_Area");
        report.record_degenerate("Pool_Area");

        let conditions = report.conditions();
        assert_eq!(conditions.len(), 2);
        assert_eq!(
            conditions[0],
            RecoveredCondition::DegenerateColumn {
                column: "Pool_Area".to_string()
            }
        );
    }

    #[test]
    fn test_report_empty() {
        assert!(ApplyReport::default().is_empty());
    }
}
