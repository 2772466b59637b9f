//! Data types used by the aggregation pass.

use serde::Serialize;

/// Header label of the subject column.
pub const SUBJECT_LABEL: &str = "Předmět";
/// Header label of the weight column.
pub const WEIGHT_LABEL: &str = "Váha";
/// Header label of the result column.
pub const RESULT_LABEL: &str = "Výsledek";

/// Positions of the three required columns, resolved once from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub subject: usize,
    pub weight: usize,
    pub result: usize,
}

impl ColumnIndices {
    /// Minimum number of cells a row needs to cover every required column.
    pub fn min_row_len(&self) -> usize {
        self.subject.max(self.weight).max(self.result) + 1
    }
}

/// Running totals and the finalized weighted average for one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubjectAggregate {
    pub total_weighted_sum: f64,
    pub total_weight: f64,
    pub grade_count: usize,
    pub average: f64,
}

impl SubjectAggregate {
    pub(crate) fn add(&mut self, weight: f64, result: f64) {
        self.total_weighted_sum += result * weight;
        self.total_weight += weight;
        self.grade_count += 1;
    }

    /// Computes `average`. Returns `false` when there is no positive weight
    /// to divide by and the average was set to zero instead.
    pub(crate) fn finalize(&mut self) -> bool {
        if self.grade_count > 0 && self.total_weight > 0.0 {
            self.average = self.total_weighted_sum / self.total_weight;
            true
        } else {
            self.average = 0.0;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_row_len_uses_largest_index() {
        let columns = ColumnIndices {
            subject: 1,
            weight: 4,
            result: 2,
        };
        assert_eq!(columns.min_row_len(), 5);
    }

    #[test]
    fn test_finalize_zero_weight() {
        let mut agg = SubjectAggregate::default();
        agg.add(0.0, 1.0);
        assert!(!agg.finalize());
        assert_eq!(agg.average, 0.0);
        assert_eq!(agg.grade_count, 1);
    }

    #[test]
    fn test_finalize_weighted() {
        let mut agg = SubjectAggregate::default();
        agg.add(1.0, 2.0);
        agg.add(3.0, 4.0);
        assert!(agg.finalize());
        assert_eq!(agg.average, 14.0 / 4.0);
    }
}
