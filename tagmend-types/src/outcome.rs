use crate::fix::Fix;

/// What one fix reported for one tag.
///
/// `applied` is false in detect mode (the defect was found but left alone)
/// and true in apply mode (the graph was mutated to resolve it). Fixes that
/// find nothing produce no report at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixReport {
    pub fix: Fix,
    pub applied: bool,
}

/// Per-file outcome of a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct TagOutcome {
    /// True iff any fix reported a finding (detect mode) or a change (apply
    /// mode).
    pub bludgeoned: bool,
    /// One entry per fix that reported true, in canonical execution order.
    pub reports: Vec<FixReport>,
}

impl TagOutcome {
    pub fn record(&mut self, fix: Fix, applied: bool) {
        self.bludgeoned = true;
        self.reports.push(FixReport { fix, applied });
    }
}

/// Aggregate counters for a batch run. Reset per invocation, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Regular files visited, including ones that failed to open or parse.
    pub total: u64,
    /// Files for which the pipeline reported `bludgeoned`.
    pub success: u64,
}

impl BatchResult {
    pub fn record(&mut self, bludgeoned: bool) {
        self.total += 1;
        if bludgeoned {
            self.success += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_records_reports_and_flips_flag() {
        let mut outcome = TagOutcome::default();
        assert!(!outcome.bludgeoned);

        outcome.record(Fix::OutOfRange, true);
        assert!(outcome.bludgeoned);
        assert_eq!(
            outcome.reports,
            vec![FixReport {
                fix: Fix::OutOfRange,
                applied: true,
            }]
        );
    }

    #[test]
    fn batch_result_counts_successes_separately() {
        let mut batch = BatchResult::default();
        batch.record(true);
        batch.record(false);
        batch.record(true);
        assert_eq!(batch.total, 3);
        assert_eq!(batch.success, 2);
    }
}
