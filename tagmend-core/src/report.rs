//! Human-readable rendering of pipeline outcomes.

use camino::Utf8Path;
use tagmend_types::{BatchResult, TagOutcome};

/// One line per finding, in registry order.
///
/// Detection lines name the defect and the fix that would remove it; apply
/// lines confirm what was done.
pub fn render_file_report(path: &Utf8Path, outcome: &TagOutcome) -> Vec<String> {
    outcome
        .reports
        .iter()
        .map(|report| {
            if report.applied {
                format!("{path}: fixed {}", report.fix.canonical_name())
            } else {
                format!(
                    "{path}: {}; fix with {}",
                    report.fix.detect_message(),
                    report.fix.canonical_name()
                )
            }
        })
        .collect()
}

pub fn render_clean(path: &Utf8Path) -> String {
    format!("{path}: no issues detected")
}

/// Batch trailer. `success` counts files that were actually bludgeoned, not
/// files that merely survived the walk.
pub fn render_batch_summary(batch: &BatchResult) -> String {
    let plural = if batch.total == 1 { "" } else { "s" };
    format!(
        "Bludgeoned {} out of {} tag{plural}",
        batch.success, batch.total
    )
}
