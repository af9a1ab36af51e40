//! Project-wide overview: totals and averages over per-file reports.

use serde::{Deserialize, Serialize};

use crate::inspect::FileReport;

/// Lint issues, source lines and maintainability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub lint: f64,
    pub sloc: f64,
    pub maintainability: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: Stats,
    pub average: Stats,
}

/// Per-file reports plus their summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewReport {
    pub reports: Vec<FileReport>,
    pub summary: Summary,
}

impl OverviewReport {
    pub fn file_count(&self) -> usize {
        self.reports.len()
    }
}

/// Fold per-file reports into an overview.
///
/// Files without a lint section add 0 lint issues. An empty input gives
/// all-zero totals and averages.
pub fn compute_overview(reports: Vec<FileReport>) -> OverviewReport {
    let mut total = Stats::default();
    for report in &reports {
        total.sloc += report.complexity.sloc.physical as f64;
        total.maintainability += report.complexity.maintainability;
        total.lint += report
            .lint
            .as_ref()
            .map(|lint| lint.issue_count())
            .unwrap_or(0) as f64;
    }

    let average = if reports.is_empty() {
        Stats::default()
    } else {
        let n = reports.len() as f64;
        Stats {
            lint: total.lint / n,
            sloc: total.sloc / n,
            maintainability: total.maintainability / n,
        }
    };

    OverviewReport {
        reports,
        summary: Summary { total, average },
    }
}
