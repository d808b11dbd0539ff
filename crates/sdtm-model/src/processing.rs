use serde::{Deserialize, Serialize};

use crate::conformance::ValidationReport;

/// A domain that completed its pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainResult {
    pub domain_code: String,
    pub records: usize,
    pub report: ValidationReport,
    pub supplemental_records: usize,
}

/// A domain that stopped on a configuration or processing error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainFailure {
    pub domain_code: String,
    pub message: String,
}

/// Outcome of a study run.
///
/// Failed domains and domains with findings are kept apart: a failure means
/// no report exists for that domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyReport {
    pub study_id: String,
    pub results: Vec<DomainResult>,
    pub failures: Vec<DomainFailure>,
    /// Domains skipped because the run was cancelled before they started.
    pub cancelled: Vec<String>,
}

impl StudyReport {
    pub fn reports(&self) -> impl Iterator<Item = &ValidationReport> {
        self.results.iter().map(|result| &result.report)
    }

    pub fn error_count(&self) -> usize {
        self.reports().map(ValidationReport::error_count).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.reports().map(ValidationReport::warning_count).sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty() || self.reports().any(ValidationReport::has_errors)
    }

    pub fn was_cancelled(&self) -> bool {
        !self.cancelled.is_empty()
    }
}
