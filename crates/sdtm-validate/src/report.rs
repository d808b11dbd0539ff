//! JSON conformance report.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};

use sdtm_model::{DomainFailure, Severity, ValidationReport};

use crate::error::{Result, ValidationError};

pub const REPORT_SCHEMA: &str = "sdtm-engine.conformance-report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;
pub const REPORT_FILE_NAME: &str = "conformance_report.json";

#[derive(Debug, Serialize)]
pub struct ConformanceReportPayload {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub study_id: String,
    /// SHA-256 over the serialized issues of every domain.
    pub fingerprint: String,
    pub reports: Vec<ConformanceReportSummary>,
    pub failed_domains: Vec<DomainFailure>,
}

#[derive(Debug, Serialize)]
pub struct ConformanceReportSummary {
    pub domain: String,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub issues: Vec<ConformanceIssueJson>,
}

#[derive(Debug, Serialize)]
pub struct ConformanceIssueJson {
    pub severity: Severity,
    pub code: String,
    pub domain: String,
    pub variable: Option<String>,
    pub message: String,
    pub row_count: Option<u64>,
    pub codelist_code: Option<String>,
}

fn summarize(report: &ValidationReport) -> ConformanceReportSummary {
    ConformanceReportSummary {
        domain: report.domain_code.clone(),
        error_count: report.error_count(),
        warning_count: report.warning_count(),
        info_count: report.info_count(),
        issues: report
            .issues
            .iter()
            .map(|issue| ConformanceIssueJson {
                severity: issue.severity,
                code: issue.code.clone(),
                domain: report.domain_code.clone(),
                variable: issue.variable.clone(),
                message: issue.message.clone(),
                row_count: issue.row_count,
                codelist_code: issue.codelist_code.clone(),
            })
            .collect(),
    }
}

/// Hex SHA-256 of the reports' issues. Independent of generation time.
pub fn issue_fingerprint(reports: &[ValidationReport]) -> Result<String> {
    let mut hasher = Sha256::new();
    for report in reports {
        hasher.update(report.domain_code.as_bytes());
        hasher.update(serde_json::to_vec(&report.issues)?);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn conformance_payload(
    study_id: &str,
    reports: &[ValidationReport],
    failures: &[DomainFailure],
) -> Result<ConformanceReportPayload> {
    Ok(ConformanceReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        study_id: study_id.to_string(),
        fingerprint: issue_fingerprint(reports)?,
        reports: reports.iter().map(summarize).collect(),
        failed_domains: failures.to_vec(),
    })
}

/// Write `conformance_report.json` into `output_dir`, creating it if needed.
pub fn write_conformance_report_json(
    output_dir: &Path,
    study_id: &str,
    reports: &[ValidationReport],
    failures: &[DomainFailure],
) -> Result<PathBuf> {
    let io_err = |source| ValidationError::Io {
        path: output_dir.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(output_dir).map_err(io_err)?;
    let output_path = output_dir.join(REPORT_FILE_NAME);
    let payload = conformance_payload(study_id, reports, failures)?;
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(&output_path, format!("{json}\n")).map_err(|source| ValidationError::Io {
        path: output_path.clone(),
        source,
    })?;
    Ok(output_path)
}
