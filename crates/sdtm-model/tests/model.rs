//! Tests for sdtm-model types.

use sdtm_model::{
    CoreDesignation, DatasetClass, DomainFailure, DomainResult, MappingConfig, Severity,
    StudyReport, SupplementalRecord, ValidationIssue, ValidationReport, issue_codes,
};

fn report_with(severities: &[Severity]) -> ValidationReport {
    let mut report = ValidationReport::new("AE");
    for severity in severities {
        report.push(ValidationIssue::new(*severity, "TEST", "finding").with_variable("AETERM"));
    }
    report
}

#[test]
fn validation_report_counts() {
    let report = report_with(&[Severity::Error, Severity::Warning, Severity::Info, Severity::Info]);
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.info_count(), 2);
    assert!(report.has_errors());
    assert_eq!(report.issues_for("aeterm").count(), 4);
}

#[test]
fn issue_serializes_with_stable_fields() {
    let issue = ValidationIssue::new(
        Severity::Error,
        issue_codes::CT_NOT_IN_CODELIST,
        "Value not in codelist",
    )
    .with_variable("SEX")
    .with_row_count(3)
    .with_codelist("C66731");
    let json = serde_json::to_value(&issue).expect("serialize issue");
    assert_eq!(json["severity"], "error");
    assert_eq!(json["code"], "CT2001");
    assert_eq!(json["variable"], "SEX");
    assert_eq!(json["row_count"], 3);
    assert_eq!(json["codelist_code"], "C66731");
}

#[test]
fn study_report_distinguishes_failures_from_findings() {
    let clean = StudyReport {
        study_id: "STUDY".to_string(),
        results: vec![DomainResult {
            domain_code: "AE".to_string(),
            records: 10,
            report: report_with(&[Severity::Warning]),
            supplemental_records: 0,
        }],
        failures: vec![],
        cancelled: vec![],
    };
    assert!(!clean.has_errors());
    assert_eq!(clean.warning_count(), 1);

    let failed = StudyReport {
        failures: vec![DomainFailure {
            domain_code: "LB".to_string(),
            message: "unknown codelist C00000".to_string(),
        }],
        ..clean.clone()
    };
    assert!(failed.has_errors());
    assert_eq!(failed.error_count(), 0);
}

#[test]
fn supplemental_record_uses_uppercase_field_names() {
    let record = SupplementalRecord {
        studyid: "STUDY".to_string(),
        rdomain: "AE".to_string(),
        usubjid: "STUDY-001".to_string(),
        qnam: "AECOMM".to_string(),
        qval: "Mild".to_string(),
        ..SupplementalRecord::default()
    };
    let json = serde_json::to_value(&record).expect("serialize record");
    assert_eq!(json["RDOMAIN"], "AE");
    assert_eq!(json["QNAM"], "AECOMM");
    assert_eq!(json["IDVAR"], "");
    assert_eq!(record.values()[5], "AECOMM");
}

#[test]
fn mapping_config_parses_with_defaults() {
    let config: MappingConfig = serde_json::from_str(
        r#"{
            "domain_code": "DM",
            "not_collected": {"ETHNIC": "Not collected per protocol"},
            "supplemental": {"Race Other": {"qlabel": "Race, Other"}}
        }"#,
    )
    .expect("parse mapping");
    assert_eq!(config.study_id, "");
    assert!(config.mappings.is_empty());
    assert_eq!(
        config.not_collected_reason("ethnic"),
        Some("Not collected per protocol")
    );
    assert_eq!(
        config
            .supplemental_meta("RACE OTHER")
            .and_then(|meta| meta.qlabel.as_deref()),
        Some("Race, Other")
    );
}

#[test]
fn enums_parse_published_strings() {
    assert_eq!(
        "Perm".parse::<CoreDesignation>().unwrap(),
        CoreDesignation::Permissible
    );
    assert_eq!(
        "Trial Design".parse::<DatasetClass>().unwrap(),
        DatasetClass::TrialDesign
    );
}
