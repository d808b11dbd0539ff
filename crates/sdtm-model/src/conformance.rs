use serde::{Deserialize, Serialize};

/// Stable issue codes written to conformance reports.
pub mod issue_codes {
    /// Required variable has no column.
    pub const MISSING_REQUIRED: &str = "SDTMIG_REQ";
    /// Expected variable has no column.
    pub const MISSING_EXPECTED: &str = "SDTMIG_EXP";
    /// Permissible variable has no column.
    pub const MISSING_PERMISSIBLE: &str = "SDTMIG_PERM";
    /// Variable absent but declared not collected by the caller.
    pub const NOT_COLLECTED: &str = "SDTMIG_NOTCOLL";
    /// Value not found in a non-extensible codelist.
    pub const CT_NOT_IN_CODELIST: &str = "CT2001";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conformance finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: String,
    pub variable: Option<String>,
    pub message: String,
    /// Number of rows sharing the offending value.
    pub row_count: Option<u64>,
    pub codelist_code: Option<String>,
}

impl ValidationIssue {
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            variable: None,
            message: message.into(),
            row_count: None,
            codelist_code: None,
        }
    }

    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    pub fn with_row_count(mut self, rows: u64) -> Self {
        self.row_count = Some(rows);
        self
    }

    pub fn with_codelist(mut self, code: impl Into<String>) -> Self {
        self.codelist_code = Some(code.into());
        self
    }
}

/// Findings for a single domain, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(rename = "domain")]
    pub domain_code: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(domain_code: impl Into<String>) -> Self {
        Self {
            domain_code: domain_code.into(),
            issues: Vec::new(),
        }
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Issues attached to `variable` (case-insensitive).
    pub fn issues_for<'a>(&'a self, variable: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |issue| {
            issue
                .variable
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(variable))
        })
    }
}
