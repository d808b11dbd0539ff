use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Caller-supplied metadata for one supplemental column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppColumnMeta {
    pub qlabel: Option<String>,
    pub qorig: Option<String>,
    pub qeval: Option<String>,
}

/// How one source table becomes one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    pub domain_code: String,
    #[serde(default)]
    pub study_id: String,
    /// Source column -> target variable.
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
    /// Variable -> reason it was not collected.
    #[serde(default)]
    pub not_collected: BTreeMap<String, String>,
    /// Source column -> supplemental metadata overrides.
    #[serde(default)]
    pub supplemental: BTreeMap<String, SuppColumnMeta>,
}

impl MappingConfig {
    pub fn new(domain_code: impl Into<String>, study_id: impl Into<String>) -> Self {
        Self {
            domain_code: domain_code.into(),
            study_id: study_id.into(),
            ..Self::default()
        }
    }

    pub fn with_mapping(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.mappings.insert(source.into(), target.into());
        self
    }

    pub fn with_not_collected(
        mut self,
        variable: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.not_collected.insert(variable.into(), reason.into());
        self
    }

    /// Metadata for a supplemental column, matched case-insensitively.
    pub fn supplemental_meta(&self, column: &str) -> Option<&SuppColumnMeta> {
        self.supplemental
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, meta)| meta)
    }

    /// Not-collected reason for a variable, matched case-insensitively.
    pub fn not_collected_reason(&self, variable: &str) -> Option<&str> {
        self.not_collected
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(variable))
            .map(|(_, reason)| reason.as_str())
    }
}
