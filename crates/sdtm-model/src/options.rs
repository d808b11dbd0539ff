//! Per-run policy for terminology matching and validation.
//!
//! Both option structs are built once by the caller and passed by reference
//! through a run; nothing in the engine mutates them.

use serde::{Deserialize, Serialize};

/// How loosely raw values are matched against codelist terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtMatchingMode {
    /// Only byte-for-byte submission value matches.
    Strict,
    /// Synonyms and compact-key matches are also accepted.
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationOptions {
    pub matching_mode: CtMatchingMode,
    /// Resolve unmatched values to OTHER or UNKNOWN when the codelist has them.
    pub fallback_enabled: bool,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self {
            matching_mode: CtMatchingMode::Lenient,
            fallback_enabled: false,
        }
    }
}

impl NormalizationOptions {
    pub fn strict() -> Self {
        Self {
            matching_mode: CtMatchingMode::Strict,
            ..Self::default()
        }
    }

    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.matching_mode == CtMatchingMode::Lenient
    }
}

/// What to do when a Permissible variable has no column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissibleMissing {
    #[default]
    Report,
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub permissible_missing: PermissibleMissing,
}

impl ValidationOptions {
    pub fn suppress_permissible() -> Self {
        Self {
            permissible_missing: PermissibleMissing::Suppress,
        }
    }
}
