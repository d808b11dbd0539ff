//! Type-safe enumerations for SDTM metadata.
//!
//! Standards files publish these concepts as free text. Parsing them into
//! closed enums means every consumer has to handle every variant, and a new
//! category shows up as a parse error instead of being silently ignored.
//!
//! # SDTMIG Reference
//!
//! - Variable roles: SDTMIG v3.4 Section 2.1 (General Observation Classes)
//! - Core designation: SDTMIG v3.4 Section 4.1.5

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::conformance::Severity;
use crate::options::PermissibleMissing;

/// Variable role per SDTMIG v3.4 Section 2.1.
///
/// The five qualifier subclasses published in Variables.csv ("Grouping
/// Qualifier", "Result Qualifier", ...) all parse to [`VariableRole::Qualifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableRole {
    /// Keys that uniquely identify records (STUDYID, DOMAIN, USUBJID, --SEQ).
    Identifier,
    /// Primary observation focus (--TERM, --TRT, --TESTCD).
    Topic,
    /// Additional context for the observation.
    Qualifier,
    /// Temporal context (--STDTC, --ENDTC, --DY, VISIT, EPOCH).
    Timing,
    /// Trial design flow control (TD domains only).
    Rule,
}

impl VariableRole {
    /// Returns the canonical name as it appears in SDTMIG.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableRole::Identifier => "Identifier",
            VariableRole::Topic => "Topic",
            VariableRole::Qualifier => "Qualifier",
            VariableRole::Timing => "Timing",
            VariableRole::Rule => "Rule",
        }
    }
}

impl fmt::Display for VariableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VariableRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "IDENTIFIER" => Ok(VariableRole::Identifier),
            "TOPIC" => Ok(VariableRole::Topic),
            "QUALIFIER"
            | "GROUPING QUALIFIER"
            | "RESULT QUALIFIER"
            | "SYNONYM QUALIFIER"
            | "RECORD QUALIFIER"
            | "VARIABLE QUALIFIER" => Ok(VariableRole::Qualifier),
            "TIMING" => Ok(VariableRole::Timing),
            "RULE" => Ok(VariableRole::Rule),
            _ => Err(format!("Unknown variable role: {s}")),
        }
    }
}

/// Core designation per SDTMIG v3.4 Section 4.1.5.
///
/// Indicates whether a variable is required, expected, or permissible
/// for a given domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreDesignation {
    /// Required (Req): must be present in the dataset.
    Required,
    /// Expected (Exp): should be present when the data is collected.
    Expected,
    /// Permissible (Perm): may be included if collected.
    Permissible,
}

impl CoreDesignation {
    /// Returns the short code as it appears in standards files.
    pub fn as_code(&self) -> &'static str {
        match self {
            CoreDesignation::Required => "Req",
            CoreDesignation::Expected => "Exp",
            CoreDesignation::Permissible => "Perm",
        }
    }

    /// Returns the full name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CoreDesignation::Required => "Required",
            CoreDesignation::Expected => "Expected",
            CoreDesignation::Permissible => "Permissible",
        }
    }

    /// Severity of a missing column for this designation.
    ///
    /// Returns `None` only for Permissible variables when the policy
    /// suppresses them.
    pub fn missing_severity(&self, permissible: PermissibleMissing) -> Option<Severity> {
        match self {
            CoreDesignation::Required => Some(Severity::Error),
            CoreDesignation::Expected => Some(Severity::Warning),
            CoreDesignation::Permissible => match permissible {
                PermissibleMissing::Report => Some(Severity::Info),
                PermissibleMissing::Suppress => None,
            },
        }
    }
}

impl fmt::Display for CoreDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CoreDesignation {
    type Err = String;

    /// Handles both short codes (Req, Exp, Perm) and full names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "REQ" | "REQUIRED" => Ok(CoreDesignation::Required),
            "EXP" | "EXPECTED" => Ok(CoreDesignation::Expected),
            "PERM" | "PERMISSIBLE" => Ok(CoreDesignation::Permissible),
            _ => Err(format!("Unknown core designation: {s}")),
        }
    }
}

/// Dataset class per SDTMIG v3.4 Chapter 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetClass {
    /// Interventions: AG, CM, EC, EX, ML, PR, SU
    Interventions,
    /// Events: AE, CE, DS, DV, HO, MH
    Events,
    /// Findings: EG, IE, LB, PE, QS, VS, ...
    Findings,
    /// Findings About: FA, SR
    FindingsAbout,
    /// Special-Purpose: CO, DM, SE, SM, SV
    SpecialPurpose,
    /// Trial Design: TA, TD, TE, TI, TM, TS, TV
    TrialDesign,
    /// Relationship: RELREC, RELSPEC, RELSUB, SUPPQUAL
    Relationship,
    /// Study Reference: OI
    StudyReference,
}

impl DatasetClass {
    /// Returns the canonical class name as it appears in SDTMIG documentation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetClass::Interventions => "Interventions",
            DatasetClass::Events => "Events",
            DatasetClass::Findings => "Findings",
            DatasetClass::FindingsAbout => "Findings About",
            DatasetClass::SpecialPurpose => "Special-Purpose",
            DatasetClass::TrialDesign => "Trial Design",
            DatasetClass::Relationship => "Relationship",
            DatasetClass::StudyReference => "Study Reference",
        }
    }

    /// Returns true for the general observation classes.
    pub fn is_general_observation(&self) -> bool {
        matches!(
            self,
            DatasetClass::Interventions
                | DatasetClass::Events
                | DatasetClass::Findings
                | DatasetClass::FindingsAbout
        )
    }
}

impl fmt::Display for DatasetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatasetClass {
    type Err = String;

    /// Case-insensitive, with or without hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', " ");
        match normalized.as_str() {
            "INTERVENTIONS" => Ok(DatasetClass::Interventions),
            "EVENTS" => Ok(DatasetClass::Events),
            "FINDINGS" => Ok(DatasetClass::Findings),
            "FINDINGS ABOUT" => Ok(DatasetClass::FindingsAbout),
            "SPECIAL PURPOSE" => Ok(DatasetClass::SpecialPurpose),
            "TRIAL DESIGN" => Ok(DatasetClass::TrialDesign),
            "RELATIONSHIP" => Ok(DatasetClass::Relationship),
            "STUDY REFERENCE" => Ok(DatasetClass::StudyReference),
            _ => Err(format!("Unknown dataset class: {s}")),
        }
    }
}

/// SAS storage type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VariableType {
    #[default]
    Char,
    Num,
}

impl FromStr for VariableType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CHAR" | "TEXT" | "C" => Ok(VariableType::Char),
            "NUM" | "NUMERIC" | "INTEGER" | "FLOAT" | "N" => Ok(VariableType::Num),
            _ => Err(format!("Unknown variable type: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_role_from_str() {
        assert_eq!(
            "Identifier".parse::<VariableRole>().unwrap(),
            VariableRole::Identifier
        );
        assert_eq!(
            "GROUPING QUALIFIER".parse::<VariableRole>().unwrap(),
            VariableRole::Qualifier
        );
        assert_eq!(
            "timing".parse::<VariableRole>().unwrap(),
            VariableRole::Timing
        );
        assert!("Observer".parse::<VariableRole>().is_err());
    }

    #[test]
    fn test_core_designation_from_str() {
        assert_eq!(
            "Req".parse::<CoreDesignation>().unwrap(),
            CoreDesignation::Required
        );
        assert_eq!(
            "EXPECTED".parse::<CoreDesignation>().unwrap(),
            CoreDesignation::Expected
        );
        assert_eq!(
            "perm".parse::<CoreDesignation>().unwrap(),
            CoreDesignation::Permissible
        );
    }

    #[test]
    fn test_missing_severity() {
        let report = PermissibleMissing::Report;
        let suppress = PermissibleMissing::Suppress;
        assert_eq!(
            CoreDesignation::Required.missing_severity(suppress),
            Some(Severity::Error)
        );
        assert_eq!(
            CoreDesignation::Expected.missing_severity(suppress),
            Some(Severity::Warning)
        );
        assert_eq!(
            CoreDesignation::Permissible.missing_severity(report),
            Some(Severity::Info)
        );
        assert_eq!(CoreDesignation::Permissible.missing_severity(suppress), None);
    }

    #[test]
    fn test_dataset_class_from_str() {
        assert_eq!(
            "Special-Purpose".parse::<DatasetClass>().unwrap(),
            DatasetClass::SpecialPurpose
        );
        assert_eq!(
            "findings about".parse::<DatasetClass>().unwrap(),
            DatasetClass::FindingsAbout
        );
    }
}
