use serde::Serialize;

use crate::enums::{CoreDesignation, DatasetClass, VariableRole, VariableType};
use crate::error::{Result, SdtmError};

/// One column definition within a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub label: Option<String>,
    pub data_type: VariableType,
    pub length: Option<u32>,
    pub role: VariableRole,
    pub core: CoreDesignation,
    /// Governing codelist code, if the variable is CT-controlled.
    pub codelist_code: Option<String>,
    pub order: Option<u32>,
}

impl Variable {
    pub fn new(name: impl Into<String>, role: VariableRole, core: CoreDesignation) -> Self {
        Self {
            name: name.into(),
            label: None,
            data_type: VariableType::Char,
            length: None,
            role,
            core,
            codelist_code: None,
            order: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_type(mut self, data_type: VariableType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_codelist(mut self, code: impl Into<String>) -> Self {
        self.codelist_code = Some(code.into());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

/// A standardized dataset's metadata.
///
/// Variable order is the canonical output column order. Names are unique
/// within a domain, compared case-insensitively.
#[derive(Debug, Clone, Serialize)]
pub struct Domain {
    pub code: String,
    pub name: String,
    pub class: DatasetClass,
    variables: Vec<Variable>,
}

impl Domain {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        class: DatasetClass,
        variables: Vec<Variable>,
    ) -> Result<Self> {
        let code = code.into();
        let mut seen = std::collections::HashSet::new();
        for variable in &variables {
            if !seen.insert(variable.name.to_ascii_uppercase()) {
                return Err(SdtmError::DuplicateVariable {
                    domain: code,
                    variable: variable.name.clone(),
                });
            }
        }
        Ok(Self {
            code,
            name: name.into(),
            class,
            variables,
        })
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Case-insensitive lookup by variable name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables
            .iter()
            .find(|variable| variable.name.eq_ignore_ascii_case(name))
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|variable| variable.name.as_str())
    }

    /// Variables that carry a codelist reference, in declaration order.
    pub fn codelist_variables(&self) -> impl Iterator<Item = (&Variable, &str)> {
        self.variables.iter().filter_map(|variable| {
            variable
                .codelist_code
                .as_deref()
                .map(|code| (variable, code))
        })
    }

    /// The sequence-like variable that identifies a record within a subject.
    ///
    /// `<DOMAIN>SEQ` wins, then the alphabetically first `--SEQ`, then the
    /// first `--GRPID`.
    pub fn sequence_variable(&self) -> Option<&Variable> {
        let preferred = format!("{}SEQ", self.code.to_ascii_uppercase());
        if let Some(variable) = self.variable(&preferred) {
            return Some(variable);
        }
        let seq = self
            .variables
            .iter()
            .filter(|variable| variable.name.to_ascii_uppercase().ends_with("SEQ"))
            .min_by_key(|variable| variable.name.to_ascii_uppercase());
        if seq.is_some() {
            return seq;
        }
        self.variables
            .iter()
            .find(|variable| variable.name.to_ascii_uppercase().ends_with("GRPID"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Variable {
        Variable::new(name, VariableRole::Identifier, CoreDesignation::Required)
    }

    #[test]
    fn duplicate_variable_names_are_rejected() {
        let err = Domain::new(
            "AE",
            "Adverse Events",
            DatasetClass::Events,
            vec![var("AESEQ"), var("aeseq")],
        )
        .unwrap_err();
        assert!(matches!(err, SdtmError::DuplicateVariable { .. }));
    }

    #[test]
    fn sequence_variable_prefers_domain_seq() {
        let domain = Domain::new(
            "AE",
            "Adverse Events",
            DatasetClass::Events,
            vec![var("STUDYID"), var("AAASEQ"), var("AESEQ")],
        )
        .expect("domain");
        assert_eq!(domain.sequence_variable().map(|v| v.name.as_str()), Some("AESEQ"));
    }

    #[test]
    fn sequence_variable_falls_back_to_grpid() {
        let domain = Domain::new(
            "TS",
            "Trial Summary",
            DatasetClass::TrialDesign,
            vec![var("STUDYID"), var("TSGRPID"), var("TSPARMCD")],
        )
        .expect("domain");
        assert_eq!(
            domain.sequence_variable().map(|v| v.name.as_str()),
            Some("TSGRPID")
        );

        let bare = Domain::new(
            "DM",
            "Demographics",
            DatasetClass::SpecialPurpose,
            vec![var("STUDYID"), var("USUBJID")],
        )
        .expect("domain");
        assert!(bare.sequence_variable().is_none());
    }
}
