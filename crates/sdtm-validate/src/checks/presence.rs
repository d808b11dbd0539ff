//! Variable presence checks (SDTMIG 4.1.5).
//!
//! A missing column is reported at the severity its core designation
//! implies. A caller-declared "not collected" reason turns a Required or
//! Expected finding into an informational note that carries the reason.

use sdtm_model::{
    CoreDesignation, PermissibleMissing, Severity, ValidationIssue, Variable, issue_codes,
};

pub(crate) fn missing_column_issue(
    variable: &Variable,
    permissible: PermissibleMissing,
    not_collected: Option<&str>,
) -> Option<ValidationIssue> {
    let severity = variable.core.missing_severity(permissible)?;

    if let Some(reason) = not_collected
        && variable.core != CoreDesignation::Permissible
    {
        return Some(
            ValidationIssue::new(
                Severity::Info,
                issue_codes::NOT_COLLECTED,
                format!(
                    "SDTM {} variable not collected: {} ({reason})",
                    variable.core, variable.name
                ),
            )
            .with_variable(&variable.name),
        );
    }

    let code = match variable.core {
        CoreDesignation::Required => issue_codes::MISSING_REQUIRED,
        CoreDesignation::Expected => issue_codes::MISSING_EXPECTED,
        CoreDesignation::Permissible => issue_codes::MISSING_PERMISSIBLE,
    };
    Some(
        ValidationIssue::new(
            severity,
            code,
            format!("SDTM {} variable not found: {}", variable.core, variable.name),
        )
        .with_variable(&variable.name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdtm_model::VariableRole;

    fn variable(core: CoreDesignation) -> Variable {
        Variable::new("AESEV", VariableRole::Qualifier, core)
    }

    #[test]
    fn required_missing_is_an_error() {
        let issue =
            missing_column_issue(&variable(CoreDesignation::Required), PermissibleMissing::Report, None)
                .unwrap();
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.code, "SDTMIG_REQ");
        assert_eq!(issue.message, "SDTM Required variable not found: AESEV");
    }

    #[test]
    fn not_collected_downgrades_to_info() {
        let issue = missing_column_issue(
            &variable(CoreDesignation::Expected),
            PermissibleMissing::Report,
            Some("not captured on CRF"),
        )
        .unwrap();
        assert_eq!(issue.severity, Severity::Info);
        assert_eq!(issue.code, "SDTMIG_NOTCOLL");
        assert!(issue.message.contains("not captured on CRF"));
    }

    #[test]
    fn suppressed_permissible_emits_nothing() {
        assert!(
            missing_column_issue(
                &variable(CoreDesignation::Permissible),
                PermissibleMissing::Suppress,
                Some("ignored"),
            )
            .is_none()
        );
    }
}
