//! Controlled terminology checks.
//!
//! Every distinct raw value of a CT-governed column is resolved once. Values
//! left unresolved against a non-extensible codelist become one issue per
//! distinct value, in first-seen order, carrying the number of rows that
//! hold it.

use std::collections::HashMap;

use sdtm_model::{
    Codelist, NormalizationOptions, Severity, ValidationIssue, Variable, issue_codes,
};
use sdtm_transform::normalize;

pub(crate) fn check(
    variable: &Variable,
    codelist: &Codelist,
    values: &[Option<String>],
    options: &NormalizationOptions,
) -> Vec<ValidationIssue> {
    if codelist.extensible {
        return Vec::new();
    }

    let mut distinct: Vec<(&str, u64)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for raw in values.iter().flatten() {
        match positions.get(raw.as_str()) {
            Some(&idx) => distinct[idx].1 += 1,
            None => {
                positions.insert(raw.as_str(), distinct.len());
                distinct.push((raw.as_str(), 1));
            }
        }
    }

    distinct
        .into_iter()
        .filter(|(raw, _)| !normalize(codelist, raw, options).conforms_to(codelist))
        .map(|(raw, rows)| {
            ValidationIssue::new(
                Severity::Error,
                issue_codes::CT_NOT_IN_CODELIST,
                format!(
                    "Value {raw:?} for {} is not in codelist {} ({})",
                    variable.name, codelist.name, codelist.code
                ),
            )
            .with_variable(&variable.name)
            .with_row_count(rows)
            .with_codelist(&codelist.code)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdtm_model::{CoreDesignation, Term, VariableRole};

    fn severity_codelist(extensible: bool) -> Codelist {
        Codelist::with_terms(
            "C66769",
            "Severity/Intensity Scale for Adverse Events",
            extensible,
            [Term::new("MILD"), Term::new("MODERATE"), Term::new("SEVERE")],
        )
        .unwrap()
    }

    fn aesev() -> Variable {
        Variable::new("AESEV", VariableRole::Qualifier, CoreDesignation::Permissible)
            .with_codelist("C66769")
    }

    fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(String::from)).collect()
    }

    #[test]
    fn groups_rows_by_distinct_value() {
        let values = cells(&[
            Some("MILD"),
            Some("Grade 3"),
            None,
            Some("Grade 2"),
            Some("Grade 3"),
            Some(""),
        ]);
        let issues = check(
            &aesev(),
            &severity_codelist(false),
            &values,
            &NormalizationOptions::strict(),
        );
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("\"Grade 3\""));
        assert_eq!(issues[0].row_count, Some(2));
        assert_eq!(issues[1].row_count, Some(1));
        assert_eq!(issues[1].codelist_code.as_deref(), Some("C66769"));
    }

    #[test]
    fn extensible_codelist_accepts_novel_values() {
        let values = cells(&[Some("Grade 3")]);
        let issues = check(
            &aesev(),
            &severity_codelist(true),
            &values,
            &NormalizationOptions::strict(),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn lenient_matches_are_not_findings() {
        let values = cells(&[Some("mild"), Some("Moderate ")]);
        let issues = check(
            &aesev(),
            &severity_codelist(false),
            &values,
            &NormalizationOptions::lenient(),
        );
        assert!(issues.is_empty());
    }
}
