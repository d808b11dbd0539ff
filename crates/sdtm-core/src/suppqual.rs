//! SUPP-- record extraction.

use polars::prelude::*;
use tracing::debug;

use sdtm_common::{ColumnReader, any_to_string_non_empty, string_column};
use sdtm_model::{CaseInsensitiveSet, Domain, MappingConfig, SUPP_COLUMNS, SupplementalRecord};

use crate::qnam::QnamAllocator;

pub const QLABEL_MAX_LEN: usize = 40;

pub fn supp_domain_code(parent_domain: &str) -> String {
    format!("SUPP{}", parent_domain.to_uppercase())
}

/// Names of the variables a domain declares; any other column is supplemental.
pub fn standard_variable_names(domain: &Domain) -> CaseInsensitiveSet {
    CaseInsensitiveSet::new(domain.variable_names())
}

fn truncate_label(label: &str) -> String {
    label.chars().take(QLABEL_MAX_LEN).collect()
}

/// Columns of `df` that are not standard variables, in table order.
pub fn supplemental_columns(df: &DataFrame, standard: &CaseInsensitiveSet) -> Vec<String> {
    df.get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .filter(|name| !standard.contains(name))
        .collect()
}

/// One record per non-empty cell of every supplemental column.
///
/// Records are grouped by QNAM in column order, then follow row order.
/// QNAMs are assigned to every supplemental column, including those with no
/// values, so assignments depend only on the column list.
pub fn build_supplemental(
    domain: &Domain,
    df: &DataFrame,
    standard: &CaseInsensitiveSet,
    mapping: &MappingConfig,
) -> Vec<SupplementalRecord> {
    let reader = ColumnReader::new(df);
    let id_variable = domain
        .sequence_variable()
        .filter(|variable| reader.has(&variable.name))
        .map(|variable| variable.name.clone());

    let mut allocator = QnamAllocator::new();
    let mut records = Vec::new();
    for column in supplemental_columns(df, standard) {
        let qnam = allocator.allocate(&column);
        let meta = mapping.supplemental_meta(&column);
        let qlabel = meta
            .and_then(|meta| meta.qlabel.as_deref())
            .map_or_else(|| truncate_label(&column), truncate_label);
        let qorig = meta.and_then(|m| m.qorig.clone()).unwrap_or_default();
        let qeval = meta.and_then(|m| m.qeval.clone()).unwrap_or_default();

        let Ok(cells) = df.column(&column) else {
            continue;
        };
        let before = records.len();
        for idx in 0..df.height() {
            let Some(raw) = cells.get(idx).ok().and_then(any_to_string_non_empty) else {
                continue;
            };
            let row_study = reader.value("STUDYID", idx);
            let studyid = match row_study.trim() {
                "" => mapping.study_id.clone(),
                value => value.to_string(),
            };
            let (idvar, idvarval) = match &id_variable {
                Some(name) => (name.clone(), reader.value(name, idx).trim().to_string()),
                None => (String::new(), String::new()),
            };
            records.push(SupplementalRecord {
                studyid,
                rdomain: domain.code.clone(),
                usubjid: reader.value("USUBJID", idx).trim().to_string(),
                idvar,
                idvarval,
                qnam: qnam.clone(),
                qlabel: qlabel.clone(),
                qval: raw,
                qorig: qorig.clone(),
                qeval: qeval.clone(),
            });
        }
        debug!(
            domain_code = %domain.code,
            column = %column,
            qnam = %qnam,
            records = records.len() - before,
            "supplemental column extracted"
        );
    }
    records
}

/// SUPP-- dataset with the ten standard columns.
pub fn supplemental_frame(records: &[SupplementalRecord]) -> PolarsResult<DataFrame> {
    let columns = SUPP_COLUMNS
        .iter()
        .enumerate()
        .map(|(position, name)| {
            let values = records
                .iter()
                .map(|record| Some(record.values()[position].to_string()))
                .collect();
            string_column(name, values)
        })
        .collect();
    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdtm_model::{CoreDesignation, DatasetClass, Variable, VariableRole};

    fn dm() -> Domain {
        Domain::new(
            "DM",
            "Demographics",
            DatasetClass::SpecialPurpose,
            vec![
                Variable::new("STUDYID", VariableRole::Identifier, CoreDesignation::Required),
                Variable::new("USUBJID", VariableRole::Identifier, CoreDesignation::Required),
                Variable::new("SEX", VariableRole::Qualifier, CoreDesignation::Required),
            ],
        )
        .unwrap()
    }

    #[test]
    fn supp_domain_code_is_prefixed() {
        assert_eq!(supp_domain_code("ae"), "SUPPAE");
    }

    #[test]
    fn subject_level_records_leave_idvar_blank() {
        let df = DataFrame::new(vec![
            Column::new("USUBJID".into(), ["S-01", "S-02"]),
            Column::new("SEX".into(), ["F", "M"]),
            Column::new("Ethnic Subgroup".into(), ["", "Basque"]),
        ])
        .unwrap();
        let domain = dm();
        let records = build_supplemental(
            &domain,
            &df,
            &standard_variable_names(&domain),
            &MappingConfig::new("DM", "STUDY9"),
        );
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.studyid, "STUDY9");
        assert_eq!(record.usubjid, "S-02");
        assert_eq!(record.qnam, "ETHNICSU");
        assert_eq!(record.qlabel, "Ethnic Subgroup");
        assert!(record.idvar.is_empty() && record.idvarval.is_empty());
    }

    #[test]
    fn long_labels_are_truncated() {
        let label = "A".repeat(55);
        assert_eq!(truncate_label(&label).len(), QLABEL_MAX_LEN);
    }

    #[test]
    fn frame_has_supp_columns_in_order() {
        let record = SupplementalRecord {
            qnam: "X".to_string(),
            ..SupplementalRecord::default()
        };
        let df = supplemental_frame(&[record]).unwrap();
        let names: Vec<String> = df
            .get_column_names_owned()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, SUPP_COLUMNS);
        assert_eq!(df.height(), 1);
    }
}
