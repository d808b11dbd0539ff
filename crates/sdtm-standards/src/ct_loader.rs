//! Controlled terminology loader for the CDISC CT CSV export.
//!
//! Codelist rows have a blank `Codelist Code`; term rows name their parent
//! there. Rows are indexed by codelist at load time and turned into
//! [`sdtm_model::Codelist`]s on first lookup.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::csv_utils::{CsvRow, get_field, get_optional, read_csv_rows, read_csv_rows_from};
use crate::error::{Result, StandardsError};
use crate::registry::{PendingCodelist, PendingTerm, TerminologyRegistry};

/// Load a CT registry from a CT CSV file or a directory of them.
///
/// Directory entries are read in file-name order; a codelist defined in an
/// earlier file shadows later definitions.
pub fn load_ct_registry(path: &Path) -> Result<TerminologyRegistry> {
    let files = ct_files(path)?;
    let mut rows = Vec::new();
    for file in &files {
        rows.extend(read_csv_rows(file)?);
    }
    let codelists = index_rows(&rows, path)?;
    info!(
        path = %path.display(),
        files = files.len(),
        codelists = codelists.len(),
        "terminology indexed"
    );
    Ok(TerminologyRegistry::from_pending(codelists))
}

impl TerminologyRegistry {
    /// Lazy registry over CT CSV content from any reader.
    pub fn from_ct_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let rows = read_csv_rows_from(reader, origin)?;
        Ok(Self::from_pending(index_rows(&rows, origin)?))
    }
}

fn ct_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let entries = std::fs::read_dir(path).map_err(|e| StandardsError::io(path, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StandardsError::io(path, e))?;
        let file = entry.path();
        let is_csv = file
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if file.is_file() && is_csv {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

fn index_rows(rows: &[CsvRow], origin: &Path) -> Result<Vec<PendingCodelist>> {
    let mut order: Vec<PendingCodelist> = Vec::new();
    let mut by_code: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let code = get_field(row, "Code");
        let parent = get_field(row, "Codelist Code");
        if parent.is_empty() && !code.is_empty() {
            let key = code.to_ascii_uppercase();
            if by_code.contains_key(&key) {
                warn!(codelist = %code, "codelist defined more than once, keeping first");
                continue;
            }
            let name = get_optional(row, "Codelist Name")
                .or_else(|| get_optional(row, "CDISC Submission Value"))
                .unwrap_or_else(|| code.clone());
            let extensible =
                get_field(row, "Codelist Extensible (Yes/No)").eq_ignore_ascii_case("yes");
            by_code.insert(key, order.len());
            order.push(PendingCodelist {
                code,
                name,
                extensible,
                terms: Vec::new(),
            });
        }
    }

    for row in rows {
        let parent = get_field(row, "Codelist Code");
        let submission_value = get_field(row, "CDISC Submission Value");
        if parent.is_empty() || submission_value.is_empty() {
            continue;
        }
        let Some(&idx) = by_code.get(&parent.to_ascii_uppercase()) else {
            return Err(StandardsError::metadata(
                origin,
                format!("term {submission_value:?} references unknown codelist {parent}"),
            ));
        };
        order[idx].terms.push(PendingTerm {
            code: get_optional(row, "Code"),
            submission_value,
            synonyms: get_field(row, "CDISC Synonym(s)"),
            decode: get_optional(row, "NCI Preferred Term"),
        });
    }

    Ok(order)
}

/// Parse semicolon-separated synonyms.
pub fn parse_synonyms(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_synonym_lists() {
        assert_eq!(parse_synonyms("Male; M ;"), vec!["Male", "M"]);
        assert!(parse_synonyms("  ").is_empty());
    }

    #[test]
    fn orphan_term_is_an_error() {
        let data = "Code,Codelist Code,Codelist Extensible (Yes/No),Codelist Name,CDISC Submission Value\n\
                    C1,C999,,,X\n";
        let err = TerminologyRegistry::from_ct_reader(data.as_bytes(), Path::new("ct.csv"))
            .unwrap_err();
        assert!(matches!(err, StandardsError::InvalidMetadata { .. }));
    }
}
