//! Study folder discovery and CSV ingest.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::{debug, info, warn};

use sdtm_core::DomainInput;
use sdtm_model::{DomainFailure, MappingConfig};
use sdtm_standards::DomainRegistry;

/// A CSV file whose stem names a known domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFile {
    pub domain_code: String,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<DomainFile>,
    /// CSV files that matched no domain.
    pub skipped: Vec<PathBuf>,
}

/// `<DOMAIN>.csv` files in `folder`, sorted by file name. Stems match
/// domain codes case-insensitively.
pub fn discover_domain_files(folder: &Path, registry: &DomainRegistry) -> Result<Discovery> {
    let entries = std::fs::read_dir(folder)
        .with_context(|| format!("read study folder {}", folder.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("read study folder {}", folder.display()))?
            .path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }
    paths.sort();

    let mut discovery = Discovery::default();
    for path in paths {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        match registry.get(stem) {
            Some(domain) => discovery.files.push(DomainFile {
                domain_code: domain.code.clone(),
                path,
            }),
            None => {
                debug!(path = %path.display(), "no domain for file");
                discovery.skipped.push(path);
            }
        }
    }
    info!(
        files = discovery.files.len(),
        skipped = discovery.skipped.len(),
        "study folder scanned"
    );
    Ok(discovery)
}

/// Read a CSV with every column as text.
pub fn read_domain_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to read CSV: {}", path.display()))
}

/// Mapping configurations from a JSON array.
pub fn load_mappings(path: &Path) -> Result<Vec<MappingConfig>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read mapping file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse mapping file {}", path.display()))
}

/// The configuration for `domain_code`, or an empty one. A configuration
/// without a study id inherits `study_id`.
pub fn mapping_for(mappings: &[MappingConfig], domain_code: &str, study_id: &str) -> MappingConfig {
    let mut mapping = mappings
        .iter()
        .find(|mapping| mapping.domain_code.eq_ignore_ascii_case(domain_code))
        .cloned()
        .unwrap_or_else(|| MappingConfig::new(domain_code, study_id));
    mapping.domain_code = domain_code.to_string();
    if mapping.study_id.is_empty() {
        mapping.study_id = study_id.to_string();
    }
    mapping
}

/// Pipeline inputs plus the files that could not be read.
#[derive(Debug, Default)]
pub struct LoadedInputs {
    pub inputs: Vec<DomainInput>,
    pub failures: Vec<DomainFailure>,
}

/// Read every discovered file into a pipeline input. A file that cannot be
/// read becomes a failure for its domain; the others still load.
pub fn load_inputs(
    files: &[DomainFile],
    mappings: &[MappingConfig],
    study_id: &str,
) -> LoadedInputs {
    let mut loaded = LoadedInputs::default();
    for file in files {
        match read_domain_csv(&file.path) {
            Ok(data) => {
                debug!(
                    domain_code = %file.domain_code,
                    rows = data.height(),
                    columns = data.width(),
                    "domain file loaded"
                );
                loaded.inputs.push(DomainInput::new(
                    mapping_for(mappings, &file.domain_code, study_id),
                    data,
                ));
            }
            Err(error) => {
                let message = format!("{error:#}");
                warn!(
                    domain_code = %file.domain_code,
                    error = %message,
                    "domain file unreadable"
                );
                loaded.failures.push(DomainFailure {
                    domain_code: file.domain_code.clone(),
                    message,
                });
            }
        }
    }
    loaded
}

/// First two `_`-separated parts of the folder name.
pub fn derive_study_id(study_folder: &Path) -> String {
    let name = study_folder
        .file_name()
        .and_then(|v| v.to_str())
        .unwrap_or("STUDY");
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() >= 2 {
        format!("{}_{}", parts[0], parts[1])
    } else {
        name.to_string()
    }
}
