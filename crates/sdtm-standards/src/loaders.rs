//! Domain metadata loader for the SDTMIG Datasets.csv / Variables.csv pair.

use std::collections::BTreeMap;
use std::path::Path;

use sdtm_model::{CoreDesignation, DatasetClass, Domain, Variable, VariableRole, VariableType};
use tracing::{debug, info};

use crate::csv_utils::{CsvRow, get_field, get_optional, read_csv_rows};
use crate::ct_loader::load_ct_registry;
use crate::error::{Result, StandardsError};
use crate::paths::StandardsPaths;
use crate::registry::{DomainRegistry, TerminologyRegistry};

/// Both registries from one standards layout.
pub fn load_standards(paths: &StandardsPaths) -> Result<(DomainRegistry, TerminologyRegistry)> {
    let domains = load_domain_registry(&paths.datasets, &paths.variables)?;
    let terminology = load_ct_registry(&paths.ct)?;
    Ok((domains, terminology))
}

pub fn load_domain_registry(datasets_csv: &Path, variables_csv: &Path) -> Result<DomainRegistry> {
    let domains = load_domains(datasets_csv, variables_csv)?;
    info!(domains = domains.len(), "domain metadata loaded");
    Ok(DomainRegistry::new(domains))
}

/// Domains in Datasets.csv order, each with its variables sorted by
/// `Variable Order` (file order when absent).
pub fn load_domains(datasets_csv: &Path, variables_csv: &Path) -> Result<Vec<Domain>> {
    let datasets = read_csv_rows(datasets_csv)?;
    let variables = read_csv_rows(variables_csv)?;

    let mut grouped: BTreeMap<String, Vec<(usize, Variable)>> = BTreeMap::new();
    for (position, row) in variables.iter().enumerate() {
        let dataset = get_field(row, "Dataset Name").to_ascii_uppercase();
        if dataset.is_empty() {
            continue;
        }
        let variable = parse_variable(row, variables_csv)?;
        grouped.entry(dataset).or_default().push((position, variable));
    }

    let mut domains = Vec::with_capacity(datasets.len());
    for row in &datasets {
        let code = get_field(row, "Dataset Name").to_ascii_uppercase();
        if code.is_empty() {
            continue;
        }
        let class_raw = get_field(row, "Class");
        let class: DatasetClass = class_raw.parse().map_err(|message: String| {
            StandardsError::metadata(datasets_csv, format!("{code}: {message}"))
        })?;
        let name = get_optional(row, "Dataset Label").unwrap_or_else(|| code.clone());

        let mut vars = grouped.remove(&code).unwrap_or_default();
        vars.sort_by_key(|(position, variable)| (variable.order.unwrap_or(u32::MAX), *position));
        let vars = vars.into_iter().map(|(_, variable)| variable).collect();

        domains.push(Domain::new(code, name, class, vars)?);
    }

    for dataset in grouped.keys() {
        debug!(dataset = %dataset, "variables without a dataset definition skipped");
    }
    Ok(domains)
}

fn parse_variable(row: &CsvRow, path: &Path) -> Result<Variable> {
    let name = get_optional(row, "Variable Name")
        .ok_or_else(|| StandardsError::metadata(path, "missing Variable Name"))?;
    let invalid = |message: String| StandardsError::metadata(path, format!("{name}: {message}"));

    let role = match get_optional(row, "Role") {
        Some(raw) => raw.parse::<VariableRole>().map_err(invalid)?,
        None => VariableRole::Qualifier,
    };
    let core = match get_optional(row, "Core") {
        Some(raw) => raw.parse::<CoreDesignation>().map_err(invalid)?,
        None => CoreDesignation::Permissible,
    };
    let data_type = match get_optional(row, "Type") {
        Some(raw) => raw.parse::<VariableType>().map_err(invalid)?,
        None => VariableType::Char,
    };

    Ok(Variable {
        label: get_optional(row, "Variable Label"),
        data_type,
        length: get_optional(row, "Length").and_then(|v| v.parse().ok()),
        role,
        core,
        codelist_code: governing_codelist(&get_field(row, "CDISC CT Codelist Code(s)")),
        order: get_optional(row, "Variable Order").and_then(|v| v.parse().ok()),
        name,
    })
}

/// First listed codelist code; the rest are alternates.
fn governing_codelist(raw: &str) -> Option<String> {
    raw.split([';', ',', ' '])
        .map(str::trim)
        .find(|code| !code.is_empty())
        .map(String::from)
}
