//! Domain conformance validation.
//!
//! [`validate_domain`] checks a materialized domain table against its
//! [`Domain`] definition: one presence finding per missing variable and one
//! terminology finding per distinct non-conforming value. The table is never
//! modified. Codelist references that do not resolve are configuration
//! errors and abort validation before any check runs.

mod checks;
pub mod error;
pub mod report;

use std::collections::BTreeMap;
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info_span};

use sdtm_common::ColumnReader;
use sdtm_model::{
    CodelistLookup, Domain, MappingConfig, NormalizationOptions, ValidationOptions,
    ValidationReport,
};
use sdtm_transform::{TransformError, resolve_codelists};

pub use error::{Result, ValidationError};
pub use report::{
    REPORT_FILE_NAME, REPORT_SCHEMA, REPORT_SCHEMA_VERSION, conformance_payload, issue_fingerprint,
    write_conformance_report_json,
};

/// Everything a validation run needs besides the domain and its table.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    pub lookup: &'a dyn CodelistLookup,
    pub normalization: NormalizationOptions,
    pub options: ValidationOptions,
    pub mapping: Option<&'a MappingConfig>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(lookup: &'a dyn CodelistLookup) -> Self {
        Self {
            lookup,
            normalization: NormalizationOptions::default(),
            options: ValidationOptions::default(),
            mapping: None,
        }
    }

    pub fn with_normalization(mut self, normalization: NormalizationOptions) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Mapping whose `not_collected` reasons downgrade missing variables.
    pub fn with_mapping(mut self, mapping: &'a MappingConfig) -> Self {
        self.mapping = Some(mapping);
        self
    }

    fn not_collected_reason(&self, variable: &str) -> Option<&'a str> {
        self.mapping?.not_collected_reason(variable)
    }
}

/// Validate one domain table. Issues follow variable declaration order,
/// then first-seen order of distinct values within a variable.
pub fn validate_domain(
    domain: &Domain,
    df: &DataFrame,
    ctx: &ValidationContext<'_>,
) -> Result<ValidationReport> {
    let span = info_span!("validate", domain_code = %domain.code);
    let _guard = span.enter();
    let started = Instant::now();

    let codelists: BTreeMap<&str, _> = resolve_codelists(domain, ctx.lookup)
        .map_err(|err| match err {
            TransformError::UnknownCodelist { variable, codelist } => {
                ValidationError::UnknownCodelist { variable, codelist }
            }
            other => ValidationError::Transform(other),
        })?
        .into_iter()
        .map(|(variable, codelist)| (variable.name.as_str(), codelist))
        .collect();

    let reader = ColumnReader::new(df);
    let mut report = ValidationReport::new(&domain.code);

    for variable in domain.variables() {
        if !reader.has(&variable.name) {
            let reason = ctx.not_collected_reason(&variable.name);
            if let Some(issue) =
                checks::presence::missing_column_issue(variable, ctx.options.permissible_missing, reason)
            {
                report.push(issue);
            }
            continue;
        }

        let Some(codelist) = codelists.get(variable.name.as_str()) else {
            continue;
        };
        let Some(values) = reader.values(&variable.name)? else {
            continue;
        };
        for issue in checks::ct::check(variable, codelist, &values, &ctx.normalization) {
            report.push(issue);
        }
    }

    debug!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        infos = report.info_count(),
        duration_ms = started.elapsed().as_millis(),
        "validation complete"
    );
    Ok(report)
}
