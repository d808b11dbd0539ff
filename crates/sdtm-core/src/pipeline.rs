//! Study pipeline.
//!
//! Each domain runs mapping, CT normalization, validation and supplemental
//! extraction in that order, then hands the results to every registered
//! [`OutputAdapter`]. Domains are independent and run in parallel; a failure
//! is recorded against its domain and the rest of the study carries on.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use sdtm_common::ColumnReader;
use sdtm_model::{
    CodelistLookup, Domain, DomainFailure, DomainResult, MappingConfig, NormalizationOptions,
    StudyReport, SupplementalRecord, ValidationOptions, ValidationReport,
};
use sdtm_standards::DomainRegistry;
use sdtm_transform::{ResolutionTally, normalize_domain_frame};
use sdtm_validate::{ValidationContext, validate_domain};

use crate::error::{CollaboratorError, PipelineError, Result};
use crate::suppqual::{build_supplemental, standard_variable_names};

/// Turns a source table into a table whose columns are named by domain
/// variables.
pub trait DomainMapper: Send + Sync {
    fn name(&self) -> &str;

    fn map(
        &self,
        domain: &Domain,
        source: &DataFrame,
        mapping: &MappingConfig,
    ) -> std::result::Result<DataFrame, CollaboratorError>;
}

/// Renames source columns per [`MappingConfig::mappings`]. Source names
/// match case-insensitively; absent sources are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameMapper;

impl DomainMapper for RenameMapper {
    fn name(&self) -> &str {
        "rename"
    }

    fn map(
        &self,
        domain: &Domain,
        source: &DataFrame,
        mapping: &MappingConfig,
    ) -> std::result::Result<DataFrame, CollaboratorError> {
        let reader = ColumnReader::new(source);
        let mut renames = Vec::new();
        for (from, to) in &mapping.mappings {
            match reader.resolve(from) {
                Some(actual) if actual != to => renames.push((actual.to_string(), to.clone())),
                Some(_) => {}
                None => debug!(domain_code = %domain.code, column = %from, "mapped column absent"),
            }
        }

        let mut df = source.clone();
        for (from, to) in renames {
            df.rename(&from, to.into())?;
        }
        Ok(df)
    }
}

/// Everything the pipeline produced for one domain.
pub struct DomainOutput<'a> {
    pub study_id: &'a str,
    pub domain: &'a Domain,
    /// Normalized table restricted to the domain's standard variables.
    pub data: &'a DataFrame,
    pub report: &'a ValidationReport,
    pub supplemental: &'a [SupplementalRecord],
}

/// Receives per-domain results, typically to persist them.
pub trait OutputAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn write_domain(&self, output: &DomainOutput<'_>) -> std::result::Result<(), CollaboratorError>;
}

/// Study-wide cancellation flag, checked before each domain starts.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A materialized source table and the configuration that maps it.
#[derive(Debug, Clone)]
pub struct DomainInput {
    pub mapping: MappingConfig,
    pub data: DataFrame,
}

impl DomainInput {
    pub fn new(mapping: MappingConfig, data: DataFrame) -> Self {
        Self { mapping, data }
    }
}

/// Result of one successful domain run.
#[derive(Debug, Clone)]
pub struct DomainRun {
    pub result: DomainResult,
    pub data: DataFrame,
    pub supplemental: Vec<SupplementalRecord>,
    pub tally: BTreeMap<String, ResolutionTally>,
}

enum Outcome {
    Completed(DomainResult),
    Failed(DomainFailure),
    Cancelled(String),
}

pub struct StudyPipeline<'a> {
    domains: &'a DomainRegistry,
    terminology: &'a dyn CodelistLookup,
    normalization: NormalizationOptions,
    validation: ValidationOptions,
    mapper: Box<dyn DomainMapper + 'a>,
    outputs: Vec<Box<dyn OutputAdapter + 'a>>,
}

impl<'a> StudyPipeline<'a> {
    pub fn new(domains: &'a DomainRegistry, terminology: &'a dyn CodelistLookup) -> Self {
        Self {
            domains,
            terminology,
            normalization: NormalizationOptions::default(),
            validation: ValidationOptions::default(),
            mapper: Box::new(RenameMapper),
            outputs: Vec::new(),
        }
    }

    pub fn with_normalization(mut self, normalization: NormalizationOptions) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_validation(mut self, validation: ValidationOptions) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_mapper(mut self, mapper: impl DomainMapper + 'a) -> Self {
        self.mapper = Box::new(mapper);
        self
    }

    pub fn with_output(mut self, output: impl OutputAdapter + 'a) -> Self {
        self.outputs.push(Box::new(output));
        self
    }

    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|output| output.name()).collect()
    }

    /// Run every domain. Always returns a report; per-domain errors become
    /// [`DomainFailure`]s. Results keep input order.
    pub fn run(&self, study_id: &str, inputs: &[DomainInput], cancel: &CancelToken) -> StudyReport {
        let span = info_span!("study", study_id = %study_id, domains = inputs.len());
        let start = Instant::now();

        let outcomes: Vec<Outcome> = inputs
            .par_iter()
            .map(|input| {
                let domain_code = input.mapping.domain_code.to_uppercase();
                if cancel.is_cancelled() {
                    return Outcome::Cancelled(domain_code);
                }
                span.in_scope(|| match self.process_domain(study_id, input) {
                    Ok(run) => Outcome::Completed(run.result),
                    Err(error) => {
                        warn!(domain_code = %domain_code, error = %error, "domain failed");
                        Outcome::Failed(DomainFailure {
                            domain_code,
                            message: error.to_string(),
                        })
                    }
                })
            })
            .collect();

        let mut report = StudyReport {
            study_id: study_id.to_string(),
            ..StudyReport::default()
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Completed(result) => report.results.push(result),
                Outcome::Failed(failure) => report.failures.push(failure),
                Outcome::Cancelled(code) => report.cancelled.push(code),
            }
        }

        span.in_scope(|| {
            info!(
                completed = report.results.len(),
                failed = report.failures.len(),
                cancelled = report.cancelled.len(),
                errors = report.error_count(),
                warnings = report.warning_count(),
                duration_ms = start.elapsed().as_millis(),
                "study run complete"
            );
        });
        report
    }

    /// Map, normalize, validate and extract qualifiers for one domain, then
    /// forward the results to every output adapter.
    pub fn process_domain(&self, study_id: &str, input: &DomainInput) -> Result<DomainRun> {
        let span = info_span!("domain", domain_code = %input.mapping.domain_code);
        let _guard = span.enter();
        let start = Instant::now();

        let domain = self.domains.require(&input.mapping.domain_code)?;
        let mapped = self
            .mapper
            .map(domain, &input.data, &input.mapping)
            .map_err(|source| PipelineError::Mapping {
                domain_code: domain.code.clone(),
                source,
            })?;
        debug!(mapper = self.mapper.name(), columns = mapped.width(), "domain mapped");

        let normalized =
            normalize_domain_frame(domain, &mapped, self.terminology, &self.normalization)?;

        let ctx = ValidationContext::new(self.terminology)
            .with_normalization(self.normalization)
            .with_options(self.validation)
            .with_mapping(&input.mapping);
        let report = validate_domain(domain, &normalized.data, &ctx)?;

        let standard = standard_variable_names(domain);
        let supplemental = build_supplemental(domain, &normalized.data, &standard, &input.mapping);
        let reader = ColumnReader::new(&normalized.data);
        let kept: Vec<String> = domain
            .variables()
            .iter()
            .filter_map(|variable| reader.resolve(&variable.name))
            .map(str::to_string)
            .collect();
        let data = normalized.data.select(kept)?;

        let output = DomainOutput {
            study_id,
            domain,
            data: &data,
            report: &report,
            supplemental: &supplemental,
        };
        for adapter in &self.outputs {
            adapter
                .write_domain(&output)
                .map_err(|source| PipelineError::Output {
                    domain_code: domain.code.clone(),
                    adapter: adapter.name().to_string(),
                    source,
                })?;
        }

        info!(
            records = data.height(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            supplemental = supplemental.len(),
            duration_ms = start.elapsed().as_millis(),
            "domain processed"
        );

        Ok(DomainRun {
            result: DomainResult {
                domain_code: domain.code.clone(),
                records: data.height(),
                report,
                supplemental_records: supplemental.len(),
            },
            data,
            supplemental,
            tally: normalized.tally,
        })
    }
}
