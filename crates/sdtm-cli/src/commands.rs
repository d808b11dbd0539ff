use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span, warn};

use sdtm_cli::ingest::{derive_study_id, discover_domain_files, load_inputs, load_mappings};
use sdtm_cli::output::CsvOutput;
use sdtm_core::{CancelToken, StudyPipeline};
use sdtm_model::{NormalizationOptions, ValidationOptions};
use sdtm_standards::{StandardsPaths, load_domain_registry, load_standards, standards_root};
use sdtm_validate::write_conformance_report_json;

use crate::cli::StudyArgs;
use crate::summary::apply_table_style;
use crate::types::StudyResult;

pub fn run_domains(standards_dir: Option<&Path>) -> Result<()> {
    let paths = StandardsPaths::from_root(&standards_root(standards_dir));
    let registry =
        load_domain_registry(&paths.datasets, &paths.variables).context("load standards")?;
    let mut table = Table::new();
    table.set_header(vec!["Domain", "Class", "Description", "Variables"]);
    apply_table_style(&mut table);
    for domain in registry.iter() {
        table.add_row(vec![
            domain.code.clone(),
            domain.class.to_string(),
            domain.name.clone(),
            domain.variables().len().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_study(args: &StudyArgs, standards_dir: Option<&Path>) -> Result<StudyResult> {
    let study_folder = &args.study_folder;
    let study_id = args
        .study_id
        .clone()
        .unwrap_or_else(|| derive_study_id(study_folder));
    let study_span = info_span!("study", study_id = %study_id);
    let _study_guard = study_span.enter();

    let load_start = Instant::now();
    let paths = StandardsPaths::from_root(&standards_root(standards_dir));
    let (domains, terminology) = load_standards(&paths).context("load standards")?;
    info!(
        domains = domains.len(),
        codelists = terminology.len(),
        duration_ms = load_start.elapsed().as_millis(),
        "standards loaded"
    );

    let mappings = match &args.mapping {
        Some(path) => load_mappings(path)?,
        None => Vec::new(),
    };
    let discovery = discover_domain_files(study_folder, &domains)?;
    for path in &discovery.skipped {
        warn!(path = %path.display(), "file skipped: name is not a domain code");
    }
    let loaded = load_inputs(&discovery.files, &mappings, &study_id);

    let normalization = if args.strict {
        NormalizationOptions::strict()
    } else {
        NormalizationOptions::lenient()
    }
    .with_fallback(args.ct_fallback);
    let validation = if args.suppress_permissible {
        ValidationOptions::suppress_permissible()
    } else {
        ValidationOptions::default()
    };

    let output_dir = (!args.dry_run).then(|| {
        args.output_dir
            .clone()
            .unwrap_or_else(|| study_folder.join("output"))
    });
    let mut pipeline = StudyPipeline::new(&domains, &terminology)
        .with_normalization(normalization)
        .with_validation(validation);
    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output directory {}", dir.display()))?;
        pipeline = pipeline.with_output(CsvOutput::new(dir));
    }

    let mut report = pipeline.run(&study_id, &loaded.inputs, &CancelToken::new());
    report.failures.extend(loaded.failures);

    let conformance_report = match &output_dir {
        Some(dir) => {
            let reports: Vec<_> = report.reports().cloned().collect();
            let path = write_conformance_report_json(dir, &study_id, &reports, &report.failures)
                .context("write conformance report")?;
            Some(path)
        }
        None => None,
    };

    let descriptions: BTreeMap<String, String> = discovery
        .files
        .iter()
        .filter_map(|file| domains.get(&file.domain_code))
        .map(|domain| (domain.code.clone(), domain.name.clone()))
        .collect();

    Ok(StudyResult {
        report,
        descriptions,
        output_dir,
        conformance_report,
        skipped_files: discovery.skipped,
    })
}
