//! CSV output written through the study pipeline.

use polars::prelude::{Column, DataFrame};
use sdtm_cli::ingest::read_domain_csv;
use sdtm_cli::output::CsvOutput;
use sdtm_core::{CancelToken, DomainInput, StudyPipeline};
use sdtm_model::{
    Codelist, CoreDesignation, DatasetClass, Domain, MappingConfig, NormalizationOptions, Term,
    Variable, VariableRole,
};
use sdtm_standards::{DomainRegistry, TerminologyRegistry};
use tempfile::TempDir;

fn standards() -> (DomainRegistry, TerminologyRegistry) {
    let ae = Domain::new(
        "AE",
        "Adverse Events",
        DatasetClass::Events,
        vec![
            Variable::new("USUBJID", VariableRole::Identifier, CoreDesignation::Required),
            Variable::new("AESEQ", VariableRole::Identifier, CoreDesignation::Required),
            Variable::new("AESER", VariableRole::Qualifier, CoreDesignation::Expected)
                .with_codelist("C66742"),
        ],
    )
    .unwrap();
    let yes_no = Codelist::with_terms(
        "C66742",
        "No Yes Response",
        false,
        [
            Term::new("N").with_synonyms(["No"]),
            Term::new("Y").with_synonyms(["Yes"]),
        ],
    )
    .unwrap();
    (
        DomainRegistry::new(vec![ae]),
        TerminologyRegistry::from_codelists([yes_no]),
    )
}

fn ae_input() -> DomainInput {
    let data = DataFrame::new(vec![
        Column::new("USUBJID".into(), ["S-01", "S-01", "S-02"]),
        Column::new("AESEQ".into(), ["1", "2", "1"]),
        Column::new("AESER".into(), ["yes", "N", "no"]),
        Column::new("Reporter".into(), ["nurse", "", "physician"]),
    ])
    .unwrap();
    DomainInput::new(MappingConfig::new("AE", "STUDY1"), data)
}

fn strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn writes_domain_and_supplemental_csv() {
    let dir = TempDir::new().unwrap();
    let (domains, terminology) = standards();
    let output = CsvOutput::new(dir.path());
    assert_eq!(output.dir(), dir.path());
    let pipeline = StudyPipeline::new(&domains, &terminology)
        .with_normalization(NormalizationOptions::lenient())
        .with_output(output);

    let report = pipeline.run("STUDY1", &[ae_input()], &CancelToken::new());
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert!(!report.has_errors());

    let ae = read_domain_csv(&dir.path().join("ae.csv")).unwrap();
    assert_eq!(strings(&ae, "AESER"), ["Y", "N", "N"]);
    assert!(ae.column("Reporter").is_err());

    let supp = read_domain_csv(&dir.path().join("suppae.csv")).unwrap();
    let header: Vec<String> = supp
        .get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        header,
        [
            "STUDYID", "RDOMAIN", "USUBJID", "IDVAR", "IDVARVAL", "QNAM", "QLABEL", "QVAL",
            "QORIG", "QEVAL"
        ]
    );
    assert_eq!(strings(&supp, "QVAL"), ["nurse", "physician"]);
    assert_eq!(strings(&supp, "IDVAR"), ["AESEQ", "AESEQ"]);
    assert_eq!(strings(&supp, "QNAM"), ["REPORTER", "REPORTER"]);
}

#[test]
fn no_supplemental_file_without_qualifiers() {
    let dir = TempDir::new().unwrap();
    let (domains, terminology) = standards();
    let pipeline =
        StudyPipeline::new(&domains, &terminology).with_output(CsvOutput::new(dir.path()));
    let mut input = ae_input();
    input.data = input.data.drop("Reporter").unwrap();

    let report = pipeline.run("STUDY1", &[input], &CancelToken::new());
    assert_eq!(report.results.len(), 1);
    assert!(dir.path().join("ae.csv").exists());
    assert!(!dir.path().join("suppae.csv").exists());
}

#[test]
fn unwritable_directory_fails_the_domain() {
    let dir = TempDir::new().unwrap();
    let (domains, terminology) = standards();
    let pipeline = StudyPipeline::new(&domains, &terminology)
        .with_output(CsvOutput::new(dir.path().join("missing")));

    let report = pipeline.run("STUDY1", &[ae_input()], &CancelToken::new());
    assert!(report.results.is_empty());
    assert_eq!(report.failures[0].domain_code, "AE");
    assert!(report.failures[0].message.contains("csv"));
}
