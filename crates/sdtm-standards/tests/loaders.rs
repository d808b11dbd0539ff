//! Tests for domain metadata loading.

use std::fs;
use std::path::PathBuf;

use sdtm_model::{CoreDesignation, DatasetClass, VariableRole};
use sdtm_standards::{StandardsError, StandardsPaths, load_domain_registry, load_standards};
use tempfile::TempDir;

const DATASETS: &str = "\u{feff}Version,Class,Dataset Name,Dataset Label,Structure\n\
3.4,Special-Purpose,DM,Demographics,One record per subject\n\
3.4,Events,AE,Adverse Events,One record per adverse event per subject\n";

const VARIABLES: &str = "Version,Variable Order,Class,Dataset Name,Variable Name,Variable Label,Type,CDISC CT Codelist Code(s),Role,Core\n\
3.4,2,Events,AE,DOMAIN,Domain Abbreviation,Char,C66734,Identifier,Req\n\
3.4,1,Events,AE,STUDYID,Study Identifier,Char,,Identifier,Req\n\
3.4,3,Events,AE,AESEQ,Sequence Number,Num,,Identifier,Req\n\
3.4,4,Events,AE,AESER,Serious Event,Char,C66742;C66789,Record Qualifier,Exp\n\
3.4,1,Special-Purpose,DM,STUDYID,Study Identifier,Char,,Identifier,Req\n\
3.4,2,Special-Purpose,DM,SEX,Sex,Char,C66731,Record Qualifier,Req\n\
3.4,3,Special-Purpose,DM,ETHNIC,Ethnicity,Char,C66790,Record Qualifier,Perm\n";

fn write_standards(dir: &TempDir, datasets: &str, variables: &str) -> (PathBuf, PathBuf) {
    let datasets_path = dir.path().join("Datasets.csv");
    let variables_path = dir.path().join("Variables.csv");
    fs::write(&datasets_path, datasets).unwrap();
    fs::write(&variables_path, variables).unwrap();
    (datasets_path, variables_path)
}

#[test]
fn loads_domains_in_variable_order() {
    let dir = TempDir::new().unwrap();
    let (datasets, variables) = write_standards(&dir, DATASETS, VARIABLES);
    let registry = load_domain_registry(&datasets, &variables).unwrap();

    assert_eq!(registry.codes().collect::<Vec<_>>(), vec!["DM", "AE"]);

    let ae = registry.require("ae").unwrap();
    assert_eq!(ae.class, DatasetClass::Events);
    assert_eq!(ae.name, "Adverse Events");
    assert_eq!(
        ae.variable_names().collect::<Vec<_>>(),
        vec!["STUDYID", "DOMAIN", "AESEQ", "AESER"]
    );
    let aeser = ae.variable("AESER").unwrap();
    assert_eq!(aeser.role, VariableRole::Qualifier);
    assert_eq!(aeser.core, CoreDesignation::Expected);
    assert_eq!(aeser.codelist_code.as_deref(), Some("C66742"));
    assert_eq!(ae.sequence_variable().map(|v| v.name.as_str()), Some("AESEQ"));

    let dm = registry.require("DM").unwrap();
    assert_eq!(dm.class, DatasetClass::SpecialPurpose);
    assert_eq!(
        dm.variable("ETHNIC").map(|v| v.core),
        Some(CoreDesignation::Permissible)
    );
}

#[test]
fn unknown_role_is_reported() {
    let dir = TempDir::new().unwrap();
    let variables = "Dataset Name,Variable Name,Role,Core\nDM,SEX,Observer,Req\n";
    let (datasets, variables) = write_standards(&dir, DATASETS, variables);
    let err = load_domain_registry(&datasets, &variables).unwrap_err();
    assert!(matches!(err, StandardsError::InvalidMetadata { .. }));
    assert!(err.to_string().contains("SEX"));
}

#[test]
fn duplicate_variable_is_reported() {
    let dir = TempDir::new().unwrap();
    let variables = "Dataset Name,Variable Name,Role,Core\nDM,SEX,Record Qualifier,Req\nDM,sex,Record Qualifier,Req\n";
    let (datasets, variables) = write_standards(&dir, DATASETS, variables);
    let err = load_domain_registry(&datasets, &variables).unwrap_err();
    assert!(matches!(err, StandardsError::Model(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_domain_registry(
        &dir.path().join("Datasets.csv"),
        &dir.path().join("Variables.csv"),
    )
    .unwrap_err();
    assert!(matches!(err, StandardsError::Io { .. }));
}

#[test]
fn loads_full_standards_layout() {
    let dir = TempDir::new().unwrap();
    let paths = StandardsPaths::from_root(dir.path());
    fs::create_dir_all(paths.datasets.parent().unwrap()).unwrap();
    fs::create_dir_all(&paths.ct).unwrap();
    fs::write(&paths.datasets, DATASETS).unwrap();
    fs::write(&paths.variables, VARIABLES).unwrap();
    fs::write(
        paths.ct.join("SDTM_CT_2024-03-29.csv"),
        "Code,Codelist Code,Codelist Extensible (Yes/No),Codelist Name,CDISC Submission Value,CDISC Synonym(s)\n\
         C66731,,No,Sex,SEX,\n\
         C20197,C66731,,,M,Male\n",
    )
    .unwrap();

    let (domains, terminology) = load_standards(&paths).unwrap();
    assert_eq!(domains.len(), 2);
    assert!(terminology.contains("C66731"));
}
