//! Tests for the lazy controlled terminology registry.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};

use sdtm_model::CodelistLookup;
use sdtm_standards::{TerminologyRegistry, load_ct_registry};
use tempfile::TempDir;

const CT: &str = "\u{feff}Code,Codelist Code,Codelist Extensible (Yes/No),Codelist Name,CDISC Submission Value,CDISC Synonym(s),CDISC Definition,NCI Preferred Term\n\
C66731,,No,Sex,SEX,Sex,Sex of the subject,CDISC SDTM Sex of Individual Terminology\n\
C16576,C66731,,Sex,F,Female,Female,Female\n\
C20197,C66731,,Sex,M,Male,Male,Male\n\
C17998,C66731,,Sex,U,U; Unknown; UNK,Unknown,Unknown\n\
C74457,,No,Race,RACE,Race,Race of the subject,CDISC SDTM Race Terminology\n\
C41261,C74457,,Race,WHITE,White,White,White\n\
C17649,C74457,,Race,OTHER,Other,Other,Other\n\
C71620,,Yes,Unit,UNIT,Unit,Units,CDISC SDTM Unit of Measure Terminology\n\
C48155,C71620,,Unit,g,Gram,Gram,Gram\n";

fn registry() -> TerminologyRegistry {
    TerminologyRegistry::from_ct_reader(CT.as_bytes(), Path::new("SDTM_CT.csv")).unwrap()
}

#[test]
fn indexes_codelists_without_building_them() {
    let registry = registry();
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.materialized_count(), 0);
    assert!(registry.contains("Race"));
    assert!(!registry.contains("C00000"));
    assert_eq!(registry.materialized_count(), 0);
}

#[test]
fn builds_terms_in_source_order() {
    let registry = registry();
    let sex = registry.codelist("C66731").unwrap();
    assert_eq!(sex.name, "Sex");
    assert!(!sex.extensible);
    assert_eq!(sex.submission_values(), vec!["F", "M", "U"]);
    let unknown = sex.term("U").unwrap();
    assert_eq!(unknown.synonyms, vec!["U", "Unknown", "UNK"]);
    assert_eq!(unknown.decode.as_deref(), Some("Unknown"));
    assert_eq!(unknown.code.as_deref(), Some("C17998"));

    let unit = registry.codelist("unit").unwrap();
    assert!(unit.extensible);
    assert_eq!(registry.materialized_count(), 2);
}

#[test]
fn concurrent_first_lookups_build_once() {
    let registry = Arc::new(registry());
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                registry.codelist("C74457").unwrap()
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(registry.materialized_count(), 1);
    assert!(results.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert_eq!(results[0].submission_values(), vec!["WHITE", "OTHER"]);
}

#[test]
fn loads_every_csv_in_a_directory() {
    let dir = TempDir::new().unwrap();
    let (sex, race) = CT.split_at(CT.find("C74457,,").unwrap());
    let header = CT.lines().next().unwrap();
    fs::write(dir.path().join("a_CT.csv"), sex).unwrap();
    fs::write(dir.path().join("b_CT.csv"), format!("{header}\n{race}")).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let registry = load_ct_registry(dir.path()).unwrap();
    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry.codelist("C74457").unwrap().submission_values(),
        vec!["WHITE", "OTHER"]
    );
}
