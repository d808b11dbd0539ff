use std::collections::BTreeMap;
use std::path::PathBuf;

use sdtm_model::StudyReport;

#[derive(Debug)]
pub struct StudyResult {
    pub report: StudyReport,
    /// Domain code -> domain name, for every processed domain.
    pub descriptions: BTreeMap<String, String>,
    /// None on a dry run.
    pub output_dir: Option<PathBuf>,
    pub conformance_report: Option<PathBuf>,
    pub skipped_files: Vec<PathBuf>,
}

impl StudyResult {
    pub fn has_errors(&self) -> bool {
        self.report.has_errors()
    }
}
