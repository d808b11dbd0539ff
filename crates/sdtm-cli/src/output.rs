//! CSV output adapter.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use sdtm_core::{
    CollaboratorError, DomainOutput, OutputAdapter, supp_domain_code, supplemental_frame,
};
use tracing::{debug, trace};

use crate::logging::redact_value;

/// Writes `<domain>.csv` and, when qualifiers exist, `supp<domain>.csv`.
#[derive(Debug, Clone)]
pub struct CsvOutput {
    dir: PathBuf,
}

impl CsvOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn domain_path(&self, domain_code: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", domain_code.to_lowercase()))
    }

    fn write_frame(path: &Path, df: &DataFrame) -> Result<(), CollaboratorError> {
        let mut file = File::create(path)?;
        let mut df = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        Ok(())
    }
}

impl OutputAdapter for CsvOutput {
    fn name(&self) -> &str {
        "csv"
    }

    fn write_domain(&self, output: &DomainOutput<'_>) -> Result<(), CollaboratorError> {
        let code = &output.domain.code;
        let path = self.domain_path(code);
        Self::write_frame(&path, output.data)?;
        debug!(
            domain_code = %code,
            path = %path.display(),
            rows = output.data.height(),
            "domain written"
        );

        if output.supplemental.is_empty() {
            return Ok(());
        }
        for record in output.supplemental {
            trace!(
                qnam = %record.qnam,
                usubjid = %redact_value(&record.usubjid),
                qval = %redact_value(&record.qval),
                "supplemental value"
            );
        }
        let supp = supplemental_frame(output.supplemental)?;
        let supp_path = self.domain_path(&supp_domain_code(code));
        Self::write_frame(&supp_path, &supp)?;
        debug!(
            domain_code = %code,
            path = %supp_path.display(),
            rows = supp.height(),
            "supplemental written"
        );
        Ok(())
    }
}
