use serde::{Deserialize, Serialize};

/// Column order of a SUPP-- dataset.
pub const SUPP_COLUMNS: [&str; 10] = [
    "STUDYID", "RDOMAIN", "USUBJID", "IDVAR", "IDVARVAL", "QNAM", "QLABEL", "QVAL", "QORIG",
    "QEVAL",
];

/// One non-standard data point carried alongside a parent domain.
///
/// Empty strings stand for blank cells (subject-level qualifiers leave
/// IDVAR and IDVARVAL blank).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct SupplementalRecord {
    pub studyid: String,
    pub rdomain: String,
    pub usubjid: String,
    pub idvar: String,
    pub idvarval: String,
    pub qnam: String,
    pub qlabel: String,
    pub qval: String,
    pub qorig: String,
    pub qeval: String,
}

impl SupplementalRecord {
    /// Field values in [`SUPP_COLUMNS`] order.
    pub fn values(&self) -> [&str; 10] {
        [
            &self.studyid,
            &self.rdomain,
            &self.usubjid,
            &self.idvar,
            &self.idvarval,
            &self.qnam,
            &self.qlabel,
            &self.qval,
            &self.qorig,
            &self.qeval,
        ]
    }
}
