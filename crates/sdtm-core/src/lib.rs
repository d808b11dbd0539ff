//! Supplemental qualifiers and the study pipeline.
//!
//! - **qnam**: QNAM derivation with deterministic collision suffixes
//! - **suppqual**: SUPP-- records for columns a domain does not declare
//! - **pipeline**: per-domain sequencing and parallel study runs

pub mod error;
pub mod pipeline;
pub mod qnam;
pub mod suppqual;

pub use error::{CollaboratorError, PipelineError, Result};
pub use pipeline::{
    CancelToken, DomainInput, DomainMapper, DomainOutput, DomainRun, OutputAdapter, RenameMapper,
    StudyPipeline,
};
pub use qnam::{QNAM_MAX_LEN, QnamAllocator, sanitize_qnam};
pub use suppqual::{
    QLABEL_MAX_LEN, build_supplemental, standard_variable_names, supp_domain_code,
    supplemental_columns, supplemental_frame,
};
