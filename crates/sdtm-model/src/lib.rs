//! Shared data model for SDTM transformation and validation.
//!
//! Everything here is plain data: domain and variable metadata, controlled
//! terminology, run options, conformance findings and supplemental
//! qualifier records. Table handling lives in the crates that depend on
//! polars.

pub mod conformance;
pub mod ct;
pub mod domain;
pub mod enums;
pub mod error;
pub mod lookup;
pub mod mapping;
pub mod options;
pub mod processing;
pub mod supp;

pub use conformance::{Severity, ValidationIssue, ValidationReport, issue_codes};
pub use ct::{Codelist, Term};
pub use domain::{Domain, Variable};
pub use enums::{CoreDesignation, DatasetClass, VariableRole, VariableType};
pub use error::{Result, SdtmError};
pub use lookup::{CaseInsensitiveSet, CodelistLookup};
pub use mapping::{MappingConfig, SuppColumnMeta};
pub use options::{CtMatchingMode, NormalizationOptions, PermissibleMissing, ValidationOptions};
pub use processing::{DomainFailure, DomainResult, StudyReport};
pub use supp::{SUPP_COLUMNS, SupplementalRecord};
