//! SDTM data transformation.
//!
//! - **normalization::ct**: resolution of raw values against a codelist
//! - **normalization::frame**: the same resolution applied to every
//!   CT-governed column of a domain table

pub mod error;
pub mod normalization;

pub use error::{Result, TransformError};
pub use normalization::{
    NormalizedFrame, NormalizedValue, ResolutionKind, ResolutionTally, compact_key, normalize,
    normalize_domain_frame, resolve_codelists,
};
