use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("variable {variable} references codelist {codelist}, which is not in the registry")]
    UnknownCodelist { variable: String, codelist: String },
    #[error(transparent)]
    Polars(#[from] PolarsError),
    #[error(transparent)]
    Transform(sdtm_transform::TransformError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize conformance report: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
