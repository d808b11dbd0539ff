use polars::prelude::PolarsError;
use sdtm_standards::StandardsError;
use sdtm_transform::TransformError;
use sdtm_validate::ValidationError;
use thiserror::Error;

/// Error raised by a mapping or output collaborator.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// A domain-level failure. Stops that domain only.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    #[error(transparent)]
    Standards(#[from] StandardsError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Polars(#[from] PolarsError),
    #[error("mapping failed for {domain_code}: {source}")]
    Mapping {
        domain_code: String,
        source: CollaboratorError,
    },
    #[error("output '{adapter}' failed for {domain_code}: {source}")]
    Output {
        domain_code: String,
        adapter: String,
        source: CollaboratorError,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
