use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransformError {
    #[error("variable {variable} references codelist {codelist}, which is not in the registry")]
    UnknownCodelist { variable: String, codelist: String },
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
