use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SdtmError {
    #[error("codelist {codelist} already contains submission value {value:?}")]
    DuplicateTerm { codelist: String, value: String },
    #[error("domain {domain} declares variable {variable} more than once")]
    DuplicateVariable { domain: String, variable: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, SdtmError>;
