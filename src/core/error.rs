use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InsightError>;
