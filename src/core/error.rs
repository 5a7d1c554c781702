use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Feed decode error: {0}")]
    FeedDecode(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SurveyError>;
