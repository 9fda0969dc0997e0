use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagewinError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Data source error: {0}")]
    Source(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<toml::de::Error> for PagewinError {
    fn from(err: toml::de::Error) -> Self {
        PagewinError::Config(err.to_string())
    }
}
