use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("API Error: {0}")]
    ApiError(String),
    #[error("Parse Error: {0}")]
    ParseError(String),
    #[error("Network Error: {0}")]
    NetworkError(String),
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config Error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        CatalogError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
