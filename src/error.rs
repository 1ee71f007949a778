use thiserror::Error;

/// Error code the CMS returns when a query names a property the database schema lacks.
pub const VALIDATION_ERROR_CODE: &str = "validation_error";

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CMS API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

impl CmsError {
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        CmsError::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// True when the source rejected the query because a filtered or sorted
    /// property does not exist in that deployment's schema.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, CmsError::Api { code, .. } if code == VALIDATION_ERROR_CODE)
    }
}

pub type Result<T> = std::result::Result<T, CmsError>;
