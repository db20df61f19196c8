use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Fetch from {endpoint} failed: {source}")]
    Fetch {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetch from {endpoint} returned status {status}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Storage read failed for key '{key}': {message}")]
    StorageRead { key: String, message: String },

    #[error("Storage write failed for key '{key}': {message}")]
    StorageWrite { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Snapshot writer is no longer running")]
    WriterClosed,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl StorefrontError {
    /// Short message for terminal output, without nested error chains.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Fetch { endpoint, .. } | Self::HttpStatus { endpoint, .. } => {
                format!("Could not load data from {}", endpoint)
            }
            Self::StorageRead { .. } | Self::InvalidKey { .. } => {
                "Saved cart could not be read".to_string()
            }
            Self::StorageWrite { .. } | Self::Io(_) | Self::WriterClosed => {
                "Cart could not be saved".to_string()
            }
            Self::Serialization(_) => "Cart data is malformed".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::HttpStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
