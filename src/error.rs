use thiserror::Error;

#[derive(Error, Debug)]
pub enum DciError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Authentication rejected by DCI (status {status})")]
    Unauthorized { status: u16 },

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("API request failed with status {status} after {retries} retries")]
    ApiErrorAfterRetries { status: u16, retries: u32 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DciError {
    /// Whether the server answered that the entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, DciError>;
