use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotetakerError {
    #[error("Video source failed for {url}: {reason}")]
    SourceFailed { url: String, reason: String },

    #[error("Missing video id")]
    MissingVideoId,

    #[error("Model returned malformed outline: {reason}")]
    InvalidModelOutput { reason: String },

    #[error("Invalid API response: {reason}")]
    InvalidApiResponse { reason: String },

    #[error("API request failed with status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, NotetakerError>;
