use thiserror::Error;

/// Failure of a single generation call
///
/// This is the only runtime failure class the board pipeline knows about.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API key not found: environment variable {0} is unset or empty")]
    MissingApiKey(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("generation service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("generation service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed generation response: {0}")]
    Decode(String),

    #[error("generation service returned no usable text")]
    EmptyResponse,
}
