use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

/// Failures of the text generation capability.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    #[error("Generation service unavailable at {host}: {reason}")]
    ServiceUnavailable { host: String, reason: String },

    #[error("Request timeout for model {model}")]
    RequestTimeout { model: String },

    #[error("Model not available: {model}")]
    ModelNotAvailable { model: String },

    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Request rejected with status {status}: {message}")]
    RequestRejected { status: u16, message: String },

    #[error("Invalid response format: {details}")]
    InvalidResponseFormat { details: String },
}

/// Failures of the embedding capability and of vector math over its output.
#[derive(Error, Debug, Clone)]
pub enum EmbeddingError {
    #[error("Embedding service unavailable at {host}: {reason}")]
    ServiceUnavailable { host: String, reason: String },

    #[error("Request timeout for model {model}")]
    RequestTimeout { model: String },

    #[error("Model not found: {model_name}")]
    ModelNotFound { model_name: String },

    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Request rejected with status {status}: {message}")]
    RequestRejected { status: u16, message: String },

    #[error("Invalid embedding response: {details}")]
    InvalidResponse { details: String },

    #[error("Model {model} returned an empty embedding for {text:?}")]
    EmptyEmbedding { model: String, text: String },

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Transport-level failure talking to the model-serving engine.
///
/// Capability crates translate this into their own error family so callers
/// can tell a generation outage from an embedding outage.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    #[error("{url} is unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("undecodable response body: {reason}")]
    Decode { reason: String },
}
