use thiserror::Error;

/// Failures surfaced to the page as rejected calls.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("shell_init has not been called")]
    NotInitialized,
    #[error("invalid shell options: {0}")]
    InvalidOptions(#[source] serde_json::Error),
    #[error("unknown log level `{0}`")]
    InvalidLogLevel(String),
    #[error(transparent)]
    Schema(#[from] ipc_schema::SchemaError),
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;
