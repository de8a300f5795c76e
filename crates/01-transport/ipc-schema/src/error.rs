use thiserror::Error;

/// Result alias for schema encode/decode operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Failures raised while mapping positional arguments onto typed records.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The channel name is not part of the fixed vocabulary.
    #[error("unknown channel `{0}`")]
    UnknownChannel(String),

    /// A required positional argument was not supplied.
    #[error("`{channel}` is missing argument #{index}")]
    MissingArgument {
        /// Channel the arguments arrived on.
        channel: &'static str,
        /// Zero-based position of the missing argument.
        index: usize,
    },

    /// An argument was present but did not match the expected shape.
    #[error("`{channel}` argument #{index} is malformed: {source}")]
    InvalidPayload {
        /// Channel the arguments arrived on.
        channel: &'static str,
        /// Zero-based position of the malformed argument.
        index: usize,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be turned into a JSON value.
    #[error("failed to encode `{channel}` payload: {source}")]
    Encode {
        /// Channel being encoded.
        channel: &'static str,
        /// Underlying encode failure.
        #[source]
        source: serde_json::Error,
    },
}
