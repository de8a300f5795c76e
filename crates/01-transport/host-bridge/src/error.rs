use thiserror::Error;

/// Result alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors surfaced by the `try_*` adapter operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No host bridge was injected into the page.
    #[error("host bridge unavailable; `{channel}` was not forwarded")]
    Unavailable {
        /// Channel the caller tried to use.
        channel: String,
    },
}
