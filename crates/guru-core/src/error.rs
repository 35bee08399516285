//! Unified error type exposed by **`guru-core`**.
//!
//! Backend crates convert their internal errors into one of these variants
//! before bubbling them up to the [`CompletionGateway`](crate::gateway::CompletionGateway).
//! The three gateway failures (`Authentication`, `Transport`, `Remote`) are
//! never retried automatically; the controller scopes them to the single
//! exchange that produced them.

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GuruError>;

#[derive(Debug, Error)]
pub enum GuruError {
    /// Bad caller input (oversized text, malformed sample size, …). Always
    /// raised before any state is mutated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Neither a stored nor a manually entered credential is available, so no
    /// request may be issued.
    #[error("no API credential is configured")]
    CredentialMissing,

    /// The upstream rejected the credential.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network-level failure: connect, timeout, broken response body.
    #[error("transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The upstream model answered with an error payload or a reply we could
    /// not understand.
    #[error("remote error: {0}")]
    Remote(String),

    /// The selected backend does not recognise the requested `model`.
    #[error("provider `{provider}` does not support model `{model}`")]
    ModelNotSupported {
        provider: &'static str,
        model: String,
    },

    /// Failure while serialising or deserialising JSON payloads.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration or secrets could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GuruError {
    /// `true` for the failures a completion request can end in.
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            GuruError::Authentication(_) | GuruError::Transport(_) | GuruError::Remote(_)
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        GuruError::InvalidArgument(message.into())
    }
}
