//! Error types for the Marquee engine.

use thiserror::Error;

/// A shared error type for the entire Marquee workspace.
///
/// Discovery fetches surface `NetworkFailure` as a retryable status, the
/// preference store recovers `StorageCorrupt` locally, and login returns
/// `AuthRejected` to the caller. None of these are fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarqueeError {
    /// Timeout, connectivity problem, non-2xx response or undecodable body
    #[error("Network failure: {message}")]
    NetworkFailure {
        message: String,
        /// HTTP status code, when the server answered at all
        status: Option<u16>,
    },

    /// Credentials did not match the credential source
    #[error("Authentication rejected for '{username}'")]
    AuthRejected { username: String },

    /// A persisted value could not be decoded
    #[error("Storage corrupt at '{key}': {message}")]
    StorageCorrupt { key: String, message: String },

    /// Caller-supplied input was unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarqueeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NetworkFailure error without a status code
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a NetworkFailure error for a non-2xx response
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Creates an AuthRejected error
    pub fn auth_rejected(username: impl Into<String>) -> Self {
        Self::AuthRejected {
            username: username.into(),
        }
    }

    /// Creates a StorageCorrupt error
    pub fn storage_corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageCorrupt {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NetworkFailure error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFailure { .. })
    }

    /// Check if this is an AuthRejected error
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::AuthRejected { .. })
    }

    /// Check if this is a StorageCorrupt error
    pub fn is_storage_corrupt(&self) -> bool {
        matches!(self, Self::StorageCorrupt { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Whether re-issuing the same intent may succeed.
    ///
    /// Network failures are retryable except for 4xx responses other than
    /// 408 (timeout) and 429 (rate limited), which will keep failing until
    /// the request itself changes.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkFailure { status, .. } => match status {
                Some(code) if (400..500).contains(code) => *code == 408 || *code == 429,
                _ => true,
            },
            Self::Io { .. } => true,
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MarqueeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MarqueeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MarqueeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MarqueeError>`.
pub type Result<T> = std::result::Result<T, MarqueeError>;
