//! # Client Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────┐  ┌─────────────────────┐ │
//! │  │  Remote             │  │  Core           │  │  Configuration      │ │
//! │  │                     │  │                 │  │                     │ │
//! │  │  RemoteOperation    │  │  InvalidTrans.  │  │  InvalidConfig      │ │
//! │  │  (display message   │  │  PayloadMismatch│  │  InvalidUrl         │ │
//! │  │   only)             │  │  Validation     │  │  LoadFailed         │ │
//! │  └─────────────────────┘  └─────────────────┘  └─────────────────────┘ │
//! │                                                                         │
//! │  Boundary failures never leave the facade as-is: they are reduced to   │
//! │  a RemoteOperationError that carries one display string.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoffice_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result of a single facade call.
pub type RemoteResult<T> = Result<T, RemoteOperationError>;

// =============================================================================
// Remote Operation Error
// =============================================================================

/// The single error kind a remote operation fails with.
///
/// Only the message survives; callers cannot branch on whether the network
/// or the API failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteOperationError {
    message: String,
}

impl RemoteOperationError {
    pub fn new(message: impl Into<String>) -> Self {
        RemoteOperationError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

// =============================================================================
// Client Error
// =============================================================================

/// Errors returned by the controller and the configuration layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A remote operation failed (the message is already user-facing).
    #[error(transparent)]
    Remote(#[from] RemoteOperationError),

    /// The store refused the transition.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Input rejected before any request was made.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A register-scoped operation was attempted without an active register.
    #[error("No cash register selected")]
    NoRegisterSelected,

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(String),
}

impl ClientError {
    /// True when the caller's input was at fault, not the network.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_)
                | ClientError::Core(CoreError::Validation(_))
                | ClientError::NoRegisterSelected
        )
    }
}

// =============================================================================
// Configuration Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

impl From<url::ParseError> for ConfigError {
    fn from(err: url::ParseError) -> Self {
        ConfigError::InvalidUrl(err.to_string())
    }
}
