//! # Error Types
//!
//! Domain-specific error types for backoffice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  backoffice-core errors (this file)                                    │
//! │  ├── CoreError        - Store / workflow rule violations               │
//! │  └── ValidationError  - Caller-side input failures                     │
//! │                                                                         │
//! │  backoffice-client errors (separate crate)                             │
//! │  ├── RemoteOperationError - The one string a slice ever stores         │
//! │  └── ClientError          - Everything the controller can return       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → console output      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (slice, state, field)
//! 3. Validation failures happen BEFORE any network call

use thiserror::Error;

use crate::store::SliceId;

// =============================================================================
// Core Error
// =============================================================================

/// Store and workflow errors.
///
/// None of these are fatal: the store is left unchanged whenever one is
/// returned, so the caller can simply retry or cancel.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A succeeded lifecycle event carried a payload for a different slice.
    #[error("Payload for {payload} cannot be applied to slice {slice}")]
    PayloadMismatch { slice: SliceId, payload: SliceId },

    /// The operation is not allowed from the workflow's current state.
    ///
    /// ## When This Occurs
    /// - `confirm` with nothing staged
    /// - `stage` while the previous top-up is still being committed
    /// - `cancel` after the commit has already started
    #[error("Cannot {operation} while top-up is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },

    /// A catalyst contains a metal with no known rate.
    #[error("No rate available for {metal}")]
    MissingMetalRate { metal: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised on the caller side, e.g. a non-positive top-up amount,
/// and never reach the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., currency code, date range).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
