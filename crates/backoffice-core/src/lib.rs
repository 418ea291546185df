//! # backoffice-core: Pure State Logic for the Back Office Console
//!
//! This crate holds the state the console keeps about remote resources and
//! the transitions between those states. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Back Office Console Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/console (CLI)                           │   │
//! │  │    session ──► products ──► top-up ──► reports                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    backoffice-client                            │   │
//! │  │    Controller ─► ResourceClient ─► HttpBoundary (reqwest)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Action                                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ backoffice-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   store   │  │ workflow  │  │   money   │  │ validation│  │   │
//! │  │   │  slices   │  │  top-up   │  │   Money   │  │   rules   │  │   │
//! │  │   │  session  │  │  confirm  │  │ Currency  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE TRANSITIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - Async resource slices, lifecycle events, the store
//! - [`workflow`] - Pending top-up confirmation
//! - [`types`] - Entity DTOs and the cash register context
//! - [`money`] - Integer money and currency codes
//! - [`pricing`] - Catalyst valuation from metal rates
//! - [`validation`] - Caller-side checks run before any request
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use backoffice_core::store::{Action, BackOfficeStore, LifecycleEvent, SettlementPolicy, SliceId};
//!
//! let mut store = BackOfficeStore::init(SettlementPolicy::default());
//! let started = store
//!     .dispatch(Action::Lifecycle(LifecycleEvent::requested(SliceId::Products, "fetchAll")))
//!     .unwrap();
//!
//! assert!(started.request_id().is_some());
//! assert!(store.is_loading(SliceId::Products));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod store;
pub mod types;
pub mod validation;
pub mod workflow;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CurrencyCode, Money};
pub use store::{Action, BackOfficeStore, DispatchOutcome, SettlementPolicy, SliceId};
pub use types::*;
pub use workflow::{PendingTransaction, TopUpSubmission, TopUpWorkflow};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest comment accepted on a cash movement.
pub const MAX_COMMENT_LENGTH: usize = 255;

/// Largest single top-up, in minor units.
///
/// ## Business Reason
/// Catches a mistyped amount (an extra zero or two) before it reaches the
/// register. Ten million AMD is well above any real float top-up.
pub const MAX_TOP_UP_MINOR: i64 = 10_000_000;
