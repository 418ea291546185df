//! # Async Resource Slice
//!
//! The generic container every remote-fetched collection or report lives in.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │           request()                 fulfill(id, data)                  │
//! │   Idle ─────────────► Pending ───────────────────────► Fulfilled       │
//! │                        │   ▲                              │             │
//! │        reject(id, msg) │   │ request()                    │ request()   │
//! │                        ▼   │                              │             │
//! │                      Rejected ◄───────────────────────────┘             │
//! │                                                                         │
//! │  No terminal state. reset() returns to Idle from anywhere.             │
//! │                                                                         │
//! │  request():  error = None, isLoading = true, data KEPT                 │
//! │  fulfill():  data = payload, error = None, isLoading = false           │
//! │  reject():   data KEPT, error = message, isLoading = false             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overlapping Requests
//! There is a single `isLoading` flag per slice. Which settlement wins is
//! decided by [`SettlementPolicy`]:
//! - `LastSettledWins`: every settlement is applied in completion order, so
//!   an earlier request that resolves late overwrites a newer result.
//! - `LatestRequestWins`: only the most recently issued request may settle
//!   the slice; older settlements are discarded.
//!
//! Under either policy a request issued before the last [`reset`] can no
//! longer settle the slice.
//!
//! [`reset`]: AsyncResourceState::reset

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Error shown when a failure carries no message at all.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

// =============================================================================
// Request Identity
// =============================================================================

/// Monotonic per-slice request number, handed out by [`AsyncResourceState::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    /// Wraps a raw sequence number.
    pub const fn new(seq: u64) -> Self {
        RequestId(seq)
    }

    /// Returns the raw sequence number.
    pub const fn seq(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Phase & Policy
// =============================================================================

/// Where a slice is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlicePhase {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

/// How a slice treats settlements of overlapping requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementPolicy {
    /// Apply every settlement in completion order.
    #[default]
    LastSettledWins,

    /// Apply only the settlement of the most recently issued request.
    LatestRequestWins,
}

impl fmt::Display for SettlementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementPolicy::LastSettledWins => write!(f, "last_settled_wins"),
            SettlementPolicy::LatestRequestWins => write!(f, "latest_request_wins"),
        }
    }
}

impl std::str::FromStr for SettlementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last_settled_wins" | "last_settled" => Ok(SettlementPolicy::LastSettledWins),
            "latest_request_wins" | "latest_request" => Ok(SettlementPolicy::LatestRequestWins),
            other => Err(format!(
                "Unknown settlement policy: '{}'. Valid options: last_settled_wins, latest_request_wins",
                other
            )),
        }
    }
}

/// What happened to a settlement handed to a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The slice state now reflects this settlement.
    Applied,

    /// The settlement belonged to a superseded request and was dropped.
    Discarded { latest: Option<RequestId> },
}

impl Settlement {
    /// True when the settlement changed the slice.
    pub fn is_applied(&self) -> bool {
        matches!(self, Settlement::Applied)
    }
}

// =============================================================================
// Async Resource State
// =============================================================================

/// `{ data, isLoading, error }` for one remote-fetched resource.
///
/// `data` follows a stale-while-revalidate policy: it is only ever replaced
/// by a successful fetch or cleared by [`reset`](Self::reset).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncResourceState<T> {
    data: Option<T>,
    is_loading: bool,
    error: Option<String>,
    phase: SlicePhase,

    #[serde(skip)]
    policy: SettlementPolicy,
    #[serde(skip)]
    next_seq: u64,
    #[serde(skip)]
    latest_issued: Option<RequestId>,
    #[serde(skip)]
    last_applied: Option<RequestId>,
    #[serde(skip)]
    reset_floor: u64,
}

impl<T> Default for AsyncResourceState<T> {
    fn default() -> Self {
        AsyncResourceState::new(SettlementPolicy::default())
    }
}

impl<T> AsyncResourceState<T> {
    /// Creates an idle slice `(Empty, false, None)`.
    pub fn new(policy: SettlementPolicy) -> Self {
        AsyncResourceState {
            data: None,
            is_loading: false,
            error: None,
            phase: SlicePhase::Idle,
            policy,
            next_seq: 0,
            latest_issued: None,
            last_applied: None,
            reset_floor: 0,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> SlicePhase {
        self.phase
    }

    pub fn policy(&self) -> SettlementPolicy {
        self.policy
    }

    /// True when the slice is back to `(Empty, false, None)`.
    pub fn is_initial(&self) -> bool {
        self.data.is_none() && !self.is_loading && self.error.is_none()
    }

    pub fn set_policy(&mut self, policy: SettlementPolicy) {
        self.policy = policy;
    }

    /// Starts a request: clears `error`, sets `isLoading`, keeps `data`.
    pub fn request(&mut self) -> RequestId {
        self.next_seq += 1;
        let id = RequestId(self.next_seq);

        self.latest_issued = Some(id);
        self.error = None;
        self.is_loading = true;
        self.phase = SlicePhase::Pending;
        id
    }

    /// Settles `request` successfully.
    pub fn fulfill(&mut self, request: RequestId, data: T) -> Settlement {
        if let Some(discarded) = self.check_settlement(request) {
            return discarded;
        }

        self.data = Some(data);
        self.error = None;
        self.is_loading = false;
        self.phase = SlicePhase::Fulfilled;
        self.last_applied = Some(request);
        Settlement::Applied
    }

    /// Settles `request` with a failure. `data` is left untouched; a missing
    /// message falls back to [`GENERIC_FAILURE_MESSAGE`].
    pub fn reject(&mut self, request: RequestId, message: Option<String>) -> Settlement {
        if let Some(discarded) = self.check_settlement(request) {
            return discarded;
        }

        self.error = Some(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        );
        self.is_loading = false;
        self.phase = SlicePhase::Rejected;
        self.last_applied = Some(request);
        Settlement::Applied
    }

    /// Dismisses the displayed error without touching `data` or `isLoading`.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Returns the slice to `(Empty, false, None)`.
    ///
    /// Sequence numbers keep counting so ids issued before the reset are
    /// never reused; settlements of those ids are discarded.
    pub fn reset(&mut self) {
        self.reset_floor = self.next_seq;
        self.data = None;
        self.is_loading = false;
        self.error = None;
        self.phase = SlicePhase::Idle;
        self.latest_issued = None;
        self.last_applied = None;
    }

    /// Drops `data` only; `isLoading` and `error` are left as they are.
    pub(crate) fn clear_data(&mut self) {
        self.data = None;
    }

    /// Returns `Some(Discarded)` when `request` must not settle the slice.
    fn check_settlement(&self, request: RequestId) -> Option<Settlement> {
        if request.seq() <= self.reset_floor {
            debug!(
                %request,
                reset_floor = self.reset_floor,
                "discarding settlement of request issued before reset"
            );
            return Some(Settlement::Discarded {
                latest: self.latest_issued,
            });
        }

        match self.policy {
            SettlementPolicy::LastSettledWins => None,
            SettlementPolicy::LatestRequestWins => {
                let is_latest = self.latest_issued == Some(request);
                let already_settled = self.last_applied == Some(request);
                if is_latest && !already_settled {
                    None
                } else {
                    debug!(
                        %request,
                        latest = ?self.latest_issued,
                        "discarding settlement of superseded request"
                    );
                    Some(Settlement::Discarded {
                        latest: self.latest_issued,
                    })
                }
            }
        }
    }
}

// =============================================================================
// Type-erased slot
// =============================================================================

/// The payload-independent half of a slice.
///
/// The store drives `Requested` and `Failed` events for every slice through
/// this trait, so adding a slice needs no new pending/rejected handling.
pub trait ResourceSlot {
    fn begin(&mut self) -> RequestId;
    fn fail(&mut self, request: RequestId, message: Option<String>) -> Settlement;
    fn dismiss_error(&mut self);
    fn reset_slot(&mut self);
    fn apply_policy(&mut self, policy: SettlementPolicy);
    fn loading(&self) -> bool;
    fn error_message(&self) -> Option<&str>;
}

impl<T> ResourceSlot for AsyncResourceState<T> {
    fn begin(&mut self) -> RequestId {
        self.request()
    }

    fn fail(&mut self, request: RequestId, message: Option<String>) -> Settlement {
        self.reject(request, message)
    }

    fn dismiss_error(&mut self) {
        self.clear_error()
    }

    fn reset_slot(&mut self) {
        self.reset()
    }

    fn apply_policy(&mut self, policy: SettlementPolicy) {
        self.set_policy(policy)
    }

    fn loading(&self) -> bool {
        self.is_loading
    }

    fn error_message(&self) -> Option<&str> {
        self.error()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
