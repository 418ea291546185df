//! # Session Reconciliation Slice
//!
//! An [`AsyncResourceState`] of [`SessionDetails`] with two extra mutators
//! that bypass the fetch lifecycle, so the console can drop its knowledge
//! of a register session (e.g. after a force-close) without a round trip.
//!
//! `hasOpenSession` is derived from `data` on every read, so it can never
//! drift from the details it describes.

use serde::{Serialize, Serializer};

use crate::store::resource::{AsyncResourceState, RequestId, ResourceSlot, Settlement, SettlementPolicy};
use crate::types::SessionDetails;

/// Session status of the active register.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    resource: AsyncResourceState<SessionDetails>,
}

impl SessionState {
    pub fn new(policy: SettlementPolicy) -> Self {
        SessionState {
            resource: AsyncResourceState::new(policy),
        }
    }

    /// Underlying `{ data, isLoading, error }`.
    pub fn resource(&self) -> &AsyncResourceState<SessionDetails> {
        &self.resource
    }

    pub fn details(&self) -> Option<&SessionDetails> {
        self.resource.data()
    }

    /// `true` only when the last fetched details report an open session.
    pub fn has_open_session(&self) -> bool {
        self.resource
            .data()
            .map(|details| details.has_open_session)
            .unwrap_or(false)
    }

    pub fn is_loading(&self) -> bool {
        self.resource.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.resource.error()
    }

    pub fn fulfill(&mut self, request: RequestId, details: SessionDetails) -> Settlement {
        self.resource.fulfill(request, details)
    }

    /// Forgets the session details; `isLoading` and `error` are untouched.
    pub fn clear_session_status(&mut self) {
        self.resource.clear_data();
    }

    /// Unconditionally restores the initial state.
    pub fn reset_session_state(&mut self) {
        self.resource.reset();
    }
}

impl ResourceSlot for SessionState {
    fn begin(&mut self) -> RequestId {
        self.resource.request()
    }

    fn fail(&mut self, request: RequestId, message: Option<String>) -> Settlement {
        self.resource.reject(request, message)
    }

    fn dismiss_error(&mut self) {
        self.resource.clear_error()
    }

    fn reset_slot(&mut self) {
        self.reset_session_state()
    }

    fn apply_policy(&mut self, policy: SettlementPolicy) {
        self.resource.set_policy(policy)
    }

    fn loading(&self) -> bool {
        self.resource.is_loading()
    }

    fn error_message(&self) -> Option<&str> {
        self.resource.error()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot<'a> {
    data: Option<&'a SessionDetails>,
    is_loading: bool,
    error: Option<&'a str>,
    has_open_session: bool,
}

impl Serialize for SessionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SessionSnapshot {
            data: self.details(),
            is_loading: self.is_loading(),
            error: self.error(),
            has_open_session: self.has_open_session(),
        }
        .serialize(serializer)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> SessionDetails {
        SessionDetails {
            has_open_session: true,
            session_id: Some(9),
            opened_at: None,
            opened_by: Some("anna".into()),
        }
    }

    #[test]
    fn test_has_open_session_follows_data() {
        let mut s = SessionState::default();
        assert!(!s.has_open_session());

        let id = s.begin();
        s.fulfill(id, open());
        assert!(s.has_open_session());

        let id = s.begin();
        s.fulfill(
            id,
            SessionDetails {
                has_open_session: false,
                ..open()
            },
        );
        assert!(!s.has_open_session());
    }

    #[test]
    fn test_failed_refresh_keeps_open_session() {
        let mut s = SessionState::default();
        let id = s.begin();
        s.fulfill(id, open());

        let id = s.begin();
        s.fail(id, Some("Failed to verify session status".into()));
        assert!(s.has_open_session());
        assert_eq!(s.error(), Some("Failed to verify session status"));
    }

    #[test]
    fn test_clear_session_status_leaves_loading_and_error() {
        let mut s = SessionState::default();
        let id = s.begin();
        s.fulfill(id, open());
        let id = s.begin();
        s.fail(id, Some("stale".into()));
        s.begin();

        s.clear_session_status();
        assert_eq!(s.details(), None);
        assert!(!s.has_open_session());
        assert!(s.is_loading());
        // begin() cleared the error; loading flag survived
        assert_eq!(s.error(), None);

        let mut s = SessionState::default();
        let id = s.begin();
        s.fail(id, Some("kept".into()));
        s.clear_session_status();
        assert_eq!(s.error(), Some("kept"));
        assert!(!s.is_loading());
    }

    #[test]
    fn test_reset_session_state() {
        let mut s = SessionState::default();
        let id = s.begin();
        s.fulfill(id, open());
        s.begin();

        s.reset_session_state();
        assert!(s.resource().is_initial());
        assert!(!s.has_open_session());
    }

    #[test]
    fn test_snapshot_includes_derived_flag() {
        let mut s = SessionState::default();
        let id = s.begin();
        s.fulfill(id, open());

        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["hasOpenSession"], true);
        assert_eq!(json["isLoading"], false);
        assert_eq!(json["data"]["sessionId"], 9);
    }
}
