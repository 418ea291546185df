//! # Resource Client Facade
//!
//! Every entity service goes through [`ResourceClient::perform`]:
//!
//! ```text
//! perform(request_fn, context, default_error)
//!    │
//!    ├── headers += { "X-CashRegister-Id": context }   (only when Some)
//!    ├── request_fn(boundary, options).await
//!    │
//!    ├── Ok(body)   ──► decode into T
//!    └── Err(fail)  ──► RemoteOperationError(
//!                          fail.body.error  if present
//!                          else default_error)
//! ```
//!
//! Each call is independent: no retries, no caching.

use std::future::Future;
use std::sync::Arc;

use backoffice_core::CashRegisterId;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::boundary::{BoundaryFailure, BoundaryResult, HttpBoundary, RequestOptions};
use crate::error::{RemoteOperationError, RemoteResult};

/// Header carrying the operational context of register-scoped calls.
pub const CASH_REGISTER_HEADER: &str = "X-CashRegister-Id";

/// Reduces a failure to one display string: the structured `error` field,
/// else the failure's own message, else `fallback`.
pub fn extract_error_message(failure: &BoundaryFailure, fallback: &str) -> String {
    failure
        .structured_error()
        .or_else(|| {
            failure
                .message
                .as_deref()
                .filter(|message| !message.trim().is_empty())
        })
        .unwrap_or(fallback)
        .to_string()
}

/// Shared entry point of the entity services.
#[derive(Debug)]
pub struct ResourceClient<B> {
    boundary: Arc<B>,
}

impl<B> Clone for ResourceClient<B> {
    fn clone(&self) -> Self {
        ResourceClient {
            boundary: Arc::clone(&self.boundary),
        }
    }
}

impl<B: HttpBoundary> ResourceClient<B> {
    pub fn new(boundary: Arc<B>) -> Self {
        ResourceClient { boundary }
    }

    pub fn boundary(&self) -> &B {
        &self.boundary
    }

    /// Runs one remote operation.
    ///
    /// `context` must already be a validated register; passing `None` makes
    /// the call unscoped (login, global lookups).
    pub async fn perform<T, F, Fut>(
        &self,
        request_fn: F,
        context: Option<CashRegisterId>,
        default_error: &str,
    ) -> RemoteResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(Arc<B>, RequestOptions) -> Fut,
        Fut: Future<Output = BoundaryResult<Value>>,
    {
        let mut options = RequestOptions::new();
        if let Some(context) = context {
            options = options.header(CASH_REGISTER_HEADER, context.header_value());
        }

        match request_fn(Arc::clone(&self.boundary), options).await {
            Ok(body) => serde_json::from_value(body).map_err(|err| {
                warn!(error = %err, "unexpected response body");
                RemoteOperationError::new(default_error)
            }),
            Err(failure) => {
                let message = failure
                    .structured_error()
                    .unwrap_or(default_error)
                    .to_string();
                warn!(
                    kind = ?failure.kind,
                    status = ?failure.status,
                    register = ?context.map(|c| c.get()),
                    cause = %failure,
                    %message,
                    "remote operation failed"
                );
                Err(RemoteOperationError::new(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBoundary, Reply};
    use serde_json::json;

    fn client(boundary: &Arc<FakeBoundary>) -> ResourceClient<FakeBoundary> {
        ResourceClient::new(Arc::clone(boundary))
    }

    #[tokio::test]
    async fn test_context_header_is_attached() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply("cash-register/balance", Reply::ok(json!(true)));

        let register = CashRegisterId::new(7).unwrap();
        let ok: bool = client(&boundary)
            .perform(
                |b, options| async move { b.get("cash-register/balance", options).await },
                Some(register),
                "Failed",
            )
            .await
            .unwrap();

        assert!(ok);
        let sent = boundary.requests();
        assert_eq!(sent[0].options.header_value(CASH_REGISTER_HEADER), Some("7"));
    }

    #[tokio::test]
    async fn test_unscoped_call_has_no_context_header() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply("shops", Reply::ok(json!([])));

        let _: Vec<Value> = client(&boundary)
            .perform(|b, options| async move { b.get("shops", options).await }, None, "Failed")
            .await
            .unwrap();

        assert_eq!(boundary.requests()[0].options.header_value(CASH_REGISTER_HEADER), None);
    }

    #[tokio::test]
    async fn test_network_failure_uses_default_message() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply("cash-register/session/status", Reply::network("timeout"));

        let err = client(&boundary)
            .perform::<Value, _, _>(
                |b, options| async move { b.get("cash-register/session/status", options).await },
                Some(CashRegisterId::new(7).unwrap()),
                "Failed to verify session status",
            )
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Failed to verify session status");
    }

    #[tokio::test]
    async fn test_structured_error_wins_over_default() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply(
            "cash-register/session/status",
            Reply::api(409, json!({"error": "Register is locked"})),
        );

        let err = client(&boundary)
            .perform::<Value, _, _>(
                |b, options| async move { b.get("cash-register/session/status", options).await },
                Some(CashRegisterId::new(7).unwrap()),
                "Failed to verify session status",
            )
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Register is locked");
    }

    #[tokio::test]
    async fn test_undecodable_body_uses_default_message() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply("products", Reply::ok(json!({"unexpected": true})));

        let err = client(&boundary)
            .perform::<Vec<Value>, _, _>(
                |b, options| async move { b.get("products", options).await },
                None,
                "Failed to load products",
            )
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Failed to load products");
    }

    #[test]
    fn test_extract_error_message_chain() {
        let structured = BoundaryFailure::api(400, Some(json!({"error": "Invalid credentials"})));
        assert_eq!(extract_error_message(&structured, "Login failed"), "Invalid credentials");

        let network = BoundaryFailure::network("timeout");
        assert_eq!(extract_error_message(&network, "Login failed"), "timeout");

        let bare = BoundaryFailure {
            message: None,
            ..BoundaryFailure::api(500, None)
        };
        assert_eq!(extract_error_message(&bare, "Login failed"), "Login failed");
    }
}
