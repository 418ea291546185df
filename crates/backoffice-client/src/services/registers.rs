//! Cash registers and everything scoped to one of them: session status,
//! cash balance and cash top-ups.
//!
//! Every function but [`fetch_cash_registers`] requires a validated
//! [`CashRegisterId`]; it travels as the `X-CashRegister-Id` header.

use backoffice_core::{
    CashBalance, CashRegister, CashRegisterId, CashTransaction, SessionDetails, TopUpSubmission,
};

use crate::boundary::HttpBoundary;
use crate::error::RemoteResult;
use crate::facade::ResourceClient;
use crate::services::to_body;

/// Lists the registers the signed-in user may operate.
pub async fn fetch_cash_registers<B: HttpBoundary>(
    client: &ResourceClient<B>,
) -> RemoteResult<Vec<CashRegister>> {
    client
        .perform(
            |b, options| async move { b.get("cash-registers", options).await },
            None,
            "Failed to load cash registers",
        )
        .await
}

// =============================================================================
// Session
// =============================================================================

pub async fn fetch_session_status<B: HttpBoundary>(
    client: &ResourceClient<B>,
    register: CashRegisterId,
) -> RemoteResult<SessionDetails> {
    client
        .perform(
            |b, options| async move { b.get("cash-register/session/status", options).await },
            Some(register),
            "Failed to verify session status",
        )
        .await
}

pub async fn open_session<B: HttpBoundary>(
    client: &ResourceClient<B>,
    register: CashRegisterId,
) -> RemoteResult<SessionDetails> {
    client
        .perform(
            |b, options| async move { b.post("cash-register/session/open", None, options).await },
            Some(register),
            "Failed to open session",
        )
        .await
}

pub async fn close_session<B: HttpBoundary>(
    client: &ResourceClient<B>,
    register: CashRegisterId,
) -> RemoteResult<SessionDetails> {
    client
        .perform(
            |b, options| async move { b.post("cash-register/session/close", None, options).await },
            Some(register),
            "Failed to close session",
        )
        .await
}

// =============================================================================
// Cash
// =============================================================================

pub async fn fetch_cash_balance<B: HttpBoundary>(
    client: &ResourceClient<B>,
    register: CashRegisterId,
) -> RemoteResult<CashBalance> {
    client
        .perform(
            |b, options| async move { b.get("cash-register/balance", options).await },
            Some(register),
            "Failed to load cash balance",
        )
        .await
}

/// Submits a confirmed top-up.
pub async fn top_up<B: HttpBoundary>(
    client: &ResourceClient<B>,
    register: CashRegisterId,
    submission: &TopUpSubmission,
) -> RemoteResult<CashTransaction> {
    const FAILED: &str = "Failed to top up cash register";
    let body = to_body(submission, FAILED)?;
    client
        .perform(
            move |b, options| async move { b.post("cash-register/top-up", Some(body), options).await },
            Some(register),
            FAILED,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::CASH_REGISTER_HEADER;
    use crate::testing::{FakeBoundary, Reply};
    use backoffice_core::{CurrencyCode, Money};
    use serde_json::json;
    use std::sync::Arc;

    fn register() -> CashRegisterId {
        CashRegisterId::new(7).unwrap()
    }

    #[tokio::test]
    async fn test_session_status_timeout_uses_call_site_message() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply("cash-register/session/status", Reply::network("timeout"));

        let err = fetch_session_status(&ResourceClient::new(boundary.clone()), register())
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Failed to verify session status");
        assert_eq!(
            boundary.requests()[0].options.header_value(CASH_REGISTER_HEADER),
            Some("7")
        );
    }

    #[tokio::test]
    async fn test_cash_registers_are_not_scoped() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply(
            "cash-registers",
            Reply::ok(json!([{"id": 7, "name": "Front desk", "shopId": 1, "isActive": true}])),
        );

        let registers = fetch_cash_registers(&ResourceClient::new(boundary.clone()))
            .await
            .unwrap();
        assert_eq!(registers[0].id, register());
        assert!(boundary.requests()[0].options.headers.is_empty());
    }

    #[tokio::test]
    async fn test_top_up_body_is_wire_shaped() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply(
            "cash-register/top-up",
            Reply::ok(json!({
                "id": 31,
                "amount": 1500,
                "currencyCode": "AMD",
                "comment": "restock",
                "createdAt": "2026-10-19T09:30:00Z"
            })),
        );

        let submission = TopUpSubmission {
            amount: Money::from_minor(1500),
            currency_code: CurrencyCode::parse("AMD").unwrap(),
            comment: Some("restock".into()),
        };
        let transaction = top_up(&ResourceClient::new(boundary.clone()), register(), &submission)
            .await
            .unwrap();

        assert_eq!(transaction.id, 31);
        assert_eq!(
            boundary.requests()[0].body,
            Some(json!({"amount": 1500, "currencyCode": "AMD", "comment": "restock"}))
        );
    }
}
