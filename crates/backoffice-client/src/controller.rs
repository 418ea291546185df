//! # Store Controller
//!
//! Drives the pure [`BackOfficeStore`] with remote operations.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Controller::run                                  │
//! │                                                                         │
//! │   store.begin(slice)          ──► slice: isLoading = true, error = None │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   facade call (await)         ──► no lock is held while waiting         │
//! │        │                                                                │
//! │        ├── Ok(data)   ──► store.succeed(slice, request, wrap(data))     │
//! │        └── Err(msg)   ──► store.fail(slice, request, msg)               │
//! │                                                                         │
//! │   Remote failures end up in the slice; they are not returned as Err.    │
//! │   Err is reserved for caller mistakes and refused transitions.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The store sits behind `Arc<Mutex<_>>` so overlapping operations (two
//! product searches, a balance refresh during a top-up) can run from
//! concurrent tasks. Every lock is taken and released synchronously.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use backoffice_core::pricing::estimate_catalyst_value;
use backoffice_core::store::{RequestId, ResourcePayload, Settlement};
use backoffice_core::validation::validate_currency_code;
use backoffice_core::{
    Action, BackOfficeStore, CashRegisterId, CashTransaction, CurrencyCode, MetalContent, Money,
    CoreError, PendingTransaction, ReportKind, ReportPeriod, SettlementPolicy, SliceId,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::boundary::HttpBoundary;
use crate::error::{ClientError, ClientResult, RemoteResult};
use crate::facade::ResourceClient;
use crate::services::auth::{self, Credentials, UserProfile};
use crate::services::{catalog, customers, pricing, registers, reports};

// =============================================================================
// Store Handle
// =============================================================================

/// Shared, lockable store.
#[derive(Debug, Clone, Default)]
pub struct StoreHandle {
    store: Arc<Mutex<BackOfficeStore>>,
}

impl StoreHandle {
    pub fn new(policy: SettlementPolicy) -> Self {
        StoreHandle {
            store: Arc::new(Mutex::new(BackOfficeStore::init(policy))),
        }
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let loading = handle.with_store(|store| store.is_loading(SliceId::Products));
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&BackOfficeStore) -> R,
    {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    /// Executes a function with write access to the store.
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut BackOfficeStore) -> R,
    {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    /// A copy of the current state, for rendering.
    pub fn snapshot(&self) -> BackOfficeStore {
        self.with_store(Clone::clone)
    }
}

// =============================================================================
// Run Outcome
// =============================================================================

/// How one remote operation ended for its slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub request: RequestId,
    pub settlement: Settlement,

    /// The message recorded in the slice when the call failed.
    pub error: Option<String>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

// =============================================================================
// Controller
// =============================================================================

pub struct Controller<B> {
    client: ResourceClient<B>,
    store: StoreHandle,
    register: Mutex<Option<CashRegisterId>>,
}

impl<B: HttpBoundary> Controller<B> {
    pub fn new(boundary: Arc<B>, policy: SettlementPolicy) -> Self {
        Controller {
            client: ResourceClient::new(boundary),
            store: StoreHandle::new(policy),
            register: Mutex::new(None),
        }
    }

    pub fn client(&self) -> &ResourceClient<B> {
        &self.client
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// The register register-scoped calls currently run against.
    pub fn active_register(&self) -> Option<CashRegisterId> {
        *self.register.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_register(&self) -> ClientResult<CashRegisterId> {
        self.active_register().ok_or(ClientError::NoRegisterSelected)
    }

    fn set_register(&self, register: Option<CashRegisterId>) {
        *self.register.lock().unwrap_or_else(PoisonError::into_inner) = register;
    }

    /// Runs `fetch` as one lifecycle of `slice`.
    async fn run<T, Fut>(
        &self,
        slice: SliceId,
        operation: &'static str,
        fetch: Fut,
        wrap: impl FnOnce(T) -> ResourcePayload,
    ) -> ClientResult<RunOutcome>
    where
        Fut: Future<Output = RemoteResult<T>>,
    {
        let request = self.store.with_store_mut(|s| s.begin(slice, operation))?;

        match fetch.await {
            Ok(data) => {
                let payload = wrap(data);
                let settlement = self
                    .store
                    .with_store_mut(|s| s.succeed(slice, operation, request, payload))?;
                Ok(RunOutcome {
                    request,
                    settlement,
                    error: None,
                })
            }
            Err(err) => {
                let message = err.into_message();
                warn!(slice = %slice, operation, %request, %message, "operation failed");
                let settlement = self
                    .store
                    .with_store_mut(|s| s.fail(slice, operation, request, Some(message.clone())))?;
                Ok(RunOutcome {
                    request,
                    settlement,
                    error: Some(message),
                })
            }
        }
    }

    // -------------------------------------------------------------------------
    // Catalog & lookups
    // -------------------------------------------------------------------------

    pub async fn load_products(&self, query: Option<&str>) -> ClientResult<RunOutcome> {
        self.run(
            SliceId::Products,
            "fetch",
            catalog::fetch_products(&self.client, query),
            ResourcePayload::Products,
        )
        .await
    }

    pub async fn load_warehouses(&self) -> ClientResult<RunOutcome> {
        self.run(
            SliceId::Warehouses,
            "fetch",
            catalog::fetch_warehouses(&self.client),
            ResourcePayload::Warehouses,
        )
        .await
    }

    pub async fn load_shops(&self) -> ClientResult<RunOutcome> {
        self.run(
            SliceId::Shops,
            "fetch",
            catalog::fetch_shops(&self.client),
            ResourcePayload::Shops,
        )
        .await
    }

    pub async fn load_cash_registers(&self) -> ClientResult<RunOutcome> {
        self.run(
            SliceId::CashRegisters,
            "fetch",
            registers::fetch_cash_registers(&self.client),
            ResourcePayload::CashRegisters,
        )
        .await
    }

    /// Lists customers, or searches them when `query` is given.
    pub async fn load_customers(&self, query: Option<&str>) -> ClientResult<RunOutcome> {
        match query {
            Some(query) => {
                self.run(
                    SliceId::Customers,
                    "search",
                    customers::search_customers(&self.client, query),
                    ResourcePayload::Customers,
                )
                .await
            }
            None => {
                self.run(
                    SliceId::Customers,
                    "fetch",
                    customers::fetch_customers(&self.client),
                    ResourcePayload::Customers,
                )
                .await
            }
        }
    }

    pub async fn load_metal_rates(&self) -> ClientResult<RunOutcome> {
        self.run(
            SliceId::MetalRates,
            "fetch",
            pricing::fetch_metal_rates(&self.client),
            ResourcePayload::MetalRates,
        )
        .await
    }

    pub async fn load_catalyst_prices(&self, query: Option<&str>) -> ClientResult<RunOutcome> {
        self.run(
            SliceId::CatalystPrices,
            "fetch",
            pricing::fetch_catalyst_prices(&self.client, query),
            ResourcePayload::CatalystPrices,
        )
        .await
    }

    /// Values a catalyst against the metal rates already in the store.
    pub fn estimate_catalyst(
        &self,
        content: &MetalContent,
        currency: &CurrencyCode,
        margin_bps: u32,
    ) -> ClientResult<Money> {
        self.store.with_store(|s| -> ClientResult<Money> {
            let rates = s.metal_rates().data().map(Vec::as_slice).unwrap_or_default();
            Ok(estimate_catalyst_value(content, rates, currency, margin_bps)?)
        })
    }

    // -------------------------------------------------------------------------
    // Register-scoped
    // -------------------------------------------------------------------------

    pub async fn load_report(&self, kind: ReportKind, period: ReportPeriod) -> ClientResult<RunOutcome> {
        let register = self.require_register()?;
        self.run(
            SliceId::Reports,
            "fetch",
            reports::fetch_report(&self.client, register, kind, period),
            ResourcePayload::Report,
        )
        .await
    }

    pub async fn refresh_session(&self) -> ClientResult<RunOutcome> {
        let register = self.require_register()?;
        self.run(
            SliceId::Session,
            "status",
            registers::fetch_session_status(&self.client, register),
            ResourcePayload::Session,
        )
        .await
    }

    pub async fn open_session(&self) -> ClientResult<RunOutcome> {
        let register = self.require_register()?;
        let outcome = self
            .run(
                SliceId::Session,
                "open",
                registers::open_session(&self.client, register),
                ResourcePayload::Session,
            )
            .await?;
        if outcome.succeeded() {
            info!(register = %register, "session opened");
        }
        Ok(outcome)
    }

    pub async fn close_session(&self) -> ClientResult<RunOutcome> {
        let register = self.require_register()?;
        let outcome = self
            .run(
                SliceId::Session,
                "close",
                registers::close_session(&self.client, register),
                ResourcePayload::Session,
            )
            .await?;
        if outcome.succeeded() {
            info!(register = %register, "session closed");
        }
        Ok(outcome)
    }

    pub async fn refresh_balance(&self) -> ClientResult<RunOutcome> {
        let register = self.require_register()?;
        self.run(
            SliceId::CashBalance,
            "fetch",
            registers::fetch_cash_balance(&self.client, register),
            ResourcePayload::CashBalance,
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Cash top-up
    // -------------------------------------------------------------------------

    /// Stages a top-up for confirmation. Nothing is sent yet.
    pub fn stage_top_up(&self, amount: Money, currency: &str, comment: Option<&str>) -> ClientResult<()> {
        self.require_register()?;
        let currency = validate_currency_code(currency)?;
        let candidate = PendingTransaction::new(amount, currency, comment, Utc::now())?;
        self.store
            .with_store_mut(|s| s.dispatch(Action::StageTopUp(candidate)))?;
        Ok(())
    }

    pub fn cancel_top_up(&self) -> ClientResult<()> {
        self.store.with_store_mut(|s| s.dispatch(Action::CancelTopUp))?;
        Ok(())
    }

    /// Dismisses a committed top-up.
    pub fn acknowledge_top_up(&self) -> ClientResult<()> {
        self.store
            .with_store_mut(|s| s.dispatch(Action::AcknowledgeTopUp))?;
        Ok(())
    }

    /// Submits the staged top-up, then refreshes session and balance.
    ///
    /// On failure the candidate stays staged with the error attached, so it
    /// can be confirmed again or cancelled.
    ///
    /// A top-up the server accepted is returned as `Ok` even when the
    /// workflow was reset while the request was in flight (register switch,
    /// logout). Session and balance are then left to the new context.
    pub async fn confirm_top_up(&self) -> ClientResult<CashTransaction> {
        let register = self.require_register()?;
        let (request, submission) = self.store.with_store_mut(|s| s.begin_top_up_commit())?;

        match registers::top_up(&self.client, register, &submission).await {
            Ok(transaction) => {
                info!(
                    register = %register,
                    transaction = transaction.id,
                    amount = %transaction.amount.format(&transaction.currency_code),
                    "cash top-up committed"
                );

                let settled = self.store.with_store_mut(|s| {
                    s.succeed(
                        SliceId::TopUp,
                        "commit",
                        request,
                        ResourcePayload::TopUp(transaction.clone()),
                    )
                });
                match settled {
                    Ok(_) => {}
                    Err(CoreError::InvalidTransition { state, .. }) => {
                        warn!(
                            register = %register,
                            transaction = transaction.id,
                            state,
                            "top-up workflow was reset before the commit settled"
                        );
                        return Ok(transaction);
                    }
                    Err(err) => return Err(err.into()),
                }

                self.refresh_session().await?;
                self.refresh_balance().await?;
                Ok(transaction)
            }
            Err(err) => {
                warn!(register = %register, message = %err, "cash top-up failed");
                let settled = self.store.with_store_mut(|s| {
                    s.fail(SliceId::TopUp, "commit", request, Some(err.message().to_string()))
                });
                match settled {
                    Ok(_) => {}
                    Err(CoreError::InvalidTransition { state, .. }) => {
                        warn!(register = %register, state, "top-up workflow was reset before the commit failed");
                    }
                    Err(core) => return Err(core.into()),
                }
                Err(err.into())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Slice housekeeping & lifecycle
    // -------------------------------------------------------------------------

    pub fn clear_error(&self, slice: SliceId) -> ClientResult<()> {
        self.store
            .with_store_mut(|s| s.dispatch(Action::ClearError(slice)))?;
        Ok(())
    }

    pub fn reset(&self, slice: SliceId) -> ClientResult<()> {
        self.store.with_store_mut(|s| s.dispatch(Action::Reset(slice)))?;
        Ok(())
    }

    /// Makes `register` the operational context and drops everything that
    /// belonged to the previous one.
    pub fn switch_register(&self, register: CashRegisterId) -> ClientResult<()> {
        let previous = self.active_register();
        self.set_register(Some(register));
        if previous != Some(register) {
            self.store
                .with_store_mut(|s| s.dispatch(Action::SwitchRegister))?;
        }
        info!(register = %register, previous = ?previous.map(|r| r.get()), "register selected");
        Ok(())
    }

    pub async fn login(&self, credentials: &Credentials) -> ClientResult<UserProfile> {
        let response = auth::login(&self.client, credentials).await?;
        self.client.boundary().set_auth_token(Some(response.token));
        Ok(response.user)
    }

    /// Forgets the token, the register and every slice.
    pub fn logout(&self) -> ClientResult<()> {
        self.client.boundary().set_auth_token(None);
        self.set_register(None);
        self.store.with_store_mut(|s| s.dispatch(Action::Teardown))?;
        info!("logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBoundary, Reply};
    use backoffice_core::workflow::TopUpState;
    use reqwest::Method;
    use serde_json::{json, Value};

    fn register(id: i64) -> CashRegisterId {
        CashRegisterId::new(id).unwrap()
    }

    fn controller(boundary: &Arc<FakeBoundary>, policy: SettlementPolicy) -> Controller<FakeBoundary> {
        Controller::new(Arc::clone(boundary), policy)
    }

    fn product_json(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "sku": format!("SKU-{}", id),
            "name": name,
            "price": 12000,
            "currencyCode": "AMD",
            "quantity": 1
        })
    }

    fn session_json(open: bool) -> Value {
        json!({ "hasOpenSession": open })
    }

    fn balance_json(amount: i64) -> Value {
        json!({
            "cashRegisterId": 7,
            "balances": [{ "currencyCode": "AMD", "amount": amount }]
        })
    }

    async fn wait_for_requests(boundary: &FakeBoundary, count: usize) {
        while boundary.requests().len() < count {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_session_status_timeout_uses_default_message() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply("cash-register/session/status", Reply::network("timeout"));
        let controller = controller(&boundary, SettlementPolicy::default());
        controller.switch_register(register(7)).unwrap();

        let outcome = controller.refresh_session().await.unwrap();

        assert_eq!(outcome.error.as_deref(), Some("Failed to verify session status"));
        controller.store().with_store(|s| {
            assert!(!s.session().is_loading());
            assert_eq!(s.session().error(), Some("Failed to verify session status"));
            assert!(!s.session().has_open_session());
        });
        let sent = boundary.requests();
        assert_eq!(sent[0].options.header_value("X-CashRegister-Id"), Some("7"));
    }

    #[tokio::test]
    async fn test_structured_error_reaches_the_slice() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply(
            "cash-register/session/open",
            Reply::api(409, json!({"error": "Session already open"})),
        );
        let controller = controller(&boundary, SettlementPolicy::default());
        controller.switch_register(register(7)).unwrap();

        let outcome = controller.open_session().await.unwrap();

        assert!(!outcome.succeeded());
        assert_eq!(
            controller.store().with_store(|s| s.error(SliceId::Session).map(str::to_string)),
            Some("Session already open".to_string())
        );
    }

    #[tokio::test]
    async fn test_register_scoped_call_without_register_sends_nothing() {
        let boundary = Arc::new(FakeBoundary::new());
        let controller = controller(&boundary, SettlementPolicy::default());

        let err = controller.refresh_balance().await.unwrap_err();

        assert!(matches!(err, ClientError::NoRegisterSelected));
        assert!(boundary.requests().is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_requests_last_settled_wins() {
        let boundary = Arc::new(FakeBoundary::new());
        let (reply_a, send_a) = Reply::deferred();
        let (reply_b, send_b) = Reply::deferred();
        boundary.reply("products", reply_a);
        boundary.reply("products", reply_b);
        let controller = Arc::new(controller(&boundary, SettlementPolicy::LastSettledWins));

        let a = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.load_products(Some("ring")).await }
        });
        wait_for_requests(&boundary, 1).await;
        let b = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.load_products(Some("chain")).await }
        });
        wait_for_requests(&boundary, 2).await;

        send_b.send(Ok(json!([product_json(2, "Chain")]))).unwrap();
        b.await.unwrap().unwrap();
        send_a.send(Ok(json!([product_json(1, "Ring")]))).unwrap();
        a.await.unwrap().unwrap();

        controller.store().with_store(|s| {
            let products = s.products().data().unwrap();
            assert_eq!(products[0].name, "Ring");
            assert!(!s.products().is_loading());
        });
    }

    #[tokio::test]
    async fn test_overlapping_requests_latest_request_wins() {
        let boundary = Arc::new(FakeBoundary::new());
        let (reply_a, send_a) = Reply::deferred();
        let (reply_b, send_b) = Reply::deferred();
        boundary.reply("products", reply_a);
        boundary.reply("products", reply_b);
        let controller = Arc::new(controller(&boundary, SettlementPolicy::LatestRequestWins));

        let a = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.load_products(None).await }
        });
        wait_for_requests(&boundary, 1).await;
        let b = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.load_products(None).await }
        });
        wait_for_requests(&boundary, 2).await;

        send_b.send(Ok(json!([product_json(2, "Chain")]))).unwrap();
        assert!(b.await.unwrap().unwrap().settlement.is_applied());
        send_a.send(Ok(json!([product_json(1, "Ring")]))).unwrap();
        assert!(!a.await.unwrap().unwrap().settlement.is_applied());

        controller.store().with_store(|s| {
            assert_eq!(s.products().data().unwrap()[0].name, "Chain");
        });
    }

    #[tokio::test]
    async fn test_confirmed_top_up_is_submitted_once_then_refetches() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply(
            "cash-register/top-up",
            Reply::ok(json!({
                "id": 41,
                "amount": 1500,
                "currencyCode": "AMD",
                "comment": "restock",
                "createdAt": "2026-10-19T10:00:00Z"
            })),
        );
        boundary.reply("cash-register/session/status", Reply::ok(session_json(true)));
        boundary.reply("cash-register/balance", Reply::ok(balance_json(51500)));
        let controller = controller(&boundary, SettlementPolicy::default());
        controller.switch_register(register(7)).unwrap();

        controller
            .stage_top_up(Money::from_minor(1500), "AMD", Some("restock"))
            .unwrap();
        assert!(boundary.requests().is_empty());

        let transaction = controller.confirm_top_up().await.unwrap();
        assert_eq!(transaction.id, 41);

        let posts = boundary.requests_to(Method::POST, "cash-register/top-up");
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].body,
            Some(json!({"amount": 1500, "currencyCode": "AMD", "comment": "restock"}))
        );
        assert_eq!(posts[0].options.header_value("X-CashRegister-Id"), Some("7"));

        assert_eq!(boundary.requests_to(Method::GET, "cash-register/session/status").len(), 1);
        assert_eq!(boundary.requests_to(Method::GET, "cash-register/balance").len(), 1);

        controller.store().with_store(|s| {
            assert!(s.top_up().pending().is_none());
            assert!(matches!(s.top_up().state(), TopUpState::Committed { .. }));
            assert!(s.session().has_open_session());
            let amd = CurrencyCode::parse("AMD").unwrap();
            assert_eq!(
                s.cash_balance().data().unwrap().amount_in(&amd),
                Money::from_minor(51500)
            );
        });

        controller.acknowledge_top_up().unwrap();
        assert!(matches!(
            controller.store().with_store(|s| s.top_up().state().clone()),
            TopUpState::NoPending
        ));
    }

    #[tokio::test]
    async fn test_failed_top_up_keeps_candidate_for_retry() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply(
            "cash-register/top-up",
            Reply::api(422, json!({"error": "Session is closed"})),
        );
        let controller = controller(&boundary, SettlementPolicy::default());
        controller.switch_register(register(7)).unwrap();
        controller.stage_top_up(Money::from_minor(1500), "AMD", None).unwrap();

        let err = controller.confirm_top_up().await.unwrap_err();

        assert_eq!(err.to_string(), "Session is closed");
        controller.store().with_store(|s| {
            assert!(s.top_up().pending().is_some());
            assert_eq!(s.top_up().error(), Some("Session is closed"));
        });
        assert!(boundary.requests_to(Method::GET, "cash-register/balance").is_empty());

        controller.cancel_top_up().unwrap();
        assert!(controller.store().with_store(|s| s.top_up().pending().is_none()));
    }

    #[tokio::test]
    async fn test_top_up_accepted_after_register_switch_is_still_ok() {
        let boundary = Arc::new(FakeBoundary::new());
        let (reply, send) = Reply::deferred();
        boundary.reply("cash-register/top-up", reply);
        let controller = Arc::new(controller(&boundary, SettlementPolicy::default()));
        controller.switch_register(register(7)).unwrap();
        controller.stage_top_up(Money::from_minor(1500), "AMD", Some("restock")).unwrap();

        let commit = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.confirm_top_up().await }
        });
        wait_for_requests(&boundary, 1).await;
        controller.switch_register(register(8)).unwrap();

        send.send(Ok(json!({
            "id": 42,
            "amount": 1500,
            "currencyCode": "AMD",
            "comment": "restock",
            "createdAt": "2026-10-19T10:00:00Z"
        })))
        .unwrap();
        let transaction = commit.await.unwrap().unwrap();

        assert_eq!(transaction.id, 42);
        assert!(boundary.requests_to(Method::GET, "cash-register/balance").is_empty());
        controller.store().with_store(|s| {
            assert!(matches!(s.top_up().state(), TopUpState::NoPending));
            assert!(s.cash_balance().is_initial());
        });
    }

    #[tokio::test]
    async fn test_zero_amount_is_rejected_before_any_request() {
        let boundary = Arc::new(FakeBoundary::new());
        let controller = controller(&boundary, SettlementPolicy::default());
        controller.switch_register(register(7)).unwrap();

        let err = controller.stage_top_up(Money::zero(), "AMD", None).unwrap_err();

        assert!(err.is_caller_error());
        assert!(controller.confirm_top_up().await.is_err());
        assert!(boundary.requests().is_empty());
    }

    #[tokio::test]
    async fn test_switching_register_resets_scoped_slices() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply("cash-register/balance", Reply::ok(balance_json(9000)));
        boundary.reply("shops", Reply::ok(json!([{"id": 1, "name": "Main"}])));
        let controller = controller(&boundary, SettlementPolicy::default());
        controller.switch_register(register(7)).unwrap();
        controller.refresh_balance().await.unwrap();
        controller.load_shops().await.unwrap();
        controller.stage_top_up(Money::from_minor(500), "AMD", None).unwrap();

        controller.switch_register(register(8)).unwrap();

        assert_eq!(controller.active_register(), Some(register(8)));
        controller.store().with_store(|s| {
            assert!(s.cash_balance().data().is_none());
            assert!(s.top_up().pending().is_none());
            assert_eq!(s.shops().data().map(Vec::len), Some(1));
        });
    }

    #[tokio::test]
    async fn test_session_response_for_previous_register_is_dropped() {
        let boundary = Arc::new(FakeBoundary::new());
        let (reply, send) = Reply::deferred();
        boundary.reply("cash-register/session/status", reply);
        let controller = Arc::new(controller(&boundary, SettlementPolicy::LastSettledWins));
        controller.switch_register(register(7)).unwrap();

        let refresh = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh_session().await }
        });
        wait_for_requests(&boundary, 1).await;
        controller.switch_register(register(8)).unwrap();

        send.send(Ok(session_json(true))).unwrap();
        let outcome = refresh.await.unwrap().unwrap();

        assert!(!outcome.settlement.is_applied());
        controller.store().with_store(|s| {
            assert!(!s.session().has_open_session());
            assert!(s.session().resource().is_initial());
        });
    }

    #[tokio::test]
    async fn test_login_sets_token_and_logout_tears_down() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply(
            "auth/login",
            Reply::ok(json!({"token": "abc", "user": {"id": 3, "username": "anna"}})),
        );
        boundary.reply("shops", Reply::ok(json!([])));
        let controller = controller(&boundary, SettlementPolicy::default());

        let user = controller
            .login(&Credentials {
                username: "anna".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
        assert_eq!(user.username, "anna");
        assert_eq!(boundary.token().as_deref(), Some("abc"));

        controller.switch_register(register(7)).unwrap();
        controller.load_shops().await.unwrap();
        controller.logout().unwrap();

        assert_eq!(boundary.token(), None);
        assert_eq!(controller.active_register(), None);
        assert!(controller.store().with_store(|s| s.shops().data().is_none()));
    }

    #[tokio::test]
    async fn test_clear_error_keeps_data() {
        let boundary = Arc::new(FakeBoundary::new());
        boundary.reply("shops", Reply::ok(json!([{"id": 1, "name": "Main"}])));
        boundary.reply("shops", Reply::network("down"));
        let controller = controller(&boundary, SettlementPolicy::default());

        controller.load_shops().await.unwrap();
        controller.load_shops().await.unwrap();
        assert_eq!(
            controller.store().with_store(|s| s.error(SliceId::Shops).map(str::to_string)),
            Some("Failed to load shops".to_string())
        );

        controller.clear_error(SliceId::Shops).unwrap();
        controller.store().with_store(|s| {
            assert_eq!(s.error(SliceId::Shops), None);
            assert_eq!(s.shops().data().map(Vec::len), Some(1));
        });
    }

    #[test]
    fn test_estimate_without_rates_reports_missing_metal() {
        let boundary = Arc::new(FakeBoundary::new());
        let controller = controller(&boundary, SettlementPolicy::default());
        let content = MetalContent {
            platinum_mg: 1500,
            ..Default::default()
        };

        let err = controller
            .estimate_catalyst(&content, &CurrencyCode::default(), 0)
            .unwrap_err();
        assert!(matches!(err, ClientError::Core(_)));
    }
}
