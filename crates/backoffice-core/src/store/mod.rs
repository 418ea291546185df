//! # Back Office Store
//!
//! One explicit store value per console session. It owns every slice and
//! the top-up workflow; nothing mutates them except [`BackOfficeStore::dispatch`].
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Controller ──► Action ──► dispatch() ──┬──► ResourceSlot (generic)    │
//! │                                          │     Requested / Failed       │
//! │                                          │     ClearError / Reset       │
//! │                                          │                              │
//! │                                          ├──► typed fulfill()           │
//! │                                          │     Succeeded { payload }    │
//! │                                          │                              │
//! │                                          └──► TopUpWorkflow             │
//! │                                                Stage / Cancel / Commit  │
//! │                                                                         │
//! │   Lifecycle:  init(policy) ─► ... ─► switch_register() ─► teardown()    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pending and rejected handling is written once against [`ResourceSlot`];
//! only a successful payload needs to know the concrete slice type.

pub mod lifecycle;
pub mod resource;
pub mod session;

pub use lifecycle::{ActionType, LifecycleEvent, LifecyclePhase, Phase, ResourcePayload, SliceId};
pub use resource::{
    AsyncResourceState, RequestId, ResourceSlot, Settlement, SettlementPolicy, SlicePhase,
    GENERIC_FAILURE_MESSAGE,
};
pub use session::SessionState;

use serde::Serialize;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::{
    CashBalance, CashRegister, CatalystPrice, Customer, MetalRate, Product, Report, Shop,
    Warehouse,
};
use crate::workflow::{PendingTransaction, TopUpSubmission, TopUpWorkflow};

// =============================================================================
// Actions
// =============================================================================

/// Everything that can change the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A step of a remote operation.
    Lifecycle(LifecycleEvent),

    /// Dismiss the error shown for a slice.
    ClearError(SliceId),

    /// Return one slice to its initial state.
    Reset(SliceId),

    /// Forget the session details without a round trip.
    ClearSessionStatus,

    ResetSessionState,

    StageTopUp(PendingTransaction),
    CancelTopUp,
    AcknowledgeTopUp,

    /// The active cash register changed.
    SwitchRegister,

    /// Logout: every slice back to initial.
    Teardown,
}

/// What a dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A `Requested` event started a request with this id.
    Started(RequestId),

    /// A `Succeeded`/`Failed` event was applied or discarded.
    Settled(Settlement),

    Done,
}

impl DispatchOutcome {
    /// Request id of a `Started` outcome.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            DispatchOutcome::Started(id) => Some(*id),
            _ => None,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// State of every slice the console shows.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackOfficeStore {
    products: AsyncResourceState<Vec<Product>>,
    warehouses: AsyncResourceState<Vec<Warehouse>>,
    shops: AsyncResourceState<Vec<Shop>>,
    cash_registers: AsyncResourceState<Vec<CashRegister>>,
    customers: AsyncResourceState<Vec<Customer>>,
    metal_rates: AsyncResourceState<Vec<MetalRate>>,
    catalyst_prices: AsyncResourceState<Vec<CatalystPrice>>,
    report: AsyncResourceState<Report>,
    session: SessionState,
    cash_balance: AsyncResourceState<CashBalance>,
    top_up: TopUpWorkflow,

    #[serde(skip)]
    policy: SettlementPolicy,
}

impl BackOfficeStore {
    /// Creates a store with every slice idle.
    pub fn init(policy: SettlementPolicy) -> Self {
        let mut store = BackOfficeStore {
            policy,
            ..Default::default()
        };
        store.set_policy(policy);
        debug!(%policy, "store initialized");
        store
    }

    pub fn policy(&self) -> SettlementPolicy {
        self.policy
    }

    /// Changes the settlement policy of every slice.
    pub fn set_policy(&mut self, policy: SettlementPolicy) {
        self.policy = policy;
        for slice in SliceId::ALL {
            if let Some(slot) = self.slot_mut(slice) {
                slot.apply_policy(policy);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Applies one action. On `Err` the store is unchanged.
    pub fn dispatch(&mut self, action: Action) -> CoreResult<DispatchOutcome> {
        match action {
            Action::Lifecycle(event) => self.apply_lifecycle(event),

            Action::ClearError(slice) => {
                match self.slot_mut(slice) {
                    Some(slot) => slot.dismiss_error(),
                    None => self.top_up.clear_error(),
                }
                Ok(DispatchOutcome::Done)
            }

            Action::Reset(slice) => {
                self.reset_slice(slice);
                Ok(DispatchOutcome::Done)
            }

            Action::ClearSessionStatus => {
                self.session.clear_session_status();
                Ok(DispatchOutcome::Done)
            }

            Action::ResetSessionState => {
                self.session.reset_session_state();
                Ok(DispatchOutcome::Done)
            }

            Action::StageTopUp(candidate) => {
                self.top_up.stage(candidate)?;
                Ok(DispatchOutcome::Done)
            }

            Action::CancelTopUp => {
                self.top_up.cancel()?;
                Ok(DispatchOutcome::Done)
            }

            Action::AcknowledgeTopUp => {
                self.top_up.acknowledge();
                Ok(DispatchOutcome::Done)
            }

            Action::SwitchRegister => {
                self.switch_register();
                Ok(DispatchOutcome::Done)
            }

            Action::Teardown => {
                self.teardown();
                Ok(DispatchOutcome::Done)
            }
        }
    }

    fn apply_lifecycle(&mut self, event: LifecycleEvent) -> CoreResult<DispatchOutcome> {
        let action_type = event.action_type();
        let slice = event.slice;

        let outcome = match event.phase {
            LifecyclePhase::Requested => DispatchOutcome::Started(self.start(slice)?),
            LifecyclePhase::Succeeded { request, payload } => {
                DispatchOutcome::Settled(self.settle_success(slice, request, payload)?)
            }
            LifecyclePhase::Failed { request, message } => {
                DispatchOutcome::Settled(self.settle_failure(slice, request, message)?)
            }
        };

        debug!(action = %action_type, ?outcome, "dispatched");
        Ok(outcome)
    }

    /// Dispatches `Requested` for `slice` and returns the new request id.
    pub fn begin(&mut self, slice: SliceId, operation: &'static str) -> CoreResult<RequestId> {
        let request = self.start(slice)?;
        debug!(action = %LifecycleEvent::requested(slice, operation).action_type(), %request, "dispatched");
        Ok(request)
    }

    /// Dispatches `Succeeded` for a request started with [`begin`](Self::begin).
    pub fn succeed(
        &mut self,
        slice: SliceId,
        operation: &'static str,
        request: RequestId,
        payload: ResourcePayload,
    ) -> CoreResult<Settlement> {
        let settlement = self.settle_success(slice, request, payload)?;
        debug!(slice = %slice, operation, %request, ?settlement, "succeeded");
        Ok(settlement)
    }

    /// Dispatches `Failed` for a request started with [`begin`](Self::begin).
    pub fn fail(
        &mut self,
        slice: SliceId,
        operation: &'static str,
        request: RequestId,
        message: Option<String>,
    ) -> CoreResult<Settlement> {
        let settlement = self.settle_failure(slice, request, message)?;
        debug!(slice = %slice, operation, %request, ?settlement, "failed");
        Ok(settlement)
    }

    /// Starts committing the staged top-up and hands back the body to send.
    pub fn begin_top_up_commit(&mut self) -> CoreResult<(RequestId, TopUpSubmission)> {
        let (request, submission) = self.top_up.begin_commit()?;
        debug!(%request, "topUp/commit/pending");
        Ok((request, submission))
    }

    fn start(&mut self, slice: SliceId) -> CoreResult<RequestId> {
        match self.slot_mut(slice) {
            Some(slot) => Ok(slot.begin()),
            None => Ok(self.top_up.begin_commit()?.0),
        }
    }

    fn settle_success(
        &mut self,
        slice: SliceId,
        request: RequestId,
        payload: ResourcePayload,
    ) -> CoreResult<Settlement> {
        if payload.slice() != slice {
            return Err(CoreError::PayloadMismatch {
                slice,
                payload: payload.slice(),
            });
        }

        let settlement = match payload {
            ResourcePayload::Products(items) => self.products.fulfill(request, items),
            ResourcePayload::Warehouses(items) => self.warehouses.fulfill(request, items),
            ResourcePayload::Shops(items) => self.shops.fulfill(request, items),
            ResourcePayload::CashRegisters(items) => self.cash_registers.fulfill(request, items),
            ResourcePayload::Customers(items) => self.customers.fulfill(request, items),
            ResourcePayload::MetalRates(items) => self.metal_rates.fulfill(request, items),
            ResourcePayload::CatalystPrices(items) => self.catalyst_prices.fulfill(request, items),
            ResourcePayload::Report(report) => self.report.fulfill(request, report),
            ResourcePayload::Session(details) => self.session.fulfill(request, details),
            ResourcePayload::CashBalance(balance) => self.cash_balance.fulfill(request, balance),
            ResourcePayload::TopUp(transaction) => {
                self.top_up.commit_succeeded(request, transaction)?;
                Settlement::Applied
            }
        };
        Ok(settlement)
    }

    fn settle_failure(
        &mut self,
        slice: SliceId,
        request: RequestId,
        message: Option<String>,
    ) -> CoreResult<Settlement> {
        match self.slot_mut(slice) {
            Some(slot) => Ok(slot.fail(request, message)),
            None => {
                self.top_up.commit_failed(request, message)?;
                Ok(Settlement::Applied)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle of the store itself
    // -------------------------------------------------------------------------

    /// Drops everything that belongs to the previous cash register.
    pub fn switch_register(&mut self) {
        for slice in SliceId::ALL.into_iter().filter(SliceId::is_register_scoped) {
            self.reset_slice(slice);
        }
        debug!("register-scoped slices reset");
    }

    /// Returns every slice to its initial state. The policy is kept.
    pub fn teardown(&mut self) {
        for slice in SliceId::ALL {
            self.reset_slice(slice);
        }
        debug!("store torn down");
    }

    fn reset_slice(&mut self, slice: SliceId) {
        match self.slot_mut(slice) {
            Some(slot) => slot.reset_slot(),
            None => self.top_up.reset(),
        }
    }

    /// The generic half of a slice. `None` for the top-up workflow, which
    /// has its own state machine.
    fn slot_mut(&mut self, slice: SliceId) -> Option<&mut dyn ResourceSlot> {
        let slot: &mut dyn ResourceSlot = match slice {
            SliceId::Products => &mut self.products,
            SliceId::Warehouses => &mut self.warehouses,
            SliceId::Shops => &mut self.shops,
            SliceId::CashRegisters => &mut self.cash_registers,
            SliceId::Customers => &mut self.customers,
            SliceId::MetalRates => &mut self.metal_rates,
            SliceId::CatalystPrices => &mut self.catalyst_prices,
            SliceId::Reports => &mut self.report,
            SliceId::Session => &mut self.session,
            SliceId::CashBalance => &mut self.cash_balance,
            SliceId::TopUp => return None,
        };
        Some(slot)
    }

    fn slot(&self, slice: SliceId) -> Option<&dyn ResourceSlot> {
        let slot: &dyn ResourceSlot = match slice {
            SliceId::Products => &self.products,
            SliceId::Warehouses => &self.warehouses,
            SliceId::Shops => &self.shops,
            SliceId::CashRegisters => &self.cash_registers,
            SliceId::Customers => &self.customers,
            SliceId::MetalRates => &self.metal_rates,
            SliceId::CatalystPrices => &self.catalyst_prices,
            SliceId::Reports => &self.report,
            SliceId::Session => &self.session,
            SliceId::CashBalance => &self.cash_balance,
            SliceId::TopUp => return None,
        };
        Some(slot)
    }

    // -------------------------------------------------------------------------
    // Selectors
    // -------------------------------------------------------------------------

    pub fn is_loading(&self, slice: SliceId) -> bool {
        match self.slot(slice) {
            Some(slot) => slot.loading(),
            None => self.top_up.is_committing(),
        }
    }

    pub fn error(&self, slice: SliceId) -> Option<&str> {
        match self.slot(slice) {
            Some(slot) => slot.error_message(),
            None => self.top_up.error(),
        }
    }

    pub fn products(&self) -> &AsyncResourceState<Vec<Product>> {
        &self.products
    }

    pub fn warehouses(&self) -> &AsyncResourceState<Vec<Warehouse>> {
        &self.warehouses
    }

    pub fn shops(&self) -> &AsyncResourceState<Vec<Shop>> {
        &self.shops
    }

    pub fn cash_registers(&self) -> &AsyncResourceState<Vec<CashRegister>> {
        &self.cash_registers
    }

    pub fn customers(&self) -> &AsyncResourceState<Vec<Customer>> {
        &self.customers
    }

    pub fn metal_rates(&self) -> &AsyncResourceState<Vec<MetalRate>> {
        &self.metal_rates
    }

    pub fn catalyst_prices(&self) -> &AsyncResourceState<Vec<CatalystPrice>> {
        &self.catalyst_prices
    }

    pub fn report(&self) -> &AsyncResourceState<Report> {
        &self.report
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn cash_balance(&self) -> &AsyncResourceState<CashBalance> {
        &self.cash_balance
    }

    pub fn top_up(&self) -> &TopUpWorkflow {
        &self.top_up
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{CurrencyCode, Money};
    use crate::types::{CashTransaction, SessionDetails};
    use chrono::Utc;

    fn shop(id: i64, name: &str) -> Shop {
        Shop {
            id,
            name: name.to_string(),
            address: None,
            phone: None,
        }
    }

    fn begin(store: &mut BackOfficeStore, slice: SliceId) -> RequestId {
        store
            .dispatch(Action::Lifecycle(LifecycleEvent::requested(slice, "fetchAll")))
            .unwrap()
            .request_id()
            .unwrap()
    }

    fn succeed(store: &mut BackOfficeStore, slice: SliceId, id: RequestId, payload: ResourcePayload) {
        store
            .dispatch(Action::Lifecycle(LifecycleEvent::succeeded(
                slice, "fetchAll", id, payload,
            )))
            .unwrap();
    }

    fn fail(store: &mut BackOfficeStore, slice: SliceId, id: RequestId, message: &str) {
        store
            .dispatch(Action::Lifecycle(LifecycleEvent::failed(
                slice,
                "fetchAll",
                id,
                Some(message.to_string()),
            )))
            .unwrap();
    }

    fn open_session() -> SessionDetails {
        SessionDetails {
            has_open_session: true,
            session_id: Some(3),
            opened_at: None,
            opened_by: None,
        }
    }

    #[test]
    fn test_one_handler_covers_every_slice() {
        let mut store = BackOfficeStore::init(SettlementPolicy::default());

        for slice in SliceId::ALL.into_iter().filter(|s| *s != SliceId::TopUp) {
            let id = begin(&mut store, slice);
            assert!(store.is_loading(slice), "{slice} should be loading");

            fail(&mut store, slice, id, "down");
            assert!(!store.is_loading(slice));
            assert_eq!(store.error(slice), Some("down"));

            store.dispatch(Action::ClearError(slice)).unwrap();
            assert_eq!(store.error(slice), None);
        }
    }

    #[test]
    fn test_success_stores_payload() {
        let mut store = BackOfficeStore::init(SettlementPolicy::default());
        let id = begin(&mut store, SliceId::Shops);
        succeed(
            &mut store,
            SliceId::Shops,
            id,
            ResourcePayload::Shops(vec![shop(1, "Main")]),
        );

        assert_eq!(store.shops().data().unwrap()[0].name, "Main");
        assert!(!store.is_loading(SliceId::Shops));
    }

    #[test]
    fn test_payload_mismatch_leaves_store_unchanged() {
        let mut store = BackOfficeStore::init(SettlementPolicy::default());
        let id = begin(&mut store, SliceId::Products);

        let err = store
            .dispatch(Action::Lifecycle(LifecycleEvent::succeeded(
                SliceId::Products,
                "fetchAll",
                id,
                ResourcePayload::Shops(vec![]),
            )))
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::PayloadMismatch {
                slice: SliceId::Products,
                payload: SliceId::Shops
            }
        ));
        assert!(store.is_loading(SliceId::Products));
        assert!(store.products().data().is_none());
    }

    #[test]
    fn test_overlapping_requests_last_settled_wins() {
        let mut store = BackOfficeStore::init(SettlementPolicy::LastSettledWins);
        let a = begin(&mut store, SliceId::Shops);
        let b = begin(&mut store, SliceId::Shops);

        succeed(&mut store, SliceId::Shops, b, ResourcePayload::Shops(vec![shop(2, "B")]));
        succeed(&mut store, SliceId::Shops, a, ResourcePayload::Shops(vec![shop(1, "A")]));

        assert_eq!(store.shops().data().unwrap()[0].name, "A");
    }

    #[test]
    fn test_overlapping_requests_latest_request_wins() {
        let mut store = BackOfficeStore::init(SettlementPolicy::LatestRequestWins);
        let a = begin(&mut store, SliceId::Shops);
        let b = begin(&mut store, SliceId::Shops);

        succeed(&mut store, SliceId::Shops, b, ResourcePayload::Shops(vec![shop(2, "B")]));
        let outcome = store
            .dispatch(Action::Lifecycle(LifecycleEvent::succeeded(
                SliceId::Shops,
                "fetchAll",
                a,
                ResourcePayload::Shops(vec![shop(1, "A")]),
            )))
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Settled(Settlement::Discarded { latest: Some(b) })
        );
        assert_eq!(store.shops().data().unwrap()[0].name, "B");
    }

    #[test]
    fn test_session_mutators_bypass_lifecycle() {
        let mut store = BackOfficeStore::init(SettlementPolicy::default());
        let id = begin(&mut store, SliceId::Session);
        succeed(&mut store, SliceId::Session, id, ResourcePayload::Session(open_session()));
        assert!(store.session().has_open_session());

        store.dispatch(Action::ClearSessionStatus).unwrap();
        assert!(!store.session().has_open_session());
        assert!(store.session().details().is_none());
    }

    #[test]
    fn test_switch_register_resets_scoped_slices_only() {
        let mut store = BackOfficeStore::init(SettlementPolicy::default());

        let id = begin(&mut store, SliceId::Session);
        succeed(&mut store, SliceId::Session, id, ResourcePayload::Session(open_session()));
        let id = begin(&mut store, SliceId::Shops);
        succeed(&mut store, SliceId::Shops, id, ResourcePayload::Shops(vec![shop(1, "Main")]));
        store
            .dispatch(Action::StageTopUp(
                PendingTransaction::new(
                    Money::from_minor(1500),
                    CurrencyCode::default(),
                    None,
                    Utc::now(),
                )
                .unwrap(),
            ))
            .unwrap();

        store.dispatch(Action::SwitchRegister).unwrap();

        assert!(store.session().resource().is_initial());
        assert!(store.top_up().pending().is_none());
        assert!(store.shops().data().is_some());
    }

    #[test]
    fn test_responses_for_previous_register_are_discarded() {
        let mut store = BackOfficeStore::init(SettlementPolicy::LastSettledWins);
        let session = store.begin(SliceId::Session, "fetchStatus").unwrap();
        let balance = store.begin(SliceId::CashBalance, "fetchBalance").unwrap();

        store.dispatch(Action::SwitchRegister).unwrap();

        let settlement = store
            .succeed(
                SliceId::Session,
                "fetchStatus",
                session,
                ResourcePayload::Session(open_session()),
            )
            .unwrap();
        assert!(!settlement.is_applied());
        assert!(!store.session().has_open_session());
        assert!(store.session().resource().is_initial());

        let settlement = store
            .fail(SliceId::CashBalance, "fetchBalance", balance, Some("timeout".into()))
            .unwrap();
        assert!(!settlement.is_applied());
        assert_eq!(store.error(SliceId::CashBalance), None);

        let fresh = store.begin(SliceId::Session, "fetchStatus").unwrap();
        store
            .succeed(
                SliceId::Session,
                "fetchStatus",
                fresh,
                ResourcePayload::Session(open_session()),
            )
            .unwrap();
        assert!(store.session().has_open_session());
    }

    #[test]
    fn test_teardown_returns_everything_to_initial() {
        let mut store = BackOfficeStore::init(SettlementPolicy::LatestRequestWins);
        let id = begin(&mut store, SliceId::Products);
        succeed(&mut store, SliceId::Products, id, ResourcePayload::Products(vec![]));
        begin(&mut store, SliceId::Customers);

        store.dispatch(Action::Teardown).unwrap();

        assert!(store.products().is_initial());
        assert!(store.customers().is_initial());
        assert_eq!(store.policy(), SettlementPolicy::LatestRequestWins);
    }

    #[test]
    fn test_top_up_commit_through_lifecycle() {
        let mut store = BackOfficeStore::init(SettlementPolicy::default());
        let amd = CurrencyCode::parse("AMD").unwrap();
        let candidate =
            PendingTransaction::new(Money::from_minor(1500), amd.clone(), Some("restock"), Utc::now())
                .unwrap();
        store.dispatch(Action::StageTopUp(candidate)).unwrap();

        let id = store
            .dispatch(Action::Lifecycle(LifecycleEvent::requested(SliceId::TopUp, "commit")))
            .unwrap()
            .request_id()
            .unwrap();
        assert!(store.is_loading(SliceId::TopUp));

        fail(&mut store, SliceId::TopUp, id, "Register is closed");
        assert_eq!(store.error(SliceId::TopUp), Some("Register is closed"));
        assert!(store.top_up().pending().is_some());

        let id = begin(&mut store, SliceId::TopUp);
        succeed(
            &mut store,
            SliceId::TopUp,
            id,
            ResourcePayload::TopUp(CashTransaction {
                id: 1,
                amount: Money::from_minor(1500),
                currency_code: amd,
                comment: Some("restock".into()),
                created_at: Utc::now(),
            }),
        );
        assert!(store.top_up().pending().is_none());
        assert_eq!(store.top_up().state().name(), "committed");

        store.dispatch(Action::AcknowledgeTopUp).unwrap();
        assert_eq!(store.top_up().state().name(), "no_pending");
    }

    #[test]
    fn test_typed_helpers_match_dispatch() {
        let mut store = BackOfficeStore::init(SettlementPolicy::default());
        let id = store.begin(SliceId::Customers, "search").unwrap();
        assert!(store.is_loading(SliceId::Customers));

        let settlement = store
            .fail(SliceId::Customers, "search", id, None)
            .unwrap();
        assert!(settlement.is_applied());
        assert_eq!(store.error(SliceId::Customers), Some(GENERIC_FAILURE_MESSAGE));

        let id = store.begin(SliceId::Customers, "search").unwrap();
        store
            .succeed(SliceId::Customers, "search", id, ResourcePayload::Customers(vec![]))
            .unwrap();
        assert_eq!(store.customers().data(), Some(&vec![]));
    }

    #[test]
    fn test_begin_top_up_commit_returns_submission() {
        let mut store = BackOfficeStore::init(SettlementPolicy::default());
        let candidate = PendingTransaction::new(
            Money::from_minor(1500),
            CurrencyCode::default(),
            Some("restock"),
            Utc::now(),
        )
        .unwrap();
        store.dispatch(Action::StageTopUp(candidate)).unwrap();

        let (_, submission) = store.begin_top_up_commit().unwrap();
        assert_eq!(submission.amount, Money::from_minor(1500));
        assert_eq!(submission.comment.as_deref(), Some("restock"));
        assert!(store.begin_top_up_commit().is_err());
    }

    #[test]
    fn test_commit_without_candidate_is_rejected() {
        let mut store = BackOfficeStore::init(SettlementPolicy::default());
        let err = store
            .dispatch(Action::Lifecycle(LifecycleEvent::requested(SliceId::TopUp, "commit")))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn test_snapshot_serializes_every_slice() {
        let store = BackOfficeStore::init(SettlementPolicy::default());
        let json = serde_json::to_value(&store).unwrap();

        assert_eq!(json["cashRegisters"]["isLoading"], false);
        assert_eq!(json["session"]["hasOpenSession"], false);
        assert_eq!(json["topUp"]["state"], "no_pending");
        assert!(json.get("policy").is_none());
    }
}
