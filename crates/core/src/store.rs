//! Storage port consumed by the lifecycle services.
//!
//! A [`Store`] hands out [`Transaction`]s. Every lifecycle operation opens
//! exactly one transaction, performs all of its reads and writes through
//! it, and commits at the end. Dropping a transaction without calling
//! [`Transaction::commit`] discards every write made through it.
//!
//! The `lock_*` reads must serialize concurrent writers of the same rows
//! until the transaction ends (row locks in SQL backends). Callers lock a
//! tender before any of its bids.

use async_trait::async_trait;

use crate::bid::{AuthorType, Bid, BidVersion, CreateBid};
use crate::decision::{BidDecision, Decision};
use crate::error::CoreError;
use crate::feedback::BidFeedback;
use crate::identity::Employee;
use crate::tender::{CreateTender, Tender, TenderVersion};
use crate::types::{DbId, Version};

pub type StoreResult<T> = Result<T, CoreError>;

/// Factory for transactions against the backing store.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    type Tx: Transaction;

    /// Open a new transaction.
    async fn begin(&self) -> StoreResult<Self::Tx>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> StoreResult<()>;
}

/// One atomic unit of work.
#[async_trait]
pub trait Transaction: Send {
    // -- identity -----------------------------------------------------------

    async fn find_employee_by_username(&mut self, username: &str)
        -> StoreResult<Option<Employee>>;

    async fn find_employee(&mut self, id: DbId) -> StoreResult<Option<Employee>>;

    async fn organization_exists(&mut self, id: DbId) -> StoreResult<bool>;

    async fn is_responsible(&mut self, organization_id: DbId, employee_id: DbId)
        -> StoreResult<bool>;

    async fn count_responsibles(&mut self, organization_id: DbId) -> StoreResult<i64>;

    // -- tenders ------------------------------------------------------------

    async fn find_tender(&mut self, id: DbId) -> StoreResult<Option<Tender>>;

    /// Read a tender and hold its row lock until the transaction ends.
    async fn lock_tender(&mut self, id: DbId) -> StoreResult<Option<Tender>>;

    async fn list_tenders(&mut self) -> StoreResult<Vec<Tender>>;

    async fn list_tenders_by_creator(&mut self, username: &str) -> StoreResult<Vec<Tender>>;

    /// Insert a tender with status `CREATED` and version 1.
    async fn insert_tender(&mut self, input: &CreateTender) -> StoreResult<Tender>;

    /// Overwrite the mutable fields of an existing tender.
    async fn update_tender(&mut self, tender: &Tender) -> StoreResult<()>;

    // -- tender versions ----------------------------------------------------

    async fn insert_tender_version(&mut self, tender: &Tender) -> StoreResult<TenderVersion>;

    async fn find_tender_version(
        &mut self,
        tender_id: DbId,
        version: Version,
    ) -> StoreResult<Option<TenderVersion>>;

    /// All snapshots of a tender, ascending by version.
    async fn list_tender_versions(&mut self, tender_id: DbId) -> StoreResult<Vec<TenderVersion>>;

    // -- bids ---------------------------------------------------------------

    async fn find_bid(&mut self, id: DbId) -> StoreResult<Option<Bid>>;

    /// Read a bid and hold its row lock until the transaction ends.
    async fn lock_bid(&mut self, id: DbId) -> StoreResult<Option<Bid>>;

    /// Lock every bid of a tender, ascending by id.
    async fn lock_bids_for_tender(&mut self, tender_id: DbId) -> StoreResult<Vec<Bid>>;

    async fn list_bids_for_tender(&mut self, tender_id: DbId) -> StoreResult<Vec<Bid>>;

    async fn list_bids_by_author(
        &mut self,
        author_type: AuthorType,
        author_id: DbId,
    ) -> StoreResult<Vec<Bid>>;

    /// Insert a bid with status `CREATED` and version 1.
    async fn insert_bid(&mut self, input: &CreateBid) -> StoreResult<Bid>;

    async fn update_bid(&mut self, bid: &Bid) -> StoreResult<()>;

    // -- bid versions -------------------------------------------------------

    async fn insert_bid_version(&mut self, bid: &Bid) -> StoreResult<BidVersion>;

    async fn find_bid_version(
        &mut self,
        bid_id: DbId,
        version: Version,
    ) -> StoreResult<Option<BidVersion>>;

    async fn list_bid_versions(&mut self, bid_id: DbId) -> StoreResult<Vec<BidVersion>>;

    // -- decisions ----------------------------------------------------------

    async fn find_decision(
        &mut self,
        bid_id: DbId,
        responsible_id: DbId,
    ) -> StoreResult<Option<BidDecision>>;

    async fn insert_decision(
        &mut self,
        bid_id: DbId,
        responsible_id: DbId,
        decision: Decision,
    ) -> StoreResult<BidDecision>;

    async fn count_decisions(&mut self, bid_id: DbId, decision: Decision) -> StoreResult<i64>;

    // -- feedback -----------------------------------------------------------

    async fn find_feedback(
        &mut self,
        bid_id: DbId,
        username: &str,
    ) -> StoreResult<Option<BidFeedback>>;

    async fn insert_feedback(
        &mut self,
        bid_id: DbId,
        username: &str,
        feedback: &str,
    ) -> StoreResult<BidFeedback>;

    async fn list_feedback_for_bids(&mut self, bid_ids: &[DbId]) -> StoreResult<Vec<BidFeedback>>;

    // -- completion ---------------------------------------------------------

    /// Make every write of this transaction durable.
    async fn commit(self) -> StoreResult<()>;
}
