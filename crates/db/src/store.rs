//! [`Store`] implementation over a PostgreSQL pool.
//!
//! A [`PgTransaction`] wraps one `sqlx` transaction. Dropping it without
//! calling `commit` rolls it back, which is how failed lifecycle operations
//! leave no trace. Locking reads use `SELECT ... FOR UPDATE`.

use async_trait::async_trait;
use sqlx::Postgres;

use tenderhub_core::bid::{AuthorType, Bid, BidVersion, CreateBid};
use tenderhub_core::decision::{BidDecision, Decision};
use tenderhub_core::error::CoreError;
use tenderhub_core::feedback::BidFeedback;
use tenderhub_core::identity::Employee;
use tenderhub_core::store::{Store, StoreResult, Transaction};
use tenderhub_core::tender::{CreateTender, Tender, TenderVersion};
use tenderhub_core::types::{DbId, Version};

use crate::error::into_core;
use crate::repositories::{
    BidRepo, BidVersionRepo, DecisionRepo, EmployeeRepo, FeedbackRepo, OrganizationRepo,
    TenderRepo, TenderVersionRepo,
};
use crate::DbPool;

/// Pool-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgTransaction;

    async fn begin(&self) -> StoreResult<PgTransaction> {
        let tx = self.pool.begin().await.map_err(into_core)?;
        Ok(PgTransaction { tx })
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await.map_err(into_core)
    }
}

/// One open database transaction.
pub struct PgTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

fn convert_all<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = CoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

fn convert_opt<R, T>(row: Option<R>) -> StoreResult<Option<T>>
where
    T: TryFrom<R, Error = CoreError>,
{
    row.map(T::try_from).transpose()
}

fn ensure_updated(updated: bool, entity: &'static str, id: DbId) -> StoreResult<()> {
    if updated {
        Ok(())
    } else {
        Err(CoreError::NotFound { entity, id })
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    // -- identity -----------------------------------------------------------

    async fn find_employee_by_username(
        &mut self,
        username: &str,
    ) -> StoreResult<Option<Employee>> {
        let row = EmployeeRepo::find_by_username(&mut *self.tx, username)
            .await
            .map_err(into_core)?;
        Ok(row.map(Employee::from))
    }

    async fn find_employee(&mut self, id: DbId) -> StoreResult<Option<Employee>> {
        let row = EmployeeRepo::find_by_id(&mut *self.tx, id)
            .await
            .map_err(into_core)?;
        Ok(row.map(Employee::from))
    }

    async fn organization_exists(&mut self, id: DbId) -> StoreResult<bool> {
        OrganizationRepo::exists(&mut *self.tx, id)
            .await
            .map_err(into_core)
    }

    async fn is_responsible(
        &mut self,
        organization_id: DbId,
        employee_id: DbId,
    ) -> StoreResult<bool> {
        OrganizationRepo::is_responsible(&mut *self.tx, organization_id, employee_id)
            .await
            .map_err(into_core)
    }

    async fn count_responsibles(&mut self, organization_id: DbId) -> StoreResult<i64> {
        OrganizationRepo::count_responsibles(&mut *self.tx, organization_id)
            .await
            .map_err(into_core)
    }

    // -- tenders ------------------------------------------------------------

    async fn find_tender(&mut self, id: DbId) -> StoreResult<Option<Tender>> {
        let row = TenderRepo::find_by_id(&mut *self.tx, id)
            .await
            .map_err(into_core)?;
        convert_opt(row)
    }

    async fn lock_tender(&mut self, id: DbId) -> StoreResult<Option<Tender>> {
        let row = TenderRepo::lock_by_id(&mut *self.tx, id)
            .await
            .map_err(into_core)?;
        convert_opt(row)
    }

    async fn list_tenders(&mut self) -> StoreResult<Vec<Tender>> {
        let rows = TenderRepo::list(&mut *self.tx).await.map_err(into_core)?;
        convert_all(rows)
    }

    async fn list_tenders_by_creator(&mut self, username: &str) -> StoreResult<Vec<Tender>> {
        let rows = TenderRepo::list_by_creator(&mut *self.tx, username)
            .await
            .map_err(into_core)?;
        convert_all(rows)
    }

    async fn insert_tender(&mut self, input: &CreateTender) -> StoreResult<Tender> {
        let row = TenderRepo::create(&mut *self.tx, input)
            .await
            .map_err(into_core)?;
        Tender::try_from(row)
    }

    async fn update_tender(&mut self, tender: &Tender) -> StoreResult<()> {
        let updated = TenderRepo::update(&mut *self.tx, tender)
            .await
            .map_err(into_core)?;
        ensure_updated(updated, "Tender", tender.id)
    }

    // -- tender versions ----------------------------------------------------

    async fn insert_tender_version(&mut self, tender: &Tender) -> StoreResult<TenderVersion> {
        let row = TenderVersionRepo::create(&mut *self.tx, tender)
            .await
            .map_err(into_core)?;
        TenderVersion::try_from(row)
    }

    async fn find_tender_version(
        &mut self,
        tender_id: DbId,
        version: Version,
    ) -> StoreResult<Option<TenderVersion>> {
        let row = TenderVersionRepo::find(&mut *self.tx, tender_id, version)
            .await
            .map_err(into_core)?;
        convert_opt(row)
    }

    async fn list_tender_versions(&mut self, tender_id: DbId) -> StoreResult<Vec<TenderVersion>> {
        let rows = TenderVersionRepo::list_by_tender(&mut *self.tx, tender_id)
            .await
            .map_err(into_core)?;
        convert_all(rows)
    }

    // -- bids ---------------------------------------------------------------

    async fn find_bid(&mut self, id: DbId) -> StoreResult<Option<Bid>> {
        let row = BidRepo::find_by_id(&mut *self.tx, id)
            .await
            .map_err(into_core)?;
        convert_opt(row)
    }

    async fn lock_bid(&mut self, id: DbId) -> StoreResult<Option<Bid>> {
        let row = BidRepo::lock_by_id(&mut *self.tx, id)
            .await
            .map_err(into_core)?;
        convert_opt(row)
    }

    async fn lock_bids_for_tender(&mut self, tender_id: DbId) -> StoreResult<Vec<Bid>> {
        let rows = BidRepo::lock_by_tender(&mut *self.tx, tender_id)
            .await
            .map_err(into_core)?;
        convert_all(rows)
    }

    async fn list_bids_for_tender(&mut self, tender_id: DbId) -> StoreResult<Vec<Bid>> {
        let rows = BidRepo::list_by_tender(&mut *self.tx, tender_id)
            .await
            .map_err(into_core)?;
        convert_all(rows)
    }

    async fn list_bids_by_author(
        &mut self,
        author_type: AuthorType,
        author_id: DbId,
    ) -> StoreResult<Vec<Bid>> {
        let rows = BidRepo::list_by_author(&mut *self.tx, author_type, author_id)
            .await
            .map_err(into_core)?;
        convert_all(rows)
    }

    async fn insert_bid(&mut self, input: &CreateBid) -> StoreResult<Bid> {
        let row = BidRepo::create(&mut *self.tx, input)
            .await
            .map_err(into_core)?;
        Bid::try_from(row)
    }

    async fn update_bid(&mut self, bid: &Bid) -> StoreResult<()> {
        let updated = BidRepo::update(&mut *self.tx, bid)
            .await
            .map_err(into_core)?;
        ensure_updated(updated, "Bid", bid.id)
    }

    // -- bid versions -------------------------------------------------------

    async fn insert_bid_version(&mut self, bid: &Bid) -> StoreResult<BidVersion> {
        let row = BidVersionRepo::create(&mut *self.tx, bid)
            .await
            .map_err(into_core)?;
        BidVersion::try_from(row)
    }

    async fn find_bid_version(
        &mut self,
        bid_id: DbId,
        version: Version,
    ) -> StoreResult<Option<BidVersion>> {
        let row = BidVersionRepo::find(&mut *self.tx, bid_id, version)
            .await
            .map_err(into_core)?;
        convert_opt(row)
    }

    async fn list_bid_versions(&mut self, bid_id: DbId) -> StoreResult<Vec<BidVersion>> {
        let rows = BidVersionRepo::list_by_bid(&mut *self.tx, bid_id)
            .await
            .map_err(into_core)?;
        convert_all(rows)
    }

    // -- decisions ----------------------------------------------------------

    async fn find_decision(
        &mut self,
        bid_id: DbId,
        responsible_id: DbId,
    ) -> StoreResult<Option<BidDecision>> {
        let row = DecisionRepo::find(&mut *self.tx, bid_id, responsible_id)
            .await
            .map_err(into_core)?;
        convert_opt(row)
    }

    async fn insert_decision(
        &mut self,
        bid_id: DbId,
        responsible_id: DbId,
        decision: Decision,
    ) -> StoreResult<BidDecision> {
        let row = DecisionRepo::create(&mut *self.tx, bid_id, responsible_id, decision)
            .await
            .map_err(into_core)?;
        BidDecision::try_from(row)
    }

    async fn count_decisions(&mut self, bid_id: DbId, decision: Decision) -> StoreResult<i64> {
        DecisionRepo::count(&mut *self.tx, bid_id, decision)
            .await
            .map_err(into_core)
    }

    // -- feedback -----------------------------------------------------------

    async fn find_feedback(
        &mut self,
        bid_id: DbId,
        username: &str,
    ) -> StoreResult<Option<BidFeedback>> {
        let row = FeedbackRepo::find(&mut *self.tx, bid_id, username)
            .await
            .map_err(into_core)?;
        Ok(row.map(BidFeedback::from))
    }

    async fn insert_feedback(
        &mut self,
        bid_id: DbId,
        username: &str,
        feedback: &str,
    ) -> StoreResult<BidFeedback> {
        let row = FeedbackRepo::create(&mut *self.tx, bid_id, username, feedback)
            .await
            .map_err(into_core)?;
        Ok(BidFeedback::from(row))
    }

    async fn list_feedback_for_bids(&mut self, bid_ids: &[DbId]) -> StoreResult<Vec<BidFeedback>> {
        let rows = FeedbackRepo::list_by_bids(&mut *self.tx, bid_ids)
            .await
            .map_err(into_core)?;
        Ok(rows.into_iter().map(BidFeedback::from).collect())
    }

    // -- completion ---------------------------------------------------------

    async fn commit(self) -> StoreResult<()> {
        self.tx.commit().await.map_err(into_core)
    }
}
