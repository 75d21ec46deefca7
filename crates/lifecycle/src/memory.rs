//! In-memory implementation of the storage port.
//!
//! Used by tests and by the HTTP layer's test harness. A transaction holds
//! the store's mutex for its whole lifetime and works on a private copy of
//! the state, so transactions are fully serialized and an uncommitted
//! transaction leaves no trace.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use tenderhub_core::bid::{AuthorType, Bid, BidStatus, BidVersion, CreateBid};
use tenderhub_core::decision::{BidDecision, Decision};
use tenderhub_core::error::CoreError;
use tenderhub_core::feedback::BidFeedback;
use tenderhub_core::identity::Employee;
use tenderhub_core::store::{Store, StoreResult, Transaction};
use tenderhub_core::tender::{CreateTender, Tender, TenderStatus, TenderVersion};
use tenderhub_core::types::{DbId, Version};

/// Sentinel for "no injected failure".
const NO_FAULT: usize = usize::MAX;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_id: DbId,
    employees: BTreeMap<DbId, Employee>,
    organizations: BTreeMap<DbId, String>,
    /// `(organization_id, employee_id)` pairs.
    responsibles: BTreeSet<(DbId, DbId)>,
    tenders: BTreeMap<DbId, Tender>,
    tender_versions: Vec<TenderVersion>,
    bids: BTreeMap<DbId, Bid>,
    bid_versions: Vec<BidVersion>,
    decisions: Vec<BidDecision>,
    feedback: Vec<BidFeedback>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`Store`] with identity seeding helpers.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
    bid_update_budget: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            bid_update_budget: Arc::new(AtomicUsize::new(NO_FAULT)),
        }
    }

    /// Register an employee and return its id.
    pub async fn add_employee(&self, username: &str) -> DbId {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        state.employees.insert(
            id,
            Employee {
                id,
                username: username.to_string(),
                first_name: None,
                last_name: None,
            },
        );
        id
    }

    /// Register an organization and return its id.
    pub async fn add_organization(&self, name: &str) -> DbId {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        state.organizations.insert(id, name.to_string());
        id
    }

    /// Make an employee a responsible member of an organization.
    pub async fn add_responsible(&self, organization_id: DbId, employee_id: DbId) {
        let mut state = self.state.lock().await;
        state.responsibles.insert((organization_id, employee_id));
    }

    /// Allow `n` more bid updates, then fail every one after that with
    /// `Internal`. Used to exercise rollback of multi-row operations.
    pub fn fail_bid_updates_after(&self, n: usize) {
        self.bid_update_budget.store(n, Ordering::SeqCst);
    }

    /// Clear any injected failure.
    pub fn clear_faults(&self) {
        self.bid_update_budget.store(NO_FAULT, Ordering::SeqCst);
    }

    fn take_bid_update(&self) -> StoreResult<()> {
        let remaining = self.bid_update_budget.load(Ordering::SeqCst);
        if remaining == NO_FAULT {
            return Ok(());
        }
        if remaining == 0 {
            return Err(CoreError::Internal("injected bid update failure".to_string()));
        }
        self.bid_update_budget.store(remaining - 1, Ordering::SeqCst);
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Tx = InMemoryTransaction;

    async fn begin(&self) -> StoreResult<InMemoryTransaction> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let work = guard.clone();
        Ok(InMemoryTransaction {
            guard,
            work,
            store: self.clone(),
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Transaction over an [`InMemoryStore`].
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    work: MemoryState,
    store: InMemoryStore,
}

impl InMemoryTransaction {
    fn tender_mut(&mut self, id: DbId) -> StoreResult<&mut Tender> {
        self.work.tenders.get_mut(&id).ok_or(CoreError::NotFound {
            entity: "Tender",
            id,
        })
    }

    fn bid_mut(&mut self, id: DbId) -> StoreResult<&mut Bid> {
        self.work
            .bids
            .get_mut(&id)
            .ok_or(CoreError::NotFound { entity: "Bid", id })
    }
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn find_employee_by_username(
        &mut self,
        username: &str,
    ) -> StoreResult<Option<Employee>> {
        Ok(self
            .work
            .employees
            .values()
            .find(|e| e.username == username)
            .cloned())
    }

    async fn find_employee(&mut self, id: DbId) -> StoreResult<Option<Employee>> {
        Ok(self.work.employees.get(&id).cloned())
    }

    async fn organization_exists(&mut self, id: DbId) -> StoreResult<bool> {
        Ok(self.work.organizations.contains_key(&id))
    }

    async fn is_responsible(
        &mut self,
        organization_id: DbId,
        employee_id: DbId,
    ) -> StoreResult<bool> {
        Ok(self.work.responsibles.contains(&(organization_id, employee_id)))
    }

    async fn count_responsibles(&mut self, organization_id: DbId) -> StoreResult<i64> {
        let count = self
            .work
            .responsibles
            .iter()
            .filter(|(org, _)| *org == organization_id)
            .count();
        Ok(count as i64)
    }

    // -- tenders ------------------------------------------------------------

    async fn find_tender(&mut self, id: DbId) -> StoreResult<Option<Tender>> {
        Ok(self.work.tenders.get(&id).cloned())
    }

    async fn lock_tender(&mut self, id: DbId) -> StoreResult<Option<Tender>> {
        self.find_tender(id).await
    }

    async fn list_tenders(&mut self) -> StoreResult<Vec<Tender>> {
        Ok(self.work.tenders.values().cloned().collect())
    }

    async fn list_tenders_by_creator(&mut self, username: &str) -> StoreResult<Vec<Tender>> {
        Ok(self
            .work
            .tenders
            .values()
            .filter(|t| t.creator_username == username)
            .cloned()
            .collect())
    }

    async fn insert_tender(&mut self, input: &CreateTender) -> StoreResult<Tender> {
        let id = self.work.allocate_id();
        let now = chrono::Utc::now();
        let tender = Tender {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            service_type: input.service_type.clone(),
            status: TenderStatus::Created,
            organization_id: input.organization_id,
            creator_username: input.creator_username.clone(),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.work.tenders.insert(id, tender.clone());
        Ok(tender)
    }

    async fn update_tender(&mut self, tender: &Tender) -> StoreResult<()> {
        *self.tender_mut(tender.id)? = tender.clone();
        Ok(())
    }

    // -- tender versions ----------------------------------------------------

    async fn insert_tender_version(&mut self, tender: &Tender) -> StoreResult<TenderVersion> {
        let duplicate = self
            .work
            .tender_versions
            .iter()
            .any(|v| v.tender_id == tender.id && v.version == tender.version);
        if duplicate {
            return Err(CoreError::Conflict(format!(
                "Snapshot {} of tender {} already exists",
                tender.version, tender.id
            )));
        }
        let snapshot = TenderVersion {
            id: self.work.allocate_id(),
            tender_id: tender.id,
            name: tender.name.clone(),
            description: tender.description.clone(),
            service_type: tender.service_type.clone(),
            status: tender.status,
            version: tender.version,
            created_at: chrono::Utc::now(),
        };
        self.work.tender_versions.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn find_tender_version(
        &mut self,
        tender_id: DbId,
        version: Version,
    ) -> StoreResult<Option<TenderVersion>> {
        Ok(self
            .work
            .tender_versions
            .iter()
            .find(|v| v.tender_id == tender_id && v.version == version)
            .cloned())
    }

    async fn list_tender_versions(&mut self, tender_id: DbId) -> StoreResult<Vec<TenderVersion>> {
        let mut versions: Vec<TenderVersion> = self
            .work
            .tender_versions
            .iter()
            .filter(|v| v.tender_id == tender_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    // -- bids ---------------------------------------------------------------

    async fn find_bid(&mut self, id: DbId) -> StoreResult<Option<Bid>> {
        Ok(self.work.bids.get(&id).cloned())
    }

    async fn lock_bid(&mut self, id: DbId) -> StoreResult<Option<Bid>> {
        self.find_bid(id).await
    }

    async fn lock_bids_for_tender(&mut self, tender_id: DbId) -> StoreResult<Vec<Bid>> {
        self.list_bids_for_tender(tender_id).await
    }

    async fn list_bids_for_tender(&mut self, tender_id: DbId) -> StoreResult<Vec<Bid>> {
        Ok(self
            .work
            .bids
            .values()
            .filter(|b| b.tender_id == tender_id)
            .cloned()
            .collect())
    }

    async fn list_bids_by_author(
        &mut self,
        author_type: AuthorType,
        author_id: DbId,
    ) -> StoreResult<Vec<Bid>> {
        Ok(self
            .work
            .bids
            .values()
            .filter(|b| b.author_type == author_type && b.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn insert_bid(&mut self, input: &CreateBid) -> StoreResult<Bid> {
        let id = self.work.allocate_id();
        let now = chrono::Utc::now();
        let bid = Bid {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            status: BidStatus::Created,
            tender_id: input.tender_id,
            author_type: input.author_type,
            author_id: input.author_id,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.work.bids.insert(id, bid.clone());
        Ok(bid)
    }

    async fn update_bid(&mut self, bid: &Bid) -> StoreResult<()> {
        self.store.take_bid_update()?;
        *self.bid_mut(bid.id)? = bid.clone();
        Ok(())
    }

    // -- bid versions -------------------------------------------------------

    async fn insert_bid_version(&mut self, bid: &Bid) -> StoreResult<BidVersion> {
        let duplicate = self
            .work
            .bid_versions
            .iter()
            .any(|v| v.bid_id == bid.id && v.version == bid.version);
        if duplicate {
            return Err(CoreError::Conflict(format!(
                "Snapshot {} of bid {} already exists",
                bid.version, bid.id
            )));
        }
        let snapshot = BidVersion {
            id: self.work.allocate_id(),
            bid_id: bid.id,
            name: bid.name.clone(),
            description: bid.description.clone(),
            status: bid.status,
            tender_id: bid.tender_id,
            author_type: bid.author_type,
            author_id: bid.author_id,
            version: bid.version,
            created_at: chrono::Utc::now(),
        };
        self.work.bid_versions.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn find_bid_version(
        &mut self,
        bid_id: DbId,
        version: Version,
    ) -> StoreResult<Option<BidVersion>> {
        Ok(self
            .work
            .bid_versions
            .iter()
            .find(|v| v.bid_id == bid_id && v.version == version)
            .cloned())
    }

    async fn list_bid_versions(&mut self, bid_id: DbId) -> StoreResult<Vec<BidVersion>> {
        let mut versions: Vec<BidVersion> = self
            .work
            .bid_versions
            .iter()
            .filter(|v| v.bid_id == bid_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    // -- decisions ----------------------------------------------------------

    async fn find_decision(
        &mut self,
        bid_id: DbId,
        responsible_id: DbId,
    ) -> StoreResult<Option<BidDecision>> {
        Ok(self
            .work
            .decisions
            .iter()
            .find(|d| d.bid_id == bid_id && d.responsible_id == responsible_id)
            .cloned())
    }

    async fn insert_decision(
        &mut self,
        bid_id: DbId,
        responsible_id: DbId,
        decision: Decision,
    ) -> StoreResult<BidDecision> {
        if self.find_decision(bid_id, responsible_id).await?.is_some() {
            return Err(CoreError::Conflict(format!(
                "Decision by {responsible_id} on bid {bid_id} already exists"
            )));
        }
        let row = BidDecision {
            id: self.work.allocate_id(),
            bid_id,
            responsible_id,
            decision,
        };
        self.work.decisions.push(row.clone());
        Ok(row)
    }

    async fn count_decisions(&mut self, bid_id: DbId, decision: Decision) -> StoreResult<i64> {
        let count = self
            .work
            .decisions
            .iter()
            .filter(|d| d.bid_id == bid_id && d.decision == decision)
            .count();
        Ok(count as i64)
    }

    // -- feedback -----------------------------------------------------------

    async fn find_feedback(
        &mut self,
        bid_id: DbId,
        username: &str,
    ) -> StoreResult<Option<BidFeedback>> {
        Ok(self
            .work
            .feedback
            .iter()
            .find(|f| f.bid_id == bid_id && f.username == username)
            .cloned())
    }

    async fn insert_feedback(
        &mut self,
        bid_id: DbId,
        username: &str,
        feedback: &str,
    ) -> StoreResult<BidFeedback> {
        if self.find_feedback(bid_id, username).await?.is_some() {
            return Err(CoreError::Conflict(format!(
                "Feedback by '{username}' on bid {bid_id} already exists"
            )));
        }
        let row = BidFeedback {
            id: self.work.allocate_id(),
            bid_id,
            username: username.to_string(),
            feedback: feedback.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.work.feedback.push(row.clone());
        Ok(row)
    }

    async fn list_feedback_for_bids(&mut self, bid_ids: &[DbId]) -> StoreResult<Vec<BidFeedback>> {
        Ok(self
            .work
            .feedback
            .iter()
            .filter(|f| bid_ids.contains(&f.bid_id))
            .cloned()
            .collect())
    }

    async fn commit(mut self) -> StoreResult<()> {
        *self.guard = self.work;
        Ok(())
    }
}
