//! Bid lifecycle: create, edit, manual cancel, rollback, feedback, reads.

use std::sync::Arc;

use tenderhub_core::bid::{AuthorType, Bid, BidPatch, BidStatus, BidVersion, CreateBid};
use tenderhub_core::error::CoreError;
use tenderhub_core::feedback::{validate_feedback, BidFeedback};
use tenderhub_core::store::{Store, Transaction};
use tenderhub_core::tender::TenderStatus;
use tenderhub_core::types::{DbId, Version};

use crate::tender::lock_existing as lock_tender;
use crate::{cascade, gate, versions};

/// Applies bid operations against a [`Store`].
pub struct BidLifecycle<S> {
    store: Arc<S>,
}

impl<S> Clone for BidLifecycle<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> BidLifecycle<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Submit a bid against a published tender.
    ///
    /// A user who is a responsible member of the tender's organization may
    /// not bid on it, and an organization may not bid on its own tender.
    pub async fn create(&self, input: CreateBid) -> Result<Bid, CoreError> {
        input.validate()?;

        let mut tx = self.store.begin().await?;
        let tender = lock_tender(&mut tx, input.tender_id).await?;
        if tender.status != TenderStatus::Published {
            return Err(CoreError::InvalidTransition(format!(
                "Tender {} is not published (status {})",
                tender.id,
                tender.status.as_str()
            )));
        }

        match input.author_type {
            AuthorType::User => {
                let author = tx
                    .find_employee(input.author_id)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "Employee",
                        id: input.author_id,
                    })?;
                if gate::is_responsible(&mut tx, tender.organization_id, &author).await? {
                    return Err(CoreError::Conflict(format!(
                        "User '{}' is responsible for the tender's organization and cannot bid on it",
                        author.username
                    )));
                }
            }
            AuthorType::Organization => {
                if !tx.organization_exists(input.author_id).await? {
                    return Err(CoreError::NotFound {
                        entity: "Organization",
                        id: input.author_id,
                    });
                }
                if input.author_id == tender.organization_id {
                    return Err(CoreError::Conflict(
                        "An organization cannot bid on its own tender".to_string(),
                    ));
                }
            }
        }

        let bid = tx.insert_bid(&input).await?;
        versions::record_bid(&mut tx, &bid).await?;
        tx.commit().await?;

        tracing::info!(
            bid_id = bid.id,
            tender_id = bid.tender_id,
            author_type = bid.author_type.as_str(),
            author_id = bid.author_id,
            "Bid created"
        );
        Ok(bid)
    }

    /// Apply a partial update to a bid that is still `CREATED`.
    pub async fn edit(&self, bid_id: DbId, username: &str, patch: BidPatch) -> Result<Bid, CoreError> {
        patch.validate()?;

        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;
        let mut bid = lock_existing(&mut tx, bid_id).await?;
        gate::authorize_bid(&mut tx, &bid, &actor).await?;
        bid.status.ensure_mutable()?;

        patch.apply_to(&mut bid);
        bid.bump_version(chrono::Utc::now());
        tx.update_bid(&bid).await?;
        versions::record_bid(&mut tx, &bid).await?;
        tx.commit().await?;

        tracing::info!(bid_id, version = bid.version, actor = %actor.username, "Bid edited");
        Ok(bid)
    }

    /// Manually set a bid's status. Only `CANCELED` is accepted.
    pub async fn set_status(
        &self,
        bid_id: DbId,
        username: &str,
        requested: &str,
    ) -> Result<Bid, CoreError> {
        let target = BidStatus::parse_manual_target(requested)?;

        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;
        let mut bid = lock_existing(&mut tx, bid_id).await?;
        gate::authorize_bid(&mut tx, &bid, &actor).await?;
        bid.status.ensure_mutable()?;

        if bid.status == target {
            return Ok(bid);
        }

        cascade::transition_bid(&mut tx, &mut bid, target, chrono::Utc::now()).await?;
        tx.commit().await?;

        tracing::info!(
            bid_id,
            status = bid.status.as_str(),
            version = bid.version,
            actor = %actor.username,
            "Bid status set"
        );
        Ok(bid)
    }

    /// Restore a bid's fields from an earlier snapshot.
    pub async fn rollback(
        &self,
        bid_id: DbId,
        target_version: Version,
        username: &str,
    ) -> Result<Bid, CoreError> {
        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;
        let mut bid = lock_existing(&mut tx, bid_id).await?;
        gate::authorize_bid(&mut tx, &bid, &actor).await?;
        bid.status.ensure_mutable()?;

        let snapshot = versions::bid_snapshot(&mut tx, bid_id, target_version).await?;
        bid.restore_from(&snapshot);
        bid.bump_version(chrono::Utc::now());
        tx.update_bid(&bid).await?;
        versions::record_bid(&mut tx, &bid).await?;
        tx.commit().await?;

        tracing::info!(
            bid_id,
            restored_from = target_version,
            version = bid.version,
            actor = %actor.username,
            "Bid rolled back"
        );
        Ok(bid)
    }

    /// Leave reviewer feedback on a bid. One entry per reviewer per bid.
    pub async fn submit_feedback(
        &self,
        bid_id: DbId,
        username: &str,
        feedback: &str,
    ) -> Result<BidFeedback, CoreError> {
        validate_feedback(feedback)?;

        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;
        // The bid row lock serializes concurrent duplicate checks.
        let bid = lock_existing(&mut tx, bid_id).await?;
        let tender = tx.find_tender(bid.tender_id).await?.ok_or(CoreError::NotFound {
            entity: "Tender",
            id: bid.tender_id,
        })?;

        if !gate::is_responsible(&mut tx, tender.organization_id, &actor).await? {
            return Err(CoreError::Forbidden(
                "Only responsible members of the tender's organization may review its bids"
                    .to_string(),
            ));
        }
        if tx.find_feedback(bid_id, &actor.username).await?.is_some() {
            return Err(CoreError::Conflict(format!(
                "User '{}' has already left feedback on bid {bid_id}",
                actor.username
            )));
        }

        let entry = tx.insert_feedback(bid_id, &actor.username, feedback).await?;
        tx.commit().await?;

        tracing::info!(bid_id, reviewer = %actor.username, "Bid feedback submitted");
        Ok(entry)
    }

    /// Bids authored by `username` as a user.
    pub async fn list_for_user(&self, username: &str) -> Result<Vec<Bid>, CoreError> {
        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;
        tx.list_bids_by_author(AuthorType::User, actor.id).await
    }

    /// Bids of a tender, visible to the tender organization's members.
    pub async fn list_for_tender(
        &self,
        tender_id: DbId,
        username: &str,
    ) -> Result<Vec<Bid>, CoreError> {
        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;
        let tender = tx.find_tender(tender_id).await?.ok_or(CoreError::NotFound {
            entity: "Tender",
            id: tender_id,
        })?;
        gate::authorize_tender(&mut tx, &tender, &actor).await?;
        tx.list_bids_for_tender(tender_id).await
    }

    /// Current status of a bid, visible to its author.
    pub async fn status(&self, bid_id: DbId, username: &str) -> Result<BidStatus, CoreError> {
        let mut tx = self.store.begin().await?;
        let bid = self.readable(&mut tx, bid_id, username).await?;
        Ok(bid.status)
    }

    /// Snapshot history of a bid, ascending by version.
    pub async fn versions(&self, bid_id: DbId, username: &str) -> Result<Vec<BidVersion>, CoreError> {
        let mut tx = self.store.begin().await?;
        self.readable(&mut tx, bid_id, username).await?;
        tx.list_bid_versions(bid_id).await
    }

    /// Feedback left on every bid `author_username` submitted to a tender.
    ///
    /// The requester must be a responsible member of the tender's
    /// organization.
    pub async fn reviews(
        &self,
        tender_id: DbId,
        author_username: &str,
        requester_username: &str,
    ) -> Result<Vec<BidFeedback>, CoreError> {
        let mut tx = self.store.begin().await?;
        let requester = gate::resolve_actor(&mut tx, requester_username).await?;
        let tender = tx.find_tender(tender_id).await?.ok_or(CoreError::NotFound {
            entity: "Tender",
            id: tender_id,
        })?;
        gate::authorize_tender(&mut tx, &tender, &requester).await?;

        let author = gate::resolve_actor(&mut tx, author_username).await?;
        let bid_ids: Vec<DbId> = tx
            .list_bids_for_tender(tender_id)
            .await?
            .into_iter()
            .filter(|b| b.author_type == AuthorType::User && b.author_id == author.id)
            .map(|b| b.id)
            .collect();

        if bid_ids.is_empty() {
            return Err(CoreError::NotFound {
                entity: "Bids of author",
                id: author.id,
            });
        }
        tx.list_feedback_for_bids(&bid_ids).await
    }

    async fn readable(&self, tx: &mut S::Tx, bid_id: DbId, username: &str) -> Result<Bid, CoreError> {
        let actor = gate::resolve_actor(tx, username).await?;
        let bid = tx.find_bid(bid_id).await?.ok_or(CoreError::NotFound {
            entity: "Bid",
            id: bid_id,
        })?;
        gate::authorize_bid(tx, &bid, &actor).await?;
        Ok(bid)
    }
}

/// Lock a bid row, failing with `NotFound` if it does not exist.
pub(crate) async fn lock_existing<T: Transaction>(tx: &mut T, bid_id: DbId) -> Result<Bid, CoreError> {
    tx.lock_bid(bid_id).await?.ok_or(CoreError::NotFound {
        entity: "Bid",
        id: bid_id,
    })
}
