//! Quorum decision engine.
//!
//! Responsible members of the tender's organization vote on a bid. A single
//! rejection cancels the bid. Once approvals reach `min(3, responsible
//! count)` the bid is published and its tender closes, which cancels every
//! sibling bid still open. All of it happens in the transaction that
//! records the deciding vote.

use std::sync::Arc;

use tenderhub_core::bid::{Bid, BidStatus};
use tenderhub_core::decision::{quorum_reached, quorum_size, Decision};
use tenderhub_core::error::CoreError;
use tenderhub_core::store::{Store, Transaction};
use tenderhub_core::tender::TenderStatus;
use tenderhub_core::types::DbId;

use crate::bid::lock_existing as lock_bid;
use crate::tender::lock_existing as lock_tender;
use crate::{cascade, gate};

/// Records votes and resolves their outcome.
pub struct QuorumEngine<S> {
    store: Arc<S>,
}

impl<S> Clone for QuorumEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> QuorumEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Record `username`'s decision on a bid and apply its consequences.
    ///
    /// Returns the bid as it stands after the vote.
    pub async fn submit_decision(
        &self,
        bid_id: DbId,
        username: &str,
        decision: Decision,
    ) -> Result<Bid, CoreError> {
        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;

        // Unlocked read to learn the tender, so the tender row can be locked
        // before the bid row.
        let peek = tx.find_bid(bid_id).await?.ok_or(CoreError::NotFound {
            entity: "Bid",
            id: bid_id,
        })?;
        peek.status.ensure_mutable()?;

        let mut tender = lock_tender(&mut tx, peek.tender_id).await?;
        let mut bid = lock_bid(&mut tx, bid_id).await?;
        bid.status.ensure_mutable()?;

        match tender.status {
            TenderStatus::Published => {}
            TenderStatus::Closed => {
                // An open bid on a closed tender is stale. Cancel it and keep
                // the cancellation even though the vote is refused.
                cascade::transition_bid(&mut tx, &mut bid, BidStatus::Canceled, chrono::Utc::now())
                    .await?;
                tx.commit().await?;
                tracing::warn!(
                    bid_id,
                    tender_id = tender.id,
                    "Canceled open bid of a closed tender"
                );
                return Err(CoreError::InvalidTransition(format!(
                    "Tender {} is closed; bid {bid_id} has been canceled",
                    tender.id
                )));
            }
            TenderStatus::Created => {
                return Err(CoreError::InvalidTransition(format!(
                    "Tender {} is not published; decisions are not accepted",
                    tender.id
                )));
            }
        }

        if !gate::is_responsible(&mut tx, tender.organization_id, &actor).await? {
            return Err(CoreError::Forbidden(format!(
                "User '{}' is not a responsible member of the tender's organization",
                actor.username
            )));
        }
        if tx.find_decision(bid_id, actor.id).await?.is_some() {
            return Err(CoreError::Conflict(format!(
                "User '{}' has already decided on bid {bid_id}",
                actor.username
            )));
        }

        tx.insert_decision(bid_id, actor.id, decision).await?;
        let now = chrono::Utc::now();

        match decision {
            Decision::Rejected => {
                cascade::transition_bid(&mut tx, &mut bid, BidStatus::Canceled, now).await?;
                tracing::info!(bid_id, voter = %actor.username, "Bid rejected");
            }
            Decision::Approved => {
                let responsibles = tx.count_responsibles(tender.organization_id).await?;
                let approvals = tx.count_decisions(bid_id, Decision::Approved).await?;
                tracing::debug!(
                    bid_id,
                    approvals,
                    quorum = quorum_size(responsibles),
                    "Approval recorded"
                );

                if quorum_reached(approvals, responsibles) {
                    cascade::transition_bid(&mut tx, &mut bid, BidStatus::Published, now).await?;
                    cascade::close_tender(&mut tx, &mut tender, now).await?;
                    tracing::info!(
                        bid_id,
                        tender_id = tender.id,
                        approvals,
                        "Quorum reached, bid awarded"
                    );
                }
            }
        }

        tx.commit().await?;
        Ok(bid)
    }
}
