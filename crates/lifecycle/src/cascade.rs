//! Status changes shared by several operations.
//!
//! Closing a tender always cancels its open bids in the same transaction,
//! whether the close came from an operator or from a quorum award. Both
//! paths go through [`close_tender`].

use tenderhub_core::bid::{Bid, BidStatus};
use tenderhub_core::error::CoreError;
use tenderhub_core::store::Transaction;
use tenderhub_core::tender::{Tender, TenderAction};
use tenderhub_core::types::{DbId, Timestamp};

use crate::versions;

/// Move a bid to `to`, bump its version, persist, and snapshot.
pub(crate) async fn transition_bid<T: Transaction>(
    tx: &mut T,
    bid: &mut Bid,
    to: BidStatus,
    now: Timestamp,
) -> Result<(), CoreError> {
    if !bid.status.can_transition_to(to) {
        bid.status.ensure_mutable()?;
        return Err(CoreError::InvalidTransition(format!(
            "Bid cannot move from {} to {}",
            bid.status.as_str(),
            to.as_str()
        )));
    }
    bid.status = to;
    bid.bump_version(now);
    tx.update_bid(bid).await?;
    versions::record_bid(tx, bid).await?;
    Ok(())
}

/// Close a published tender and cancel every bid that is still open.
///
/// Returns the ids of the bids that were canceled.
pub(crate) async fn close_tender<T: Transaction>(
    tx: &mut T,
    tender: &mut Tender,
    now: Timestamp,
) -> Result<Vec<DbId>, CoreError> {
    tender.status = tender.status.apply(TenderAction::Close)?;
    tender.bump_version(now);
    tx.update_tender(tender).await?;
    versions::record_tender(tx, tender).await?;

    let canceled = cancel_open_bids(tx, tender.id, now).await?;
    tracing::info!(
        tender_id = tender.id,
        version = tender.version,
        canceled_bids = canceled.len(),
        "Tender closed"
    );
    Ok(canceled)
}

/// Cancel every bid of a tender that is not already terminal.
///
/// Terminal bids are skipped, so running this twice is a no-op.
async fn cancel_open_bids<T: Transaction>(
    tx: &mut T,
    tender_id: DbId,
    now: Timestamp,
) -> Result<Vec<DbId>, CoreError> {
    let bids = tx.lock_bids_for_tender(tender_id).await?;
    let mut canceled = Vec::new();

    for mut bid in bids.into_iter().filter(|b| !b.status.is_terminal()) {
        transition_bid(tx, &mut bid, BidStatus::Canceled, now).await?;
        canceled.push(bid.id);
    }

    Ok(canceled)
}
