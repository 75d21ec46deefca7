//! Version store: append-only snapshot history for tenders and bids.
//!
//! A snapshot is written after every successful mutation of a live row and
//! carries the row's version number at that moment. Snapshots are never
//! updated or deleted.

use tenderhub_core::bid::{Bid, BidVersion};
use tenderhub_core::error::CoreError;
use tenderhub_core::store::Transaction;
use tenderhub_core::tender::{Tender, TenderVersion};
use tenderhub_core::types::{DbId, Version};

/// Record a snapshot of the tender's current state.
pub async fn record_tender<T: Transaction>(
    tx: &mut T,
    tender: &Tender,
) -> Result<TenderVersion, CoreError> {
    let snapshot = tx.insert_tender_version(tender).await?;
    tracing::debug!(
        tender_id = tender.id,
        version = snapshot.version,
        status = tender.status.as_str(),
        "Tender snapshot recorded"
    );
    Ok(snapshot)
}

/// Record a snapshot of the bid's current state.
pub async fn record_bid<T: Transaction>(tx: &mut T, bid: &Bid) -> Result<BidVersion, CoreError> {
    let snapshot = tx.insert_bid_version(bid).await?;
    tracing::debug!(
        bid_id = bid.id,
        version = snapshot.version,
        status = bid.status.as_str(),
        "Bid snapshot recorded"
    );
    Ok(snapshot)
}

/// Fetch a tender snapshot, failing with `NotFound` if it was never written.
pub async fn tender_snapshot<T: Transaction>(
    tx: &mut T,
    tender_id: DbId,
    version: Version,
) -> Result<TenderVersion, CoreError> {
    ensure_version_number(version)?;
    tx.find_tender_version(tender_id, version)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TenderVersion",
            id: DbId::from(version),
        })
}

/// Fetch a bid snapshot, failing with `NotFound` if it was never written.
pub async fn bid_snapshot<T: Transaction>(
    tx: &mut T,
    bid_id: DbId,
    version: Version,
) -> Result<BidVersion, CoreError> {
    ensure_version_number(version)?;
    tx.find_bid_version(bid_id, version)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "BidVersion",
            id: DbId::from(version),
        })
}

fn ensure_version_number(version: Version) -> Result<(), CoreError> {
    if version < 1 {
        return Err(CoreError::Validation(format!(
            "Version must be a positive integer, got {version}"
        )));
    }
    Ok(())
}
