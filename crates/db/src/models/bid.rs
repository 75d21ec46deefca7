//! Rows of `bids` and `bid_versions`.

use sqlx::FromRow;
use tenderhub_core::bid::{AuthorType, Bid, BidStatus, BidVersion};
use tenderhub_core::error::CoreError;
use tenderhub_core::types::{DbId, Timestamp, Version};

use super::corrupt;

/// A row from the `bids` table.
#[derive(Debug, Clone, FromRow)]
pub struct BidRow {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub status: String,
    pub tender_id: DbId,
    pub author_type: String,
    pub author_id: DbId,
    pub version: Version,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `bid_versions` table.
#[derive(Debug, Clone, FromRow)]
pub struct BidVersionRow {
    pub id: DbId,
    pub bid_id: DbId,
    pub name: String,
    pub description: String,
    pub status: String,
    pub tender_id: DbId,
    pub author_type: String,
    pub author_id: DbId,
    pub version: Version,
    pub created_at: Timestamp,
}

impl TryFrom<BidRow> for Bid {
    type Error = CoreError;

    fn try_from(row: BidRow) -> Result<Self, Self::Error> {
        let status = BidStatus::from_str_db(&row.status).map_err(|e| corrupt("bids", row.id, e))?;
        let author_type =
            AuthorType::from_str_db(&row.author_type).map_err(|e| corrupt("bids", row.id, e))?;
        Ok(Bid {
            id: row.id,
            name: row.name,
            description: row.description,
            status,
            tender_id: row.tender_id,
            author_type,
            author_id: row.author_id,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<BidVersionRow> for BidVersion {
    type Error = CoreError;

    fn try_from(row: BidVersionRow) -> Result<Self, Self::Error> {
        let status =
            BidStatus::from_str_db(&row.status).map_err(|e| corrupt("bid_versions", row.id, e))?;
        let author_type = AuthorType::from_str_db(&row.author_type)
            .map_err(|e| corrupt("bid_versions", row.id, e))?;
        Ok(BidVersion {
            id: row.id,
            bid_id: row.bid_id,
            name: row.name,
            description: row.description,
            status,
            tender_id: row.tender_id,
            author_type,
            author_id: row.author_id,
            version: row.version,
            created_at: row.created_at,
        })
    }
}
