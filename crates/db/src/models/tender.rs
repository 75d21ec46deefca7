//! Rows of `tenders` and `tender_versions`.

use sqlx::FromRow;
use tenderhub_core::error::CoreError;
use tenderhub_core::tender::{Tender, TenderStatus, TenderVersion};
use tenderhub_core::types::{DbId, Timestamp, Version};

use super::corrupt;

/// A row from the `tenders` table.
#[derive(Debug, Clone, FromRow)]
pub struct TenderRow {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: String,
    pub organization_id: DbId,
    pub creator_username: String,
    pub version: Version,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `tender_versions` table.
#[derive(Debug, Clone, FromRow)]
pub struct TenderVersionRow {
    pub id: DbId,
    pub tender_id: DbId,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: String,
    pub version: Version,
    pub created_at: Timestamp,
}

impl TryFrom<TenderRow> for Tender {
    type Error = CoreError;

    fn try_from(row: TenderRow) -> Result<Self, Self::Error> {
        let status =
            TenderStatus::from_str_db(&row.status).map_err(|e| corrupt("tenders", row.id, e))?;
        Ok(Tender {
            id: row.id,
            name: row.name,
            description: row.description,
            service_type: row.service_type,
            status,
            organization_id: row.organization_id,
            creator_username: row.creator_username,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<TenderVersionRow> for TenderVersion {
    type Error = CoreError;

    fn try_from(row: TenderVersionRow) -> Result<Self, Self::Error> {
        let status = TenderStatus::from_str_db(&row.status)
            .map_err(|e| corrupt("tender_versions", row.id, e))?;
        Ok(TenderVersion {
            id: row.id,
            tender_id: row.tender_id,
            name: row.name,
            description: row.description,
            service_type: row.service_type,
            status,
            version: row.version,
            created_at: row.created_at,
        })
    }
}
