//! Repository for the append-only `tender_versions` table.

use sqlx::PgConnection;
use tenderhub_core::tender::Tender;
use tenderhub_core::types::{DbId, Version};

use crate::models::tender::TenderVersionRow;

const COLUMNS: &str =
    "id, tender_id, name, description, service_type, status, version, created_at";

pub struct TenderVersionRepo;

impl TenderVersionRepo {
    /// Snapshot the tender's current state under its current version number.
    ///
    /// Fails with a `uq_tender_versions_tender_version` violation if that
    /// version was already recorded.
    pub async fn create(
        conn: &mut PgConnection,
        tender: &Tender,
    ) -> Result<TenderVersionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO tender_versions
                (tender_id, name, description, service_type, status, version)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TenderVersionRow>(&query)
            .bind(tender.id)
            .bind(&tender.name)
            .bind(&tender.description)
            .bind(&tender.service_type)
            .bind(tender.status.as_str())
            .bind(tender.version)
            .fetch_one(conn)
            .await
    }

    pub async fn find(
        conn: &mut PgConnection,
        tender_id: DbId,
        version: Version,
    ) -> Result<Option<TenderVersionRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tender_versions WHERE tender_id = $1 AND version = $2");
        sqlx::query_as::<_, TenderVersionRow>(&query)
            .bind(tender_id)
            .bind(version)
            .fetch_optional(conn)
            .await
    }

    /// All snapshots of a tender, oldest first.
    pub async fn list_by_tender(
        conn: &mut PgConnection,
        tender_id: DbId,
    ) -> Result<Vec<TenderVersionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tender_versions WHERE tender_id = $1 ORDER BY version ASC"
        );
        sqlx::query_as::<_, TenderVersionRow>(&query)
            .bind(tender_id)
            .fetch_all(conn)
            .await
    }
}
