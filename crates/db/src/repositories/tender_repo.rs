//! Repository for the `tenders` table.

use sqlx::PgConnection;
use tenderhub_core::tender::{CreateTender, Tender};
use tenderhub_core::types::DbId;

use crate::models::tender::TenderRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, service_type, status, organization_id, \
    creator_username, version, created_at, updated_at";

/// Provides reads, row locks, and writes for tenders.
pub struct TenderRepo;

impl TenderRepo {
    /// Insert a new tender. Status and version take their column defaults
    /// (`CREATED`, 1).
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateTender,
    ) -> Result<TenderRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO tenders (name, description, service_type, organization_id, creator_username)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TenderRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.service_type)
            .bind(input.organization_id)
            .bind(&input.creator_username)
            .fetch_one(conn)
            .await
    }

    /// Find a tender by its internal ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<TenderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenders WHERE id = $1");
        sqlx::query_as::<_, TenderRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a tender and hold its row lock until the transaction ends.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<TenderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenders WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, TenderRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all tenders, ordered by ID.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<TenderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenders ORDER BY id");
        sqlx::query_as::<_, TenderRow>(&query).fetch_all(conn).await
    }

    /// List tenders created by a username, ordered by ID.
    pub async fn list_by_creator(
        conn: &mut PgConnection,
        username: &str,
    ) -> Result<Vec<TenderRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tenders WHERE creator_username = $1 ORDER BY id");
        sqlx::query_as::<_, TenderRow>(&query)
            .bind(username)
            .fetch_all(conn)
            .await
    }

    /// Overwrite the mutable columns of a tender. Returns `true` if a row was
    /// updated.
    pub async fn update(conn: &mut PgConnection, tender: &Tender) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tenders SET
                name = $2,
                description = $3,
                service_type = $4,
                status = $5,
                version = $6,
                updated_at = $7
             WHERE id = $1",
        )
        .bind(tender.id)
        .bind(&tender.name)
        .bind(&tender.description)
        .bind(&tender.service_type)
        .bind(tender.status.as_str())
        .bind(tender.version)
        .bind(tender.updated_at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
