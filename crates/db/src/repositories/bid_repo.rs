//! Repository for the `bids` table.

use sqlx::PgConnection;
use tenderhub_core::bid::{AuthorType, Bid, CreateBid};
use tenderhub_core::types::DbId;

use crate::models::bid::BidRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, tender_id, author_type, author_id, \
    version, created_at, updated_at";

/// Provides reads, row locks, and writes for bids.
pub struct BidRepo;

impl BidRepo {
    // ── Writes ───────────────────────────────────────────────────────

    /// Insert a new bid with status `CREATED` and version 1.
    pub async fn create(conn: &mut PgConnection, input: &CreateBid) -> Result<BidRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO bids (name, description, tender_id, author_type, author_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BidRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.tender_id)
            .bind(input.author_type.as_str())
            .bind(input.author_id)
            .fetch_one(conn)
            .await
    }

    /// Overwrite the mutable columns of a bid. Returns `true` if a row was
    /// updated.
    pub async fn update(conn: &mut PgConnection, bid: &Bid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bids SET
                name = $2,
                description = $3,
                status = $4,
                version = $5,
                updated_at = $6
             WHERE id = $1",
        )
        .bind(bid.id)
        .bind(&bid.name)
        .bind(&bid.description)
        .bind(bid.status.as_str())
        .bind(bid.version)
        .bind(bid.updated_at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<BidRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bids WHERE id = $1");
        sqlx::query_as::<_, BidRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a bid and hold its row lock until the transaction ends.
    pub async fn lock_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<BidRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bids WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, BidRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Lock every bid of a tender. Rows are locked in ID order so concurrent
    /// cascades cannot deadlock on each other.
    pub async fn lock_by_tender(
        conn: &mut PgConnection,
        tender_id: DbId,
    ) -> Result<Vec<BidRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM bids WHERE tender_id = $1 ORDER BY id FOR UPDATE");
        sqlx::query_as::<_, BidRow>(&query)
            .bind(tender_id)
            .fetch_all(conn)
            .await
    }

    pub async fn list_by_tender(
        conn: &mut PgConnection,
        tender_id: DbId,
    ) -> Result<Vec<BidRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bids WHERE tender_id = $1 ORDER BY id");
        sqlx::query_as::<_, BidRow>(&query)
            .bind(tender_id)
            .fetch_all(conn)
            .await
    }

    pub async fn list_by_author(
        conn: &mut PgConnection,
        author_type: AuthorType,
        author_id: DbId,
    ) -> Result<Vec<BidRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bids WHERE author_type = $1 AND author_id = $2 ORDER BY id"
        );
        sqlx::query_as::<_, BidRow>(&query)
            .bind(author_type.as_str())
            .bind(author_id)
            .fetch_all(conn)
            .await
    }
}
