//! Repository for the append-only `bid_versions` table.

use sqlx::PgConnection;
use tenderhub_core::bid::Bid;
use tenderhub_core::types::{DbId, Version};

use crate::models::bid::BidVersionRow;

const COLUMNS: &str = "id, bid_id, name, description, status, tender_id, author_type, \
    author_id, version, created_at";

pub struct BidVersionRepo;

impl BidVersionRepo {
    /// Snapshot the bid's current state under its current version number.
    pub async fn create(conn: &mut PgConnection, bid: &Bid) -> Result<BidVersionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO bid_versions
                (bid_id, name, description, status, tender_id, author_type, author_id, version)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BidVersionRow>(&query)
            .bind(bid.id)
            .bind(&bid.name)
            .bind(&bid.description)
            .bind(bid.status.as_str())
            .bind(bid.tender_id)
            .bind(bid.author_type.as_str())
            .bind(bid.author_id)
            .bind(bid.version)
            .fetch_one(conn)
            .await
    }

    pub async fn find(
        conn: &mut PgConnection,
        bid_id: DbId,
        version: Version,
    ) -> Result<Option<BidVersionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bid_versions WHERE bid_id = $1 AND version = $2");
        sqlx::query_as::<_, BidVersionRow>(&query)
            .bind(bid_id)
            .bind(version)
            .fetch_optional(conn)
            .await
    }

    /// All snapshots of a bid, oldest first.
    pub async fn list_by_bid(
        conn: &mut PgConnection,
        bid_id: DbId,
    ) -> Result<Vec<BidVersionRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM bid_versions WHERE bid_id = $1 ORDER BY version ASC");
        sqlx::query_as::<_, BidVersionRow>(&query)
            .bind(bid_id)
            .fetch_all(conn)
            .await
    }
}
