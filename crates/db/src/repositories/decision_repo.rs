//! Repository for the `bid_decisions` table.

use sqlx::PgConnection;
use tenderhub_core::decision::Decision;
use tenderhub_core::types::DbId;

use crate::models::decision::BidDecisionRow;

const COLUMNS: &str = "id, bid_id, responsible_id, decision";

pub struct DecisionRepo;

impl DecisionRepo {
    /// Record a vote. A second vote by the same responsible on the same bid
    /// violates `uq_bid_decisions_bid_responsible`.
    pub async fn create(
        conn: &mut PgConnection,
        bid_id: DbId,
        responsible_id: DbId,
        decision: Decision,
    ) -> Result<BidDecisionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO bid_decisions (bid_id, responsible_id, decision)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BidDecisionRow>(&query)
            .bind(bid_id)
            .bind(responsible_id)
            .bind(decision.as_str())
            .fetch_one(conn)
            .await
    }

    pub async fn find(
        conn: &mut PgConnection,
        bid_id: DbId,
        responsible_id: DbId,
    ) -> Result<Option<BidDecisionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bid_decisions WHERE bid_id = $1 AND responsible_id = $2"
        );
        sqlx::query_as::<_, BidDecisionRow>(&query)
            .bind(bid_id)
            .bind(responsible_id)
            .fetch_optional(conn)
            .await
    }

    /// Count votes of one kind on a bid.
    pub async fn count(
        conn: &mut PgConnection,
        bid_id: DbId,
        decision: Decision,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bid_decisions WHERE bid_id = $1 AND decision = $2",
        )
        .bind(bid_id)
        .bind(decision.as_str())
        .fetch_one(conn)
        .await?;
        Ok(row.0)
    }
}
