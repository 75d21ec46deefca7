//! Repository for the `bid_feedback` table.

use sqlx::PgConnection;
use tenderhub_core::types::DbId;

use crate::models::feedback::BidFeedbackRow;

const COLUMNS: &str = "id, bid_id, username, feedback, created_at";

pub struct FeedbackRepo;

impl FeedbackRepo {
    pub async fn create(
        conn: &mut PgConnection,
        bid_id: DbId,
        username: &str,
        feedback: &str,
    ) -> Result<BidFeedbackRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO bid_feedback (bid_id, username, feedback)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BidFeedbackRow>(&query)
            .bind(bid_id)
            .bind(username)
            .bind(feedback)
            .fetch_one(conn)
            .await
    }

    pub async fn find(
        conn: &mut PgConnection,
        bid_id: DbId,
        username: &str,
    ) -> Result<Option<BidFeedbackRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM bid_feedback WHERE bid_id = $1 AND username = $2");
        sqlx::query_as::<_, BidFeedbackRow>(&query)
            .bind(bid_id)
            .bind(username)
            .fetch_optional(conn)
            .await
    }

    /// Feedback on any of the given bids, oldest first.
    pub async fn list_by_bids(
        conn: &mut PgConnection,
        bid_ids: &[DbId],
    ) -> Result<Vec<BidFeedbackRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bid_feedback WHERE bid_id = ANY($1) ORDER BY created_at, id"
        );
        sqlx::query_as::<_, BidFeedbackRow>(&query)
            .bind(bid_ids)
            .fetch_all(conn)
            .await
    }
}
