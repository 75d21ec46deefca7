//! Rows of `bid_feedback`.

use sqlx::FromRow;
use tenderhub_core::feedback::BidFeedback;
use tenderhub_core::types::{DbId, Timestamp};

/// A row from the `bid_feedback` table.
#[derive(Debug, Clone, FromRow)]
pub struct BidFeedbackRow {
    pub id: DbId,
    pub bid_id: DbId,
    pub username: String,
    pub feedback: String,
    pub created_at: Timestamp,
}

impl From<BidFeedbackRow> for BidFeedback {
    fn from(row: BidFeedbackRow) -> Self {
        BidFeedback {
            id: row.id,
            bid_id: row.bid_id,
            username: row.username,
            feedback: row.feedback,
            created_at: row.created_at,
        }
    }
}
