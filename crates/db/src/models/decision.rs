//! Rows of `bid_decisions`.

use sqlx::FromRow;
use tenderhub_core::decision::{BidDecision, Decision};
use tenderhub_core::error::CoreError;
use tenderhub_core::types::DbId;

use super::corrupt;

/// A row from the `bid_decisions` table.
#[derive(Debug, Clone, FromRow)]
pub struct BidDecisionRow {
    pub id: DbId,
    pub bid_id: DbId,
    pub responsible_id: DbId,
    pub decision: String,
}

impl TryFrom<BidDecisionRow> for BidDecision {
    type Error = CoreError;

    fn try_from(row: BidDecisionRow) -> Result<Self, Self::Error> {
        let decision =
            Decision::parse(&row.decision).map_err(|e| corrupt("bid_decisions", row.id, e))?;
        Ok(BidDecision {
            id: row.id,
            bid_id: row.bid_id,
            responsible_id: row.responsible_id,
            decision,
        })
    }
}
