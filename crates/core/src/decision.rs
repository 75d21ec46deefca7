//! Bid decision values and quorum arithmetic.
//!
//! A single rejection cancels a bid. Approval needs
//! `min(QUORUM_CAP, responsible members)` distinct approving votes.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Upper bound on the number of approvals needed to award a bid.
pub const QUORUM_CAP: i64 = 3;

/// A responsible member's vote on a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// Parse a decision string (`Approved` or `Rejected`).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::Validation(format!(
                "Invalid decision '{s}'. Must be 'Approved' or 'Rejected'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// A recorded vote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidDecision {
    pub id: DbId,
    pub bid_id: DbId,
    pub responsible_id: DbId,
    pub decision: Decision,
}

/// Number of approvals required given the organization's size.
pub fn quorum_size(responsible_count: i64) -> i64 {
    responsible_count.clamp(0, QUORUM_CAP)
}

/// Whether `approved_count` approvals award the bid.
pub fn quorum_reached(approved_count: i64, responsible_count: i64) -> bool {
    approved_count >= quorum_size(responsible_count)
}
