//! Reviewer feedback on bids.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length for a feedback entry.
pub const MAX_FEEDBACK_LENGTH: usize = 1_000;

/// One reviewer's free-text feedback on a bid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidFeedback {
    pub id: DbId,
    pub bid_id: DbId,
    pub username: String,
    pub feedback: String,
    pub created_at: Timestamp,
}

/// Validate feedback text: non-blank, bounded length.
pub fn validate_feedback(feedback: &str) -> Result<(), CoreError> {
    if feedback.trim().is_empty() {
        return Err(CoreError::Validation(
            "Feedback must not be empty".to_string(),
        ));
    }
    if feedback.chars().count() > MAX_FEEDBACK_LENGTH {
        return Err(CoreError::Validation(format!(
            "Feedback exceeds maximum length of {MAX_FEEDBACK_LENGTH} characters"
        )));
    }
    Ok(())
}
