//! Query parameter types shared by the tender and bid handlers.
//!
//! Missing string parameters deserialize as empty strings so the lifecycle
//! layer reports them as validation errors in the standard JSON shape.

use serde::Deserialize;

/// `?username=`
#[derive(Debug, Deserialize)]
pub struct ActorParams {
    #[serde(default)]
    pub username: String,
}

/// `?username=&status=`
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub status: String,
}

/// `?username=&decision=`
#[derive(Debug, Deserialize)]
pub struct DecisionParams {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub decision: String,
}

/// `?username=&bidFeedback=`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackParams {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bid_feedback: String,
}

/// `?authorUsername=&requesterUsername=`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewParams {
    #[serde(default)]
    pub author_username: String,
    #[serde(default)]
    pub requester_username: String,
}
