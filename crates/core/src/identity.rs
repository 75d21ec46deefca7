//! Identity records owned by the identity collaborator.
//!
//! The lifecycle only reads these: usernames resolve to employees, and
//! employees are responsible members of organizations.

use serde::Serialize;

use crate::types::DbId;

/// A person who can act on tenders and bids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
