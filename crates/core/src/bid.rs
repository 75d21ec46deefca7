//! Bid records, status machine, and author types.
//!
//! A bid starts `CREATED` and ends in exactly one of two terminal states:
//! `PUBLISHED` (awarded by quorum) or `CANCELED` (manual cancel, a single
//! rejection, or its tender closing).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::tender::{validate_description, validate_name};
use crate::types::{DbId, Timestamp, Version};

/* --------------------------------------------------------------------------
Status
-------------------------------------------------------------------------- */

/// Lifecycle status of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BidStatus {
    Created,
    Published,
    Canceled,
}

/// Every legal `(from, to)` edge of the bid state machine.
const BID_TRANSITIONS: &[(BidStatus, BidStatus)] = &[
    (BidStatus::Created, BidStatus::Published),
    (BidStatus::Created, BidStatus::Canceled),
];

impl BidStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "CREATED" => Ok(Self::Created),
            "PUBLISHED" => Ok(Self::Published),
            "CANCELED" => Ok(Self::Canceled),
            _ => Err(CoreError::Validation(format!(
                "Invalid bid status '{s}'. Must be one of: CREATED, PUBLISHED, CANCELED"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Published => "PUBLISHED",
            Self::Canceled => "CANCELED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Published | Self::Canceled)
    }

    pub fn can_transition_to(self, to: BidStatus) -> bool {
        BID_TRANSITIONS.contains(&(self, to))
    }

    /// Fail with `InvalidTransition` once the bid is published or canceled.
    pub fn ensure_mutable(self) -> Result<(), CoreError> {
        match self {
            Self::Created => Ok(()),
            Self::Canceled => Err(CoreError::InvalidTransition(
                "Bid is canceled; no further changes are possible".to_string(),
            )),
            Self::Published => Err(CoreError::InvalidTransition(
                "Bid has already been accepted; no further changes are possible".to_string(),
            )),
        }
    }

    /// Parse a manually requested target status.
    ///
    /// Only `CANCELED` can be set by hand. `PUBLISHED` is reached through
    /// quorum and `CREATED` only at creation.
    pub fn parse_manual_target(s: &str) -> Result<Self, CoreError> {
        match s {
            "CANCELED" => Ok(Self::Canceled),
            "PUBLISHED" => Err(CoreError::Validation(
                "Status PUBLISHED is reached by quorum decision; use CANCELED".to_string(),
            )),
            "CREATED" => Err(CoreError::Validation(
                "Status CREATED is set when a bid is created; use CANCELED".to_string(),
            )),
            _ => Err(CoreError::Validation(format!(
                "Invalid bid status '{s}'. The only settable status is CANCELED"
            ))),
        }
    }
}

/// Who submitted the bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthorType {
    User,
    Organization,
}

impl AuthorType {
    /// Parse an author type string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "USER" => Ok(Self::User),
            "ORGANIZATION" => Ok(Self::Organization),
            _ => Err(CoreError::Validation(format!(
                "Invalid author type '{s}'. Must be USER or ORGANIZATION"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Organization => "ORGANIZATION",
        }
    }
}

/* --------------------------------------------------------------------------
Records
-------------------------------------------------------------------------- */

/// The live bid row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bid {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub status: BidStatus,
    pub tender_id: DbId,
    pub author_type: AuthorType,
    pub author_id: DbId,
    pub version: Version,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Immutable snapshot of a bid taken after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidVersion {
    pub id: DbId,
    pub bid_id: DbId,
    pub name: String,
    pub description: String,
    pub status: BidStatus,
    pub tender_id: DbId,
    pub author_type: AuthorType,
    pub author_id: DbId,
    pub version: Version,
    pub created_at: Timestamp,
}

/// Input for creating a bid.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBid {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tender_id: DbId,
    pub author_type: AuthorType,
    pub author_id: DbId,
}

/// Partial update for a bid. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BidPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Bid {
    /// Advance the version counter and touch `updated_at`.
    pub fn bump_version(&mut self, now: Timestamp) {
        self.version += 1;
        self.updated_at = now;
    }

    /// Copy the restorable fields of a snapshot into the live row.
    pub fn restore_from(&mut self, snapshot: &BidVersion) {
        self.name = snapshot.name.clone();
        self.description = snapshot.description.clone();
        self.status = snapshot.status;
    }
}

impl CreateBid {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        validate_description(&self.description)
    }
}

impl BidPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::Validation(
                "Patch must set at least one of: name, description".to_string(),
            ));
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, bid: &mut Bid) {
        if let Some(name) = &self.name {
            bid.name = name.clone();
        }
        if let Some(description) = &self.description {
            bid.description = description.clone();
        }
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
