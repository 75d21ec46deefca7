//! Tender records, status machine, and validation.
//!
//! A tender moves strictly `CREATED -> PUBLISHED -> CLOSED`. The only way
//! to move "backwards" is a rollback, which copies a snapshot's status
//! verbatim while the version counter keeps moving forward.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp, Version};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for a tender or bid name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for a tender or bid description.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Maximum length for a tender service type.
pub const MAX_SERVICE_TYPE_LENGTH: usize = 100;

/* --------------------------------------------------------------------------
Status
-------------------------------------------------------------------------- */

/// Lifecycle status of a tender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TenderStatus {
    Created,
    Published,
    Closed,
}

/// Operator action requested through the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenderAction {
    Publish,
    Close,
}

/// Every legal `(from, action, to)` edge of the tender state machine.
const TENDER_TRANSITIONS: &[(TenderStatus, TenderAction, TenderStatus)] = &[
    (
        TenderStatus::Created,
        TenderAction::Publish,
        TenderStatus::Published,
    ),
    (
        TenderStatus::Published,
        TenderAction::Close,
        TenderStatus::Closed,
    ),
];

impl TenderStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "CREATED" => Ok(Self::Created),
            "PUBLISHED" => Ok(Self::Published),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(CoreError::Validation(format!(
                "Invalid tender status '{s}'. Must be one of: CREATED, PUBLISHED, CLOSED"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Published => "PUBLISHED",
            Self::Closed => "CLOSED",
        }
    }

    /// A closed tender accepts no further edits, transitions, or rollbacks.
    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }

    /// Look up the status reached by applying `action`, or explain why the
    /// edge does not exist.
    pub fn apply(self, action: TenderAction) -> Result<Self, CoreError> {
        if let Some((_, _, to)) = TENDER_TRANSITIONS
            .iter()
            .find(|(from, act, _)| *from == self && *act == action)
        {
            return Ok(*to);
        }

        if self.is_terminal() {
            return Err(CoreError::InvalidTransition(
                "Tender is closed; no further changes are possible".to_string(),
            ));
        }

        let required = match action {
            TenderAction::Publish => Self::Created,
            TenderAction::Close => Self::Published,
        };
        Err(CoreError::InvalidTransition(format!(
            "Tender must be {} to {}, current status is {}",
            required.as_str(),
            action.as_str(),
            self.as_str()
        )))
    }

    /// Fail with `InvalidTransition` when the tender can no longer change.
    pub fn ensure_mutable(self) -> Result<(), CoreError> {
        if self.is_terminal() {
            return Err(CoreError::InvalidTransition(
                "Tender is closed; no further changes are possible".to_string(),
            ));
        }
        Ok(())
    }
}

impl TenderAction {
    /// Parse the `status` query value (`publish` or `close`).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "publish" => Ok(Self::Publish),
            "close" => Ok(Self::Close),
            _ => Err(CoreError::Validation(format!(
                "Invalid action '{s}'. Use 'publish' or 'close'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Close => "close",
        }
    }
}

/* --------------------------------------------------------------------------
Records
-------------------------------------------------------------------------- */

/// The live tender row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tender {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: TenderStatus,
    pub organization_id: DbId,
    pub creator_username: String,
    pub version: Version,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Immutable snapshot of a tender taken after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenderVersion {
    pub id: DbId,
    pub tender_id: DbId,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: TenderStatus,
    pub version: Version,
    pub created_at: Timestamp,
}

/// Input for creating a tender. Status is not accepted from callers.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTender {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub service_type: String,
    pub organization_id: DbId,
    pub creator_username: String,
}

/// Partial update for a tender. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenderPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub service_type: Option<String>,
}

impl Tender {
    /// Advance the version counter and touch `updated_at`.
    pub fn bump_version(&mut self, now: Timestamp) {
        self.version += 1;
        self.updated_at = now;
    }

    /// Copy the restorable fields of a snapshot into the live row.
    pub fn restore_from(&mut self, snapshot: &TenderVersion) {
        self.name = snapshot.name.clone();
        self.description = snapshot.description.clone();
        self.service_type = snapshot.service_type.clone();
        self.status = snapshot.status;
    }
}

impl CreateTender {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        validate_description(&self.description)?;
        validate_service_type(&self.service_type)?;
        if self.creator_username.trim().is_empty() {
            return Err(CoreError::Validation(
                "creator_username must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl TenderPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.service_type.is_none()
    }

    /// Reject empty patches and patched values that break field rules.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::Validation(
                "Patch must set at least one of: name, description, service_type".to_string(),
            ));
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(service_type) = &self.service_type {
            validate_service_type(service_type)?;
        }
        Ok(())
    }

    /// Merge the set fields into `tender`.
    pub fn apply_to(&self, tender: &mut Tender) {
        if let Some(name) = &self.name {
            tender.name = name.clone();
        }
        if let Some(description) = &self.description {
            tender.description = description.clone();
        }
        if let Some(service_type) = &self.service_type {
            tender.service_type = service_type.clone();
        }
    }
}

/* --------------------------------------------------------------------------
Field validation (shared with bids)
-------------------------------------------------------------------------- */

/// Validate a tender or bid name: non-blank, bounded length.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a tender or bid description (may be empty).
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_service_type(service_type: &str) -> Result<(), CoreError> {
    if service_type.trim().is_empty() {
        return Err(CoreError::Validation(
            "Service type must not be empty".to_string(),
        ));
    }
    if service_type.chars().count() > MAX_SERVICE_TYPE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Service type exceeds maximum length of {MAX_SERVICE_TYPE_LENGTH} characters"
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sample_tender() -> Tender {
        let now = chrono::Utc::now();
        Tender {
            id: 1,
            name: "Road repair".to_string(),
            description: "Fix potholes".to_string(),
            service_type: "Construction".to_string(),
            status: TenderStatus::Created,
            organization_id: 7,
            creator_username: "alice".to_string(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_publish_from_created() {
        assert_eq!(
            TenderStatus::Created.apply(TenderAction::Publish).unwrap(),
            TenderStatus::Published
        );
    }

    #[test]
    fn test_close_from_published() {
        assert_eq!(
            TenderStatus::Published.apply(TenderAction::Close).unwrap(),
            TenderStatus::Closed
        );
    }

    #[test]
    fn test_close_from_created_is_skipping() {
        let err = TenderStatus::Created.apply(TenderAction::Close).unwrap_err();
        assert_matches!(err, CoreError::InvalidTransition(msg) if msg.contains("PUBLISHED"));
    }

    #[test]
    fn test_publish_twice_rejected() {
        assert_matches!(
            TenderStatus::Published.apply(TenderAction::Publish),
            Err(CoreError::InvalidTransition(_))
        );
    }

    #[test]
    fn test_closed_rejects_every_action() {
        for action in [TenderAction::Publish, TenderAction::Close] {
            let err = TenderStatus::Closed.apply(action).unwrap_err();
            assert_matches!(err, CoreError::InvalidTransition(msg) if msg.contains("closed"));
        }
    }

    #[test]
    fn test_status_db_round_trip() {
        for status in [
            TenderStatus::Created,
            TenderStatus::Published,
            TenderStatus::Closed,
        ] {
            assert_eq!(TenderStatus::from_str_db(status.as_str()).unwrap(), status);
        }
        assert!(TenderStatus::from_str_db("OPEN").is_err());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&TenderStatus::Published).unwrap();
        assert_eq!(json, "\"PUBLISHED\"");
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(TenderAction::parse("publish").unwrap(), TenderAction::Publish);
        assert_eq!(TenderAction::parse("close").unwrap(), TenderAction::Close);
        assert_matches!(TenderAction::parse("PUBLISHED"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_empty_patch_rejected() {
        assert_matches!(TenderPatch::default().validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_patch_leaves_unset_fields() {
        let mut tender = sample_tender();
        let patch = TenderPatch {
            description: Some("Resurface the whole street".to_string()),
            ..Default::default()
        };
        patch.validate().unwrap();
        patch.apply_to(&mut tender);

        assert_eq!(tender.name, "Road repair");
        assert_eq!(tender.description, "Resurface the whole street");
        assert_eq!(tender.service_type, "Construction");
    }

    #[test]
    fn test_patch_blank_name_rejected() {
        let patch = TenderPatch {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert_matches!(patch.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_create_validation_limits() {
        let mut input = CreateTender {
            name: "x".repeat(MAX_NAME_LENGTH),
            description: String::new(),
            service_type: "Delivery".to_string(),
            organization_id: 1,
            creator_username: "alice".to_string(),
        };
        assert!(input.validate().is_ok());

        input.name.push('x');
        assert_matches!(input.validate(), Err(CoreError::Validation(msg)) if msg.contains("Name"));
    }

    #[test]
    fn test_restore_copies_status_verbatim() {
        let mut tender = sample_tender();
        tender.status = TenderStatus::Published;
        tender.version = 3;

        let snapshot = TenderVersion {
            id: 10,
            tender_id: 1,
            name: "Old name".to_string(),
            description: "Old description".to_string(),
            service_type: "Old type".to_string(),
            status: TenderStatus::Created,
            version: 1,
            created_at: chrono::Utc::now(),
        };
        tender.restore_from(&snapshot);

        assert_eq!(tender.name, "Old name");
        assert_eq!(tender.status, TenderStatus::Created);
        // Restoring never rewinds the counter.
        assert_eq!(tender.version, 3);
    }
}
