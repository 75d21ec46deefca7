//! Pure authorization rules for tenders and bids.
//!
//! These functions only say *what* must hold for an actor to act on an
//! entity. Resolving the actor and checking organization membership is
//! done by the caller against the store.

use crate::bid::{AuthorType, Bid};
use crate::error::CoreError;
use crate::tender::Tender;
use crate::types::DbId;

/// The relation an actor must have with an entity to act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// The actor must be a responsible member of this organization.
    ResponsibleOf(DbId),
    /// The actor must be this exact employee.
    Employee(DbId),
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(String),
}

impl Access {
    /// Convert a denial into `CoreError::Forbidden`.
    pub fn into_result(self) -> Result<(), CoreError> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(reason) => Err(CoreError::Forbidden(reason)),
        }
    }
}

/// Only responsible members of the owning organization act on a tender.
pub fn tender_requirement(tender: &Tender) -> Requirement {
    Requirement::ResponsibleOf(tender.organization_id)
}

/// A user-authored bid belongs to its author; an organization-authored bid
/// belongs to that organization's responsible members.
pub fn bid_requirement(bid: &Bid) -> Requirement {
    match bid.author_type {
        AuthorType::User => Requirement::Employee(bid.author_id),
        AuthorType::Organization => Requirement::ResponsibleOf(bid.author_id),
    }
}

/// Evaluate a requirement given the actor's id and, for organization
/// requirements, whether the actor is a responsible member.
pub fn evaluate(requirement: Requirement, actor_id: DbId, is_responsible: bool) -> Access {
    match requirement {
        Requirement::Employee(author_id) if author_id == actor_id => Access::Allowed,
        Requirement::Employee(_) => {
            Access::Denied("Only the author of the bid may perform this action".to_string())
        }
        Requirement::ResponsibleOf(_) if is_responsible => Access::Allowed,
        Requirement::ResponsibleOf(org_id) => Access::Denied(format!(
            "User is not a responsible member of organization {org_id}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bid::BidStatus;

    fn bid(author_type: AuthorType, author_id: DbId) -> Bid {
        let now = chrono::Utc::now();
        Bid {
            id: 1,
            name: "Offer".to_string(),
            description: String::new(),
            status: BidStatus::Created,
            tender_id: 1,
            author_type,
            author_id,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_bid_requires_author() {
        let req = bid_requirement(&bid(AuthorType::User, 5));
        assert_eq!(req, Requirement::Employee(5));
        assert_eq!(evaluate(req, 5, false), Access::Allowed);
        assert!(matches!(evaluate(req, 6, true), Access::Denied(_)));
    }

    #[test]
    fn test_org_bid_requires_membership() {
        let req = bid_requirement(&bid(AuthorType::Organization, 9));
        assert_eq!(req, Requirement::ResponsibleOf(9));
        assert_eq!(evaluate(req, 1, true), Access::Allowed);
        assert!(matches!(evaluate(req, 1, false), Access::Denied(_)));
    }

    #[test]
    fn test_denial_maps_to_forbidden() {
        let err = Access::Denied("nope".to_string()).into_result().unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }
}
