//! Authorization gate.
//!
//! Resolves the acting username and checks the relation the pure rules in
//! [`tenderhub_core::authz`] require. An unknown username is reported as
//! `UnknownUser`; a known user without the relation as `Forbidden`.

use tenderhub_core::authz::{self, Requirement};
use tenderhub_core::bid::Bid;
use tenderhub_core::error::CoreError;
use tenderhub_core::identity::Employee;
use tenderhub_core::store::Transaction;
use tenderhub_core::tender::Tender;
use tenderhub_core::types::DbId;

/// Resolve a username to an employee.
pub async fn resolve_actor<T: Transaction>(
    tx: &mut T,
    username: &str,
) -> Result<Employee, CoreError> {
    if username.trim().is_empty() {
        return Err(CoreError::Validation("username must not be empty".to_string()));
    }
    tx.find_employee_by_username(username)
        .await?
        .ok_or_else(|| CoreError::UnknownUser(username.to_string()))
}

/// Whether `actor` is a responsible member of `organization_id`.
pub async fn is_responsible<T: Transaction>(
    tx: &mut T,
    organization_id: DbId,
    actor: &Employee,
) -> Result<bool, CoreError> {
    tx.is_responsible(organization_id, actor.id).await
}

/// Check that `actor` may act on `tender`.
pub async fn authorize_tender<T: Transaction>(
    tx: &mut T,
    tender: &Tender,
    actor: &Employee,
) -> Result<(), CoreError> {
    check(tx, authz::tender_requirement(tender), actor).await
}

/// Check that `actor` may act on `bid` as its author (or author org member).
pub async fn authorize_bid<T: Transaction>(
    tx: &mut T,
    bid: &Bid,
    actor: &Employee,
) -> Result<(), CoreError> {
    check(tx, authz::bid_requirement(bid), actor).await
}

async fn check<T: Transaction>(
    tx: &mut T,
    requirement: Requirement,
    actor: &Employee,
) -> Result<(), CoreError> {
    let member = match requirement {
        Requirement::ResponsibleOf(org_id) => is_responsible(tx, org_id, actor).await?,
        Requirement::Employee(_) => false,
    };
    let access = authz::evaluate(requirement, actor.id, member);
    if let authz::Access::Denied(reason) = &access {
        tracing::debug!(actor = %actor.username, reason = %reason, "Access denied");
    }
    access.into_result()
}
