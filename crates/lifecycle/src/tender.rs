//! Tender lifecycle: create, publish/close, edit, rollback, and reads.

use std::sync::Arc;

use tenderhub_core::error::CoreError;
use tenderhub_core::store::{Store, Transaction};
use tenderhub_core::tender::{
    CreateTender, Tender, TenderAction, TenderPatch, TenderStatus, TenderVersion,
};
use tenderhub_core::types::{DbId, Version};

use crate::config::LifecycleConfig;
use crate::{cascade, gate, versions};

/// Applies tender operations against a [`Store`].
pub struct TenderLifecycle<S> {
    store: Arc<S>,
    config: LifecycleConfig,
}

impl<S> Clone for TenderLifecycle<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: Store> TenderLifecycle<S> {
    pub fn new(store: Arc<S>, config: LifecycleConfig) -> Self {
        Self { store, config }
    }

    /// Create a tender in `CREATED` status at version 1.
    ///
    /// The creator must be a responsible member of the target organization.
    pub async fn create(&self, input: CreateTender) -> Result<Tender, CoreError> {
        input.validate()?;

        let mut tx = self.store.begin().await?;
        let creator = gate::resolve_actor(&mut tx, &input.creator_username).await?;

        if !tx.organization_exists(input.organization_id).await? {
            return Err(CoreError::NotFound {
                entity: "Organization",
                id: input.organization_id,
            });
        }
        if !gate::is_responsible(&mut tx, input.organization_id, &creator).await? {
            return Err(CoreError::Forbidden(format!(
                "User '{}' is not a responsible member of organization {}",
                creator.username, input.organization_id
            )));
        }

        let tender = tx.insert_tender(&input).await?;
        versions::record_tender(&mut tx, &tender).await?;
        tx.commit().await?;

        tracing::info!(
            tender_id = tender.id,
            organization_id = tender.organization_id,
            creator = %tender.creator_username,
            "Tender created"
        );
        Ok(tender)
    }

    /// Publish or close a tender.
    ///
    /// Closing cancels every open bid of the tender in the same transaction.
    pub async fn set_status(
        &self,
        tender_id: DbId,
        username: &str,
        action: TenderAction,
    ) -> Result<Tender, CoreError> {
        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;
        let mut tender = lock_existing(&mut tx, tender_id).await?;
        gate::authorize_tender(&mut tx, &tender, &actor).await?;
        let next = tender.status.apply(action)?;
        let now = chrono::Utc::now();

        match action {
            TenderAction::Publish => {
                tender.status = next;
                tender.bump_version(now);
                tx.update_tender(&tender).await?;
                versions::record_tender(&mut tx, &tender).await?;
                tracing::info!(
                    tender_id,
                    version = tender.version,
                    actor = %actor.username,
                    "Tender published"
                );
            }
            TenderAction::Close => {
                if self.config.close_requires_bids
                    && tx.list_bids_for_tender(tender_id).await?.is_empty()
                {
                    return Err(CoreError::NotFound {
                        entity: "Bids of tender",
                        id: tender_id,
                    });
                }
                cascade::close_tender(&mut tx, &mut tender, now).await?;
            }
        }

        tx.commit().await?;
        Ok(tender)
    }

    /// Apply a partial update to a tender that is not closed.
    pub async fn edit(
        &self,
        tender_id: DbId,
        username: &str,
        patch: TenderPatch,
    ) -> Result<Tender, CoreError> {
        patch.validate()?;

        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;
        let mut tender = lock_existing(&mut tx, tender_id).await?;
        gate::authorize_tender(&mut tx, &tender, &actor).await?;
        tender.status.ensure_mutable()?;

        patch.apply_to(&mut tender);
        tender.bump_version(chrono::Utc::now());
        tx.update_tender(&tender).await?;
        versions::record_tender(&mut tx, &tender).await?;
        tx.commit().await?;

        tracing::info!(
            tender_id,
            version = tender.version,
            actor = %actor.username,
            "Tender edited"
        );
        Ok(tender)
    }

    /// Restore a tender's fields from an earlier snapshot.
    ///
    /// The version counter moves forward; the restored state becomes a new
    /// version rather than replacing the old one.
    pub async fn rollback(
        &self,
        tender_id: DbId,
        target_version: Version,
        username: &str,
    ) -> Result<Tender, CoreError> {
        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;
        let mut tender = lock_existing(&mut tx, tender_id).await?;
        gate::authorize_tender(&mut tx, &tender, &actor).await?;
        tender.status.ensure_mutable()?;

        let snapshot = versions::tender_snapshot(&mut tx, tender_id, target_version).await?;
        tender.restore_from(&snapshot);
        tender.bump_version(chrono::Utc::now());
        tx.update_tender(&tender).await?;
        versions::record_tender(&mut tx, &tender).await?;
        tx.commit().await?;

        tracing::info!(
            tender_id,
            restored_from = target_version,
            version = tender.version,
            actor = %actor.username,
            "Tender rolled back"
        );
        Ok(tender)
    }

    /// All tenders, ascending by id.
    pub async fn list(&self) -> Result<Vec<Tender>, CoreError> {
        let mut tx = self.store.begin().await?;
        tx.list_tenders().await
    }

    /// Tenders created by `username`.
    pub async fn list_for_user(&self, username: &str) -> Result<Vec<Tender>, CoreError> {
        let mut tx = self.store.begin().await?;
        let actor = gate::resolve_actor(&mut tx, username).await?;
        tx.list_tenders_by_creator(&actor.username).await
    }

    /// Current status of a tender, visible to its organization's members.
    pub async fn status(&self, tender_id: DbId, username: &str) -> Result<TenderStatus, CoreError> {
        let mut tx = self.store.begin().await?;
        let tender = self.readable(&mut tx, tender_id, username).await?;
        Ok(tender.status)
    }

    /// Snapshot history of a tender, ascending by version.
    pub async fn versions(
        &self,
        tender_id: DbId,
        username: &str,
    ) -> Result<Vec<TenderVersion>, CoreError> {
        let mut tx = self.store.begin().await?;
        self.readable(&mut tx, tender_id, username).await?;
        tx.list_tender_versions(tender_id).await
    }

    async fn readable(
        &self,
        tx: &mut S::Tx,
        tender_id: DbId,
        username: &str,
    ) -> Result<Tender, CoreError> {
        let actor = gate::resolve_actor(tx, username).await?;
        let tender = tx.find_tender(tender_id).await?.ok_or(CoreError::NotFound {
            entity: "Tender",
            id: tender_id,
        })?;
        gate::authorize_tender(tx, &tender, &actor).await?;
        Ok(tender)
    }
}

/// Lock a tender row, failing with `NotFound` if it does not exist.
pub(crate) async fn lock_existing<T: Transaction>(
    tx: &mut T,
    tender_id: DbId,
) -> Result<Tender, CoreError> {
    tx.lock_tender(tender_id).await?.ok_or(CoreError::NotFound {
        entity: "Tender",
        id: tender_id,
    })
}
