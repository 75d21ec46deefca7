//! `PgStore` against a real database: the SQL of every repository the
//! lifecycle leans on, unique-key conflicts, and row locking.

use std::time::Duration;

use assert_matches::assert_matches;
use sqlx::PgPool;

use tenderhub_core::bid::{AuthorType, BidStatus, CreateBid};
use tenderhub_core::decision::Decision;
use tenderhub_core::error::CoreError;
use tenderhub_core::store::{Store, Transaction};
use tenderhub_core::tender::{CreateTender, TenderStatus};
use tenderhub_core::types::DbId;
use tenderhub_db::PgStore;

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

async fn seed_employee(pool: &PgPool, username: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO employee (username) VALUES ($1) RETURNING id")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn seed_organization(pool: &PgPool, name: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO organization (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn seed_responsible(pool: &PgPool, organization_id: DbId, employee_id: DbId) {
    sqlx::query("INSERT INTO organization_responsible (organization_id, user_id) VALUES ($1, $2)")
        .bind(organization_id)
        .bind(employee_id)
        .execute(pool)
        .await
        .unwrap();
}

fn new_tender(organization_id: DbId) -> CreateTender {
    CreateTender {
        name: "Road repair".to_string(),
        description: "Resurface the main street".to_string(),
        service_type: "Construction".to_string(),
        organization_id,
        creator_username: "resp1".to_string(),
    }
}

fn user_bid(tender_id: DbId, author_id: DbId, name: &str) -> CreateBid {
    CreateBid {
        name: name.to_string(),
        description: "Two weeks".to_string(),
        tender_id,
        author_type: AuthorType::User,
        author_id,
    }
}

/// Store with one organization (`resp1` responsible), a bidder, and a
/// committed tender. Returns `(store, org, resp1, bidder, tender_id)`.
async fn seeded(pool: PgPool) -> (PgStore, DbId, DbId, DbId, DbId) {
    let org = seed_organization(&pool, "Acme LLC").await;
    let resp1 = seed_employee(&pool, "resp1").await;
    seed_responsible(&pool, org, resp1).await;
    let bidder = seed_employee(&pool, "bidder1").await;

    let store = PgStore::new(pool);
    let mut tx = store.begin().await.unwrap();
    let tender = tx.insert_tender(&new_tender(org)).await.unwrap();
    tx.insert_tender_version(&tender).await.unwrap();
    tx.commit().await.unwrap();

    (store, org, resp1, bidder, tender.id)
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn identity_lookups(pool: PgPool) {
    let (store, org, resp1, bidder, _) = seeded(pool).await;
    let mut tx = store.begin().await.unwrap();

    let employee = tx.find_employee_by_username("resp1").await.unwrap().unwrap();
    assert_eq!(employee.id, resp1);
    assert!(tx.find_employee_by_username("ghost").await.unwrap().is_none());

    assert!(tx.organization_exists(org).await.unwrap());
    assert!(!tx.organization_exists(org + 1_000).await.unwrap());

    assert!(tx.is_responsible(org, resp1).await.unwrap());
    assert!(!tx.is_responsible(org, bidder).await.unwrap());
    assert_eq!(tx.count_responsibles(org).await.unwrap(), 1);

    store.ping().await.unwrap();
}

// ---------------------------------------------------------------------------
// Tenders and snapshots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn tender_update_and_versions_round_trip(pool: PgPool) {
    let (store, org, _, _, tender_id) = seeded(pool).await;

    let mut tx = store.begin().await.unwrap();
    let mut tender = tx.lock_tender(tender_id).await.unwrap().unwrap();
    assert_eq!(tender.status, TenderStatus::Created);
    assert_eq!(tender.version, 1);
    assert_eq!(tender.organization_id, org);

    tender.status = TenderStatus::Published;
    tender.bump_version(chrono::Utc::now());
    tx.update_tender(&tender).await.unwrap();
    let snapshot = tx.insert_tender_version(&tender).await.unwrap();
    assert_eq!(snapshot.version, 2);
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    let current = tx.find_tender(tender_id).await.unwrap().unwrap();
    assert_eq!(current.status, TenderStatus::Published);
    assert_eq!(current.version, 2);

    let versions = tx.list_tender_versions(tender_id).await.unwrap();
    let numbers: Vec<i32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(versions[0].status, TenderStatus::Created);

    let first = tx.find_tender_version(tender_id, 1).await.unwrap().unwrap();
    assert_eq!(first.name, "Road repair");
    assert!(tx.find_tender_version(tender_id, 3).await.unwrap().is_none());

    assert_eq!(tx.list_tenders_by_creator("resp1").await.unwrap().len(), 1);
    assert_eq!(tx.list_tenders().await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_snapshot_version_is_conflict(pool: PgPool) {
    let (store, _, _, _, tender_id) = seeded(pool).await;

    let mut tx = store.begin().await.unwrap();
    let tender = tx.find_tender(tender_id).await.unwrap().unwrap();
    let result = tx.insert_tender_version(&tender).await;
    assert_matches!(result, Err(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_of_missing_tender_is_not_found(pool: PgPool) {
    let (store, _, _, _, tender_id) = seeded(pool).await;

    let mut tx = store.begin().await.unwrap();
    let mut tender = tx.find_tender(tender_id).await.unwrap().unwrap();
    tender.id = tender_id + 1_000;
    let result = tx.update_tender(&tender).await;
    assert_matches!(result, Err(CoreError::NotFound { entity: "Tender", .. }));
}

#[sqlx::test(migrations = "./migrations")]
async fn dropped_transaction_rolls_back(pool: PgPool) {
    let (store, _, _, _, tender_id) = seeded(pool).await;

    {
        let mut tx = store.begin().await.unwrap();
        let mut tender = tx.lock_tender(tender_id).await.unwrap().unwrap();
        tender.status = TenderStatus::Published;
        tender.bump_version(chrono::Utc::now());
        tx.update_tender(&tender).await.unwrap();
        tx.insert_tender_version(&tender).await.unwrap();
    }

    let mut tx = store.begin().await.unwrap();
    let current = tx.find_tender(tender_id).await.unwrap().unwrap();
    assert_eq!(current.status, TenderStatus::Created);
    assert_eq!(tx.list_tender_versions(tender_id).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Bids
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn bid_update_and_versions_round_trip(pool: PgPool) {
    let (store, _, _, bidder, tender_id) = seeded(pool).await;

    let mut tx = store.begin().await.unwrap();
    let mut bid = tx.insert_bid(&user_bid(tender_id, bidder, "Offer")).await.unwrap();
    tx.insert_bid_version(&bid).await.unwrap();
    assert_eq!(bid.status, BidStatus::Created);
    assert_eq!(bid.author_type, AuthorType::User);

    bid.status = BidStatus::Canceled;
    bid.bump_version(chrono::Utc::now());
    tx.update_bid(&bid).await.unwrap();
    tx.insert_bid_version(&bid).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    let current = tx.lock_bid(bid.id).await.unwrap().unwrap();
    assert_eq!(current.status, BidStatus::Canceled);
    assert_eq!(current.version, 2);

    let versions = tx.list_bid_versions(bid.id).await.unwrap();
    let statuses: Vec<BidStatus> = versions.iter().map(|v| v.status).collect();
    assert_eq!(statuses, vec![BidStatus::Created, BidStatus::Canceled]);
    assert!(tx.find_bid_version(bid.id, 2).await.unwrap().is_some());

    let mine = tx.list_bids_by_author(AuthorType::User, bidder).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert!(tx
        .list_bids_by_author(AuthorType::Organization, bidder)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn lock_bids_for_tender_returns_id_order(pool: PgPool) {
    let (store, _, _, bidder, tender_id) = seeded(pool).await;

    let mut tx = store.begin().await.unwrap();
    let mut created = Vec::new();
    for name in ["First", "Second", "Third"] {
        created.push(tx.insert_bid(&user_bid(tender_id, bidder, name)).await.unwrap().id);
    }
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    let locked: Vec<DbId> = tx
        .lock_bids_for_tender(tender_id)
        .await
        .unwrap()
        .iter()
        .map(|b| b.id)
        .collect();
    let mut sorted = created.clone();
    sorted.sort_unstable();
    assert_eq!(locked, sorted);
    assert_eq!(tx.list_bids_for_tender(tender_id).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn tender_row_lock_blocks_a_second_locker(pool: PgPool) {
    let (store, _, _, _, tender_id) = seeded(pool).await;

    let mut holder = store.begin().await.unwrap();
    holder.lock_tender(tender_id).await.unwrap().unwrap();

    let contender = store.clone();
    let waiter = tokio::spawn(async move {
        let mut tx = contender.begin().await?;
        let tender = tx.lock_tender(tender_id).await?;
        tx.commit().await?;
        Ok::<_, CoreError>(tender)
    });

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!waiter.is_finished(), "second FOR UPDATE must wait for the first");

    holder.commit().await.unwrap();
    let tender = waiter.await.unwrap().unwrap();
    assert_eq!(tender.map(|t| t.id), Some(tender_id));
}

// ---------------------------------------------------------------------------
// Decisions and feedback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_decision_is_conflict(pool: PgPool) {
    let (store, _, resp1, bidder, tender_id) = seeded(pool).await;

    let mut tx = store.begin().await.unwrap();
    let bid = tx.insert_bid(&user_bid(tender_id, bidder, "Offer")).await.unwrap();
    let decision = tx
        .insert_decision(bid.id, resp1, Decision::Approved)
        .await
        .unwrap();
    assert_eq!(decision.decision, Decision::Approved);
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    assert!(tx.find_decision(bid.id, resp1).await.unwrap().is_some());
    assert_eq!(tx.count_decisions(bid.id, Decision::Approved).await.unwrap(), 1);
    assert_eq!(tx.count_decisions(bid.id, Decision::Rejected).await.unwrap(), 0);

    let again = tx.insert_decision(bid.id, resp1, Decision::Rejected).await;
    assert_matches!(again, Err(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn feedback_for_many_bids_and_duplicates(pool: PgPool) {
    let (store, _, _, bidder, tender_id) = seeded(pool).await;

    let mut tx = store.begin().await.unwrap();
    let first = tx.insert_bid(&user_bid(tender_id, bidder, "First")).await.unwrap();
    let second = tx.insert_bid(&user_bid(tender_id, bidder, "Second")).await.unwrap();
    let third = tx.insert_bid(&user_bid(tender_id, bidder, "Third")).await.unwrap();
    tx.insert_feedback(first.id, "resp1", "Solid plan").await.unwrap();
    tx.insert_feedback(second.id, "resp1", "Too slow").await.unwrap();
    tx.insert_feedback(third.id, "resp1", "Unrelated").await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    let entries = tx
        .list_feedback_for_bids(&[first.id, second.id])
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.bid_id != third.id));

    let found = tx.find_feedback(first.id, "resp1").await.unwrap().unwrap();
    assert_eq!(found.feedback, "Solid plan");

    let again = tx.insert_feedback(first.id, "resp1", "Changed my mind").await;
    assert_matches!(again, Err(CoreError::Conflict(_)));
}
