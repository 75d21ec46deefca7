//! Bid lifecycle against the in-memory store: creation rules, edits, manual
//! cancel, rollback, feedback and reviews.

mod common;

use assert_matches::assert_matches;

use tenderhub_core::bid::{AuthorType, BidPatch, BidStatus, CreateBid};
use tenderhub_core::error::CoreError;
use tenderhub_core::tender::TenderAction;

use common::{bidder_name, fixture, new_tender, user_bid};

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_on_published_tender() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    let bid = f.bid_from(tender.id, 0).await;

    assert_eq!(bid.status, BidStatus::Created);
    assert_eq!(bid.version, 1);
    assert_eq!(bid.author_type, AuthorType::User);

    let versions = f.services.bids.versions(bid.id, "bidder1").await.unwrap();
    assert_eq!(versions.len(), 1);
}

#[tokio::test]
async fn test_create_on_unpublished_tender_is_invalid_transition() {
    let f = fixture(1).await;
    let tender = f
        .services
        .tenders
        .create(new_tender(f.org, "resp1"))
        .await
        .unwrap();
    let result = f.services.bids.create(user_bid(tender.id, f.bidders[0])).await;
    assert_matches!(result, Err(CoreError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_create_on_missing_tender() {
    let f = fixture(1).await;
    let result = f.services.bids.create(user_bid(777, f.bidders[0])).await;
    assert_matches!(result, Err(CoreError::NotFound { entity: "Tender", id: 777 }));
}

#[tokio::test]
async fn test_responsible_cannot_bid_on_own_org_tender() {
    let f = fixture(2).await;
    let tender = f.published_tender().await;
    let result = f
        .services
        .bids
        .create(user_bid(tender.id, f.responsibles[1]))
        .await;
    assert_matches!(result, Err(CoreError::Conflict(_)));
}

#[tokio::test]
async fn test_organization_bids() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;

    let own = CreateBid {
        name: "Self dealing".to_string(),
        description: String::new(),
        tender_id: tender.id,
        author_type: AuthorType::Organization,
        author_id: f.org,
    };
    assert_matches!(f.services.bids.create(own).await, Err(CoreError::Conflict(_)));

    let missing = CreateBid {
        name: "Ghost org".to_string(),
        description: String::new(),
        tender_id: tender.id,
        author_type: AuthorType::Organization,
        author_id: 4_242,
    };
    assert_matches!(
        f.services.bids.create(missing).await,
        Err(CoreError::NotFound { entity: "Organization", .. })
    );

    let rival = CreateBid {
        name: "Rival offer".to_string(),
        description: "Cheaper".to_string(),
        tender_id: tender.id,
        author_type: AuthorType::Organization,
        author_id: f.rival_org,
    };
    let bid = f.services.bids.create(rival).await.unwrap();
    assert_eq!(bid.author_type, AuthorType::Organization);

    // Any responsible member of the authoring organization acts for it.
    let status = f.services.bids.status(bid.id, "rival").await.unwrap();
    assert_eq!(status, BidStatus::Created);
    let result = f.services.bids.status(bid.id, "bidder1").await;
    assert_matches!(result, Err(CoreError::Forbidden(_)));
}

#[tokio::test]
async fn test_create_with_unknown_author() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    let result = f.services.bids.create(user_bid(tender.id, 31_337)).await;
    assert_matches!(result, Err(CoreError::NotFound { entity: "Employee", .. }));
}

// ---------------------------------------------------------------------------
// Edit, cancel, rollback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_edit_by_author() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    let bid = f.bid_from(tender.id, 0).await;

    let patch = BidPatch {
        name: Some("Better offer".to_string()),
        description: None,
    };
    let edited = f.services.bids.edit(bid.id, "bidder1", patch).await.unwrap();
    assert_eq!(edited.name, "Better offer");
    assert_eq!(edited.description, "We can do it");
    assert_eq!(edited.version, 2);
}

#[tokio::test]
async fn test_edit_by_other_user_is_forbidden() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    let bid = f.bid_from(tender.id, 0).await;

    let patch = BidPatch {
        name: Some("Hijacked".to_string()),
        description: None,
    };
    let result = f.services.bids.edit(bid.id, "bidder2", patch).await;
    assert_matches!(result, Err(CoreError::Forbidden(_)));
    assert_eq!(f.bid(tender.id, bid.id).await.version, 1);
}

#[tokio::test]
async fn test_manual_cancel_then_everything_is_refused() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    let bid = f.bid_from(tender.id, 0).await;

    let canceled = f
        .services
        .bids
        .set_status(bid.id, "bidder1", "CANCELED")
        .await
        .unwrap();
    assert_eq!(canceled.status, BidStatus::Canceled);
    assert_eq!(canceled.version, 2);

    let patch = BidPatch {
        name: Some("Too late".to_string()),
        description: None,
    };
    assert_matches!(
        f.services.bids.edit(bid.id, "bidder1", patch).await,
        Err(CoreError::InvalidTransition(_))
    );
    assert_matches!(
        f.services.bids.rollback(bid.id, 1, "bidder1").await,
        Err(CoreError::InvalidTransition(_))
    );
    assert_matches!(
        f.services.bids.set_status(bid.id, "bidder1", "CANCELED").await,
        Err(CoreError::InvalidTransition(_))
    );
    assert_eq!(f.bid(tender.id, bid.id).await.version, 2);
}

#[tokio::test]
async fn test_only_canceled_can_be_set_manually() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    let bid = f.bid_from(tender.id, 0).await;

    for requested in ["PUBLISHED", "CREATED", "APPROVED", "canceled"] {
        let result = f.services.bids.set_status(bid.id, "bidder1", requested).await;
        assert_matches!(result, Err(CoreError::Validation(_)), "{requested}");
    }
    assert_eq!(f.bid(tender.id, bid.id).await.status, BidStatus::Created);
}

#[tokio::test]
async fn test_rollback_round_trip() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    let bid = f.bid_from(tender.id, 0).await;

    let patch = BidPatch {
        name: Some("Second draft".to_string()),
        description: Some("Revised".to_string()),
    };
    f.services.bids.edit(bid.id, "bidder1", patch).await.unwrap();

    let restored = f.services.bids.rollback(bid.id, 1, "bidder1").await.unwrap();
    assert_eq!(restored.name, bid.name);
    assert_eq!(restored.description, bid.description);
    assert_eq!(restored.version, 3);

    let versions = f.services.bids.versions(bid.id, "bidder1").await.unwrap();
    let numbers: Vec<i32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_rollback_to_missing_version() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    let bid = f.bid_from(tender.id, 0).await;
    let result = f.services.bids.rollback(bid.id, 5, "bidder1").await;
    assert_matches!(result, Err(CoreError::NotFound { entity: "BidVersion", .. }));
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_reads() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    f.bid_from(tender.id, 0).await;
    f.bid_from(tender.id, 1).await;

    let mine = f.services.bids.list_for_user("bidder1").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].author_id, f.bidders[0]);

    assert_eq!(f.bids_of(tender.id).await.len(), 2);

    let result = f.services.bids.list_for_tender(tender.id, "bidder1").await;
    assert_matches!(result, Err(CoreError::Forbidden(_)));
}

// ---------------------------------------------------------------------------
// Feedback and reviews
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_feedback_once_per_reviewer() {
    let f = fixture(2).await;
    let tender = f.published_tender().await;
    let bid = f.bid_from(tender.id, 0).await;

    let entry = f
        .services
        .bids
        .submit_feedback(bid.id, "resp1", "Solid plan")
        .await
        .unwrap();
    assert_eq!(entry.username, "resp1");
    assert_eq!(entry.bid_id, bid.id);

    let again = f.services.bids.submit_feedback(bid.id, "resp1", "Changed my mind").await;
    assert_matches!(again, Err(CoreError::Conflict(_)));

    f.services
        .bids
        .submit_feedback(bid.id, "resp2", "Too expensive")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_feedback_requires_tender_org_member() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    let bid = f.bid_from(tender.id, 0).await;

    let result = f.services.bids.submit_feedback(bid.id, "bidder1", "Great me").await;
    assert_matches!(result, Err(CoreError::Forbidden(_)));

    let result = f.services.bids.submit_feedback(bid.id, "resp1", "   ").await;
    assert_matches!(result, Err(CoreError::Validation(_)));
}

#[tokio::test]
async fn test_reviews_of_author() {
    let f = fixture(2).await;
    let tender = f.published_tender().await;
    let first = f.bid_from(tender.id, 0).await;
    let other = f.bid_from(tender.id, 1).await;

    f.services
        .bids
        .submit_feedback(first.id, "resp1", "Solid plan")
        .await
        .unwrap();
    f.services
        .bids
        .submit_feedback(first.id, "resp2", "Needs detail")
        .await
        .unwrap();
    f.services
        .bids
        .submit_feedback(other.id, "resp1", "Unrelated")
        .await
        .unwrap();

    let reviews = f
        .services
        .bids
        .reviews(tender.id, &bidder_name(0), "resp2")
        .await
        .unwrap();
    assert_eq!(reviews.len(), 2);
    assert!(reviews.iter().all(|r| r.bid_id == first.id));

    let result = f.services.bids.reviews(tender.id, &bidder_name(2), "resp1").await;
    assert_matches!(result, Err(CoreError::NotFound { .. }));

    let result = f.services.bids.reviews(tender.id, &bidder_name(0), "rival").await;
    assert_matches!(result, Err(CoreError::Forbidden(_)));
}

#[tokio::test]
async fn test_bid_survives_closed_tender_only_as_canceled() {
    let f = fixture(1).await;
    let tender = f.published_tender().await;
    let bid = f.bid_from(tender.id, 0).await;
    f.services
        .tenders
        .set_status(tender.id, "resp1", TenderAction::Close)
        .await
        .unwrap();

    assert_eq!(f.bid(tender.id, bid.id).await.status, BidStatus::Canceled);
    let result = f.services.bids.create(user_bid(tender.id, f.bidders[1])).await;
    assert_matches!(result, Err(CoreError::InvalidTransition(_)));
}
