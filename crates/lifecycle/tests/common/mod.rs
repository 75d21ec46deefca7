#![allow(dead_code)]

use std::sync::Arc;

use tenderhub_core::bid::{AuthorType, Bid, CreateBid};
use tenderhub_core::tender::{CreateTender, Tender, TenderAction};
use tenderhub_core::types::DbId;
use tenderhub_lifecycle::{InMemoryStore, LifecycleConfig, Services};

/// Seeded store plus services.
///
/// - `org` has responsible members `resp1..respN`.
/// - `rival_org` has a single responsible member `rival`.
/// - `bidder1..bidder3` belong to no organization.
pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub services: Services<InMemoryStore>,
    pub org: DbId,
    pub rival_org: DbId,
    pub responsibles: Vec<DbId>,
    pub rival: DbId,
    pub bidders: Vec<DbId>,
}

pub async fn fixture(responsible_count: usize) -> Fixture {
    fixture_with_config(responsible_count, LifecycleConfig::default()).await
}

pub async fn fixture_with_config(responsible_count: usize, config: LifecycleConfig) -> Fixture {
    let store = Arc::new(InMemoryStore::new());

    let org = store.add_organization("Acme LLC").await;
    let mut responsibles = Vec::new();
    for i in 1..=responsible_count {
        let id = store.add_employee(&format!("resp{i}")).await;
        store.add_responsible(org, id).await;
        responsibles.push(id);
    }

    let rival_org = store.add_organization("Rival JSC").await;
    let rival = store.add_employee("rival").await;
    store.add_responsible(rival_org, rival).await;

    let mut bidders = Vec::new();
    for i in 1..=3 {
        bidders.push(store.add_employee(&format!("bidder{i}")).await);
    }

    let services = Services::new(Arc::clone(&store), config);
    Fixture {
        store,
        services,
        org,
        rival_org,
        responsibles,
        rival,
        bidders,
    }
}

pub fn new_tender(org: DbId, creator: &str) -> CreateTender {
    CreateTender {
        name: "Road repair".to_string(),
        description: "Resurface the main street".to_string(),
        service_type: "Construction".to_string(),
        organization_id: org,
        creator_username: creator.to_string(),
    }
}

pub fn user_bid(tender_id: DbId, author_id: DbId) -> CreateBid {
    CreateBid {
        name: format!("Offer from {author_id}"),
        description: "We can do it".to_string(),
        tender_id,
        author_type: AuthorType::User,
        author_id,
    }
}

impl Fixture {
    /// Create and publish a tender owned by `org`, created by `resp1`.
    pub async fn published_tender(&self) -> Tender {
        let tender = self
            .services
            .tenders
            .create(new_tender(self.org, "resp1"))
            .await
            .unwrap();
        self.services
            .tenders
            .set_status(tender.id, "resp1", TenderAction::Publish)
            .await
            .unwrap()
    }

    /// Submit a user bid from `bidders[index]`.
    pub async fn bid_from(&self, tender_id: DbId, index: usize) -> Bid {
        self.services
            .bids
            .create(user_bid(tender_id, self.bidders[index]))
            .await
            .unwrap()
    }

    /// Current state of every bid of a tender, read as `resp1`.
    pub async fn bids_of(&self, tender_id: DbId) -> Vec<Bid> {
        self.services
            .bids
            .list_for_tender(tender_id, "resp1")
            .await
            .unwrap()
    }

    /// Current state of one bid, read as `resp1`.
    pub async fn bid(&self, tender_id: DbId, bid_id: DbId) -> Bid {
        self.bids_of(tender_id)
            .await
            .into_iter()
            .find(|b| b.id == bid_id)
            .unwrap()
    }

    pub async fn tender(&self, tender_id: DbId) -> Tender {
        self.services
            .tenders
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|t| t.id == tender_id)
            .unwrap()
    }
}

pub fn bidder_name(index: usize) -> String {
    format!("bidder{}", index + 1)
}
