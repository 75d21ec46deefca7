//! Tender and bid lifecycle services.
//!
//! Every public operation opens one transaction on the [`Store`], applies
//! authorization and state-machine checks, writes the change together with
//! its version snapshot, and commits. Any error before the commit rolls the
//! whole operation back.

pub mod bid;
mod cascade;
pub mod config;
pub mod gate;
pub mod memory;
pub mod quorum;
pub mod tender;
pub mod versions;

use std::sync::Arc;

use tenderhub_core::store::Store;

pub use bid::BidLifecycle;
pub use config::LifecycleConfig;
pub use memory::InMemoryStore;
pub use quorum::QuorumEngine;
pub use tender::TenderLifecycle;

/// All lifecycle services sharing one store.
pub struct Services<S> {
    pub tenders: TenderLifecycle<S>,
    pub bids: BidLifecycle<S>,
    pub decisions: QuorumEngine<S>,
}

impl<S> Clone for Services<S> {
    fn clone(&self) -> Self {
        Self {
            tenders: self.tenders.clone(),
            bids: self.bids.clone(),
            decisions: self.decisions.clone(),
        }
    }
}

impl<S: Store> Services<S> {
    pub fn new(store: Arc<S>, config: LifecycleConfig) -> Self {
        Self {
            tenders: TenderLifecycle::new(Arc::clone(&store), config),
            bids: BidLifecycle::new(Arc::clone(&store)),
            decisions: QuorumEngine::new(store),
        }
    }
}
