use std::sync::Arc;

use tenderhub_core::store::Store;
use tenderhub_lifecycle::{LifecycleConfig, Services};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState<S>>`.
///
/// Generic over the storage backend: the binary uses PostgreSQL, tests use
/// the in-memory store. Cheaply cloneable.
pub struct AppState<S> {
    /// Lifecycle services bound to the store.
    pub services: Services<S>,
    /// The store itself, for health probes.
    pub store: Arc<S>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            services: self.services.clone(),
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: Store> AppState<S> {
    pub fn new(store: Arc<S>, config: ServerConfig, lifecycle: LifecycleConfig) -> Self {
        Self {
            services: Services::new(Arc::clone(&store), lifecycle),
            store,
            config: Arc::new(config),
        }
    }
}
