#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tenderhub_api::config::ServerConfig;
use tenderhub_api::router::build_app_router;
use tenderhub_api::state::AppState;
use tenderhub_core::types::DbId;
use tenderhub_lifecycle::{InMemoryStore, LifecycleConfig};

/// Build a test `ServerConfig` with safe defaults.
///
/// The database URL is never dialled: tests run against the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
    }
}

/// Seeded application.
///
/// - `org` has responsible members `resp1`, `resp2`, `resp3`.
/// - `rival_org` has a single responsible member `rival`.
/// - `alice` and `bob` belong to no organization.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub org: DbId,
    pub rival_org: DbId,
    pub alice: DbId,
    pub bob: DbId,
}

/// Build the full application router over a freshly seeded in-memory store.
///
/// Uses the same `build_app_router` as `main.rs`, so tests exercise the
/// production middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery).
pub async fn build_test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());

    let org = store.add_organization("Acme LLC").await;
    for name in ["resp1", "resp2", "resp3"] {
        let id = store.add_employee(name).await;
        store.add_responsible(org, id).await;
    }

    let rival_org = store.add_organization("Rival JSC").await;
    let rival = store.add_employee("rival").await;
    store.add_responsible(rival_org, rival).await;

    let alice = store.add_employee("alice").await;
    let bob = store.add_employee("bob").await;

    let state = AppState::new(Arc::clone(&store), test_config(), LifecycleConfig::default());
    TestApp {
        router: build_app_router(state),
        store,
        org,
        rival_org,
        alice,
        bob,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response {
        get(self.router.clone(), uri).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        send_json(self.router.clone(), Method::POST, uri, body).await
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> Response {
        send_json(self.router.clone(), Method::PATCH, uri, body).await
    }

    pub async fn put(&self, uri: &str) -> Response {
        send(self.router.clone(), Method::PUT, uri).await
    }

    /// Create a tender for `org` as `resp1` and return its ID.
    pub async fn create_tender(&self) -> DbId {
        let response = self
            .post_json(
                "/api/tenders/new",
                serde_json::json!({
                    "name": "Road repair",
                    "description": "Resurface the main street",
                    "service_type": "Construction",
                    "organization_id": self.org,
                    "creator_username": "resp1",
                }),
            )
            .await;
        let json = body_json(response).await;
        json["data"]["id"].as_i64().unwrap()
    }

    /// Create and publish a tender, returning its ID.
    pub async fn published_tender(&self) -> DbId {
        let id = self.create_tender().await;
        let response = self
            .put(&format!("/api/tenders/{id}/status?username=resp1&status=publish"))
            .await;
        assert!(response.status().is_success());
        id
    }

    /// Submit a user bid and return its ID.
    pub async fn create_bid(&self, tender_id: DbId, author_id: DbId) -> DbId {
        let response = self
            .post_json(
                "/api/bids/new",
                serde_json::json!({
                    "name": "Fast and cheap",
                    "description": "Two weeks",
                    "tender_id": tender_id,
                    "author_type": "USER",
                    "author_id": author_id,
                }),
            )
            .await;
        let json = body_json(response).await;
        json["data"]["id"].as_i64().unwrap()
    }
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri).await
}

/// Send a bodyless request with the given method.
pub async fn send(app: Router, method: Method, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a JSON body with the given method.
pub async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
