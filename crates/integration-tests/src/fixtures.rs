use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use api_adapters::{router, AppState, GateOptions};
use auth_adapters::{JwtIdentityVerifier, TokenIssuer};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use domains::{to_document, Clock, DocumentStore, UserProfile, USERS_COLLECTION};
use services::{AccessGate, BoardService};
use storage_adapters::MemoryDocumentStore;
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-secret";
pub const ISSUER: &str = "whiteboard-tests";

/// Clock that advances by a fixed step on every read, so consecutive
/// writes always get strictly increasing timestamps.
pub struct SteppingClock {
    next_micros: AtomicI64,
    step_micros: i64,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self {
            next_micros: AtomicI64::new(1_700_000_000_000_000),
            step_micros: 1_000,
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let micros = self.next_micros.fetch_add(self.step_micros, Ordering::SeqCst);
        DateTime::from_timestamp_micros(micros).unwrap_or_default()
    }
}

/// A board service over a fresh in-memory store.
pub fn board_service() -> (BoardService, Arc<MemoryDocumentStore>) {
    let store = Arc::new(MemoryDocumentStore::new());
    let service = BoardService::new(store.clone(), Arc::new(SteppingClock::new()));
    (service, store)
}

pub fn issuer() -> TokenIssuer {
    TokenIssuer::new(SECRET, Some(ISSUER))
}

pub fn verifier() -> Arc<JwtIdentityVerifier> {
    Arc::new(JwtIdentityVerifier::new(SECRET, Some(ISSUER)))
}

pub async fn add_profile(store: &dyn DocumentStore, subject: &str, name: &str) {
    let profile = UserProfile {
        name: name.into(),
        email: None,
    };
    store
        .set(USERS_COLLECTION, subject, to_document(&profile).unwrap())
        .await
        .unwrap();
}

/// The full router wired to an in-memory store and the JWT verifier, with
/// profile records required.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDocumentStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let gate = AccessGate::new(verifier()).with_profiles(store.clone());
        let boards = BoardService::new(store.clone(), Arc::new(SteppingClock::new()));
        let router = router(AppState::new(boards, gate, GateOptions::default()));
        Self { router, store }
    }

    /// Router over an arbitrary board store; the gate trusts tokens alone.
    pub fn with_board_store(store: Arc<dyn DocumentStore>) -> Router {
        let gate = AccessGate::new(verifier());
        let boards = BoardService::new(store, Arc::new(SteppingClock::new()));
        router(AppState::new(boards, gate, GateOptions::default()))
    }

    /// Registers a profile and returns a valid token for it.
    pub async fn sign_in(&self, subject: &str, name: &str) -> String {
        add_profile(self.store.as_ref(), subject, name).await;
        token_for(subject)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        send(&self.router, request).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

pub fn token_for(subject: &str) -> String {
    issuer()
        .issue(subject, Some(&format!("{subject}@example.com")), Duration::hours(1))
        .unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, format!("authToken={token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::COOKIE, format!("authToken={token}"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
