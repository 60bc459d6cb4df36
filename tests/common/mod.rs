#![allow(dead_code)]

use httpmock::MockServer;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use shortener_dashboard::domain::entities::CredentialPair;
use shortener_dashboard::domain::repositories::CredentialStorage;
use shortener_dashboard::infrastructure::http::ReqwestTransport;
use shortener_dashboard::infrastructure::storage::MemoryStorage;
use shortener_dashboard::state::AppState;

pub const SHORT_BASE: &str = "https://sho.rt";

pub fn transport_for(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(
        &server.base_url(),
        Duration::from_secs(5),
        Duration::from_secs(1),
    )
    .unwrap()
}

pub fn state_with_storage(server: &MockServer, storage: Arc<dyn CredentialStorage>) -> AppState {
    AppState::with_parts(Arc::new(transport_for(server)), storage, SHORT_BASE).unwrap()
}

pub fn state_with_timeout(server: &MockServer, timeout: Duration) -> AppState {
    let transport = ReqwestTransport::new(&server.base_url(), timeout, timeout).unwrap();
    AppState::with_parts(
        Arc::new(transport),
        Arc::new(MemoryStorage::new()),
        SHORT_BASE,
    )
    .unwrap()
}

pub fn anonymous_state(server: &MockServer) -> AppState {
    state_with_storage(server, Arc::new(MemoryStorage::new()))
}

pub fn logged_in_state(server: &MockServer, access: &str, refresh: &str) -> AppState {
    let state = anonymous_state(server);
    state
        .store
        .set(CredentialPair::new(access, refresh, Some(3600)))
        .unwrap();
    state
}

pub fn link_json(id: &str, slug: &str, url: &str) -> Value {
    json!({ "id": id, "slug": slug, "url": url, "user_id": "user-1" })
}

pub fn visit_json(id: &str, link_id: &str, at: &str) -> Value {
    json!({ "id": id, "shortened_url_id": link_id, "visit_time": at })
}
