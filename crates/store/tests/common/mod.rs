#![allow(dead_code)]

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use propconnect_client::ApiClient;
use propconnect_store::{MemoryStorage, Store, StoreSettings};

pub const SEEKER_TOKEN: &str = "seeker-token";
pub const AGENT_TOKEN: &str = "agent-token";

pub fn client_for(base_url: &str) -> ApiClient {
    ApiClient::with_client(reqwest::Client::new(), base_url).expect("base url is valid")
}

pub fn store_for(server: &MockServer) -> (Store, Arc<MemoryStorage>) {
    store_with_storage(server, Arc::new(MemoryStorage::new()))
}

pub fn store_with_storage(server: &MockServer, storage: Arc<MemoryStorage>) -> (Store, Arc<MemoryStorage>) {
    let store = Store::new(
        client_for(&server.base_url()),
        storage.clone(),
        StoreSettings::default(),
    );
    (store, storage)
}

pub fn seeker_json() -> serde_json::Value {
    json!({
        "id": "usr_1",
        "email": "buyer@example.com",
        "first_name": "Sam",
        "last_name": "Seeker"
    })
}

pub fn agent_json(approval_status: &str) -> serde_json::Value {
    json!({
        "id": "agt_7",
        "email": "agent@example.com",
        "first_name": "Ada",
        "last_name": "Agent",
        "license_number": "TX-100",
        "approval_status": approval_status
    })
}

pub fn favorites_json(ids: &[&str]) -> serde_json::Value {
    let favorites: Vec<_> = ids.iter().map(|id| json!({ "property_id": id })).collect();
    json!({ "favorites": favorites })
}

/// Mocks for a successful seeker login and the loads that follow it.
pub async fn mock_seeker_login(server: &MockServer, favorites: &[&str]) {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200)
                .json_body(json!({ "token": SEEKER_TOKEN, "user": seeker_json() }));
        })
        .await;
    let favorites = favorites_json(favorites);
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/favorites")
                .header("authorization", format!("Bearer {SEEKER_TOKEN}"));
            then.status(200).json_body(favorites);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/notification-preferences");
            then.status(200)
                .json_body(json!({ "preferences": { "frequency": "daily" } }));
        })
        .await;
}

pub async fn sign_in_seeker(store: &Store) {
    store
        .login(
            propconnect_client::PrincipalKind::User,
            &propconnect_client::LoginRequest {
                email: "buyer@example.com".to_string(),
                password: "Secret123".to_string(),
            },
        )
        .await
        .expect("seeker login should succeed");
}
