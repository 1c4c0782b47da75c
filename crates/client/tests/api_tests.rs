//! Integration tests for the HTTP adapter against a mocked backend.

use httpmock::prelude::*;
use serde_json::json;

use propconnect_client::{
    AgentRegistration, ApiClient, ApiError, ApprovalStatus, ErrorKind, Frequency, Identity,
    InquiryStatus, LoginRequest, NewInquiry, PrincipalKind, PropertyQuery, PropertyType,
    SeekerRegistration, UserNotificationPreferences, DEFAULT_ERROR_MESSAGE,
};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_client(reqwest::Client::new(), &server.base_url()).expect("mock url is valid")
}

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "agent@example.com".to_string(),
        password: "Secret123".to_string(),
    }
}

fn property_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Modern Craftsman Home",
        "description": "Open floor plan",
        "price": 685000.0,
        "property_type": "house",
        "listing_type": "sale",
        "status": "active",
        "bedrooms": 4,
        "bathrooms": 3.0,
        "square_feet": 2450,
        "address": "1247 Oak Valley Dr",
        "city": "Austin",
        "state": "TX",
        "zip_code": "78704",
        "photos": [
            { "id": "ph_1", "url": "https://cdn.example/1.jpg", "is_primary": false, "display_order": 0 },
            { "id": "ph_2", "url": "https://cdn.example/2.jpg", "is_primary": true, "display_order": 1 }
        ]
    })
}

#[tokio::test]
async fn login_posts_to_kind_specific_endpoint_and_unwraps_identity() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/auth/agent/login")
                .header("content-type", "application/json")
                .json_body(json!({ "email": "agent@example.com", "password": "Secret123" }));
            then.status(200).json_body(json!({
                "token": "agent-token",
                "agent": {
                    "id": "agt_7",
                    "email": "agent@example.com",
                    "first_name": "Ada",
                    "last_name": "Agent",
                    "approval_status": "approved"
                }
            }));
        })
        .await;

    let response = client_for(&server)
        .login(PrincipalKind::Agent, &credentials())
        .await
        .expect("login should succeed");

    mock.assert_async().await;
    assert_eq!(response.token.as_deref(), Some("agent-token"));
    match response.identity {
        Identity::Agent(agent) => {
            assert_eq!(agent.id, "agt_7");
            assert_eq!(agent.approval_status, ApprovalStatus::Approved);
        }
        other => panic!("unexpected identity {other:?}"),
    }
}

#[tokio::test]
async fn login_failure_surfaces_backend_message_and_kind() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401).json_body(json!({ "error": "Invalid email or password" }));
        })
        .await;

    let error = client_for(&server)
        .login(PrincipalKind::User, &credentials())
        .await
        .expect_err("login should fail");

    assert_eq!(error.kind(), ErrorKind::Unauthorized);
    assert_eq!(error.user_message(), "Invalid email or password");
    assert!(error.is_unauthorized());
}

#[tokio::test]
async fn suspended_agent_rejection_is_classified_at_the_boundary() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/agent/login");
            then.status(403).json_body(json!({ "message": "Your account has been suspended" }));
        })
        .await;

    let error = client_for(&server)
        .login(PrincipalKind::Agent, &credentials())
        .await
        .expect_err("suspended agent should fail");

    assert_eq!(error.kind(), ErrorKind::Suspended);
}

#[tokio::test]
async fn login_response_without_matching_record_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/admin/login");
            then.status(200).json_body(json!({
                "token": "t",
                "user": { "id": "u1", "email": "a@b.co", "first_name": "A", "last_name": "B" }
            }));
        })
        .await;

    let error = client_for(&server)
        .login(PrincipalKind::Admin, &credentials())
        .await
        .expect_err("admin record missing");

    assert!(matches!(error, ApiError::Decode(_)));
}

#[tokio::test]
async fn register_user_requires_a_token() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/register");
            then.status(201).json_body(json!({
                "user": { "id": "u1", "email": "new@example.com", "first_name": "New", "last_name": "Buyer" }
            }));
        })
        .await;

    let registration = SeekerRegistration {
        email: "new@example.com".to_string(),
        password: "Secret123".to_string(),
        first_name: "New".to_string(),
        last_name: "Buyer".to_string(),
        phone: None,
    };
    let error = client_for(&server)
        .register_user(&registration)
        .await
        .expect_err("token missing");

    assert!(matches!(error, ApiError::Decode(_)));
}

#[tokio::test]
async fn register_agent_returns_pending_record_without_token() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/auth/agent/register")
                .json_body_partial(r#"{ "license_number": "TX-12345", "brokerage": "Hill Realty" }"#);
            then.status(201).json_body(json!({
                "message": "Registration received",
                "agent": {
                    "id": "agt_9", "email": "new.agent@example.com",
                    "first_name": "Nia", "last_name": "Agent",
                    "approval_status": "pending"
                }
            }));
        })
        .await;

    let registration = AgentRegistration {
        email: "new.agent@example.com".to_string(),
        password: "Secret123".to_string(),
        first_name: "Nia".to_string(),
        last_name: "Agent".to_string(),
        phone: None,
        license_number: "TX-12345".to_string(),
        brokerage: "Hill Realty".to_string(),
        years_experience: Some(4),
    };
    let response = client_for(&server)
        .register_agent(&registration)
        .await
        .expect("agent registration accepted");

    assert_eq!(response.message.as_deref(), Some("Registration received"));
    assert_eq!(
        response.agent.map(|agent| agent.approval_status),
        Some(ApprovalStatus::Pending)
    );
}

#[tokio::test]
async fn me_sends_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/users/me")
                .header("authorization", "Bearer seeker-token");
            then.status(200).json_body(json!({
                "user": { "id": "u1", "email": "buyer@example.com", "first_name": "Bo", "last_name": "Buyer" }
            }));
        })
        .await;

    let identity = client_for(&server)
        .me(PrincipalKind::User, "seeker-token")
        .await
        .expect("token valid");

    mock.assert_async().await;
    assert_eq!(identity.kind(), PrincipalKind::User);
    assert_eq!(identity.display_name(), "Bo Buyer");
}

#[tokio::test]
async fn favorites_mutations_return_authoritative_list() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/favorites")
                .json_body(json!({ "property_id": "prop_001" }));
            then.status(201).json_body(json!({
                "favorites": [ { "property_id": "prop_000" }, { "property_id": "prop_001" } ]
            }));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/favorites/prop_000");
            then.status(200).json_body(json!({ "favorites": [ { "property_id": "prop_001" } ] }));
        })
        .await;

    let client = client_for(&server);
    let after_add = client.add_favorite("tok", "prop_001").await.unwrap();
    assert_eq!(after_add.len(), 2);

    let after_remove = client.remove_favorite("tok", "prop_000").await.unwrap();
    delete.assert_async().await;
    assert_eq!(after_remove[0].property_id, "prop_001");
}

#[tokio::test]
async fn preferences_round_trip_through_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/users/notification-preferences")
                .json_body_partial(r#"{ "frequency": "weekly" }"#);
            then.status(200).json_body(json!({
                "preferences": { "email_new_listings": false, "frequency": "weekly" }
            }));
        })
        .await;

    let preferences = UserNotificationPreferences {
        email_new_listings: false,
        frequency: Frequency::Weekly,
        ..UserNotificationPreferences::default()
    };
    let stored = client_for(&server)
        .update_user_notification_preferences("tok", &preferences)
        .await
        .unwrap();

    assert_eq!(stored.frequency, Frequency::Weekly);
    assert!(!stored.email_new_listings);
    assert!(stored.email_price_changes, "missing fields fall back to defaults");
}

#[tokio::test]
async fn search_serialises_only_present_filters() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/properties")
                .query_param("city", "Austin")
                .query_param("property_type", "house");
            then.status(200).json_body(json!({
                "properties": [property_json("prop_001")],
                "total": 1,
                "page": 1,
                "total_pages": 1
            }));
        })
        .await;

    let query = PropertyQuery {
        city: Some("Austin".to_string()),
        property_type: Some(PropertyType::House),
        ..PropertyQuery::default()
    };
    let page = client_for(&server).search_properties(&query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.total, 1);
    assert_eq!(page.properties[0].primary_photo().map(|p| p.id.as_str()), Some("ph_2"));
}

#[tokio::test]
async fn anonymous_inquiry_is_accepted_without_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/inquiries")
                .json_body_partial(r#"{ "property_id": "prop_001", "name": "Guest" }"#);
            then.status(201).json_body(json!({
                "inquiry": {
                    "id": "inq_1", "property_id": "prop_001", "name": "Guest",
                    "email": "guest@example.com", "message": "Is this still available?",
                    "status": "new"
                }
            }));
        })
        .await;

    let inquiry = NewInquiry {
        property_id: "prop_001".to_string(),
        name: "Guest".to_string(),
        email: "guest@example.com".to_string(),
        phone: None,
        message: "Is this still available?".to_string(),
        preferred_contact: None,
    };
    let created = client_for(&server).create_inquiry(None, &inquiry).await.unwrap();

    mock.assert_async().await;
    assert_eq!(created.status, InquiryStatus::New);
    assert!(created.is_unread());
}

#[tokio::test]
async fn agent_inbox_filters_by_status() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/inquiries/agent")
                .query_param("status", "new");
            then.status(200).json_body(json!({ "inquiries": [] }));
        })
        .await;

    let inquiries = client_for(&server)
        .agent_inquiries("agent-token", Some(InquiryStatus::New))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(inquiries.is_empty());
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_generic_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/featured-listings");
            then.status(500).body("Internal Server Error");
        })
        .await;

    let error = client_for(&server)
        .featured_listings("admin-token")
        .await
        .expect_err("server error");

    assert_eq!(error.kind(), ErrorKind::Server);
    assert_eq!(error.user_message(), DEFAULT_ERROR_MESSAGE);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let client = ApiClient::with_client(reqwest::Client::new(), "http://127.0.0.1:9")
        .expect("valid url");

    let error = client
        .record_property_view("prop_001")
        .await
        .expect_err("nothing listens on the discard port");

    assert_eq!(error.kind(), ErrorKind::Network);
}
