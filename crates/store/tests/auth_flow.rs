//! Sign-in, registration, restore and sign-out against a mocked backend.

mod common;

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use propconnect_client::{
    AgentRegistration, ApprovalStatus, Frequency, LoginRequest, PrincipalKind, SeekerRegistration,
};
use propconnect_store::{
    MemoryStorage, NotificationPreferences, PersistedState, Principal, Registration,
    RegistrationOutcome, Severity, StateStorage, StoreError, UserType,
};

use common::*;

fn agent_credentials() -> LoginRequest {
    LoginRequest {
        email: "agent@example.com".to_string(),
        password: "Secret123".to_string(),
    }
}

fn persisted(storage: &MemoryStorage) -> PersistedState {
    let blob = storage.snapshot().expect("state was persisted");
    PersistedState::from_json(&blob).expect("persisted state is valid")
}

#[tokio::test]
async fn seeker_login_installs_session_and_loads_account_data() {
    let server = MockServer::start_async().await;
    mock_seeker_login(&server, &["prop_1", "prop_2"]).await;
    let (store, storage) = store_for(&server);

    sign_in_seeker(&store).await;

    let auth = store.auth();
    assert!(auth.is_authenticated());
    assert!(!auth.is_agent_authenticated());
    assert!(!auth.is_loading);
    assert!(auth.error_message.is_none());
    assert_eq!(auth.token(), Some(SEEKER_TOKEN));
    assert_eq!(auth.current_user().map(|user| user.id.as_str()), Some("usr_1"));
    assert_eq!(store.favorites(), vec!["prop_1".to_string(), "prop_2".to_string()]);
    match store.preferences() {
        Some(NotificationPreferences::User(preferences)) => {
            assert_eq!(preferences.frequency, Frequency::Daily)
        }
        other => panic!("unexpected preferences {other:?}"),
    }

    let saved = persisted(&storage);
    assert_eq!(saved.user_type, UserType::User);
    assert_eq!(saved.principal.token(), Some(SEEKER_TOKEN));
    assert_eq!(saved.favorites.len(), 2);
}

#[tokio::test]
async fn failed_login_records_message_and_stays_signed_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401).json_body(json!({ "error": "Invalid credentials" }));
        })
        .await;
    let (store, _) = store_for(&server);

    let result = store
        .login(
            PrincipalKind::User,
            &LoginRequest {
                email: "buyer@example.com".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(StoreError::Api(_))));
    let auth = store.auth();
    assert!(!auth.is_authenticated());
    assert!(!auth.is_loading);
    assert_eq!(auth.error_message.as_deref(), Some("Invalid credentials"));

    store.clear_error();
    assert!(store.auth().error_message.is_none());
}

#[tokio::test]
async fn blank_credentials_never_reach_the_backend() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200);
        })
        .await;
    let (store, _) = store_for(&server);

    let result = store
        .login(
            PrincipalKind::User,
            &LoginRequest {
                email: "   ".to_string(),
                password: String::new(),
            },
        )
        .await;

    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert_eq!(login.hits_async().await, 0);
    assert_eq!(
        store.auth().error_message.as_deref(),
        Some("Email and password are required")
    );
}

#[tokio::test]
async fn unapproved_agent_is_refused_and_nothing_is_persisted() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/agent/login");
            then.status(200)
                .json_body(json!({ "token": AGENT_TOKEN, "agent": agent_json("pending") }));
        })
        .await;
    let (store, storage) = store_for(&server);

    let result = store.login(PrincipalKind::Agent, &agent_credentials()).await;

    assert!(matches!(
        result,
        Err(StoreError::AgentNotApproved(ApprovalStatus::Pending))
    ));
    let auth = store.auth();
    assert!(!auth.is_agent_authenticated());
    assert!(auth.token().is_none());
    assert!(auth
        .error_message
        .as_deref()
        .is_some_and(|message| message.contains("pending approval")));
    assert!(persisted(&storage).principal.token().is_none());
}

#[tokio::test]
async fn approved_agent_login_loads_preferences_and_dashboard() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/agent/login");
            then.status(200)
                .json_body(json!({ "token": AGENT_TOKEN, "agent": agent_json("approved") }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/agents/notification-preferences");
            then.status(200)
                .json_body(json!({ "preferences": { "email_weekly_summary": false } }));
        })
        .await;
    let stats = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/agents/dashboard/stats")
                .header("authorization", format!("Bearer {AGENT_TOKEN}"));
            then.status(200).json_body(json!({
                "stats": { "unread_inquiry_count": 3, "total_active_listings": 12 }
            }));
        })
        .await;
    let (store, _) = store_for(&server);

    let principal = store
        .login(PrincipalKind::Agent, &agent_credentials())
        .await
        .expect("approved agent signs in");

    stats.assert_async().await;
    assert!(matches!(principal, Principal::Agent { .. }));
    assert!(store.auth().is_agent_authenticated());
    assert_eq!(store.dashboard().unread_inquiry_count, 3);
    assert_eq!(store.dashboard().total_active_listings, 12);
    match store.preferences() {
        Some(NotificationPreferences::Agent(preferences)) => {
            assert!(!preferences.email_weekly_summary)
        }
        other => panic!("unexpected preferences {other:?}"),
    }
}

#[tokio::test]
async fn secondary_load_failures_do_not_undo_sign_in() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200)
                .json_body(json!({ "token": SEEKER_TOKEN, "user": seeker_json() }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/favorites");
            then.status(500).json_body(json!({ "error": "database unavailable" }));
        })
        .await;
    let (store, _) = store_for(&server);

    sign_in_seeker(&store).await;

    let auth = store.auth();
    assert!(auth.is_authenticated());
    assert!(auth.error_message.is_none());
    assert!(store.favorites().is_empty());
}

#[tokio::test]
async fn agent_registration_stays_signed_out_with_pending_notice() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/agent/register");
            then.status(201).json_body(json!({
                "message": "Registration received. Pending approval.",
                "agent": agent_json("pending")
            }));
        })
        .await;
    let (store, _) = store_for(&server);

    let outcome = store
        .register(&Registration::Agent(AgentRegistration {
            email: "new.agent@example.com".to_string(),
            password: "Secret123".to_string(),
            first_name: "Nia".to_string(),
            last_name: "Newcomer".to_string(),
            phone: None,
            license_number: "TX-200".to_string(),
            brokerage: "Lone Star Realty".to_string(),
            years_experience: Some(2),
        }))
        .await
        .expect("registration accepted");

    assert_eq!(
        outcome,
        RegistrationOutcome::PendingApproval {
            message: "Registration received. Pending approval.".to_string()
        }
    );
    let auth = store.auth();
    assert!(!auth.is_authenticated());
    assert!(!auth.is_loading);
    let toasts = store.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].severity, Severity::Success);
}

#[tokio::test]
async fn seeker_registration_signs_in() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/register");
            then.status(201)
                .json_body(json!({ "token": SEEKER_TOKEN, "user": seeker_json() }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/favorites");
            then.status(200).json_body(favorites_json(&[]));
        })
        .await;
    let (store, _) = store_for(&server);

    let outcome = store
        .register(&Registration::Seeker(SeekerRegistration {
            email: "buyer@example.com".to_string(),
            password: "Secret123".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Seeker".to_string(),
            phone: None,
        }))
        .await
        .expect("registration succeeds");

    assert!(matches!(
        outcome,
        RegistrationOutcome::SignedIn(Principal::PropertySeeker { .. })
    ));
    assert_eq!(store.auth().user_type(), UserType::User);
    assert!(store
        .toasts()
        .iter()
        .any(|toast| toast.message.starts_with("Welcome to PropConnect")));
}

#[tokio::test]
async fn restore_session_revalidates_persisted_token() {
    let server = MockServer::start_async().await;
    mock_seeker_login(&server, &["prop_1"]).await;
    let me = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/users/me")
                .header("authorization", format!("Bearer {SEEKER_TOKEN}"));
            then.status(200).json_body(json!({ "user": seeker_json() }));
        })
        .await;

    let seed = {
        let (store, storage) = store_for(&server);
        sign_in_seeker(&store).await;
        storage.snapshot().expect("session persisted")
    };

    let (store, _) = store_with_storage(&server, Arc::new(MemoryStorage::with_blob(seed)));
    assert_eq!(store.auth().token(), Some(SEEKER_TOKEN));
    assert_eq!(store.favorites(), vec!["prop_1".to_string()]);
    assert!(!store.auth().is_loading);

    let principal = store.restore_session().await;

    me.assert_async().await;
    assert!(matches!(principal, Principal::PropertySeeker { .. }));
    assert!(store.auth().is_authenticated());
    assert!(!store.auth().is_loading);
}

#[tokio::test]
async fn rejected_token_on_restore_falls_back_to_guest() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/agents/me");
            then.status(401).json_body(json!({ "error": "Token expired" }));
        })
        .await;

    let mut state = propconnect_store::StoreState::default();
    state.auth.principal = Principal::Agent {
        agent: serde_json::from_value(agent_json("approved")).expect("agent fixture"),
        token: AGENT_TOKEN.to_string(),
    };
    let blob = PersistedState::capture(&state).to_json().expect("serialises");
    let storage = Arc::new(MemoryStorage::with_blob(blob));
    let (store, storage) = store_with_storage(&server, storage);

    let principal = store.restore_session().await;

    assert_eq!(principal, Principal::Guest);
    let auth = store.auth();
    assert!(!auth.is_authenticated());
    assert!(!auth.is_loading);
    assert!(auth.error_message.is_none());
    assert_eq!(persisted(&storage).user_type, UserType::Guest);
}

#[tokio::test]
async fn restore_without_stored_session_makes_no_calls() {
    let server = MockServer::start_async().await;
    let me = server
        .mock_async(|when, then| {
            when.path_contains("/me");
            then.status(200);
        })
        .await;
    let (store, _) = store_for(&server);

    assert_eq!(store.restore_session().await, Principal::Guest);
    assert_eq!(me.hits_async().await, 0);
}

#[tokio::test]
async fn logout_clears_local_state_even_if_backend_is_down() {
    let server = MockServer::start_async().await;
    mock_seeker_login(&server, &["prop_1"]).await;
    let (store, storage) = store_for(&server);
    sign_in_seeker(&store).await;
    assert_eq!(store.favorites().len(), 1);

    store.logout();

    let state = store.state();
    assert!(!state.auth.is_authenticated());
    assert!(state.favorites.is_empty());
    assert!(state.preferences.is_none());
    assert_eq!(persisted(&storage).user_type, UserType::Guest);
    assert!(storage.load().expect("memory load").is_some());
}

#[tokio::test]
async fn unauthorized_profile_refresh_signs_out() {
    let server = MockServer::start_async().await;
    mock_seeker_login(&server, &[]).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/me");
            then.status(401).json_body(json!({ "message": "Session revoked" }));
        })
        .await;
    let (store, _) = store_for(&server);
    sign_in_seeker(&store).await;

    let result = store.refresh_profile().await;

    assert!(matches!(result, Err(StoreError::Api(_))));
    assert!(!store.auth().is_authenticated());
}

#[tokio::test]
async fn logout_notifies_backend_with_the_session_token() {
    let server = MockServer::start_async().await;
    mock_seeker_login(&server, &[]).await;
    let backend_logout = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/auth/logout")
                .header("authorization", format!("Bearer {SEEKER_TOKEN}"));
            then.status(204);
        })
        .await;
    let (store, _) = store_for(&server);
    sign_in_seeker(&store).await;

    let notify = store.logout().expect("signed-in logout contacts the backend");
    assert!(!store.auth().is_authenticated());
    notify.await.expect("logout task completes");

    backend_logout.assert_async().await;
    assert!(store.logout().is_none());
}

#[tokio::test]
async fn revoked_token_is_signed_out_whatever_the_message_says() {
    let server = MockServer::start_async().await;
    mock_seeker_login(&server, &[]).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/me");
            then.status(401)
                .json_body(json!({ "error": "Token revoked: account suspended" }));
        })
        .await;
    let (store, storage) = store_for(&server);
    sign_in_seeker(&store).await;

    let result = store.refresh_profile().await;

    match result {
        Err(StoreError::Api(error)) => assert!(error.is_unauthorized()),
        other => panic!("unexpected refresh outcome {other:?}"),
    }
    assert!(!store.auth().is_authenticated());
    assert_eq!(persisted(&storage).user_type, UserType::Guest);
}

#[tokio::test]
async fn admin_login_is_the_only_active_principal() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/admin/login");
            then.status(200).json_body(json!({
                "token": "admin-token",
                "admin": { "id": "adm_1", "email": "admin@example.com", "name": "Ada Admin" }
            }));
        })
        .await;
    let (store, storage) = store_for(&server);

    let principal = store
        .login(
            PrincipalKind::Admin,
            &LoginRequest {
                email: "admin@example.com".to_string(),
                password: "Secret123".to_string(),
            },
        )
        .await
        .expect("admin signs in");

    assert!(matches!(principal, Principal::Admin { .. }));
    let auth = store.auth();
    assert!(auth.is_admin_authenticated());
    assert!(!auth.is_agent_authenticated());
    assert!(auth.current_user().is_none());
    assert!(auth.current_agent().is_none());
    assert_eq!(auth.current_admin().map(|admin| admin.id.as_str()), Some("adm_1"));
    assert_eq!(auth.user_type(), UserType::Admin);
    assert!(store.favorites().is_empty());
    assert!(store.preferences().is_none());
    assert_eq!(persisted(&storage).user_type, UserType::Admin);
}

#[tokio::test]
async fn switching_from_seeker_to_agent_drops_seeker_data() {
    let server = MockServer::start_async().await;
    mock_seeker_login(&server, &["prop_1", "prop_2"]).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/agent/login");
            then.status(200)
                .json_body(json!({ "token": AGENT_TOKEN, "agent": agent_json("approved") }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/agents/notification-preferences");
            then.status(200).json_body(json!({ "preferences": {} }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/agents/dashboard/stats");
            then.status(200)
                .json_body(json!({ "stats": { "unread_inquiry_count": 1 } }));
        })
        .await;
    let (store, storage) = store_for(&server);
    sign_in_seeker(&store).await;
    assert_eq!(store.favorites().len(), 2);

    store
        .login(PrincipalKind::Agent, &agent_credentials())
        .await
        .expect("agent signs in");

    let auth = store.auth();
    assert!(auth.current_user().is_none());
    assert!(auth.current_agent().is_some());
    assert_eq!(auth.token(), Some(AGENT_TOKEN));
    assert!(store.favorites().is_empty());
    assert!(matches!(
        store.preferences(),
        Some(NotificationPreferences::Agent(_))
    ));
    let saved = persisted(&storage);
    assert_eq!(saved.user_type, UserType::Agent);
    assert!(saved.favorites.is_empty());
}
