//! Mock backend tests for the pokedex HTTP layer.
//!
//! These tests use wiremock to simulate the Pokédex API and exercise the
//! session's token lifecycle and request execution without network access
//! or real credentials.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use pokedex_core::error::{AuthError, Error};
use pokedex_core::tokens::{AccessToken, RefreshToken, TokenPair};
use pokedex_core::{
    ApiUrl, Credentials, MemoryTokenStore, NoticeLevel, Notifier, PokemonKey, Registration,
    TokenStore,
};
use pokedex_http::{ListPokemonsParams, Method, MultipartForm, RequestBody, Session};

// ============================================================================
// Helpers
// ============================================================================

/// Helper to create an API URL from a mock server.
fn mock_api_url(server: &MockServer) -> ApiUrl {
    // For tests, we need to allow HTTP localhost
    ApiUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

/// A JWT-shaped token whose `exp` claim is `offset_secs` from now.
fn jwt_with_exp(offset_secs: i64) -> String {
    let exp = Utc::now().timestamp() + offset_secs;
    let payload = URL_SAFE_NO_PAD.encode(format!("{{\"exp\":{}}}", exp));
    format!("header.{}.signature", payload)
}

fn token_pair(access: &str, refresh: &str) -> TokenPair {
    TokenPair::new(AccessToken::new(access), RefreshToken::new(refresh))
}

fn user_json() -> Value {
    json!({
        "id": 7,
        "uuid": "b7f3c0de-0000-4000-8000-000000000007",
        "email": "ash@example.com",
        "first_name": "Ash",
        "last_name": "Ketchum",
        "is_active": true,
        "is_staff": false,
        "is_superuser": false,
        "date_joined": "2024-01-01T00:00:00Z",
        "last_login": null
    })
}

fn pokemon_json(id: i64, name: &str, is_favorited: bool) -> Value {
    json!({
        "id": id,
        "external_id": id,
        "name": name,
        "flavor_text": "A test Pokémon.",
        "sprites": {
            "default": format!("https://img.example.com/{}.png", id),
            "shiny": format!("https://img.example.com/{}-shiny.png", id)
        },
        "abilities": ["static"],
        "height": 4,
        "weight": 60,
        "types": ["electric"],
        "cry": format!("https://cries.example.com/{}.ogg", id),
        "is_favorited": is_favorited
    })
}

/// Notifier that records every notice for assertions.
#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    fn contains(&self, level: NoticeLevel, message: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| *l == level && m == message)
    }
}

fn session_with(server: &MockServer) -> (Session, Arc<MemoryTokenStore>, Arc<RecordingNotifier>) {
    let store = Arc::new(MemoryTokenStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::new(mock_api_url(server), store.clone(), notifier.clone());
    (session, store, notifier)
}

/// Mount the obtain-token and profile endpoints for a successful login.
async fn mount_login(server: &MockServer, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/token/obtain/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": access,
            "refresh": refresh,
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(server)
        .await;
}

/// Matches multipart/form-data requests regardless of boundary.
struct MultipartContentType;

impl wiremock::Match for MultipartContentType {
    fn matches(&self, request: &Request) -> bool {
        request
            .headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"))
    }
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    let refresh = jwt_with_exp(86400);

    Mock::given(method("POST"))
        .and(path("/api/auth/token/obtain/"))
        .and(body_json(json!({
            "email": "ash@example.com",
            "password": "pikapika"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": access,
            "refresh": refresh,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .and(header("authorization", format!("Bearer {}", access)))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let (session, store, notifier) = session_with(&server);
    let user = session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    assert_eq!(user.email, "ash@example.com");
    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().id, 7);
    assert_eq!(session.access_token().unwrap().as_str(), access);

    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.access.as_str(), access);
    assert_eq!(stored.refresh.as_str(), refresh);

    assert!(notifier.contains(NoticeLevel::Success, "Logged in successfully"));
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/obtain/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let (session, store, notifier) = session_with(&server);
    let result = session
        .login(&Credentials::new("ash@example.com", "wrong"))
        .await;

    match result {
        Err(Error::Request(failure)) => {
            assert_eq!(failure.status, 401);
            assert!(!failure.retried);
        }
        other => panic!("expected request failure, got {:?}", other),
    }

    assert!(!session.is_authenticated());
    assert!(store.load().unwrap().is_none());
    assert!(notifier.contains(NoticeLevel::Error, "Invalid credentials"));
}

#[tokio::test]
async fn test_login_profile_failure_keeps_tokens() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);

    Mock::given(method("POST"))
        .and(path("/api/auth/token/obtain/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": access,
            "refresh": jwt_with_exp(86400),
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "Server error"
        })))
        .mount(&server)
        .await;

    let (session, store, notifier) = session_with(&server);
    let result = session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await;

    assert!(result.is_err());
    // The pair was obtained and kept; only the profile fetch failed.
    assert!(!session.is_authenticated());
    assert!(session.access_token().is_some());
    assert!(store.load().unwrap().is_some());
    assert!(notifier.contains(NoticeLevel::Error, "Server error"));
}

#[tokio::test]
async fn test_register_success() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);

    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .and(body_json(json!({
            "first_name": "Ash",
            "last_name": "Ketchum",
            "email": "ash@example.com",
            "password": "pikapika"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": access,
            "refresh": jwt_with_exp(86400),
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;

    let (session, _store, notifier) = session_with(&server);
    let registration = Registration::new("Ash", "Ketchum", "ash@example.com", "pikapika");
    let user = session.register(&registration).await.unwrap();

    assert_eq!(user.full_name(), "Ash Ketchum");
    assert!(session.is_authenticated());
    assert!(notifier.contains(NoticeLevel::Success, "Account created successfully"));
}

#[tokio::test]
async fn test_refresh_token_expired_logs_out() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    let expired_refresh = jwt_with_exp(-100);

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store.save(&token_pair(&access, &expired_refresh)).unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::initialize(mock_api_url(&server), store.clone(), notifier.clone()).await;
    assert!(session.is_authenticated());

    let result = session.refresh_access_token().await;

    match result {
        Err(Error::Auth(AuthError::RefreshTokenExpired)) => {}
        other => panic!("expected refresh token expired, got {:?}", other),
    }
    assert!(!session.is_authenticated());
    assert!(store.load().unwrap().is_none());
    assert!(notifier.contains(NoticeLevel::Info, "Logged out"));
}

#[tokio::test]
async fn test_refresh_without_session() {
    let server = MockServer::start().await;
    let (session, _store, notifier) = session_with(&server);

    let result = session.refresh_access_token().await;

    match result {
        Err(Error::Auth(AuthError::NoRefreshToken)) => {}
        other => panic!("expected no refresh token, got {:?}", other),
    }
    // A missing pair is not a logout.
    assert!(notifier.messages().is_empty());
}

// ============================================================================
// Request Executor Tests
// ============================================================================

#[tokio::test]
async fn test_execute_without_token() {
    let server = MockServer::start().await;
    let (session, _store, _notifier) = session_with(&server);

    let result = session
        .execute(Method::GET, "/api/pokemons/pokemons/", RequestBody::Empty)
        .await;

    match result {
        Err(Error::Auth(AuthError::NoAccessToken)) => {}
        other => panic!("expected no access token, got {:?}", other),
    }
}

#[tokio::test]
async fn test_executor_sends_common_headers() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    mount_login(&server, &access, &jwt_with_exp(86400)).await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/"))
        .and(header("authorization", format!("Bearer {}", access)))
        .and(header("content-type", "application/json"))
        .and(header("ngrok-skip-browser-warning", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [pokemon_json(25, "pikachu", false)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (session, _store, _notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    let page = session.list_pokemons(Default::default()).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].name, "pikachu");
}

#[tokio::test]
async fn test_executor_retries_once_after_401() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    let refresh = jwt_with_exp(86400);
    let new_access = jwt_with_exp(7200);
    let rotated_refresh = jwt_with_exp(172800);
    mount_login(&server, &access, &refresh).await;

    // First send is rejected; the retry must carry the renewed token.
    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token expired"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(json!({ "refresh": refresh })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": new_access,
            "refresh": rotated_refresh,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/"))
        .and(header("authorization", format!("Bearer {}", new_access)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0,
            "next": null,
            "previous": null,
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (session, store, _notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    let page = session.list_pokemons(Default::default()).await.unwrap();
    assert_eq!(page.count, 0);

    // The renewed pair, rotated refresh token included, was installed.
    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.access.as_str(), new_access);
    assert_eq!(stored.refresh.as_str(), rotated_refresh);
}

#[tokio::test]
async fn test_executor_retry_exhausted() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    let refresh = jwt_with_exp(86400);
    mount_login(&server, &access, &refresh).await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Still unauthorized"
        })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": jwt_with_exp(7200),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (session, _store, _notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    let result = session.list_pokemons(Default::default()).await;

    match result {
        Err(Error::Request(failure)) => {
            assert_eq!(failure.status, 401);
            assert!(failure.retried);
        }
        other => panic!("expected retried request failure, got {:?}", other),
    }
    // A failed retry is not a logout.
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_executor_auth_failure_when_refresh_rejected() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    mount_login(&server, &access, &jwt_with_exp(86400)).await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Refresh token blacklisted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (session, store, notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    let result = session.list_pokemons(Default::default()).await;

    match result {
        Err(Error::Auth(AuthError::AuthenticationFailed)) => {}
        other => panic!("expected authentication failure, got {:?}", other),
    }
    assert!(!session.is_authenticated());
    assert!(store.load().unwrap().is_none());
    assert!(notifier.contains(NoticeLevel::Info, "Logged out"));
}

#[tokio::test]
async fn test_preemptive_refresh_before_request() {
    let server = MockServer::start().await;
    // Within the 300s refresh window but not yet expired.
    let near_expiry = jwt_with_exp(100);
    let refresh = jwt_with_exp(86400);
    let new_access = jwt_with_exp(7200);

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(json!({ "refresh": refresh })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": new_access,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/"))
        .and(header("authorization", format!("Bearer {}", new_access)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0,
            "next": null,
            "previous": null,
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store.save(&token_pair(&near_expiry, &refresh)).unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::initialize(mock_api_url(&server), store.clone(), notifier).await;

    session.list_pokemons(Default::default()).await.unwrap();

    // The refresh response carried no rotated token, so the old one stays.
    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.access.as_str(), new_access);
    assert_eq!(stored.refresh.as_str(), refresh);
}

#[tokio::test]
async fn test_no_refresh_for_fresh_token() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/"))
        .and(header("authorization", format!("Bearer {}", access)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0,
            "next": null,
            "previous": null,
            "results": []
        })))
        .expect(2)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store
        .save(&token_pair(&access, &jwt_with_exp(86400)))
        .unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::initialize(mock_api_url(&server), store, notifier).await;

    // Neither call refreshes: the token is nowhere near expiry.
    session.list_pokemons(Default::default()).await.unwrap();
    session.list_pokemons(Default::default()).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_requests_share_one_refresh() {
    let server = MockServer::start().await;
    let near_expiry = jwt_with_exp(100);
    let refresh = jwt_with_exp(86400);
    let new_access = jwt_with_exp(7200);

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;

    // The delay keeps the first refresh in flight while the second caller
    // arrives at the gate.
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": new_access }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/"))
        .and(header("authorization", format!("Bearer {}", new_access)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0,
            "next": null,
            "previous": null,
            "results": []
        })))
        .expect(2)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store.save(&token_pair(&near_expiry, &refresh)).unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::initialize(mock_api_url(&server), store, notifier).await;

    let (first, second) = tokio::join!(
        session.list_pokemons(Default::default()),
        session.list_pokemons(Default::default()),
    );
    first.unwrap();
    second.unwrap();
}

#[tokio::test]
async fn test_empty_json_body_parses_as_empty_object() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    mount_login(&server, &access, &jwt_with_exp(86400)).await;

    Mock::given(method("POST"))
        .and(path("/api/users/users/change-password/"))
        .and(body_json(json!({
            "new_password": "new-secret-1",
            "confirm_password": "new-secret-1"
        })))
        .respond_with(
            ResponseTemplate::new(200).insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (session, _store, notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    session
        .change_password("new-secret-1", "new-secret-1")
        .await
        .unwrap();

    assert!(notifier.contains(NoticeLevel::Success, "Password changed successfully"));
}

#[tokio::test]
async fn test_non_json_success_returns_text() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    mount_login(&server, &access, &jwt_with_exp(86400)).await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/25/cry/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("pong")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&server)
        .await;

    let (session, _store, _notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    let value = session
        .execute(Method::GET, "/api/pokemons/pokemons/25/cry/", RequestBody::Empty)
        .await
        .unwrap();
    assert_eq!(value, Value::String("pong".to_string()));
}

#[tokio::test]
async fn test_multipart_retry_rebuilds_form() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    let new_access = jwt_with_exp(7200);
    mount_login(&server, &access, &jwt_with_exp(86400)).await;

    Mock::given(method("POST"))
        .and(path("/api/users/users/avatar/"))
        .and(MultipartContentType)
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token expired"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": new_access,
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The resend carries the renewed token and a freshly built form with
    // the same parts.
    Mock::given(method("POST"))
        .and(path("/api/users/users/avatar/"))
        .and(header("authorization", format!("Bearer {}", new_access)))
        .and(MultipartContentType)
        .and(body_string_contains("avatar.png"))
        .and(body_string_contains("fake-png-bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let (session, _store, _notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    let form = MultipartForm::new()
        .text("label", "trainer card")
        .file("avatar", "avatar.png", "image/png", b"fake-png-bytes".to_vec());
    let value = session
        .execute(
            Method::POST,
            "/api/users/users/avatar/",
            RequestBody::Multipart(form),
        )
        .await
        .unwrap();
    assert_eq!(value, json!({}));
}

// ============================================================================
// Session Restore Tests
// ============================================================================

#[tokio::test]
async fn test_initialize_without_stored_tokens() {
    let server = MockServer::start().await;

    let store = Arc::new(MemoryTokenStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::initialize(mock_api_url(&server), store, notifier.clone()).await;

    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
    // An empty store is not a logout.
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_initialize_with_valid_tokens() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .and(header("authorization", format!("Bearer {}", access)))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store
        .save(&token_pair(&access, &jwt_with_exp(86400)))
        .unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::initialize(mock_api_url(&server), store, notifier).await;

    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().email, "ash@example.com");
}

#[tokio::test]
async fn test_initialize_profile_failure_keeps_tokens() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "Server error"
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store
        .save(&token_pair(&access, &jwt_with_exp(86400)))
        .unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::initialize(mock_api_url(&server), store.clone(), notifier.clone()).await;

    // A profile-endpoint glitch must not throw away working credentials.
    assert!(!session.is_authenticated());
    assert!(session.access_token().is_some());
    assert!(store.load().unwrap().is_some());
    assert!(!notifier.contains(NoticeLevel::Info, "Logged out"));
}

#[tokio::test]
async fn test_initialize_refreshes_expired_access_token() {
    let server = MockServer::start().await;
    let expired_access = jwt_with_exp(-100);
    let refresh = jwt_with_exp(86400);
    let new_access = jwt_with_exp(7200);

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(json!({ "refresh": refresh })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": new_access,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .and(header("authorization", format!("Bearer {}", new_access)))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store.save(&token_pair(&expired_access, &refresh)).unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::initialize(mock_api_url(&server), store.clone(), notifier).await;

    assert!(session.is_authenticated());
    assert!(session.user().is_some());
    assert_eq!(store.load().unwrap().unwrap().access.as_str(), new_access);
}

#[tokio::test]
async fn test_initialize_logs_out_when_both_expired() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store
        .save(&token_pair(&jwt_with_exp(-3600), &jwt_with_exp(-100)))
        .unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::initialize(mock_api_url(&server), store.clone(), notifier.clone()).await;

    assert!(!session.is_authenticated());
    assert!(store.load().unwrap().is_none());
    assert!(notifier.contains(NoticeLevel::Info, "Logged out"));
}

#[tokio::test]
async fn test_initialize_logs_out_when_refresh_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Refresh token blacklisted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store
        .save(&token_pair(&jwt_with_exp(-100), &jwt_with_exp(86400)))
        .unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::initialize(mock_api_url(&server), store.clone(), notifier.clone()).await;

    assert!(!session.is_authenticated());
    assert!(store.load().unwrap().is_none());
    assert!(notifier.contains(NoticeLevel::Info, "Logged out"));
}

// ============================================================================
// Catalogue Tests
// ============================================================================

#[tokio::test]
async fn test_list_pokemons_with_paging() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    mount_login(&server, &access, &jwt_with_exp(86400)).await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 151,
            "next": "http://example.com/api/pokemons/pokemons/?limit=20&offset=60",
            "previous": null,
            "results": [pokemon_json(41, "zubat", false)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (session, _store, _notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    let page = session
        .list_pokemons(ListPokemonsParams {
            limit: Some(20),
            offset: Some(40),
        })
        .await
        .unwrap();
    assert_eq!(page.count, 151);
    assert!(page.next.is_some());
}

#[tokio::test]
async fn test_get_pokemon_normalizes_key() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    mount_login(&server, &access, &jwt_with_exp(86400)).await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/pokemons/pikachu/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_json(25, "pikachu", false)))
        .expect(1)
        .mount(&server)
        .await;

    let (session, _store, _notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    let key = PokemonKey::new(" Pikachu ").unwrap();
    let pokemon = session.get_pokemon(&key).await.unwrap();
    assert_eq!(pokemon.external_id, 25);
}

#[tokio::test]
async fn test_favorite_pokemon_round_trip() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    mount_login(&server, &access, &jwt_with_exp(86400)).await;

    Mock::given(method("POST"))
        .and(path("/api/pokemons/pokemons/25/favorite/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_json(25, "pikachu", true)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/pokemons/pokemons/25/unfavorite/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_json(25, "pikachu", false)))
        .expect(1)
        .mount(&server)
        .await;

    let (session, _store, _notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    let key = PokemonKey::new("25").unwrap();
    let favorited = session.favorite_pokemon(&key).await.unwrap();
    assert!(favorited.is_favorited);

    let unfavorited = session.unfavorite_pokemon(&key).await.unwrap();
    assert!(!unfavorited.is_favorited);
}

#[tokio::test]
async fn test_evolution_chain_decodes_nested_nodes() {
    let server = MockServer::start().await;
    let access = jwt_with_exp(3600);
    mount_login(&server, &access, &jwt_with_exp(86400)).await;

    Mock::given(method("GET"))
        .and(path("/api/pokemons/evolution-chains/pichu/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pokemon": pokemon_json(172, "pichu", false),
            "evolves_to": [{
                "pokemon": pokemon_json(25, "pikachu", false),
                "evolution_text": "high friendship",
                "evolves_to": [{
                    "pokemon": pokemon_json(26, "raichu", false),
                    "evolution_text": "use thunder stone"
                }]
            }]
        })))
        .mount(&server)
        .await;

    let (session, _store, _notifier) = session_with(&server);
    session
        .login(&Credentials::new("ash@example.com", "pikapika"))
        .await
        .unwrap();

    let key = PokemonKey::new("pichu").unwrap();
    let chain = session.get_evolution_chain(&key).await.unwrap();

    assert_eq!(chain.pokemon.name, "pichu");
    assert!(chain.evolution_text.is_none());
    assert_eq!(chain.evolves_to.len(), 1);
    assert_eq!(
        chain.evolves_to[0].evolution_text.as_deref(),
        Some("high friendship")
    );
    assert_eq!(chain.evolves_to[0].evolves_to[0].pokemon.name, "raichu");
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_ok() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let (session, _store, _notifier) = session_with(&server);
    session.health_check().await.unwrap();
}

#[tokio::test]
async fn test_health_check_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (session, _store, _notifier) = session_with(&server);
    let result = session.health_check().await;

    match result {
        Err(Error::Request(failure)) => assert_eq!(failure.status, 503),
        other => panic!("expected request failure, got {:?}", other),
    }
}
