use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use skillgrid_auth::Role;
use skillgrid_session::{
    FederatedSession, HttpIdentityGateway, InMemoryTokenStore, LoginAttempt, SessionResolver,
    StaticFederatedProvider, TokenStore,
};

type Responder = Arc<dyn Fn(Option<String>) -> (StatusCode, Value) + Send + Sync>;
type LoginResponder = Arc<dyn Fn(&Value) -> (StatusCode, Value) + Send + Sync>;

#[derive(Clone)]
struct BackendState {
    me: Responder,
    login: LoginResponder,
    me_hits: Arc<AtomicUsize>,
}

impl BackendState {
    fn new(me: Responder, login: LoginResponder) -> Self {
        Self {
            me,
            login,
            me_hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn refuse_everything() -> Self {
        Self::new(
            Arc::new(|_| (StatusCode::UNAUTHORIZED, json!({ "success": false }))),
            Arc::new(|_| (StatusCode::UNAUTHORIZED, json!({ "success": false }))),
        )
    }
}

async fn me_route(
    State(state): State<BackendState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.me_hits.fetch_add(1, Ordering::SeqCst);
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    let (status, body) = (state.me)(token);
    (status, Json(body))
}

async fn login_route(
    State(state): State<BackendState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let (status, reply) = (state.login)(&body);
    (status, Json(reply))
}

struct TestBackend {
    base_url: String,
    state: BackendState,
    handle: tokio::task::JoinHandle<()>,
}

impl TestBackend {
    async fn spawn(state: BackendState) -> Self {
        let app = Router::new()
            .route("/me", get(me_route))
            .route("/login", post(login_route))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            state,
            handle,
        }
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn training_partner_profile() -> Value {
    json!({
        "user": {
            "id": "3",
            "email": "admin@techskills.example",
            "firstName": "Asha",
            "lastName": "Verma",
            "role": "training_partner",
            "organizationId": "tp-9",
            "permissions": ["manage_batches"]
        }
    })
}

fn admin_profile() -> Value {
    json!({
        "user": {
            "id": "1",
            "email": "super.admin@portal.example",
            "firstName": "Super",
            "lastName": "Admin",
            "role": "platform_admin",
            "permissions": ["read"]
        }
    })
}

fn resolver_for(
    base_url: &str,
    federated: Option<FederatedSession>,
    store: Arc<InMemoryTokenStore>,
) -> SessionResolver {
    skillgrid_observability::init();
    SessionResolver::new(
        Arc::new(StaticFederatedProvider::new(federated)),
        store,
        Arc::new(HttpIdentityGateway::new(base_url)),
    )
}

#[tokio::test]
async fn resolves_identity_from_a_valid_token() {
    let state = BackendState::new(
        Arc::new(|token| match token.as_deref() {
            Some("valid-token") => (StatusCode::OK, training_partner_profile()),
            _ => (StatusCode::UNAUTHORIZED, json!({ "success": false })),
        }),
        Arc::new(|_| (StatusCode::UNAUTHORIZED, json!({ "success": false }))),
    );
    let backend = TestBackend::spawn(state).await;

    let store = Arc::new(InMemoryTokenStore::default());
    store.save("valid-token").unwrap();
    let resolver = resolver_for(&backend.base_url, None, store);

    let identity = resolver.resolve().await.expect("expected an identity");
    assert_eq!(identity.role, Role::TRAINING_PARTNER);
    assert_eq!(identity.user_id.as_str(), "3");
    assert_eq!(identity.display_name(), "Asha Verma");
    assert_eq!(
        identity.organization_id.as_ref().map(|o| o.as_str()),
        Some("tp-9")
    );
    // Permissions are the deriver's job, not the wire's.
    assert!(identity.permissions().is_empty());
}

#[tokio::test]
async fn rejected_token_is_evicted_from_the_store() {
    let backend = TestBackend::spawn(BackendState::refuse_everything()).await;

    let store = Arc::new(InMemoryTokenStore::default());
    store.save("stale-token").unwrap();
    let resolver = resolver_for(&backend.base_url, None, store.clone());

    assert!(resolver.resolve().await.is_none());
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn federated_session_wins_without_consulting_the_backend() {
    let state = BackendState::new(
        Arc::new(|_| (StatusCode::OK, admin_profile())),
        Arc::new(|_| (StatusCode::UNAUTHORIZED, json!({ "success": false }))),
    );
    let backend = TestBackend::spawn(state).await;

    let store = Arc::new(InMemoryTokenStore::default());
    store.save("valid-token").unwrap();
    let federated =
        FederatedSession::new("tara@provider.example", Some("Tara".to_string())).unwrap();
    let resolver = resolver_for(&backend.base_url, Some(federated), store.clone());

    let identity = resolver.resolve().await.expect("expected an identity");
    // Least-privileged default, regardless of what the token's backend
    // profile would have said.
    assert_eq!(identity.role, Role::STUDENT);
    assert_eq!(backend.state.me_hits.load(Ordering::SeqCst), 0);
    // The token stays put: it was never consulted, so it was never evicted.
    assert_eq!(store.load().unwrap(), Some("valid-token".to_string()));
}

#[tokio::test]
async fn transport_failure_fails_closed_and_evicts() {
    // Bind then immediately drop, so the port refuses connections.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let store = Arc::new(InMemoryTokenStore::default());
    store.save("unverifiable-token").unwrap();
    let resolver = resolver_for(&base_url, None, store.clone());

    assert!(resolver.resolve().await.is_none());
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn unusable_profile_fails_closed_and_evicts() {
    let state = BackendState::new(
        Arc::new(|_| {
            (
                StatusCode::OK,
                json!({ "user": { "id": " ", "email": "x@example.com", "role": "student" } }),
            )
        }),
        Arc::new(|_| (StatusCode::UNAUTHORIZED, json!({ "success": false }))),
    );
    let backend = TestBackend::spawn(state).await;

    let store = Arc::new(InMemoryTokenStore::default());
    store.save("token-with-bad-profile").unwrap();
    let resolver = resolver_for(&backend.base_url, None, store.clone());

    assert!(resolver.resolve().await.is_none());
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn login_persists_the_token_and_later_resolves_with_it() {
    let state = BackendState::new(
        Arc::new(|token| match token.as_deref() {
            Some("abc") => (StatusCode::OK, admin_profile()),
            _ => (StatusCode::UNAUTHORIZED, json!({ "success": false })),
        }),
        Arc::new(|body| {
            let ok = body["email"] == "super.admin@portal.example"
                && body["password"] == "SuperAdmin@123";
            if ok {
                let mut reply = admin_profile();
                reply["success"] = json!(true);
                reply["token"] = json!("abc");
                (StatusCode::OK, reply)
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    json!({ "success": false, "error": "Invalid credentials or account not approved" }),
                )
            }
        }),
    );
    let backend = TestBackend::spawn(state).await;

    let store = Arc::new(InMemoryTokenStore::default());
    let resolver = resolver_for(&backend.base_url, None, store.clone());

    let attempt = resolver
        .login("super.admin@portal.example", "SuperAdmin@123")
        .await;
    let LoginAttempt::Granted(identity) = attempt else {
        panic!("expected a granted login");
    };
    assert_eq!(identity.role, Role::PLATFORM_ADMIN);
    assert_eq!(store.load().unwrap(), Some("abc".to_string()));

    // The persisted token carries the session across a fresh resolution pass.
    let resolved = resolver.resolve().await.expect("expected an identity");
    assert_eq!(resolved.role, Role::PLATFORM_ADMIN);
}

#[tokio::test]
async fn refused_login_surfaces_the_endpoint_message_and_writes_nothing() {
    let backend = TestBackend::spawn(BackendState::new(
        Arc::new(|_| (StatusCode::UNAUTHORIZED, json!({ "success": false }))),
        Arc::new(|_| {
            (
                StatusCode::UNAUTHORIZED,
                json!({ "success": false, "error": "Invalid credentials or account not approved" }),
            )
        }),
    ))
    .await;

    let store = Arc::new(InMemoryTokenStore::default());
    let resolver = resolver_for(&backend.base_url, None, store.clone());

    let attempt = resolver.login("nobody@portal.example", "wrong").await;
    assert_eq!(
        attempt,
        LoginAttempt::Refused {
            message: Some("Invalid credentials or account not approved".to_string()),
        }
    );
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn blank_credentials_are_refused_without_a_backend_call() {
    let backend = TestBackend::spawn(BackendState::refuse_everything()).await;

    let store = Arc::new(InMemoryTokenStore::default());
    let resolver = resolver_for(&backend.base_url, None, store);

    let attempt = resolver.login("  ", "").await;
    assert!(!attempt.is_granted());
}
