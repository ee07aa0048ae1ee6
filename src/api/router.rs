use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

use super::accounts;
use super::health;
use super::middleware::{
    logging_middleware, metrics_middleware, security_headers_middleware, MAX_BODY_SIZE,
};
use super::state::AppState;

/// Create the router with application state, without middleware
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Account API
        .nest("/accounts", accounts::create_accounts_router())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Create the application: routes, optional metrics endpoint and the middleware stack
pub fn create_app(state: AppState, metrics: Option<(PrometheusMetrics, String)>) -> Router {
    let mut app = create_router_with_state(state);

    if let Some((metrics, path)) = metrics {
        app = app.merge(create_metrics_router(metrics, &path));
    }

    app.layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::account::{AccountStore, MockAccountStore};
    use crate::infrastructure::account::{
        AccountDirectory, Argon2Codec, HashingConfig, InMemoryAccountStore,
    };

    fn state_with<S: AccountStore + 'static>(store: Arc<S>) -> AppState {
        let codec = Argon2Codec::new(&HashingConfig::new(1024, 1, 1)).unwrap();
        AppState::new(Arc::new(AccountDirectory::new(store, Arc::new(codec))))
    }

    fn test_app() -> Router {
        create_app(state_with(Arc::new(InMemoryAccountStore::new())), None)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn alice() -> Value {
        json!({
            "login_id": "alice",
            "password": "pw1",
            "display_name": "Alice",
            "email": "a@x.com"
        })
    }

    async fn register_alice(app: &Router) -> Value {
        let response = send(app, Method::POST, "/accounts/register", Some(alice())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app();

        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");

        let response = send(&app, Method::GET, "/live", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_store() {
        let store = Arc::new(MockAccountStore::new());
        store.set_should_fail(true).await;
        let app = create_app(state_with(store), None);

        let response = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["checks"][0]["name"], "account_store");
    }

    #[tokio::test]
    async fn test_register_returns_projection() {
        let app = test_app();

        let body = register_alice(&app).await;

        assert_eq!(body["login_id"], "alice");
        assert_eq!(body["display_name"], "Alice");
        assert_eq!(body["email"], "a@x.com");
        assert_eq!(body["status"], "ACTIVE");
        assert!(body["id"].is_string());
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let app = test_app();
        register_alice(&app).await;

        let response = send(&app, Method::POST, "/accounts/register", Some(alice())).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "conflict_error");
        assert_eq!(body["error"]["code"], "duplicate_identifier");
    }

    #[tokio::test]
    async fn test_register_invalid_input() {
        let app = test_app();

        let invalid = json!({"login_id": "", "password": "pw1", "email": "a@x.com"});
        let response = send(&app, Method::POST, "/accounts/register", Some(invalid)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_input");

        let missing_field = json!({"login_id": "alice", "email": "a@x.com"});
        let response = send(&app, Method::POST, "/accounts/register", Some(missing_field)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login() {
        let app = test_app();
        let registered = register_alice(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/accounts/login",
            Some(json!({"login_id": "alice", "password": "pw1"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, registered);

        let wrong_password = send(
            &app,
            Method::POST,
            "/accounts/login",
            Some(json!({"login_id": "alice", "password": "wrong"})),
        )
        .await;
        let unknown = send(
            &app,
            Method::POST,
            "/accounts/login",
            Some(json!({"login_id": "nobody", "password": "pw1"})),
        )
        .await;

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong_password).await, body_json(unknown).await);
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let app = test_app();

        let response = send(&app, Method::GET, "/accounts/all", None).await;
        assert_eq!(body_json(response).await, json!([]));

        let registered = register_alice(&app).await;

        let response = send(&app, Method::GET, "/accounts/all", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([registered.clone()]));

        let response = send(&app, Method::GET, "/accounts/alice", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, registered);

        let response = send(&app, Method::GET, "/accounts/nobody", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update() {
        let app = test_app();
        let registered = register_alice(&app).await;
        let id = registered["id"].as_str().unwrap();

        let update = json!({
            "login_id": "alice",
            "password": "pw2",
            "display_name": "Alice B",
            "email": "b@x.com"
        });
        let response = send(&app, Method::PUT, &format!("/accounts/{}", id), Some(update)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["id"], registered["id"]);
        assert_eq!(body["display_name"], "Alice B");
        assert_eq!(body["email"], "b@x.com");

        let response = send(
            &app,
            Method::POST,
            "/accounts/login",
            Some(json!({"login_id": "alice", "password": "pw2"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let app = test_app();
        register_alice(&app).await;

        let update = json!({"login_id": "alice", "email": "a@x.com"});

        let response = send(&app, Method::PUT, "/accounts/not-a-uuid", Some(update.clone())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let missing = format!("/accounts/{}", uuid::Uuid::new_v4());
        let response = send(&app, Method::PUT, &missing, Some(update)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_rename_onto_taken_login_id() {
        let app = test_app();
        register_alice(&app).await;

        let bob = json!({"login_id": "bob", "password": "pw", "email": "b@x.com"});
        let response = send(&app, Method::POST, "/accounts/register", Some(bob)).await;
        let bob_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let rename = json!({"login_id": "alice", "email": "b@x.com"});
        let response = send(&app, Method::PUT, &format!("/accounts/{}", bob_id), Some(rename)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_status() {
        let app = test_app();
        let registered = register_alice(&app).await;
        let id = registered["id"].as_str().unwrap();

        let response = send(
            &app,
            Method::PUT,
            &format!("/accounts/{}/status?status=inactive", id),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "INACTIVE");

        let response = send(
            &app,
            Method::PUT,
            &format!("/accounts/{}/status?status=SUSPENDED", id),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::PUT, &format!("/accounts/{}/status", id), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let missing = format!("/accounts/{}/status?status=ACTIVE", uuid::Uuid::new_v4());
        let response = send(&app, Method::PUT, &missing, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete() {
        let app = test_app();
        let registered = register_alice(&app).await;
        let uri = format!("/accounts/{}", registered["id"].as_str().unwrap());

        let response = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());

        let response = send(&app, Method::GET, "/accounts/alice", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic_500() {
        let store = Arc::new(MockAccountStore::new());
        store.set_should_fail(true).await;
        let app = create_app(state_with(store), None);

        let response = send(&app, Method::GET, "/accounts/all", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "server_error");
        assert_eq!(body["error"]["code"], "storage_failure");
        assert!(!body["error"]["message"].as_str().unwrap().contains("Mock"));
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let app = test_app();

        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }
}
