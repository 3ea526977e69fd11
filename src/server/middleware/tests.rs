//! Middleware tests

use super::*;
use crate::auth::{Identity, MOVIES_READ, MOVIES_WRITE};
use crate::config::Config;
use crate::server::state::AppState;
use crate::storage::{Scope, User};
use crate::utils::error::{ApiError, INTERNAL_ERROR_MESSAGE};
use actix_web::http::{StatusCode, header};
use actix_web::test as actix_test;
use actix_web::{App, HttpRequest, HttpResponse, web};
use serde_json::{Value, json};
use std::net::SocketAddr;

fn test_config(limiter_enabled: bool, burst: u32) -> Config {
    let mut config = Config::default();
    config.api.limiter.enabled = limiter_enabled;
    config.api.limiter.rps = 0.5;
    config.api.limiter.burst = burst;
    config.api.limiter.global.enabled = false;
    config
}

async fn whoami(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "anonymous": identity.is_anonymous(),
        "user_id": identity.user().map(|u| u.id),
    }))
}

async fn echo_request_id(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "request_id": current_request_id(&req) }))
}

async fn ok() -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn explode() -> HttpResponse {
    panic!("handler exploded")
}

async fn fail_internally() -> Result<HttpResponse, ApiError> {
    Err(ApiError::internal("connection pool poisoned"))
}

/// Insert a user and return a bearer token for it
async fn seed_user(state: &AppState, email: &str, activated: bool, codes: &[&str]) -> String {
    let mut user = User::new("Test".to_string(), email.to_string(), "hash".to_string());
    user.activated = activated;

    let storage = &state.storage;
    let user = storage.users().insert(user).await.unwrap();
    storage.permissions().add_for_user(user.id, codes).await.unwrap();
    storage
        .tokens()
        .new_token(user.id, chrono::Duration::hours(1), Scope::Authentication)
        .await
        .unwrap()
        .plaintext
}

macro_rules! test_app {
    ($state:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .wrap(Authenticate)
                .wrap(RateLimit)
                .wrap(RecoverPanic)
                .wrap(RequestIdMiddleware)
                .route("/whoami", web::get().to(whoami))
                .route("/request-id", web::get().to(echo_request_id))
                .route("/panic", web::get().to(explode))
                .route("/fail", web::get().to(fail_internally))
                .service(
                    web::resource("/catalogue")
                        .route(
                            web::get()
                                .to(ok)
                                .wrap(Authorize::permission(MOVIES_READ)),
                        )
                        .route(
                            web::post()
                                .to(ok)
                                .wrap(Authorize::permission(MOVIES_WRITE)),
                        ),
                )
                .route("/members", web::get().to(ok).wrap(Authorize::activated())),
        )
        .await
    };
}

fn get(path: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::get()
        .uri(path)
        .peer_addr("203.0.113.9:40000".parse().unwrap())
}

// ==================== client_key Tests ====================

#[test]
fn test_client_key_drops_port() {
    let v4: SocketAddr = "203.0.113.9:5555".parse().unwrap();
    assert_eq!(client_key(Some(v4)).unwrap(), "203.0.113.9");

    let v6: SocketAddr = "[::1]:8080".parse().unwrap();
    assert_eq!(client_key(Some(v6)).unwrap(), "::1");
}

#[test]
fn test_client_key_requires_peer_address() {
    assert!(matches!(client_key(None), Err(ApiError::Internal(_))));
}

#[actix_web::test]
async fn test_enabled_limiter_keys_on_peer_ip() {
    let state = AppState::new(test_config(true, 2));
    let app = test_app!(state);

    for port in [40000, 40001] {
        let req = actix_test::TestRequest::get()
            .uri("/whoami")
            .peer_addr(SocketAddr::from(([203, 0, 113, 9], port)))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
    assert_eq!(state.clients.len(), 1);

    let req = actix_test::TestRequest::get()
        .uri("/whoami")
        .peer_addr(SocketAddr::from(([203, 0, 113, 9], 40002)))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
}

// ==================== RecoverPanic Tests ====================

#[actix_web::test]
async fn test_panic_becomes_generic_500() {
    let state = AppState::new(test_config(false, 4));
    let app = test_app!(state);

    let err = actix_test::try_call_service(&app, get("/panic").to_request())
        .await
        .err()
        .expect("panic surfaces as an error response");
    let res = err.error_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.headers().get(header::CONNECTION).unwrap(), "close");

    let bytes = actix_web::body::to_bytes(res.into_body()).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
}

#[actix_web::test]
async fn test_server_keeps_serving_after_panic() {
    let state = AppState::new(test_config(false, 4));
    let app = test_app!(state);

    let res = actix_test::try_call_service(&app, get("/panic").to_request()).await;
    assert!(res.is_err());

    let res = actix_test::call_service(&app, get("/whoami").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_routed_requests_pass_through_recovery() {
    let state = AppState::new(test_config(false, 4));
    let app = test_app!(state);

    for path in ["/whoami", "/catalogue", "/fail"] {
        let res = actix_test::try_call_service(&app, get(path).to_request()).await;
        assert!(res.is_ok(), "{}", path);
    }
}

#[actix_web::test]
async fn test_internal_error_detail_is_hidden() {
    let state = AppState::new(test_config(false, 4));
    let app = test_app!(state);

    let res = actix_test::call_service(&app, get("/fail").to_request()).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    assert!(!body.to_string().contains("pool"));
}

#[actix_web::test]
async fn test_request_id_visible_to_handlers() {
    let state = AppState::new(test_config(false, 4));
    let app = test_app!(state);

    let res = actix_test::call_service(&app, get("/request-id").to_request()).await;
    let header_value = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap();

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["request_id"], header_value);
}

// ==================== RateLimit Tests ====================

#[actix_web::test]
async fn test_client_burst_then_denied() {
    let state = AppState::new(test_config(true, 2));
    let app = test_app!(state);

    for _ in 0..2 {
        let res = actix_test::call_service(&app, get("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = actix_test::call_service(&app, get("/whoami").to_request()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], "rate limit exceeded");

    let other = actix_test::TestRequest::get()
        .uri("/whoami")
        .peer_addr("198.51.100.7:1234".parse().unwrap())
        .to_request();
    let res = actix_test::call_service(&app, other).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_denied_request_never_reaches_handler() {
    let state = AppState::new(test_config(true, 1));
    let app = test_app!(state);

    let res = actix_test::call_service(&app, get("/whoami").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = actix_test::call_service(&app, get("/panic").to_request()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[actix_web::test]
async fn test_disabled_limiter_admits_everything() {
    let state = AppState::new(test_config(false, 1));
    let app = test_app!(state);

    for _ in 0..10 {
        let req = actix_test::TestRequest::get().uri("/whoami").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
    assert!(state.clients.is_empty());
}

#[actix_web::test]
async fn test_missing_peer_address_is_internal_error() {
    let state = AppState::new(test_config(true, 4));
    let app = test_app!(state);

    let req = actix_test::TestRequest::get().uri("/whoami").to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_global_limiter_denies_across_clients() {
    let mut config = test_config(false, 4);
    config.api.limiter.global.enabled = true;
    config.api.limiter.global.rps = 0.5;
    config.api.limiter.global.burst = 1;
    let state = AppState::new(config);
    let app = test_app!(state);

    let res = actix_test::call_service(&app, get("/whoami").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let other = actix_test::TestRequest::get()
        .uri("/whoami")
        .peer_addr("198.51.100.7:1234".parse().unwrap())
        .to_request();
    let res = actix_test::call_service(&app, other).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
}

// ==================== Authenticate Tests ====================

#[actix_web::test]
async fn test_no_credential_is_anonymous() {
    let state = AppState::new(test_config(false, 4));
    let app = test_app!(state);

    let res = actix_test::call_service(&app, get("/whoami").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.headers()
            .get_all(header::VARY)
            .any(|v| v == "Authorization")
    );
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["anonymous"], true);
}

#[actix_web::test]
async fn test_valid_credential_attaches_user() {
    let state = AppState::new(test_config(false, 4));
    let token = seed_user(&state, "alice@example.com", true, &[]).await;
    let app = test_app!(state);

    let req = get("/whoami")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["anonymous"], false);
    assert_eq!(body["user_id"], 1);
}

#[actix_web::test]
async fn test_bad_credentials_are_rejected() {
    let state = AppState::new(test_config(false, 4));
    let app = test_app!(state);

    for value in [
        "Bearer",
        "Basic dXNlcjpwYXNz",
        "Bearer tooshort",
        "Bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    ] {
        let req = get("/whoami")
            .insert_header((header::AUTHORIZATION, value))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", value);
        assert_eq!(res.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
        assert!(
            res.headers()
                .get_all(header::VARY)
                .any(|v| v == "Authorization")
        );
    }
}

// ==================== Authorize Tests ====================

#[actix_web::test]
async fn test_anonymous_on_gated_route() {
    let state = AppState::new(test_config(false, 4));
    let app = test_app!(state);

    let res = actix_test::call_service(&app, get("/catalogue").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], "you must be authenticated to access this resource");
}

#[actix_web::test]
async fn test_inactive_user_is_forbidden() {
    let state = AppState::new(test_config(false, 4));
    let token = seed_user(&state, "bob@example.com", false, &[MOVIES_READ]).await;
    let app = test_app!(state);

    let req = get("/members")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body["error"],
        "your user account must be activated to access this resource"
    );
}

#[actix_web::test]
async fn test_permission_gate_per_method() {
    let state = AppState::new(test_config(false, 4));
    let token = seed_user(&state, "carol@example.com", true, &[MOVIES_READ]).await;
    let app = test_app!(state);
    let bearer = format!("Bearer {}", token);

    let req = get("/catalogue")
        .insert_header((header::AUTHORIZATION, bearer.clone()))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = actix_test::TestRequest::post()
        .uri("/catalogue")
        .peer_addr("203.0.113.9:40000".parse().unwrap())
        .insert_header((header::AUTHORIZATION, bearer))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_closed_store_fails_closed() {
    let state = AppState::new(test_config(false, 4));
    let token = seed_user(&state, "dave@example.com", true, &[MOVIES_READ]).await;
    let app = test_app!(state);
    state.storage.close();

    let req = get("/catalogue")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
