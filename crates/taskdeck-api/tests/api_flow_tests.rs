//! End-to-end tests of the HTTP surface against in-memory stores and a
//! manual clock.

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
use actix_web::{web, App};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use taskdeck_api::{configure_routes, AppContext, InMemoryRateLimitStore};
use taskdeck_auth::{InMemoryUserRepository, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};
use taskdeck_commons::ManualClock;
use taskdeck_configs::ServerConfig;
use taskdeck_core::InMemoryTaskRepository;

fn context(clock: Arc<ManualClock>, max_requests: u32) -> web::Data<AppContext> {
    let mut config = ServerConfig::default();
    config.auth.cookie_secure = false;
    config.auth.bcrypt_cost = 4;
    config.rate_limit.max_requests = max_requests;

    web::Data::new(AppContext::new(
        Arc::new(config),
        clock,
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(InMemoryRateLimitStore::new()),
    ))
}

fn monday_morning() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()))
}

macro_rules! test_app {
    ($ctx:expr) => {
        init_service(
            App::new()
                .app_data($ctx.clone())
                .app_data($ctx.token_data())
                .wrap($ctx.edge_middleware())
                .configure(configure_routes),
        )
        .await
    };
}

fn cookie_named<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

fn register_body(name: &str, email: &str) -> Value {
    json!({ "name": name, "email": email, "password": "s3cret-pass" })
}

/// Registers and logs in, returning the access and refresh cookies.
macro_rules! sign_in {
    ($app:expr, $name:expr, $email:expr) => {{
        let resp = call_service(
            &$app,
            TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body($name, $email))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = call_service(
            &$app,
            TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": $email, "password": "s3cret-pass" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        (
            cookie_named(&resp, ACCESS_COOKIE_NAME).expect("access cookie"),
            cookie_named(&resp, REFRESH_COOKIE_NAME).expect("refresh cookie"),
        )
    }};
}

#[actix_web::test]
async fn test_register_normalizes_and_rejects_duplicates() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body("Ada", "  Ada@Example.COM "))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body("Ada again", "ada@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["errors"][0]["field"], "email");
}

#[actix_web::test]
async fn test_register_validation_errors() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": "", "email": "not-an-email", "password": "abc" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "password"]);
}

#[actix_web::test]
async fn test_malformed_json_is_validation_error() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"email\": ")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["errors"][0]["field"], "body");
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);
    let _ = sign_in!(app, "Ada", "ada@example.com");

    let wrong_password = call_service(
        &app,
        TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "ada@example.com", "password": "wrong-pass" }))
            .to_request(),
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert!(cookie_named(&wrong_password, ACCESS_COOKIE_NAME).is_none());
    let wrong_password: Value = read_body_json(wrong_password).await;

    let unknown_email = call_service(
        &app,
        TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "nobody@example.com", "password": "s3cret-pass" }))
            .to_request(),
    )
    .await;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let unknown_email: Value = read_body_json(unknown_email).await;

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["message"], "Invalid email or password");
}

#[actix_web::test]
async fn test_login_sets_http_only_cookies_without_body_tokens() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);
    let (access, refresh) = sign_in!(app, "Ada", "ada@example.com");

    assert_eq!(access.http_only(), Some(true));
    assert_eq!(refresh.http_only(), Some(true));
    assert_eq!(access.max_age(), Some(actix_web::cookie::time::Duration::minutes(15)));
    assert_eq!(refresh.max_age(), Some(actix_web::cookie::time::Duration::days(7)));
    assert_eq!(access.path(), Some("/"));
}

#[actix_web::test]
async fn test_task_crud_is_owner_scoped() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);
    let (ada, _) = sign_in!(app, "Ada", "ada@example.com");
    let (bob, _) = sign_in!(app, "Bob", "bob@example.com");

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/tasks")
            .cookie(ada.clone())
            .set_json(json!({ "title": "  Write report ", "description": "Q2 numbers" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["message"], "Task created");
    assert_eq!(body["task"]["title"], "Write report");
    assert_eq!(body["task"]["status"], "ASSIGNED");
    assert!(body["task"]["completedAt"].is_null());
    let task_id = body["task"]["id"].as_str().unwrap().to_string();

    // Bob can neither see nor touch Ada's task.
    let resp = call_service(&app, TestRequest::get().uri("/api/tasks").cookie(bob.clone()).to_request()).await;
    let body: Value = read_body_json(resp).await;
    assert!(body["tasks"].as_array().unwrap().is_empty());

    let resp = call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/tasks/{}", task_id))
            .cookie(bob.clone())
            .set_json(json!({ "status": "COMPLETED" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/tasks/{}", task_id))
            .cookie(bob)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Ada completes it.
    let resp = call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/tasks/{}", task_id))
            .cookie(ada.clone())
            .set_json(json!({ "status": "COMPLETED" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["message"], "Task updated");
    assert_eq!(body["task"]["status"], "COMPLETED");
    assert!(!body["task"]["completedAt"].is_null());
    assert_eq!(body["task"]["description"], "Q2 numbers");

    let resp = call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/tasks/{}", task_id))
            .cookie(ada.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["message"], "Task deleted");

    let resp = call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/tasks/{}", task_id))
            .cookie(ada)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_form_due_dates_and_description_clearing() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);
    let (ada, _) = sign_in!(app, "Ada", "ada@example.com");

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/tasks")
            .cookie(ada.clone())
            .set_json(json!({ "title": "No deadline", "description": "", "dueDate": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = read_body_json(resp).await;
    assert!(body["task"].get("dueDate").is_none());

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/tasks")
            .cookie(ada.clone())
            .set_json(json!({ "title": "Report", "description": "Q2 numbers", "dueDate": "2024-06-10" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["task"]["dueDate"], "2024-06-10T00:00:00Z");
    let task_id = body["task"]["id"].as_str().unwrap().to_string();

    let resp = call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/tasks/{}", task_id))
            .cookie(ada)
            .set_json(json!({ "description": null }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert!(body["task"].get("description").is_none());
    assert_eq!(body["task"]["dueDate"], "2024-06-10T00:00:00Z");
}

#[actix_web::test]
async fn test_task_validation_and_unknown_status() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);
    let (ada, _) = sign_in!(app, "Ada", "ada@example.com");

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/tasks")
            .cookie(ada.clone())
            .set_json(json!({ "title": "x".repeat(101) }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "title");

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/tasks")
            .cookie(ada)
            .set_json(json!({ "title": "ok", "status": "DONE" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_api_without_credentials_is_401_json() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);

    let resp = call_service(&app, TestRequest::get().uri("/api/tasks").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["error"], "unauthorized");
}

#[actix_web::test]
async fn test_bearer_header_is_accepted() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);
    let (ada, _) = sign_in!(app, "Ada", "ada@example.com");

    let resp = call_service(
        &app,
        TestRequest::get()
            .uri("/api/tasks")
            .insert_header(("Authorization", format!("Bearer {}", ada.value())))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_refresh_flow() {
    let clock = monday_morning();
    let ctx = context(clock.clone(), 1000);
    let app = test_app!(ctx);
    let (access, refresh) = sign_in!(app, "Ada", "ada@example.com");

    let resp = call_service(&app, TestRequest::post().uri("/api/auth/refresh").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/auth/refresh")
            .cookie(Cookie::new(REFRESH_COOKIE_NAME, "garbage"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // An access token is not a refresh token.
    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/auth/refresh")
            .cookie(Cookie::new(REFRESH_COOKIE_NAME, access.value().to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    clock.advance(Duration::minutes(16));
    let resp = call_service(&app, TestRequest::get().uri("/api/tasks").cookie(access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = call_service(
        &app,
        TestRequest::post().uri("/api/auth/refresh").cookie(refresh.clone()).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(cookie_named(&resp, REFRESH_COOKIE_NAME).is_none());
    let fresh = cookie_named(&resp, ACCESS_COOKIE_NAME).expect("new access cookie");
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["message"], "Token refreshed");

    let resp = call_service(&app, TestRequest::get().uri("/api/tasks").cookie(fresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    clock.advance(Duration::days(7));
    let resp = call_service(&app, TestRequest::post().uri("/api/auth/refresh").cookie(refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_me_and_logout() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);

    let resp = call_service(&app, TestRequest::get().uri("/api/auth/me").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert!(body["user"].is_null());

    let (access, _) = sign_in!(app, "Ada", "ada@example.com");
    let resp = call_service(&app, TestRequest::get().uri("/api/auth/me").cookie(access).to_request()).await;
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], "ada@example.com");

    let resp = call_service(&app, TestRequest::post().uri("/api/auth/logout").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    for name in [ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME] {
        let cookie = cookie_named(&resp, name).expect("cleared cookie");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
    }
}

#[actix_web::test]
async fn test_analytics_window_and_bounds() {
    let clock = monday_morning();
    let ctx = context(clock.clone(), 1000);
    let app = test_app!(ctx);
    let (ada, _) = sign_in!(app, "Ada", "ada@example.com");

    // Created Monday, completed Wednesday.
    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/tasks")
            .cookie(ada.clone())
            .set_json(json!({ "title": "Ship it" }))
            .to_request(),
    )
    .await;
    let body: Value = read_body_json(resp).await;
    let task_id = body["task"]["id"].as_str().unwrap().to_string();

    clock.advance(Duration::days(2));
    let resp = call_service(
        &app,
        TestRequest::post().uri("/api/auth/login").set_json(json!({
            "email": "ada@example.com",
            "password": "s3cret-pass"
        }))
        .to_request(),
    )
    .await;
    let ada = cookie_named(&resp, ACCESS_COOKIE_NAME).unwrap();

    let resp = call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/tasks/{}", task_id))
            .cookie(ada.clone())
            .set_json(json!({ "status": "COMPLETED" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call_service(&app, TestRequest::get().uri("/api/analytics").cookie(ada.clone()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 7);
    assert_eq!(data[0]["date"], "2024-05-30");
    assert_eq!(data[4], json!({ "date": "2024-06-03", "created": 1, "completed": 0 }));
    assert_eq!(data[5], json!({ "date": "2024-06-04", "created": 0, "completed": 0 }));
    assert_eq!(data[6], json!({ "date": "2024-06-05", "created": 0, "completed": 1 }));

    let resp = call_service(
        &app,
        TestRequest::get().uri("/api/analytics?days=2").cookie(ada.clone()).to_request(),
    )
    .await;
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    for query in ["days=0", "days=91", "days=abc"] {
        let resp = call_service(
            &app,
            TestRequest::get()
                .uri(&format!("/api/analytics?{}", query))
                .cookie(ada.clone())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "query {}", query);
    }
}

#[actix_web::test]
async fn test_dashboard_redirects_then_renders_board() {
    let ctx = context(monday_morning(), 1000);
    let app = test_app!(ctx);

    let resp = call_service(&app, TestRequest::get().uri("/dashboard").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("location").unwrap(), "/login");

    let (ada, _) = sign_in!(app, "Ada", "ada@example.com");
    for (title, status) in [("a", "ASSIGNED"), ("b", "IN_PROGRESS"), ("c", "COMPLETED")] {
        let resp = call_service(
            &app,
            TestRequest::post()
                .uri("/api/tasks")
                .cookie(ada.clone())
                .set_json(json!({ "title": title, "status": status }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = call_service(&app, TestRequest::get().uri("/dashboard").cookie(ada).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    let columns = body["board"]["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0]["title"], "To Do");
    assert_eq!(columns[2]["tasks"][0]["title"], "c");
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[actix_web::test]
async fn test_rate_limit_applies_to_api_requests() {
    let clock = monday_morning();
    let ctx = context(clock.clone(), 5);
    let app = test_app!(ctx);

    for _ in 0..5 {
        let resp = call_service(&app, TestRequest::get().uri("/api/healthcheck").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = call_service(&app, TestRequest::get().uri("/api/healthcheck").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers().get("retry-after").unwrap(), "60");
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["error"], "rate_limited");

    clock.advance(Duration::seconds(60));
    let resp = call_service(&app, TestRequest::get().uri("/api/healthcheck").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}
