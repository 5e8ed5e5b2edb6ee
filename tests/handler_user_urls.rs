mod common;

use axum::http::StatusCode;
use serde_json::json;
use url_registry::api::dto::user_urls::UserUrlResponse;
use uuid::Uuid;

#[tokio::test]
async fn test_first_contact_issues_identity_cookie() {
    let (server, _) = common::create_test_server();

    let response = server.get("/api/user/urls").await;

    response.assert_status(StatusCode::NO_CONTENT);

    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("identity cookie issued")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("user_id="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));

    let token = cookie
        .trim_start_matches("user_id=")
        .split(';')
        .next()
        .unwrap();
    let user_id = common::signer().verify(token).unwrap();
    assert!(Uuid::parse_str(&user_id).is_ok());
}

#[tokio::test]
async fn test_lists_only_callers_urls() {
    let (server, _) = common::create_test_server();
    let alice = common::identity_cookie(Uuid::new_v4());
    let bob = common::identity_cookie(Uuid::new_v4());

    server
        .post("/api/shorten")
        .add_header("Cookie", alice.clone())
        .json(&json!({ "url": "https://alice.com" }))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/shorten/batch")
        .add_header("Cookie", alice.clone())
        .json(&json!([{ "correlation_id": "1", "original_url": "https://alice-2.com" }]))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/")
        .add_header("Cookie", bob.clone())
        .text("https://bob.com")
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get("/api/user/urls")
        .add_header("Cookie", alice)
        .await;

    response.assert_status_ok();
    assert!(response.headers().get("set-cookie").is_none());

    let mut urls: Vec<UserUrlResponse> = response.json();
    urls.sort_by(|a, b| a.original_url.cmp(&b.original_url));

    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0].original_url, "https://alice-2.com");
    assert_eq!(urls[1].original_url, "https://alice.com");
    assert!(urls[0].short_url.starts_with(common::BASE_URL));
}

#[tokio::test]
async fn test_tampered_cookie_is_unauthorized() {
    let (server, _) = common::create_test_server();
    let forged = format!(
        "user_id={}.c2lnbmF0dXJl",
        base64_payload(&Uuid::new_v4().to_string())
    );

    let response = server
        .get("/api/user/urls")
        .add_header("Cookie", forged)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_cookie_is_unauthorized() {
    let (server, _) = common::create_test_server();

    let response = server
        .get("/api/user/urls")
        .add_header("Cookie", "user_id=garbage")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_caller_can_still_shorten() {
    let (server, storage) = common::create_test_server();

    let response = server
        .post("/")
        .add_header("Cookie", "user_id=garbage")
        .text("https://anon.com")
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(storage.len().await, 1);
}

fn base64_payload(value: &str) -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(value)
}
