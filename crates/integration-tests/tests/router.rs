//! Router tests that never reach the database.
//!
//! The app is built on a lazy pool pointed at a closed port, so any handler
//! that did touch storage would fail with a 500 instead of the asserted status.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use storekeep_integration_tests::{app_without_database, request, send};

#[tokio::test]
async fn test_health_ok() {
    let app = app_without_database();
    let res = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_seller_routes_require_session() {
    let app = app_without_database();

    for (method, uri) in [
        ("GET", "/api/products"),
        ("GET", "/api/orders"),
        ("GET", "/api/stores/me"),
        ("DELETE", "/api/products/1"),
        ("GET", "/api/auth/me"),
    ] {
        let res = send(&app, request(method, uri, None, None)).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(res.json["errors"]["message"], "Authentication required.");
    }
}

#[tokio::test]
async fn test_seller_post_requires_session_before_body() {
    let app = app_without_database();
    let body = json!({ "title": "Mug" });
    let res = send(&app, request("POST", "/api/products", Some(&body), None)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_requires_session() {
    let app = app_without_database();
    let res = send(&app, request("POST", "/api/images/upload", None, None)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_checkout_body_is_bad_request() {
    let app = app_without_database();
    let req = Request::builder()
        .method("POST")
        .uri("/stores/Mug%20Life/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"buyer_name\": "))
        .unwrap();

    let res = send(&app, req).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json["errors"]["message"].is_string());
}

#[tokio::test]
async fn test_checkout_without_json_content_type_is_bad_request() {
    let app = app_without_database();
    let req = Request::builder()
        .method("POST")
        .uri("/stores/Mug%20Life/orders")
        .body(Body::from("{}"))
        .unwrap();

    let res = send(&app, req).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = app_without_database();
    let res = send(&app, request("GET", "/api/nope", None, None)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_path_id_uses_error_envelope() {
    let app = app_without_database();
    let res = send(&app, request("GET", "/api/reviews/product/abc", None, None)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json["errors"]["message"].is_string(), "{}", res.json);
}

#[tokio::test]
async fn test_unsigned_session_cookie_is_ignored() {
    let app = app_without_database();
    // Well-formed session id without a signature: the store is never consulted.
    let cookie = "sk_session=AAAAAAAAAAAAAAAAAAAAAA";
    let res = send(&app, request("GET", "/api/products", None, Some(cookie))).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json["errors"]["message"], "Authentication required.");
}

#[tokio::test]
async fn test_security_headers_applied() {
    let app = app_without_database();
    let response = tower::ServiceExt::oneshot(app, request("GET", "/health", None, None))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["referrer-policy"], "no-referrer");
}

#[tokio::test]
async fn test_request_id_echoed_or_generated() {
    let app = app_without_database();

    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.clone(), req).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-123");

    let response = tower::ServiceExt::oneshot(app, request("GET", "/health", None, None))
        .await
        .unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}
