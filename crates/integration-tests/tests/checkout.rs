//! Order assembly and store scoping against `PostgreSQL`.
//!
//! Each test receives a fresh database with migrations applied.

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use storekeep_integration_tests::{
    app_with_pool, create_product, request, seller_with_store, send,
};

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_public_checkout_by_title(pool: PgPool) {
    let app = app_with_pool(pool);
    let (cookie, _) = seller_with_store(&app, "bob", "Mug Life").await;
    create_product(
        &app,
        &cookie,
        &json!({ "title": "Ceramic Coffee Mug", "price": "10.00", "tags": "mug" }),
    )
    .await;

    let body = json!({
        "buyer_name": "Ann",
        "buyer_email": "ann@example.com",
        "product_names": ["Ceramic Coffee Mug"],
    });
    let res = send(&app, request("POST", "/stores/Mug%20Life/orders", Some(&body), None)).await;

    assert_eq!(res.status, StatusCode::CREATED, "{}", res.json);
    let order = &res.json["order"];
    assert_eq!(order["total_price"], "10.00");
    assert_eq!(order["status"], "pending");
    assert!(order["user_id"].is_null());
    assert_eq!(order["products"].as_array().unwrap().len(), 1);
    assert_eq!(order["products"][0]["title"], "Ceramic Coffee Mug");
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_foreign_product_rejects_whole_order(pool: PgPool) {
    let app = app_with_pool(pool.clone());
    let (cookie_a, _) = seller_with_store(&app, "alice", "Store Dash").await;
    let (cookie_b, _) = seller_with_store(&app, "bob", "Mug Life").await;
    let own = create_product(&app, &cookie_a, &json!({ "title": "Summer Tee", "price": "15.00" })).await;
    let foreign =
        create_product(&app, &cookie_b, &json!({ "title": "Ceramic Coffee Mug", "price": "10.00" }))
            .await;

    let body = json!({
        "buyer_name": "Ann",
        "buyer_email": "ann@example.com",
        "product_ids": [own["id"], foreign["id"]],
    });
    let res = send(&app, request("POST", "/stores/Store%20Dash/orders", Some(&body), None)).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.json["errors"]["message"],
        "Some products were not found for this store."
    );

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM storekeep.order")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orders, 0);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_seller_order_records_seller(pool: PgPool) {
    let app = app_with_pool(pool);
    let (cookie, store) = seller_with_store(&app, "alice", "Store Dash").await;
    let tee = create_product(&app, &cookie, &json!({ "title": "Summer Tee", "price": "15.00" })).await;
    let mug = create_product(&app, &cookie, &json!({ "title": "Mug", "price": "10.50" })).await;

    let body = json!({
        "buyer_name": "Alice",
        "buyer_email": "alice@example.com",
        "product_ids": [tee["id"], mug["id"], tee["id"]],
    });
    let res = send(&app, request("POST", "/api/orders", Some(&body), Some(&cookie))).await;

    assert_eq!(res.status, StatusCode::CREATED, "{}", res.json);
    let order = &res.json["order"];
    assert_eq!(order["store_id"], store["id"]);
    assert_eq!(order["user_id"], store["user_id"]);
    assert_eq!(order["total_price"], "25.50");

    let res = send(&app, request("GET", "/api/orders", None, Some(&cookie))).await;
    assert_eq!(res.json["orders"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_other_sellers_order_is_not_found(pool: PgPool) {
    let app = app_with_pool(pool);
    let (cookie_a, _) = seller_with_store(&app, "alice", "Store Dash").await;
    let (cookie_b, _) = seller_with_store(&app, "bob", "Mug Life").await;
    let tee = create_product(&app, &cookie_a, &json!({ "title": "Summer Tee", "price": "15.00" })).await;

    let body = json!({
        "buyer_name": "Ann",
        "buyer_email": "ann@example.com",
        "product_ids": [tee["id"]],
    });
    let res = send(&app, request("POST", "/api/orders", Some(&body), Some(&cookie_a))).await;
    let order_id = res.json["order"]["id"].as_i64().unwrap();
    let uri = format!("/api/orders/{order_id}");

    let res = send(&app, request("GET", &uri, None, Some(&cookie_b))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json["errors"]["message"], "Order not found.");

    let status = json!({ "status": "fulfilled" });
    let res = send(&app, request("PUT", &uri, Some(&status), Some(&cookie_b))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = send(&app, request("DELETE", &uri, None, Some(&cookie_b))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = send(&app, request("PUT", &uri, Some(&status), Some(&cookie_a))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["order"]["status"], "fulfilled");
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_archived_store_is_hidden(pool: PgPool) {
    let app = app_with_pool(pool);
    let (cookie, _) = seller_with_store(&app, "bob", "Mug Life").await;

    let res = send(&app, request("GET", "/stores/Mug%20Life", None, None)).await;
    assert_eq!(res.status, StatusCode::OK);

    let res = send(&app, request("DELETE", "/api/stores/me", None, Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["message"], "Store archived.");

    let res = send(&app, request("GET", "/stores/Mug%20Life", None, None)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json["errors"]["message"], "Store not found.");

    let res = send(&app, request("GET", "/api/products", None, Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_second_store_conflicts(pool: PgPool) {
    let app = app_with_pool(pool);
    let (cookie, _) = seller_with_store(&app, "bob", "Mug Life").await;

    let body = json!({ "name": "Mug Life Two" });
    let res = send(&app, request("POST", "/api/stores", Some(&body), Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(
        res.json["errors"]["message"],
        "Store already exists for this user."
    );
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_order_validation_reports_fields(pool: PgPool) {
    let app = app_with_pool(pool);
    seller_with_store(&app, "bob", "Mug Life").await;

    let body = json!({ "buyer_email": "not-an-email", "product_ids": [] });
    let res = send(&app, request("POST", "/stores/Mug%20Life/orders", Some(&body), None)).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let errors = &res.json["errors"];
    assert!(errors["buyer_name"].is_array());
    assert!(errors["buyer_email"].is_array());
    assert!(errors["product_ids"].is_array());
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_large_order_total_is_accepted(pool: PgPool) {
    let app = app_with_pool(pool);
    let (cookie, _) = seller_with_store(&app, "alice", "Store Dash").await;
    let dear = create_product(&app, &cookie, &json!({ "title": "Yacht", "price": "99999999.99" })).await;
    let cheap = create_product(&app, &cookie, &json!({ "title": "Keyring", "price": "1.00" })).await;

    let body = json!({
        "buyer_name": "Ann",
        "buyer_email": "ann@example.com",
        "product_ids": [dear["id"], cheap["id"]],
    });
    let res = send(&app, request("POST", "/stores/Store%20Dash/orders", Some(&body), None)).await;

    assert_eq!(res.status, StatusCode::CREATED, "{}", res.json);
    assert_eq!(res.json["order"]["total_price"], "100000000.99");
}
