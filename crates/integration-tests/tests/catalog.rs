//! Tag reconciliation, product lifecycle and reviews against `PostgreSQL`.

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

use storekeep_server::services::tags;
use storekeep_integration_tests::{
    app_with_pool, create_product, request, seller_with_store, send, signup,
};

fn tag_names(product: &Value) -> Vec<String> {
    let mut names: Vec<String> = product["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap().to_owned())
        .collect();
    names.sort();
    names
}

async fn tag_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM storekeep.tag")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_tags_are_shared_across_products(pool: PgPool) {
    let app = app_with_pool(pool.clone());
    let (cookie, _) = seller_with_store(&app, "alice", "Store Dash").await;

    let first = create_product(
        &app,
        &cookie,
        &json!({ "title": "Summer Tee", "price": "15.00", "tags": "summer, shirt" }),
    )
    .await;
    let second = create_product(
        &app,
        &cookie,
        &json!({ "title": "Beach Tee", "price": "12.00", "tags": " shirt ,summer,," }),
    )
    .await;

    assert_eq!(tag_names(&first), ["shirt", "summer"]);
    assert_eq!(tag_names(&second), ["shirt", "summer"]);
    assert_eq!(tag_count(&pool).await, 2);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_reconcile_is_idempotent(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let first = tags::reconcile(&mut conn, "summer, shirt").await.unwrap();
    let second = tags::reconcile(&mut conn, "summer,shirt, summer").await.unwrap();

    let first_ids: Vec<_> = first.iter().map(|t| t.id).collect();
    let second_ids: Vec<_> = second.iter().map(|t| t.id).collect();
    assert_eq!(first_ids, second_ids);
    assert_eq!(tag_count(&pool).await, 2);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_concurrent_tag_creation_yields_one_row(pool: PgPool) {
    let app = app_with_pool(pool.clone());
    let (cookie, _) = seller_with_store(&app, "alice", "Store Dash").await;

    let tee = json!({ "title": "Summer Tee", "price": "15.00", "tags": "brandnew" });
    let mug = json!({ "title": "Ceramic Coffee Mug", "price": "10.00", "tags": "brandnew" });
    let (a, b) = tokio::join!(
        create_product(&app, &cookie, &tee),
        create_product(&app, &cookie, &mug)
    );

    assert_eq!(tag_names(&a), ["brandnew"]);
    assert_eq!(tag_names(&b), ["brandnew"]);
    assert_eq!(tag_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_update_without_tags_keeps_them(pool: PgPool) {
    let app = app_with_pool(pool);
    let (cookie, _) = seller_with_store(&app, "alice", "Store Dash").await;
    let product = create_product(
        &app,
        &cookie,
        &json!({ "title": "Summer Tee", "price": "15.00", "tags": "summer" }),
    )
    .await;
    let uri = format!("/api/products/{}", product["id"]);

    let body = json!({ "title": "Summer Tee", "price": "16.00" });
    let res = send(&app, request("PUT", &uri, Some(&body), Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.json);
    assert_eq!(res.json["product"]["price"], "16.00");
    assert_eq!(tag_names(&res.json["product"]), ["summer"]);

    let body = json!({ "title": "Summer Tee", "price": "16.00", "tags": "" });
    let res = send(&app, request("PUT", &uri, Some(&body), Some(&cookie))).await;
    assert!(tag_names(&res.json["product"]).is_empty());
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_deleted_product_leaves_order_total(pool: PgPool) {
    let app = app_with_pool(pool);
    let (cookie, _) = seller_with_store(&app, "bob", "Mug Life").await;
    let mug = create_product(&app, &cookie, &json!({ "title": "Mug", "price": "10.00" })).await;

    let body = json!({
        "buyer_name": "Ann",
        "buyer_email": "ann@example.com",
        "product_ids": [mug["id"]],
    });
    let res = send(&app, request("POST", "/stores/Mug%20Life/orders", Some(&body), None)).await;
    let order_uri = format!("/api/orders/{}", res.json["order"]["id"]);

    let product_uri = format!("/api/products/{}", mug["id"]);
    let res = send(&app, request("DELETE", &product_uri, None, Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["message"], "Product deleted.");

    let res = send(&app, request("GET", &order_uri, None, Some(&cookie))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["order"]["total_price"], "10.00");
    assert!(res.json["order"]["products"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_storefront_filters(pool: PgPool) {
    let app = app_with_pool(pool);
    let (cookie, _) = seller_with_store(&app, "alice", "Store Dash").await;
    create_product(
        &app,
        &cookie,
        &json!({ "title": "Summer Tee", "price": "15.00", "tags": "summer, shirt" }),
    )
    .await;
    create_product(
        &app,
        &cookie,
        &json!({ "title": "Winter Mug", "price": "9.00", "tags": "mug" }),
    )
    .await;

    let titles = |body: &Value| -> Vec<String> {
        body["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_owned())
            .collect()
    };

    let res = send(&app, request("GET", "/stores/Store%20Dash", None, None)).await;
    assert_eq!(res.json["store"]["name"], "Store Dash");
    assert_eq!(titles(&res.json), ["Summer Tee", "Winter Mug"]);

    let res = send(&app, request("GET", "/stores/Store%20Dash?tag=shirt", None, None)).await;
    assert_eq!(titles(&res.json), ["Summer Tee"]);

    let res = send(&app, request("GET", "/stores/Store%20Dash?q=MUG", None, None)).await;
    assert_eq!(titles(&res.json), ["Winter Mug"]);

    let res = send(&app, request("GET", "/stores/Store%20Dash?tag=&q=", None, None)).await;
    assert_eq!(titles(&res.json).len(), 2);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_reviews_are_author_only(pool: PgPool) {
    let app = app_with_pool(pool);
    let (seller, _) = seller_with_store(&app, "bob", "Mug Life").await;
    let mug = create_product(&app, &seller, &json!({ "title": "Mug", "price": "10.00" })).await;
    let reviewer = signup(&app, "carol@example.com", "carol").await;

    let body = json!({ "product_id": mug["id"], "rating": 4, "comment": "Keeps coffee warm." });
    let res = send(&app, request("POST", "/api/reviews", Some(&body), Some(&reviewer))).await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.json);
    let review_uri = format!("/api/reviews/{}", res.json["review"]["id"]);

    let list_uri = format!("/api/reviews/product/{}", mug["id"]);
    let res = send(&app, request("GET", &list_uri, None, None)).await;
    assert_eq!(res.json["reviews"].as_array().unwrap().len(), 1);

    let edit = json!({ "rating": 1 });
    let res = send(&app, request("PUT", &review_uri, Some(&edit), Some(&seller))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json["errors"]["message"], "Review not found.");

    let bad = json!({ "rating": 9 });
    let res = send(&app, request("PUT", &review_uri, Some(&bad), Some(&reviewer))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json["errors"]["rating"].is_array());

    let res = send(&app, request("DELETE", &review_uri, None, Some(&reviewer))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["message"], "Review deleted.");

    let res = send(&app, request("GET", "/api/reviews/product/999999", None, None)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
