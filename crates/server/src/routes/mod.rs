//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (database)
//!
//! # Auth (rate limited)
//! POST   /api/auth/signup           - Register and log in
//! POST   /api/auth/login            - Log in
//! POST   /api/auth/logout           - Log out
//! GET    /api/auth/me               - Current user
//!
//! # Seller (requires auth, scoped to the caller's active store)
//! GET    /api/stores/me             - Caller's store
//! POST   /api/stores                - Open a store
//! PUT    /api/stores/me             - Edit the store
//! DELETE /api/stores/me             - Archive the store
//! GET    /api/products              - Product list
//! POST   /api/products              - Create product
//! GET    /api/products/{id}         - Product detail
//! PUT    /api/products/{id}         - Update product
//! DELETE /api/products/{id}         - Delete product
//! GET    /api/orders                - Order list
//! POST   /api/orders                - Enter an order
//! GET    /api/orders/{id}           - Order detail
//! PUT    /api/orders/{id}           - Change order status
//! DELETE /api/orders/{id}           - Delete order
//! POST   /api/images/upload         - Upload an image
//!
//! # Reviews
//! POST   /api/reviews               - Write a review (requires auth)
//! GET    /api/reviews/product/{id}  - Reviews of a product
//! PUT    /api/reviews/{id}          - Edit own review
//! DELETE /api/reviews/{id}          - Delete own review
//!
//! # Public storefront
//! GET    /stores/{name}             - Store and products (?tag=&q=)
//! POST   /stores/{name}/orders      - Guest checkout (rate limited)
//! GET    /uploads/*                 - Uploaded files
//! ```

pub mod auth;
pub mod images;
pub mod orders;
pub mod products;
pub mod public;
pub mod reviews;
pub mod stores;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post, put},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    auth_rate_limiter, checkout_rate_limiter, create_session_layer, request_id_middleware,
    security_headers_middleware, session::SessionStoreError,
};
use crate::services::media::UPLOADS_URL_PREFIX;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    if rate_limit {
        router.layer(auth_rate_limiter())
    } else {
        router
    }
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new().route("/", post(stores::create)).route(
        "/me",
        get(stores::show).put(stores::update).delete(stores::archive),
    )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route(
            "/{id}",
            get(orders::show)
                .put(orders::update_status)
                .delete(orders::delete),
        )
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(reviews::create))
        .route("/product/{id}", get(reviews::list_for_product))
        .route("/{id}", put(reviews::update).delete(reviews::delete))
}

/// Create the image upload router.
pub fn image_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/upload",
        post(images::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}

/// Create the public storefront router.
pub fn public_routes(rate_limit: bool) -> Router<AppState> {
    let checkout = if rate_limit {
        post(public::checkout).layer(checkout_rate_limiter())
    } else {
        post(public::checkout)
    };

    Router::new()
        .route("/{name}", get(public::storefront))
        .route("/{name}/orders", checkout)
}

/// Build the full application router with its middleware stack.
///
/// Sentry layers are added by the binary around the result.
///
/// # Errors
///
/// Returns `SessionStoreError` if the session store cannot be configured.
pub fn router(state: AppState) -> Result<Router, SessionStoreError> {
    let session_layer = create_session_layer(state.pool(), state.config())?;
    let rate_limit = state.config().rate_limit;
    let max_upload_bytes = state.config().max_upload_bytes;
    let uploads = ServeDir::new(&state.config().upload_dir);

    let api = Router::new()
        .nest("/auth", auth_routes(rate_limit))
        .nest("/stores", store_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/reviews", review_routes())
        .nest("/images", image_routes(max_upload_bytes));

    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api)
        .nest("/stores", public_routes(rate_limit))
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
