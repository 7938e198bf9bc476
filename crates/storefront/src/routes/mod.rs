//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog loaded)
//!
//! # Catalog
//! GET  /products               - Product listing (paginated)
//! GET  /products/{id}          - Product detail
//! GET  /products/category/{category}                            - Category listing
//! GET  /products/subcategory/{sub_category}                     - Sub-category listing
//! GET  /products/category/{category}/subcategory/{sub_category} - Combined listing
//! GET  /categories             - Category slugs
//! GET  /subcategories          - Sub-category slugs
//! GET  /search?q=              - Product search
//!
//! # Cart (session-backed)
//! GET  /cart                   - Cart contents with totals
//! GET  /cart/count             - Unit count badge
//! POST /cart/add               - Add a product
//! POST /cart/update            - Set a line's quantity (0 removes)
//! POST /cart/remove            - Remove a product
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout (session-backed)
//! GET  /checkout               - Full checkout view
//! POST /checkout/shipping      - Update shipping fields
//! POST /checkout/billing       - Update billing fields
//! POST /checkout/shipping-method  - Select shipping method
//! POST /checkout/payment-method   - Select payment method
//! POST /checkout/notes         - Replace order notes
//! POST /checkout/next          - Advance (422 when step incomplete)
//! POST /checkout/previous      - Step back
//! POST /checkout/reset         - Restore defaults
//! GET  /checkout/shipping-methods - Quotes for the session country
//!
//! # Payment & orders API
//! POST /api/checkout/session   - Create mock payment session (auth)
//! POST /api/orders             - Place order (auth)
//! GET  /api/orders             - Order history (auth)
//! POST /api/stripe/webhook     - Webhook receiver (ack only)
//!
//! # Auth (hosted provider pages)
//! GET  /auth/sign-in           - Redirect to hosted sign-in
//! GET  /auth/sign-up           - Redirect to hosted sign-up
//! GET  /auth/callback          - Provider callback (state check, cart merge)
//! POST /auth/sign-out          - Park cart, destroy session
//!
//! # Account (requires auth)
//! GET  /account                - Profile view
//! POST /account/profile        - Update names via provider
//! GET  /account/orders         - Order history
//!
//! # Content
//! GET  /pages                  - Page listing
//! GET  /pages/{slug}           - Rendered page
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod pages;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    api_rate_limiter, auth_rate_limiter, create_session_layer, request_id_middleware,
};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/category/{category}", get(products::by_category))
        .route("/subcategory/{sub_category}", get(products::by_subcategory))
        .route(
            "/category/{category}/subcategory/{sub_category}",
            get(products::by_category_and_subcategory),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/shipping", post(checkout::update_shipping))
        .route("/billing", post(checkout::update_billing))
        .route("/shipping-method", post(checkout::set_shipping_method))
        .route("/payment-method", post(checkout::set_payment_method))
        .route("/notes", post(checkout::set_notes))
        .route("/next", post(checkout::next_step))
        .route("/previous", post(checkout::previous_step))
        .route("/reset", post(checkout::reset))
        .route("/shipping-methods", get(checkout::shipping_method_quotes))
}

/// Create the auth routes router (strictly rate limited).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", get(auth::sign_in))
        .route("/sign-up", get(auth::sign_up))
        .route("/callback", get(auth::callback))
        .route("/sign-out", post(auth::sign_out))
        .layer(auth_rate_limiter())
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show))
        .route("/profile", post(account::update_profile))
        .route("/orders", get(account::orders))
}

/// Create the JSON API router.
///
/// Payment-session creation shares the strict auth limiter; the rest of
/// the API group uses the general one.
pub fn api_routes() -> Router<AppState> {
    let payments = Router::new()
        .route("/checkout/session", post(api::payments::create_session))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/orders", get(api::orders::list).post(api::orders::place))
        .route("/stripe/webhook", post(api::payments::stripe_webhook))
        .layer(api_rate_limiter())
        .merge(payments)
}

/// Create the content pages router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/{slug}", get(pages::show))
}

/// Create all business routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .nest("/products", product_routes())
        .route("/categories", get(products::categories))
        .route("/subcategories", get(products::subcategories))
        .route("/search", get(products::search))
        // Session-backed cart and checkout
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        // Payment and order API
        .nest("/api", api_routes())
        // Auth and account
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        // Content pages
        .nest("/pages", page_routes())
}

/// Assemble the application router with the session, request-id, and
/// trace layers applied.
///
/// Sentry layers are attached in `main` so they sit outermost.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog is loaded.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.catalog().is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::config::{ClerkConfig, StorefrontConfig};

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            clerk: ClerkConfig {
                publishable_key: "pk_test_cG5vaC5nciQ".to_string(),
                secret_key: SecretString::from("sk_test_J9fJk2mQ7xR4vT8w"),
                portal_url: "https://accounts.pnoh.gr".to_string(),
                api_url: "https://api.clerk.com/v1".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    fn test_state() -> AppState {
        let content_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("content");
        AppState::new(test_config(), &content_dir).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, payload: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let app = app(test_state());

        let response = app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_readiness_with_seeded_catalog() {
        let app = app(test_state());

        let response = app.oneshot(get("/health/ready")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_product_listing_is_cached_json() {
        let app = app(test_state());

        let response = app.oneshot(get("/products")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=3600"
        );
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_unknown_product_is_404_with_message() {
        let app = app(test_state());
        let uri = format!("/products/{}", uuid::Uuid::new_v4());

        let response = app.oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Product not found.");
    }

    #[tokio::test]
    async fn test_search_without_query_is_empty() {
        let app = app(test_state());

        let response = app.oneshot(get("/search")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_cart_session_cookie_round_trip() {
        let state = test_state();
        let product = state.catalog().page(0, 1).into_iter().next().unwrap();
        let app = app(state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/cart/add",
                &json!({ "product_id": product.id, "quantity": 2 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The session cookie from the first response must carry the cart
        // into the second request.
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let request = Request::builder()
            .uri("/cart/count")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_cart_without_cookie_starts_empty() {
        let app = app(test_state());

        let response = app.oneshot(get("/cart")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["items"], json!([]));
        assert_eq!(body["totals"]["item_count"], 0);
    }

    #[tokio::test]
    async fn test_checkout_next_rejects_incomplete_step() {
        let app = app(test_state());

        let response = app
            .oneshot(post_json("/checkout/next", &json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Please complete all required fields for this step."
        );
    }

    #[tokio::test]
    async fn test_api_orders_requires_auth() {
        let app = app(test_state());

        let response = app
            .oneshot(post_json("/api/orders", &json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_checkout_session_requires_auth() {
        let app = app(test_state());

        let response = app
            .oneshot(post_json("/api/checkout/session", &json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_account_redirects_anonymous_visitors() {
        let app = app(test_state());

        let response = app.oneshot(get("/account")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/sign-in"
        );
    }

    #[tokio::test]
    async fn test_stripe_webhook_acknowledges() {
        let app = app(test_state());

        let response = app
            .oneshot(post_json(
                "/api/stripe/webhook",
                &json!({ "type": "checkout.session.completed" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["received"], true);
    }

    #[tokio::test]
    async fn test_sign_in_redirects_to_hosted_portal() {
        let app = app(test_state());

        let response = app.oneshot(get("/auth/sign-in")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.starts_with("https://accounts.pnoh.gr/sign-in?"));
    }

    #[tokio::test]
    async fn test_pages_index_is_sorted_by_slug() {
        let app = app(test_state());

        let response = app.oneshot(get("/pages")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let slugs: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|page| page["slug"].as_str().unwrap())
            .collect();
        assert_eq!(
            slugs,
            vec![
                "about",
                "contact",
                "payments",
                "privacy-policy",
                "returns",
                "shipping",
                "terms-conditions",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_page_is_404_with_message() {
        let app = app(test_state());

        let response = app.oneshot(get("/pages/careers")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Page not found.");
    }
}
