//! Integration tests for the Pnoh storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront
//! cargo run -p pnoh-storefront
//!
//! # Run integration tests
//! cargo test -p pnoh-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - Catalog, cart, checkout, and order flows over HTTP
//!
//! # Future Implementation
//!
//! ```rust,ignore
//! use reqwest::Client;
//!
//! pub struct TestContext {
//!     pub client: Client,
//!     pub storefront_url: String,
//! }
//!
//! impl TestContext {
//!     pub async fn new() -> Self {
//!         // Load test configuration
//!         // Spawn the storefront on an ephemeral port
//!     }
//! }
//!
//! #[tokio::test]
//! async fn test_storefront_health() {
//!     let ctx = TestContext::new().await;
//!     let resp = ctx.client
//!         .get(format!("{}/health", ctx.storefront_url))
//!         .send()
//!         .await
//!         .unwrap();
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

// TODO: Implement a TestContext that spawns the storefront on an ephemeral port
