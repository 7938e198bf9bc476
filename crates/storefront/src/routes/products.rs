//! Product catalog route handlers.
//!
//! The catalog is seeded in memory and immutable for the process
//! lifetime, so every product response carries a public one-hour cache
//! header. Category and sub-category listings are tiny enum dumps and
//! skip the header.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pnoh_core::{Category, ProductId, SubCategory};

use crate::catalog::{DEFAULT_PAGE_SIZE, Product};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Cache policy for catalog payloads. The catalog only changes on deploy.
const CATALOG_CACHE_CONTROL: &str = "public, max-age=3600";

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
}

impl PageQuery {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

fn cached<T: Serialize>(payload: T) -> Response {
    (
        [(header::CACHE_CONTROL, CATALOG_CACHE_CONTROL)],
        Json(payload),
    )
        .into_response()
}

// ============================================================================
// Catalog listings
// ============================================================================

/// List a page of the full catalog.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(page): Query<PageQuery>) -> Response {
    let products = state.catalog().page(page.skip, page.limit());
    cached(products)
}

/// Fetch a single product by id.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Response> {
    let product = state
        .catalog()
        .by_id(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

    Ok(cached(product))
}

/// List a page of products in a category.
#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<Category>,
    Query(page): Query<PageQuery>,
) -> Result<Response> {
    let products = state
        .catalog()
        .by_category(category, page.skip, page.limit());
    if products.is_empty() {
        return Err(AppError::NotFound(
            "No products found for this category.".to_string(),
        ));
    }

    Ok(cached(products))
}

/// List a page of products in a sub-category.
#[instrument(skip(state))]
pub async fn by_subcategory(
    State(state): State<AppState>,
    Path(sub_category): Path<SubCategory>,
    Query(page): Query<PageQuery>,
) -> Result<Response> {
    let products = state
        .catalog()
        .by_subcategory(sub_category, page.skip, page.limit());
    if products.is_empty() {
        return Err(AppError::NotFound(
            "No products found for this subcategory.".to_string(),
        ));
    }

    Ok(cached(products))
}

/// List a page of products matching both a category and a sub-category.
#[instrument(skip(state))]
pub async fn by_category_and_subcategory(
    State(state): State<AppState>,
    Path((category, sub_category)): Path<(Category, SubCategory)>,
    Query(page): Query<PageQuery>,
) -> Result<Response> {
    let products =
        state
            .catalog()
            .by_category_and_subcategory(category, sub_category, page.skip, page.limit());
    if products.is_empty() {
        return Err(AppError::NotFound("No products found.".to_string()));
    }

    Ok(cached(products))
}

// ============================================================================
// Enum listings and search
// ============================================================================

/// List all category slugs.
pub async fn categories() -> Json<Vec<&'static str>> {
    Json(Category::ALL.map(Category::as_str).to_vec())
}

/// List all sub-category slugs.
pub async fn subcategories() -> Json<Vec<&'static str>> {
    Json(SubCategory::ALL.map(SubCategory::as_str).to_vec())
}

/// Search products by name, description, or category.
///
/// Always answers with an array; a blank or missing query yields an
/// empty one so storefront search boxes degrade quietly.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Product>> {
    let results = query
        .q
        .as_deref()
        .map_or_else(Vec::new, |q| state.catalog().search(q));

    Json(results)
}
