//! Content page route handlers.
//!
//! Serves the markdown-based shop pages (shipping, returns, terms, and
//! friends) as rendered JSON payloads.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Summary entry in the page listing.
#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
}

/// Full rendered page payload.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDate>,
    pub html: String,
}

/// List all content pages.
///
/// # Route
///
/// `GET /pages`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<PageSummary>> {
    let mut pages: Vec<PageSummary> = state
        .content()
        .get_all_pages()
        .map(|page| PageSummary {
            slug: page.slug.clone(),
            title: page.meta.title.clone(),
            description: page.meta.description.clone(),
        })
        .collect();
    pages.sort_by(|a, b| a.slug.cmp(&b.slug));

    Json(pages)
}

/// Serve one content page by slug.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
///
/// # Route
///
/// `GET /pages/{slug}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PageView>> {
    let page = state
        .content()
        .get_page(&slug)
        .ok_or_else(|| AppError::NotFound("Page not found.".to_string()))?;

    Ok(Json(PageView {
        slug: page.slug.clone(),
        title: page.meta.title.clone(),
        description: page.meta.description.clone(),
        updated_at: page.meta.updated_at,
        html: page.content_html.clone(),
    }))
}
