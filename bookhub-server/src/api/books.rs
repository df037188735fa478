//! Catalog endpoints: listing, lookup, search, best sellers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::Book;
use shared::response::{ApiResponse, PagedResponse};

use crate::db;
use crate::state::AppState;

use super::ApiResult;

const DEFAULT_PAGE_SIZE: u32 = 8;
const MAX_PAGE_SIZE: u32 = 100;
const BEST_SELLER_COUNT: i64 = 5;

/// GET /books
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub end_date: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn list_books(
    State(state): State<AppState>,
    Query(q): Query<ListBooksQuery>,
) -> ApiResult<PagedResponse<Book>> {
    let page = q.page.unwrap_or(1).max(1);
    let limit = q.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let filters = db::books::BookFilters {
        search: q.search.filter(|s| !s.trim().is_empty()),
        category: q.category.filter(|s| !s.trim().is_empty()),
        author: q.author.filter(|s| !s.trim().is_empty()),
        created_after: q.start_date.as_deref().and_then(day_start_millis),
        created_before: q.end_date.as_deref().and_then(day_end_millis),
        price_min: q.price_min,
        price_max: q.price_max,
    };

    let total = db::books::count_filtered(&state.pool, &filters).await?;
    let offset = i64::from(page - 1) * i64::from(limit);
    let books = db::books::list_filtered(&state.pool, &filters, i64::from(limit), offset).await?;

    Ok(Json(PagedResponse::new(books, page, limit, total as u64)))
}

/// GET /books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<Book>> {
    let book = db::books::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BookNotFound))?;
    Ok(Json(ApiResponse::success(book)))
}

/// GET /books/search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<ApiResponse<Vec<Book>>> {
    let raw = query.q.unwrap_or_default();
    let books = db::books::search_ranked(&state.pool, &raw).await?;
    Ok(Json(ApiResponse::success(books)))
}

/// GET /books/best-sellers
///
/// Ranks by historical order-line count. A store without any sales yet
/// answers with a random sample and `fallback: true` so the storefront can
/// label the shelf accordingly.
#[derive(Debug, Serialize)]
pub struct BestSellersResponse {
    pub success: bool,
    pub data: Vec<Book>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

pub async fn best_sellers(State(state): State<AppState>) -> ApiResult<BestSellersResponse> {
    let ranked = db::books::top_sellers(&state.pool, BEST_SELLER_COUNT).await?;
    let response = if ranked.is_empty() {
        let sample = db::books::random_sample(&state.pool, BEST_SELLER_COUNT).await?;
        BestSellersResponse {
            success: true,
            data: sample,
            fallback: Some(true),
        }
    } else {
        BestSellersResponse {
            success: true,
            data: ranked,
            fallback: None,
        }
    };
    Ok(Json(response))
}

/// Start of the given UTC day in epoch milliseconds. Unparseable dates are
/// treated as absent rather than failing the whole request.
fn day_start_millis(s: &str) -> Option<i64> {
    let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

/// Start of the day after the given UTC day, for use as an exclusive upper
/// bound on `created_at`.
fn day_end_millis(s: &str) -> Option<i64> {
    let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let next = date.checked_add_days(chrono::Days::new(1))?;
    Some(next.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}
