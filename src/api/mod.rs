//! REST API module.
//!
//! Contains the response envelopes, pagination helpers, and all route
//! handlers.

mod contact;
mod feedback;

pub use contact::*;
pub use feedback::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;

/// 201 response for a newly stored record.
pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(ApiResponse {
        status: StatusCode::CREATED,
        success: true,
        message: Some(message.into()),
        data,
        pagination: None,
    })
}

/// Plain 200 response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse {
        status: StatusCode::OK,
        success: true,
        message: None,
        data,
        pagination: None,
    })
}

/// 200 response for one page of a collection.
pub fn page<T: Serialize>(data: Vec<T>, pagination: Pagination) -> ApiResult<Vec<T>> {
    Ok(ApiResponse {
        status: StatusCode::OK,
        success: true,
        message: None,
        data,
        pagination: Some(pagination),
    })
}

/// Pagination query parameters, kept as raw strings so malformed input
/// falls back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Pagination metadata returned alongside a page of records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 50;

/// Slice one page out of a full collection.
///
/// `page` defaults to 1 (minimum 1), `limit` defaults to 10 and is
/// clamped to [1, 50]. An out-of-range page is silently clamped to the
/// last page rather than erroring.
pub fn paginate<T>(items: Vec<T>, query: &PageQuery) -> (Vec<T>, Pagination) {
    let limit = parse_integer(query.limit.as_deref())
        .unwrap_or(DEFAULT_PAGE_SIZE as i64)
        .clamp(1, MAX_PAGE_SIZE as i64) as usize;

    let requested = parse_integer(query.page.as_deref()).unwrap_or(1).max(1) as usize;

    let total_items = items.len();
    let total_pages = total_items.div_ceil(limit).max(1);
    let page = requested.min(total_pages);
    let start = (page - 1) * limit;

    let data = items.into_iter().skip(start).take(limit).collect();
    let pagination = Pagination {
        page,
        limit,
        total_items,
        total_pages,
    };

    (data, pagination)
}

/// Coerce a query value to an integer; fractional numbers truncate
/// toward zero, anything non-numeric reads as absent.
fn parse_integer(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|v| v.trunc() as i64))
}
