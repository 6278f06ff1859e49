//! Contact API endpoints.

use axum::{
    extract::{Query, State},
    Json,
};

use super::{created, page, paginate, ApiResult, PageQuery};
use crate::errors::AppError;
use crate::models::{Contact, ContactSubmission};
use crate::validation;
use crate::AppState;

/// POST /api/contact - Submit a contact form.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> ApiResult<Contact> {
    let contact = validation::validate_contact(submission).map_err(AppError::Validation)?;

    match state.store.append(contact).await {
        Ok(saved) => created("Contact saved successfully", saved),
        Err(err) => {
            tracing::error!("Failed to save contact: {}", err);
            Err(AppError::Storage("Unable to save contact".to_string()))
        }
    }
}

/// GET /api/contact - List contact submissions, paginated.
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Vec<Contact>> {
    let contacts: Vec<Contact> = state.store.load().await;
    let (data, pagination) = paginate(contacts, &params);
    page(data, pagination)
}
