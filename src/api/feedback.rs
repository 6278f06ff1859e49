//! Feedback API endpoints.

use axum::{extract::State, Json};

use super::{created, ok, ApiResult};
use crate::errors::AppError;
use crate::models::{feedback_stats, Feedback, FeedbackStats, FeedbackSubmission};
use crate::validation;
use crate::AppState;

/// POST /api/feedback - Submit feedback.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(submission): Json<FeedbackSubmission>,
) -> ApiResult<Feedback> {
    let feedback = validation::validate_feedback(submission).map_err(AppError::Validation)?;

    match state.store.append(feedback).await {
        Ok(saved) => created("Feedback saved successfully", saved),
        Err(err) => {
            tracing::error!("Failed to save feedback: {}", err);
            Err(AppError::Storage("Unable to save feedback".to_string()))
        }
    }
}

/// GET /api/feedback/stats - Aggregate rating statistics.
pub async fn get_feedback_stats(State(state): State<AppState>) -> ApiResult<FeedbackStats> {
    let records: Vec<Feedback> = state.store.load().await;
    ok(feedback_stats(&records))
}
