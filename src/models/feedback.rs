//! Feedback record, submission model, and rating aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::Collection;

/// A stored feedback submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub rating: i64,
    pub comment: String,
    pub email: Option<String>,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub created_at: String,
}

impl Collection for Feedback {
    const NAME: &'static str = "feedback";

    fn stamp(&mut self, id: u64, created_at: String) {
        self.id = id;
        self.created_at = created_at;
    }
}

/// Raw feedback request body, before validation.
///
/// Fields are loosely typed as JSON values so type mismatches surface
/// as validation errors rather than deserialization failures; `rating`
/// accepts a JSON number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub rating: Option<serde_json::Value>,
    #[serde(default)]
    pub comment: Option<serde_json::Value>,
    #[serde(default)]
    pub email: Option<serde_json::Value>,
}

/// Aggregate statistics over a feedback collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total_feedback: usize,
    pub average_rating: f64,
    pub rating_counts: BTreeMap<i64, u64>,
}

/// Compute count, average, and per-rating histogram for a collection.
///
/// An empty collection yields zeros and an empty histogram without
/// dividing.
pub fn feedback_stats(records: &[Feedback]) -> FeedbackStats {
    let total = records.len();
    if total == 0 {
        return FeedbackStats {
            total_feedback: 0,
            average_rating: 0.0,
            rating_counts: BTreeMap::new(),
        };
    }

    let mut rating_counts: BTreeMap<i64, u64> = BTreeMap::new();
    for record in records {
        *rating_counts.entry(record.rating).or_insert(0) += 1;
    }

    let sum: i64 = rating_counts
        .iter()
        .map(|(rating, count)| rating * *count as i64)
        .sum();
    let average_rating = (sum as f64 / total as f64 * 100.0).round() / 100.0;

    FeedbackStats {
        total_feedback: total,
        average_rating,
        rating_counts,
    }
}
