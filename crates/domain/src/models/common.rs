//! Payloads shared by several resources.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /<resource>/bulk-delete`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkIdsRequest {
    #[validate(custom(function = "shared::validation::validate_bulk_ids"))]
    pub ids: Vec<i64>,
}

/// Result of a bulk update or delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkActionResponse {
    pub affected: u64,
}

/// Body returned by single-row deletes that succeed.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Deduplicates bulk ids while keeping their first-seen order.
pub fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
