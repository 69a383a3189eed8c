//! Advertisement domain model.
//!
//! An advertisement is a promotional message delivered to bot users inside
//! its active window, at most once per `frequency_cap_minutes` per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::SortOrder;
use validator::{Validate, ValidationError};

use super::common::BulkIdsRequest;

/// Default spacing between two sends of one advertisement to one user.
pub const DEFAULT_FREQUENCY_CAP_MINUTES: i32 = 1440;

/// Publication status of an advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvertisementStatus {
    Active,
    Inactive,
}

impl AdvertisementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvertisementStatus::Active => "active",
            AdvertisementStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for AdvertisementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdvertisementStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AdvertisementStatus::Active),
            "inactive" => Ok(AdvertisementStatus::Inactive),
            other => Err(format!("Unknown advertisement status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Advertisement {
    pub id: i64,
    pub store_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub media_id: Option<i64>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: AdvertisementStatus,
    pub frequency_cap_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Advertisement {
    /// True when `now` falls inside the active window (open ends allowed).
    pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
        self.start_date.map_or(true, |start| start <= now)
            && self.end_date.map_or(true, |end| end >= now)
    }

    /// True when the advertisement may be delivered at `now`.
    pub fn is_deliverable(&self, now: DateTime<Utc>) -> bool {
        self.status == AdvertisementStatus::Active && self.is_within_window(now)
    }

    /// True when the window has closed for good.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end_date.is_some_and(|end| end < now)
    }

    /// Earliest moment a delivery job for this advertisement should run.
    pub fn first_delivery_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.start_date {
            Some(start) if start > now => start,
            _ => now,
        }
    }

    /// Returns true when a change from `self` to `updated` touches a field
    /// that governs delivery, so previously queued jobs are stale.
    pub fn delivery_changed(&self, updated: &Advertisement) -> bool {
        self.status != updated.status
            || self.start_date != updated.start_date
            || self.end_date != updated.end_date
            || self.frequency_cap_minutes != updated.frequency_cap_minutes
    }
}

fn default_status() -> AdvertisementStatus {
    AdvertisementStatus::Active
}

fn default_frequency_cap() -> i32 {
    DEFAULT_FREQUENCY_CAP_MINUTES
}

/// Body of `POST /advertisements` and `PUT /advertisements/:id`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_advertisement_request"))]
pub struct AdvertisementRequest {
    pub store_id: Option<i64>,

    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub title: String,

    #[validate(length(max = 1024, message = "Description must be at most 1024 characters"))]
    pub description: Option<String>,

    pub media_id: Option<i64>,

    #[validate(length(min = 1, max = 64, message = "Button text must be 1-64 characters"))]
    pub button_text: Option<String>,

    #[validate(
        length(max = 2048, message = "Button URL must be at most 2048 characters"),
        custom(function = "shared::validation::validate_http_url")
    )]
    pub button_url: Option<String>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default = "default_status")]
    pub status: AdvertisementStatus,

    #[serde(default = "default_frequency_cap")]
    #[validate(range(
        min = 1,
        max = 525600,
        message = "Frequency cap must be between 1 minute and 1 year"
    ))]
    pub frequency_cap_minutes: i32,
}

fn validate_advertisement_request(request: &AdvertisementRequest) -> Result<(), ValidationError> {
    shared::validation::validate_date_window(request.start_date, request.end_date)?;

    if request.button_text.is_some() != request.button_url.is_some() {
        let mut err = ValidationError::new("button_pair");
        err.message = Some("button_text and button_url must be provided together".into());
        return Err(err);
    }
    Ok(())
}

/// Sortable columns for the advertisement list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvertisementSortField {
    Title,
    StartDate,
    EndDate,
    #[default]
    CreatedAt,
}

impl AdvertisementSortField {
    pub fn as_sql_column(&self) -> &'static str {
        match self {
            AdvertisementSortField::Title => "title",
            AdvertisementSortField::StartDate => "start_date",
            AdvertisementSortField::EndDate => "end_date",
            AdvertisementSortField::CreatedAt => "created_at",
        }
    }
}

/// Query string of `GET /advertisements`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdvertisementQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub status: Option<AdvertisementStatus>,
    pub store_id: Option<i64>,
    pub sort: Option<AdvertisementSortField>,
    pub order: Option<SortOrder>,
}

/// Body of `POST /advertisements/bulk-update`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkUpdateAdvertisementsRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub target: BulkIdsRequest,
    pub status: AdvertisementStatus,
}

/// One delivered advertisement, as listed by `GET /advertisements/:id/sends`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvertisementSend {
    pub id: i64,
    pub advertisement_id: i64,
    pub telegram_user_id: i64,
    pub sent_at: DateTime<Utc>,
}

/// Query string of `GET /advertisements/:id/sends`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SendHistoryQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u32>,
    pub telegram_user_id: Option<i64>,
}
