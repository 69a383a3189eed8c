//! Store domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::SortOrder;
use validator::Validate;

use super::common::BulkIdsRequest;

/// A merchant whose advertisements the bot delivers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_media_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Body of `POST /stores` and `PUT /stores/:id`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StoreRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,

    pub logo_media_id: Option<i64>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Sortable columns for the store list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreSortField {
    Name,
    #[default]
    CreatedAt,
}

impl StoreSortField {
    pub fn as_sql_column(&self) -> &'static str {
        match self {
            StoreSortField::Name => "name",
            StoreSortField::CreatedAt => "created_at",
        }
    }
}

/// Query string of `GET /stores`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StoreQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub sort: Option<StoreSortField>,
    pub order: Option<SortOrder>,
}

/// Body of `POST /stores/bulk-update`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkUpdateStoresRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub target: BulkIdsRequest,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_request_defaults_to_active() {
        let request: StoreRequest = serde_json::from_str(r#"{"name":"Corner Bakery"}"#).unwrap();
        assert!(request.is_active);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_store_request_rejects_blank_name() {
        let request: StoreRequest = serde_json::from_str(r#"{"name":"   "}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_store_query_sort_field() {
        let query: StoreQuery = serde_json::from_str(r#"{"sort":"name","order":"asc"}"#).unwrap();
        assert_eq!(query.sort.unwrap().as_sql_column(), "name");
        assert_eq!(query.order, Some(SortOrder::Asc));
        assert_eq!(StoreSortField::default().as_sql_column(), "created_at");
    }

    #[test]
    fn test_bulk_update_request_flattens_ids() {
        let request: BulkUpdateStoresRequest =
            serde_json::from_str(r#"{"ids":[4,5],"is_active":false}"#).unwrap();
        assert_eq!(request.target.ids, vec![4, 5]);
        assert!(!request.is_active);
        assert!(request.validate().is_ok());
    }
}
