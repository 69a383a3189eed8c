use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    /// A business rule refused the operation (e.g. deleting the last Super Admin).
    #[error("Rule violation: {0}")]
    DomainRule(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// Validation error without per-field details.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn not_found(resource: &str, id: i64) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<ValidationDetail>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, vec![]),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, vec![]),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, vec![]),
            ApiError::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message,
                details,
            ),
            ApiError::DomainRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "rule_violation", msg, vec![])
            }
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg, vec![])
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
                vec![],
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                    vec![],
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                vec![],
            ),
        };

        let body = ErrorBody {
            error: error_code,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Conflict("Resource already exists".into()),
                Some("23503") => ApiError::validation("Referenced resource does not exist or is still in use"),
                Some("23514") => ApiError::validation("Value violates a data constraint"),
                _ => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = Vec::new();
        collect_details("", &errors, &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation { message, details }
    }
}

fn collect_details(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<ValidationDetail>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = match (prefix.is_empty(), *field) {
            // Struct-level (schema) errors are reported under `__all__`.
            (true, "__all__") => "body".to_string(),
            (true, f) => f.to_string(),
            (false, "__all__") => prefix.to_string(),
            (false, f) => format!("{}.{}", prefix, f),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| ValidationDetail {
                    field: path.clone(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_details(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(_) => {
                ApiError::PayloadTooLarge("Request body is too large".into())
            }
            other => ApiError::validation(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<domain::services::MenuRuleError> for ApiError {
    fn from(err: domain::services::MenuRuleError) -> Self {
        ApiError::DomainRule(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::validation("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::DomainRule("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::PayloadTooLarge("x".into()), StatusCode::PAYLOAD_TOO_LARGE),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::ServiceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let response = ApiError::Internal("password=hunter2".into()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_domain_rule_body() {
        let body = body_json(
            ApiError::DomainRule("Cannot delete the last Super Admin".into()).into_response(),
        )
        .await;
        assert_eq!(body["error"], "rule_violation");
        assert_eq!(body["message"], "Cannot delete the last Super Admin");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_validation_errors_carry_field_details() {
        let request: domain::models::AdvertisementRequest =
            serde_json::from_str(r#"{"title":"","frequency_cap_minutes":0}"#).unwrap();
        let error: ApiError = request.validate().unwrap_err().into();

        let body = body_json(error.into_response()).await;
        assert_eq!(body["error"], "validation_error");
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"frequency_cap_minutes"));
    }

    #[tokio::test]
    async fn test_schema_errors_reported_on_body() {
        let request: domain::models::AdvertisementRequest = serde_json::from_str(
            r#"{"title":"Sale","start_date":"2026-05-10T00:00:00Z","end_date":"2026-05-01T00:00:00Z"}"#,
        )
        .unwrap();
        let error: ApiError = request.validate().unwrap_err().into();
        let body = body_json(error.into_response()).await;
        assert_eq!(body["details"][0]["field"], "body");
        assert_eq!(body["message"], "start_date must not be after end_date");
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_not_found_helper() {
        assert_eq!(
            ApiError::not_found("Advertisement", 7).to_string(),
            "Not found: Advertisement 7 not found"
        );
    }
}
