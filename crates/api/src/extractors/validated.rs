//! JSON body and query string extractors that run `validator` rules.

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body, deserialized and validated. Both failures answer 422.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string, deserialized and validated.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1))]
        name: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Paging {
        #[validate(range(min = 1))]
        page: Option<u32>,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            post(
                |ValidatedQuery(q): ValidatedQuery<Paging>, ValidatedJson(p): ValidatedJson<Payload>| async move {
                    format!("{}:{}", p.name, q.page.unwrap_or(1)).into_response()
                },
            ),
        )
    }

    async fn status(uri: &str, body: &str) -> StatusCode {
        app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_accepts_valid_input() {
        assert_eq!(status("/?page=2", r#"{"name":"ok"}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_invalid_input() {
        assert_eq!(
            status("/", r#"{"name":""}"#).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status("/", r#"{"name":"#).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status("/?page=0", r#"{"name":"ok"}"#).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
