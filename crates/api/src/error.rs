use axum::{
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

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    InvalidFields(Vec<ValidationDetail>),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    /// A list query failed. Only the resource name reaches the client.
    #[error("Failed to fetch {resource}: {detail}")]
    FetchFailed {
        resource: &'static str,
        detail: String,
    },
}

/// Internal error detail attached to 500 responses.
///
/// The body never carries it; `middleware::expose_error_detail` swaps it in
/// when running in development.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// Maps a store failure in a list endpoint to a generic "Failed to fetch"
/// error. Client errors (404, 409, 400) pass through unchanged.
pub fn fetch_failed(resource: &'static str) -> impl FnOnce(sqlx::Error) -> ApiError {
    move |err| match ApiError::from(err) {
        ApiError::Internal(detail) => ApiError::FetchFailed { resource, detail },
        other => other,
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut detail = None;
        let (status, message, errors) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::InvalidFields(details) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(details),
            ),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests. Please try again later.".to_string(),
                None,
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                detail = Some(msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::FetchFailed {
                resource,
                detail: msg,
            } => {
                tracing::error!(resource, "Failed to fetch: {}", msg);
                detail = Some(msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to fetch {}", resource),
                    None,
                )
            }
        };

        let body = ErrorBody {
            success: false,
            message,
            errors,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(InternalErrorDetail(detail));
        }
        response
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Conflict("Resource already exists".into()),
                Some("23503") => ApiError::Validation("Referenced record does not exist".into()),
                Some("23514") => ApiError::Validation("Value violates a data constraint".into()),
                _ => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                let field = api_field_name(&field.to_string());
                errors.iter().map(move |e| ValidationDetail {
                    field: field.clone(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::InvalidFields(details)
    }
}

/// Struct-level errors are reported against the request body.
fn api_field_name(field: &str) -> String {
    if field == "__all__" {
        return "body".to_string();
    }
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_api_error_status_codes() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidFields(vec![]), StatusCode::BAD_REQUEST),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::FetchFailed {
                    resource: "leases",
                    detail: "x".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let body = body_json(ApiError::Conflict("Lease overlaps".into()).into_response()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Lease overlaps");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let body =
            body_json(ApiError::Internal("connection refused".into()).into_response()).await;
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_fetch_failed_hides_store_detail() {
        let error = fetch_failed("bills")(sqlx::Error::PoolTimedOut);
        assert!(matches!(
            error,
            ApiError::FetchFailed {
                resource: "bills",
                ..
            }
        ));

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<InternalErrorDetail>().cloned();
        assert!(detail.is_some_and(|d| d.0.contains("pool timed out")));

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to fetch bills");
    }

    #[test]
    fn test_fetch_failed_keeps_client_errors() {
        let error = fetch_failed("flats")(sqlx::Error::RowNotFound);
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(
            format!("{}", ApiError::NotFound("test".to_string())),
            "Not found: test"
        );
        assert_eq!(format!("{}", ApiError::RateLimited), "Rate limited");
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_api_field_name() {
        assert_eq!(api_field_name("monthly_rent"), "monthlyRent");
        assert_eq!(api_field_name("email"), "email");
        assert_eq!(api_field_name("__all__"), "body");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "firstName is required"))]
        first_name: String,
        #[validate(range(min = 1))]
        floor_count: i32,
    }

    #[tokio::test]
    async fn test_from_validation_errors() {
        let sample = Sample {
            first_name: String::new(),
            floor_count: 0,
        };
        let error: ApiError = sample.validate().unwrap_err().into();
        let body = body_json(error.into_response()).await;

        assert_eq!(body["success"], false);
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "firstName");
        assert_eq!(errors[0]["message"], "firstName is required");
        assert_eq!(errors[1]["field"], "floorCount");
        assert_eq!(errors[1]["message"], "floorCount is invalid");
    }
}
