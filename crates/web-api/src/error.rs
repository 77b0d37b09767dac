use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::ApplicationError as AppErr;
        use domain::DomainError;

        match error {
            AppErr::Domain(DomainError::PermissionDenied { action }) => ApiError::new(
                StatusCode::FORBIDDEN,
                "PERMISSION_DENIED",
                format!("permission denied: {}", action),
            ),
            AppErr::Domain(DomainError::ResourceNotFound {
                resource_type,
                resource_id,
            }) => ApiError::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} {} not found", resource_type, resource_id),
            ),
            AppErr::Domain(DomainError::ValidationError { field, message }) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("{}: {}", field, message),
            ),
            AppErr::Domain(DomainError::StorageError { message }) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                format!("storage error: {}", message),
            ),
            AppErr::Authorization { reason } => {
                ApiError::new(StatusCode::FORBIDDEN, "AUTHORIZATION_FAILED", reason)
            }
            AppErr::Forward(err) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "BRIDGE_ERROR",
                format!("bridge error: {}", err),
            ),
            AppErr::Subscription(message) => {
                ApiError::new(StatusCode::BAD_REQUEST, "SUBSCRIPTION_ERROR", message)
            }
            AppErr::Infrastructure(message) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INFRASTRUCTURE_ERROR",
                message,
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
