use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use leaderboard_types::api::ProblemDetails;
use leaderboard_types::validation::ValidationErrors;
use tokio::task::JoinError;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("entry not found")]
    NotFound,

    #[error("store error: {0:#}")]
    Store(anyhow::Error),

    #[error("blocking task failed: {0}")]
    Task(#[from] JoinError),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(ValidationErrors::single("path", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(ValidationErrors::single("query", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ProblemDetails {
                    title: "One or more validation errors occurred.".to_string(),
                    status: StatusCode::BAD_REQUEST.as_u16(),
                    errors: errors.into_map(),
                }),
            )
                .into_response(),
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Store(e) => {
                error!("Store error: {:#}", e);
                server_error()
            }
            Self::Task(e) => {
                error!("spawn_blocking join error: {}", e);
                server_error()
            }
        }
    }
}

// Internals stay in the log, not the response.
fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ProblemDetails {
            title: "An error occurred while processing your request.".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            errors: Default::default(),
        }),
    )
        .into_response()
}
