use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diet_common::api::{ErrorDetail, ErrorResponse};
use diet_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(
        "no calorie budget left for this meal: estimated daily need {tdee:.0} kcal, \
         already consumed {consumed:.0} kcal"
    )]
    InfeasibleBudget { tdee: f64, consumed: f64 },

    #[error("config error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable error kind reported in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Common(CommonError::InsufficientData { .. }) => "insufficient_data",
            AppError::Common(CommonError::Schema(_) | CommonError::Csv(_)) => "schema_error",
            AppError::Common(CommonError::Io(_)) => "internal_error",
            AppError::Validation(_) => "validation_error",
            AppError::InfeasibleBudget { .. } => "infeasible_budget",
            AppError::Config(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InfeasibleBudget { .. }
            | AppError::Common(CommonError::InsufficientData { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        if status.is_server_error() {
            tracing::error!(kind, error = %self, "request failed");
        } else {
            tracing::warn!(kind, error = %self, "request rejected");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                kind: kind.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
