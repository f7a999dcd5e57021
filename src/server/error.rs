use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::pipeline::EvalError;
use crate::survey::SurveyError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Survey(#[from] SurveyError),

    #[error("invalid form submission: {0}")]
    Form(#[from] FormRejection),

    #[error(transparent)]
    Evaluation(#[from] EvalError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Survey(SurveyError::InvalidRating { .. }) => StatusCode::BAD_REQUEST,
            AppError::Form(rejection) => rejection.status(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client. Storage failures stay in the log.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Survey(SurveyError::InvalidRating { .. }) | AppError::NotFound(_) => {
                self.to_string()
            }
            AppError::Form(rejection) => rejection.body_text(),
            AppError::Survey(_) => "failed to save survey response".to_string(),
            AppError::Evaluation(err) => err.to_string(),
            AppError::Task(_) => "internal error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}
