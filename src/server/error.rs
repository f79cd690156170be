use crate::utils::error::{ErrorCategory, LabelError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl IntoResponse for LabelError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self.category() {
            ErrorCategory::Input => (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string()),
            ErrorCategory::Spreadsheet => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UnreadableSpreadsheet",
                self.to_string(),
            ),
            ErrorCategory::Rendering
            | ErrorCategory::Storage
            | ErrorCategory::Configuration
            | ErrorCategory::Internal => {
                tracing::error!("Internal error ({:?}): {}", self.category(), self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let violations = match &self {
            LabelError::ValidationError { violations } => json!(violations),
            _ => json!([]),
        };

        let body = Json(json!({
            "error": code,
            "message": message,
            "violations": violations,
        }));

        (status, body).into_response()
    }
}
