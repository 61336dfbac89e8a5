use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::data::models::{ReviewError, SchedulerError};

impl ReviewError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReviewError::Scheduler(SchedulerError::InvalidQuality(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ReviewError::Scheduler(SchedulerError::InvalidState(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ReviewError::NotFound(_) => StatusCode::NOT_FOUND,
            ReviewError::Conflict(_) => StatusCode::CONFLICT,
            ReviewError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ReviewError::DatabaseError(_) | ReviewError::PoolError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ReviewError::DatabaseError(e) => {
                log::error!("Database error: {}", e);
                format!("Database error: {}", e)
            }
            ReviewError::Scheduler(SchedulerError::InvalidState(_)) => {
                log::error!("{}", self);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = json!({
            "error": message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}
