use api_types::{ApiResponse, ErrorType};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{Category, EngineError};

pub use server::{ServeOptions, ServerState, UserId, router, run_with_listener};

mod budget;
mod cooking;
mod derived;
mod extract;
mod inbox;
mod months;
mod recipes;
mod server;
mod service;
mod todos;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    /// A request the extractors could not read.
    Rejected {
        error: &'static str,
        details: String,
    },
}

fn status_for_engine_error(err: &EngineError) -> (StatusCode, ErrorType) {
    match err {
        EngineError::MissingFields(_)
        | EngineError::InvalidCategory(_)
        | EngineError::InvalidValue(_)
        | EngineError::InvalidMonthKey(_) => (StatusCode::BAD_REQUEST, ErrorType::ValidationError),
        EngineError::NotFound { .. } => (StatusCode::NOT_FOUND, ErrorType::NotFound),
        EngineError::Forbidden(_) => (StatusCode::FORBIDDEN, ErrorType::Forbidden),
        EngineError::InvalidRecord(_) | EngineError::Database(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorType::DatabaseError)
        }
    }
}

/// Short error and details of a failed response.
fn message_for_engine_error(err: EngineError) -> (String, String) {
    match err {
        EngineError::MissingFields(fields) => (
            "Missing required fields".to_string(),
            format!("Required fields: {}", fields.join(", ")),
        ),
        EngineError::InvalidCategory(received) => (
            "Invalid category".to_string(),
            format!(
                "Category must be one of: {}. Received: {received}",
                Category::ALL.map(Category::as_str).join(", ")
            ),
        ),
        EngineError::InvalidValue(details) => ("Invalid value".to_string(), details),
        EngineError::InvalidMonthKey(received) => (
            "Invalid month key".to_string(),
            format!("Month key must look like YYYY-MM. Received: {received}"),
        ),
        EngineError::NotFound { entity, id } if entity == "Month" => (
            "Month not found".to_string(),
            format!("No budget data found for month: {id}"),
        ),
        EngineError::NotFound { entity, id } => (
            format!("{entity} not found"),
            format!("No {} found with ID: {id}", entity.to_lowercase()),
        ),
        EngineError::Forbidden(reason) => (reason, "Records in this store are read-only".to_string()),
        EngineError::InvalidRecord(reason) => {
            tracing::error!("corrupted record: {reason}");
            (
                "Internal server error".to_string(),
                "A stored record could not be read".to_string(),
            )
        }
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            (
                "Internal server error".to_string(),
                "The database operation failed".to_string(),
            )
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => {
                let (status, error_type) = status_for_engine_error(&err);
                let (error, details) = message_for_engine_error(err);
                (status, ApiResponse::failure(error, error_type, details))
            }
            ServerError::Generic(err) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::failure(err.clone(), ErrorType::ValidationError, err),
            ),
            ServerError::Rejected { error, details } => {
                tracing::debug!(error, "request rejected: {details}");
                (
                    StatusCode::BAD_REQUEST,
                    ApiResponse::failure(error.to_string(), ErrorType::ValidationError, details),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
