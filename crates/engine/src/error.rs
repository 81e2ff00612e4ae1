//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`MissingFields`] thrown when a write request lacks required fields.
//! - [`InvalidCategory`] thrown when a budget category is not recognised.
//! - [`NotFound`] thrown when an item is not found.
//! - [`Forbidden`] thrown when a store is not writable from outside.
//!
//!  [`MissingFields`]: EngineError::MissingFields
//!  [`InvalidCategory`]: EngineError::InvalidCategory
//!  [`NotFound`]: EngineError::NotFound
//!  [`Forbidden`]: EngineError::Forbidden
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Invalid month key: {0}")]
    InvalidMonthKey(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Corrupted record: {0}")]
    InvalidRecord(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingFields(a), Self::MissingFields(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::InvalidValue(a), Self::InvalidValue(b)) => a == b,
            (Self::InvalidMonthKey(a), Self::InvalidMonthKey(b)) => a == b,
            (
                Self::NotFound {
                    entity: ea,
                    id: ia,
                },
                Self::NotFound {
                    entity: eb,
                    id: ib,
                },
            ) => ea == eb && ia == ib,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidRecord(a), Self::InvalidRecord(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidRecord(value.to_string())
    }
}
