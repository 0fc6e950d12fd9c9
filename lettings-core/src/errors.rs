use thiserror::Error;

use crate::DatabaseError;

/// A submitted field is missing or malformed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("All required fields must be provided ({0} is missing)")]
    MissingField(&'static str),
    #[error("{field} must be a whole or decimal number, got \"{value}\"")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

/// Errors from operations that validate input before touching the store
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Db(#[from] DatabaseError),
}
