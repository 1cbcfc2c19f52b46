use chrono::NaiveDate;
use thiserror::Error;

use crate::models::field::FieldType;

/// Failures talking to the Notion HTTP API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to Notion failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, decoded from Notion's error object.
    #[error("Notion returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("failed to decode Notion response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("interval must be a positive number of days, got {0}")]
    InvalidInterval(i64),

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("field `{0}` is not in the field type table")]
    UnknownField(String),

    #[error("field `{field_id}` has type {field_type} and cannot be written")]
    UnwritableField {
        field_id: String,
        field_type: FieldType,
    },

    #[error("field `{field_id}` expects a {expected} value")]
    ValueMismatch {
        field_id: String,
        expected: FieldType,
    },

    #[error("field `{field_id}` is {actual} in the database, expected {expected}")]
    FieldTypeMismatch {
        field_id: String,
        expected: FieldType,
        actual: FieldType,
    },

    #[error("database has no property with id `{0}`")]
    MissingProperty(String),

    #[error("no option named `{name}` on field `{field_id}`")]
    UnknownOption { field_id: String, name: String },

    #[error("invalid field assignment `{0}`, expected ID=VALUE")]
    InvalidAssignment(String),

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("input aborted: {0}")]
    Prompt(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type Result<T> = std::result::Result<T, AppError>;
