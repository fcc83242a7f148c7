use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const SERVER_ERROR_DETAIL: &str = "A server error occurred.";

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    ParseError(String),

    #[error("Not found.")]
    NotFound,

    #[error("Method \"{0}\" not allowed.")]
    MethodNotAllowed(String),

    #[error("Could not satisfy the request Accept header.")]
    NotAcceptable,

    #[error("Unsupported media type \"{0}\" in request.")]
    UnsupportedMediaType(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl AppError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::ParseError(_) => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed(_) => 405,
            Self::NotAcceptable => 406,
            Self::UnsupportedMediaType(_) => 415,
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => 500,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status() >= 500
    }

    /// Message safe to show to a client. Server-side details stay in the logs.
    pub fn detail(&self) -> String {
        if self.is_server_error() {
            SERVER_ERROR_DETAIL.to_string()
        } else {
            self.to_string()
        }
    }

    /// Response body: the field map for validation errors, `{"detail": ...}` otherwise.
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::Validation(errors) => {
                serde_json::to_value(errors).unwrap_or_else(|_| serde_json::json!({}))
            }
            other => serde_json::json!({ "detail": other.detail() }),
        }
    }
}

#[cfg(feature = "http")]
mod http_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            (self.status_code(), Json(self.body())).into_response()
        }
    }
}

#[cfg(feature = "db")]
mod db_impl {
    use super::AppError;
    use sea_orm::DbErr;

    impl From<DbErr> for AppError {
        fn from(err: DbErr) -> Self {
            match err {
                DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => AppError::NotFound,
                other => AppError::Database(other.to_string()),
            }
        }
    }
}
