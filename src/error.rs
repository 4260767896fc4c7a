//! Crate-wide error type for the moderation and content operations.
//!
//! Every operation surfaces one of these kinds; nothing is swallowed or
//! retried internally. The `ResponseError` impl is the single place where
//! kinds map to HTTP status classes, so handlers can simply `?` through.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use sea_orm::DbErr;
use serde_json::json;

#[derive(Debug)]
pub enum Error {
    /// Malformed input: empty reason, out-of-range enum value, bad field.
    Validation(Vec<String>),
    /// A referenced Review/Comment/Report/User does not exist.
    NotFound { entity: &'static str },
    /// A comment's declared review disagrees with its stored review.
    Mismatch(&'static str),
    /// Authorization or moderation-tier guard denied the action.
    Forbidden(&'static str),
    /// No authenticated caller on a route that requires one.
    Unauthorized,
    /// The action conflicts with existing state (e.g. live replies).
    Conflict(&'static str),
    /// Store-level failure.
    Database(DbErr),
}

impl Error {
    pub fn not_found(entity: &'static str) -> Self {
        Error::NotFound { entity }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(vec![message.into()])
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(errors) => write!(f, "Validation failed: {}", errors.join("; ")),
            Error::NotFound { entity } => write!(f, "{} not found", entity),
            Error::Mismatch(entity) => write!(f, "{} does not belong to the given review", entity),
            Error::Forbidden(entity) => write!(f, "Not allowed to act on this {}", entity),
            Error::Unauthorized => write!(f, "Must be logged in"),
            Error::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Error::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<DbErr> for Error {
    fn from(e: DbErr) -> Self {
        Error::Database(e)
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors = e
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| match &err.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid value ({})", field, err.code),
                })
            })
            .collect();
        Error::Validation(errors)
    }
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::Mismatch(_) => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Error::Database(e) = self {
            // Store details belong in the log, not the response body.
            log::error!("Database error: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({ "errors": ["Internal server error"] }));
        }

        let errors = match self {
            Error::Validation(errors) => errors.clone(),
            other => vec![other.to_string()],
        };

        HttpResponse::build(self.status_code()).json(json!({ "errors": errors }))
    }
}
