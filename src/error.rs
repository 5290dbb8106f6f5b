use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<DieselError> for ServiceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ServiceError::NotFound("Record".into()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                ServiceError::Conflict(format!("Duplicate record: {}", info.message()))
            }
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                ServiceError::Validation(info.message().to_owned())
            }
            other => {
                warn!("Database failure: {other}");
                ServiceError::Unavailable(other.to_string())
            }
        }
    }
}

impl From<redis::RedisError> for ServiceError {
    fn from(err: redis::RedisError) -> Self {
        warn!("Redis failure: {err}");
        ServiceError::Unavailable(err.to_string())
    }
}

impl From<actix::MailboxError> for ServiceError {
    fn from(err: actix::MailboxError) -> Self {
        ServiceError::Internal(format!("Database actor unreachable: {err}"))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Internal(format!("Malformed stored JSON: {err}"))
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ServiceError::NotFound("File".into()),
            _ => ServiceError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ServiceError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(ServiceError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::from(DieselError::NotFound).status_code(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn body_carries_error_field() {
        let resp = ServiceError::Validation("Enter the student's first name".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["error"], "Enter the student's first name");
    }
}
