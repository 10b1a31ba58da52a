use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use iptv_db::StoreError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Store failure on the account endpoints, reported as 500.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Store failure on the `/api` endpoints, reported as 400.
    #[error("{0}")]
    Rejected(StoreError),

    /// Body without the required fields on the account endpoints.
    #[error("{0}")]
    MalformedBody(String),

    /// Body without the required fields on the `/api` endpoints.
    #[error("{0}")]
    InvalidBody(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    Unauthorized,

    #[error("Invalid or expired token")]
    Forbidden,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(_) | ApiError::MalformedBody(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Rejected(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, "Request failed: {}", self);
        } else {
            warn!(%status, "Request rejected: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_the_raw_message() {
        let err = ApiError::Rejected(StoreError::Constraint(
            "FOREIGN KEY constraint failed".into(),
        ));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "FOREIGN KEY constraint failed");

        let err: ApiError = StoreError::Constraint("UNIQUE constraint failed: users.user_id".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "UNIQUE constraint failed: users.user_id");
    }

    #[test]
    fn body_failures_follow_the_route_group() {
        assert_eq!(
            ApiError::MalformedBody("missing field `userId`".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::InvalidBody("missing field `name`".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn auth_failures_map_to_401_and_403() {
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
    }
}
