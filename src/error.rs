use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::store::StoreError;

#[derive(Debug)]
pub enum ResetError {
    /// No authorized lookup field was present in the request body.
    MissingField(String),
    /// The caller supplied a lookup field outside the authorized set.
    InvalidField(String),
    UnknownProvider(String),
    MissingCredential,
    TokenNotFound,
    TokenExpired,
    Store(StoreError),
}

impl std::fmt::Display for ResetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResetError::MissingField(field) => write!(f, "Parameter \"{field}\" is missing"),
            ResetError::InvalidField(field) => {
                write!(f, "The parameter \"{field}\" is not authorized")
            }
            ResetError::UnknownProvider(name) => write!(f, "Undefined provider \"{name}\""),
            ResetError::MissingCredential => write!(f, "Parameter \"password\" is missing"),
            ResetError::TokenNotFound => write!(f, "Invalid token"),
            ResetError::TokenExpired => write!(f, "Invalid token"),
            ResetError::Store(err) => write!(f, "Store error: {err}"),
        }
    }
}

impl From<StoreError> for ResetError {
    fn from(err: StoreError) -> Self {
        ResetError::Store(err)
    }
}

impl IntoResponse for ResetError {
    fn into_response(self) -> Response {
        let status = match &self {
            ResetError::MissingField(_)
            | ResetError::InvalidField(_)
            | ResetError::UnknownProvider(_)
            | ResetError::MissingCredential => StatusCode::BAD_REQUEST,
            // Expired and absent tokens are deliberately indistinguishable.
            ResetError::TokenNotFound | ResetError::TokenExpired => StatusCode::NOT_FOUND,
            ResetError::Store(err) => {
                tracing::error!("Store error: {err}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response();
            }
        };

        let body = json!({ "message": self.to_string() });
        (status, Json(body)).into_response()
    }
}
