use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::ResetError;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RequestParams {
    pub provider: Option<String>,
}

#[derive(Deserialize)]
pub struct ConsumeRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// `POST /forgot-password/` — body carries one authorized lookup field.
/// Responds 204 whether or not a user matched.
pub async fn request(
    State(state): State<SharedState>,
    Query(params): Query<RequestParams>,
    Json(body): Json<Map<String, Value>>,
) -> Result<StatusCode, ResetError> {
    let (field, value) = extract_field(&state.config.authorized_fields, &body)?;
    state
        .service
        .request_reset(field, &value, params.provider.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /forgot-password/{token}` — read-only link check.
pub async fn validate(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, ResetError> {
    state.service.validate_token(&token).await?;
    Ok(Json(json!({})))
}

/// `POST /forgot-password/{token}` — consumes the token and sets the new
/// password.
pub async fn consume(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Json(req): Json<ConsumeRequest>,
) -> Result<StatusCode, ResetError> {
    let password = req.password.as_deref().unwrap_or_default();
    state.service.consume_token(&token, password).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Picks the first configured field present in the body with a non-empty
/// string value. An unrecognized key reports the unauthorized field; an
/// empty body reports the first authorized field as missing.
fn extract_field<'a>(
    authorized: &'a [String],
    body: &Map<String, Value>,
) -> Result<(&'a str, String), ResetError> {
    for field in authorized {
        if let Some(value) = body.get(field.as_str()) {
            let value = value.as_str().unwrap_or_default();
            if value.is_empty() {
                return Err(ResetError::MissingField(field.clone()));
            }
            return Ok((field, value.to_string()));
        }
    }
    if let Some(key) = body.keys().next() {
        return Err(ResetError::InvalidField(key.clone()));
    }
    Err(ResetError::MissingField(authorized[0].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn body(json: Value) -> Map<String, Value> {
        json.as_object().unwrap().clone()
    }

    #[test]
    fn picks_first_authorized_field_present() {
        let authorized = fields(&["email", "username"]);
        let (field, value) = extract_field(
            &authorized,
            &body(json!({ "username": "john.doe" })),
        )
        .unwrap();
        assert_eq!(field, "username");
        assert_eq!(value, "john.doe");
    }

    #[test]
    fn empty_body_names_the_missing_field() {
        let authorized = fields(&["email"]);
        let err = extract_field(&authorized, &body(json!({}))).unwrap_err();
        assert!(matches!(err, ResetError::MissingField(f) if f == "email"));
    }

    #[test]
    fn unauthorized_key_is_rejected() {
        let authorized = fields(&["email"]);
        let err =
            extract_field(&authorized, &body(json!({ "phone": "555-0100" }))).unwrap_err();
        assert!(matches!(err, ResetError::InvalidField(f) if f == "phone"));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let authorized = fields(&["email"]);
        let err = extract_field(&authorized, &body(json!({ "email": "" }))).unwrap_err();
        assert!(matches!(err, ResetError::MissingField(f) if f == "email"));

        let err = extract_field(&authorized, &body(json!({ "email": 42 }))).unwrap_err();
        assert!(matches!(err, ResetError::MissingField(_)));
    }
}
