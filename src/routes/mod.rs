pub mod forgot_password;

use axum::Router;
use axum::routing::{get, post};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/forgot-password/", post(forgot_password::request))
        .route(
            "/forgot-password/{token}",
            get(forgot_password::validate).post(forgot_password::consume),
        )
}
