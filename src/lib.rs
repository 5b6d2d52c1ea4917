pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod provider;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod token_manager;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::Notifier;
use crate::provider::{EmailProvider, ProviderRegistry};
use crate::service::ForgotPasswordService;
use crate::state::{AppState, SharedState};
use crate::store::Store;

pub fn build_app(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>, config: Config) -> Router {
    let mut providers = ProviderRegistry::new();
    providers.register(Arc::new(EmailProvider));

    let service = ForgotPasswordService::new(store, notifier, providers, &config);

    let state: SharedState = Arc::new(AppState { service, config });

    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
