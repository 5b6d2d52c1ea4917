use std::sync::Arc;

use crate::config::Config;
use crate::service::ForgotPasswordService;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub service: ForgotPasswordService,
    pub config: Config,
}
