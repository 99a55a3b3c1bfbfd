use std::sync::Arc;

use crate::{application::user_service::UserService, config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, user_service: Arc<UserService>) -> Self {
        Self {
            config,
            user_service,
        }
    }
}

pub type SharedState = Arc<AppState>;
