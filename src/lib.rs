pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod sessions;
pub mod utils;
pub mod workflow;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, AppResult};

use catalog::BusCatalog;
use services::ApiClient;
use sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub catalog: Arc<BusCatalog>,
    pub sessions: SessionStore,
}
