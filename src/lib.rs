pub mod adaptive;
pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::adaptive::{AdaptiveConfig, ConfigError};
use crate::state::AppState;

pub fn create_app(config: AdaptiveConfig) -> Result<axum::Router, ConfigError> {
    let adaptation = AppState::create_adaptation_service(config)?;
    Ok(app_with_state(AppState::new(adaptation)))
}

pub fn app_with_state(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
