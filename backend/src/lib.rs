//! Whiskey Wiz - Backend Server
//!
//! Hosts blind-tasting quarters, scores players' guesses against the hidden
//! samples and ranks the results.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod analytics;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;

pub use analytics::{AnalyticsSink, GameEvent, TracingAnalytics};
pub use config::Config;
pub use store::{GameStore, MemoryStore, PgStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GameStore>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn GameStore>,
        analytics: Arc<dyn AnalyticsSink>,
        config: Config,
    ) -> Self {
        Self {
            store,
            analytics,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Whiskey Wiz API v1"
}
