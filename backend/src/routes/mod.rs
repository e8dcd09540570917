//! Route definitions for the Whiskey Wiz API

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Active quarter (public, answers hidden)
        .route("/quarters/active", get(handlers::get_active_quarter))
        // Protected routes
        .merge(protected_routes(state))
}

/// Routes that require a verified player token
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/quarters", quarter_routes())
        .route("/leaderboard", get(handlers::get_global_leaderboard))
        .route("/me/results", get(handlers::get_my_history))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Quarter routes, including play and leaderboards
fn quarter_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_quarters).post(handlers::create_quarter),
        )
        .route("/:id", get(handlers::get_quarter))
        .route("/:id/full", get(handlers::get_quarter_full))
        .route("/:id/rules", put(handlers::update_scoring_rules))
        .route("/:id/active", put(handlers::set_quarter_active))
        .route("/:id/results", post(handlers::submit_game))
        .route("/:id/results/me", get(handlers::get_my_result))
        .route("/:id/leaderboard", get(handlers::get_quarter_leaderboard))
        .route("/:id/leaderboard/me", get(handlers::get_my_rank))
}
