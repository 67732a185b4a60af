pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::auth::handlers as auth_handlers;
use crate::profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        // Auth (no token required)
        .route("/register", post(auth_handlers::handle_register))
        .route("/login", post(auth_handlers::handle_login))
        // Profile (bearer token)
        .route(
            "/profile",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        // Analysis (bearer token)
        .route("/analyze", post(analysis_handlers::handle_analyze))
        .route("/analyze/rerun", post(analysis_handlers::handle_rerun))
        .route("/analysis/latest", get(analysis_handlers::handle_latest))
        .with_state(state)
}
