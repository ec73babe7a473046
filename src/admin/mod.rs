//! Admin surface under the reserved `/__` prefix.
//!
//! These paths are exactly the ones `mockpath::should_ignore` keeps out
//! of the mock tree, so a route with a `/` prefix can never shadow them.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/__status", get(get_status))
        .route("/__routes", get(get_routes))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
}
