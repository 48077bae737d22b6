use axum::{http::Method, routing::get, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod activities;
pub mod admin;
pub mod auth;
pub mod budget;
pub mod error;
pub mod middleware;
pub mod parking;
pub mod sharing;
pub mod state;
pub mod stops;
pub mod trips;

pub use state::AppState;

pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    let origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect::<Vec<_>>(),
        )
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Everything past the auth middleware requires a valid token.
    let protected = Router::new()
        .merge(auth::me_routes())
        .merge(trips::routes())
        .merge(stops::routes())
        .merge(activities::routes())
        .merge(parking::routes())
        .merge(budget::routes())
        .merge(sharing::routes())
        .merge(admin::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(auth::routes())
        .merge(sharing::public_routes())
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
