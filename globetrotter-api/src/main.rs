use std::net::SocketAddr;
use std::sync::Arc;

use globetrotter_api::{app, state::{AppState, AuthConfig}};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "globetrotter_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = globetrotter_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting GlobeTrotter API on port {}", config.server.port);

    let db = globetrotter_store::DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to database");
    db.migrate().await.expect("Failed to run migrations");

    let app_state = AppState {
        db: Arc::new(db),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            token_ttl_minutes: config.auth.token_ttl_minutes,
        },
    };

    let app = app(app_state, &config.cors.allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
