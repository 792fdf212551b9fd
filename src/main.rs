use std::net::SocketAddr;
use std::sync::Arc;

use classhub::router::init_router;
use classhub::state::AppState;
use classhub_db::{init_db_pool, run_migrations};
use dotenvy::dotenv;
use tower_governor::GovernorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the
                // `axum::rejection` target at TRACE level
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = init_db_pool().await;
    run_migrations(&pool).await;

    let state = AppState::from_env(pool);

    // Per-IP rate limiting sits outermost; it needs the peer address from
    // connect info
    let governor_config = Arc::new(state.rate_limit.governor_config());
    let app = init_router(state).layer(GovernorLayer::new(governor_config));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("Failed to bind server port");
    tracing::info!("Server running on port {}", port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
