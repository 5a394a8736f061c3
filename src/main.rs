use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use tokio::net::TcpListener;
use tokio::time::{interval, MissedTickBehavior};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bus_booking_portal::{
    catalog::BusCatalog,
    config::Config,
    middleware::rate_limit::{create_global_governor, log_request},
    routes,
    services::ApiClient,
    sessions::SessionStore,
    AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bus_booking_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    let api = ApiClient::new(&config.api_base_url, config.api_timeout())
        .expect("Failed to build backend client");
    tracing::info!("Backend API at {}", api.base_url());

    let catalog = BusCatalog::demo();
    tracing::info!("Loaded {} bus listings", catalog.len());

    // Create app state
    let state = AppState {
        config: config.clone(),
        api,
        catalog: Arc::new(catalog),
        sessions: SessionStore::new(),
    };

    // Discard abandoned booking sessions
    let sessions = state.sessions.clone();
    let max_idle = config.session_idle();
    tokio::spawn(async move {
        let mut ticker = interval((max_idle / 4).max(Duration::from_secs(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sessions.sweep_idle(max_idle).await;
        }
    });

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(create_global_governor());

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
