use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plaza::config::{RoomConfig, ServerConfig};
use plaza::{server, state::AppState};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plaza=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting plaza...");

    let server_config = ServerConfig::from_env();
    let room_config = RoomConfig::from_env();

    // Spawns the room task that owns every participant
    let state = AppState::start(room_config);
    let app = server::app(state);

    tracing::info!("Listening on http://{}", server_config.bind_addr);

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr).await?;
    axum::serve(listener, app).await
}
