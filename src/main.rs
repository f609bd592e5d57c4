use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use rbooks::config::Config;
use rbooks::state::AppState;

#[derive(Parser)]
#[command(name = "rbooks", version, about = "Book catalog REST API")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Error loading config: {e}");
        std::process::exit(1);
    });

    // Auto-generate token-signing secret if not set
    if config.server.session_secret.is_empty() {
        use std::time::{SystemTime, UNIX_EPOCH};
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        config.server.session_secret = format!("rbooks-auto-{seed}");
    }

    // Setup tracing/logging
    let filter =
        EnvFilter::try_new(&config.server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Initialize database
    let (pool, backend) = rbooks::db::create_pool(&config.database)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to initialize database: {e}");
            std::process::exit(1);
        });
    tracing::info!("Database ready ({backend:?})");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .unwrap_or_else(|e| {
            tracing::error!("Invalid host/port in config: {e}");
            std::process::exit(1);
        });

    let state = AppState::new(config, pool);
    let app = rbooks::build_router(state).layer(TraceLayer::new_for_http());

    tracing::info!("Server running at http://{addr}/");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap_or_else(|e| {
        tracing::error!("Failed to bind {addr}: {e}");
        std::process::exit(1);
    });
    axum::serve(listener, app).await.unwrap_or_else(|e| {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    });
}
