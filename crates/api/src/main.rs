use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docforge_api::config::ServerConfig;
use docforge_api::router::build_app_router;
use docforge_api::state::AppState;
use docforge_export::fetch::ImageFetcher;
use docforge_genai::{GenAiClient, ImageSearchClient};
use docforge_store::{MemoryStore, PgStore, ProjectStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docforge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store: Arc<dyn ProjectStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = docforge_store::pg::create_pool(url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            docforge_store::pg::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let store = PgStore::new(pool);
            store
                .health_check()
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            Arc::new(store)
        }
        None => {
            tracing::warn!(
                "DATABASE_URL is not set, using the in-memory store (data is lost on restart)"
            );
            Arc::new(MemoryStore::new())
        }
    };

    // --- Generation clients ---
    let generator = GenAiClient::new(
        config.genai.base_url.clone(),
        config.genai.api_key.clone(),
        config.genai.model.clone(),
    );
    let image_search = ImageSearchClient::new(
        config.image_search.base_url.clone(),
        config.image_search.api_key.clone(),
    );
    let image_fetcher = ImageFetcher::new(Duration::from_secs(config.export_image_timeout_secs));
    tracing::info!(model = %config.genai.model, "Generation clients created");

    // --- App state ---
    let state = AppState {
        store,
        generator: Arc::new(generator),
        image_search: Arc::new(image_search),
        image_fetcher: Arc::new(image_fetcher),
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Serve ---
    let host: std::net::IpAddr = config.host.parse().expect("Invalid HOST address");
    let addr = SocketAddr::new(host, config.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(stop_signal())
        .await
        .expect("Server error");

    tracing::info!("Shutdown complete");
}

/// Resolves when the process is asked to stop.
///
/// Ctrl-C covers interactive use on every platform; SIGTERM covers process
/// managers (systemd, `docker stop`, Kubernetes drains) on Unix. Either one
/// starts the graceful drain.
async fn stop_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Received SIGINT, draining"),
        () = terminate => tracing::info!("Received SIGTERM, draining"),
    }
}
