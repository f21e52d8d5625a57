use quiz_backend::{
    config::{get_config, init_config},
    routes, storage, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quiz_backend=info,tower_http=info")),
        )
        .init();

    init_config()?;
    let config = get_config();

    let store = storage::build_store(config).await?;

    info!("Serving static files from: {}", config.static_dir.display());
    let app = routes::router(AppState::new(store, config.static_dir.clone()));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
