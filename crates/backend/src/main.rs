pub mod api;
pub mod dashboards;
pub mod routes;
pub mod shared;
pub mod system;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    system::tracing::initialize()?;

    let config = shared::config::load_config().context("failed to load config.toml")?;
    let dataset_path = shared::config::get_dataset_path(&config)?;
    let options = shared::data::loader::LoadOptions::from_config(&config.dataset)?;

    tracing::info!("Loading dataset from {}", dataset_path.display());
    let dataset = shared::data::store::initialize_dataset(
        dataset_path.clone(),
        options,
        config.filters.empty_selection,
    )
    .with_context(|| format!("failed to load dataset {}", dataset_path.display()))?;
    tracing::info!(
        "Dataset loaded: {} rows, sha256 {}",
        shared::format::format_number(dataset.len()),
        dataset.key().content_hash
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes()
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid server address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
