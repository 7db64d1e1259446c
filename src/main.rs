// main.rs
// Servidor HTTP da gestão do clube: carrega o ambiente, conecta no
// MongoDB e sobe o Router.

use std::{env, sync::Arc};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use clubegest::{routes, state};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app_state = Arc::new(state::init_state().await?);
    let app = routes::router(app_state);

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "servidor ouvindo");
    axum::serve(listener, app).await?;

    Ok(())
}
