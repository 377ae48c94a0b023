use std::path::PathBuf;

use anyhow::Context;
use dropkey_api::{router, AppState};
use dropkey_core::{logging, Config};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Config::from_file(&path)?,
        None => Config::default_config(),
    }
    .apply_env()?;
    config.validate()?;

    logging::init_from_config(&config.logging);

    let state = AppState::from_config(&config)?;
    let app = router(state);

    let listener = TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;
    info!(
        bind_addr = %config.server.bind_addr,
        database = %config.storage.database_path.display(),
        "DropKey API listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
