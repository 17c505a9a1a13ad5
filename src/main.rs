use std::net::SocketAddr;

use anyhow::Result;
use dotenvy::dotenv;

use cyclesense_backend::config::AppConfig;
use cyclesense_backend::routes::{self, AppState};
use cyclesense_backend::session::SessionGate;
use cyclesense_backend::store::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let store = RecordStore::open(&config.data_dir)?;
    let state = AppState::new(store, SessionGate::new(config.password));

    let app = routes::router(state);

    // Single-user journal; listen on loopback only.
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("🧠 Journal backend running at {}", addr);

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
