use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tracing::info;

use adapters::{AppPorts, JsonFileStore, SimulatedAdProvider, SystemClock, TokioTickScheduler, TokioTimer};
use application::ports::out_::KeyValueStore;

#[derive(Parser)]
#[command(name = "server")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "SPEND_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// Directory holding the persisted history and custom personas
    #[arg(long, env = "SPEND_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Probability that a simulated ad request fills, between 0 and 1
    #[arg(long, env = "SPEND_AD_FILL_RATE", default_value_t = 0.8)]
    ad_fill_rate: f64,

    /// Placement name used for premium persona ads
    #[arg(long, env = "SPEND_AD_PLACEMENT", default_value = "premium_persona")]
    ad_placement: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("failed to create data directory {}", args.data_dir.display()))?;
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&args.data_dir));

    let state = adapters::create_app_state(AppPorts {
        store,
        ads: Arc::new(SimulatedAdProvider::new(args.ad_fill_rate)),
        timer: Arc::new(TokioTimer::new()),
        clock: Arc::new(SystemClock),
        scheduler: Arc::new(TokioTickScheduler::new()),
        ad_placement: args.ad_placement,
    });

    let app = adapters::router(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(bind = %args.bind, data_dir = %args.data_dir.display(), "Server listening");
    axum::serve(listener, app).await.context("server error")?;
    info!("Server shut down");
    Ok(())
}
