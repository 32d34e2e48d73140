mod allocation;
mod category;
mod config;
mod error;
mod instructions;
mod metabolism;
mod model;
mod noise;
mod nutrients;
mod pipeline;
mod recommend;
mod server;

use std::sync::Arc;

use diet_common::dataset::RecipeDataset;
use tracing::info;
use tracing_subscriber::EnvFilter;

use category::CategoryTable;
use config::Config;
use pipeline::Recommender;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting meal-recommender");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        recipes_csv = %config.recipes_csv_path.display(),
        listen_addr = %config.listen_addr,
        seeded = config.noise_seed.is_some(),
        tdee_jitter = config.tdee_jitter,
        "configuration loaded"
    );

    // 2. Load the recipe dataset (fatal on schema errors)
    let dataset = RecipeDataset::load(&config.recipes_csv_path)?;

    // 3. Category table: file override or built-in
    let categories = match &config.category_table_path {
        Some(path) => CategoryTable::load(path)?,
        None => {
            let table = CategoryTable::default();
            table.validate()?;
            table
        }
    };
    info!(version = categories.version, "category table ready");

    let recommender = Arc::new(Recommender::new(
        dataset,
        categories,
        config.tdee_jitter,
        config.noise_seed,
    ));
    let app = server::router(recommender);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("meal-recommender shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
