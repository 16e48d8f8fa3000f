pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

pub use config::{Config, Environment};
pub use db::create_pool;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Open the content repository and build the application state
pub async fn open(config: Config) -> Result<AppState, Box<dyn std::error::Error>> {
    // Ensure the data directory exists
    std::fs::create_dir_all(&config.data_path)?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    Ok(AppState::new(pool, config))
}

/// Run the importer daemon: open the repository, start the polling
/// scheduler, and park until interrupted.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = open(config).await?;

    state.scheduler.start();
    tracing::info!(
        "Feed importer started with {} scheduled jobs, polling every {}s",
        state.scheduler.job_count(),
        state.config.poll_interval_secs
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    Ok(())
}
