use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;

use zwcd_srs::{
    config::AppConfig,
    features::scheduler::Scheduler,
    handlers,
    utils::{build_pool, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    // Database configuration
    let pool = build_pool(&config.database_url, config.db_pool_size)
        .context("Failed to create DB pool")?;
    {
        let mut conn = pool.get().context("Failed to get DB connection")?;
        run_migrations(&mut conn).context("Failed to create review tables")?;
    }
    log::info!("Review store ready at {}", config.database_url);

    let scheduler = Arc::new(Scheduler::new(config.scheduler.clone()));
    log::debug!("Scheduler config: {:?}", scheduler.config());

    let app = handlers::app_router(pool, scheduler);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    log::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
