use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::CsvStore;
use crate::services::CrawlService;
use std::sync::Arc;
use tracing::{info, Level};

mod config;
mod domain;
mod error;
mod infrastructure;
mod services;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;

    let level = config.args.log_level.parse().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    config.ensure_directories()?;

    let store = Arc::new(CsvStore::new());
    let crawler = CrawlService::new(config, store);
    crawler.run().await?;

    info!("Scraping completed successfully!");
    Ok(())
}
