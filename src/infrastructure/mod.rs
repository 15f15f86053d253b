mod clients;
mod scrapers;
mod storage;

pub use clients::{
    fetcher::{PageFetcher, RetryPolicy},
    rate_limit::RateLimiter,
};
pub use scrapers::TableScraper;
pub use storage::csv_store::CsvStore;
