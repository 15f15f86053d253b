pub(crate) mod checkpoint;
pub(crate) mod crawl_service;
pub(crate) mod walker;

pub use crawl_service::CrawlService;
