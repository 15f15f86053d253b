use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Found {count} tables matching `{selector}`, expected at most one")]
    AmbiguousTable { selector: String, count: usize },
    #[error("Input error: {0}")]
    Input(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Other(String),
}

impl ScrapeError {
    /// Transport failures, 5xx and 429 responses.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Network(e) => !e.is_builder() && !e.is_decode(),
            ScrapeError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
