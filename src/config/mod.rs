use crate::config::cli::Args;
use crate::error::{Result, ScrapeError};
use crate::infrastructure::RetryPolicy;
use clap::Parser;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub(crate) mod cli;
mod leagues;

pub use leagues::League;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Extra request headers sent with every request
    pub headers: BTreeMap<String, String>,
    /// Timeout for player detail pages
    pub timeout_secs: u64,
    /// Timeout for league and squad listing pages
    pub listing_timeout_secs: u64,
    pub checkpoint_every: usize,
    /// Pause between player pages
    pub delay_ms: u64,
    /// Pause between team pages
    pub team_delay_ms: u64,
    pub retry: RetryConfig,
    pub paths: PathTemplates,
    pub leagues: Vec<League>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.transfermarkt.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
            timeout_secs: 50,
            listing_timeout_secs: 10,
            checkpoint_every: 50,
            delay_ms: 1000,
            team_delay_ms: 2000,
            retry: RetryConfig::default(),
            paths: PathTemplates::default(),
            leagues: leagues::default_leagues(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8000,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        RetryPolicy {
            max_attempts: cfg.max_attempts.max(1),
            initial_backoff: Duration::from_millis(cfg.initial_backoff_ms),
            max_backoff: Duration::from_millis(cfg.max_backoff_ms),
        }
    }
}

/// URL path templates appended to `base_url`.
///
/// Player templates understand `{slug}` and `{id}`, the league template
/// `{league}`, `{code}` and `{season}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathTemplates {
    pub league: String,
    pub injuries: String,
    pub seasons: String,
}

impl Default for PathTemplates {
    fn default() -> Self {
        Self {
            league: "/{league}/startseite/wettbewerb/{code}/saison_id/{season}".to_string(),
            injuries: "/{slug}/verletzungen/spieler/{id}".to_string(),
            seasons: "/{slug}/leistungsdatendetails/spieler/{id}/plus/0?saison=&verein=&liga=&wettbewerb=&pos=&trainer_id=".to_string(),
        }
    }
}

impl ScraperConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using built-in defaults", path);
            return Ok(Self::default());
        }
        let config = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        info!("Loaded scraper config from {:?}", path);
        Ok(config)
    }

    pub fn find_league(&self, query: &str) -> Result<&League> {
        self.leagues
            .iter()
            .find(|league| league.matches(query))
            .ok_or_else(|| ScrapeError::Input(format!("Unknown league: {query}")))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    pub fn league_url(&self, league: &League, season: u16) -> String {
        let path = self
            .paths
            .league
            .replace("{league}", &league.url_name)
            .replace("{code}", &league.code)
            .replace("{season}", &season.to_string());
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn http_client(&self) -> Result<Client> {
        let mut headers = HeaderMap::new();
        for (key, value) in &self.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ScrapeError::Parse(format!("invalid header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ScrapeError::Parse(format!("invalid header value '{value}': {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .default_headers(headers)
            .build()?;
        Ok(client)
    }
}

pub struct Config {
    pub args: Args,
    pub scraper_config: ScraperConfig,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let mut scraper_config = ScraperConfig::load(&args.config_file)?;

        if let Some(every) = args.checkpoint_every {
            scraper_config.checkpoint_every = every;
        }
        if let Some(delay) = args.delay_ms {
            scraper_config.delay_ms = delay;
        }

        let http_client = scraper_config.http_client()?;

        Ok(Self {
            args,
            scraper_config,
            http_client,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if !self.args.data_dir.exists() {
            std::fs::create_dir_all(&self.args.data_dir)?;
        }

        info!("Data dir {:?} exists", self.args.data_dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_config_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "base_url": "http://localhost:9000/", "checkpoint_every": 500, "retry": {{ "max_attempts": 5 }} }}"#
        )
        .unwrap();

        let config = ScraperConfig::load(file.path()).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/");
        assert_eq!(config.checkpoint_every, 500);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_backoff_ms, 500);
        assert_eq!(config.timeout_secs, 50);
        assert_eq!(config.leagues.len(), 6);
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScraperConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config.base_url, "https://www.transfermarkt.com");
    }

    #[test]
    fn builds_league_url() {
        let config = ScraperConfig::default();
        let league = config.find_league("gb1").unwrap();
        assert_eq!(
            config.league_url(league, 2024),
            "https://www.transfermarkt.com/premier-league/startseite/wettbewerb/GB1/saison_id/2024"
        );
        assert!(config.find_league("Eredivisie").is_err());
    }

    #[test]
    fn cli_overrides_file_settings() {
        let args = Args::try_parse_from([
            "squadscrape",
            "--config-file",
            "/definitely/not/here.json",
            "--checkpoint-every",
            "7",
            "--delay-ms",
            "0",
            "teams",
        ])
        .unwrap();
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.scraper_config.checkpoint_every, 7);
        assert_eq!(config.scraper_config.delay_ms, 0);
    }
}
