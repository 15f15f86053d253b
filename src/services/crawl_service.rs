use crate::config::cli::{Command, LeagueArgs};
use crate::config::{Config, League, ScraperConfig};
use crate::domain::schema::{self, fields};
use crate::domain::storage::{RecordStore, StorageKeys};
use crate::domain::{dedup_entities, Entity, EntityKind, ExtractionSchema, RunManifest};
use crate::error::Result;
use crate::infrastructure::{PageFetcher, RetryPolicy, TableScraper};
use crate::services::checkpoint::CheckpointWriter;
use crate::services::walker::{EntityWalker, UrlRule, WalkReport};
use crate::utils::slugify;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct CrawlService {
    config: Config,
    store: Arc<dyn RecordStore>,
    fetcher: PageFetcher,
}

impl CrawlService {
    pub fn new(config: Config, store: Arc<dyn RecordStore + 'static>) -> Self {
        let retry = RetryPolicy::from(&config.scraper_config.retry);
        let fetcher = PageFetcher::new(config.http_client.clone(), retry);
        Self {
            config,
            store,
            fetcher,
        }
    }

    fn settings(&self) -> &ScraperConfig {
        &self.config.scraper_config
    }

    pub async fn run(&self) -> Result<RunManifest> {
        let command = self.config.args.command.clone();
        info!("Running {}", command.name());

        let (output, report) = match &command {
            Command::Teams { league, output } => {
                let (league, season) = self.league(league)?;
                let output = self.output_path(output, &league_key(StorageKeys::TEAMS, league, season));
                let report = self.scrape_teams(league, season, &output).await?;
                (output, report)
            }
            Command::Injuries { input, output } => {
                let output = self.output_path(output, StorageKeys::INJURIES);
                let report = self
                    .scrape_players(input, &schema::INJURIES, &self.settings().paths.injuries, &output)
                    .await?;
                (output, report)
            }
            Command::Seasons { input, output } => {
                let output = self.output_path(output, StorageKeys::SEASON_STATS);
                let report = self
                    .scrape_players(input, &schema::SEASON_STATS, &self.settings().paths.seasons, &output)
                    .await?;
                (output, report)
            }
            Command::Roster { league, output } => {
                let (league, season) = self.league(league)?;
                let output = self.output_path(output, &league_key(StorageKeys::ROSTER, league, season));
                let report = self.scrape_roster(league, season, &output).await?;
                (output, report)
            }
            Command::LeagueInjuries { league, output } => {
                let (league, season) = self.league(league)?;
                let output =
                    self.output_path(output, &league_key(StorageKeys::INJURIES, league, season));
                let report = self
                    .scrape_league_players(
                        league,
                        season,
                        &schema::INJURIES,
                        &self.settings().paths.injuries,
                        &output,
                    )
                    .await?;
                (output, report)
            }
            Command::LeaguePerformance { league, output } => {
                let (league, season) = self.league(league)?;
                let output =
                    self.output_path(output, &league_key(StorageKeys::SEASON_STATS, league, season));
                let report = self
                    .scrape_league_players(
                        league,
                        season,
                        &schema::SEASON_STATS,
                        &self.settings().paths.seasons,
                        &output,
                    )
                    .await?;
                (output, report)
            }
        };

        let manifest = self.save_manifest(command.name(), &output, &report)?;
        info!(
            "{} finished: {} records from {} entities",
            command.name(),
            manifest.total_records,
            manifest.entities_processed
        );
        Ok(manifest)
    }

    /// Team links from a league overview page.
    pub async fn scrape_teams(&self, league: &League, season: u16, output: &Path) -> Result<WalkReport> {
        let url = self.settings().league_url(league, season);
        info!("Reading league data: {} {}", league.name, season);

        let entity = Entity {
            kind: EntityKind::League,
            name: league.name.clone(),
            id: None,
            url: Some(url),
            context: vec![
                ("League".to_string(), league.name.clone()),
                ("Season".to_string(), season.to_string()),
            ],
        };
        let columns = with_context(&entity.context_columns(), &schema::TEAMS);

        let mut walker = self.listing_walker();
        self.walk(&mut walker, &[entity], &UrlRule::Direct, &schema::TEAMS, output, columns)
            .await
    }

    /// Players from an input file, one detail page each.
    pub async fn scrape_players(
        &self,
        input: &Path,
        schema: &'static ExtractionSchema,
        template: &str,
        output: &Path,
    ) -> Result<WalkReport> {
        let seeds = dedup_entities(self.store.load_seeds(input)?);
        info!("Loaded {} unique players from {:?}", seeds.len(), input);

        let columns = with_context(&[fields::PLAYER.to_string(), fields::PLAYER_ID.to_string()], schema);
        let rule = UrlRule::template(&self.settings().base_url, template);
        let mut walker = self.detail_walker();
        self.walk(&mut walker, &seeds, &rule, schema, output, columns)
            .await
    }

    /// Squads of every team in a league.
    pub async fn scrape_roster(&self, league: &League, season: u16, output: &Path) -> Result<WalkReport> {
        let teams_output = sibling(output, StorageKeys::TEAMS);
        let teams = self.scrape_teams(league, season, &teams_output).await?;

        let base_url = &self.settings().base_url;
        let entities: Vec<Entity> = teams
            .records
            .iter()
            .filter_map(|record| Entity::team_from_record(record, base_url))
            .collect();
        let columns = with_context(&[fields::TEAM.to_string()], &schema::ROSTER);

        let mut walker = self.listing_walker();
        let report = self
            .walk(&mut walker, &entities, &UrlRule::Direct, &schema::ROSTER, output, columns)
            .await?;
        Ok(report.after(&teams))
    }

    /// League squads followed by one detail page per rostered player, with
    /// the roster row in front of every detail record.
    pub async fn scrape_league_players(
        &self,
        league: &League,
        season: u16,
        schema: &'static ExtractionSchema,
        template: &str,
        output: &Path,
    ) -> Result<WalkReport> {
        let roster_output = sibling(output, StorageKeys::ROSTER);
        let roster = self.scrape_roster(league, season, &roster_output).await?;

        let base_url = &self.settings().base_url;
        let players = dedup_entities(
            roster
                .records
                .iter()
                .filter_map(|record| Entity::player_from_record(record, base_url))
                .collect(),
        );
        info!("Found {} players in {} {}", players.len(), league.name, season);

        let context_columns = players
            .first()
            .map(Entity::context_columns)
            .unwrap_or_default();
        let columns = with_context(&context_columns, schema);
        let rule = UrlRule::template(base_url, template);
        let mut walker = self.detail_walker();
        let report = self
            .walk(&mut walker, &players, &rule, schema, output, columns)
            .await?;
        Ok(report.after(&roster))
    }

    async fn walk(
        &self,
        walker: &mut EntityWalker,
        entities: &[Entity],
        rule: &UrlRule,
        schema: &'static ExtractionSchema,
        output: &Path,
        columns: Vec<String>,
    ) -> Result<WalkReport> {
        let scraper = TableScraper::new(schema)?;
        let checkpoint = CheckpointWriter::new(
            self.store.clone(),
            output,
            columns,
            self.settings().checkpoint_every,
        );
        walker.walk(entities, rule, &scraper, &checkpoint).await
    }

    fn detail_walker(&self) -> EntityWalker {
        EntityWalker::new(
            self.fetcher.clone(),
            Duration::from_millis(self.settings().delay_ms),
            self.settings().timeout(),
        )
        .with_progress(!self.config.args.no_progress)
    }

    fn listing_walker(&self) -> EntityWalker {
        EntityWalker::new(
            self.fetcher.clone(),
            Duration::from_millis(self.settings().team_delay_ms),
            self.settings().listing_timeout(),
        )
        .with_progress(!self.config.args.no_progress)
    }

    fn league<'a>(&'a self, args: &LeagueArgs) -> Result<(&'a League, u16)> {
        Ok((self.settings().find_league(&args.league)?, args.season))
    }

    fn output_path(&self, explicit: &Option<PathBuf>, key: &str) -> PathBuf {
        explicit
            .clone()
            .unwrap_or_else(|| self.config.args.data_dir.join(format!("{key}.csv")))
    }

    fn save_manifest(&self, command: &str, output: &Path, report: &WalkReport) -> Result<RunManifest> {
        let mut manifest = RunManifest::new(command, output, report.records.len());
        manifest.entities_processed = report.processed;
        manifest.entities_empty = report.empty;
        manifest.entities_failed = report.failed;

        let path = sibling(output, StorageKeys::MANIFEST_SUFFIX);
        self.store.save_manifest(&path, &manifest)?;
        Ok(manifest)
    }
}

fn with_context(context: &[String], schema: &ExtractionSchema) -> Vec<String> {
    let mut columns = context.to_vec();
    columns.extend(schema.columns());
    columns
}

fn league_key(prefix: &str, league: &League, season: u16) -> String {
    format!("{prefix}_{}_{season}", slugify(&league.name))
}

/// `out/injuries_x.csv` + `roster` -> `out/injuries_x_roster.csv`;
/// `manifest.json` keeps its own extension.
fn sibling(output: &Path, suffix: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = if suffix.contains('.') {
        format!("{stem}.{suffix}")
    } else {
        format!("{stem}_{suffix}.csv")
    };
    output.with_file_name(name)
}
