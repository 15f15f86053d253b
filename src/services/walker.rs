use crate::domain::{Entity, EntityKind, Record};
use crate::error::{Result, ScrapeError};
use crate::infrastructure::{PageFetcher, RateLimiter, TableScraper};
use crate::services::checkpoint::CheckpointWriter;
use crate::utils::{render_template, slugify};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{error, info, warn};

/// How an entity's detail page URL is derived.
#[derive(Debug, Clone)]
pub enum UrlRule {
    /// The URL the entity was discovered with.
    Direct,
    /// `base_url` followed by a template with `{slug}` and `{id}`.
    Template { base_url: String, template: String },
}

impl UrlRule {
    pub fn template(base_url: &str, template: &str) -> Self {
        UrlRule::Template {
            base_url: base_url.trim_end_matches('/').to_string(),
            template: template.to_string(),
        }
    }

    pub fn resolve(&self, entity: &Entity) -> Result<String> {
        match self {
            UrlRule::Direct => entity
                .url
                .clone()
                .ok_or_else(|| ScrapeError::Input(format!("no URL known for {entity}"))),
            UrlRule::Template { base_url, template } => {
                let id = entity
                    .id
                    .as_deref()
                    .ok_or_else(|| ScrapeError::Input(format!("no ID known for {entity}")))?;
                let path = render_template(template, &slugify(&entity.name), id);
                Ok(format!("{base_url}{path}"))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct WalkReport {
    pub records: Vec<Record>,
    pub processed: usize,
    pub empty: usize,
    pub failed: usize,
}

impl WalkReport {
    /// Adds the entity counts of a preceding stage; records stay this stage's.
    pub fn after(mut self, earlier: &WalkReport) -> Self {
        self.processed += earlier.processed;
        self.empty += earlier.empty;
        self.failed += earlier.failed;
        self
    }
}

/// Visits entities one at a time: fetch, locate the table, extract rows.
pub struct EntityWalker {
    fetcher: PageFetcher,
    limiter: RateLimiter,
    timeout: Duration,
    show_progress: bool,
}

impl EntityWalker {
    pub fn new(fetcher: PageFetcher, delay: Duration, timeout: Duration) -> Self {
        Self {
            fetcher,
            limiter: RateLimiter::new(delay),
            timeout,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Failed or table-less entities contribute no records; only storage
    /// errors abort the walk.
    pub async fn walk(
        &mut self,
        entities: &[Entity],
        rule: &UrlRule,
        scraper: &TableScraper,
        checkpoint: &CheckpointWriter,
    ) -> Result<WalkReport> {
        let schema = scraper.schema();
        let pb = self.progress_bar(entities.len() as u64)?;
        let mut report = WalkReport::default();

        for entity in entities {
            pb.set_message(entity.name.clone());
            if entity.kind == EntityKind::Team {
                info!("Processing team: {}", entity.name);
            }

            match self.visit(entity, rule, scraper).await {
                Ok(Some(records)) => {
                    if records.is_empty() {
                        report.empty += 1;
                    }
                    report.records.extend(
                        records
                            .into_iter()
                            .map(|record| record.with_context(&entity.context)),
                    );
                }
                Ok(None) => {
                    info!("No {} table found for {}", schema.name, entity);
                    report.empty += 1;
                }
                Err(e @ ScrapeError::AmbiguousTable { .. }) => {
                    error!("Skipping {}: {}", entity, e);
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("Failed to fetch {} data for {}: {}", schema.name, entity, e);
                    report.failed += 1;
                }
            }

            report.processed += 1;
            checkpoint.observe(report.processed, &report.records)?;
            pb.inc(1);
        }

        checkpoint.finish(&report.records)?;
        pb.finish_and_clear();

        info!(
            "Walked {} entities for {}: {} records, {} empty, {} failed",
            report.processed,
            schema.name,
            report.records.len(),
            report.empty,
            report.failed
        );
        Ok(report)
    }

    async fn visit(
        &mut self,
        entity: &Entity,
        rule: &UrlRule,
        scraper: &TableScraper,
    ) -> Result<Option<Vec<Record>>> {
        let url = rule.resolve(entity)?;
        self.limiter.wait().await;
        let page = self.fetcher.fetch(&url, self.timeout).await?;
        scraper.scrape(&page.markup)
    }

    fn progress_bar(&self, len: u64) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .map_err(|e| ScrapeError::Other(e.to_string()))?,
        );
        Ok(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{INJURIES, ROSTER};
    use crate::domain::storage::RecordStore;
    use crate::infrastructure::{CsvStore, RetryPolicy};
    use reqwest::Client;
    use std::sync::Arc;

    const INJURY_PAGE: &str = r#"<html><body><table class="items"><thead>
        <tr><th>Season</th><th>Injury</th><th>from</th><th>until</th><th>Days</th><th>Games missed</th></tr>
        </thead><tbody>
        <tr class="odd"><td>24/25</td><td>Hamstring injury</td><td>Dec 21, 2024</td><td>Mar 30, 2025</td>
            <td>99 days</td><td><a title="Arsenal FC" href="/c"><img src="11.png"></a>17</td></tr>
        <tr class="even"><td>21/22</td><td>Corona virus</td><td>Jan 1, 2022</td><td>Jan 10, 2022</td>
            <td>9 days</td><td>-</td></tr>
        </tbody></table></body></html>"#;

    fn walker() -> EntityWalker {
        let retry = RetryPolicy {
            max_attempts: 1,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(1),
        };
        EntityWalker::new(
            PageFetcher::new(Client::new(), retry),
            Duration::ZERO,
            Duration::from_secs(5),
        )
        .with_progress(false)
    }

    #[test]
    fn template_urls_use_slug_and_id() {
        let rule = UrlRule::template("https://www.transfermarkt.com/", "/{slug}/verletzungen/spieler/{id}");
        let saka = Entity::player("Bukayo Saka", Some("433177".to_string()));
        assert_eq!(
            rule.resolve(&saka).unwrap(),
            "https://www.transfermarkt.com/bukayo-saka/verletzungen/spieler/433177"
        );
        assert!(rule.resolve(&Entity::player("Nobody", None)).is_err());
        assert!(UrlRule::Direct.resolve(&saka).is_err());
    }

    #[tokio::test]
    async fn failures_and_missing_tables_contribute_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _saka = server
            .mock("GET", "/bukayo-saka/verletzungen/spieler/433177")
            .with_status(200)
            .with_body(INJURY_PAGE)
            .create_async()
            .await;
        let _rice = server
            .mock("GET", "/declan-rice/verletzungen/spieler/357662")
            .with_status(200)
            .with_body("<html><body><p>No injuries</p></body></html>")
            .create_async()
            .await;
        let _gone = server
            .mock("GET", "/ghost/verletzungen/spieler/1")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn RecordStore> = Arc::new(CsvStore::new());
        let entities = vec![
            Entity::player("Bukayo Saka", Some("433177".to_string())),
            Entity::player("Declan Rice", Some("357662".to_string())),
            Entity::player("Ghost", Some("1".to_string())),
            Entity::player("No Id", None),
        ];
        let mut columns = entities[0].context_columns();
        columns.extend(INJURIES.columns());
        let checkpoint =
            CheckpointWriter::new(store.clone(), dir.path().join("injuries.csv"), columns, 2);

        let scraper = TableScraper::new(&INJURIES).unwrap();
        let rule = UrlRule::template(&server.url(), "/{slug}/verletzungen/spieler/{id}");
        let report = walker()
            .walk(&entities, &rule, &scraper, &checkpoint)
            .await
            .unwrap();

        assert_eq!(report.processed, 4);
        assert_eq!(report.empty, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].get("Player"), Some("Bukayo Saka"));
        assert_eq!(report.records[0].get("Player ID"), Some("433177"));
        assert_eq!(report.records[0].get("Club"), Some("Arsenal FC"));
        assert_eq!(report.records[1].get("Club"), Some("Unknown"));

        let saved = store.load_records(checkpoint.destination()).unwrap();
        assert_eq!(saved, report.records);
    }

    #[tokio::test]
    async fn roster_rows_without_links_are_not_visited() {
        let mut server = mockito::Server::new_async().await;
        let roster_page = r#"<html><body><table class="items"><tbody>
            <tr class="odd"><td class="posrela"><table>
                <tr><td class="hauptlink"><a href="/bukayo-saka/profil/spieler/433177">Bukayo Saka</a></td></tr>
                <tr><td>Right Winger</td></tr></table></td>
              <td class="zentriert">7</td><td class="zentriert">Sep 5, 2001 (23)</td></tr>
            <tr class="even"><td class="posrela"><table>
                <tr><td class="hauptlink">Unnamed</td></tr>
                <tr><td>Goalkeeper</td></tr></table></td>
              <td class="zentriert">1</td><td class="zentriert">-</td></tr>
            </tbody></table></body></html>"#;
        let _team = server
            .mock("GET", "/fc-arsenal/startseite/verein/11")
            .with_status(200)
            .with_body(roster_page)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let team = Entity::team_from_record(
            &Record::from_pairs([("Team", "Arsenal FC"), ("URL", "/fc-arsenal/startseite/verein/11")]),
            &server.url(),
        )
        .unwrap();
        let mut columns = team.context_columns();
        columns.extend(ROSTER.columns());
        let checkpoint = CheckpointWriter::new(
            Arc::new(CsvStore::new()),
            dir.path().join("roster.csv"),
            columns,
            0,
        );

        let scraper = TableScraper::new(&ROSTER).unwrap();
        let report = walker()
            .walk(&[team], &UrlRule::Direct, &scraper, &checkpoint)
            .await
            .unwrap();

        let players: Vec<Entity> = report
            .records
            .iter()
            .filter_map(|r| Entity::player_from_record(r, &server.url()))
            .collect();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Bukayo Saka");
        assert_eq!(players[0].id.as_deref(), Some("433177"));
        assert_eq!(report.records[0].get("Team"), Some("Arsenal FC"));
        assert_eq!(report.records[0].get("Age"), Some("23"));
    }
}
