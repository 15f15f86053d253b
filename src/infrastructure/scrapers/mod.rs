use crate::domain::{ExtractionSchema, Record};
use crate::error::{Result, ScrapeError};
use scraper::{Html, Selector};

pub(crate) mod row;
pub(crate) mod table;

use row::RowExtractor;

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Selector(format!("invalid CSS selector '{selector}': {e}")))
}

/// Locates a schema's table in a page and extracts its rows.
pub struct TableScraper {
    schema: &'static ExtractionSchema,
    table: Selector,
    rows: Selector,
    extractor: RowExtractor,
}

impl TableScraper {
    pub fn new(schema: &'static ExtractionSchema) -> Result<Self> {
        Ok(Self {
            schema,
            table: parse_selector(schema.table_selector)?,
            rows: parse_selector(schema.row_selector)?,
            extractor: RowExtractor::new(schema)?,
        })
    }

    pub fn schema(&self) -> &'static ExtractionSchema {
        self.schema
    }

    /// `Ok(None)` when the page has no such table.
    pub fn scrape(&self, markup: &str) -> Result<Option<Vec<Record>>> {
        let document = Html::parse_document(markup);
        let Some(table) = table::locate(&document, &self.table, self.schema.table_selector)? else {
            return Ok(None);
        };

        let records = table
            .select(&self.rows)
            .filter_map(|row| self.extractor.extract(row))
            .collect();
        Ok(Some(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::TEAMS;

    #[test]
    fn scrapes_league_team_links() {
        let scraper = TableScraper::new(&TEAMS).unwrap();
        let records = scraper
            .scrape(
                r#"<table class="items"><thead><tr><th>Club</th></tr></thead><tbody>
                <tr class="odd"><td class="zentriert no-border-rechts"><a href="/a"><img alt="Arsenal FC"></a></td>
                    <td class="hauptlink no-border-links"><a href="/fc-arsenal/startseite/verein/11/saison_id/2024">Arsenal FC</a></td></tr>
                <tr class="even"><td class="hauptlink no-border-links"></td></tr>
                </tbody></table>"#,
            )
            .unwrap()
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Team"), Some("Arsenal FC"));
        assert_eq!(
            records[0].get("URL"),
            Some("/fc-arsenal/startseite/verein/11/saison_id/2024")
        );
    }

    #[test]
    fn missing_table_yields_none() {
        let scraper = TableScraper::new(&TEAMS).unwrap();
        assert!(scraper.scrape("<html><body></body></html>").unwrap().is_none());
    }
}
