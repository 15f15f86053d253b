use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};

/// Finds the single table matching `selector`.
///
/// No match is a valid outcome (`Ok(None)`); several matches are reported as
/// [`ScrapeError::AmbiguousTable`] instead of guessing which one is meant.
pub fn locate<'a>(
    document: &'a Html,
    selector: &Selector,
    selector_text: &str,
) -> Result<Option<ElementRef<'a>>> {
    let mut matches = document.select(selector);
    let first = matches.next();
    let others = matches.count();
    if others > 0 {
        return Err(ScrapeError::AmbiguousTable {
            selector: selector_text.to_string(),
            count: others + 1,
        });
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Selector {
        Selector::parse("table.items").unwrap()
    }

    #[test]
    fn finds_the_only_match() {
        let document = Html::parse_document(
            r#"<table class="box"></table><table class="items" id="target"></table>"#,
        );
        let table = locate(&document, &items(), "table.items").unwrap().unwrap();
        assert_eq!(table.value().attr("id"), Some("target"));
    }

    #[test]
    fn absent_table_is_not_an_error() {
        let document = Html::parse_document("<p>Keine Verletzungen</p>");
        assert!(locate(&document, &items(), "table.items").unwrap().is_none());
    }

    #[test]
    fn several_matches_are_rejected() {
        let document = Html::parse_document(
            r#"<table class="items"></table><table class="items"></table>"#,
        );
        let err = locate(&document, &items(), "table.items").unwrap_err();
        assert!(matches!(err, ScrapeError::AmbiguousTable { count: 2, .. }));
    }
}
