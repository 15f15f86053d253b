use crate::error::{Result, ScrapeError};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static PLAYER_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/spieler/(\d+)").unwrap());

/// URL slug of a display name: lowercase, spaces become hyphens and
/// diacritics are folded (`"Kylian Mbappé"` -> `"kylian-mbappe"`).
pub fn slugify(name: &str) -> String {
    name.trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .replace(' ', "-")
}

/// Numeric player id embedded in a profile URL.
pub fn extract_player_id(url: &str) -> Option<String> {
    PLAYER_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Cleans up identifiers read from spreadsheets, where ids often arrive
/// as floats (`"28003.0"`).
pub fn normalize_id(raw: &str) -> Option<String> {
    let id = raw.trim();
    let id = id.strip_suffix(".0").unwrap_or(id);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

pub fn render_template(template: &str, slug: &str, id: &str) -> String {
    template.replace("{slug}", slug).replace("{id}", id)
}

pub fn absolute_url(base: &str, href: &str) -> Result<String> {
    let base = Url::parse(base).map_err(|e| ScrapeError::Parse(format!("{base}: {e}")))?;
    let url = base
        .join(href.trim())
        .map_err(|e| ScrapeError::Parse(format!("{href}: {e}")))?;
    Ok(url.to_string())
}

/// Splits `"Sep 5, 2001 (23)"` into `("Sep 5, 2001", "23")`.
///
/// Without an opening parenthesis the whole trimmed text is the primary
/// value and the secondary one is empty.
pub fn split_composite(raw: &str) -> (String, String) {
    match raw.split_once('(') {
        Some((primary, rest)) => {
            let secondary = rest.split(')').next().unwrap_or_default();
            (primary.trim().to_string(), secondary.trim().to_string())
        }
        None => (raw.trim().to_string(), String::new()),
    }
}
