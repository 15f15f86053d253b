use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub name: String,
    pub code: String,
    pub url_name: String,
}

impl League {
    fn new(name: &str, code: &str, url_name: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            url_name: url_name.to_string(),
        }
    }

    /// Matches on display name, code or URL name, ignoring case.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query)
            || self.code.eq_ignore_ascii_case(query)
            || self.url_name.eq_ignore_ascii_case(query)
    }
}

pub(crate) fn default_leagues() -> Vec<League> {
    vec![
        League::new("Premier League", "GB1", "premier-league"),
        League::new("Bundesliga", "L1", "bundesliga"),
        League::new("Ligue 1", "FR1", "ligue-1"),
        League::new("Serie A", "IT1", "serie-a"),
        League::new("La Liga", "ES1", "laliga"),
        League::new("Süper Lig", "TR1", "super-lig"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_any_identifier() {
        let leagues = default_leagues();
        let laliga = leagues.iter().find(|l| l.matches("laliga")).unwrap();
        assert_eq!(laliga.code, "ES1");
        assert!(laliga.matches("La Liga"));
        assert!(laliga.matches("es1"));
        assert!(!laliga.matches("Serie A"));
    }
}
