use crate::domain::schema::fields;
use crate::domain::Record;
use crate::utils::{absolute_url, extract_player_id};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    League,
    Team,
    Player,
}

/// A team or player to visit. `context` is copied in front of every record
/// extracted from the entity's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: String,
    pub id: Option<String>,
    pub url: Option<String>,
    pub context: Vec<(String, String)>,
}

impl Entity {
    /// A player from an input list; the context mirrors the input columns.
    pub fn player(name: impl Into<String>, id: Option<String>) -> Self {
        let name = name.into();
        let context = vec![
            (fields::PLAYER.to_string(), name.clone()),
            (fields::PLAYER_ID.to_string(), id.clone().unwrap_or_default()),
        ];
        Self {
            kind: EntityKind::Player,
            name,
            id,
            url: None,
            context,
        }
    }

    /// A team from a league table record (`Team`, `URL`).
    pub fn team_from_record(record: &Record, base_url: &str) -> Option<Self> {
        let name = record.get(fields::TEAM)?.to_string();
        let url = absolute_url(base_url, record.get(fields::URL)?).ok()?;
        Some(Self {
            kind: EntityKind::Team,
            context: vec![(fields::TEAM.to_string(), name.clone())],
            name,
            id: None,
            url: Some(url),
        })
    }

    /// A player from a roster record. Every roster field except the profile
    /// link becomes context, with the player id inserted after the name.
    pub fn player_from_record(record: &Record, base_url: &str) -> Option<Self> {
        let name = record.get(fields::PLAYER)?.to_string();
        let url = absolute_url(base_url, record.get(fields::PROFILE_URL)?).ok()?;
        let id = extract_player_id(&url);

        let mut context = Vec::with_capacity(record.len());
        for (field, value) in record.iter() {
            if field == fields::PROFILE_URL {
                continue;
            }
            context.push((field.to_string(), value.to_string()));
            if field == fields::PLAYER {
                context.push((fields::PLAYER_ID.to_string(), id.clone().unwrap_or_default()));
            }
        }

        Some(Self {
            kind: EntityKind::Player,
            name,
            id,
            url: Some(url),
            context,
        })
    }

    pub fn context_columns(&self) -> Vec<String> {
        self.context.iter().map(|(k, _)| k.clone()).collect()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} (ID: {})", self.name, id),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Drops repeated (name, id) pairs, keeping the first occurrence.
pub fn dedup_entities(entities: Vec<Entity>) -> Vec<Entity> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|e| seen.insert((e.name.clone(), e.id.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_from_roster_record_keeps_roster_context() {
        let record = Record::from_pairs([
            ("Team", "Arsenal FC"),
            ("Player", "Bukayo Saka"),
            ("Position", "Right Winger"),
            ("Profile URL", "/bukayo-saka/profil/spieler/433177"),
        ]);
        let player = Entity::player_from_record(&record, "https://www.transfermarkt.com").unwrap();

        assert_eq!(player.id.as_deref(), Some("433177"));
        assert_eq!(
            player.url.as_deref(),
            Some("https://www.transfermarkt.com/bukayo-saka/profil/spieler/433177")
        );
        assert_eq!(
            player.context_columns(),
            vec!["Team", "Player", "Player ID", "Position"]
        );
    }

    #[test]
    fn team_requires_name_and_link() {
        let record = Record::from_pairs([("Team", "Arsenal FC")]);
        assert!(Entity::team_from_record(&record, "https://www.transfermarkt.com").is_none());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let players = vec![
            Entity::player("Rodri", Some("357565".to_string())),
            Entity::player("Saka", Some("433177".to_string())),
            Entity::player("Rodri", Some("357565".to_string())),
        ];
        let unique = dedup_entities(players);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name, "Rodri");
        assert_eq!(unique[1].name, "Saka");
    }
}
