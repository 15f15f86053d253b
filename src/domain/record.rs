/// One extracted fact (an injury, a season stint, a roster entry) as an
/// ordered list of field name / value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy with `context` placed in front of the extracted fields.
    pub fn with_context(self, context: &[(String, String)]) -> Self {
        if context.is_empty() {
            return self;
        }
        let mut fields = context.to_vec();
        fields.extend(self.fields);
        Self { fields }
    }

    /// Values in `columns` order, empty for fields this record lacks.
    pub fn row<'a>(&'a self, columns: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        columns.iter().map(move |c| self.get(c).unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_comes_first() {
        let record = Record::from_pairs([("Season", "23/24"), ("Injury", "Knee injury")])
            .with_context(&[("Player".to_string(), "Bukayo Saka".to_string())]);

        let names: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Player", "Season", "Injury"]);
        assert_eq!(record.get("Injury"), Some("Knee injury"));
        assert_eq!(record.get("Club"), None);
    }

    #[test]
    fn row_fills_missing_columns() {
        let record = Record::from_pairs([("A", "1"), ("C", "3")]);
        let columns = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(record.row(&columns).collect::<Vec<_>>(), vec!["1", "", "3"]);
    }
}
