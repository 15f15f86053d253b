/// Which element(s) of a candidate list a field reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Nth(usize),
    Last,
    All,
}

/// Where a field lives inside a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Positional column over the row's `td` cells.
    Column(Pick),
    /// Elements matching a CSS selector relative to the row.
    Css(&'static str, Pick),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Trimmed visible text.
    Text,
    /// `alt` or `title` of the embedded image, else the text.
    Image,
    /// `title` of the embedded link, else [`UNKNOWN`].
    LinkTitle,
    /// Text of the embedded link; missing when there is no link.
    LinkText,
    /// `href` of the embedded link; missing when there is no link.
    Href,
    /// `"primary (secondary)"` split into two fields, see
    /// [`crate::utils::split_composite`].
    Composite { secondary: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMissing {
    SkipRow,
    Fill(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub cell: Cell,
    pub rule: FieldRule,
    pub on_missing: OnMissing,
}

impl FieldSpec {
    const fn column(name: &'static str, pick: Pick, rule: FieldRule) -> Self {
        Self {
            name,
            cell: Cell::Column(pick),
            rule,
            on_missing: OnMissing::Fill(""),
        }
    }

    const fn css(name: &'static str, selector: &'static str, pick: Pick, rule: FieldRule) -> Self {
        Self {
            name,
            cell: Cell::Css(selector, pick),
            rule,
            on_missing: OnMissing::Fill(""),
        }
    }

    const fn required(mut self) -> Self {
        self.on_missing = OnMissing::SkipRow;
        self
    }

    const fn or(mut self, fill: &'static str) -> Self {
        self.on_missing = OnMissing::Fill(fill);
        self
    }
}

pub const UNKNOWN: &str = "Unknown";

/// Column layout of one kind of data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionSchema {
    pub name: &'static str,
    pub table_selector: &'static str,
    pub row_selector: &'static str,
    pub fields: &'static [FieldSpec],
    /// Lower bound on `td` cells per row, on top of what the fields need.
    pub min_cells: usize,
}

impl ExtractionSchema {
    /// Number of `td` cells a row needs for every positional field to exist.
    pub fn min_columns(&self) -> usize {
        self.fields
            .iter()
            .filter_map(|f| match f.cell {
                Cell::Column(Pick::Nth(i)) => Some(i + 1),
                Cell::Column(_) => Some(1),
                Cell::Css(..) => None,
            })
            .max()
            .unwrap_or(0)
            .max(self.min_cells)
    }

    /// Output field names in extraction order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            columns.push(field.name.to_string());
            if let FieldRule::Composite { secondary } = field.rule {
                columns.push(secondary.to_string());
            }
        }
        columns
    }
}

pub mod fields {
    pub const TEAM: &str = "Team";
    pub const URL: &str = "URL";
    pub const PLAYER: &str = "Player";
    pub const PLAYER_ID: &str = "Player ID";
    pub const PROFILE_URL: &str = "Profile URL";
}

const ITEMS_TABLE: &str = "table.items";
const STRIPED_ROWS: &str = "tr.odd, tr.even";

/// Club table on a league overview page.
pub static TEAMS: ExtractionSchema = ExtractionSchema {
    name: "teams",
    table_selector: ITEMS_TABLE,
    row_selector: STRIPED_ROWS,
    fields: &[
        FieldSpec::css(fields::TEAM, "td.hauptlink.no-border-links", Pick::Nth(0), FieldRule::LinkText)
            .required(),
        FieldSpec::css(fields::URL, "td.hauptlink.no-border-links", Pick::Nth(0), FieldRule::Href)
            .required(),
    ],
    min_cells: 0,
};

/// Squad table on a club page. Player rows nest an inline table for
/// name and position, so fields are located by class rather than position.
pub static ROSTER: ExtractionSchema = ExtractionSchema {
    name: "roster",
    table_selector: ITEMS_TABLE,
    row_selector: STRIPED_ROWS,
    fields: &[
        FieldSpec::css(fields::PLAYER, "td.hauptlink", Pick::Nth(0), FieldRule::LinkText).required(),
        FieldSpec::css("Position", "td.posrela td", Pick::Last, FieldRule::Text),
        FieldSpec::css(
            "Birthdate",
            "td.zentriert",
            Pick::Nth(1),
            FieldRule::Composite { secondary: "Age" },
        ),
        FieldSpec::css("Nationality", "td.zentriert img.flaggenrahmen", Pick::All, FieldRule::Image),
        FieldSpec::css("Market Value", "td.rechts.hauptlink", Pick::Nth(0), FieldRule::Text).or("N/A"),
        FieldSpec::css(fields::PROFILE_URL, "td.hauptlink", Pick::Nth(0), FieldRule::Href).required(),
    ],
    min_cells: 0,
};

/// Injury history table on a player's injury page.
pub static INJURIES: ExtractionSchema = ExtractionSchema {
    name: "injuries",
    table_selector: ITEMS_TABLE,
    row_selector: "tbody tr",
    fields: &[
        FieldSpec::column("Season", Pick::Nth(0), FieldRule::Text),
        FieldSpec::column("Injury", Pick::Nth(1), FieldRule::Text),
        FieldSpec::column("From", Pick::Nth(2), FieldRule::Text),
        FieldSpec::column("Until", Pick::Nth(3), FieldRule::Text),
        FieldSpec::column("Days Out", Pick::Nth(4), FieldRule::Text),
        FieldSpec::column("Games Missed", Pick::Nth(5), FieldRule::Text),
        FieldSpec::column("Club", Pick::Nth(5), FieldRule::LinkTitle),
    ],
    min_cells: 0,
};

/// Detailed performance table, one row per season, competition and club.
pub static SEASON_STATS: ExtractionSchema = ExtractionSchema {
    name: "season stats",
    table_selector: ITEMS_TABLE,
    row_selector: STRIPED_ROWS,
    fields: &[
        FieldSpec::column("Season", Pick::Nth(0), FieldRule::Text),
        FieldSpec::column("Competition", Pick::Nth(1), FieldRule::Image),
        FieldSpec::column("Club", Pick::Nth(2), FieldRule::Image),
        FieldSpec::column("Appearances", Pick::Nth(4), FieldRule::Text),
        FieldSpec::column("Minutes Played", Pick::Last, FieldRule::Text),
    ],
    // rows narrower than seven cells are subtotal or header rows
    min_cells: 7,
};
