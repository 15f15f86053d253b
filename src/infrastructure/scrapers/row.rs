use crate::domain::schema::{Cell, FieldRule, FieldSpec, OnMissing, Pick, UNKNOWN};
use crate::domain::{ExtractionSchema, Record};
use crate::error::Result;
use crate::infrastructure::scrapers::parse_selector;
use crate::utils::split_composite;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

struct CompiledField {
    spec: &'static FieldSpec,
    selector: Option<Selector>,
}

/// Turns table rows into records following an [`ExtractionSchema`].
pub struct RowExtractor {
    fields: Vec<CompiledField>,
    min_columns: usize,
}

impl RowExtractor {
    pub fn new(schema: &'static ExtractionSchema) -> Result<Self> {
        let fields = schema
            .fields
            .iter()
            .map(|spec| {
                let selector = match spec.cell {
                    Cell::Css(css, _) => Some(parse_selector(css)?),
                    Cell::Column(_) => None,
                };
                Ok(CompiledField { spec, selector })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fields,
            min_columns: schema.min_columns(),
        })
    }

    /// `None` when the row is too short or lacks a required field.
    pub fn extract(&self, row: ElementRef<'_>) -> Option<Record> {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
        if cells.len() < self.min_columns {
            return None;
        }

        let mut record = Record::new();
        for field in &self.fields {
            let targets = match (&field.spec.cell, &field.selector) {
                (Cell::Css(_, pick), Some(selector)) => {
                    let found: Vec<ElementRef<'_>> = row.select(selector).collect();
                    pick_elements(&found, *pick)
                }
                (Cell::Column(pick), _) | (Cell::Css(_, pick), None) => pick_elements(&cells, *pick),
            };

            let values: Vec<String> = targets
                .into_iter()
                .filter_map(|el| apply_rule(el, field.spec.rule))
                .filter(|v| !v.is_empty())
                .collect();

            let value = if values.is_empty() {
                match field.spec.on_missing {
                    OnMissing::SkipRow => return None,
                    OnMissing::Fill(fill) => fill.to_string(),
                }
            } else {
                values.join(", ")
            };

            match field.spec.rule {
                FieldRule::Composite { secondary } => {
                    let (first, second) = split_composite(&value);
                    record.push(field.spec.name, first);
                    record.push(secondary, second);
                }
                _ => record.push(field.spec.name, value),
            }
        }

        Some(record)
    }
}

fn pick_elements<'a>(elements: &[ElementRef<'a>], pick: Pick) -> Vec<ElementRef<'a>> {
    match pick {
        Pick::Nth(i) => elements.get(i).copied().into_iter().collect(),
        Pick::Last => elements.last().copied().into_iter().collect(),
        Pick::All => elements.to_vec(),
    }
}

fn apply_rule(el: ElementRef<'_>, rule: FieldRule) -> Option<String> {
    match rule {
        FieldRule::Text | FieldRule::Composite { .. } => Some(text(el)),
        FieldRule::Image => Some(
            embedded(el, "img", &IMG)
                .and_then(|img| non_empty_attr(img, "alt").or_else(|| non_empty_attr(img, "title")))
                .unwrap_or_else(|| text(el)),
        ),
        FieldRule::LinkTitle => Some(
            embedded(el, "a", &LINK)
                .and_then(|a| non_empty_attr(a, "title"))
                .unwrap_or_else(|| UNKNOWN.to_string()),
        ),
        FieldRule::LinkText => embedded(el, "a", &LINK).map(text),
        FieldRule::Href => embedded(el, "a", &LINK).and_then(|a| non_empty_attr(a, "href")),
    }
}

/// `el` itself when it is a `tag`, else its first `tag` descendant.
fn embedded<'a>(el: ElementRef<'a>, tag: &str, selector: &Selector) -> Option<ElementRef<'a>> {
    if el.value().name() == tag {
        Some(el)
    } else {
        el.select(selector).next()
    }
}

fn non_empty_attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
