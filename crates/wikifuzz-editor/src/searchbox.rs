use crate::autocomplete::Key;
use crate::fetch::{IndexSource, QueryEngine};

/// Placeholder row shown for a non-empty query with zero matches.
pub const NO_MATCHES_LABEL: &str = "No matches found";

/// Placeholder row shown when the index itself failed to load.
pub const LOAD_ERROR_LABEL: &str = "Error loading search data";

const SEARCH_LIMIT: usize = 50;

/// One rendered line of the result list. Placeholders are informational and
/// never selectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Hit { title: String, href: String },
    Placeholder(&'static str),
}

impl Row {
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}

/// Standalone search widget: the whole field value is re-queried on every
/// change, no debounce, no caret anchoring. Selection starts at "none"
/// (index -1 in the host markup) and an Up beyond the first row returns
/// there.
pub struct SearchBox {
    engine: QueryEngine,
    base_url: String,
    rows: Vec<Row>,
    selected: Option<usize>,
    load_failed: bool,
}

impl SearchBox {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            engine: QueryEngine::new(),
            base_url: base_url.into(),
            rows: Vec::new(),
            selected: None,
            load_failed: false,
        }
    }

    pub fn load(&mut self, source: &dyn IndexSource) {
        self.engine.load(source);
        if !self.engine.is_ready() {
            self.load_failed = true;
            self.rows = vec![Row::Placeholder(LOAD_ERROR_LABEL)];
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The field value changed; rebuild the list synchronously. An empty
    /// query clears the list without any placeholder.
    pub fn on_change(&mut self, value: &str) {
        if self.load_failed {
            return;
        }
        self.rows.clear();
        self.selected = None;

        let query = value.trim();
        if query.is_empty() {
            return;
        }

        let hits = self.engine.search(query, SEARCH_LIMIT);
        if hits.is_empty() {
            self.rows.push(Row::Placeholder(NO_MATCHES_LABEL));
            return;
        }
        self.rows = hits
            .into_iter()
            .map(|hit| Row::Hit {
                href: format!(
                    "{}/page?id={}",
                    self.base_url.trim_end_matches('/'),
                    hit.record.id
                ),
                title: hit.record.title,
            })
            .collect();
    }

    /// Keyboard navigation. Enter on a selected row yields the href to
    /// navigate to; everything else returns `None`.
    pub fn key(&mut self, key: Key) -> Option<String> {
        let last_selectable = self.rows.iter().rposition(Row::is_selectable)?;
        match key {
            Key::Down => {
                self.selected = Some(match self.selected {
                    None => 0,
                    Some(index) if index < last_selectable => index + 1,
                    Some(index) => index,
                });
                None
            }
            Key::Up => {
                self.selected = match self.selected {
                    Some(0) | None => None,
                    Some(index) => Some(index - 1),
                };
                None
            }
            Key::Enter => {
                let index = self.selected?;
                match self.rows.get(index)? {
                    Row::Hit { href, .. } => Some(href.clone()),
                    Row::Placeholder(_) => None,
                }
            }
            _ => None,
        }
    }
}
