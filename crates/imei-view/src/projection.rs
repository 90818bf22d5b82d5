//! Visible subset of the record collection.

use imei_model::{Record, StateFilter};

/// Status filter and search term, applied together (AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub state: StateFilter,
    /// Raw search input; only its trimmed form is matched.
    pub search: String,
}

impl ViewFilter {
    pub fn new(state: StateFilter, search: impl Into<String>) -> Self {
        Self {
            state,
            search: search.into(),
        }
    }

    /// Trimmed search term used for matching.
    pub fn search_term(&self) -> &str {
        self.search.trim()
    }

    /// True when neither predicate restricts the view.
    pub fn is_passthrough(&self) -> bool {
        self.state == StateFilter::All && self.search_term().is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.state.matches(record.estado) && record.imei_ends_with(self.search_term())
    }

    /// Keep the records passing both predicates, in input order.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Project the full collection onto the visible view.
pub fn project<'a>(
    records: &'a [Record],
    state_filter: StateFilter,
    search_term: &str,
) -> Vec<&'a Record> {
    ViewFilter::new(state_filter, search_term).apply(records)
}
