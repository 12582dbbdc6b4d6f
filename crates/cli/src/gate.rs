use showfinder_core::SearchQuery;
use showfinder_core::query::MIN_QUERY_CHARS;
use tracing::debug;

/// Observable state of the search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Editing,
    /// A query was emitted and the text has not been edited since.
    Submitted(SearchQuery),
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editing => "Editing",
            Self::Submitted(_) => "Submitted",
        }
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buffers typed text and emits a query only on an explicit submit.
///
/// Keystrokes never reach the dispatcher. A submit with fewer than
/// `min_chars` characters after trimming is ignored.
#[derive(Debug, Clone)]
pub struct SearchGate {
    text: String,
    min_chars: usize,
    submitted: Option<SearchQuery>,
}

impl Default for SearchGate {
    fn default() -> Self {
        Self::new(MIN_QUERY_CHARS)
    }
}

impl SearchGate {
    pub fn new(min_chars: usize) -> Self {
        Self {
            text: String::new(),
            min_chars,
            submitted: None,
        }
    }

    /// Start with pre-filled text, e.g. when returning to a previous search.
    pub fn with_text(min_chars: usize, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(min_chars)
        }
    }

    /// Replace the buffered text. Any edit returns the gate to `Editing`.
    pub fn input(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.submitted = None;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Whether the submit control is enabled for the current text.
    pub fn is_submit_enabled(&self) -> bool {
        SearchQuery::new(&self.text).meets_minimum(self.min_chars)
    }

    /// Emit the trimmed text, or `None` when it is too short.
    pub fn submit(&mut self) -> Option<SearchQuery> {
        let query = SearchQuery::new(&self.text);
        if !query.meets_minimum(self.min_chars) {
            debug!(
                chars = query.char_len(),
                min_chars = self.min_chars,
                "submit ignored, query too short"
            );
            return None;
        }

        debug!(query = %query, "query submitted");
        self.submitted = Some(query.clone());
        Some(query)
    }

    pub fn state(&self) -> GateState {
        match &self.submitted {
            Some(query) => GateState::Submitted(query.clone()),
            None => GateState::Editing,
        }
    }
}
