use reqwest::blocking::Client;
use thiserror::Error;

use wikifuzz_core::{FuzzyEngine, PageRecord, SearchHit};

/// Call name the index endpoint answers to.
pub const INDEX_CALL: &str = "fuzzysearch_pages";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("index fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("index endpoint returned status {0}")]
    Status(u16),
}

/// Where the page index comes from. Production uses [`IndexClient`]; tests
/// inject canned record sets or failures.
pub trait IndexSource {
    fn fetch_index(&self) -> Result<Vec<PageRecord>, FetchError>;
}

/// Fetches the `{id, title}` index over HTTP with the caller's session
/// cookie attached, mirroring a same-origin credentialed request.
pub struct IndexClient {
    http: Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl IndexClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self {
            http: Client::builder().build()?,
            base_url: base_url.into(),
            session_cookie: None,
        })
    }

    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }
}

impl IndexSource for IndexClient {
    fn fetch_index(&self) -> Result<Vec<PageRecord>, FetchError> {
        let url = format!(
            "{}/api/ajax?call={INDEX_CALL}",
            self.base_url.trim_end_matches('/')
        );
        let mut request = self.http.get(&url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        let response = request.send()?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        Ok(response.json()?)
    }
}

/// Client-side query engine: loads the index at most once per instance and
/// answers ranked title queries from it.
///
/// A failed load is terminal for the instance. Every later `search` is a
/// logged no-op returning no hits, so a broken index degrades the UI to
/// inert rather than throwing into the host.
#[derive(Default)]
pub struct QueryEngine {
    engine: Option<FuzzyEngine>,
    load_attempted: bool,
}

impl QueryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, source: &dyn IndexSource) {
        if self.load_attempted {
            return;
        }
        self.load_attempted = true;
        match source.fetch_index() {
            Ok(records) => {
                tracing::debug!(pages = records.len(), "page index loaded");
                self.engine = Some(FuzzyEngine::new(records));
            }
            Err(err) => {
                tracing::warn!(error = %err, "page index fetch failed; search stays disabled");
            }
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    pub fn search(&mut self, phrase: &str, limit: usize) -> Vec<SearchHit> {
        match &mut self.engine {
            Some(engine) => engine.search(phrase, limit),
            None => {
                tracing::debug!("search before index ready; ignoring");
                Vec::new()
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{FailingSource, StaticSource, record};
    use super::*;

    #[test]
    fn load_happens_at_most_once() {
        let source = StaticSource::new(vec![record("start", "Start")]);
        let mut engine = QueryEngine::new();
        engine.load(&source);
        engine.load(&source);
        assert_eq!(source.fetches.get(), 1);
        assert!(engine.is_ready());
    }

    #[test]
    fn failed_load_is_terminal_and_searches_noop() {
        let mut engine = QueryEngine::new();
        engine.load(&FailingSource);
        assert!(!engine.is_ready());
        assert!(engine.search("start", 10).is_empty());

        // no retry: a later load against a healthy source is still ignored
        let healthy = StaticSource::new(vec![record("start", "Start")]);
        engine.load(&healthy);
        assert_eq!(healthy.fetches.get(), 0);
        assert!(!engine.is_ready());
    }

    #[test]
    fn ready_engine_answers_queries() {
        let source = StaticSource::new(vec![record("getting_started", "Getting Started")]);
        let mut engine = QueryEngine::new();
        engine.load(&source);
        let hits = engine.search("Gett", 10);
        assert_eq!(hits[0].record.id, "getting_started");
    }
}
