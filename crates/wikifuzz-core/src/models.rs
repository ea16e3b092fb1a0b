use serde::{Deserialize, Serialize};

/// One searchable page. `id` is the colon-separated namespace path of the
/// page inside the store; `title` is what users see and what fuzzy matching
/// runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: String,
    pub title: String,
}

/// Sidecar metadata persisted next to each identity's index snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
    pub last_built: i64,
}

/// A ranked match produced by the fuzzy engine. Score is normalized to
/// roughly 0.0..=1.0, higher is better.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub record: PageRecord,
    pub score: f32,
}
