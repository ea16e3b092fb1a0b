use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::models::{PageRecord, SearchHit};

/// Patterns shorter than this never match; single characters produce too
/// much noise against an entire wiki's titles.
pub const MIN_PATTERN_LEN: usize = 2;

/// Ranked fuzzy matching over page titles. Scoring is delegated wholesale
/// to `nucleo-matcher`; this type only decides what is matched (titles) and
/// how results are consumed (top-N by score, record payload preserved).
pub struct FuzzyEngine {
    matcher: Matcher,
    records: Vec<PageRecord>,
}

impl FuzzyEngine {
    #[must_use]
    pub fn new(records: Vec<PageRecord>) -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            records,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Top `limit` records whose title fuzzily matches `phrase`, best first,
    /// ties broken by id for a stable order.
    pub fn search(&mut self, phrase: &str, limit: usize) -> Vec<SearchHit> {
        if phrase.chars().count() < MIN_PATTERN_LEN {
            return Vec::new();
        }

        let Self { matcher, records } = self;
        // nucleo requires a case-folded needle; `Config::DEFAULT` folds
        // only the haystack
        let folded = phrase.to_lowercase();
        let mut needle_buf = Vec::new();
        let needle = Utf32Str::new(&folded, &mut needle_buf);

        let mut scored: Vec<(usize, u16)> = Vec::new();
        let mut haystack_buf = Vec::new();
        for (index, record) in records.iter().enumerate() {
            haystack_buf.clear();
            let haystack = Utf32Str::new(&record.title, &mut haystack_buf);
            if let Some(score) = matcher.fuzzy_match(haystack, needle) {
                scored.push((index, score));
            }
        }

        scored.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| records[a.0].id.cmp(&records[b.0].id))
        });
        scored.truncate(limit);
        scored
            .into_iter()
            .map(|(index, score)| SearchHit {
                record: records[index].clone(),
                score: f32::from(score) / 1000.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str) -> PageRecord {
        PageRecord {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    fn engine() -> FuzzyEngine {
        FuzzyEngine::new(vec![
            record("getting_started", "Getting Started"),
            record("wiki:syntax", "Formatting Syntax"),
            record("wiki:welcome", "Welcome to your new Wiki"),
        ])
    }

    #[test]
    fn matches_prefix_fragment_against_title() {
        let hits = engine().search("Gett", 10);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].record.id, "getting_started");
        assert!(hits[0].score > 0.0);
    }

    #[test]
    fn single_character_phrase_matches_nothing() {
        assert!(engine().search("G", 10).is_empty());
        assert!(engine().search("", 10).is_empty());
    }

    #[test]
    fn unmatched_phrase_returns_empty() {
        assert!(engine().search("zzqqxx", 10).is_empty());
    }

    #[test]
    fn limit_truncates_ranked_results() {
        let hits = engine().search("wi", 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let hits = engine().search("getting", 10);
        assert_eq!(hits[0].record.id, "getting_started");
    }

    #[test]
    fn capitalized_phrase_matches_like_lowercase() {
        let upper = engine().search("GETT", 10);
        assert!(!upper.is_empty());
        assert_eq!(upper[0].record.id, "getting_started");

        let lower = engine().search("gett", 10);
        assert_eq!(upper.len(), lower.len());
        assert_eq!(upper[0].record.id, lower[0].record.id);
    }
}
