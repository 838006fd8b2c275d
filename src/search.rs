//! Typo-tolerant search over article titles and descriptions.
//!
//! A field matches when some substring of it is within
//! `FUZZY_THRESHOLD * query length` edits of the query, compared
//! case-insensitively. With the default threshold of 0.3 a ten character
//! query tolerates three typos.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::SearchEntry;

pub const FUZZY_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Title,
    Description,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    pub entry: &'a SearchEntry,
    /// Normalized edit distance, 0.0 is a perfect match.
    pub score: f64,
    pub field: MatchField,
    #[serde(skip)]
    exact: bool,
}

#[derive(Debug, Clone)]
pub struct Searcher {
    entries: Vec<SearchEntry>,
    threshold: f64,
}

impl Searcher {
    pub fn new(entries: Vec<SearchEntry>) -> Self {
        Self {
            entries,
            threshold: FUZZY_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Matching entries, best first. An empty query returns every entry in
    /// source order.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let query = query.trim();
        if query.is_empty() {
            return self
                .entries
                .iter()
                .map(|entry| SearchHit {
                    entry,
                    score: 0.0,
                    field: MatchField::Title,
                    exact: false,
                })
                .collect();
        }

        let pattern: Vec<char> = query.to_lowercase().chars().collect();
        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .filter_map(|entry| self.best_match(entry, &pattern))
            .collect();
        hits.sort_by(compare_hits);
        hits
    }

    fn best_match<'a>(&self, entry: &'a SearchEntry, pattern: &[char]) -> Option<SearchHit<'a>> {
        [
            (MatchField::Title, entry.title.as_str()),
            (MatchField::Description, entry.description.as_str()),
        ]
        .into_iter()
        .filter_map(|(field, text)| {
            let text: Vec<char> = text.to_lowercase().chars().collect();
            let score = substring_distance(pattern, &text) as f64 / pattern.len() as f64;
            (score <= self.threshold).then(|| SearchHit {
                entry,
                score,
                field,
                exact: text == pattern,
            })
        })
        .min_by(compare_hits)
    }
}

fn compare_hits(a: &SearchHit<'_>, b: &SearchHit<'_>) -> Ordering {
    b.exact
        .cmp(&a.exact)
        .then_with(|| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal))
        .then_with(|| field_rank(a.field).cmp(&field_rank(b.field)))
}

fn field_rank(field: MatchField) -> u8 {
    match field {
        MatchField::Title => 0,
        MatchField::Description => 1,
    }
}

/// Fewest edits turning `pattern` into any substring of `text`.
fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    // Row 0 is all zeros so a match may start anywhere in `text`.
    let mut previous = vec![0usize; text.len() + 1];
    let mut current = vec![0usize; text.len() + 1];
    for (i, p) in pattern.iter().enumerate() {
        current[0] = i + 1;
        for (j, t) in text.iter().enumerate() {
            let substitution = previous[j] + usize::from(p != t);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous.into_iter().min().unwrap_or(pattern.len())
}
