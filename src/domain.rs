use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Front matter exactly as written in a content file.
///
/// Every key is optional here; [`crate::content`] decides which ones are
/// mandatory and fills in defaults for the rest.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub featured: Option<bool>,
    pub series: Option<String>,
    pub series_order: Option<u32>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub reading_time: String,
    pub tags: Vec<String>,
    pub category: String,
    pub author: String,
    pub featured: bool,
    pub series: Option<String>,
    pub series_order: Option<u32>,
}

impl ArticleMetadata {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Number of tags present in both articles. Duplicates in `self` count once.
    pub fn shared_tags(&self, other: &ArticleMetadata) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        for tag in &self.tags {
            if other.has_tag(tag) && !seen.contains(&tag.as_str()) {
                seen.push(tag);
            }
        }
        seen.len()
    }
}

/// A table-of-contents entry for an `h2` or `h3` heading.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

#[derive(Debug, Serialize, Clone)]
pub struct Article {
    #[serde(flatten)]
    pub metadata: ArticleMetadata,
    pub content: String,
    pub html: String,
    pub headings: Vec<Heading>,
}

impl Article {
    pub fn slug(&self) -> &str {
        &self.metadata.slug
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct SeriesInfo {
    pub series_name: String,
    pub current_part: u32,
    pub total_parts: usize,
    pub previous_article: Option<ArticleMetadata>,
    pub next_article: Option<ArticleMetadata>,
    pub all_articles: Vec<ArticleMetadata>,
}

/// The slice of an article the fuzzy search looks at.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub slug: String,
    pub title: String,
    pub description: String,
}
