use std::collections::{BTreeSet, HashMap};

use tracing::{info, warn};

use crate::content::ContentSource;
use crate::domain::{Article, SearchEntry};
use crate::error::{Error, Result};

/// Every article of a content directory, newest first.
///
/// Built once per site build and handed to whatever needs it. There is no
/// incremental update; rebuild to pick up changes.
#[derive(Debug, Clone, Default)]
pub struct ArticleIndex {
    articles: Vec<Article>,
    positions: HashMap<String, usize>,
}

impl ArticleIndex {
    /// Loads every article of `source`. The first failing file aborts the
    /// build.
    pub fn build(source: &ContentSource) -> Result<Self> {
        let ids = source.list_content_ids()?;
        let articles = ids
            .iter()
            .map(|id| source.load_by_id(id))
            .collect::<Result<Vec<_>>>()?;
        let index = Self::from_articles(articles)?;
        info!(
            "Indexed {} articles from {}",
            index.len(),
            source.dir().display()
        );
        Ok(index)
    }

    /// Sorts `articles` by date, newest first, keeping the given order for
    /// equal dates.
    pub fn from_articles(mut articles: Vec<Article>) -> Result<Self> {
        articles.sort_by(|a, b| b.metadata.date.cmp(&a.metadata.date));

        let mut positions = HashMap::with_capacity(articles.len());
        for (position, article) in articles.iter().enumerate() {
            if positions.insert(article.slug().to_string(), position).is_some() {
                return Err(Error::DuplicateSlug {
                    slug: article.slug().to_string(),
                });
            }
        }

        let index = Self {
            articles,
            positions,
        };
        index.check_series_orders();
        Ok(index)
    }

    pub fn all(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn get(&self, slug: &str) -> Result<&Article> {
        self.position(slug)
            .map(|position| &self.articles[position])
            .ok_or_else(|| Error::not_found(slug))
    }

    /// Position of `slug` in [`Self::all`].
    pub fn position(&self, slug: &str) -> Option<usize> {
        self.positions.get(slug).copied()
    }

    pub fn by_tag(&self, tag: &str) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|article| article.metadata.has_tag(tag))
            .collect()
    }

    pub fn by_category(&self, category: &str) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|article| article.metadata.category == category)
            .collect()
    }

    pub fn featured(&self) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|article| article.metadata.featured)
            .collect()
    }

    pub fn all_tags(&self) -> Vec<String> {
        self.articles
            .iter()
            .flat_map(|article| article.metadata.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn all_categories(&self) -> Vec<String> {
        self.articles
            .iter()
            .map(|article| article.metadata.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn search_entries(&self) -> Vec<SearchEntry> {
        self.articles
            .iter()
            .map(|article| SearchEntry {
                slug: article.metadata.slug.clone(),
                title: article.metadata.title.clone(),
                description: article.metadata.description.clone(),
            })
            .collect()
    }

    fn check_series_orders(&self) {
        let mut series: HashMap<&str, Vec<u32>> = HashMap::new();
        for article in &self.articles {
            if let (Some(name), Some(order)) =
                (&article.metadata.series, article.metadata.series_order)
            {
                series.entry(name.as_str()).or_default().push(order);
            }
        }
        for (name, mut orders) in series {
            orders.sort_unstable();
            if orders.windows(2).any(|pair| pair[0] == pair[1]) {
                warn!("Series `{name}` has duplicated seriesOrder values: {orders:?}");
            } else if orders.iter().enumerate().any(|(i, &order)| order as usize != i + 1) {
                warn!("Series `{name}` has non-contiguous seriesOrder values: {orders:?}");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::ArticleMetadata;

    pub(crate) fn article(slug: &str, date: &str, category: &str, tags: &[&str]) -> Article {
        Article {
            metadata: ArticleMetadata {
                slug: slug.to_string(),
                title: format!("Title of {slug}"),
                description: format!("Description of {slug}"),
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                reading_time: "1 min read".to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                category: category.to_string(),
                author: "Tester".to_string(),
                featured: false,
                series: None,
                series_order: None,
            },
            content: String::new(),
            html: String::new(),
            headings: Vec::new(),
        }
    }

    fn slugs<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Vec<&'a str> {
        articles.into_iter().map(Article::slug).collect()
    }

    #[test]
    fn sorts_newest_first_and_keeps_ties_stable() {
        let index = ArticleIndex::from_articles(vec![
            article("a", "2024-01-01", "X", &[]),
            article("b", "2024-02-01", "X", &[]),
            article("c", "2024-01-01", "X", &[]),
            article("d", "2024-02-01", "X", &[]),
        ])
        .unwrap();
        assert_eq!(slugs(index.all()), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let err = ArticleIndex::from_articles(vec![
            article("same", "2024-01-01", "X", &[]),
            article("same", "2024-01-02", "X", &[]),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateSlug { slug } if slug == "same"));
    }

    #[test]
    fn tag_lookup_is_exact_and_case_sensitive() {
        let index = ArticleIndex::from_articles(vec![
            article("a", "2024-01-01", "X", &["rust", "web"]),
            article("b", "2024-01-02", "X", &["Rust"]),
            article("c", "2024-01-03", "Y", &["web"]),
        ])
        .unwrap();
        assert_eq!(slugs(index.by_tag("rust")), vec!["a"]);
        assert_eq!(slugs(index.by_tag("web")), vec!["c", "a"]);
        assert!(index.by_tag("nonexistent").is_empty());
        assert_eq!(slugs(index.by_category("Y")), vec!["c"]);
        assert!(index.by_category("Z").is_empty());
    }

    #[test]
    fn listings_are_sorted_and_deduplicated() {
        let index = ArticleIndex::from_articles(vec![
            article("a", "2024-01-01", "Zeta", &["web", "async"]),
            article("b", "2024-01-02", "Alpha", &["async"]),
            article("c", "2024-01-03", "Zeta", &["closures"]),
        ])
        .unwrap();
        assert_eq!(index.all_tags(), vec!["async", "closures", "web"]);
        assert_eq!(index.all_categories(), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn unknown_slug_is_not_found() {
        let index = ArticleIndex::default();
        assert!(matches!(index.get("missing"), Err(Error::NotFound { .. })));
        assert!(index.is_empty());
    }

    #[test]
    fn featured_keeps_index_order() {
        let mut older = article("older", "2023-01-01", "X", &[]);
        older.metadata.featured = true;
        let mut newer = article("newer", "2024-01-01", "X", &[]);
        newer.metadata.featured = true;
        let index = ArticleIndex::from_articles(vec![
            older,
            article("plain", "2025-01-01", "X", &[]),
            newer,
        ])
        .unwrap();
        assert_eq!(slugs(index.featured()), vec!["newer", "older"]);
    }
}
