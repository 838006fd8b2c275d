//! Reader preferences: bookmarked articles and recent search terms.
//!
//! Both live behind [`KeyValueStore`], so the same logic runs against an
//! in-memory map in tests and a JSON file on disk from the CLI.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::Article;
use crate::error::Result;
use crate::index::ArticleIndex;
use crate::search::SearchHit;

pub const BOOKMARKS_KEY: &str = "bookmarks";
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";
pub const MAX_RECENT_SEARCHES: usize = 5;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// A JSON object in a single file, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        debug!("Saved preferences: {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

fn read_list<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Vec<String>> {
    match store.get(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

fn write_list<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, list: &[String]) -> Result<()> {
    store.set(key, serde_json::to_string(list)?)
}

/// Slugs the reader saved for later, in the order they were added.
#[derive(Debug)]
pub struct Bookmarks<S> {
    store: S,
}

impl<S: KeyValueStore> Bookmarks<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn list(&self) -> Result<Vec<String>> {
        read_list(&self.store, BOOKMARKS_KEY)
    }

    pub fn contains(&self, slug: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|s| s == slug))
    }

    pub fn add(&mut self, slug: &str) -> Result<()> {
        let mut list = self.list()?;
        if !list.iter().any(|s| s == slug) {
            list.push(slug.to_string());
            write_list(&mut self.store, BOOKMARKS_KEY, &list)?;
        }
        Ok(())
    }

    pub fn remove(&mut self, slug: &str) -> Result<()> {
        let mut list = self.list()?;
        let before = list.len();
        list.retain(|s| s != slug);
        if list.len() != before {
            write_list(&mut self.store, BOOKMARKS_KEY, &list)?;
        }
        Ok(())
    }

    /// Flips the bookmark and returns whether `slug` is now bookmarked.
    pub fn toggle(&mut self, slug: &str) -> Result<bool> {
        if self.contains(slug)? {
            self.remove(slug)?;
            Ok(false)
        } else {
            self.add(slug)?;
            Ok(true)
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(BOOKMARKS_KEY)
    }

    /// Bookmarked articles in index order. Slugs that no longer exist are
    /// skipped.
    pub fn resolve<'a>(&self, index: &'a ArticleIndex) -> Result<Vec<&'a Article>> {
        let list = self.list()?;
        Ok(index
            .all()
            .iter()
            .filter(|article| list.iter().any(|slug| slug == article.slug()))
            .collect())
    }
}

/// Titles the reader picked from search results, most recent first.
#[derive(Debug)]
pub struct RecentSearches<S> {
    store: S,
}

impl<S: KeyValueStore> RecentSearches<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn list(&self) -> Result<Vec<String>> {
        read_list(&self.store, RECENT_SEARCHES_KEY)
    }

    pub fn record(&mut self, term: &str) -> Result<()> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(());
        }
        let mut list = self.list()?;
        list.retain(|s| s != term);
        list.insert(0, term.to_string());
        list.truncate(MAX_RECENT_SEARCHES);
        write_list(&mut self.store, RECENT_SEARCHES_KEY, &list)
    }

    /// Records the title of the best hit. A blank query lists every article
    /// without ranking, so nothing is recorded for it.
    pub fn record_top_hit(&mut self, query: &str, hits: &[SearchHit<'_>]) -> Result<bool> {
        match hits.first() {
            Some(top) if !query.trim().is_empty() => {
                self.record(&top.entry.title)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(RECENT_SEARCHES_KEY)
    }
}
