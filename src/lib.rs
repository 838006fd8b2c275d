use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{SiteConfig, DEFAULT_CONFIG_FILE};
use crate::content::ContentSource;
use crate::fs::{copy_static_dir, prepare_output_dir, write_page};
use crate::index::ArticleIndex;
use crate::template::{
    init_tera, render_article, render_index, render_term_page, TermFiles, STYLESHEET,
};

pub mod config;
pub mod content;
pub mod domain;
pub mod error;
pub mod fs;
pub mod index;
pub mod related;
pub mod search;
pub mod serve;
pub mod series;
pub mod store;
pub mod template;

pub use error::{Error, Result};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the site configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory holding the article files (overrides the config file)
    #[arg(long, global = true)]
    pub content_dir: Option<PathBuf>,

    /// Directory the site is written to (overrides the config file)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the whole site into the output directory
    Build,
    /// Build, serve the output directory and rebuild on content changes
    Serve {
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// List articles, newest first
    List {
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List every tag
    Tags,
    /// List every category
    Categories,
    /// Fuzzy search titles and descriptions
    Search { query: String },
    /// Articles related to the given one
    Related {
        slug: String,
        #[arg(short, long, default_value_t = related::DEFAULT_RELATED_LIMIT)]
        limit: usize,
    },
    /// Series navigation for the given article
    Series { slug: String },
    /// Manage the reading list
    Bookmark {
        #[command(subcommand)]
        action: BookmarkAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookmarkAction {
    /// Bookmark an article, or remove the bookmark if it exists
    Toggle { slug: String },
    /// Show bookmarked articles
    List,
    /// Remove every bookmark
    Clear,
}

impl Cli {
    /// Reads the config file and applies the command line overrides.
    pub fn site_config(&self) -> Result<SiteConfig> {
        let mut config = SiteConfig::load(&self.config)?;
        if let Some(dir) = &self.content_dir {
            config.content_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        Ok(config)
    }

    /// Where bookmarks and recent searches are kept, next to the config file.
    pub fn preferences_path(&self) -> PathBuf {
        self.config
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(".inkpage")
            .join("preferences.json")
    }
}

pub fn content_source(config: &SiteConfig) -> ContentSource {
    ContentSource::new(&config.content_dir).with_default_author(&config.author)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub articles: usize,
    pub tags: usize,
    pub categories: usize,
    pub assets: usize,
}

/// Renders every page of the site. The index is built before the output
/// directory is touched, so a broken article leaves the previous output in
/// place.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    info!("Building site...");

    let index = ArticleIndex::build(&content_source(config))?;
    let tera = init_tera(config.templates_dir.as_deref())?;
    let output_dir = config.output_dir.as_path();
    prepare_output_dir(output_dir)?;
    let files = TermFiles::new(&index);

    for article in index.all() {
        render_article(&tera, config, output_dir, &index, &files, article)?;
    }

    let tags = index.all_tags();
    for tag in &tags {
        render_term_page(&tera, config, output_dir, &files, "tags", tag, &index.by_tag(tag))?;
    }
    let categories = index.all_categories();
    for category in &categories {
        render_term_page(
            &tera,
            config,
            output_dir,
            &files,
            "categories",
            category,
            &index.by_category(category),
        )?;
    }

    render_index(&tera, config, output_dir, &index, &files)?;
    write_page(
        &output_dir.join("search-index.json"),
        &serde_json::to_string(&index.search_entries())?,
    )?;
    write_page(&output_dir.join("style.css"), STYLESHEET)?;
    let assets = copy_static_dir(&config.static_dir, output_dir)?;

    let report = BuildReport {
        articles: index.len(),
        tags: tags.len(),
        categories: categories.len(),
        assets,
    };
    info!(
        "Site built successfully: {} articles, {} tags, {} categories, {} assets",
        report.articles, report.tags, report.categories, report.assets
    );
    Ok(report)
}
