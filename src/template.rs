use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::anchorize;
use crate::domain::{Article, ArticleMetadata, SeriesInfo};
use crate::error::Result;
use crate::fs::write_page;
use crate::index::ArticleIndex;
use crate::related::{related_to, DEFAULT_RELATED_LIMIT};
use crate::series::series_info;

const BUILTIN_TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../templates/base.html")),
    ("card.html", include_str!("../templates/card.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("article.html", include_str!("../templates/article.html")),
    ("term.html", include_str!("../templates/term.html")),
];

pub const STYLESHEET: &str = include_str!("../templates/style.css");

/// Loads `<dir>/**/*.html` when a directory is given, the built-in
/// templates otherwise.
pub fn init_tera(templates_dir: Option<&Path>) -> Result<Tera> {
    match templates_dir {
        Some(dir) => {
            let pattern = dir.join("**").join("*.html");
            Ok(Tera::new(&pattern.to_string_lossy())?)
        }
        None => {
            let mut tera = Tera::default();
            tera.add_raw_templates(BUILTIN_TEMPLATES)?;
            Ok(tera)
        }
    }
}

/// Page file names for every tag and category of an index.
///
/// Names are anchorized terms. Terms that anchorize alike (`Rust` and
/// `rust`, `C` and `C++`) get `-1`, `-2`, ... suffixes in sorted term order,
/// so every term owns exactly one page.
#[derive(Debug, Clone, Default)]
pub struct TermFiles {
    tags: HashMap<String, String>,
    categories: HashMap<String, String>,
}

impl TermFiles {
    pub fn new(index: &ArticleIndex) -> Self {
        Self {
            tags: unique_file_names(&index.all_tags()),
            categories: unique_file_names(&index.all_categories()),
        }
    }

    pub fn tag(&self, tag: &str) -> String {
        lookup(&self.tags, tag)
    }

    pub fn category(&self, category: &str) -> String {
        lookup(&self.categories, category)
    }

    /// File name of `term` inside the `kind` directory (`"tags"` or
    /// `"categories"`).
    pub fn file(&self, kind: &str, term: &str) -> String {
        if kind == "tags" {
            self.tag(term)
        } else {
            self.category(term)
        }
    }
}

fn lookup(names: &HashMap<String, String>, term: &str) -> String {
    names
        .get(term)
        .cloned()
        .unwrap_or_else(|| format!("{}.html", anchorize(term)))
}

fn unique_file_names(terms: &[String]) -> HashMap<String, String> {
    let mut taken = HashSet::new();
    let mut names = HashMap::with_capacity(terms.len());
    for term in terms {
        let base = anchorize(term);
        let mut name = base.clone();
        let mut suffix = 1;
        while !taken.insert(name.clone()) {
            name = format!("{base}-{suffix}");
            suffix += 1;
        }
        names.insert(term.clone(), format!("{name}.html"));
    }
    names
}

#[derive(Debug, Serialize)]
struct Link {
    name: String,
    href: String,
}

fn tag_links(tags: &[String], root: &str, files: &TermFiles) -> Vec<Link> {
    tags.iter()
        .map(|tag| Link {
            name: tag.clone(),
            href: format!("{root}/tags/{}", files.tag(tag)),
        })
        .collect()
}

fn category_link(category: &str, root: &str, files: &TermFiles) -> Link {
    Link {
        name: category.to_string(),
        href: format!("{root}/categories/{}", files.category(category)),
    }
}

/// An article as listed on index, tag and category pages.
#[derive(Debug, Serialize)]
struct Card<'a> {
    #[serde(flatten)]
    metadata: &'a ArticleMetadata,
    href: String,
    tag_links: Vec<Link>,
    category_link: Link,
}

fn card<'a>(metadata: &'a ArticleMetadata, root: &str, files: &TermFiles) -> Card<'a> {
    Card {
        metadata,
        href: format!("{root}/articles/{}.html", metadata.slug),
        tag_links: tag_links(&metadata.tags, root, files),
        category_link: category_link(&metadata.category, root, files),
    }
}

fn base_context(config: &SiteConfig, root: &str) -> Context {
    let mut context = Context::new();
    context.insert("site_title", &config.title);
    context.insert("site_description", &config.description);
    context.insert("base_url", &config.base_url);
    context.insert("root", root);
    context
}

pub fn render_index(
    tera: &Tera,
    config: &SiteConfig,
    output_dir: &Path,
    index: &ArticleIndex,
    files: &TermFiles,
) -> Result<()> {
    let root = ".";
    let mut context = base_context(config, root);
    let featured: Vec<Card> = index
        .featured()
        .into_iter()
        .map(|article| card(&article.metadata, root, files))
        .collect();
    let articles: Vec<Card> = index
        .all()
        .iter()
        .map(|article| card(&article.metadata, root, files))
        .collect();
    let tags = tag_links(&index.all_tags(), root, files);
    let categories: Vec<Link> = index
        .all_categories()
        .iter()
        .map(|category| category_link(category, root, files))
        .collect();

    context.insert("featured", &featured);
    context.insert("articles", &articles);
    context.insert("tags", &tags);
    context.insert("categories", &categories);

    let html = tera.render("index.html", &context)?;
    write_page(&output_dir.join("index.html"), &html)
}

pub fn render_article(
    tera: &Tera,
    config: &SiteConfig,
    output_dir: &Path,
    index: &ArticleIndex,
    files: &TermFiles,
    article: &Article,
) -> Result<()> {
    let root = "..";
    let slug = article.slug();
    let related: Vec<ArticleMetadata> = related_to(index, slug, DEFAULT_RELATED_LIMIT)?;
    let related: Vec<Card> = related.iter().map(|m| card(m, root, files)).collect();
    let series: Option<SeriesInfo> = series_info(index, slug)?;

    let mut context = base_context(config, root);
    context.insert("article", &card(&article.metadata, root, files));
    context.insert("content", &article.html);
    context.insert("headings", &article.headings);
    context.insert("related", &related);
    context.insert("series", &series);

    let html = tera.render("article.html", &context)?;
    write_page(&output_dir.join("articles").join(format!("{slug}.html")), &html)
}

/// Listing page for one tag or category. `kind` is `"tags"` or
/// `"categories"` and names the output subdirectory.
pub fn render_term_page(
    tera: &Tera,
    config: &SiteConfig,
    output_dir: &Path,
    files: &TermFiles,
    kind: &str,
    term: &str,
    articles: &[&Article],
) -> Result<()> {
    let root = "..";
    let cards: Vec<Card> = articles
        .iter()
        .map(|article| card(&article.metadata, root, files))
        .collect();

    let mut context = base_context(config, root);
    context.insert("kind", kind);
    context.insert("term", term);
    context.insert("articles", &cards);

    let html = tera.render("term.html", &context)?;
    write_page(&output_dir.join(kind).join(files.file(kind, term)), &html)
}
