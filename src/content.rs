use chrono::{DateTime, NaiveDate};
use comrak::{ComrakOptions, ComrakRenderOptions, ListStyleType};
use gray_matter::engine::YAML;
use gray_matter::Matter;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;
use walkdir::WalkDir;

use crate::domain::{Article, ArticleMetadata, Frontmatter, Heading, DEFAULT_AUTHOR, DEFAULT_CATEGORY};
use crate::error::{Error, Result};

pub const WORDS_PER_MINUTE: usize = 200;

/// Accepted content file extensions, in lookup priority order.
pub const CONTENT_EXTENSIONS: [&str; 2] = ["mdx", "md"];

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h([23])>(.*?)</h[23]>").expect("heading pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));

/// A directory of front-matter articles.
#[derive(Debug, Clone)]
pub struct ContentSource {
    dir: PathBuf,
    default_author: String,
}

impl ContentSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            default_author: DEFAULT_AUTHOR.to_string(),
        }
    }

    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids of every content file directly inside the directory, ordered by
    /// file name. A missing directory is created and yields no ids.
    ///
    /// `a.md` next to `a.mdx` yields `a` twice; the index rejects that.
    pub fn list_content_ids(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            debug!("Creating missing content directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir)?;
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_content = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext));
            if let (true, Some(stem)) = (is_content, path.file_stem().and_then(|s| s.to_str())) {
                ids.push(stem.to_string());
            }
        }
        Ok(ids)
    }

    /// Path of the file backing `id`, if any.
    pub fn path_for(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return None;
        }
        CONTENT_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{id}.{ext}")))
            .find(|path| path.is_file())
    }

    pub fn load_by_id(&self, id: &str) -> Result<Article> {
        let path = self.path_for(id).ok_or_else(|| Error::not_found(id))?;
        debug!("Loading article: {}", path.display());
        let source = fs::read_to_string(&path)?;
        parse_article(id, &source, &self.default_author, &make_comrak_options())
    }
}

/// Parses one content file. `id` becomes the slug.
pub fn parse_article(
    id: &str,
    source: &str,
    default_author: &str,
    comrak_options: &ComrakOptions,
) -> Result<Article> {
    let matter = Matter::<YAML>::new();
    let result = matter.parse(source);

    let data = result
        .data
        .ok_or_else(|| Error::parse(id, "missing front matter"))?;
    let frontmatter: Frontmatter = data
        .deserialize()
        .map_err(|e| Error::parse(id, format!("malformed front matter: {e}")))?;

    let title = required(id, "title", frontmatter.title)?;
    let description = required(id, "description", frontmatter.description)?;
    let date = required(id, "date", frontmatter.date)?;
    let date = parse_date(&date).ok_or_else(|| Error::parse(id, format!("invalid date `{date}`")))?;

    let content = result.content;
    let (html, headings) = render_markdown(&content, comrak_options);

    let metadata = ArticleMetadata {
        slug: id.to_string(),
        title,
        description,
        date,
        reading_time: reading_time(&content),
        tags: frontmatter.tags.unwrap_or_default(),
        category: frontmatter
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        author: frontmatter
            .author
            .unwrap_or_else(|| default_author.to_string()),
        featured: frontmatter.featured.unwrap_or(false),
        series: frontmatter.series,
        // Parts are numbered from 1; 0 reads as no position in the series.
        series_order: frontmatter.series_order.filter(|&order| order > 0),
    };

    Ok(Article {
        metadata,
        content,
        html,
        headings,
    })
}

fn required(id: &str, field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::parse(id, format!("missing required field `{field}`"))),
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Estimated reading time, e.g. `"3 min read"`.
pub fn reading_time(text: &str) -> String {
    format!("{} min read", reading_minutes(text))
}

pub fn reading_minutes(text: &str) -> usize {
    let words = text.unicode_words().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

pub fn make_comrak_options() -> ComrakOptions {
    let mut comrak_options = ComrakOptions::default();
    comrak_options.extension.table = true;
    comrak_options.extension.autolink = true;
    comrak_options.extension.tagfilter = true;
    comrak_options.extension.strikethrough = true;
    comrak_options.extension.tasklist = true;
    comrak_options.parse.smart = true;
    let mut render_options = ComrakRenderOptions::default();
    render_options.unsafe_ = true;
    render_options.list_style = ListStyleType::Plus;
    comrak_options.render = render_options;
    comrak_options
}

/// Renders markdown to HTML, giving every `h2`/`h3` an anchor id, and
/// returns those headings in document order.
pub fn render_markdown(markdown: &str, comrak_options: &ComrakOptions) -> (String, Vec<Heading>) {
    let html = comrak::markdown_to_html(markdown, comrak_options);

    let mut headings = Vec::new();
    let mut used: HashMap<String, usize> = HashMap::new();
    let html = HEADING
        .replace_all(&html, |caps: &Captures| {
            let level: u8 = if &caps[1] == "2" { 2 } else { 3 };
            let inner = &caps[2];
            let text = unescape_html(TAG.replace_all(inner, "").trim());
            let id = unique_anchor(&anchorize(&text), &mut used);
            let tag = format!("<h{level} id=\"{id}\">{inner}</h{level}>");
            headings.push(Heading { id, text, level });
            tag
        })
        .into_owned();

    (html, headings)
}

/// Turns heading text into an anchor: lowercase, punctuation dropped,
/// whitespace runs become `-`.
pub fn anchorize(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            anchor.extend(c.to_lowercase());
        } else if c.is_whitespace() && !anchor.ends_with('-') {
            anchor.push('-');
        }
    }
    if anchor.is_empty() {
        anchor.push_str("section");
    }
    anchor
}

fn unique_anchor(base: &str, used: &mut HashMap<String, usize>) -> String {
    let count = used.entry(base.to_string()).or_insert(0);
    let anchor = if *count == 0 {
        base.to_string()
    } else {
        format!("{base}-{count}")
    };
    *count += 1;
    anchor
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
