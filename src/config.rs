use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::DEFAULT_AUTHOR;
use crate::error::Result;

pub const DEFAULT_CONFIG_FILE: &str = "inkpage.yaml";

/// Site settings read from `inkpage.yaml`. Every key is optional.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub base_url: String,
    pub author: String,
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Directory holding `*.html` Tera templates. The built-in templates
    /// are used when unset.
    pub templates_dir: Option<PathBuf>,
    /// Copied verbatim into the output directory when it exists.
    pub static_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Articles".to_string(),
            description: String::new(),
            base_url: String::new(),
            author: DEFAULT_AUTHOR.to_string(),
            content_dir: PathBuf::from("content/articles"),
            output_dir: PathBuf::from("public"),
            templates_dir: None,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl SiteConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}
