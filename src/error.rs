use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no content found for `{id}`")]
    NotFound { id: String },
    #[error("cannot parse `{id}`: {reason}")]
    Parse { id: String, reason: String },
    #[error("slug `{slug}` is produced by more than one content file")]
    DuplicateSlug { slug: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("invalid config: {0}")]
    Config(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Store(#[from] serde_json::Error),
    #[error("cannot watch content directory: {0}")]
    Watch(#[from] notify::Error),
}

impl Error {
    pub(crate) fn parse(id: &str, reason: impl Into<String>) -> Self {
        Error::Parse {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(id: &str) -> Self {
        Error::NotFound { id: id.to_string() }
    }
}
