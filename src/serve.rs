//! Local preview: serve the output directory and rebuild on content edits.

use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use tracing::{debug, info, warn};

use crate::config::SiteConfig;
use crate::error::Result;
use crate::build_site;

/// Quiet period after the last filesystem event before rebuilding.
pub const REBUILD_DEBOUNCE: Duration = Duration::from_millis(200);

pub async fn serve(config: SiteConfig, port: u16) -> Result<()> {
    build_site(&config)?;

    let watch_config = config.clone();
    let watcher = tokio::task::spawn_blocking(move || watch(&watch_config));

    let routes = warp::fs::dir(config.output_dir.clone());
    info!(
        "Serving {} on http://127.0.0.1:{port}",
        config.output_dir.display()
    );

    tokio::select! {
        () = warp::serve(routes).run(([127, 0, 0, 1], port)) => Ok(()),
        joined = watcher => joined.map_err(std::io::Error::other)?,
    }
}

/// Blocks, rebuilding the site after every debounced batch of changes
/// under the content directory.
pub fn watch(config: &SiteConfig) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(REBUILD_DEBOUNCE, tx)?;
    debouncer
        .watcher()
        .watch(&config.content_dir, RecursiveMode::Recursive)?;
    info!("Watching {} for changes", config.content_dir.display());

    rebuild_on_changes(&rx, config);
    Ok(())
}

/// Rebuilds once per non-empty batch received on `rx` until the sender
/// goes away. Returns the number of rebuilds attempted.
pub fn rebuild_on_changes(rx: &Receiver<DebounceEventResult>, config: &SiteConfig) -> usize {
    let mut rebuilds = 0;
    while let Ok(batch) = rx.recv() {
        let events = match batch {
            Ok(events) => events,
            Err(e) => {
                warn!("Watch error: {e:?}");
                continue;
            }
        };
        if events.is_empty() {
            continue;
        }
        debug!("Rebuilding after {} changed paths", events.len());
        rebuilds += 1;
        match build_site(config) {
            Ok(report) => info!("Rebuilt {} articles", report.articles),
            Err(e) => warn!("Rebuild failed, keeping previous output: {e}"),
        }
    }
    rebuilds
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;

    #[test]
    fn debounced_changes_trigger_a_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            content_dir: dir.path().join("content"),
            output_dir: dir.path().join("public"),
            static_dir: dir.path().join("static"),
            ..SiteConfig::default()
        };
        fs::create_dir_all(&config.content_dir).unwrap();

        let (tx, rx) = channel();
        let mut debouncer = new_debouncer(REBUILD_DEBOUNCE, tx).unwrap();
        debouncer
            .watcher()
            .watch(&config.content_dir, RecursiveMode::Recursive)
            .unwrap();

        for i in 0..3 {
            fs::write(
                config.content_dir.join(format!("post-{i}.mdx")),
                format!("---\ntitle: Post {i}\ndescription: Body\ndate: 2024-01-0{}\n---\nText\n", i + 1),
            )
            .unwrap();
        }
        thread::sleep(REBUILD_DEBOUNCE * 5);
        drop(debouncer);

        let rebuilds = rebuild_on_changes(&rx, &config);
        assert!(rebuilds >= 1);
        assert!(config.output_dir.join("articles/post-2.html").is_file());
    }
}
