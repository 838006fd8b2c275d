use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use inkpage::index::ArticleIndex;
use inkpage::related::related_to;
use inkpage::search::Searcher;
use inkpage::series::series_info;
use inkpage::store::{Bookmarks, JsonFileStore, RecentSearches};
use inkpage::{build_site, content_source, serve, BookmarkAction, Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = cli.site_config().context("Failed to load site configuration")?;

    match &cli.command {
        Command::Build => {
            build_site(&config).context("Site build failed")?;
        }
        Command::Serve { port } => {
            serve::serve(config, *port).await?;
        }
        command => {
            let index = ArticleIndex::build(&content_source(&config))
                .context("Failed to index articles")?;
            query(&cli, command, &index)?;
        }
    }

    Ok(())
}

fn query(cli: &Cli, command: &Command, index: &ArticleIndex) -> Result<()> {
    match command {
        Command::List { tag, category } => {
            let articles = match (tag, category) {
                (Some(tag), _) => index.by_tag(tag),
                (None, Some(category)) => index.by_category(category),
                (None, None) => index.all().iter().collect(),
            };
            for article in articles {
                let meta = &article.metadata;
                println!("{}  {:<32} {} ({})", meta.date, meta.slug, meta.title, meta.reading_time);
            }
        }
        Command::Tags => index.all_tags().iter().for_each(|tag| println!("{tag}")),
        Command::Categories => index
            .all_categories()
            .iter()
            .for_each(|category| println!("{category}")),
        Command::Search { query } => {
            let searcher = Searcher::new(index.search_entries());
            let hits = searcher.search(query);
            if hits.is_empty() {
                println!("No articles found for {query}");
            }
            for hit in &hits {
                println!("{:.2}  {:<32} {}", hit.score, hit.entry.slug, hit.entry.title);
            }
            if !hits.is_empty() {
                let store = JsonFileStore::open(cli.preferences_path())?;
                RecentSearches::new(store).record_top_hit(query, &hits)?;
            }
        }
        Command::Related { slug, limit } => {
            for meta in related_to(index, slug, *limit)? {
                println!("{:<32} {} [{}]", meta.slug, meta.title, meta.category);
            }
        }
        Command::Series { slug } => match series_info(index, slug)? {
            Some(info) => {
                println!(
                    "{} (part {} of {})",
                    info.series_name, info.current_part, info.total_parts
                );
                for (position, meta) in info.all_articles.iter().enumerate() {
                    let marker = if meta.slug == *slug { ">" } else { " " };
                    println!("{marker} {}. {}", position + 1, meta.title);
                }
            }
            None => println!("{slug} is not part of a series"),
        },
        Command::Bookmark { action } => {
            let mut bookmarks = Bookmarks::new(JsonFileStore::open(cli.preferences_path())?);
            match action {
                BookmarkAction::Toggle { slug } => {
                    index.get(slug)?;
                    if bookmarks.toggle(slug)? {
                        println!("Bookmarked {slug}");
                    } else {
                        println!("Removed bookmark {slug}");
                    }
                }
                BookmarkAction::List => {
                    for article in bookmarks.resolve(index)? {
                        println!("{:<32} {}", article.slug(), article.metadata.title);
                    }
                }
                BookmarkAction::Clear => bookmarks.clear()?,
            }
        }
        Command::Build | Command::Serve { .. } => {}
    }
    Ok(())
}
