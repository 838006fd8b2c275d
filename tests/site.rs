use std::fs;

use inkpage::build_site;
use inkpage::config::SiteConfig;
use inkpage::domain::SearchEntry;

fn config_in(root: &std::path::Path) -> SiteConfig {
    SiteConfig {
        title: "Deep JavaScript".to_string(),
        content_dir: root.join("content"),
        output_dir: root.join("public"),
        static_dir: root.join("static"),
        ..SiteConfig::default()
    }
}

#[test]
fn builds_every_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(&config.content_dir).unwrap();
    fs::create_dir_all(&config.static_dir).unwrap();
    fs::write(config.static_dir.join("robots.txt"), "User-agent: *").unwrap();
    fs::write(
        config.content_dir.join("closures.mdx"),
        "---\ntitle: Understanding Closures\ndescription: Scope capture\ndate: 2024-03-01\ncategory: Core Concepts\ntags: [scope]\nfeatured: true\n---\n## First section\n\nHello.\n",
    )
    .unwrap();
    fs::write(
        config.content_dir.join("hoisting.mdx"),
        "---\ntitle: Hoisting\ndescription: Declarations\ndate: 2024-02-01\ncategory: Core Concepts\n---\nBody\n",
    )
    .unwrap();

    let report = build_site(&config).unwrap();
    assert_eq!(report.articles, 2);
    assert_eq!(report.tags, 1);
    assert_eq!(report.categories, 1);
    assert_eq!(report.assets, 1);

    let out = &config.output_dir;
    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("Deep JavaScript"));
    assert!(index.contains("./articles/closures.html"));

    let article = fs::read_to_string(out.join("articles/closures.html")).unwrap();
    assert!(article.contains("<h2 id=\"first-section\">"));
    assert!(article.contains("href=\"#first-section\""));
    assert!(article.contains("Hoisting"));

    assert!(out.join("articles/hoisting.html").is_file());
    assert!(out.join("tags/scope.html").is_file());
    assert!(out.join("categories/core-concepts.html").is_file());
    assert!(out.join("style.css").is_file());
    assert!(out.join("robots.txt").is_file());

    let entries: Vec<SearchEntry> =
        serde_json::from_str(&fs::read_to_string(out.join("search-index.json")).unwrap()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].slug, "closures");
}

#[test]
fn broken_article_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(&config.content_dir).unwrap();
    fs::write(
        config.content_dir.join("ok.mdx"),
        "---\ntitle: Fine\ndescription: Works\ndate: 2024-01-01\n---\nBody\n",
    )
    .unwrap();
    build_site(&config).unwrap();

    fs::write(config.content_dir.join("bad.mdx"), "---\ntitle: Broken\n---\n").unwrap();
    assert!(build_site(&config).is_err());
    assert!(config.output_dir.join("articles/ok.html").is_file());
}

#[test]
fn case_variant_tags_get_their_own_pages() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(&config.content_dir).unwrap();
    fs::write(
        config.content_dir.join("a.mdx"),
        "---\ntitle: Article A\ndescription: First\ndate: 2024-01-02\ntags: [Rust, C++]\n---\nBody\n",
    )
    .unwrap();
    fs::write(
        config.content_dir.join("b.mdx"),
        "---\ntitle: Article B\ndescription: Second\ndate: 2024-01-01\ntags: [rust, C]\n---\nBody\n",
    )
    .unwrap();

    let report = build_site(&config).unwrap();
    assert_eq!(report.tags, 4);

    let tags_dir = config.output_dir.join("tags");
    let mut pages: Vec<String> = fs::read_dir(&tags_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    pages.sort();
    assert_eq!(pages, vec!["c-1.html", "c.html", "rust-1.html", "rust.html"]);

    let upper = fs::read_to_string(tags_dir.join("rust.html")).unwrap();
    assert!(upper.contains("Article A"));
    assert!(!upper.contains("Article B"));
    let lower = fs::read_to_string(tags_dir.join("rust-1.html")).unwrap();
    assert!(lower.contains("Article B"));
    assert!(!lower.contains("Article A"));

    let article_b = fs::read_to_string(config.output_dir.join("articles/b.html")).unwrap();
    assert!(article_b.contains("../tags/rust-1.html"));
    assert!(article_b.contains("../tags/c.html"));
}
