// tests/integration/end_to_end_harvest.rs
//! Full harvests against a scripted wiki, checked through the files they leave.

use super::support::{config, revision, ScriptedWiki};
use anonedits::{ArticleHistory, ErrorKind, HarvestConfig, Harvester};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

fn canada() -> ScriptedWiki {
    ScriptedWiki::new()
        .category(
            "Canada",
            &["Ottawa", "Category:Provinces", "Template:Canada"],
        )
        .category("Provinces", &["Ontario", "Ottawa"])
        .history(
            "Ottawa",
            vec![
                vec![
                    revision(20, Some("203.0.113.7"), "2024-10-10T10:00:00Z"),
                    revision(19, Some("ExampleUser"), "2024-09-09T09:00:00Z"),
                ],
                vec![revision(18, Some("2001:DB8::1"), "2024-08-08T08:00:00Z")],
            ],
        )
        .history(
            "Ontario",
            vec![vec![
                revision(30, Some("203.0.113.7"), "2024-07-07T07:00:00Z"),
                revision(29, Some("198.51.100.20"), "2024-06-06T06:00:00Z"),
                revision(28, Some("198.51.100.21"), "2022-06-06T06:00:00Z"),
            ]],
        )
}

fn harvester(wiki: &Arc<ScriptedWiki>, config: HarvestConfig) -> Harvester {
    Harvester::new(wiki.clone(), config)
}

#[tokio::test]
async fn harvest_writes_logs_and_result_files() {
    let dir = TempDir::new().unwrap();
    let wiki = Arc::new(canada());
    let mut config = config(dir.path(), "Canada");
    config.fetch_workers = 1;
    let harvester = harvester(&wiki, config);

    let report = harvester.run().await.unwrap();

    assert_eq!(report.articles, 2);
    let crawl = report.crawl.expect("a fresh run crawls");
    assert_eq!(crawl.categories_expanded, 2);
    assert_eq!(crawl.other_members_skipped, 1);
    assert!(report.output.is_success());

    let layout = harvester.layout();
    let revisions = std::fs::read_to_string(layout.revisions()).unwrap();
    let histories: Vec<ArticleHistory> = serde_json::from_str(&revisions).unwrap();
    let titles: Vec<&str> = histories.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["Ottawa", "Ontario"]);
    assert_eq!(histories[0].revisions.len(), 2);
    assert_eq!(histories[1].revisions.len(), 2);

    assert_eq!(
        std::fs::read_to_string(layout.refined_addresses()).unwrap(),
        "203.0.113.7\n2001:db8::1\n198.51.100.20\n"
    );
    let raw_log = std::fs::read_to_string(layout.address_log()).unwrap();
    assert_eq!(raw_log.lines().count(), 4, "the raw log keeps duplicates");
    let article_log = std::fs::read_to_string(layout.article_log()).unwrap();
    assert!(!article_log.contains("Template:Canada"));
}

#[tokio::test]
async fn reusing_articles_without_a_log_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let wiki = Arc::new(canada());
    let mut config = config(dir.path(), "Canada");
    config.reuse_articles = true;

    let err = harvester(&wiki, config).run().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(wiki.total_listings(), 0);
}

#[tokio::test]
async fn reused_article_log_skips_the_crawl() {
    let dir = TempDir::new().unwrap();
    let wiki = Arc::new(canada());
    std::fs::write(
        dir.path().join("articles.log"),
        "Ontario\nCategory:Provinces\nOntario\n",
    )
    .unwrap();
    let mut config = config(dir.path(), "Canada");
    config.reuse_articles = true;

    let report = harvester(&wiki, config).run().await.unwrap();

    assert_eq!(wiki.total_listings(), 0);
    assert!(report.crawl.is_none());
    assert_eq!(report.articles, 1);
    assert_eq!(wiki.revision_requests_for("Ontario"), 1);
    assert_eq!(report.results.histories.len(), 1);
}

#[tokio::test]
async fn resume_keeps_addresses_from_an_earlier_run() {
    let dir = TempDir::new().unwrap();
    let wiki = Arc::new(canada());
    std::fs::write(dir.path().join("articles.log"), "Ontario\n").unwrap();
    std::fs::write(dir.path().join("addresses.log"), "192.0.2.200\n").unwrap();

    let mut resumed = config(dir.path(), "Canada");
    resumed.reuse_articles = true;
    resumed.resume = true;
    let report = harvester(&wiki, resumed.clone()).run().await.unwrap();
    let addresses: Vec<String> = report
        .results
        .addresses
        .iter()
        .map(|a| a.to_string())
        .collect();
    assert_eq!(
        addresses,
        vec!["192.0.2.200", "203.0.113.7", "198.51.100.20"]
    );

    let mut fresh = resumed;
    fresh.resume = false;
    let report = harvester(&wiki, fresh).run().await.unwrap();
    assert_eq!(report.results.addresses.len(), 2);
}

#[tokio::test]
async fn unreachable_articles_are_kept_with_empty_histories() {
    let dir = TempDir::new().unwrap();
    let wiki = Arc::new(canada().failing("Ottawa"));
    let harvester = harvester(&wiki, config(dir.path(), "Canada"));

    let report = harvester.run().await.unwrap();

    assert_eq!(report.results.summary.articles_failed, 1);
    let ottawa = report
        .results
        .histories
        .iter()
        .find(|h| h.title.as_str() == "Ottawa")
        .unwrap();
    assert!(ottawa.revisions.is_empty());
    assert_eq!(report.results.addresses.len(), 2);
}
