// tests/integration/revision_filtering.rs
//! Revision fetch against scripted histories: filtering, paging, ordering.

use super::support::{revision, window, ScriptedWiki};
use anonedits::{
    read_log_lines, AppendLog, ArticleHistory, HistorySummary, PageTitle, RevisionFetcher,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

async fn fetch_into(
    fetcher: &RevisionFetcher,
    titles: &[&str],
    log_path: &Path,
) -> (Vec<ArticleHistory>, HistorySummary) {
    let log = AppendLog::open(log_path, true).await.unwrap();
    let handle = log.handle();
    let articles = titles.iter().map(|t| PageTitle::new(t).unwrap()).collect();

    let fetched = fetcher.fetch_histories(articles, &handle).await.unwrap();
    drop(handle);
    log.close().await.unwrap();
    fetched
}

fn fetcher(wiki: &Arc<ScriptedWiki>, workers: usize) -> RevisionFetcher {
    RevisionFetcher::with_workers(wiki.clone(), window(), workers)
        .with_dequeue_timeout(Duration::from_millis(20))
}

#[tokio::test]
async fn only_ip_contributors_inside_the_window_are_kept() {
    let dir = TempDir::new().unwrap();
    let wiki = Arc::new(ScriptedWiki::new().history(
        "Ottawa",
        vec![vec![
            revision(10, Some("203.0.113.7"), "2024-11-02T10:00:00Z"),
            revision(9, Some("ExampleUser"), "2024-10-01T10:00:00Z"),
            revision(8, None, "2024-09-01T10:00:00Z"),
            revision(7, Some("2001:db8::1"), "2024-08-01T10:00:00Z"),
            revision(6, Some("198.51.100.4"), "2023-06-01T10:00:00Z"),
        ]],
    ));
    let path = dir.path().join("addresses.log");

    let (histories, summary) = fetch_into(&fetcher(&wiki, 2), &["Ottawa"], &path).await;

    assert_eq!(histories.len(), 1);
    let kept: Vec<String> = histories[0]
        .contributors()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(kept, vec!["203.0.113.7", "2001:db8::1"]);
    assert!(histories[0]
        .revisions
        .iter()
        .all(|r| r.article_title.as_str() == "Ottawa"));

    assert_eq!(summary.revisions_kept, 2);
    assert_eq!(summary.named_contributors, 1);
    assert_eq!(summary.hidden_contributors, 1);
    assert_eq!(summary.outside_window, 1);
    assert_eq!(
        read_log_lines(&path).await.unwrap(),
        vec!["203.0.113.7", "2001:db8::1"]
    );
}

#[tokio::test]
async fn every_page_is_requested_once_and_order_is_kept() {
    let dir = TempDir::new().unwrap();
    let wiki = Arc::new(ScriptedWiki::new().history(
        "Toronto",
        vec![
            vec![
                revision(6, Some("192.0.2.6"), "2024-06-06T00:00:00Z"),
                revision(5, Some("192.0.2.5"), "2024-05-05T00:00:00Z"),
            ],
            vec![
                revision(4, Some("192.0.2.4"), "2024-04-04T00:00:00Z"),
                revision(3, Some("192.0.2.3"), "2024-03-03T00:00:00Z"),
            ],
            vec![
                revision(2, Some("192.0.2.2"), "2024-02-02T00:00:00Z"),
                revision(1, Some("192.0.2.1"), "2024-01-01T00:00:00Z"),
            ],
        ],
    ));
    let path = dir.path().join("addresses.log");

    let (histories, summary) = fetch_into(&fetcher(&wiki, 3), &["Toronto"], &path).await;

    assert_eq!(wiki.revision_requests_for("Toronto"), 3);
    assert_eq!(summary.pages_requested, 3);
    let ids: Vec<u64> = histories[0]
        .revisions
        .iter()
        .map(|r| r.revision_id)
        .collect();
    assert_eq!(ids, vec![6, 5, 4, 3, 2, 1]);
    assert_eq!(histories[0].revisions.last().unwrap().parent_id, None);
}

#[tokio::test]
async fn page_ceiling_stops_a_runaway_history() {
    let dir = TempDir::new().unwrap();
    let pages = (0..5)
        .map(|i| {
            let repeat = revision(100 - i, Some("192.0.2.9"), "2024-07-07T00:00:00Z");
            vec![repeat]
        })
        .collect();
    let wiki = Arc::new(ScriptedWiki::new().history("Montreal", pages));
    let path = dir.path().join("addresses.log");

    let capped = fetcher(&wiki, 1).with_page_ceiling(2);
    let (histories, summary) = fetch_into(&capped, &["Montreal"], &path).await;

    assert_eq!(wiki.revision_requests_for("Montreal"), 2);
    assert_eq!(summary.page_ceiling_hits, 1);
    assert_eq!(histories[0].revisions.len(), 2);
}

#[tokio::test]
async fn results_follow_input_order_and_failures_stay_empty() {
    let dir = TempDir::new().unwrap();
    let titles: Vec<String> = (0..20).map(|i| format!("Town {}", i)).collect();
    let mut wiki = ScriptedWiki::new().failing("Town 7");
    for (i, title) in titles.iter().enumerate() {
        let address = format!("198.51.100.{}", i + 1);
        let only = revision(i as u64 + 1, Some(&address), "2024-03-01T00:00:00Z");
        wiki = wiki.history(title, vec![vec![only]]);
    }
    let wiki = Arc::new(wiki);
    let path = dir.path().join("addresses.log");
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();

    let (histories, summary) = fetch_into(&fetcher(&wiki, 6), &refs, &path).await;

    let order: Vec<&str> = histories.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(order, refs);
    assert!(histories[7].revisions.is_empty());
    assert_eq!(summary.articles_processed, 20);
    assert_eq!(summary.articles_failed, 1);
    assert_eq!(summary.revisions_kept, 19);
    assert_eq!(read_log_lines(&path).await.unwrap().len(), 19);
}

#[tokio::test]
async fn no_articles_means_no_requests() {
    let dir = TempDir::new().unwrap();
    let wiki = Arc::new(ScriptedWiki::new());
    let path = dir.path().join("addresses.log");

    let (histories, summary) = fetch_into(&fetcher(&wiki, 4), &[], &path).await;

    assert!(histories.is_empty());
    assert_eq!(summary, HistorySummary::default());
}
