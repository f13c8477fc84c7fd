// tests/integration/revision_properties.rs
//! Randomized histories mixing addresses, accounts, hidden users and
//! out-of-window edits.

use super::support::{revision, window, ScriptedWiki};
use anonedits::{read_log_lines, AppendLog, PageTitle, RawRevision, RevisionFetcher};
use chrono::{DateTime, Utc};
use proptest::prelude::*;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// 2024-01-01T00:00:00Z and 2024-12-31T23:59:59Z, the bounds of `window()`.
const OLDEST: i64 = 1_704_067_200;
const NEWEST: i64 = 1_735_689_599;

#[derive(Debug, Clone)]
enum Contributor {
    V4([u8; 4]),
    V6([u16; 8]),
    Named(String),
    Hidden,
}

impl Contributor {
    fn user(&self) -> Option<String> {
        match self {
            Contributor::V4(octets) => Some(Ipv4Addr::from(*octets).to_string()),
            Contributor::V6(segments) => Some(Ipv6Addr::from(*segments).to_string()),
            Contributor::Named(name) => Some(name.clone()),
            Contributor::Hidden => None,
        }
    }

    fn is_address(&self) -> bool {
        matches!(self, Contributor::V4(_) | Contributor::V6(_))
    }
}

#[derive(Debug, Clone)]
struct Edit {
    contributor: Contributor,
    at: i64,
}

impl Edit {
    fn eligible(&self) -> bool {
        self.contributor.is_address() && (OLDEST..=NEWEST).contains(&self.at)
    }
}

fn arb_contributor() -> impl Strategy<Value = Contributor> {
    prop_oneof![
        any::<[u8; 4]>().prop_map(Contributor::V4),
        any::<[u16; 8]>().prop_map(Contributor::V6),
        "[A-Z][a-z]{2,10}( [A-Z][a-z]{1,8})?".prop_map(Contributor::Named),
        Just(Contributor::Hidden),
    ]
}

/// Mostly inside the window, with both bounds and a year either side.
fn arb_timestamp() -> impl Strategy<Value = i64> {
    prop_oneof![
        4 => OLDEST..=NEWEST,
        1 => Just(OLDEST),
        1 => Just(NEWEST),
        2 => (OLDEST - 31_536_000)..OLDEST,
        2 => (NEWEST + 1)..(NEWEST + 31_536_000),
    ]
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    (arb_contributor(), arb_timestamp()).prop_map(|(contributor, at)| Edit { contributor, at })
}

fn arb_pages() -> impl Strategy<Value = Vec<Vec<Edit>>> {
    prop::collection::vec(prop::collection::vec(arb_edit(), 0..12), 1..5)
}

fn to_revisions(pages: &[Vec<Edit>]) -> Vec<Vec<RawRevision>> {
    let total = pages.iter().map(Vec::len).sum::<usize>() as u64;
    let mut id = total + 1;
    pages
        .iter()
        .map(|page| {
            page.iter()
                .map(|edit| {
                    id -= 1;
                    let at = DateTime::<Utc>::from_timestamp(edit.at, 0).unwrap();
                    revision(id, edit.contributor.user().as_deref(), &at.to_rfc3339())
                })
                .collect()
        })
        .collect()
}

/// Runs one fetch of `Sample` and returns the kept contributors and the log.
fn harvest(pages: Vec<Vec<RawRevision>>) -> (Vec<String>, Vec<String>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async move {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("addresses.log");
        let wiki = Arc::new(ScriptedWiki::new().history("Sample", pages));
        let fetcher = RevisionFetcher::with_workers(wiki, window(), 2)
            .with_dequeue_timeout(Duration::from_millis(5));

        let log = AppendLog::open(&path, true).await.unwrap();
        let handle = log.handle();
        let articles = vec![PageTitle::new("Sample").unwrap()];
        let (histories, _) = fetcher.fetch_histories(articles, &handle).await.unwrap();
        drop(handle);
        log.close().await.unwrap();

        let history = &histories[0];
        let kept = history.contributors().map(|c| c.to_string()).collect();
        (kept, read_log_lines(&path).await.unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exactly_the_eligible_addresses_are_kept_and_logged(pages in arb_pages()) {
        let expected: Vec<String> = pages
            .iter()
            .flatten()
            .filter(|edit| edit.eligible())
            .filter_map(|edit| edit.contributor.user())
            .collect();

        let (kept, logged) = harvest(to_revisions(&pages));

        for contributor in &kept {
            let parsed = contributor.parse::<IpAddr>();
            prop_assert!(parsed.is_ok(), "kept {:?}", contributor);
        }
        prop_assert_eq!(kept.len(), expected.len());
        prop_assert_eq!(&kept, &expected);
        prop_assert_eq!(&logged, &kept);
    }
}
