// tests/integration/support.rs
//! A scripted wiki for driving the pools without a network.

use anonedits::{
    AppError, CategoryMember, CategoryName, ContinuationToken, HarvestConfig, MemberListing,
    Namespace, PageTitle, RawRevision, RevisionPage, TimeWindow, WikiRepository, DEFAULT_USER_AGENT,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::time::Duration;
use url::Url;

const PAGE_KEY: &str = "rvcontinue";

/// Category graph and revision histories served from memory.
///
/// Every request is counted, so tests can assert exactly what a pool asked for.
#[derive(Default)]
pub struct ScriptedWiki {
    categories: HashMap<String, Vec<CategoryMember>>,
    histories: HashMap<String, Vec<Vec<RawRevision>>>,
    failing: HashSet<String>,
    listings: Mutex<HashMap<String, usize>>,
    revision_requests: Mutex<HashMap<String, usize>>,
}

impl ScriptedWiki {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category of an English-language wiki.
    ///
    /// Member namespaces are read off their prefixes, so `Category:` members
    /// are subcategories and `File:` members are files.
    pub fn category(self, name: &str, members: &[&str]) -> Self {
        let name = CategoryName::parse(name).unwrap();
        let members: Vec<(&str, i64)> = members
            .iter()
            .map(|m| (*m, english_namespace_id(m)))
            .collect();
        self.listed_category(name.as_str(), &members)
    }

    /// Adds a category under its full title, with members as `(title, ns)` pairs.
    pub fn listed_category(mut self, title: &str, members: &[(&str, i64)]) -> Self {
        let members = members
            .iter()
            .map(|(m, ns)| {
                let title = PageTitle::new(m).unwrap();
                CategoryMember::new(title, *ns)
            })
            .collect();
        self.categories.insert(title.to_string(), members);
        self
    }

    /// Adds an article history served as the given pages, newest first.
    pub fn history(mut self, title: &str, pages: Vec<Vec<RawRevision>>) -> Self {
        self.histories.insert(title.to_string(), pages);
        self
    }

    /// Makes every request for this category or article fail.
    pub fn failing(mut self, title: &str) -> Self {
        self.failing.insert(title.to_string());
        self
    }

    pub fn listings_of(&self, category: &str) -> usize {
        let name = CategoryName::parse(category).unwrap();
        self.listings_of_title(name.as_str())
    }

    pub fn listings_of_title(&self, title: &str) -> usize {
        self.listings.lock().get(title).copied().unwrap_or(0)
    }

    pub fn total_listings(&self) -> usize {
        self.listings.lock().values().sum()
    }

    pub fn revision_requests_for(&self, title: &str) -> usize {
        self.revision_requests
            .lock()
            .get(title)
            .copied()
            .unwrap_or(0)
    }
}

fn english_namespace_id(title: &str) -> i64 {
    match Namespace::of(title) {
        Namespace::Main => 0,
        Namespace::User => 2,
        Namespace::Project => 4,
        Namespace::File => 6,
        Namespace::Template => 10,
        Namespace::Help => 12,
        Namespace::Category => 14,
    }
}

fn page_token(index: usize) -> ContinuationToken {
    let mut pairs = BTreeMap::new();
    pairs.insert(PAGE_KEY.to_string(), index.to_string());
    pairs.insert("continue".to_string(), "||".to_string());
    ContinuationToken::from_pairs(pairs).unwrap()
}

fn page_index(token: Option<&ContinuationToken>) -> usize {
    let Some(token) = token else {
        return 0;
    };
    token
        .pairs()
        .find(|(k, _)| *k == PAGE_KEY)
        .map(|(_, v)| v.parse().unwrap())
        .unwrap_or(0)
}

#[async_trait::async_trait]
impl WikiRepository for ScriptedWiki {
    async fn category_members(&self, category: &CategoryName) -> Result<MemberListing, AppError> {
        *self
            .listings
            .lock()
            .entry(category.as_str().to_string())
            .or_insert(0) += 1;
        tokio::task::yield_now().await;

        if self.failing.contains(category.as_str()) {
            return Err(AppError::MalformedResponse(format!(
                "scripted failure for {}",
                category
            )));
        }

        let members = self
            .categories
            .get(category.as_str())
            .cloned()
            .unwrap_or_default();

        Ok(MemberListing {
            members,
            truncated: false,
        })
    }

    async fn revision_page(
        &self,
        title: &PageTitle,
        _window: &TimeWindow,
        token: Option<&ContinuationToken>,
    ) -> Result<RevisionPage, AppError> {
        *self
            .revision_requests
            .lock()
            .entry(title.as_str().to_string())
            .or_insert(0) += 1;
        tokio::task::yield_now().await;

        if self.failing.contains(title.as_str()) {
            return Err(AppError::MalformedResponse(format!(
                "scripted failure for {}",
                title
            )));
        }

        let pages = match self.histories.get(title.as_str()) {
            Some(pages) => pages,
            None => return Ok(RevisionPage::default()),
        };
        let index = page_index(token);
        let next = if index + 1 < pages.len() {
            Some(page_token(index + 1))
        } else {
            None
        };

        Ok(RevisionPage {
            revisions: pages.get(index).cloned().unwrap_or_default(),
            next,
        })
    }
}

pub fn window() -> TimeWindow {
    TimeWindow::parse("2024-12-31T23:59:59Z", "2024-01-01T00:00:00Z").unwrap()
}

/// A revision as the API would list it.
pub fn revision(id: u64, user: Option<&str>, at: &str) -> RawRevision {
    RawRevision {
        revision_id: id,
        parent_id: Some(id.saturating_sub(1)),
        timestamp: at.parse::<DateTime<Utc>>().unwrap(),
        user: user.map(str::to_string),
        comment: Some(format!("edit {}", id)),
        minor: false,
        anon: user.is_some_and(|u| u.parse::<std::net::IpAddr>().is_ok()),
        user_hidden: user.is_none(),
    }
}

/// A small, fast configuration writing into `dir`.
pub fn config(dir: &Path, seed: &str) -> HarvestConfig {
    HarvestConfig {
        seed: CategoryName::parse(seed).unwrap(),
        window: window(),
        max_depth: 2,
        crawl_workers: 4,
        fetch_workers: 4,
        dequeue_timeout: Duration::from_millis(20),
        request_timeout: Duration::from_secs(5),
        member_page_ceiling: 10,
        revision_page_ceiling: 1000,
        api_endpoint: Url::parse("https://wiki.test/w/api.php").unwrap(),
        user_agent: DEFAULT_USER_AGENT.to_string(),
        output_dir: dir.to_path_buf(),
        resume: false,
        reuse_articles: false,
        pipe: false,
        verbose: false,
    }
}
