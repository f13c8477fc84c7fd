// src/api/revision_fetcher.rs
//! Parallel retrieval of anonymous revisions for a list of articles.
//!
//! Each worker pages through one article's history at a time, keeps the
//! revisions whose contributor is an IP address and whose timestamp falls
//! in the window, and sends every kept address to the address log.

use super::types::{ContinuationToken, RawRevision};
use super::work_items::ArticleJob;
use super::work_queue::WorkQueue;
use super::WikiRepository;
use crate::analytics::HistorySummary;
use crate::config::HarvestConfig;
use crate::constants::{DEFAULT_REVISION_PAGE_CEILING, MAX_WORKERS, QUEUE_DEQUEUE_TIMEOUT};
use crate::error::AppError;
use crate::model::{ArticleHistory, Revision, RevisionFlags};
use crate::output::LogHandle;
use crate::types::{ContributorAddress, PageTitle, TimeWindow};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Why a revision was left out of an article's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Timestamp outside the closed window.
    OutsideWindow,
    /// Username suppressed or absent.
    HiddenContributor,
    /// A registered account rather than an address.
    NamedContributor,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::OutsideWindow => write!(f, "outside the time window"),
            Rejection::HiddenContributor => write!(f, "contributor hidden"),
            Rejection::NamedContributor => write!(f, "named contributor"),
        }
    }
}

/// Keeps a revision iff its timestamp is in `window` and its contributor
/// parses as an IP address.
pub fn admit_revision(
    raw: &RawRevision,
    title: &PageTitle,
    window: &TimeWindow,
) -> Result<Revision, Rejection> {
    if !window.contains(&raw.timestamp) {
        return Err(Rejection::OutsideWindow);
    }
    let user = match raw.user.as_deref() {
        Some(user) if !raw.user_hidden => user,
        _ => return Err(Rejection::HiddenContributor),
    };
    let contributor = ContributorAddress::parse(user).map_err(|_| Rejection::NamedContributor)?;

    Ok(Revision {
        article_title: title.clone(),
        revision_id: raw.revision_id,
        parent_id: raw.parent_id.filter(|&id| id != 0),
        timestamp: raw.timestamp,
        contributor,
        comment: raw.comment.clone().unwrap_or_default(),
        flags: RevisionFlags { minor: raw.minor },
    })
}

/// Fetches revision histories with a fixed pool of workers.
#[derive(Clone)]
pub struct RevisionFetcher {
    repository: Arc<dyn WikiRepository>,
    window: TimeWindow,
    num_workers: usize,
    max_pages: u32,
    dequeue_timeout: Duration,
}

impl RevisionFetcher {
    /// Creates a fetcher sized and bounded by the harvest configuration.
    pub fn new(repository: Arc<dyn WikiRepository>, config: &HarvestConfig) -> Self {
        Self::with_workers(repository, config.window, config.fetch_workers)
            .with_page_ceiling(config.revision_page_ceiling)
            .with_dequeue_timeout(config.dequeue_timeout)
    }

    /// Creates a fetcher with a specific window and number of workers.
    pub fn with_workers(
        repository: Arc<dyn WikiRepository>,
        window: TimeWindow,
        num_workers: usize,
    ) -> Self {
        Self {
            repository,
            window,
            num_workers: num_workers.clamp(1, MAX_WORKERS),
            max_pages: DEFAULT_REVISION_PAGE_CEILING,
            dequeue_timeout: QUEUE_DEQUEUE_TIMEOUT,
        }
    }

    /// Limits how many revision pages are read for one article.
    pub fn with_page_ceiling(mut self, pages: u32) -> Self {
        self.max_pages = pages.max(1);
        self
    }

    /// Sets how long idle workers sleep between queue re-checks.
    pub fn with_dequeue_timeout(mut self, timeout: Duration) -> Self {
        self.dequeue_timeout = timeout;
        self
    }

    /// Fetches every article's history, returned in input order.
    ///
    /// An article whose requests fail is kept with no revisions and counted
    /// as failed. Only a failure to record addresses aborts the phase.
    pub async fn fetch_histories(
        &self,
        articles: Vec<PageTitle>,
        addresses: &LogHandle,
    ) -> Result<(Vec<ArticleHistory>, HistorySummary), AppError> {
        let total = articles.len();
        if total == 0 {
            return Ok((Vec::new(), HistorySummary::default()));
        }

        let queue = Arc::new(WorkQueue::new());
        queue.enqueue_multiple(
            articles
                .into_iter()
                .enumerate()
                .map(|(index, title)| ArticleJob { index, title }),
        );

        let workers = self.num_workers.min(total);
        log::info!(
            "Fetching revision histories for {} articles ({} workers, window {} .. {})",
            total,
            workers,
            self.window.oldest(),
            self.window.newest()
        );

        let mut join_set = JoinSet::new();
        for worker_id in 0..workers {
            let queue = Arc::clone(&queue);
            let fetcher = self.clone();
            let addresses = addresses.clone();

            join_set.spawn(
                async move { run_fetch_loop(worker_id, &queue, &fetcher, &addresses).await },
            );
        }

        let mut indexed = Vec::with_capacity(total);
        let mut summary = HistorySummary::default();
        while let Some(joined) = join_set.join_next().await {
            let (histories, worker_summary) = joined??;
            indexed.extend(histories);
            summary = summary.merge(worker_summary);
        }

        indexed.sort_by_key(|(index, _)| *index);
        let histories = indexed.into_iter().map(|(_, history)| history).collect();

        log::info!("Revision fetch complete: {}", summary);
        Ok((histories, summary))
    }

    /// Pages through one article's history inside the window.
    ///
    /// Each kept contributor is appended to `addresses` as soon as its page
    /// is read, so addresses from pages read before a failure stay logged
    /// even though the article itself is recorded empty.
    pub async fn fetch_one(
        &self,
        title: &PageTitle,
        addresses: &LogHandle,
    ) -> Result<(ArticleHistory, HistorySummary), AppError> {
        let mut summary = HistorySummary {
            articles_processed: 1,
            ..Default::default()
        };
        let mut revisions = Vec::new();
        let mut token: Option<ContinuationToken> = None;
        let mut pages_fetched = 0u32;

        loop {
            if pages_fetched >= self.max_pages {
                log::warn!(
                    "Stopped reading revisions of '{}' after {} pages",
                    title,
                    pages_fetched
                );
                summary.page_ceiling_hits += 1;
                break;
            }

            let page = match self
                .repository
                .revision_page(title, &self.window, token.as_ref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    log::warn!("Failed to fetch revisions for '{}': {}", title, e);
                    summary.articles_failed += 1;
                    return Ok((ArticleHistory::empty(title.clone()), summary));
                }
            };
            pages_fetched += 1;
            summary.pages_requested += 1;

            for raw in &page.revisions {
                match admit_revision(raw, title, &self.window) {
                    Ok(revision) => {
                        addresses.append(revision.contributor.to_string()).await?;
                        summary.revisions_kept += 1;
                        revisions.push(revision);
                    }
                    Err(rejection) => summary.record_rejection(rejection),
                }
            }

            match page.next {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        log::debug!(
            "'{}': {} anonymous revisions over {} pages",
            title,
            revisions.len(),
            pages_fetched
        );
        Ok((
            ArticleHistory {
                title: title.clone(),
                revisions,
            },
            summary,
        ))
    }
}

/// Main worker loop: fetch articles until the queue drains.
async fn run_fetch_loop(
    worker_id: usize,
    queue: &WorkQueue<ArticleJob>,
    fetcher: &RevisionFetcher,
    addresses: &LogHandle,
) -> Result<(Vec<(usize, ArticleHistory)>, HistorySummary), AppError> {
    let mut histories = Vec::new();
    let mut summary = HistorySummary::default();

    while let Some(claim) = queue.dequeue(fetcher.dequeue_timeout).await {
        let job = claim.item();
        let (history, article_summary) = fetcher.fetch_one(&job.title, addresses).await?;
        histories.push((job.index, history));
        summary = summary.merge(article_summary);
    }

    log::debug!(
        "Fetch worker {} exiting after {} articles",
        worker_id,
        summary.articles_processed
    );
    Ok((histories, summary))
}
