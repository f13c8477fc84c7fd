// src/api/category_crawler.rs
//! Parallel, depth-bounded expansion of a category tree.
//!
//! Workers take categories off a shared queue, list their members, push
//! subcategories back one level deeper and write article-space members to
//! the article log as soon as they are seen. Members are told apart by the
//! namespace id the API reports, never by their title prefix. The pool finishes when no category is
//! queued or being expanded.

use super::work_items::{CrawlStep, FailureReason, SkipReason, StepOutcome};
use super::work_queue::WorkQueue;
use super::WikiRepository;
use crate::analytics::CrawlSummary;
use crate::config::HarvestConfig;
use crate::constants::{MAX_WORKERS, QUEUE_DEQUEUE_TIMEOUT};
use crate::error::AppError;
use crate::output::LogHandle;
use crate::types::CategoryName;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Crawls a category tree with a fixed pool of workers.
pub struct CategoryCrawler {
    repository: Arc<dyn WikiRepository>,
    max_depth: u32,
    num_workers: usize,
    dequeue_timeout: Duration,
}

impl CategoryCrawler {
    /// Creates a crawler sized and bounded by the harvest configuration.
    pub fn new(repository: Arc<dyn WikiRepository>, config: &HarvestConfig) -> Self {
        Self::with_workers(repository, config.max_depth, config.crawl_workers)
            .with_dequeue_timeout(config.dequeue_timeout)
    }

    /// Creates a crawler with a specific depth bound and number of workers.
    pub fn with_workers(
        repository: Arc<dyn WikiRepository>,
        max_depth: u32,
        num_workers: usize,
    ) -> Self {
        Self {
            repository,
            max_depth,
            num_workers: num_workers.clamp(1, MAX_WORKERS),
            dequeue_timeout: QUEUE_DEQUEUE_TIMEOUT,
        }
    }

    /// Sets how long idle workers sleep between queue re-checks.
    pub fn with_dequeue_timeout(mut self, timeout: Duration) -> Self {
        self.dequeue_timeout = timeout;
        self
    }

    /// Crawls from `seed`, appending every article-space member to `articles`.
    ///
    /// The seed is depth 0 and its members depth 1; no category deeper than
    /// the configured maximum is listed. Failed listings are logged and
    /// dropped. Only failures to record articles abort the crawl.
    pub async fn crawl(
        &self,
        seed: &CategoryName,
        articles: &LogHandle,
    ) -> Result<CrawlSummary, AppError> {
        let queue = Arc::new(WorkQueue::new());
        let expanded = Arc::new(DashMap::new());

        log::info!(
            "Starting crawl of {} (max depth: {}, workers: {})",
            seed,
            self.max_depth,
            self.num_workers
        );
        queue.enqueue(CrawlStep::seed(seed.clone()));

        let mut join_set = JoinSet::new();
        for worker_id in 0..self.num_workers {
            let queue = Arc::clone(&queue);
            let expander = CategoryExpander {
                repository: Arc::clone(&self.repository),
                expanded: Arc::clone(&expanded),
                max_depth: self.max_depth,
            };
            let articles = articles.clone();
            let idle_wait = self.dequeue_timeout;

            join_set.spawn(async move {
                run_crawl_loop(worker_id, &queue, &expander, &articles, idle_wait).await
            });
        }

        // Dropping the set on an early return aborts the remaining workers.
        let mut summary = CrawlSummary::default();
        while let Some(joined) = join_set.join_next().await {
            summary = summary.merge(joined??);
        }

        log::info!("Crawl of {} complete: {}", seed, summary);
        Ok(summary)
    }
}

/// Shared per-crawl state each worker expands steps against.
struct CategoryExpander {
    repository: Arc<dyn WikiRepository>,
    /// Shallowest depth each category has been expanded at.
    expanded: Arc<DashMap<CategoryName, u32>>,
    max_depth: u32,
}

impl CategoryExpander {
    /// Expands one step, returning its outcome and the subcategory steps it found.
    async fn expand(
        &self,
        step: &CrawlStep,
        articles: &LogHandle,
    ) -> Result<(StepOutcome, Vec<CrawlStep>), AppError> {
        if step.depth > self.max_depth {
            return Ok(skipped(SkipReason::DepthExhausted));
        }
        if step.depth == self.max_depth {
            return Ok(skipped(SkipReason::FrontierReached));
        }
        if let Some(at_depth) = self.claim_expansion(step) {
            return Ok(skipped(SkipReason::AlreadyExpanded { at_depth }));
        }

        let listing = match self.repository.category_members(&step.target).await {
            Ok(listing) => listing,
            Err(e) => {
                log::warn!("Failed to list {}: {}", step.target, e);
                return Ok((
                    StepOutcome::Failed {
                        reason: FailureReason::Unreachable { cause: Arc::new(e) },
                    },
                    vec![],
                ));
            }
        };

        let mut children = Vec::new();
        let mut logged = 0;
        let mut other = 0;
        for member in listing.members {
            if member.is_category() {
                match CategoryName::from_namespace_id(member.title, member.ns) {
                    Ok(name) => children.push(step.child(name)),
                    Err(e) => log::warn!("Ignoring member of {}: {}", step.target, e),
                }
            } else if member.is_article() {
                articles.append(member.title.into_string()).await?;
                logged += 1;
            } else {
                log::trace!("Not logging {} (namespace {})", member.title, member.ns);
                other += 1;
            }
        }

        log::debug!(
            "Expanded {} at depth {}: {} articles, {} subcategories, {} other members",
            step.target,
            step.depth,
            logged,
            children.len(),
            other
        );

        Ok((
            StepOutcome::Expanded {
                subcategories: children.len(),
                articles: logged,
                other_members: other,
                truncated: listing.truncated,
            },
            children,
        ))
    }

    /// Records that `step` is about to be expanded.
    ///
    /// Returns the earlier depth when the category was already expanded at
    /// the same depth or shallower, in which case nothing new is reachable.
    fn claim_expansion(&self, step: &CrawlStep) -> Option<u32> {
        match self.expanded.entry(step.target.clone()) {
            Entry::Occupied(mut seen) => {
                let at_depth = *seen.get();
                if at_depth <= step.depth {
                    Some(at_depth)
                } else {
                    seen.insert(step.depth);
                    None
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(step.depth);
                None
            }
        }
    }
}

fn skipped(reason: SkipReason) -> (StepOutcome, Vec<CrawlStep>) {
    (StepOutcome::Skipped { reason }, vec![])
}

/// Main worker loop: expand steps until the queue drains.
async fn run_crawl_loop(
    worker_id: usize,
    queue: &WorkQueue<CrawlStep>,
    expander: &CategoryExpander,
    articles: &LogHandle,
    idle_wait: Duration,
) -> Result<CrawlSummary, AppError> {
    let mut summary = CrawlSummary::default();

    while let Some(claim) = queue.dequeue(idle_wait).await {
        let (outcome, children) = expander.expand(claim.item(), articles).await?;

        // Queue additional work BEFORE releasing this item
        if !children.is_empty() {
            queue.enqueue_multiple(children);
        }

        match &outcome {
            StepOutcome::Expanded { .. } => {}
            StepOutcome::Skipped { reason } => {
                log::debug!("Skipped {}: {}", claim.item().target, reason);
            }
            StepOutcome::Failed { reason } => {
                log::warn!("Crawl step for {} failed: {}", claim.item().target, reason);
            }
        }
        summary.record(&outcome);
        drop(claim);
    }

    log::debug!(
        "Crawl worker {} exiting after {} steps",
        worker_id,
        summary.steps_processed()
    );
    Ok(summary)
}
