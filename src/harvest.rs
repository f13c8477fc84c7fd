// src/harvest.rs
//! Orchestrates a harvest: crawl, collect, fetch, collect, deliver.
//!
//! Between phases the durable logs are the hand-off. The article list the
//! fetch works from is always re-read from the article log, never taken
//! from the crawl's in-memory state.

use crate::analytics::CrawlSummary;
use crate::api::{CategoryCrawler, RevisionFetcher, WikiRepository};
use crate::collector::{collect_addresses, collect_articles};
use crate::config::HarvestConfig;
use crate::error::AppError;
use crate::output::{deliver, plan_results, read_log_lines, AppendLog, OutputLayout, OutputReport};
use crate::pipeline::{
    ArticleDiscovery, DiscoveredArticles, HarvestResults, HistoryRetrieval, ResultDelivery,
};
use crate::types::{CategoryName, PageTitle};
use std::sync::Arc;

/// What a complete harvest produced.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub articles: usize,
    pub crawl: Option<CrawlSummary>,
    pub results: HarvestResults,
    pub output: OutputReport,
}

/// Runs the three pipeline stages against one wiki.
pub struct Harvester {
    repository: Arc<dyn WikiRepository>,
    config: HarvestConfig,
    layout: OutputLayout,
}

impl Harvester {
    pub fn new(repository: Arc<dyn WikiRepository>, config: HarvestConfig) -> Self {
        let layout = OutputLayout::new(config.output_dir.clone());
        Self {
            repository,
            config,
            layout,
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Runs discovery, retrieval and delivery in order.
    pub async fn run(&self) -> Result<HarvestReport, AppError> {
        let discovered = self.discover(&self.config.seed).await?;
        let articles = discovered.articles.len();

        let results = self.retrieve(discovered.articles).await?;
        let output = ResultDelivery::deliver(self, &results)?;

        Ok(HarvestReport {
            articles,
            crawl: discovered.crawl,
            results,
            output,
        })
    }
}

#[async_trait::async_trait]
impl ArticleDiscovery for Harvester {
    async fn discover(&self, seed: &CategoryName) -> Result<DiscoveredArticles, AppError> {
        let path = self.layout.article_log();

        let crawl = if self.config.reuse_articles {
            if !tokio::fs::try_exists(&path).await? {
                return Err(AppError::MissingConfiguration(format!(
                    "no article log to reuse at {}",
                    path.display()
                )));
            }
            log::info!("Reusing article log {}", path.display());
            None
        } else {
            let log = AppendLog::open(&path, !self.config.resume).await?;
            let handle = log.handle();
            let crawler = CategoryCrawler::new(Arc::clone(&self.repository), &self.config);

            let crawled = crawler.crawl(seed, &handle).await;
            drop(handle);
            let closed = log.close().await;
            let summary = crawled?;
            closed?;
            Some(summary)
        };

        let collected = collect_articles(read_log_lines(&path).await?);
        Ok(DiscoveredArticles {
            articles: collected.items,
            crawl,
        })
    }
}

#[async_trait::async_trait]
impl HistoryRetrieval for Harvester {
    async fn retrieve(&self, articles: Vec<PageTitle>) -> Result<HarvestResults, AppError> {
        let path = self.layout.address_log();
        let log = AppendLog::open(&path, !self.config.resume).await?;
        let handle = log.handle();
        let fetcher = RevisionFetcher::new(Arc::clone(&self.repository), &self.config);

        let fetched = fetcher.fetch_histories(articles, &handle).await;
        drop(handle);
        let closed = log.close().await;
        let (histories, summary) = fetched?;
        closed?;

        let addresses = collect_addresses(read_log_lines(&path).await?).items;
        Ok(HarvestResults {
            histories,
            addresses,
            summary,
        })
    }
}

impl ResultDelivery for Harvester {
    fn deliver(&self, results: &HarvestResults) -> Result<OutputReport, AppError> {
        let plan = plan_results(
            &self.layout,
            &results.histories,
            &results.addresses,
            self.config.pipe,
        )?;
        let report = deliver(plan)?;

        if !report.is_success() {
            return Err(AppError::DeliveryFailed {
                failures: report.failures,
            });
        }
        Ok(report)
    }
}
