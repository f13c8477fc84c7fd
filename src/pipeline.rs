// src/pipeline.rs
//! Pipeline capability traits: the three stages of a harvest.
//!
//! Each trait describes a single capability, enabling testing each stage in isolation.

use crate::analytics::{CrawlSummary, HistorySummary};
use crate::error::AppError;
use crate::model::ArticleHistory;
use crate::output::OutputReport;
use crate::types::{CategoryName, ContributorAddress, PageTitle};

/// The deduplicated article list, and how it was obtained.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredArticles {
    pub articles: Vec<PageTitle>,
    /// `None` when an existing article log was reused instead of crawling.
    pub crawl: Option<CrawlSummary>,
}

/// Per-article histories plus the refined contributor addresses.
#[derive(Debug, Clone, Default)]
pub struct HarvestResults {
    pub histories: Vec<ArticleHistory>,
    pub addresses: Vec<ContributorAddress>,
    pub summary: HistorySummary,
}

/// Finds the articles under a seed category.
#[async_trait::async_trait]
pub trait ArticleDiscovery {
    async fn discover(&self, seed: &CategoryName) -> Result<DiscoveredArticles, AppError>;
}

/// Reads the anonymous edit history of a list of articles.
#[async_trait::async_trait]
pub trait HistoryRetrieval {
    async fn retrieve(&self, articles: Vec<PageTitle>) -> Result<HarvestResults, AppError>;
}

/// Delivers harvest results to their destinations.
pub trait ResultDelivery {
    fn deliver(&self, results: &HarvestResults) -> Result<OutputReport, AppError>;
}
