// src/api/mod.rs
//! MediaWiki API interaction: listing categories and reading revision histories.
//!
//! This module provides a data-oriented interface to the Action API, with
//! clear separation between I/O operations, parsing, and the two worker
//! pools that drive a harvest.

mod category_crawler;
pub mod client;
mod pagination;
pub mod parser;
mod responses;
mod revision_fetcher;
mod types;
mod work_items;
mod work_queue;

use crate::error::AppError;
use crate::types::{CategoryName, PageTitle, TimeWindow};

/// The ability to read category listings and revision histories from a wiki.
///
/// This is the fundamental algebra for API interaction.
/// The crawler and fetcher depend on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait WikiRepository: Send + Sync {
    /// Direct members of a category, paged internally up to the
    /// implementation's ceiling.
    async fn category_members(&self, category: &CategoryName) -> Result<MemberListing, AppError>;

    /// One page of an article's revisions inside `window`, newest first.
    async fn revision_page(
        &self,
        title: &PageTitle,
        window: &TimeWindow,
        token: Option<&ContinuationToken>,
    ) -> Result<RevisionPage, AppError>;
}

// Re-export the public interface
pub use category_crawler::CategoryCrawler;
pub use client::MediaWikiHttpClient;
pub use pagination::fetch_all_pages;
pub use revision_fetcher::{admit_revision, Rejection, RevisionFetcher};
pub use types::{
    CategoryMember, ContinuationToken, MemberListing, Paginated, PaginationResult, RawRevision,
    RevisionPage,
};
pub use work_items::{ArticleJob, CrawlStep, FailureReason, SkipReason, StepOutcome};
pub use work_queue::{Claim, WorkQueue};
