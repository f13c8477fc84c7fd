// src/lib.rs
//! anonedits library: crawls a MediaWiki category tree and collects the
//! anonymous (IP-address) edits made to its articles within a time window.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ErrorKind`, `MediaWikiErrorCode`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `HarvestConfig`
//! - **Domain types**: `PageTitle`, `CategoryName`, `ContributorAddress`, `TimeWindow`
//! - **Results**: `Revision`, `ArticleHistory`, counters
//! - **API client**: `WikiRepository`, `MediaWikiHttpClient`, parsers
//! - **Worker pools**: `CategoryCrawler`, `RevisionFetcher`, `WorkQueue`
//! - **Output**: append logs, collectors, result delivery

mod analytics;
mod api;
mod collector;
mod config;
mod constants;
mod error;
mod harvest;
mod model;
mod output;
mod pipeline;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, ErrorKind, MediaWikiErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, HarvestConfig, API_URL_ENV, USER_AGENT_ENV};
pub use crate::constants::{
    DEFAULT_API_ENDPOINT, DEFAULT_CRAWL_WORKERS, DEFAULT_FETCH_WORKERS, DEFAULT_MAX_DEPTH,
    DEFAULT_USER_AGENT, MAX_WORKERS,
};

// --- Domain Types ---
pub use crate::types::{CategoryName, ContributorAddress, Namespace, PageTitle, TimeWindow};

// --- Results ---
pub use crate::analytics::{CrawlSummary, HistorySummary};
pub use crate::model::{ArticleHistory, Revision, RevisionFlags};

// --- API Client ---
pub use crate::api::{
    admit_revision,
    client::{extract_response_text, ApiResponse},
    fetch_all_pages,
    parser::{parse_category_members, parse_revision_page},
    CategoryMember, ContinuationToken, MediaWikiHttpClient, MemberListing, Paginated,
    PaginationResult, RawRevision, Rejection, RevisionPage, WikiRepository,
};

// --- Worker Pools ---
pub use crate::api::{
    ArticleJob, CategoryCrawler, Claim, CrawlStep, FailureReason, RevisionFetcher, SkipReason,
    StepOutcome, WorkQueue,
};

// --- Collection and Output ---
pub use crate::collector::{collect_addresses, collect_articles, dedupe_preserving_order, Collected};
pub use crate::output::{
    deliver, plan_results, read_log_lines, render_address_list, AppendLog, Delivery, LogHandle,
    OutputLayout, OutputPlan, OutputReport, ADDRESS_LOG_FILE, ARTICLE_LOG_FILE,
    REFINED_ADDRESSES_FILE, REVISIONS_FILE,
};

// --- Pipeline ---
pub use crate::harvest::{HarvestReport, Harvester};
pub use crate::pipeline::{
    ArticleDiscovery, DiscoveredArticles, HarvestResults, HistoryRetrieval, ResultDelivery,
};
