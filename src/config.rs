// src/config.rs
use crate::constants::{
    DEFAULT_API_ENDPOINT, DEFAULT_CRAWL_WORKERS, DEFAULT_FETCH_WORKERS, DEFAULT_MAX_DEPTH,
    DEFAULT_MEMBER_PAGE_CEILING, DEFAULT_REQUEST_TIMEOUT, DEFAULT_REVISION_PAGE_CEILING,
    DEFAULT_USER_AGENT, MAX_WORKERS, QUEUE_DEQUEUE_TIMEOUT,
};
use crate::error::AppError;
use crate::types::{CategoryName, TimeWindow, ValidationError};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Environment variable overriding the API endpoint.
pub const API_URL_ENV: &str = "MEDIAWIKI_API_URL";
/// Environment variable overriding the User-Agent header.
pub const USER_AGENT_ENV: &str = "MEDIAWIKI_USER_AGENT";

/// Parsed command-line input.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Seed category, with or without the "Category:" prefix (e.g., "Elections in Canada")
    pub category: String,

    /// Newer bound of the revision window, RFC 3339 (e.g., "2024-12-31T23:59:59Z")
    #[arg(long)]
    pub start: String,

    /// Older bound of the revision window, RFC 3339 (e.g., "2023-01-01T00:00:00Z")
    #[arg(long)]
    pub end: String,

    /// How many category levels below the seed to follow (at least 1)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: u32,

    /// Number of concurrent category crawl workers (1 to 64)
    #[arg(long, default_value_t = DEFAULT_CRAWL_WORKERS)]
    pub crawl_workers: usize,

    /// Number of concurrent revision fetch workers (1 to 64)
    #[arg(long, default_value_t = DEFAULT_FETCH_WORKERS)]
    pub fetch_workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub request_timeout: u64,

    /// Pages of members read per category before the listing is accepted as partial
    #[arg(long, default_value_t = DEFAULT_MEMBER_PAGE_CEILING)]
    pub max_member_pages: u32,

    /// Pages of revisions read per article before giving up on the rest
    #[arg(long, default_value_t = DEFAULT_REVISION_PAGE_CEILING)]
    pub max_revision_pages: u32,

    /// Directory receiving the logs and result files
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// MediaWiki api.php endpoint (overrides MEDIAWIKI_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Keep existing log contents instead of starting fresh
    #[arg(long, default_value_t = false)]
    pub resume: bool,

    /// Skip the crawl and fetch histories for the articles already in the article log
    #[arg(long, default_value_t = false)]
    pub reuse_articles: bool,

    /// Pipe mode - print the refined address list to stdout instead of a summary
    #[arg(short = 'p', long, default_value_t = false)]
    pub pipe: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved harvest configuration, validated before any worker starts.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub seed: CategoryName,
    pub window: TimeWindow,
    pub max_depth: u32,
    pub crawl_workers: usize,
    pub fetch_workers: usize,
    pub dequeue_timeout: Duration,
    pub request_timeout: Duration,
    pub member_page_ceiling: u32,
    pub revision_page_ceiling: u32,
    pub api_endpoint: Url,
    pub user_agent: String,
    pub output_dir: PathBuf,
    pub resume: bool,
    pub reuse_articles: bool,
    pub pipe: bool,
    pub verbose: bool,
}

impl HarvestConfig {
    /// Resolves a complete configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with_env(cli, |key| std::env::var(key).ok())
    }

    /// Resolves with an explicit environment lookup.
    pub fn resolve_with_env(
        cli: CommandLineInput,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let seed = CategoryName::parse(&cli.category)?;
        let window = TimeWindow::parse(&cli.start, &cli.end)?;

        if cli.max_depth < 1 {
            return Err(ValidationError::OutOfBounds {
                value: i64::from(cli.max_depth),
                min: 1,
                max: i64::from(u32::MAX),
            }
            .into());
        }
        if cli.request_timeout == 0 {
            return Err(AppError::InvalidConfiguration(
                "request timeout must be at least one second".to_string(),
            ));
        }
        if cli.crawl_workers == 0 || cli.fetch_workers == 0 {
            return Err(AppError::InvalidConfiguration(
                "each worker pool needs at least one worker".to_string(),
            ));
        }
        if cli.max_member_pages == 0 || cli.max_revision_pages == 0 {
            return Err(AppError::InvalidConfiguration(
                "page ceilings must be at least 1".to_string(),
            ));
        }

        let raw_endpoint = cli
            .api_url
            .filter(|url| !url.trim().is_empty())
            .or_else(|| env(API_URL_ENV).filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());
        let api_endpoint = parse_endpoint(&raw_endpoint)?;

        let user_agent = env(USER_AGENT_ENV)
            .map(|ua| ua.trim().to_string())
            .filter(|ua| !ua.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(HarvestConfig {
            seed,
            window,
            max_depth: cli.max_depth,
            crawl_workers: clamp_workers("crawl", cli.crawl_workers),
            fetch_workers: clamp_workers("fetch", cli.fetch_workers),
            dequeue_timeout: QUEUE_DEQUEUE_TIMEOUT,
            request_timeout: Duration::from_secs(cli.request_timeout),
            member_page_ceiling: cli.max_member_pages,
            revision_page_ceiling: cli.max_revision_pages,
            api_endpoint,
            user_agent,
            output_dir: PathBuf::from(cli.output_dir),
            resume: cli.resume,
            reuse_articles: cli.reuse_articles,
            pipe: cli.pipe,
            verbose: cli.verbose,
        })
    }
}

fn clamp_workers(pool: &str, requested: usize) -> usize {
    let clamped = requested.clamp(1, MAX_WORKERS);
    if clamped != requested {
        log::warn!(
            "Requested {} {} workers; using {}",
            requested,
            pool,
            clamped
        );
    }
    clamped
}

fn parse_endpoint(raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw.trim()).map_err(|e| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
