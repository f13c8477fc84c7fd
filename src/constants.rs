// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these tells you how the harvest behaves: how
//! many workers it runs, how long it waits, how far it pages.

use std::time::Duration;

// ---------------------------------------------------------------------------
// MediaWiki API boundaries
// ---------------------------------------------------------------------------

/// The public English Wikipedia endpoint used when nothing else is configured.
pub const DEFAULT_API_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Identifies this client to the wiki's operators, as Wikimedia's API etiquette asks.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "anonedits/",
    env!("CARGO_PKG_VERSION"),
    " (category revision crawler)"
);

/// Asks the API for its largest allowed page (500 for anonymous clients).
pub const API_LIMIT_MAX: &str = "max";

/// Revision fields requested for every article.
pub const REVISION_PROPERTIES: &str = "ids|timestamp|user|comment|flags";

/// How many pages of a single category's members are read before the
/// listing is accepted as partial.
pub const DEFAULT_MEMBER_PAGE_CEILING: u32 = 10;

/// Hard stop on revision pagination for one article.
///
/// A well-behaved API always ends pagination; this bound only matters if a
/// continuation token keeps coming back.
pub const DEFAULT_REVISION_PAGE_CEILING: u32 = 1000;

/// Per-request timeout for every HTTP call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Worker pools
// ---------------------------------------------------------------------------

/// Category crawl workers.
pub const DEFAULT_CRAWL_WORKERS: usize = 10;

/// Revision fetch workers.
pub const DEFAULT_FETCH_WORKERS: usize = 5;

/// Upper bound on either pool, to stay polite to a shared public API.
pub const MAX_WORKERS: usize = 64;

/// How long an idle worker waits on the queue before re-checking the
/// pending count. Completion is driven by the count, not by this timeout.
pub const QUEUE_DEQUEUE_TIMEOUT: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Crawl shape
// ---------------------------------------------------------------------------

/// Category expansion hops followed when the caller does not say otherwise.
pub const DEFAULT_MAX_DEPTH: u32 = 3;

// ---------------------------------------------------------------------------
// Durable logs
// ---------------------------------------------------------------------------

/// Lines buffered between workers and the single log writer.
pub const LOG_CHANNEL_CAPACITY: usize = 1024;

/// Lines the writer drains per batch before flushing to disk.
pub const LOG_WRITE_BATCH: usize = 256;
