// src/output/paths.rs
//! Where a harvest's files live.
//!
//! Pure path calculations; nothing here touches the filesystem.

use std::path::{Path, PathBuf};

/// Append-only log of article titles found by the crawl.
pub const ARTICLE_LOG_FILE: &str = "articles.log";
/// Append-only log of contributor addresses kept by the fetch.
pub const ADDRESS_LOG_FILE: &str = "addresses.log";
/// Per-article revision records.
pub const REVISIONS_FILE: &str = "revisions.json";
/// Deduplicated, validated addresses, one per line.
pub const REFINED_ADDRESSES_FILE: &str = "addresses.txt";

/// The files of one harvest, all under a single output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn article_log(&self) -> PathBuf {
        self.root.join(ARTICLE_LOG_FILE)
    }

    pub fn address_log(&self) -> PathBuf {
        self.root.join(ADDRESS_LOG_FILE)
    }

    pub fn revisions(&self) -> PathBuf {
        self.root.join(REVISIONS_FILE)
    }

    pub fn refined_addresses(&self) -> PathBuf {
        self.root.join(REFINED_ADDRESSES_FILE)
    }
}
