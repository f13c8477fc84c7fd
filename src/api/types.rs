//! Type definitions for the MediaWiki API module.
//!
//! These are the boundary shapes the harvest engines consume: already
//! validated, with optional fields spelled out as `Option`.

use crate::types::{Namespace, PageTitle};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

// --- Pagination ---

/// The opaque cursor MediaWiki returns under `continue`.
///
/// Every key/value pair is sent back verbatim on the next request; the
/// client never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContinuationToken(BTreeMap<String, String>);

impl ContinuationToken {
    /// Wraps a `continue` object, returning `None` when it carries nothing.
    pub fn from_pairs(pairs: BTreeMap<String, String>) -> Option<Self> {
        if pairs.is_empty() {
            None
        } else {
            Some(Self(pairs))
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merges the token into a request's parameters, overriding same-named keys.
    pub fn merge_into(&self, params: &mut Vec<(String, String)>) {
        for (key, value) in &self.0 {
            params.retain(|(existing, _)| existing != key);
            params.push((key.clone(), value.clone()));
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub next: Option<ContinuationToken>,
}

/// Everything a pagination run collected.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
    /// A continuation token was still pending when the page ceiling stopped the run.
    pub truncated: bool,
}

// --- Category listing ---

/// A direct member of a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMember {
    pub title: PageTitle,
    /// Numeric namespace id as reported by the API.
    pub ns: i64,
}

impl CategoryMember {
    pub fn new(title: PageTitle, ns: i64) -> Self {
        Self { title, ns }
    }

    pub fn is_category(&self) -> bool {
        self.ns == Namespace::CATEGORY_ID
    }

    /// Only article-space members belong in the article set.
    pub fn is_article(&self) -> bool {
        self.ns == Namespace::MAIN_ID
    }
}

/// A category's members as far as the listing could see.
#[derive(Debug, Clone, Default)]
pub struct MemberListing {
    pub members: Vec<CategoryMember>,
    /// More members exist beyond the configured page ceiling.
    pub truncated: bool,
}

// --- Revision listing ---

/// A revision as reported by the API, before contributor filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRevision {
    pub revision_id: u64,
    pub parent_id: Option<u64>,
    pub timestamp: DateTime<Utc>,
    /// Absent when the username was suppressed.
    pub user: Option<String>,
    pub comment: Option<String>,
    pub minor: bool,
    pub anon: bool,
    pub user_hidden: bool,
}

/// One page of an article's revision history.
#[derive(Debug, Clone, Default)]
pub struct RevisionPage {
    pub revisions: Vec<RawRevision>,
    pub next: Option<ContinuationToken>,
}
