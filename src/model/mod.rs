// src/model/mod.rs
//! The harvest's result records: anonymous revisions grouped per article.

use crate::types::{ContributorAddress, PageTitle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flags carried over from the revision listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionFlags {
    pub minor: bool,
}

/// One edit made by an anonymous contributor inside the time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub article_title: PageTitle,
    pub revision_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    pub timestamp: DateTime<Utc>,
    pub contributor: ContributorAddress,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub flags: RevisionFlags,
}

/// An article and the anonymous revisions kept for it, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleHistory {
    pub title: PageTitle,
    pub revisions: Vec<Revision>,
}

impl ArticleHistory {
    /// The record kept for an article whose history could not be read.
    pub fn empty(title: PageTitle) -> Self {
        Self {
            title,
            revisions: Vec::new(),
        }
    }

    pub fn contributors(&self) -> impl Iterator<Item = &ContributorAddress> {
        self.revisions.iter().map(|r| &r.contributor)
    }
}
