// src/api/responses.rs
//! Wire shapes of `action=query` responses (`formatversion=2`).
//!
//! Every field the API may omit is `Option` or `#[serde(default)]`, so a
//! missing key deserializes to an explicit absence instead of failing.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Top-level envelope shared by every query.
#[derive(Debug, Deserialize)]
pub struct QueryEnvelope<Q> {
    pub query: Option<Q>,
    #[serde(default, rename = "continue")]
    pub continuation: Option<BTreeMap<String, ContinueValue>>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// `continue` values are strings in practice; integers are tolerated.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContinueValue {
    Text(String),
    Number(i64),
}

impl ContinueValue {
    pub fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

/// `{"error": {"code": ..., "info": ...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

// --- list=categorymembers ---

#[derive(Debug, Default, Deserialize)]
pub struct CategoryMembersQuery {
    #[serde(default)]
    pub categorymembers: Vec<CategoryMemberEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryMemberEntry {
    #[serde(default)]
    pub pageid: Option<u64>,
    pub ns: i64,
    pub title: String,
}

// --- prop=revisions ---

#[derive(Debug, Default, Deserialize)]
pub struct RevisionsQuery {
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PageEntry {
    #[serde(default)]
    pub pageid: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub revisions: Vec<RevisionEntry>,
}

#[derive(Debug, Deserialize)]
pub struct RevisionEntry {
    pub revid: u64,
    #[serde(default)]
    pub parentid: Option<u64>,
    pub timestamp: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub minor: bool,
    #[serde(default)]
    pub anon: bool,
    #[serde(default)]
    pub userhidden: bool,
}
