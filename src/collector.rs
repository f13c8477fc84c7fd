// src/collector.rs
//! Deduplication of crawl and fetch output.
//!
//! The append logs may hold the same title or address many times over
//! (a category reached by two paths, an editor with many edits). The
//! collector turns them into duplicate-free lists that keep first-seen order.

use crate::types::{ContributorAddress, PageTitle};
use indexmap::IndexSet;
use std::hash::Hash;

/// Items kept by a collection pass, with counts of what was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected<T> {
    pub items: Vec<T>,
    pub duplicates: usize,
    /// Lines that failed validation.
    pub invalid: usize,
    /// Valid titles outside article space.
    pub reserved: usize,
}

impl<T> Default for Collected<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            duplicates: 0,
            invalid: 0,
            reserved: 0,
        }
    }
}

/// Removes duplicates, keeping the first occurrence of each item.
pub fn dedupe_preserving_order<T, I>(items: I) -> Vec<T>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .collect::<IndexSet<T>>()
        .into_iter()
        .collect()
}

/// Builds the article list from article-log lines.
///
/// Titles are normalized before comparison, so `Politics_of_Canada` and
/// `Politics of Canada` count once. Titles in reserved namespaces
/// (categories, files, templates, project, user and help pages) are dropped.
pub fn collect_articles<I, S>(lines: I) -> Collected<PageTitle>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut collected = Collected::default();
    let mut seen = IndexSet::new();

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        let title = match PageTitle::new(line) {
            Ok(title) => title,
            Err(e) => {
                log::warn!("Dropping unusable article entry {:?}: {}", line, e);
                collected.invalid += 1;
                continue;
            }
        };
        if title.namespace().is_reserved() {
            log::debug!("Dropping {} ({:?} namespace)", title, title.namespace());
            collected.reserved += 1;
            continue;
        }
        if !seen.insert(title) {
            collected.duplicates += 1;
        }
    }

    collected.items = seen.into_iter().collect();
    log::info!(
        "Collected {} articles ({} duplicates, {} reserved, {} invalid entries dropped)",
        collected.items.len(),
        collected.duplicates,
        collected.reserved,
        collected.invalid
    );
    collected
}

/// Builds the refined address list from address-log lines.
///
/// Each line is trimmed and parsed; addresses are compared in their
/// canonical form, so `2001:DB8::1` and `2001:db8::1` count once.
pub fn collect_addresses<I, S>(lines: I) -> Collected<ContributorAddress>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut collected = Collected::default();
    let mut seen = IndexSet::new();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        match ContributorAddress::parse(line) {
            Ok(address) => {
                if !seen.insert(address) {
                    collected.duplicates += 1;
                }
            }
            Err(e) => {
                log::warn!("Dropping {}", e);
                collected.invalid += 1;
            }
        }
    }

    collected.items = seen.into_iter().collect();
    log::info!(
        "Collected {} unique addresses ({} duplicates, {} invalid entries dropped)",
        collected.items.len(),
        collected.duplicates,
        collected.invalid
    );
    collected
}
