// src/analytics/mod.rs
//! Counters for the crawl and fetch phases.
//!
//! Each worker keeps its own summary and the pool merges them at join, so
//! counting never contends on shared state.

use crate::api::{Rejection, SkipReason, StepOutcome};
use std::fmt;

/// What the category crawl did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub categories_expanded: usize,
    pub articles_logged: usize,
    pub subcategories_enqueued: usize,
    /// Members outside article space and the category namespace.
    pub other_members_skipped: usize,
    pub depth_exhausted: usize,
    pub frontier_reached: usize,
    pub already_expanded: usize,
    pub truncated_listings: usize,
    pub failed_listings: usize,
}

impl CrawlSummary {
    /// Counts one processed step.
    pub fn record(&mut self, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Expanded {
                subcategories,
                articles,
                other_members,
                truncated,
            } => {
                self.categories_expanded += 1;
                self.subcategories_enqueued += subcategories;
                self.articles_logged += articles;
                self.other_members_skipped += other_members;
                if *truncated {
                    self.truncated_listings += 1;
                }
            }
            StepOutcome::Skipped { reason } => match reason {
                SkipReason::DepthExhausted => self.depth_exhausted += 1,
                SkipReason::FrontierReached => self.frontier_reached += 1,
                SkipReason::AlreadyExpanded { .. } => self.already_expanded += 1,
            },
            StepOutcome::Failed { .. } => self.failed_listings += 1,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            categories_expanded: self.categories_expanded + other.categories_expanded,
            articles_logged: self.articles_logged + other.articles_logged,
            subcategories_enqueued: self.subcategories_enqueued + other.subcategories_enqueued,
            other_members_skipped: self.other_members_skipped + other.other_members_skipped,
            depth_exhausted: self.depth_exhausted + other.depth_exhausted,
            frontier_reached: self.frontier_reached + other.frontier_reached,
            already_expanded: self.already_expanded + other.already_expanded,
            truncated_listings: self.truncated_listings + other.truncated_listings,
            failed_listings: self.failed_listings + other.failed_listings,
        }
    }

    /// Steps the pool took off the queue, whatever became of them.
    pub fn steps_processed(&self) -> usize {
        self.categories_expanded
            + self.depth_exhausted
            + self.frontier_reached
            + self.already_expanded
            + self.failed_listings
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} categories expanded, {} article entries logged, {} other members skipped, ",
            self.categories_expanded,
            self.articles_logged,
            self.other_members_skipped
        )?;
        write!(
            f,
            "{} failed listings, {} truncated listings ({} frontier, {} revisits, {} too deep)",
            self.failed_listings,
            self.truncated_listings,
            self.frontier_reached,
            self.already_expanded,
            self.depth_exhausted
        )
    }
}

/// What the revision fetch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub articles_processed: usize,
    pub articles_failed: usize,
    pub pages_requested: usize,
    pub revisions_kept: usize,
    pub named_contributors: usize,
    pub hidden_contributors: usize,
    pub outside_window: usize,
    pub page_ceiling_hits: usize,
}

impl HistorySummary {
    pub fn record_rejection(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::OutsideWindow => self.outside_window += 1,
            Rejection::HiddenContributor => self.hidden_contributors += 1,
            Rejection::NamedContributor => self.named_contributors += 1,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            articles_processed: self.articles_processed + other.articles_processed,
            articles_failed: self.articles_failed + other.articles_failed,
            pages_requested: self.pages_requested + other.pages_requested,
            revisions_kept: self.revisions_kept + other.revisions_kept,
            named_contributors: self.named_contributors + other.named_contributors,
            hidden_contributors: self.hidden_contributors + other.hidden_contributors,
            outside_window: self.outside_window + other.outside_window,
            page_ceiling_hits: self.page_ceiling_hits + other.page_ceiling_hits,
        }
    }

    /// Revisions seen in total, kept or not.
    pub fn revisions_seen(&self) -> usize {
        self.revisions_kept
            + self.named_contributors
            + self.hidden_contributors
            + self.outside_window
    }
}

impl fmt::Display for HistorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} articles ({} failed), {} pages requested, {} of {} revisions kept",
            self.articles_processed,
            self.articles_failed,
            self.pages_requested,
            self.revisions_kept,
            self.revisions_seen()
        )
    }
}
