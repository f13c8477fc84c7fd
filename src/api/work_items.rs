// src/api/work_items.rs
//! Work items for the crawl and fetch worker pools, and what became of them.

use crate::error::AppError;
use crate::types::{CategoryName, PageTitle};
use std::fmt;
use std::sync::Arc;

/// A category waiting to be expanded, with its distance from the seed.
///
/// The seed sits at depth 0; its direct members at depth 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStep {
    pub target: CategoryName,
    pub depth: u32,
}

impl CrawlStep {
    pub fn seed(target: CategoryName) -> Self {
        Self { target, depth: 0 }
    }

    /// The step for a subcategory found while expanding this one.
    pub fn child(&self, target: CategoryName) -> Self {
        Self {
            target,
            depth: self.depth + 1,
        }
    }
}

/// An article waiting for its revision history.
///
/// `index` is the article's position in the input list; results are put
/// back in that order once the pool joins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleJob {
    pub index: usize,
    pub title: PageTitle,
}

/// Result of expanding one crawl step.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// The category was listed
    Expanded {
        subcategories: usize,
        articles: usize,
        /// Members outside article space that were not logged (files, templates...).
        other_members: usize,
        truncated: bool,
    },
    /// Step was skipped (not an error)
    Skipped { reason: SkipReason },
    /// Step failed
    Failed { reason: FailureReason },
}

/// Why a crawl step was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Deeper than the configured maximum; never listed.
    DepthExhausted,
    /// At exactly the maximum; every member would be too deep to keep.
    FrontierReached,
    /// Already expanded at this depth or shallower.
    AlreadyExpanded { at_depth: u32 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DepthExhausted => write!(f, "maximum depth exceeded"),
            SkipReason::FrontierReached => write!(f, "at maximum depth, members not listed"),
            SkipReason::AlreadyExpanded { at_depth } => {
                write!(f, "already expanded at depth {}", at_depth)
            }
        }
    }
}

/// Why a crawl step failed.
#[derive(Debug, Clone)]
pub enum FailureReason {
    /// The listing request failed
    Unreachable { cause: Arc<AppError> },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Unreachable { cause } => write!(f, "unreachable: {}", cause),
        }
    }
}
