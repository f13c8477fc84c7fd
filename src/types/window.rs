//! The closed time window revisions are collected from.

use super::ValidationError;
use chrono::{DateTime, SecondsFormat, Utc};

/// A closed interval `[oldest, newest]`.
///
/// MediaWiki pages revisions newest-first, so the newer bound is what the API
/// calls `rvstart` and the older bound is `rvend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    newest: DateTime<Utc>,
    oldest: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(newest: DateTime<Utc>, oldest: DateTime<Utc>) -> Result<Self, ValidationError> {
        if newest < oldest {
            return Err(ValidationError::InvertedWindow {
                newest: format_api_timestamp(&newest),
                oldest: format_api_timestamp(&oldest),
            });
        }
        Ok(Self { newest, oldest })
    }

    /// Parses both bounds from RFC 3339 strings such as `2024-12-31T23:59:59Z`.
    pub fn parse(newest: &str, oldest: &str) -> Result<Self, ValidationError> {
        Self::new(parse_timestamp(newest)?, parse_timestamp(oldest)?)
    }

    pub fn newest(&self) -> DateTime<Utc> {
        self.newest
    }

    pub fn oldest(&self) -> DateTime<Utc> {
        self.oldest
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.oldest && *timestamp <= self.newest
    }

    /// `(rvstart, rvend)` in the format the API expects.
    pub fn api_bounds(&self) -> (String, String) {
        (
            format_api_timestamp(&self.newest),
            format_api_timestamp(&self.oldest),
        )
    }
}

fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ValidationError::InvalidTimestamp {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

fn format_api_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
