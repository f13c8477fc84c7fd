// src/api/parser.rs
//! Turns raw API response bodies into validated boundary types.
//!
//! Parsing is pure: the client hands over the body text with its status,
//! and this module decides whether it is data, an API error, or garbage.

use super::client::ApiResponse;
use super::responses::{
    ApiErrorBody, CategoryMembersQuery, QueryEnvelope, RevisionEntry, RevisionsQuery,
};
use super::types::{CategoryMember, ContinuationToken, Paginated, RawRevision, RevisionPage};
use crate::error::{AppError, MediaWikiErrorCode};
use crate::types::PageTitle;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Parses one page of `list=categorymembers`.
pub fn parse_category_members(
    response: ApiResponse<String>,
) -> Result<Paginated<CategoryMember>, AppError> {
    let (query, next) = decode_envelope::<CategoryMembersQuery>(response)?;
    let entries = query.map(|q| q.categorymembers).unwrap_or_default();

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        match PageTitle::new(&entry.title) {
            Ok(title) => items.push(CategoryMember::new(title, entry.ns)),
            Err(e) => {
                log::warn!(
                    "Skipping category member with unusable title {:?} (page id {:?}): {}",
                    entry.title,
                    entry.pageid,
                    e
                );
            }
        }
    }

    Ok(Paginated { items, next })
}

/// Parses one page of `prop=revisions` for a single title.
pub fn parse_revision_page(response: ApiResponse<String>) -> Result<RevisionPage, AppError> {
    let (query, next) = decode_envelope::<RevisionsQuery>(response)?;
    let pages = query.map(|q| q.pages).unwrap_or_default();

    let mut revisions = Vec::new();
    for page in pages {
        if page.invalid {
            return Err(AppError::MediaWikiService {
                code: MediaWikiErrorCode::InvalidTitle,
                info: format!("invalid title: {}", page.title),
            });
        }
        if page.missing {
            return Err(AppError::MediaWikiService {
                code: MediaWikiErrorCode::MissingTitle,
                info: format!("page does not exist: {}", page.title),
            });
        }
        log::trace!(
            "{} revisions on this page for '{}' (page id {:?})",
            page.revisions.len(),
            page.title,
            page.pageid
        );
        for entry in page.revisions {
            revisions.push(convert_revision(entry)?);
        }
    }

    Ok(RevisionPage { revisions, next })
}

/// Decodes the shared envelope, surfacing API errors and the continuation token.
fn decode_envelope<Q: DeserializeOwned>(
    response: ApiResponse<String>,
) -> Result<(Option<Q>, Option<ContinuationToken>), AppError> {
    let ApiResponse { data, status, url } = response;

    let envelope: QueryEnvelope<Q> = match serde_json::from_str(&data) {
        Ok(envelope) => envelope,
        Err(e) if !status.is_success() => {
            log::debug!("Non-JSON error body from {}: {}", url, e);
            return Err(AppError::MediaWikiService {
                code: MediaWikiErrorCode::from_http_status(status.as_u16()),
                info: body_preview(&data),
            });
        }
        Err(e) => {
            return Err(AppError::MalformedResponse(format!(
                "{} from {}: {}",
                e,
                url,
                body_preview(&data)
            )))
        }
    };

    if let Some(ApiErrorBody { code, info }) = envelope.error {
        return Err(AppError::MediaWikiService {
            code: MediaWikiErrorCode::from_api_response(&code),
            info,
        });
    }
    if !status.is_success() {
        return Err(AppError::MediaWikiService {
            code: MediaWikiErrorCode::from_http_status(status.as_u16()),
            info: body_preview(&data),
        });
    }

    let next = envelope.continuation.and_then(|pairs| {
        ContinuationToken::from_pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k, v.into_string()))
                .collect(),
        )
    });

    Ok((envelope.query, next))
}

fn convert_revision(entry: RevisionEntry) -> Result<RawRevision, AppError> {
    let timestamp = DateTime::parse_from_rfc3339(&entry.timestamp)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            AppError::MalformedResponse(format!(
                "revision {} has unparseable timestamp {:?}: {}",
                entry.revid, entry.timestamp, e
            ))
        })?;

    Ok(RawRevision {
        revision_id: entry.revid,
        parent_id: entry.parentid,
        timestamp,
        user: entry.user,
        comment: entry.comment,
        minor: entry.minor,
        anon: entry.anon,
        user_hidden: entry.userhidden,
    })
}

/// Maximum characters shown when previewing error response bodies.
const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

fn body_preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect()
}
