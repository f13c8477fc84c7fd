// src/api/pagination.rs
//! Continuation-driven pagination without BoxFuture.

use super::types::{ContinuationToken, Paginated, PaginationResult};
use crate::error::AppError;

/// Fetches pages until the API stops returning a continuation token or
/// `max_pages` pages have been read.
///
/// Items keep the order the API returned them in, page after page. When
/// the ceiling stops the loop while a token is still pending the result
/// is marked `truncated`. Any page error aborts the whole run.
pub async fn fetch_all_pages<T, F, Fut>(
    mut fetch_fn: F,
    max_pages: u32,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(Option<ContinuationToken>) -> Fut,
    Fut: std::future::Future<Output = Result<Paginated<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut token: Option<ContinuationToken> = None;
    let mut pages_fetched = 0u32;
    let mut truncated = false;

    loop {
        if pages_fetched >= max_pages {
            truncated = token.is_some();
            log::debug!("Reached maximum page limit: {}", max_pages);
            break;
        }

        let page = fetch_fn(token.take()).await?;
        all_items.extend(page.items);
        pages_fetched += 1;

        match page.next {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(PaginationResult {
        items: all_items,
        pages_fetched,
        truncated,
    })
}
