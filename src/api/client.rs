// src/api/client.rs
//! Thin HTTP client for the MediaWiki Action API.
//!
//! This module wraps reqwest for `action=query` GET requests. It owns the
//! endpoint, identification headers and per-request timeout; parsing lives
//! in [`super::parser`] and pagination in [`super::pagination`].

use super::pagination::fetch_all_pages;
use super::parser::{parse_category_members, parse_revision_page};
use super::types::{ContinuationToken, MemberListing, RevisionPage};
use crate::constants::{API_LIMIT_MAX, DEFAULT_MEMBER_PAGE_CEILING, REVISION_PROPERTIES};
use crate::error::AppError;
use crate::types::{CategoryName, PageTitle, TimeWindow};
use reqwest::{header, Client, Response};
use std::time::Duration;
use url::Url;

/// Parameters every request carries: JSON output in the modern shape.
const FORMAT_PARAMS: [(&str, &str); 3] = [
    ("action", "query"),
    ("format", "json"),
    ("formatversion", "2"),
];

/// A thin wrapper around reqwest Client for MediaWiki API requests.
#[derive(Clone)]
pub struct MediaWikiHttpClient {
    client: Client,
    endpoint: Url,
    member_page_ceiling: u32,
}

impl MediaWikiHttpClient {
    /// Creates a client for `endpoint` (the full `api.php` URL).
    ///
    /// `timeout` bounds every request end to end.
    pub fn new(endpoint: Url, user_agent: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(user_agent)?)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            member_page_ceiling: DEFAULT_MEMBER_PAGE_CEILING,
        })
    }

    /// Limits how many pages of one category's members are read.
    pub fn with_member_page_ceiling(mut self, pages: u32) -> Self {
        self.member_page_ceiling = pages.max(1);
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn create_headers(user_agent: &str) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(user_agent).map_err(|e| {
                AppError::InvalidConfiguration(format!("Invalid User-Agent header: {}", e))
            })?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET `action=query` request with the given parameters.
    ///
    /// The JSON format parameters are always added; callers pass only what
    /// is specific to their query.
    pub async fn get(&self, params: &[(String, String)]) -> Result<Response, AppError> {
        let request = self
            .client
            .get(self.endpoint.clone())
            .query(&FORMAT_PARAMS)
            .query(params);

        log::debug!("GET {} {:?}", self.endpoint, params);
        let response = request.send().await?;
        log::debug!("-> {} ({})", response.status(), response.url());

        Ok(response)
    }
}

fn category_member_params(
    category: &CategoryName,
    token: Option<&ContinuationToken>,
) -> Vec<(String, String)> {
    let mut params = vec![
        ("list".to_string(), "categorymembers".to_string()),
        ("cmtitle".to_string(), category.as_str().to_string()),
        ("cmprop".to_string(), "ids|title".to_string()),
        ("cmlimit".to_string(), API_LIMIT_MAX.to_string()),
    ];
    if let Some(token) = token {
        token.merge_into(&mut params);
    }
    params
}

fn revision_params(
    title: &PageTitle,
    window: &TimeWindow,
    token: Option<&ContinuationToken>,
) -> Vec<(String, String)> {
    let (rvstart, rvend) = window.api_bounds();
    let mut params = vec![
        ("prop".to_string(), "revisions".to_string()),
        ("titles".to_string(), title.as_str().to_string()),
        ("rvprop".to_string(), REVISION_PROPERTIES.to_string()),
        ("rvlimit".to_string(), API_LIMIT_MAX.to_string()),
        ("rvdir".to_string(), "older".to_string()),
        ("rvstart".to_string(), rvstart),
        ("rvend".to_string(), rvend),
    ];
    if let Some(token) = token {
        token.merge_into(&mut params);
    }
    params
}

#[async_trait::async_trait]
impl super::WikiRepository for MediaWikiHttpClient {
    async fn category_members(&self, category: &CategoryName) -> Result<MemberListing, AppError> {
        let client = self.clone();
        let pagination_result = fetch_all_pages(
            |token| {
                let client = client.clone();
                let params = category_member_params(category, token.as_ref());
                async move {
                    let response = client.get(&params).await?;
                    let result = extract_response_text(response).await?;
                    parse_category_members(result)
                }
            },
            self.member_page_ceiling,
        )
        .await?;

        if pagination_result.truncated {
            log::info!(
                "Listing of {} stopped after {} pages; continuing with {} members",
                category,
                pagination_result.pages_fetched,
                pagination_result.items.len()
            );
        }

        Ok(MemberListing {
            members: pagination_result.items,
            truncated: pagination_result.truncated,
        })
    }

    async fn revision_page(
        &self,
        title: &PageTitle,
        window: &TimeWindow,
        token: Option<&ContinuationToken>,
    ) -> Result<RevisionPage, AppError> {
        let params = revision_params(title, window, token);
        let response = self.get(&params).await?;
        let result = extract_response_text(response).await?;
        parse_revision_page(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
///
/// The status is carried along rather than checked here; the parser decides
/// whether a non-2xx body still holds an API error document.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
