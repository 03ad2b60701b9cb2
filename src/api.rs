// ABOUTME: Blocking HTTP client for the Notion API
// ABOUTME: Handles throttling, auth headers, cursor parameters, and fail-fast errors

use crate::model::{Block, Page, Paginated};
use crate::{Error, Result};
use rand::Rng;
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.notion.com";
pub const NOTION_VERSION: &str = "2022-06-28";
pub const PAGE_SIZE: u32 = 100;

/// Paginated access to a hierarchical document store.
///
/// The exporter only depends on this trait; [`ApiClient`] is the HTTP
/// implementation. Every listing returns one page of results plus a
/// continuation cursor.
pub trait DocumentSource {
    fn query_pages(&self, query: &PageQuery, cursor: Option<&str>) -> Result<Paginated<Page>>;

    fn list_children(&self, block_id: &str, cursor: Option<&str>) -> Result<Paginated<Block>>;

    fn retrieve_page(&self, page_id: &str) -> Result<Page>;
}

/// Database query: which collection, and an optional title filter.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub database_id: String,
    pub title_filter: Option<TitleFilter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleFilter {
    pub property: String,
    pub contains: String,
}

impl PageQuery {
    pub fn to_body(&self, cursor: Option<&str>) -> Value {
        let mut body = json!({ "page_size": PAGE_SIZE });
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        if let Some(filter) = &self.title_filter {
            body["filter"] = json!({
                "property": filter.property,
                "title": { "contains": filter.contains },
            });
        }
        body
    }
}

fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.len() <= max_chars {
        return s.to_string();
    }

    // Find a valid UTF-8 boundary at or before max_chars
    let mut boundary = max_chars;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }

    if boundary == 0 {
        return String::new();
    }

    format!("{}...", &s[..boundary])
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    throttle_min: u64,
    throttle_max: u64,
}

impl ApiClient {
    pub fn new(token: String, base_url: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(ApiClient {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_API_BASE.into()),
            token,
            throttle_min: 100,
            throttle_max: 300,
        })
    }

    pub fn with_throttle(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.throttle_min = min_ms;
        self.throttle_max = max_ms;
        self
    }

    pub fn disable_throttle(mut self) -> Self {
        self.throttle_min = 0;
        self.throttle_max = 0;
        self
    }

    fn throttle(&self) {
        if self.throttle_max > 0 {
            let sleep_ms = rand::thread_rng().gen_range(self.throttle_min..=self.throttle_max);
            std::thread::sleep(Duration::from_millis(sleep_ms));
        }
    }

    fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T> {
        tracing::debug!(endpoint, "notion request");

        let response = request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", NOTION_VERSION)
            .header("Accept", "application/json")
            .header("User-Agent", "diary-sync/0.1 (Rust)")
            .send()?;

        self.throttle();

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            let preview = truncate_str(&message, 100);
            return Err(Error::Api {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                message: preview,
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                endpoint,
                error = %e,
                body = %truncate_str(&body, 500),
                "failed to parse response"
            );
            Error::Parse(e)
        })
    }
}

impl DocumentSource for ApiClient {
    fn query_pages(&self, query: &PageQuery, cursor: Option<&str>) -> Result<Paginated<Page>> {
        let endpoint = format!("/v1/databases/{}/query", query.database_id);
        let request = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .json(&query.to_body(cursor));
        self.send(request, &endpoint)
    }

    fn list_children(&self, block_id: &str, cursor: Option<&str>) -> Result<Paginated<Block>> {
        let endpoint = format!("/v1/blocks/{}/children", block_id);
        let mut params = vec![("page_size", PAGE_SIZE.to_string())];
        if let Some(cursor) = cursor {
            params.push(("start_cursor", cursor.to_string()));
        }
        let request = self
            .client
            .get(format!("{}{}", self.base_url, endpoint))
            .query(&params);
        self.send(request, &endpoint)
    }

    fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        let endpoint = format!("/v1/pages/{}", page_id);
        let request = self.client.get(format!("{}{}", self.base_url, endpoint));
        self.send(request, &endpoint)
    }
}
