//! Pure TED.EU REST API client.
//!
//! A minimal client for the TED (Tenders Electronic Daily) notices search
//! API. Issues one POST per query and hands back the raw notice objects.
//!
//! # Example
//!
//! ```rust,ignore
//! use ted_client::TedClient;
//!
//! let client = TedClient::new()?;
//!
//! let notices = client
//!     .search("notice-title=\"software\" AND buyer-country=\"DE\"", 100)
//!     .await?;
//! println!("got {} notices", notices.len());
//! ```

pub mod error;
pub mod types;

pub use error::{Result, TedError};
pub use types::{SearchRequest, SearchResponse};

use std::time::Duration;

use serde_json::Value;

const BASE_URL: &str = "https://api.ted.europa.eu/v3/notices/search";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fields requested for every notice in a search response.
pub const NOTICE_FIELDS: &[&str] = &[
    "notice-identifier",
    "notice-title",
    "buyer-name",
    "buyer-country",
    "publication-date",
    "publication-number",
    "links",
    "classification-cpv",
    "deadline-receipt",
    "value-eur",
    "notice-type",
    "contract-award",
];

pub struct TedClient {
    client: reqwest::Client,
    base_url: String,
}

impl TedClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("ted-tender-search/0.1")
            .build()?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Execute one search query. Returns the raw notice objects; a response
    /// without a `notices` field is an empty result, not an error.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Value>> {
        let request = SearchRequest {
            query: query.to_string(),
            limit,
            fields: NOTICE_FIELDS.iter().map(|f| f.to_string()).collect(),
        };

        let resp = self
            .client
            .post(&self.base_url)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(TedError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: SearchResponse = resp.json().await?;
        tracing::debug!(
            count = api_resp.notices.len(),
            total = ?api_resp.total_notice_count,
            "TED search query returned"
        );
        Ok(api_resp.notices)
    }
}
