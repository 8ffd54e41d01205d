//! HTTP transport against the assistant REST API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{Transport, TransportError, TransportResult};
use crate::chat::{ChatReply, HistoryEntry, HistoryId, Page};
use crate::config::Config;
use crate::credentials::CredentialStore;

/// Standard User-Agent header for Inquiro API requests.
pub const USER_AGENT: &str = concat!("inquiro/", env!("CARGO_PKG_VERSION"));

/// Browse list response. Pagination fields vary between backend versions.
#[derive(Debug, Deserialize)]
struct HistoryListResponse {
    #[serde(default)]
    chats: Vec<HistoryEntry>,
    #[serde(default, alias = "page")]
    current_page: Option<u32>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    total: Option<u32>,
}

impl HistoryListResponse {
    fn into_page(self, requested_page: u32, page_size: u32) -> Page {
        let page_number = self.current_page.unwrap_or(requested_page).max(1);
        let total_pages = self
            .total_pages
            .or_else(|| {
                self.total
                    .filter(|_| page_size > 0)
                    .map(|total| total.div_ceil(page_size))
            })
            .unwrap_or(page_number)
            .max(1);
        Page {
            items: self.chats,
            page_number,
            total_pages,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default, alias = "chats")]
    results: Vec<HistoryEntry>,
}

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Assistant API client.
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpTransport {
    /// Creates a client for `base_url` (without trailing slash).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            credentials,
        })
    }

    /// Creates a client from the resolved configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn from_config(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let base_url = config.resolve_base_url()?;
        Self::new(base_url, config.request_timeout(), credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match self.credentials.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and maps transport/status failures.
    ///
    /// A 401 clears the stored credentials before returning.
    async fn execute(&self, builder: RequestBuilder) -> TransportResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = TransportError::http_status(status.as_u16(), &body);
        if error.is_unauthorized() {
            tracing::warn!("session expired, clearing stored credentials");
            if let Err(clear_error) = self.credentials.clear() {
                tracing::warn!(error = %format!("{clear_error:#}"), "failed to clear credentials");
            }
        }
        Err(error)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> TransportResult<T> {
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| TransportError::parse(format!("Failed to parse response: {e}")))
    }
}

impl Transport for HttpTransport {
    async fn send_chat(&self, message: &str) -> TransportResult<ChatReply> {
        let builder = self
            .request(Method::POST, "/chat")
            .json(&ChatRequest { message });
        let response = self.execute(builder).await?;
        Self::decode(response).await
    }

    async fn list_history(&self, page: u32, page_size: u32) -> TransportResult<Page> {
        let builder = self
            .request(Method::GET, "/chat-history")
            .query(&[("page", page), ("per_page", page_size)]);
        let response = self.execute(builder).await?;
        let list: HistoryListResponse = Self::decode(response).await?;
        Ok(list.into_page(page, page_size))
    }

    async fn search_history(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> TransportResult<Vec<HistoryEntry>> {
        let page = page.to_string();
        let per_page = page_size.to_string();
        let builder = self.request(Method::GET, "/chat-history/search").query(&[
            ("q", query),
            ("page", page.as_str()),
            ("per_page", per_page.as_str()),
        ]);
        let response = self.execute(builder).await?;
        let search: SearchResponse = Self::decode(response).await?;
        Ok(search.results)
    }

    async fn delete_history(&self, id: &HistoryId) -> TransportResult<()> {
        let path = format!("/chat-history/{id}");
        self.execute(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn clear_history(&self) -> TransportResult<()> {
        self.execute(self.request(Method::DELETE, "/chat-history/clear"))
            .await?;
        Ok(())
    }
}
