//! Outbound HTTP GET primitive shared by the geocoding and weather tools.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::lib::errors::FetchError;

/// One GET request with query parameters and extra headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl GetRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }
}

/// Performs a single GET and decodes the body as JSON.
///
/// Implementations must report non-success statuses and non-JSON bodies as
/// `FetchError` rather than panicking.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get_json(&self, request: GetRequest) -> Result<Value, FetchError>;
}

/// `HttpFetch` backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|source| FetchError::Client { source })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get_json(&self, request: GetRequest) -> Result<Value, FetchError> {
        let GetRequest {
            url,
            query,
            headers,
        } = request;
        debug!(target: "toolbox_mcp::http", url = %url, params = query.len(), "Sending GET");

        let mut builder = self.client.get(&url).query(&query);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        serde_json::from_str(&body).map_err(|err| FetchError::Decode {
            url,
            message: err.to_string(),
        })
    }
}
