mod v1;
mod v2;

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::config::CircleConfig;
use crate::error::{CirclogError, Result};

use super::types::Paged;

/// Query parameter carrying the pagination cursor on v2 list endpoints.
const PAGE_TOKEN_PARAM: &str = "page-token";

/// Client for both generations of the CircleCI REST API.
///
/// The modern v2 API enumerates pipelines, workflows and jobs; the legacy
/// v1.1 API exposes the step/action tree where log artifacts live. Both
/// authenticate with the API token as basic-auth username and an empty
/// password.
pub struct CircleClient {
    client: Client,
    api_v2_url: String,
    api_v1_url: String,
    slug: String,
    token: Token,
}

impl CircleClient {
    pub fn new(config: &CircleConfig, token: Token) -> Result<Self> {
        let client = Client::builder()
            .user_agent("circlog/0.3.0")
            .build()
            .map_err(|e| CirclogError::Config(format!("Failed to create HTTP client: {e}")))?;

        for base in [&config.api_v2_url, &config.api_v1_url] {
            Url::parse(base)
                .map_err(|e| CirclogError::Config(format!("Invalid base URL '{base}': {e}")))?;
        }

        let slug = config
            .slug()
            .map_err(|e| CirclogError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_v2_url: config.api_v2_url.trim_end_matches('/').to_string(),
            api_v1_url: config.api_v1_url.trim_end_matches('/').to_string(),
            slug,
            token,
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub(super) fn api_v2_url(&self) -> &str {
        &self.api_v2_url
    }

    pub(super) fn api_v1_url(&self) -> &str {
        &self.api_v1_url
    }

    /// Build an authenticated GET request.
    pub(super) fn authed_get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .basic_auth(self.token.as_str(), Some(""))
    }

    /// Turn a non-success response into `CirclogError::Api`.
    pub(super) async fn api_error(response: reqwest::Response) -> CirclogError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        CirclogError::Api { status, message }
    }

    /// Fetch a cursor-paginated v2 list endpoint, keeping items accepted by
    /// `filter`.
    ///
    /// The first request carries no cursor; each subsequent request passes
    /// the `next_page_token` of the previous response. Fetching stops when
    /// the cursor comes back null or after `max_calls` requests, whichever
    /// is first; the page budget is a deliberate cost bound, so pages past
    /// it are simply never requested. Any non-success status aborts with an
    /// error and no partial result.
    ///
    /// Items are returned in page-arrival order.
    pub(super) async fn get_paged<T, F>(&self, url: &str, filter: F, max_calls: u32) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let mut matched = Vec::new();
        let mut page_token: Option<String> = None;

        for call in 0..max_calls {
            let mut request = self.authed_get(url);
            if let Some(token) = &page_token {
                request = request.query(&[(PAGE_TOKEN_PARAM, token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(Self::api_error(response).await);
            }

            let page: Paged<T> = response.json().await?;
            debug!("GET {} call {}: {} items", url, call + 1, page.items.len());

            matched.extend(page.items.into_iter().filter(|item| filter(item)));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(matched)
    }
}
