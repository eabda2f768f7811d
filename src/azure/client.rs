//! Azure Resource Manager REST client.

use super::error::{ArmError, ArmResult};
use super::token::TokenSource;
use crate::config;
use async_trait::async_trait;
use colored::Colorize;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Operations the modules need from ARM.
///
/// Paths are ARM ids such as `/subscriptions/{id}/resourcegroups/{rg}`.
#[async_trait]
pub trait ArmApi: Send + Sync {
    /// GET a resource. A 404 is `Ok(None)`.
    async fn get(&self, path: &str, api_version: &str) -> ArmResult<Option<Value>>;

    /// PUT (create or update) a resource and return the stored object.
    async fn put(&self, path: &str, api_version: &str, body: &Value) -> ArmResult<Value>;

    /// DELETE a resource. Deleting something already gone is not an error.
    async fn delete(&self, path: &str, api_version: &str) -> ArmResult<()>;

    /// GET a collection, following `nextLink` until exhausted.
    async fn list(&self, path: &str, api_version: &str) -> ArmResult<Vec<Value>>;
}

/// One page of an ARM collection.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub value: Vec<Value>,
    pub next_link: Option<String>,
}

/// reqwest backed [`ArmApi`].
#[derive(Debug, Clone)]
pub struct ArmClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl ArmClient {
    pub fn new(endpoint: &str, token: String) -> ArmResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config::HTTP_TIMEOUT_SEC))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Authenticate with `source` and build a client for `endpoint`.
    pub async fn connect(endpoint: &str, source: TokenSource) -> ArmResult<Self> {
        let token = source.token(endpoint).await?;
        log::debug!("Got ARM token via {source:?} for {endpoint}");
        Self::new(endpoint, token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ArmResult<Response> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await?;
        log::debug!(
            "ARM {status}: {body}",
            status = status.as_str().red(),
            body = text
        );
        Err(ArmError::from_response(status.as_u16(), &text))
    }

    async fn get_page(&self, url: &str, api_version: Option<&str>) -> ArmResult<Page> {
        let mut request = self.client.get(url);
        if let Some(api_version) = api_version {
            request = request.query(&[("api-version", api_version)]);
        }
        let response = self.send(request).await?;
        decode(&response.text().await?)
    }
}

#[async_trait]
impl ArmApi for ArmClient {
    async fn get(&self, path: &str, api_version: &str) -> ArmResult<Option<Value>> {
        log::debug!("GET {}", path.on_blue());
        let request = self
            .client
            .get(self.url(path))
            .query(&[("api-version", api_version)]);
        match self.send(request).await {
            Ok(response) => Ok(Some(decode(&response.text().await?)?)),
            Err(e) if e.is_not_found() => {
                log::debug!("GET {path} -> not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn put(&self, path: &str, api_version: &str, body: &Value) -> ArmResult<Value> {
        log::debug!("PUT {}", path.on_blue());
        let request = self
            .client
            .put(self.url(path))
            .query(&[("api-version", api_version)])
            .json(body);
        let response = self.send(request).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(body.clone());
        }
        decode(&text)
    }

    async fn delete(&self, path: &str, api_version: &str) -> ArmResult<()> {
        log::debug!("DELETE {}", path.on_blue());
        let request = self
            .client
            .delete(self.url(path))
            .query(&[("api-version", api_version)]);
        match self.send(request).await {
            Ok(response) => {
                if response.status() == StatusCode::ACCEPTED {
                    log::info!("DELETE {path} accepted, completing asynchronously");
                }
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn list(&self, path: &str, api_version: &str) -> ArmResult<Vec<Value>> {
        log::debug!("LIST {}", path.on_blue());
        let mut items = Vec::new();
        // nextLink already carries api-version and the skip token.
        let mut page = self.get_page(&self.url(path), Some(api_version)).await?;
        let mut seen_links: Vec<String> = Vec::new();
        loop {
            items.append(&mut page.value);
            let Some(next) = page.next_link.take().filter(|l| !l.is_empty()) else {
                break;
            };
            check_next_link(&seen_links, &next)?;
            seen_links.push(next.clone());
            page = self.get_page(&next, None).await?;
        }
        log::info!("LIST {path} -> {} items in {} pages", items.len(), seen_links.len() + 1);
        Ok(items)
    }
}

/// Reject a `nextLink` that was already followed or the page budget is spent.
pub fn check_next_link(seen: &[String], next: &str) -> ArmResult<()> {
    if seen.iter().any(|l| l == next) {
        return Err(ArmError::Pagination(format!(
            "nextLink not unique - possible infinite loop: {next}"
        )));
    }
    if seen.len() + 1 >= config::MAX_LIST_PAGES {
        return Err(ArmError::Pagination(format!(
            "more than {} pages returned",
            config::MAX_LIST_PAGES
        )));
    }
    Ok(())
}

/// Decode a JSON response, reporting the failing path on mismatch.
pub fn decode<T: DeserializeOwned>(text: &str) -> ArmResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("RESPONSE START:\n\n{text}\n\nRESPONSE END\n");
        ArmError::InvalidResponse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        }
    })
}

/// Convert an already parsed JSON value, reporting the failing path on mismatch.
pub fn from_value<T: DeserializeOwned>(value: Value) -> ArmResult<T> {
    serde_path_to_error::deserialize(value).map_err(|e| ArmError::InvalidResponse {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}
