//! tarkov.dev GraphQL transport.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lootscan_core::error::{LootscanError, Result};
use lootscan_core::types::ItemPrice;

use crate::PriceTransport;

const ITEMS_BY_NAME_QUERY: &str = r#"
query itemsByName($name: String!) {
  itemsByName(name: $name) {
    name
    shortName
    avg24hPrice
    basePrice
    wikiLink
  }
}
"#;

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Variables<'a>,
}

#[derive(Serialize)]
struct Variables<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<ItemsData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct ItemsData {
    #[serde(rename = "itemsByName", default)]
    items_by_name: Option<Vec<ItemPrice>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// Decode a GraphQL response body into item records.
///
/// A body with `errors` and no `data` is a failure. Missing `itemsByName`
/// decodes to an empty list.
pub fn parse_items_response(body: &str) -> Result<Vec<ItemPrice>> {
    let response: GraphQlResponse = serde_json::from_str(body)?;
    match response.data {
        Some(data) => Ok(data.items_by_name.unwrap_or_default()),
        None => match response.errors {
            Some(errors) if !errors.is_empty() => {
                let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
                Err(LootscanError::Api(messages.join("; ")))
            }
            _ => Ok(Vec::new()),
        },
    }
}

/// Posts `itemsByName` queries to a GraphQL endpoint.
pub struct TarkovDevTransport {
    client: Client,
    url: String,
}

impl TarkovDevTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lootscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LootscanError::Api(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PriceTransport for TarkovDevTransport {
    async fn fetch_items(&self, name: &str) -> Result<Vec<ItemPrice>> {
        let body = GraphQlRequest {
            query: ITEMS_BY_NAME_QUERY,
            variables: Variables { name },
        };

        debug!(url = %self.url, name, "Sending itemsByName query");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LootscanError::Api(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(LootscanError::Api(format!(
                "HTTP {}: {}",
                status,
                error_body.trim()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| LootscanError::Api(format!("Failed to read response body: {}", e)))?;
        parse_items_response(&text)
    }
}
