use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, warn};

use crate::app::ports::MarkupFetcherPort;
use crate::common::error::Result;
use crate::config::HttpConfig;

/// Fetches a page over HTTP and hands back normalized markup.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MarkupFetcherPort for ReqwestFetcher {
    async fn fetch_and_normalize(&self, url: &str) -> String {
        debug!("HTTP GET request to: {}", url);
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("fetch of {} failed: {}", url, err);
                return String::new();
            }
        };

        if !response.status().is_success() {
            warn!("fetch of {} rejected with status {}", url, response.status());
            return String::new();
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!("reading body of {} failed: {}", url, err);
                return String::new();
            }
        };

        normalize(&body)
    }
}

/// Reparse and reserialize so downstream queries always see tag-balanced
/// markup, whatever the site actually served.
fn normalize(body: &str) -> String {
    if body.trim().is_empty() {
        return String::new();
    }
    Html::parse_document(body).root_element().html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_balances_unclosed_tags() {
        let normalized = normalize("<div class='comic'><p>hello");
        assert!(normalized.contains("</p>"));
        assert!(normalized.contains("</div>"));
    }

    #[test]
    fn normalize_maps_blank_input_to_empty() {
        assert_eq!(normalize("   \n"), "");
        assert_eq!(normalize(""), "");
    }
}
