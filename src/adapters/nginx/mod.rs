use async_trait::async_trait;

use crate::error::{AgentError, ParseError, ParseResult};
use crate::ports::StatusSource;

/// Extract the handled-requests counter from an nginx stub_status page.
///
/// ```text
/// Active connections: 291
/// server accepts handled requests
///  16630948 16630948 31070465
/// Reading: 6 Writing: 179 Waiting: 106
/// ```
pub fn parse_stub_status(content: &str) -> ParseResult<u64> {
    let counters = content
        .lines()
        .nth(2)
        .ok_or_else(|| ParseError::MissingField("counters line".to_string()))?;

    let requests = counters
        .split_whitespace()
        .nth(2)
        .ok_or_else(|| ParseError::MissingField("requests".to_string()))?;

    requests
        .parse()
        .map_err(|e| ParseError::Parse(format!("requests: {}", e)))
}

/// Status source scraping nginx's stub_status module over HTTP
pub struct StubStatusSource {
    client: reqwest::Client,
}

impl StubStatusSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusSource for StubStatusSource {
    async fn request_count(&self, endpoint: &str) -> Result<u64, AgentError> {
        let body = self
            .client
            .get(endpoint)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_stub_status(&body)?)
    }
}
