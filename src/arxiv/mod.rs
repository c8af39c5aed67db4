mod feed;

use reqwest::Client;
use tracing::debug;

use crate::paper::Paper;

const API_BASE: &str = "https://export.arxiv.org/api/query";

#[derive(Debug, thiserror::Error)]
pub enum ArxivError {
    #[error("arXiv API error: status {0}")]
    Status(u16),

    #[error("arXiv feed parse error: {0}")]
    Parse(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Source of papers for one keyword. Implemented by `ArxivClient` for
/// production; mock implementations used in pipeline tests.
pub trait PaperFetcher {
    async fn fetch(&self, keyword: &str, max_results: u32) -> Result<Vec<Paper>, ArxivError>;
}

#[derive(Clone)]
pub struct ArxivClient {
    http: Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }
}

impl PaperFetcher for ArxivClient {
    /// Newest papers matching the keyword in title or abstract,
    /// submission date descending, as the service reports them.
    async fn fetch(&self, keyword: &str, max_results: u32) -> Result<Vec<Paper>, ArxivError> {
        let query = format!("ti:\"{keyword}\" OR abs:\"{keyword}\"");
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("search_query", query.as_str()),
                ("start", "0"),
                ("max_results", &max_results.to_string()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ])
            .header("User-Agent", crate::USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArxivError::Status(status.as_u16()));
        }

        let xml = response.text().await?;
        let papers = feed::parse_feed(&xml)?;
        debug!(keyword, count = papers.len(), "arxiv query complete");
        Ok(papers)
    }
}
