//! Live headline fetch over two chained news APIs (GNews first, NewsData
//! as the fallback). Each source is best-effort: a failure contributes
//! zero headlines and never aborts the overall fetch.

use serde::Deserialize;
use std::time::Duration;
use url::Url;

const GNEWS_ENDPOINT: &str = "https://gnews.io/api/v4/search";
const NEWSDATA_ENDPOINT: &str = "https://newsdata.io/api/1/news";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Headlines this short are usually tickers or truncated noise,
/// they don't carry enough signal to classify.
const MIN_HEADLINE_CHARS: usize = 30;

/// API keys for the upstream news sources, read once at startup.
pub struct ApiCredentials {
    pub gnews_api_key: String,
    pub newsdata_api_key: String,
}

/// Failure of a single source's attempt. Always absorbed by
/// [`NewsSources::fetch_live`], only ever surfaced in logs.
#[derive(Debug, thiserror::Error)]
pub enum SourceFetchError {
    #[error("request could not be completed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("source responded with {0}")]
    Status(reqwest::StatusCode),

    #[error("response body had an unexpected shape: {0}")]
    Malformed(#[source] reqwest::Error),
}

#[derive(Debug, Copy, Clone)]
enum Source {
    GNews,
    NewsData,
}

impl Source {
    fn name(self) -> &'static str {
        match self {
            Source::GNews => "GNews",
            Source::NewsData => "NewsData",
        }
    }
}

#[derive(Deserialize)]
struct GNewsResponse {
    #[serde(default)]
    articles: Vec<FetchedArticle>,
}

#[derive(Deserialize)]
struct NewsDataResponse {
    #[serde(default)]
    results: Vec<FetchedArticle>,
}

#[derive(Deserialize)]
struct FetchedArticle {
    #[serde(default)]
    title: Option<String>,
}

/// Ordered chain of upstream news APIs sharing one HTTP client.
pub struct NewsSources {
    client: reqwest::Client,
    credentials: ApiCredentials,
    gnews_endpoint: Url,
    newsdata_endpoint: Url,
}

impl NewsSources {
    pub fn new(credentials: ApiCredentials) -> Result<NewsSources, reqwest::Error> {
        // Default endpoints are infallible to parse
        let gnews_endpoint = Url::parse(GNEWS_ENDPOINT).unwrap();
        let newsdata_endpoint = Url::parse(NEWSDATA_ENDPOINT).unwrap();
        Self::with_endpoints(credentials, gnews_endpoint, newsdata_endpoint)
    }

    /// Same as [`new`](NewsSources::new), but with the upstream endpoints
    /// overridden (tests point these at a local mock server).
    pub fn with_endpoints(
        credentials: ApiCredentials,
        gnews_endpoint: Url,
        newsdata_endpoint: Url,
    ) -> Result<NewsSources, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(NewsSources {
            client,
            credentials,
            gnews_endpoint,
            newsdata_endpoint,
        })
    }

    /// Accumulates at most `limit` qualifying headlines about `topic`.
    ///
    /// Sources are tried in order and a later source is queried only if the
    /// earlier ones left the quota unfilled, so arrival order is preserved
    /// with the primary source's headlines first. A source failure is logged
    /// and skipped, which makes an empty result a valid, non-error outcome.
    pub async fn fetch_live(&self, topic: &str, limit: usize) -> Vec<String> {
        let _t = stdx::debug_time_it("Fetching live headlines");

        let mut headlines: Vec<String> = Vec::new();
        for &source in &[Source::GNews, Source::NewsData] {
            if headlines.len() >= limit {
                break;
            }
            match self.fetch_titles(source, topic).await {
                Ok(titles) => {
                    let quota = limit - headlines.len();
                    headlines.extend(
                        titles
                            .into_iter()
                            .filter(|title| title.chars().count() > MIN_HEADLINE_CHARS)
                            .take(quota),
                    );
                }
                Err(err) => {
                    log::warn!("{} contributed no headlines: {}", source.name(), err);
                }
            }
        }

        log::debug!("Accumulated {} of {} requested headlines", headlines.len(), limit);

        headlines
    }

    async fn fetch_titles(
        &self,
        source: Source,
        topic: &str,
    ) -> Result<Vec<String>, SourceFetchError> {
        let request = match source {
            Source::GNews => self.client.get(self.gnews_endpoint.clone()).query(&[
                ("q", topic),
                ("lang", "en"),
                ("country", "us"),
                ("token", self.credentials.gnews_api_key.as_str()),
            ]),
            Source::NewsData => self.client.get(self.newsdata_endpoint.clone()).query(&[
                ("apikey", self.credentials.newsdata_api_key.as_str()),
                ("q", topic),
                ("language", "en"),
                ("country", "us"),
            ]),
        };

        let response = request.send().await.map_err(SourceFetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceFetchError::Status(status));
        }

        let articles = match source {
            Source::GNews => {
                response
                    .json::<GNewsResponse>()
                    .await
                    .map_err(SourceFetchError::Malformed)?
                    .articles
            }
            Source::NewsData => {
                response
                    .json::<NewsDataResponse>()
                    .await
                    .map_err(SourceFetchError::Malformed)?
                    .results
            }
        };

        Ok(articles.into_iter().filter_map(|it| it.title).collect())
    }
}
