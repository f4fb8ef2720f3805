//! Bearer-authenticated client for the v2 recent search endpoint.

use async_trait::async_trait;
use http::StatusCode;
use reqwest::{Client, Response};
use tokio::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    models::{
        error::{Error, Result},
        tweet::{ApiProblem, SearchParams, SearchResponse},
    },
    utils::{
        config::Config,
        rate_limiter::{RateLimitInfo, RateLimiter},
    },
};

pub const SEARCH_RECENT_PATH: &str = "/2/tweets/search/recent";

/// Used when a 429 carries no reset header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
const MAX_RATE_LIMIT_WAITS: u32 = 3;
const MIN_REQUEST_SPACING_MS: u64 = 1_000;

#[async_trait]
pub trait SearchApi {
    async fn search_recent(&self, params: &SearchParams) -> Result<SearchResponse>;
}

pub struct TwitterClient {
    http_client: Client,
    base_url: String,
    bearer_token: String,
    wait_on_rate_limit: bool,
    limiter: RateLimiter,
}

impl TwitterClient {
    pub fn connect(config: &Config) -> Result<Self> {
        if config.bearer_token.trim().is_empty() {
            return Err(Error::MissingToken);
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("tweet_harvest/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(TwitterClient {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
            wait_on_rate_limit: config.wait_on_rate_limit,
            limiter: RateLimiter::new(MIN_REQUEST_SPACING_MS),
        })
    }

    async fn handle_response(&self, response: Response) -> Result<SearchResponse> {
        let status = response.status();
        let rate_limit = RateLimitInfo::from_headers(response.headers());
        if rate_limit.is_exhausted() {
            debug!(reset = ?rate_limit.reset, "Rate limit exhausted");
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = match rate_limit.reset {
                Some(_) => rate_limit
                    .time_until_reset()
                    .map(|d| d.as_secs())
                    .unwrap_or(0),
                None => DEFAULT_RETRY_AFTER_SECS,
            };
            return Err(Error::RateLimited { retry_after });
        }

        let bytes = response.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice(&bytes).map_err(Error::from);
        }

        let message = serde_json::from_slice::<ApiProblem>(&bytes)
            .map(|problem| problem.message())
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SearchApi for TwitterClient {
    #[instrument(skip(self, params), fields(query = %params.query))]
    async fn search_recent(&self, params: &SearchParams) -> Result<SearchResponse> {
        let url = format!("{}{}", self.base_url, SEARCH_RECENT_PATH);
        let pairs = params.to_query_pairs();
        let mut waits = 0;

        loop {
            self.limiter.acquire().await;
            debug!(waits, "Requesting recent search");

            let response = self
                .http_client
                .get(&url)
                .bearer_auth(&self.bearer_token)
                .query(&pairs)
                .send()
                .await?;

            match self.handle_response(response).await {
                Err(err @ Error::RateLimited { .. })
                    if self.wait_on_rate_limit && waits < MAX_RATE_LIMIT_WAITS =>
                {
                    waits += 1;
                    let wait = err.retry_after().unwrap_or(Duration::ZERO);
                    warn!(attempt = waits, wait_secs = wait.as_secs(), "Rate limited by Twitter");
                    self.limiter.wait_for_reset(wait).await;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn test_config(mock_server: &MockServer, extra: &[&str]) -> Config {
        let cli =
            Cli::try_parse_from(std::iter::once("tweet_harvest").chain(extra.iter().copied()))
                .unwrap();
        Config::from_parts(&cli, Some("test_bearer_token".into()), Some(mock_server.uri()))
            .unwrap()
    }

    fn params(query: &str) -> SearchParams {
        SearchParams {
            query: query.into(),
            max_results: 10,
            tweet_fields: vec!["author_id".into(), "created_at".into()],
            next_token: None,
        }
    }

    #[tokio::test]
    async fn test_search_recent_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_RECENT_PATH))
            .and(header("Authorization", "Bearer test_bearer_token"))
            .and(query_param("query", "love OR news"))
            .and(query_param("max_results", "10"))
            .and(query_param("tweet.fields", "author_id,created_at"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"id": "1", "text": "Love wins", "author_id": "7"},
                    {"id": "2", "text": "Breaking news"}
                ],
                "meta": {"result_count": 2, "newest_id": "2", "oldest_id": "1"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = TwitterClient::connect(&test_config(&mock_server, &[])).unwrap();
        let response = client.search_recent(&params("love OR news")).await.unwrap();

        let tweets = response.data.unwrap();
        assert_eq!(tweets.len(), 2);
        assert_eq!(tweets[0].author_id.as_deref(), Some("7"));
        assert_eq!(tweets[1].text, "Breaking news");
    }

    #[tokio::test]
    async fn test_error_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_RECENT_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "title": "Unauthorized",
                "detail": "Unauthorized",
                "type": "about:blank",
                "status": 401
            })))
            .mount(&mock_server)
            .await;

        let client = TwitterClient::connect(&test_config(&mock_server, &[])).unwrap();
        let err = client.search_recent(&params("love")).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 401, ref message } if message == "Unauthorized"));
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_RECENT_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&mock_server)
            .await;

        let client = TwitterClient::connect(&test_config(&mock_server, &[])).unwrap();
        let err = client.search_recent(&params("love")).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 503, ref message } if message == "upstream down"));
    }

    #[tokio::test]
    async fn test_rate_limited_without_waiting() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_RECENT_PATH))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("x-rate-limit-reset", "1700000000")
                    .set_body_json(serde_json::json!({"title": "Too Many Requests"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = test_config(&mock_server, &["--no-wait-on-rate-limit"]);
        let client = TwitterClient::connect(&config).unwrap();
        let err = client.search_recent(&params("love")).await.unwrap_err();
        assert!(matches!(err, Error::RateLimited { retry_after: 0 }));
    }

    #[tokio::test]
    async fn test_rate_limited_then_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_RECENT_PATH))
            .respond_with(
                ResponseTemplate::new(429).insert_header("x-rate-limit-reset", "1700000000"),
            )
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(SEARCH_RECENT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": "9", "text": "love after the wait"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = TwitterClient::connect(&test_config(&mock_server, &[])).unwrap();
        let response = client.search_recent(&params("love")).await.unwrap();
        assert_eq!(response.data.unwrap()[0].id, "9");
    }

    #[tokio::test]
    async fn test_rate_limit_waits_are_capped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_RECENT_PATH))
            .respond_with(
                ResponseTemplate::new(429).insert_header("x-rate-limit-reset", "1700000000"),
            )
            .expect(u64::from(MAX_RATE_LIMIT_WAITS) + 1)
            .mount(&mock_server)
            .await;

        let client = TwitterClient::connect(&test_config(&mock_server, &[])).unwrap();
        let err = client.search_recent(&params("love")).await.unwrap_err();
        assert!(matches!(err, Error::RateLimited { retry_after: 0 }));

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 4);
    }

    #[test]
    fn connect_requires_token() {
        let cli = Cli::try_parse_from(["tweet_harvest"]).unwrap();
        let mut config = Config::from_parts(&cli, Some("t".into()), None).unwrap();
        config.bearer_token = String::new();
        assert!(matches!(
            TwitterClient::connect(&config),
            Err(Error::MissingToken)
        ));
    }
}
