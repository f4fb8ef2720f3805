use serde::{Deserialize, Serialize};

/// Tweet object as returned by the v2 search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub author_id: Option<String>,
    /// ISO 8601, e.g. `2024-05-01T12:30:00.000Z`
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Option<Vec<Tweet>>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
    /// Partial failures reported alongside a 200
    #[serde(default)]
    pub errors: Option<Vec<ApiProblem>>,
}

impl SearchResponse {
    pub fn next_token(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.next_token.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub result_count: Option<u32>,
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub newest_id: Option<String>,
    #[serde(default)]
    pub oldest_id: Option<String>,
}

/// Problem-details body the API sends with non-2xx replies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default, rename = "type")]
    pub problem_type: Option<String>,
}

impl ApiProblem {
    pub fn message(&self) -> String {
        self.detail
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: String,
    /// 10..=100 per request
    pub max_results: u32,
    pub tweet_fields: Vec<String>,
    pub next_token: Option<String>,
}

impl SearchParams {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("query".to_string(), self.query.clone()),
            ("max_results".to_string(), self.max_results.to_string()),
        ];
        if !self.tweet_fields.is_empty() {
            pairs.push(("tweet.fields".to_string(), self.tweet_fields.join(",")));
        }
        if let Some(ref token) = self.next_token {
            pairs.push(("next_token".to_string(), token.clone()));
        }
        pairs
    }
}
