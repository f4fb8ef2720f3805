use regex::{Regex, RegexBuilder};
use tracing::{error, info, warn};

use crate::{
    handlers::client::SearchApi,
    models::{
        error::{Error, Result},
        record::MatchRecord,
        tweet::SearchParams,
    },
    utils::config::Config,
};

pub const TWEET_FIELDS: [&str; 4] = ["author_id", "created_at", "lang", "text"];
const PREVIEW_CHARS: usize = 60;

pub fn build_query(keywords: &[String]) -> String {
    keywords.join(" OR ")
}

/// Keywords compiled as case-insensitive patterns, kept in configured order.
pub struct KeywordMatcher {
    patterns: Vec<(String, Regex)>,
}

impl KeywordMatcher {
    pub fn new(keywords: &[String]) -> Result<Self> {
        let patterns = keywords
            .iter()
            .map(|keyword| {
                RegexBuilder::new(keyword)
                    .case_insensitive(true)
                    .build()
                    .map(|regex| (keyword.clone(), regex))
                    .map_err(|source| Error::Pattern {
                        keyword: keyword.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(KeywordMatcher { patterns })
    }

    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(keyword, _)| keyword.as_str())
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Fetches up to `config.max_pages` pages and keeps one record per matching
/// tweet. API failures are logged and end the search with what was gathered.
pub async fn search_twitter<C>(
    client: &C,
    matcher: &KeywordMatcher,
    config: &Config,
) -> Vec<MatchRecord>
where
    C: SearchApi + Sync,
{
    info!("Searching Twitter for: {:?}", config.keywords);

    let mut params = SearchParams {
        query: build_query(&config.keywords),
        max_results: config.max_results,
        tweet_fields: TWEET_FIELDS.iter().map(|f| f.to_string()).collect(),
        next_token: None,
    };

    let mut matches = Vec::new();
    let mut seen = 0usize;

    for page in 1..=config.max_pages {
        let response = match client.search_recent(&params).await {
            Ok(response) => response,
            Err(err) => {
                error!("Twitter API error: {}", err);
                break;
            }
        };

        if let Some(problems) = &response.errors {
            for problem in problems {
                warn!(page, "Partial error from Twitter: {}", problem.message());
            }
        }

        let tweets = response.data.as_deref().unwrap_or_default();
        if tweets.is_empty() {
            if page == 1 {
                warn!("No tweets found for these keywords.");
            }
            break;
        }

        for tweet in tweets {
            seen += 1;
            if let Some(keyword) = matcher.first_match(&tweet.text) {
                info!("Match {}: {}...", seen, preview(&tweet.text));
                matches.push(MatchRecord::from_tweet(tweet, keyword));
            }
        }

        match response.next_token() {
            Some(token) => params.next_token = Some(token.to_string()),
            None => break,
        }
    }

    matches
}
