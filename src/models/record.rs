use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::tweet::Tweet;

pub const SOURCE_TWITTER: &str = "twitter";

/// One output row. Field order is the column order of the CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub author_id: String,
    pub created_at: String,
    pub text: String,
    pub keyword: String,
    pub source: String,
}

impl MatchRecord {
    pub fn from_tweet(tweet: &Tweet, keyword: &str) -> Self {
        MatchRecord {
            id: tweet.id.clone(),
            author_id: tweet.author_id.clone().unwrap_or_default(),
            created_at: tweet
                .created_at
                .as_deref()
                .map(format_created_at)
                .unwrap_or_default(),
            text: tweet.text.clone(),
            keyword: keyword.to_string(),
            source: SOURCE_TWITTER.to_string(),
        }
    }
}

/// `2024-05-01T12:30:00.000Z` -> `2024-05-01 12:30:00+00:00`.
/// Sub-second precision is kept as microseconds when non-zero.
pub fn format_created_at(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => {
            let utc = parsed.with_timezone(&Utc);
            if utc.nanosecond() == 0 {
                utc.format("%Y-%m-%d %H:%M:%S+00:00").to_string()
            } else {
                utc.format("%Y-%m-%d %H:%M:%S%.6f+00:00").to_string()
            }
        }
        Err(_) => String::new(),
    }
}
