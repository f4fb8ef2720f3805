use std::{path::PathBuf, time::Duration};

use crate::{
    cli::Cli,
    models::error::{Error, Result},
};

pub const DEFAULT_API_URL: &str = "https://api.twitter.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub bearer_token: String,
    pub keywords: Vec<String>,
    pub max_results: u32,
    pub max_pages: u32,
    pub csv_path: PathBuf,
    pub jsonl_path: PathBuf,
    pub api_url: String,
    pub timeout: Duration,
    pub wait_on_rate_limit: bool,
}

impl Config {
    /// Reads `TWITTER_BEARER_TOKEN` and `TWITTER_API_URL`; call after `dotenv()`.
    pub fn init(cli: &Cli) -> Result<Self> {
        Config::from_parts(
            cli,
            std::env::var("TWITTER_BEARER_TOKEN").ok(),
            std::env::var("TWITTER_API_URL").ok(),
        )
    }

    pub fn from_parts(
        cli: &Cli,
        bearer_token: Option<String>,
        env_api_url: Option<String>,
    ) -> Result<Self> {
        let bearer_token = bearer_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingToken)?;

        if !(10..=100).contains(&cli.max_results) {
            return Err(Error::Config(format!(
                "max_results must be between 10 and 100, got {}",
                cli.max_results
            )));
        }
        if cli.pages == 0 {
            return Err(Error::Config("pages must be at least 1".to_string()));
        }
        if cli.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }

        let keywords = cli.keywords_or_default();
        if keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::Config("keywords must not be blank".to_string()));
        }

        let api_url = cli
            .api_url
            .clone()
            .or(env_api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            bearer_token,
            keywords,
            max_results: cli.max_results,
            max_pages: cli.pages,
            csv_path: cli.csv.clone(),
            jsonl_path: cli.jsonl.clone(),
            api_url,
            timeout: Duration::from_secs(cli.timeout_secs),
            wait_on_rate_limit: !cli.no_wait_on_rate_limit,
        })
    }
}
