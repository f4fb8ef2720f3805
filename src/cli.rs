use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_KEYWORDS: [&str; 3] = ["love", "news", "hate"];

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tweet_harvest",
    version,
    about = "Search recent tweets for keywords and save the matches as CSV and JSONL"
)]
pub struct Cli {
    #[arg(
        short = 'k',
        long = "keyword",
        help = "Keyword (regular expression) to search for; repeat for several"
    )]
    pub keywords: Vec<String>,
    #[arg(long, default_value_t = 50, help = "Tweets per request (10-100)")]
    pub max_results: u32,
    #[arg(long, default_value_t = 1, help = "Number of result pages to fetch")]
    pub pages: u32,
    #[arg(long, default_value = "results.csv")]
    pub csv: PathBuf,
    #[arg(long, default_value = "results.jsonl")]
    pub jsonl: PathBuf,
    #[arg(long, help = "API base URL (overrides TWITTER_API_URL)")]
    pub api_url: Option<String>,
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
    #[arg(
        long,
        default_value_t = false,
        help = "Fail instead of sleeping when the rate limit is hit"
    )]
    pub no_wait_on_rate_limit: bool,
}

impl Cli {
    pub fn keywords_or_default(&self) -> Vec<String> {
        if self.keywords.is_empty() {
            DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
        } else {
            self.keywords.clone()
        }
    }
}
