use tracing::info;

use crate::{
    handlers::{
        client::TwitterClient,
        export::save_results,
        search::{search_twitter, KeywordMatcher},
    },
    models::error::Result,
    utils::config::Config,
};

/// authenticate -> query -> filter -> write. Returns the number of saved rows.
pub async fn run(config: &Config) -> Result<usize> {
    let client = TwitterClient::connect(config)?;
    let matcher = KeywordMatcher::new(&config.keywords)?;

    let results = search_twitter(&client, &matcher, config).await;
    save_results(&results, &config.csv_path, &config.jsonl_path)?;

    info!("Done.");
    Ok(results.len())
}
