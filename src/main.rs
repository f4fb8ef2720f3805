mod cli;
mod handlers;
mod models;
mod utils;
use clap::Parser;
use cli::Cli;
use handlers::pipeline;
use tracing::{error, info};
use utils::{config::Config, logging::init_tracing};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let config = match Config::init(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };
    info!("Configuration loaded successfully");

    if let Err(err) = pipeline::run(&config).await {
        error!("{}", err);
        std::process::exit(1);
    }
}
