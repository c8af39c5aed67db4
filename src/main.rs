mod arxiv;
mod config;
mod deepseek;
mod enrich;
mod paper;
mod pipeline;
mod report;
mod store;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tracing::info;

use arxiv::ArxivClient;
use config::Config;
use deepseek::client::DeepSeekClient;

pub const USER_AGENT: &str = concat!("paperwatch/", env!("CARGO_PKG_VERSION"));

/// Track arXiv keywords: fetch new papers, translate and summarize them
/// with DeepSeek, and keep a JSON corpus plus Markdown digest per keyword.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "paperwatch.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("paperwatch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
    let fetcher = ArxivClient::new(http.clone());
    let chat = DeepSeekClient::from_env(http, &config.model, &config.base_url)?;

    info!(keywords = config.keywords.len(), "starting run");
    for keyword in &config.keywords {
        let added = pipeline::run_keyword(&fetcher, &chat, &config, keyword).await?;
        println!("{keyword}: {added} new papers saved");
    }
    Ok(())
}
