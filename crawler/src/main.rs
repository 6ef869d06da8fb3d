mod extract;
mod robots;

use anyhow::{bail, Result};
use clap::Parser;
use extract::{extract_documents, Selectors};
use pubsearch_core::store::save_documents;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio::time::sleep;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Crawl a paginated publication listing into the paper store")]
struct Cli {
    /// First page of the publication listing
    #[arg(long)]
    base_url: String,
    /// Number of listing pages; page 0 is the base URL, later pages add ?page=N
    #[arg(long, default_value_t = 5)]
    pages: usize,
    /// Output CSV file path
    #[arg(long, default_value = "./data/papers.csv")]
    output: String,
    /// Politeness delay before each request, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent string to use for robots.txt and crawling
    #[arg(long, default_value = "pubsearch-bot/0.1")]
    user_agent: String,
}

/// Listing page URLs in crawl order.
fn page_urls(base: &Url, pages: usize) -> Vec<Url> {
    (0..pages)
        .map(|i| {
            let mut u = base.clone();
            if i > 0 {
                u.query_pairs_mut().append_pair("page", &i.to_string());
            }
            u
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();
    let base = Url::parse(&args.base_url)?;

    let client = Client::builder()
        .user_agent(args.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    let rules = robots::fetch(&client, &base).await;
    if rules.disallows_everything() || !rules.allows_path(base.path()) {
        bail!("robots.txt disallows crawling {}", base);
    }
    let delay = Duration::from_millis(rules.crawl_delay_ms.unwrap_or(0).max(args.delay_ms));

    let selectors = Selectors::new()?;
    let urls = page_urls(&base, args.pages);
    tracing::info!(pages = urls.len(), delay_ms = delay.as_millis() as u64, output = %args.output, "crawl starting");

    let mut docs = Vec::new();
    for url in urls {
        sleep(delay).await;
        let resp = match client.get(url.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(%url, error = %e, "request failed, skipping");
                continue;
            }
        };
        if !resp.status().is_success() {
            tracing::warn!(%url, status = %resp.status(), "request failed, skipping");
            continue;
        }
        let body = resp.text().await?;
        let found = extract_documents(&body, &selectors);
        tracing::info!(%url, papers = found.len(), "page extracted");
        docs.extend(found);
    }

    save_documents(&args.output, &docs)?;
    tracing::info!(papers = docs.len(), output = %args.output, "crawl done");
    Ok(())
}
