use anyhow::Result;
use axum::Router;
use clap::Parser;
use pubsearch_server::{build_app, AppConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Paper store CSV written by the crawler
    #[arg(long, default_value = "./data/papers.csv")]
    store: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Also render papers that did not match the query
    #[arg(long, default_value_t = false)]
    show_unmatched: bool,
    /// Maximum number of results rendered per search
    #[arg(long)]
    max_results: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = AppConfig {
        show_unmatched: args.show_unmatched,
        max_results: args.max_results,
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
        ..AppConfig::new(&args.store)
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
