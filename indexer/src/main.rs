use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use pubsearch_core::store::load_documents;
use pubsearch_core::{CorpusSnapshot, Document};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Inspect and query the in-memory TF-IDF index of the paper store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and report corpus statistics as JSON
    Stats {
        /// Input path (CSV file or directory of CSV files)
        #[arg(long)]
        input: String,
        /// Number of highest weighted stems to list per document
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
    /// Rank the corpus against a query
    Query {
        /// Input path (CSV file or directory of CSV files)
        #[arg(long)]
        input: String,
        /// Query text
        query: String,
        /// Maximum number of results to print
        #[arg(long)]
        limit: Option<usize>,
        /// Also print documents that scored zero
        #[arg(long, default_value_t = false)]
        show_unmatched: bool,
    },
}

#[derive(Debug, Serialize)]
struct WeightedStem {
    stem: String,
    weight: f64,
}

#[derive(Debug, Serialize)]
struct DocReport {
    title: String,
    year: String,
    top_terms: Vec<WeightedStem>,
}

#[derive(Debug, Serialize)]
struct StatsReport {
    num_docs: usize,
    vocabulary_size: usize,
    created_at: String,
    documents: Vec<DocReport>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { input, top, output } => {
            let snapshot = CorpusSnapshot::build(load_corpus(Path::new(&input))?);
            let report = stats_report(&snapshot, top);
            match output {
                Some(path) => write_report(BufWriter::new(File::create(&path)?), &report)?,
                None => write_report(io::stdout().lock(), &report)?,
            }
            Ok(())
        }
        Commands::Query { input, query, limit, show_unmatched } => {
            let snapshot = CorpusSnapshot::build(load_corpus(Path::new(&input))?);
            let hits = snapshot
                .search(&query)
                .into_iter()
                .filter(|h| show_unmatched || h.score > 0)
                .take(limit.unwrap_or(usize::MAX));
            let mut out = io::stdout().lock();
            for (rank, hit) in hits.enumerate() {
                let d = hit.document;
                writeln!(out, "{:>3}. [{}] {} ({}) - {}", rank + 1, hit.score, d.title, d.year, d.authors_joined())?;
            }
            Ok(())
        }
    }
}

/// CSV files under `input`, sorted so corpus order is stable across runs.
fn collect_inputs(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("csv") {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn load_corpus(input: &Path) -> Result<Vec<Document>> {
    let files = collect_inputs(input);
    if files.is_empty() {
        bail!("no CSV input found at {}", input.display());
    }
    let mut docs = Vec::new();
    for file in files {
        docs.extend(load_documents(&file)?);
    }
    tracing::info!(num_docs = docs.len(), "corpus loaded");
    Ok(docs)
}

fn stats_report(snapshot: &CorpusSnapshot, top: usize) -> StatsReport {
    let documents = snapshot
        .documents()
        .map(|d| {
            let mut terms: Vec<WeightedStem> = d
                .term_weights
                .iter()
                .map(|(stem, &weight)| WeightedStem { stem: stem.clone(), weight })
                .collect();
            terms.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.stem.cmp(&b.stem)));
            terms.truncate(top);
            DocReport { title: d.title.clone(), year: d.year.clone(), top_terms: terms }
        })
        .collect();
    StatsReport {
        num_docs: snapshot.len(),
        vocabulary_size: snapshot.vocabulary_size(),
        created_at: time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|_| "".into()),
        documents,
    }
}

fn write_report<W: Write>(mut w: W, report: &StatsReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut w, report)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}
