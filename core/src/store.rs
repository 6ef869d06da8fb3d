use crate::Document;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::Path;

/// One CSV row. Lists are stored comma-joined.
#[derive(Debug, Serialize, Deserialize)]
struct PaperRecord {
    title: String,
    #[serde(default)]
    title_link: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    authors: String,
    #[serde(default)]
    author_links: String,
}

impl From<&Document> for PaperRecord {
    fn from(doc: &Document) -> Self {
        Self {
            title: doc.title.clone(),
            title_link: doc.title_link.clone(),
            year: doc.year.clone(),
            authors: doc.authors_joined(),
            author_links: doc.author_links.join(", "),
        }
    }
}

/// Inverse of the `", "` join. Names never contain commas (see `normalize_author`);
/// a link containing a comma would come back split.
fn split_list(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn write_documents<W: Write>(writer: W, docs: &[Document]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    for doc in docs {
        w.serialize(PaperRecord::from(doc))?;
    }
    w.flush()?;
    Ok(())
}

/// Read documents in file order, dropping rows without a title or authors.
pub fn read_documents<R: Read>(reader: R) -> Result<Vec<Document>> {
    let mut r = csv::Reader::from_reader(reader);
    let mut docs = Vec::new();
    for (row, rec) in r.deserialize::<PaperRecord>().enumerate() {
        let rec = rec.with_context(|| format!("malformed record at row {}", row + 1))?;
        let authors = split_list(&rec.authors);
        if rec.title.trim().is_empty() || authors.is_empty() {
            tracing::warn!(row = row + 1, "skipping record without title or authors");
            continue;
        }
        docs.push(Document::new(rec.title, rec.title_link, rec.year, authors, split_list(&rec.author_links)));
    }
    Ok(docs)
}

pub fn save_documents<P: AsRef<Path>>(path: P, docs: &[Document]) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_documents(f, docs)?;
    tracing::info!(path = %path.display(), num_docs = docs.len(), "saved documents");
    Ok(())
}

pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let docs = read_documents(f)?;
    tracing::info!(path = %path.display(), num_docs = docs.len(), "loaded documents");
    Ok(docs)
}
