use crate::index::build_index;
use crate::search::{match_terms, rank, score, Hit};
use crate::tokenizer::normalize;
use crate::{Document, Stem};
use std::collections::HashSet;

struct Entry {
    document: Document,
    terms: HashSet<Stem>,
}

/// An indexed corpus. Read-only once built; a rebuild produces a new snapshot.
pub struct CorpusSnapshot {
    entries: Vec<Entry>,
}

impl CorpusSnapshot {
    /// Index `documents` and precompute the per-document match terms.
    pub fn build(mut documents: Vec<Document>) -> Self {
        build_index(&mut documents);
        let entries: Vec<Entry> = documents
            .into_iter()
            .map(|document| {
                let terms = match_terms(&document);
                Entry { document, terms }
            })
            .collect();
        tracing::info!(num_docs = entries.len(), "corpus snapshot built");
        Self { entries }
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Documents in corpus order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> + '_ {
        self.entries.iter().map(|e| &e.document)
    }

    /// Number of distinct stems across all weight maps.
    pub fn vocabulary_size(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|e| e.document.term_weights.keys())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Same ranking as `search::search`, reusing the precomputed match terms.
    pub fn search(&self, query: &str) -> Vec<Hit<'_>> {
        let query_stems = normalize(query);
        let mut hits: Vec<Hit<'_>> = self
            .entries
            .iter()
            .map(|e| Hit { document: &e.document, score: score(&query_stems, &e.terms) })
            .collect();
        rank(&mut hits);
        hits
    }
}
