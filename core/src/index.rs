use crate::tokenizer::normalize;
use crate::{Document, Stem};
use std::collections::{HashMap, HashSet};

/// All stems a document contributes to the index: title, then year, then authors.
pub fn document_stems(doc: &Document) -> Vec<Stem> {
    let mut stems = normalize(&doc.title);
    stems.extend(normalize(&doc.year));
    stems.extend(normalize(&doc.authors_joined()));
    stems
}

/// `ln(N / (1 + df))`. Not floored: stems present in most of the corpus go negative.
pub fn idf(num_docs: usize, doc_freq: usize) -> f64 {
    if num_docs == 0 {
        return 0.0;
    }
    (num_docs as f64 / (1 + doc_freq) as f64).ln()
}

/// Compute `tf * idf` for every stem of every document and store it in `term_weights`.
///
/// Document frequency counts documents whose distinct stem set contains the stem.
/// Previous weights are replaced, so rerunning on the same corpus gives the same result.
pub fn build_index(documents: &mut [Document]) {
    let num_docs = documents.len();
    let stems: Vec<Vec<Stem>> = documents.iter().map(document_stems).collect();
    let distinct: Vec<HashSet<&str>> = stems
        .iter()
        .map(|all| all.iter().map(String::as_str).collect())
        .collect();

    for (doc, all) in documents.iter_mut().zip(&stems) {
        doc.term_weights.clear();
        if all.is_empty() {
            continue;
        }
        let mut freq: HashMap<&str, u32> = HashMap::new();
        for stem in all {
            *freq.entry(stem.as_str()).or_insert(0) += 1;
        }
        let len = all.len() as f64;
        for (stem, count) in freq {
            let tf = count as f64 / len;
            let doc_freq = distinct.iter().filter(|set| set.contains(stem)).count();
            doc.term_weights.insert(stem.to_string(), tf * idf(num_docs, doc_freq));
        }
    }
    tracing::debug!(num_docs, "computed term weights");
}
