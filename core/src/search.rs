use crate::tokenizer::normalize;
use crate::{Document, Stem};
use std::collections::HashSet;

/// A document paired with its query score.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub document: &'a Document,
    pub score: u32,
}

/// Stems a query is matched against: title and authors only.
pub fn match_terms(doc: &Document) -> HashSet<Stem> {
    let mut terms: HashSet<Stem> = normalize(&doc.title).into_iter().collect();
    terms.extend(normalize(&doc.authors_joined()));
    terms
}

/// One point per query stem found in `terms`; repeated query stems count again.
pub fn score(query_stems: &[Stem], terms: &HashSet<Stem>) -> u32 {
    query_stems.iter().filter(|s| terms.contains(*s)).count() as u32
}

/// Descending by score. The sort is stable so ties keep corpus order.
pub(crate) fn rank(hits: &mut [Hit<'_>]) {
    hits.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Rank every document against `query`, including those that score zero.
///
/// Weights from `build_index` are not consulted; ranking is raw term overlap.
pub fn search<'a>(query: &str, documents: &'a [Document]) -> Vec<Hit<'a>> {
    let query_stems = normalize(query);
    let mut hits: Vec<Hit<'a>> = documents
        .iter()
        .map(|document| Hit { document, score: score(&query_stems, &match_terms(document)) })
        .collect();
    rank(&mut hits);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_is_not_matched() {
        let d = Document::new("Graph", "", "2021", vec!["bob".into()], vec![]);
        let hits = search("2021", std::slice::from_ref(&d));
        assert_eq!(hits[0].score, 0);
    }

    #[test]
    fn repeated_query_stems_add_up() {
        let terms: HashSet<Stem> = ["graph".to_string()].into_iter().collect();
        let q = normalize("graphs graph");
        assert_eq!(score(&q, &terms), 2);
    }
}
