use criterion::{criterion_group, criterion_main, Criterion};
use pubsearch_core::tokenizer::normalize;
use pubsearch_core::{CorpusSnapshot, Document};

const TITLES: &str = include_str!("sample_titles.txt");

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_titles", |b| b.iter(|| normalize(TITLES)));
}

fn bench_search(c: &mut Criterion) {
    let docs: Vec<Document> = TITLES
        .lines()
        .enumerate()
        .map(|(i, t)| Document::new(t, "", "2022", vec![format!("author {i}")], vec![]))
        .collect();
    let snapshot = CorpusSnapshot::build(docs);
    c.bench_function("search_snapshot", |b| b.iter(|| snapshot.search("numerical models of fluid flow")));
}

criterion_group!(benches, bench_normalize, bench_search);
criterion_main!(benches);
