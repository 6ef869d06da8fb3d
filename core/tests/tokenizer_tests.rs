use pubsearch_core::tokenizer::normalize;

#[test]
fn it_normalizes_and_stems() {
    let words = normalize("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // Unicode normalization and lowercasing keep the accent but drop case
    assert!(words.iter().any(|w| w.starts_with("café")));
}

#[test]
fn it_filters_stopwords() {
    let words = normalize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.len(), 5);
}

#[test]
fn it_is_deterministic() {
    let text = "Network Graph Theory, 2019 - alice smith, bob lee";
    assert_eq!(normalize(text), normalize(text));
}

#[test]
fn punctuation_separates_tokens() {
    assert_eq!(normalize("graph,network;theory"), normalize("graph network theory"));
}
