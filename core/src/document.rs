use crate::TermWeights;

/// One publication record as extracted from the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub title_link: String,
    pub year: String,
    /// Lowercased author names. Linked authors come first, so `author_links[i]` belongs to `authors[i]`.
    pub authors: Vec<String>,
    pub author_links: Vec<String>,
    /// Derived by `index::build_index`; empty until the corpus is indexed.
    pub term_weights: TermWeights,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        title_link: impl Into<String>,
        year: impl Into<String>,
        authors: Vec<String>,
        author_links: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            title_link: title_link.into(),
            year: year.into(),
            authors,
            author_links,
            term_weights: TermWeights::new(),
        }
    }

    /// Authors as the single comma-joined string that gets tokenized and stored.
    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }
}

/// Keep only alphanumeric and whitespace characters of a raw title.
pub fn clean_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lowercased author name. Commas are dropped since stored author lists are comma-joined.
pub fn normalize_author(raw: &str) -> String {
    raw.replace(',', " ").split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
