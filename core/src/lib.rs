pub mod document;
pub mod index;
pub mod search;
pub mod snapshot;
pub mod store;
pub mod tokenizer;

pub use document::Document;
pub use search::Hit;
pub use snapshot::CorpusSnapshot;

/// Stem produced by the text normalizer.
pub type Stem = String;
pub type TermWeights = std::collections::HashMap<Stem, f64>;
