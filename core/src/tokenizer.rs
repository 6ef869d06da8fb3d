use crate::Stem;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)[\p{L}\p{N}]+(?:['’][\p{L}\p{N}]+)*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","ain","all","am","an","and","any","are","aren","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","couldn","couldn't",
            "d","did","didn","didn't","do","does","doesn","doesn't","doing","don","don't","down","during",
            "each","few","for","from","further",
            "had","hadn","hadn't","has","hasn","hasn't","have","haven","haven't","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","isn","isn't","it","it's","its","itself",
            "just","ll","m","ma","me","mightn","mightn't","more","most","mustn","mustn't","my","myself",
            "needn","needn't","no","nor","not","now",
            "o","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
            "re","s","same","shan","shan't","she","she's","should","should've","shouldn","shouldn't","so","some","such",
            "t","than","that","that'll","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","ve","very",
            "was","wasn","wasn't","we","were","weren","weren't","what","when","where","which","while","who","whom","why","will","with","won","won't","wouldn","wouldn't",
            "y","you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Normalize free text into stems: NFKC, lowercase, word split, stop-word removal, stemming.
///
/// Duplicates are kept in order; the index counts them and query scoring adds them up.
/// Both the index build and the query path must go through this function.
pub fn normalize(text: &str) -> Vec<Stem> {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().replace('’', "'"))
        .filter(|token| !is_stopword(token))
        .map(|token| STEMMER.stem(&token).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalize() {
        let t = normalize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "run"));
    }

    #[test]
    fn keeps_numbers_and_duplicates() {
        assert_eq!(normalize("2021 graph graph"), vec!["2021", "graph", "graph"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(normalize("").is_empty());
        assert!(normalize("   ,;!  ").is_empty());
    }
}
