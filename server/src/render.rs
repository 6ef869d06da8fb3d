use anyhow::Result;
use handlebars::{html_escape, Handlebars};
use pubsearch_core::Hit;
use serde::Serialize;
use serde_json::json;

const HOME: &str = include_str!("../templates/home.hbs");
const RESULTS: &str = include_str!("../templates/results.hbs");

#[derive(Serialize)]
struct AuthorView<'a> {
    name: &'a str,
    link: Option<&'a str>,
}

#[derive(Serialize)]
struct PaperView<'a> {
    rank: usize,
    score: u32,
    title_html: String,
    title_link: &'a str,
    year: &'a str,
    authors: Vec<AuthorView<'a>>,
}

pub struct Pages {
    hb: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut hb = Handlebars::new();
        hb.set_strict_mode(false);
        hb.register_template_string("home", HOME)?;
        hb.register_template_string("results", RESULTS)?;
        Ok(Self { hb })
    }

    pub fn home(&self, num_docs: usize) -> Result<String> {
        Ok(self.hb.render("home", &json!({ "num_docs": num_docs }))?)
    }

    pub fn results(&self, query: &str, hits: &[Hit<'_>]) -> Result<String> {
        let terms: Vec<&str> = query.split_whitespace().collect();
        let papers: Vec<PaperView<'_>> = hits
            .iter()
            .enumerate()
            .map(|(i, hit)| {
                let d = hit.document;
                // Author links only exist for linked authors; unlinked names come last.
                let authors = d
                    .authors
                    .iter()
                    .enumerate()
                    .map(|(j, name)| AuthorView { name: name.as_str(), link: d.author_links.get(j).map(String::as_str) })
                    .collect();
                PaperView {
                    rank: i + 1,
                    score: hit.score,
                    title_html: highlight_terms(&html_escape(&d.title), &terms),
                    title_link: d.title_link.as_str(),
                    year: d.year.as_str(),
                    authors,
                }
            })
            .collect();
        Ok(self.hb.render("results", &json!({ "query": query, "papers": papers }))?)
    }
}

/// Wrap case-insensitive occurrences of the raw query terms in `<mark>`.
///
/// `escaped` must already be HTML-escaped; the terms are escaped the same way before matching.
pub fn highlight_terms(escaped: &str, terms: &[&str]) -> String {
    let mut pats: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| regex::escape(&html_escape(t)))
        .collect();
    if pats.is_empty() {
        return escaped.to_string();
    }
    pats.sort_by_key(|p| std::cmp::Reverse(p.len()));
    let pat = match regex::RegexBuilder::new(&pats.join("|")).case_insensitive(true).build() {
        Ok(p) => p,
        Err(_) => return escaped.to_string(),
    };
    pat.replace_all(escaped, |caps: &regex::Captures| format!("<mark>{}</mark>", &caps[0])).into_owned()
}
