use anyhow::{anyhow, Result};
use pubsearch_core::document::{clean_title, normalize_author};
use pubsearch_core::Document;
use scraper::{ElementRef, Html, Selector};

/// Selectors for one publication entry on a listing page.
pub struct Selectors {
    result: Selector,
    title: Selector,
    link: Selector,
    date: Selector,
    person: Selector,
    unlinked_author: Selector,
}

fn parse(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e:?}"))
}

impl Selectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            result: parse(".result-container")?,
            title: parse(".title")?,
            link: parse(".link")?,
            date: parse(".date")?,
            person: parse(".link.person")?,
            unlinked_author: parse("h3.title ~ span:not([class])")?,
        })
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Extract cleaned documents from a listing page, in page order.
///
/// An entry is kept only with a linked title, at least one author and one author link.
pub fn extract_documents(html: &str, sel: &Selectors) -> Vec<Document> {
    let page = Html::parse_document(html);
    let mut docs = Vec::new();
    for result in page.select(&sel.result) {
        let Some(title_el) = result.select(&sel.title).next() else { continue };
        let Some(title_link) = title_el.select(&sel.link).next().and_then(|a| a.value().attr("href")) else { continue };
        let title = clean_title(&text_of(title_el));
        if title.is_empty() { continue; }

        let year = result.select(&sel.date).next().map(text_of).unwrap_or_default();

        // Linked authors come first so author_links[i] belongs to authors[i].
        let mut linked: Vec<(String, String)> = Vec::new();
        let mut unlinked: Vec<String> = Vec::new();
        for p in result.select(&sel.person) {
            let name = normalize_author(&text_of(p));
            if name.is_empty() { continue; }
            match p.value().attr("href") {
                Some(href) => linked.push((name, href.to_string())),
                None => unlinked.push(name),
            }
        }
        unlinked.extend(result.select(&sel.unlinked_author).map(|s| normalize_author(&text_of(s))).filter(|a| !a.is_empty()));
        let (mut authors, author_links): (Vec<String>, Vec<String>) = linked.into_iter().unzip();
        authors.extend(unlinked);
        if authors.is_empty() || author_links.is_empty() { continue; }

        docs.push(Document::new(title, title_link, year, authors, author_links));
    }
    docs
}
