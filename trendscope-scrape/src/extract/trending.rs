//! Trending page extraction.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::RawTrendingEntry;
use crate::selector::{
    ContainerChain, CssAttr, CssAttrList, ExtractStrategy, FieldChain, TextContains, TextMatches,
    element_text, parse_selector,
};

/// Most avatars read from a "Built by" row.
pub const MAX_BUILT_BY: usize = 5;

struct TrendingSelectors {
    containers: ContainerChain,
    full_name: FieldChain,
    href: FieldChain,
    description: FieldChain,
    language: FieldChain,
    stars: FieldChain,
    forks: FieldChain,
    stars_today: FieldChain,
    contributors: FieldChain,
}

static SELECTORS: LazyLock<TrendingSelectors> = LazyLock::new(|| TrendingSelectors {
    containers: ContainerChain::new(&["article.Box-row", "div.Box-row"]),
    full_name: FieldChain::new("full_name").texts(&["h2.h3 a", "h1 a", "h2 a"]),
    href: FieldChain::new("href")
        .then(CssAttr::new("h2.h3 a", "href"))
        .then(CssAttr::new("h1 a", "href"))
        .then(CssAttr::new("h2 a", "href")),
    description: FieldChain::new("description").texts(&["p.col-9", "p.color-fg-muted", "p"]),
    language: FieldChain::new("language").texts(&[
        "span[itemprop='programmingLanguage']",
        "span.repo-language-color + span",
        "span.color-fg-default",
    ]),
    // Bare "N stars" / "N forks" spans; the anchors keep "N stars today" out.
    stars: FieldChain::new("stars")
        .texts(&["a[href$='/stargazers']", "a[href*='/stargazers']"])
        .then(TextMatches::new("span", r"^[\d.,]+\s*[kKmM]?\s+stars?$")),
    forks: FieldChain::new("forks")
        .texts(&[
            "a[href$='/forks']",
            "a[href*='/forks']",
            "a[href*='/network/members']",
        ])
        .then(TextMatches::new("span", r"^[\d.,]+\s*[kKmM]?\s+forks?$")),
    stars_today: FieldChain::new("stars_today")
        .texts(&["span.d-inline-block.float-sm-right"])
        .then(TextContains::new(
            "span",
            &["stars today", "stars this week", "stars this month"],
        )),
    contributors: FieldChain::new("contributors")
        .then(BuiltBy::new())
        .then(CssAttrList::new("img[alt^='@']", "alt", MAX_BUILT_BY)),
});

/// Avatars next to the "Built by" label.
struct BuiltBy {
    label: Option<Selector>,
    avatars: CssAttrList,
}

impl BuiltBy {
    fn new() -> Self {
        Self {
            label: parse_selector("span"),
            avatars: CssAttrList::new("img[alt^='@']", "alt", MAX_BUILT_BY),
        }
    }
}

impl ExtractStrategy for BuiltBy {
    fn id(&self) -> &str {
        "built-by"
    }

    fn extract(&self, scope: ElementRef<'_>) -> Option<String> {
        let label = scope
            .select(self.label.as_ref()?)
            .find(|span| element_text(*span).contains("Built by"))?;
        let row = label.parent().and_then(ElementRef::wrap)?;
        let names = self.avatars.collect(row);
        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }
}

/// Extracts every entry of a trending page in page order.
///
/// Fields that cannot be read stay `None`; entries are never dropped here.
pub fn extract_trending(html: &str) -> Vec<RawTrendingEntry> {
    let document = Html::parse_document(html);
    let sel = &*SELECTORS;

    let containers = sel.containers.select(&document);
    if containers.is_empty() && html.len() > 1000 {
        warn!(
            html_len = html.len(),
            "No trending rows matched on a non-empty page, selectors may be stale"
        );
    }

    let entries: Vec<RawTrendingEntry> = containers
        .into_iter()
        .map(|row| RawTrendingEntry {
            full_name: sel.full_name.extract(row),
            href: sel.href.extract(row),
            description: sel.description.extract(row),
            language: sel.language.extract(row),
            stars: sel.stars.extract(row),
            forks: sel.forks.extract(row),
            stars_today: sel.stars_today.extract(row),
            contributors: sel.contributors.extract(row),
        })
        .collect();

    debug!(count = entries.len(), "Extracted trending rows");
    entries
}
