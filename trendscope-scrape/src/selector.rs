//! Ordered fallback extraction.
//!
//! Each semantic field is read through a [`FieldChain`]: an ordered list of
//! [`ExtractStrategy`] values tried until one yields non-empty text. GitHub
//! changes its markup without notice, so every field carries the current
//! selector first and older layouts after it.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{trace, warn};

// ============================================================================
// Strategy Trait
// ============================================================================

/// One way of reading a field from an element subtree.
pub trait ExtractStrategy: Send + Sync {
    /// Identifier used in trace logs.
    fn id(&self) -> &str;

    /// Reads the field, or `None` if this strategy does not apply.
    fn extract(&self, scope: ElementRef<'_>) -> Option<String>;
}

/// Parses a CSS selector, logging and discarding invalid ones.
pub fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = css, error = %e, "Invalid CSS selector, strategy disabled");
            None
        }
    }
}

/// Returns the element's text with surrounding whitespace removed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

// ============================================================================
// CSS Strategies
// ============================================================================

/// Text of the first matching element with non-empty text.
#[derive(Debug)]
pub struct CssText {
    css: String,
    selector: Option<Selector>,
}

impl CssText {
    /// Creates the strategy; an invalid selector never matches.
    pub fn new(css: &str) -> Self {
        Self {
            css: css.to_string(),
            selector: parse_selector(css),
        }
    }
}

impl ExtractStrategy for CssText {
    fn id(&self) -> &str {
        &self.css
    }

    fn extract(&self, scope: ElementRef<'_>) -> Option<String> {
        let selector = self.selector.as_ref()?;
        scope.select(selector).map(element_text).find_map(non_empty)
    }
}

/// An attribute of the first matching element that carries it.
#[derive(Debug)]
pub struct CssAttr {
    id: String,
    selector: Option<Selector>,
    attr: String,
}

impl CssAttr {
    /// Creates the strategy reading `attr` from elements matching `css`.
    pub fn new(css: &str, attr: &str) -> Self {
        Self {
            id: format!("{css}@{attr}"),
            selector: parse_selector(css),
            attr: attr.to_string(),
        }
    }
}

impl ExtractStrategy for CssAttr {
    fn id(&self) -> &str {
        &self.id
    }

    fn extract(&self, scope: ElementRef<'_>) -> Option<String> {
        let selector = self.selector.as_ref()?;
        scope
            .select(selector)
            .filter_map(|el| el.value().attr(&self.attr))
            .map(|v| v.trim().to_string())
            .find_map(non_empty)
    }
}

/// Attribute values of all matching elements, comma-joined.
#[derive(Debug)]
pub struct CssAttrList {
    id: String,
    selector: Option<Selector>,
    attr: String,
    limit: usize,
}

impl CssAttrList {
    /// Creates the strategy collecting at most `limit` values.
    pub fn new(css: &str, attr: &str, limit: usize) -> Self {
        Self {
            id: format!("{css}@{attr}[..{limit}]"),
            selector: parse_selector(css),
            attr: attr.to_string(),
            limit,
        }
    }

    /// Collects the values below `scope`.
    pub fn collect(&self, scope: ElementRef<'_>) -> Vec<String> {
        let Some(selector) = self.selector.as_ref() else {
            return Vec::new();
        };
        scope
            .select(selector)
            .filter_map(|el| el.value().attr(&self.attr))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .take(self.limit)
            .collect()
    }
}

impl ExtractStrategy for CssAttrList {
    fn id(&self) -> &str {
        &self.id
    }

    fn extract(&self, scope: ElementRef<'_>) -> Option<String> {
        non_empty(self.collect(scope).join(", "))
    }
}

/// Text of the first matching element whose lower-cased text contains any
/// of the needles.
#[derive(Debug)]
pub struct TextContains {
    id: String,
    selector: Option<Selector>,
    needles: Vec<String>,
}

impl TextContains {
    /// Creates the strategy.
    pub fn new(css: &str, needles: &[&str]) -> Self {
        Self {
            id: format!("{css}:contains({})", needles.join("|")),
            selector: parse_selector(css),
            needles: needles.iter().map(|n| n.to_lowercase()).collect(),
        }
    }
}

impl ExtractStrategy for TextContains {
    fn id(&self) -> &str {
        &self.id
    }

    fn extract(&self, scope: ElementRef<'_>) -> Option<String> {
        let selector = self.selector.as_ref()?;
        scope.select(selector).map(element_text).find(|text| {
            let lower = text.to_lowercase();
            self.needles.iter().any(|n| lower.contains(n.as_str()))
        })
    }
}

/// The first regex match inside the text of any matching element.
#[derive(Debug)]
pub struct TextMatches {
    id: String,
    selector: Option<Selector>,
    pattern: Option<Regex>,
}

impl TextMatches {
    /// Creates the strategy; an invalid pattern never matches.
    pub fn new(css: &str, pattern: &str) -> Self {
        let compiled = match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern, error = %e, "Invalid pattern, strategy disabled");
                None
            }
        };
        Self {
            id: format!("{css}~/{pattern}/"),
            selector: parse_selector(css),
            pattern: compiled,
        }
    }
}

impl ExtractStrategy for TextMatches {
    fn id(&self) -> &str {
        &self.id
    }

    fn extract(&self, scope: ElementRef<'_>) -> Option<String> {
        let selector = self.selector.as_ref()?;
        let pattern = self.pattern.as_ref()?;
        scope.select(selector).find_map(|el| {
            let text = element_text(el);
            pattern.find(&text).map(|m| m.as_str().to_string())
        })
    }
}

// ============================================================================
// Field Chain
// ============================================================================

/// Ordered strategies for one field.
pub struct FieldChain {
    field: &'static str,
    strategies: Vec<Box<dyn ExtractStrategy>>,
}

impl FieldChain {
    /// Creates an empty chain for `field`.
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    /// Appends a strategy.
    #[must_use]
    pub fn then(mut self, strategy: impl ExtractStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Appends a [`CssText`] strategy for each selector.
    #[must_use]
    pub fn texts(mut self, selectors: &[&str]) -> Self {
        for css in selectors {
            self.strategies.push(Box::new(CssText::new(css)));
        }
        self
    }

    /// Returns the field name.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the number of strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if the chain has no strategies.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Runs the strategies in order and returns the first non-empty value
    /// with the id of the strategy that produced it.
    pub fn extract_with_id(&self, scope: ElementRef<'_>) -> Option<(String, &str)> {
        for strategy in &self.strategies {
            if let Some(value) = strategy.extract(scope).and_then(non_empty) {
                trace!(field = self.field, strategy = strategy.id(), "Field matched");
                return Some((value, strategy.id()));
            }
        }
        trace!(field = self.field, "No strategy matched");
        None
    }

    /// Runs the strategies in order and returns the first non-empty value.
    pub fn extract(&self, scope: ElementRef<'_>) -> Option<String> {
        self.extract_with_id(scope).map(|(value, _)| value)
    }
}

impl std::fmt::Debug for FieldChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldChain")
            .field("field", &self.field)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ============================================================================
// Container Chain
// ============================================================================

/// Ordered selectors for repeated containers (one per entry); the first
/// selector matching anything wins.
#[derive(Debug)]
pub struct ContainerChain {
    candidates: Vec<(String, Option<Selector>)>,
}

impl ContainerChain {
    /// Creates the chain from selectors in priority order.
    pub fn new(selectors: &[&str]) -> Self {
        Self {
            candidates: selectors
                .iter()
                .map(|css| ((*css).to_string(), parse_selector(css)))
                .collect(),
        }
    }

    /// Selects the containers in document order.
    pub fn select<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for (css, selector) in &self.candidates {
            let Some(selector) = selector else {
                continue;
            };
            let found: Vec<_> = document.select(selector).collect();
            if !found.is_empty() {
                trace!(selector = %css, count = found.len(), "Containers matched");
                return found;
            }
        }
        Vec::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_fragment(html)
    }

    #[test]
    fn test_first_non_empty_strategy_wins() {
        let html = doc(r#"<div><p class="a">  </p><p class="b">second</p><p class="c">third</p></div>"#);
        let chain = FieldChain::new("text").texts(&["p.missing", "p.a", "p.b", "p.c"]);

        let (value, id) = chain.extract_with_id(html.root_element()).unwrap();
        assert_eq!(value, "second");
        assert_eq!(id, "p.b");
    }

    #[test]
    fn test_missing_everything_yields_none() {
        let html = doc("<div><span>unrelated</span></div>");
        let chain = FieldChain::new("text")
            .texts(&["p.one", "p.two"])
            .then(CssAttr::new("a", "href"));
        assert!(chain.extract(html.root_element()).is_none());
    }

    #[test]
    fn test_invalid_selector_is_skipped() {
        let html = doc(r#"<div><b>bold</b></div>"#);
        let chain = FieldChain::new("text").texts(&["[[[", "b"]);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.extract(html.root_element()).as_deref(), Some("bold"));
    }

    #[test]
    fn test_attr_strategies() {
        let html = doc(
            r#"<div><img alt="@alice"><img alt=""><img alt="@bob"><img alt="@carol"></div>"#,
        );
        let list = CssAttrList::new("img[alt^='@']", "alt", 2);
        assert_eq!(list.extract(html.root_element()).as_deref(), Some("@alice, @bob"));

        let single = CssAttr::new("img", "alt");
        assert_eq!(single.extract(html.root_element()).as_deref(), Some("@alice"));
    }

    #[test]
    fn test_text_contains_and_matches() {
        let html = doc(r#"<div><span>12 forks</span><span>340 stars today</span><span>1.2 MB</span></div>"#);
        let contains = TextContains::new("span", &["Stars Today"]);
        assert_eq!(
            contains.extract(html.root_element()).as_deref(),
            Some("340 stars today")
        );

        let matches = TextMatches::new("span", r"\d+(\.\d+)?\s*(KB|MB|GB)");
        assert_eq!(matches.extract(html.root_element()).as_deref(), Some("1.2 MB"));
    }

    #[test]
    fn test_container_chain_falls_back() {
        let html = Html::parse_document(r#"<div class="Box-row">a</div><div class="Box-row">b</div>"#);
        let chain = ContainerChain::new(&["article.Box-row", "div.Box-row"]);
        assert_eq!(chain.select(&html).len(), 2);

        let none = ContainerChain::new(&["article.Box-row"]);
        assert!(none.select(&html).is_empty());
    }
}
