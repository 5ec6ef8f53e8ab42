//! Star count and primary language scraped from page markup
//!
//! Markup changes break selectors without notice, so every lookup here is
//! best effort: a missing element yields `None` and the caller substitutes
//! [`NOT_AVAILABLE`].

use crate::models::{Repository, NOT_AVAILABLE};
use crate::utils::{collapse_whitespace, decode_entities};
use lazy_static::lazy_static;
use regex::Regex;

/// Element id of the repository star counter
pub const STARS_ELEMENT_ID: &str = "repo-stars-counter-star";

lazy_static! {
    // Opening tag of the star counter element
    static ref STARS_TAG: Regex = Regex::new(
        r#"<([A-Za-z][A-Za-z0-9-]*)\b[^>]*\bid\s*=\s*["']repo-stars-counter-star["'][^>]*>"#
    ).unwrap();

    // Opening tag of the first element whose data-ga-click mentions the language
    static ref LANGUAGE_TAG: Regex = Regex::new(
        r#"<([A-Za-z][A-Za-z0-9-]*)\b[^>]*\bdata-ga-click\s*=\s*["'][^"']*language[^"']*["'][^>]*>"#
    ).unwrap();

    // Schema.org microdata for the repository language
    static ref LANGUAGE_ITEMPROP_TAG: Regex = Regex::new(
        r#"<([A-Za-z][A-Za-z0-9-]*)\b[^>]*\bitemprop\s*=\s*["']programmingLanguage["'][^>]*>"#
    ).unwrap();

    static ref TITLE_ATTR: Regex = Regex::new(
        r#"\btitle\s*=\s*["']([^"']*)["']"#
    ).unwrap();

    static ref ANY_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Source of the optional page metadata attached to a [`Repository`]
pub trait PageMetadataProvider: Send + Sync {
    fn stars(&self) -> Option<String>;
    fn language(&self) -> Option<String>;
}

/// Reads machine-readable attributes: the star counter's `title` (exact
/// count) and `itemprop="programmingLanguage"` microdata
#[derive(Debug, Clone)]
pub struct StructuredMetadata {
    html: String,
}

impl StructuredMetadata {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Whether the markup carries any structured hints at all
    pub fn is_available(html: &str) -> bool {
        LANGUAGE_ITEMPROP_TAG.is_match(html)
            || STARS_TAG
                .find(html)
                .map(|tag| TITLE_ATTR.is_match(tag.as_str()))
                .unwrap_or(false)
    }
}

impl PageMetadataProvider for StructuredMetadata {
    fn stars(&self) -> Option<String> {
        let tag = STARS_TAG.find(&self.html)?;
        let title = TITLE_ATTR.captures(tag.as_str())?;
        non_empty(decode_entities(title[1].trim()))
    }

    fn language(&self) -> Option<String> {
        element_text(&self.html, &LANGUAGE_ITEMPROP_TAG)
    }
}

/// Reads the rendered text of the star counter and the language link
#[derive(Debug, Clone)]
pub struct TextScrapeMetadata {
    html: String,
}

impl TextScrapeMetadata {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl PageMetadataProvider for TextScrapeMetadata {
    fn stars(&self) -> Option<String> {
        element_text(&self.html, &STARS_TAG)
    }

    fn language(&self) -> Option<String> {
        element_text(&self.html, &LANGUAGE_TAG)
    }
}

/// Values known up front, e.g. passed on the command line
#[derive(Debug, Clone, Default)]
pub struct FixedMetadata {
    pub stars: Option<String>,
    pub language: Option<String>,
}

impl PageMetadataProvider for FixedMetadata {
    fn stars(&self) -> Option<String> {
        self.stars.clone()
    }

    fn language(&self) -> Option<String> {
        self.language.clone()
    }
}

/// Asks each provider in turn, field by field
#[derive(Default)]
pub struct LayeredMetadata {
    layers: Vec<Box<dyn PageMetadataProvider>>,
}

impl LayeredMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl PageMetadataProvider + 'static) -> Self {
        self.layers.push(Box::new(provider));
        self
    }

    /// Structured attributes first, rendered text as the fallback
    pub fn for_html(html: &str) -> Self {
        let mut layered = Self::new();
        if StructuredMetadata::is_available(html) {
            layered = layered.with(StructuredMetadata::new(html));
        }
        layered.with(TextScrapeMetadata::new(html))
    }
}

impl PageMetadataProvider for LayeredMetadata {
    fn stars(&self) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.stars())
    }

    fn language(&self) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.language())
    }
}

/// Attach stars and language to `repo`, substituting `N/A` for anything missing
pub fn collect_metadata(repo: Repository, provider: &dyn PageMetadataProvider) -> Repository {
    let stars = provider.stars().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let language = provider.language().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    repo.with_stars(stars).with_language(language)
}

/// Text content of the first element whose opening tag matches `opening`
fn element_text(html: &str, opening: &Regex) -> Option<String> {
    let caps = opening.captures(html)?;
    let tag = caps.get(0)?;
    if tag.as_str().ends_with("/>") {
        return None;
    }

    let name = caps[1].to_lowercase();
    let body = &html[tag.end()..];
    let inner = &body[..closing_tag_offset(body, &name).unwrap_or(body.len())];
    let text = ANY_TAG.replace_all(inner, " ");

    non_empty(collapse_whitespace(&decode_entities(&text)))
}

/// Byte offset of the `</name>` that closes the element whose content starts `body`
fn closing_tag_offset(body: &str, name: &str) -> Option<usize> {
    let pattern = Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(name))).ok()?;
    let mut depth = 0usize;

    for caps in pattern.captures_iter(body) {
        let whole = caps.get(0)?;
        let is_close = !caps[1].is_empty();
        if is_close {
            if depth == 0 {
                return Some(whole.start());
            }
            depth -= 1;
        } else if !whole.as_str().ends_with("/>") {
            depth += 1;
        }
    }

    None
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
