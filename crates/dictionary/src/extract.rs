//! Heuristic content selection for scraped dictionary pages.
//!
//! The page layout is not under our control, so the extractor tries a fixed
//! list of content containers, drops navigation chrome, and returns the first
//! paragraph that looks like a real definition. The thresholds below are the
//! knobs that keep that heuristic honest; tests pin their behavior.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

/// Content containers, most specific first.
pub const CONTENT_SELECTORS: &[&str] = &[
    "div.resource-content",
    "div.content-wrapper",
    "div.definition",
    "div.entry-content",
    "main",
    "article",
];

/// Elements whose text is never part of an entry.
pub const NOISE_TAGS: &[&str] = &["nav", "header", "footer", "aside", "script", "style"];

/// A paragraph must be longer than this (collapsed) to be considered.
pub const MIN_PARAGRAPH_CHARS: usize = 30;
/// After cleaning, a paragraph must still be longer than this to be returned.
pub const MIN_DEFINITION_CHARS: usize = 20;
/// Whole-container fallback requires more text than this.
pub const MIN_FALLBACK_CHARS: usize = 50;
/// Whole-container fallback is cut to this many characters.
pub const MAX_FALLBACK_CHARS: usize = 500;

const BOILERPLATE_PATTERNS: &[&str] = &[
    r"BibleGateway\.com.*$",
    r"Copyright.*$",
    r"All rights reserved.*$",
];

static CONTENT: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("content selector must parse"))
        .collect()
});

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("body selector must parse"));

static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("paragraph selector must parse"));

static BODY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body[\s>/]").expect("body tag pattern must compile"));

static BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BOILERPLATE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("boilerplate pattern must compile"))
        .collect()
});

/// Pull the definition text for `word` out of a dictionary page.
pub fn extract(html: &str, word: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let container = content_container(&document, html)?;

    for paragraph in container.select(&PARAGRAPH) {
        if inside_noise(&paragraph, &container) {
            continue;
        }
        let text = visible_text(paragraph);
        if text.chars().count() <= MIN_PARAGRAPH_CHARS {
            continue;
        }
        let text = clean(&text, word);
        if text.chars().count() > MIN_DEFINITION_CHARS {
            return Some(text);
        }
    }

    let text = visible_text(container);
    if text.chars().count() <= MIN_FALLBACK_CHARS {
        return None;
    }
    let text: String = clean(&text, word).chars().take(MAX_FALLBACK_CHARS).collect();
    let text = text.trim_end().to_owned();
    (!text.is_empty()).then_some(text)
}

fn content_container<'a>(document: &'a Html, raw: &str) -> Option<ElementRef<'a>> {
    if let Some(found) = CONTENT
        .iter()
        .find_map(|selector| document.select(selector).next())
    {
        return Some(found);
    }
    // html5ever synthesizes a body for every document; only honor one the page declared.
    if !BODY_TAG.is_match(raw) {
        return None;
    }
    document.select(&BODY).next()
}

fn is_noise(element: &ElementRef) -> bool {
    NOISE_TAGS.contains(&element.value().name())
}

fn inside_noise(element: &ElementRef, container: &ElementRef) -> bool {
    element
        .ancestors()
        .take_while(|node| node.id() != container.id())
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_noise(&ancestor))
}

/// Text of `element` with noise subtrees skipped and whitespace collapsed.
fn visible_text(element: ElementRef) -> String {
    let mut pieces = Vec::new();
    collect_text(element, &mut pieces);
    collapse_whitespace(&pieces.join(" "))
}

fn collect_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    pieces.push(text);
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    if !is_noise(&child) {
                        collect_text(child, pieces);
                    }
                }
            }
            _ => {}
        }
    }
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean(text: &str, word: &str) -> String {
    strip_leading_word(&strip_boilerplate(text), word)
}

pub(crate) fn strip_boilerplate(text: &str) -> String {
    let mut text = text.to_owned();
    for pattern in BOILERPLATE.iter() {
        text = pattern.replace(&text, "").into_owned();
    }
    text.trim_end().to_owned()
}

/// Drops `word` from the front of `text` when it is followed by a space.
pub(crate) fn strip_leading_word(text: &str, word: &str) -> String {
    let word_chars = word.chars().count();
    let split = text
        .char_indices()
        .nth(word_chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    let (head, rest) = text.split_at(split);
    if !word.is_empty() && rest.starts_with(' ') && head.to_lowercase() == word.to_lowercase() {
        rest.trim().to_owned()
    } else {
        text.to_owned()
    }
}
