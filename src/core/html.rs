// src/core/html.rs
//
// Text helpers over a parsed `scraper::Html` tree.

use scraper::{ElementRef, Html, Node};

use super::sanitize::normalize_ws;

/// Class fragments that mark site furniture rather than content.
const CHROME_CLASS_HINTS: &[&str] = &["menu", "nav", "footer", "header", "sidebar"];

/// Landmark elements that are furniture by definition.
const CHROME_TAGS: &[&str] = &["nav", "footer", "header"];

/// Elements whose text is never visible.
const SILENT_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line of visible text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "br", "tr", "td", "th", "table", "section", "article",
    "main", "aside", "h1", "h2", "h3", "h4", "h5", "h6", "dd", "dt", "dl", "blockquote",
    "figure", "figcaption", "form", "hr",
];

/// Text nodes of `el`, each trimmed, empty ones dropped, joined by one space.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Navigation, header, footer or anything classed like them.
pub fn is_chrome(el: ElementRef<'_>) -> bool {
    let name = el.value().name();
    // WordPress puts layout flags like `has-sidebar` on <body>.
    if name.eq_ignore_ascii_case("body") || name.eq_ignore_ascii_case("html") {
        return false;
    }
    if CHROME_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t)) {
        return true;
    }
    el.value().classes().any(|class| {
        let class = class.to_ascii_lowercase();
        CHROME_CLASS_HINTS.iter().any(|hint| class.contains(hint))
    })
}

/// Visible page text with chrome removed. One line per block element,
/// whitespace collapsed inside each line, empty lines dropped.
pub fn content_text(doc: &Html) -> String {
    let mut raw = String::new();
    collect_content(doc.root_element(), &mut raw);
    raw.lines()
        .map(normalize_ws)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_content(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else { continue };
                let name = child_el.value().name();
                if SILENT_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t)) || is_chrome(child_el) {
                    continue;
                }
                let block = BLOCK_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t));
                if block { out.push('\n'); }
                collect_content(child_el, out);
                if block { out.push('\n'); }
            }
            _ => {}
        }
    }
}

/// Text of the element's parent, or of the element itself at the root.
pub fn neighborhood_text(el: ElementRef<'_>) -> String {
    el.parent()
        .and_then(ElementRef::wrap)
        .map(element_text)
        .unwrap_or_else(|| element_text(el))
}
