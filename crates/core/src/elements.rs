//! Detection of custom component tags in rendered HTML.
//!
//! Detection is syntactic only: a tag is a component reference when its name
//! follows the kebab (`<my-widget>`) or Pascal (`<MyWidget>`) convention and
//! is not a standard element. Whether a component with that name exists is
//! left to the host's module resolution.

use crate::naming::{to_kebab_case, to_pascal_case};
use serde::Serialize;
use std::collections::HashSet;

/// A custom element found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ComponentReference {
    /// Canonical lowercase-hyphenated name, used as the markup tag.
    pub kebab: String,
    /// PascalCase name, used as the local binding.
    pub pascal: String,
}

impl ComponentReference {
    /// Builds a reference from any spelling of a component name.
    pub fn from_tag(tag: &str) -> Self {
        Self {
            kebab: to_kebab_case(tag),
            pascal: to_pascal_case(tag),
        }
    }
}

/// Standard HTML element names (lowercase).
const HTML_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col",
    "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins",
    "kbd", "label", "legend", "li", "link", "main", "map", "mark", "math", "menu", "meta",
    "meter", "nav", "noscript", "object", "ol", "optgroup", "option", "output", "p", "param",
    "picture", "pre", "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "search",
    "section", "select", "slot", "small", "source", "span", "strong", "style", "sub",
    "summary", "sup", "svg", "table", "tbody", "td", "template", "textarea", "tfoot", "th",
    "thead", "time", "title", "tr", "track", "u", "ul", "var", "video", "wbr",
];

/// Hyphenated names reserved by SVG and MathML; never custom elements.
const RESERVED_HYPHENATED: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Elements whose content is raw text and must not be scanned for tags.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Returns true when `name` is a standard HTML element, ignoring case.
pub fn is_standard_element(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    HTML_ELEMENTS.contains(&lower.as_str())
}

/// Returns true when a tag name denotes a custom component.
///
/// # Examples
///
/// ```
/// use fmloader_core::elements::is_custom_element;
///
/// assert!(is_custom_element("my-widget"));
/// assert!(is_custom_element("MyWidget"));
/// assert!(!is_custom_element("div"));
/// // Uppercase HTML tags are not PascalCase components
/// assert!(!is_custom_element("DIV"));
/// assert!(!is_custom_element("Div"));
/// ```
pub fn is_custom_element(name: &str) -> bool {
    if name.contains('-') {
        let lower = name.to_ascii_lowercase();
        return !RESERVED_HYPHENATED.contains(&lower.as_str());
    }

    let starts_upper = name.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    let has_lower = name.chars().any(|c| c.is_ascii_lowercase());
    starts_upper && has_lower && !is_standard_element(name)
}

/// Scans HTML start tags and returns one reference per custom component, in
/// order of first appearance.
///
/// # Examples
///
/// ```
/// use fmloader_core::elements::scan_custom_elements;
///
/// let refs = scan_custom_elements("<p><my-widget></my-widget><MyWidget /></p>");
/// assert_eq!(refs.len(), 1);
/// assert_eq!(refs[0].kebab, "my-widget");
/// assert_eq!(refs[0].pascal, "MyWidget");
/// ```
pub fn scan_custom_elements(html: &str) -> Vec<ComponentReference> {
    let mut seen = HashSet::new();
    let mut refs = Vec::new();

    for name in start_tag_names(html) {
        if !is_custom_element(name) {
            continue;
        }
        let reference = ComponentReference::from_tag(name);
        if seen.insert(reference.kebab.clone()) {
            log::trace!("custom element <{}> -> {}", name, reference.pascal);
            refs.push(reference);
        }
    }

    log::debug!("found {} custom element(s)", refs.len());
    refs
}

/// Yields the names of all start tags in document order.
fn start_tag_names(html: &str) -> Vec<&str> {
    let bytes = html.as_bytes();
    let len = bytes.len();
    let mut names = Vec::new();
    let mut i = 0;

    while i < len {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        if html[i..].starts_with("<!--") {
            i = html[i + 4..]
                .find("-->")
                .map(|pos| i + 4 + pos + 3)
                .unwrap_or(len);
            continue;
        }

        if i + 1 >= len || !bytes[i + 1].is_ascii_alphabetic() {
            i += 1;
            continue;
        }

        let name_start = i + 1;
        let mut name_end = name_start;
        while name_end < len && is_tag_name_byte(bytes[name_end]) {
            name_end += 1;
        }
        let name = &html[name_start..name_end];
        names.push(name);

        let tag_end = find_tag_end(&bytes[i..]).map(|end| i + end + 1).unwrap_or(len);

        let lower = name.to_ascii_lowercase();
        i = if RAW_TEXT_ELEMENTS.contains(&lower.as_str()) {
            skip_raw_text(html, tag_end, &lower)
        } else {
            tag_end
        };
    }

    names
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':')
}

/// Finds the start of the `</name` tag closing a raw text element, matched
/// case-insensitively. `name` must be lowercase. Returns `html.len()` when
/// the element is never closed.
pub fn skip_raw_text(html: &str, from: usize, name: &str) -> usize {
    let closing = format!("</{name}");
    html[from..]
        .to_ascii_lowercase()
        .find(&closing)
        .map(|pos| from + pos)
        .unwrap_or(html.len())
}

/// Finds the position of `>` that closes a tag, skipping quoted attribute values.
pub fn find_tag_end(bytes: &[u8]) -> Option<usize> {
    let mut i = 1;
    let mut quote: Option<u8> = None;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
        i += 1;
    }
    None
}
