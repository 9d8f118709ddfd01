//! Converts rendered HTML into JSX markup.
//!
//! The input is the markdown renderer's output, so tags are well formed but
//! follow HTML rather than JSX rules. The conversion:
//!
//! - renames custom element tags to their PascalCase binding,
//! - lowercases standard tag names,
//! - renames DOM attributes to their React property names,
//! - turns `style` strings into style objects,
//! - self-closes void elements,
//! - drops comments and doctypes,
//! - escapes `{`, `}` and `>` in text,
//! - embeds the content of `<pre>` and raw text elements as string
//!   expressions so whitespace survives JSX whitespace collapsing.

use crate::codegen::{component_binding, js_string_literal};
use fmloader_core::elements::{find_tag_end, is_custom_element, skip_raw_text};
use fmloader_core::to_pascal_case;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// HTML attribute names that React spells differently.
const ATTRIBUTE_RENAMES: &[(&str, &str)] = &[
    ("accept-charset", "acceptCharset"),
    ("accesskey", "accessKey"),
    ("allowfullscreen", "allowFullScreen"),
    ("autocomplete", "autoComplete"),
    ("autofocus", "autoFocus"),
    ("autoplay", "autoPlay"),
    ("cellpadding", "cellPadding"),
    ("cellspacing", "cellSpacing"),
    ("charset", "charSet"),
    ("class", "className"),
    ("colspan", "colSpan"),
    ("contenteditable", "contentEditable"),
    ("crossorigin", "crossOrigin"),
    ("datetime", "dateTime"),
    ("enctype", "encType"),
    ("for", "htmlFor"),
    ("frameborder", "frameBorder"),
    ("http-equiv", "httpEquiv"),
    ("maxlength", "maxLength"),
    ("minlength", "minLength"),
    ("novalidate", "noValidate"),
    ("readonly", "readOnly"),
    ("referrerpolicy", "referrerPolicy"),
    ("rowspan", "rowSpan"),
    ("spellcheck", "spellCheck"),
    ("srcset", "srcSet"),
    ("tabindex", "tabIndex"),
    ("usemap", "useMap"),
];

/// Elements whose text is embedded as a string expression.
const VERBATIM_ELEMENTS: &[&str] = &["pre"];

/// Elements whose content is not markup. Taken whole up to the closing tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// Converts an HTML fragment into JSX.
///
/// # Examples
///
/// ```
/// use fmloader::framework::jsx::html_to_jsx;
///
/// assert_eq!(
///     html_to_jsx("<p class=\"lead\">a { b }<br></p><my-widget></my-widget>"),
///     "<p className=\"lead\">a {\"{\"} b {\"}\"}<br /></p><MyWidget></MyWidget>"
/// );
/// ```
pub fn html_to_jsx(html: &str) -> String {
    let bytes = html.as_bytes();
    let len = bytes.len();
    let mut out = String::with_capacity(html.len() + html.len() / 4);
    let mut verbatim_depth: usize = 0;
    let mut i = 0;

    while i < len {
        if bytes[i] != b'<' {
            let text_end = bytes[i..]
                .iter()
                .position(|&b| b == b'<')
                .map_or(len, |pos| i + pos);
            let text = &html[i..text_end];
            if verbatim_depth > 0 {
                push_verbatim_text(&mut out, text);
            } else {
                push_text(&mut out, text);
            }
            i = text_end;
            continue;
        }

        let rest = &html[i..];
        if rest.starts_with("<!--") {
            i = rest[4..].find("-->").map_or(len, |pos| i + 4 + pos + 3);
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            i = find_tag_end(&bytes[i..]).map_or(len, |end| i + end + 1);
            continue;
        }

        let closing = rest.starts_with("</");
        let name_start = i + if closing { 2 } else { 1 };
        if name_start >= len || !bytes[name_start].is_ascii_alphabetic() {
            out.push_str("{\"<\"}");
            i += 1;
            continue;
        }

        let Some(end) = find_tag_end(&bytes[i..]) else {
            push_text(&mut out, rest);
            break;
        };
        let tag_end = i + end;
        let mut name_end = name_start;
        while name_end < tag_end && is_tag_name_byte(bytes[name_end]) {
            name_end += 1;
        }
        let name = &html[name_start..name_end];
        let lower = name.to_ascii_lowercase();
        let jsx_name = jsx_tag_name(name);

        if closing {
            if !VOID_ELEMENTS.contains(&lower.as_str()) {
                out.push_str("</");
                out.push_str(&jsx_name);
                out.push('>');
            }
            if VERBATIM_ELEMENTS.contains(&lower.as_str()) {
                verbatim_depth = verbatim_depth.saturating_sub(1);
            }
        } else {
            let attr_source = html[name_end..tag_end].trim_end();
            let self_closing = attr_source.ends_with('/');
            let attr_source = attr_source.trim_end_matches('/');

            out.push('<');
            out.push_str(&jsx_name);
            push_attributes(&mut out, attr_source);

            if self_closing || VOID_ELEMENTS.contains(&lower.as_str()) {
                out.push_str(" />");
            } else {
                out.push('>');
                if RAW_TEXT_ELEMENTS.contains(&lower.as_str()) {
                    let content_end = skip_raw_text(html, tag_end + 1, &lower);
                    let content = &html[tag_end + 1..content_end];
                    if lower == "textarea" {
                        push_verbatim_text(&mut out, content);
                    } else {
                        push_raw_text(&mut out, content);
                    }
                    i = content_end;
                    continue;
                }
                if VERBATIM_ELEMENTS.contains(&lower.as_str()) {
                    verbatim_depth += 1;
                }
            }
        }

        i = tag_end + 1;
    }

    out
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':')
}

fn jsx_tag_name(name: &str) -> String {
    if is_custom_element(name) {
        component_binding(&to_pascal_case(name)).into_owned()
    } else {
        name.to_ascii_lowercase()
    }
}

fn jsx_attribute_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if lower.starts_with("data-") || lower.starts_with("aria-") {
        return lower;
    }
    ATTRIBUTE_RENAMES
        .iter()
        .find(|(html, _)| *html == lower)
        .map_or(lower, |(_, jsx)| (*jsx).to_string())
}

/// Text outside verbatim elements. Entities stay as-is; JSX decodes them.
fn push_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '{' => out.push_str("{\"{\"}"),
            '}' => out.push_str("{\"}\"}"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Text inside `<pre>` and `<textarea>`, decoded and quoted.
fn push_verbatim_text(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    let decoded = html_escape::decode_html_entities(text);
    push_raw_text(out, &decoded);
}

/// Script and style content, quoted as-is.
fn push_raw_text(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    out.push('{');
    out.push_str(&js_string_literal(text));
    out.push('}');
}

fn push_attributes(out: &mut String, source: &str) {
    for (name, value) in parse_attributes(source) {
        let jsx_name = jsx_attribute_name(name);
        out.push(' ');
        match value {
            None => out.push_str(&jsx_name),
            Some(raw) => {
                let decoded = html_escape::decode_html_entities(raw);
                if jsx_name == "style" {
                    out.push_str("style={");
                    out.push_str(&style_object(&decoded));
                    out.push('}');
                } else if raw.contains('"') {
                    out.push_str(&jsx_name);
                    out.push_str("={");
                    out.push_str(&js_string_literal(&decoded));
                    out.push('}');
                } else {
                    out.push_str(&jsx_name);
                    out.push_str("=\"");
                    out.push_str(raw);
                    out.push('"');
                }
            }
        }
    }
}

/// Splits a start tag's attribute section into name/value pairs.
fn parse_attributes(source: &str) -> Vec<(&str, Option<&str>)> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut attributes = Vec::new();
    let mut i = 0;

    while i < len {
        while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= len {
            break;
        }

        let name_start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'/') {
            i += 1;
        }
        let name = &source[name_start..i];

        let mut j = i;
        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= len || bytes[j] != b'=' {
            attributes.push((name, None));
            continue;
        }

        j += 1;
        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j < len && matches!(bytes[j], b'"' | b'\'') {
            let quote = bytes[j];
            let value_start = j + 1;
            let value_end = bytes[value_start..]
                .iter()
                .position(|&b| b == quote)
                .map_or(len, |pos| value_start + pos);
            attributes.push((name, Some(&source[value_start..value_end])));
            i = (value_end + 1).min(len);
        } else {
            let value_start = j;
            while j < len && !bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            attributes.push((name, Some(&source[value_start..j])));
            i = j;
        }
    }

    attributes
}

/// Converts an inline CSS declaration list into a React style object literal.
fn style_object(css: &str) -> String {
    let entries: Vec<String> = css
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }
            Some(format!(
                "{}: {}",
                js_string_literal(&style_property_name(property)),
                js_string_literal(value)
            ))
        })
        .collect();

    if entries.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", entries.join(", "))
    }
}

/// `background-color` becomes `backgroundColor`, `-webkit-x` becomes
/// `WebkitX`. Custom properties are kept.
fn style_property_name(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }
    let mut out = String::with_capacity(property.len());
    let mut upper_next = false;
    for ch in property.chars() {
        if ch == '-' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch.to_ascii_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_markdown_output() {
        let html = "<h1>Title</h1>\n<p>GOOD <code>BYE</code> FRIEND</p>";
        assert_eq!(html_to_jsx(html), html);
    }

    #[test]
    fn renames_custom_elements_to_bindings() {
        assert_eq!(
            html_to_jsx("<child-component prop=\"x\"></child-component><MyWidget />"),
            "<ChildComponent prop=\"x\"></ChildComponent><MyWidget />"
        );
    }

    #[test]
    fn lowercases_standard_tags() {
        assert_eq!(html_to_jsx("<DIV>x</DIV>"), "<div>x</div>");
    }

    #[test]
    fn self_closes_void_elements() {
        assert_eq!(
            html_to_jsx("<p>a<br>b<br/>c</br></p><img src=\"x.png\" alt=\"x\">"),
            "<p>a<br />b<br />c</p><img src=\"x.png\" alt=\"x\" />"
        );
    }

    #[test]
    fn renames_attributes() {
        assert_eq!(
            html_to_jsx("<label for=\"a\" class=\"b\" tabindex=0 data-Id=\"1\" hidden>x</label>"),
            "<label htmlFor=\"a\" className=\"b\" tabIndex=\"0\" data-id=\"1\" hidden>x</label>"
        );
    }

    #[test]
    fn single_quoted_values_with_double_quotes_become_expressions() {
        assert_eq!(
            html_to_jsx("<span title='say \"hi\" &amp; go'>x</span>"),
            "<span title={\"say \\\"hi\\\" & go\"}>x</span>"
        );
    }

    #[test]
    fn converts_style_strings() {
        assert_eq!(
            html_to_jsx("<p style=\"color: red; background-color:blue;\">x</p>"),
            "<p style={{ \"color\": \"red\", \"backgroundColor\": \"blue\" }}>x</p>"
        );
    }

    #[test]
    fn drops_comments_and_doctype() {
        assert_eq!(html_to_jsx("<!DOCTYPE html><!-- note --><p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn escapes_text_braces_and_gt() {
        assert_eq!(
            html_to_jsx("<p>{{ name }} -> ok</p>"),
            "<p>{\"{\"}{\"{\"} name {\"}\"}{\"}\"} -&gt; ok</p>"
        );
    }

    #[test]
    fn embeds_pre_text_as_strings() {
        let html = "<pre><code class=\"language-js\">const a = {\n  b: &quot;&lt;c&gt;&quot;\n};\n</code></pre>";
        assert_eq!(
            html_to_jsx(html),
            "<pre><code className=\"language-js\">{\"const a = {\\n  b: \\\"<c>\\\"\\n};\\n\"}</code></pre>"
        );
    }

    #[test]
    fn script_content_is_not_parsed_as_markup() {
        assert_eq!(
            html_to_jsx("<script>if (a<b) { go(); }</script><p>after</p>"),
            "<script>{\"if (a<b) { go(); }\"}</script><p>after</p>"
        );
    }

    #[test]
    fn raw_text_closing_tag_is_case_insensitive() {
        assert_eq!(
            html_to_jsx("<style>a > b { color: red; }</STYLE><textarea>1 &lt; 2</textarea>"),
            "<style>{\"a > b { color: red; }\"}</style><textarea>{\"1 < 2\"}</textarea>"
        );
    }

    #[test]
    fn reserved_component_names_use_their_binding() {
        assert_eq!(html_to_jsx("<React></React>"), "<React_></React_>");
    }

    #[test]
    fn stray_lt_is_escaped() {
        assert_eq!(html_to_jsx("<p>1 < 2</p>"), "<p>1 {\"<\"} 2</p>");
    }

    #[test]
    fn style_property_names() {
        assert_eq!(style_property_name("font-size"), "fontSize");
        assert_eq!(style_property_name("-webkit-transition"), "WebkitTransition");
        assert_eq!(style_property_name("--accent"), "--accent");
    }
}
