use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result returned after extracting frontmatter from a Markdown document.
#[derive(Debug)]
pub struct FrontmatterExtraction<'a> {
    /// Parsed frontmatter as a JSON object (empty when the document has none).
    pub value: JsonValue,
    /// Document text after the frontmatter block, line endings untouched.
    pub body: &'a str,
}

impl<'a> FrontmatterExtraction<'a> {
    fn empty(body: &'a str) -> Self {
        Self {
            value: JsonValue::Object(Default::default()),
            body,
        }
    }

    /// Returns true when the document carried no metadata.
    pub fn is_empty(&self) -> bool {
        self.value.as_object().is_none_or(|map| map.is_empty())
    }
}

/// Errors emitted while parsing or extracting frontmatter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Unclosed YAML fence (e.g., missing terminating `---`).
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// Splits a document into its YAML frontmatter and body.
///
/// A block is recognised only when the very first line (after an optional
/// byte order mark) is `---`. It closes at the next `---` or `...` line.
/// Trailing spaces and tabs after a fence are ignored.
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction<'_>, FrontmatterError> {
    match find_yaml_block(input)? {
        Some((block, body_start)) => {
            let value = parse_yaml_block(block)?;
            log::debug!(
                "extracted frontmatter block ({} bytes), body starts at byte {}",
                block.len(),
                body_start
            );
            Ok(FrontmatterExtraction {
                value,
                body: &input[body_start..],
            })
        }
        None => Ok(FrontmatterExtraction::empty(input)),
    }
}

fn parse_yaml_block(block: &str) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    let json_value =
        serde_json::to_value(yaml_value).map_err(|err| FrontmatterError::Parse(err.to_string()))?;

    match json_value {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        JsonValue::Object(_) => Ok(json_value),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

fn find_yaml_block(input: &str) -> Result<Option<(&str, usize)>, FrontmatterError> {
    let (without_bom, bom_len) = strip_bom(input);

    let Some((first_line, block_start)) = next_line(without_bom, 0) else {
        return Ok(None);
    };
    if !is_opening_fence(first_line) {
        return Ok(None);
    }

    let mut scan_cursor = block_start;
    loop {
        match next_line(without_bom, scan_cursor) {
            Some((block_line, next_line_cursor)) => {
                if is_closing_fence(block_line) {
                    let raw_block = &without_bom[block_start..scan_cursor];
                    let trimmed = raw_block.trim_end_matches(['\r', '\n']);
                    return Ok(Some((trimmed, bom_len + next_line_cursor)));
                }
                scan_cursor = next_line_cursor;
            }
            None => return Err(FrontmatterError::Unterminated),
        }
    }
}

fn strip_bom(input: &str) -> (&str, usize) {
    if let Some(stripped) = input.strip_prefix('\u{feff}') {
        (stripped, '\u{feff}'.len_utf8())
    } else {
        (input, 0)
    }
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    let bytes = &input.as_bytes()[start..];
    if let Some(pos) = bytes.iter().position(|b| *b == b'\n') {
        let line_end = start + pos;
        let line = &input[start..line_end];
        Some((line, line_end + 1))
    } else {
        Some((&input[start..], input.len()))
    }
}

fn is_opening_fence(line: &str) -> bool {
    normalize_line(line) == "---"
}

fn is_closing_fence(line: &str) -> bool {
    matches!(normalize_line(line), "---" | "...")
}

fn normalize_line(line: &str) -> &str {
    line.trim_end_matches(['\r', ' ', '\t'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> FrontmatterExtraction<'_> {
        extract_frontmatter(input).expect("frontmatter extraction should succeed")
    }

    #[test]
    fn returns_empty_when_no_frontmatter() {
        let input = "# Title\r\nBody\r\n";
        let result = extract(input);
        assert!(result.is_empty());
        assert_eq!(result.value, JsonValue::Object(Default::default()));
        assert_eq!(result.body, input);
    }

    #[test]
    fn parses_basic_yaml() {
        let input = "---\ntitle: Example\ntags:\n  - rust\n  - markdown\n---\n# Content";
        let result = extract(input);
        assert_eq!(result.body, "# Content");
        let title = result
            .value
            .get("title")
            .and_then(JsonValue::as_str)
            .expect("title should exist");
        assert_eq!(title, "Example");
    }

    #[test]
    fn keeps_crlf_body_byte_for_byte() {
        let input = "---\r\nsubject: Hello\r\ntags:\r\n  - tag1\r\n  - tag2\r\n---\r\n# Title\r\n\r\nGOOD `BYE` FRIEND\r\n";
        let result = extract(input);
        assert_eq!(result.body, "# Title\r\n\r\nGOOD `BYE` FRIEND\r\n");
        assert_eq!(
            result.value,
            serde_json::json!({ "subject": "Hello", "tags": ["tag1", "tag2"] })
        );
    }

    #[test]
    fn preserves_key_order() {
        let result = extract("---\nzeta: 1\nalpha: 2\nmid: 3\n---\n");
        let keys: Vec<&str> = result
            .value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn extraction_is_idempotent_on_stripped_body() {
        let input = "---\ntitle: Once\n---\nBody line\n\nMore\n";
        let first = extract(input);
        let second = extract(first.body);
        assert!(second.is_empty());
        assert_eq!(second.body, first.body);
    }

    #[test]
    fn handles_empty_block() {
        let input = "---\n---\n# Body";
        let result = extract(input);
        assert_eq!(result.value, JsonValue::Object(Default::default()));
        assert_eq!(result.body, "# Body");
    }

    #[test]
    fn accepts_yaml_document_end_marker() {
        let result = extract("---\nfoo: bar\n...\nBody");
        assert_eq!(result.value["foo"], "bar");
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn fences_allow_trailing_whitespace() {
        let result = extract("--- \t\r\ntitle: Spaced\r\n---  \r\nBody");
        assert_eq!(result.value["title"], "Spaced");
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn skips_bom_before_fence() {
        let input = "\u{feff}---\nfoo: bar\n---\nBody";
        let result = extract(input);
        assert_eq!(
            result.value.get("foo").and_then(JsonValue::as_str).unwrap(),
            "bar"
        );
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn fence_after_blank_lines_is_body() {
        let input = "\n---\nfoo: bar\n---\nBody";
        let result = extract(input);
        assert!(result.is_empty());
        assert_eq!(result.body, input);
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let input = "---\ninvalid: [unterminated\n---\n";
        let err = extract_frontmatter(input).unwrap_err();
        assert!(matches!(err, FrontmatterError::Parse(_)), "{err:?}");
    }

    #[test]
    fn errors_on_unterminated_block() {
        let input = "---\ntitle: test";
        let err = extract_frontmatter(input).unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated));
    }

    #[test]
    fn errors_on_scalar_root() {
        let err = extract_frontmatter("---\njust a string\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidRootType));
    }
}
