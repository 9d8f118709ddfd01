//! Code generation for the emitted ES module.
//!
//! A [`ModuleBuilder`] collects import statements, helper statements and
//! `export const` fragments, and renders them in that order. Each export the
//! loader can produce has its own `emit_*` function so fragments stay
//! independent of one another.

use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::Write as FmtWrite;

/// Converts a Rust string to a JavaScript string literal.
///
/// Uses JSON serialization, then escapes U+2028 and U+2029, which JSON allows
/// raw but older ECMAScript string literals do not.
///
/// # Examples
///
/// ```
/// use fmloader::codegen::js_string_literal;
///
/// assert_eq!(js_string_literal("hello"), "\"hello\"");
/// assert_eq!(js_string_literal("say \"hi\""), "\"say \\\"hi\\\"\"");
/// assert_eq!(js_string_literal("a\u{2028}b"), "\"a\\u2028b\"");
/// ```
pub fn js_string_literal(value: &str) -> String {
    let json = serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string());
    escape_line_separators(json)
}

/// Converts a JSON value to a JavaScript expression.
///
/// Object key order is kept as parsed.
pub fn js_value_literal(value: &JsonValue) -> String {
    let json = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
    escape_line_separators(json)
}

fn escape_line_separators(json: String) -> String {
    if !json.contains(['\u{2028}', '\u{2029}']) {
        return json;
    }
    json.replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Module-scope names the generated code declares for itself.
pub const RESERVED_BINDINGS: &[&str] = &["React", "FrontmatterMarkdown", "__vueRender"];

/// Local binding for a component's Pascal name.
///
/// A name that would clash with a [`RESERVED_BINDINGS`] entry gets a trailing
/// underscore. Pascal names are alphanumeric, so the result cannot clash with
/// another component.
///
/// # Examples
///
/// ```
/// use fmloader::codegen::component_binding;
///
/// assert_eq!(component_binding("MyWidget"), "MyWidget");
/// assert_eq!(component_binding("React"), "React_");
/// ```
pub fn component_binding(pascal: &str) -> Cow<'_, str> {
    if RESERVED_BINDINGS.contains(&pascal) {
        Cow::Owned(format!("{}_", pascal))
    } else {
        Cow::Borrowed(pascal)
    }
}

/// Normalizes an import statement for deduplication: whitespace outside
/// string literals is ignored.
fn normalize_import_key(statement: &str) -> String {
    let mut key = String::with_capacity(statement.len());
    let mut quote: Option<char> = None;
    let mut escape = false;

    for ch in statement.chars() {
        if escape {
            key.push(ch);
            escape = false;
            continue;
        }

        match (quote, ch) {
            (Some(_), '\\') => {
                key.push(ch);
                escape = true;
            }
            (Some(q), c) if c == q => {
                quote = None;
                key.push(ch);
            }
            (None, '\'' | '"' | '`') => {
                quote = Some(ch);
                key.push(ch);
            }
            (None, c) if c.is_whitespace() => {}
            _ => key.push(ch),
        }
    }

    key
}

/// Generated module text and the names it exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    /// ES module source.
    pub code: String,
    /// Exported binding names, in emission order.
    pub exports: Vec<String>,
}

/// Incrementally assembles an ES module.
#[derive(Debug, Default)]
pub struct ModuleBuilder {
    imports: Vec<String>,
    import_keys: HashSet<String>,
    statements: Vec<String>,
    exports: Vec<(String, String)>,
}

impl ModuleBuilder {
    /// Creates an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an import statement unless an equivalent one is already present.
    ///
    /// Returns true when the statement was added.
    pub fn import(&mut self, statement: impl Into<String>) -> bool {
        let statement = statement.into();
        if self.import_keys.insert(normalize_import_key(&statement)) {
            self.imports.push(statement);
            true
        } else {
            false
        }
    }

    /// Adds `import <binding> from "<path>";`.
    pub fn import_default(&mut self, binding: &str, path: &str) -> bool {
        self.import(format!("import {} from {};", binding, js_string_literal(path)))
    }

    /// Adds `import { <name> as <binding> } from "<path>";`, or the short form
    /// when both names agree.
    pub fn import_named(&mut self, name: &str, binding: &str, path: &str) -> bool {
        let specifier = if name == binding {
            name.to_string()
        } else {
            format!("{name} as {binding}")
        };
        self.import(format!(
            "import {{ {} }} from {};",
            specifier,
            js_string_literal(path)
        ))
    }

    /// Adds a top-level statement emitted after the imports.
    pub fn statement(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    /// Adds `export const <name> = <expression>;`.
    ///
    /// A second export with the same name replaces the first in place.
    pub fn export_const(&mut self, name: &str, expression: impl Into<String>) {
        let expression = expression.into();
        match self.exports.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = expression,
            None => self.exports.push((name.to_string(), expression)),
        }
    }

    /// Renders the module.
    pub fn finish(self) -> ModuleSource {
        let mut code = String::new();
        for import in &self.imports {
            let _ = writeln!(code, "{}", import);
        }
        for statement in &self.statements {
            let _ = writeln!(code, "{}", statement);
        }
        for (name, expression) in &self.exports {
            let _ = writeln!(code, "export const {} = {};", name, expression);
        }

        log::debug!(
            "generated module: {} import(s), {} export(s), {} bytes",
            self.imports.len(),
            self.exports.len(),
            code.len()
        );

        ModuleSource {
            code,
            exports: self.exports.into_iter().map(|(name, _)| name).collect(),
        }
    }
}

/// Emits `export const attributes = <object>;`.
pub fn emit_attributes(module: &mut ModuleBuilder, attributes: &JsonValue) {
    module.export_const("attributes", js_value_literal(attributes));
}

/// Emits `export const html = "<rendered>";`.
pub fn emit_html(module: &mut ModuleBuilder, html: &str) {
    module.export_const("html", js_string_literal(html));
}

/// Emits `export const body = "<raw body>";` with the body kept verbatim.
pub fn emit_body(module: &mut ModuleBuilder, body: &str) {
    module.export_const("body", js_string_literal(body));
}

/// Emits `export const meta = { "resourcePath": ... };`.
pub fn emit_meta(module: &mut ModuleBuilder, resource_path: &str) {
    module.export_const(
        "meta",
        format!("{{ \"resourcePath\": {} }}", js_string_literal(resource_path)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_js_string_literal() {
        assert_eq!(js_string_literal("line1\nline2"), "\"line1\\nline2\"");
        assert_eq!(js_string_literal("\r\n"), "\"\\r\\n\"");
        assert_eq!(js_string_literal("back\\slash"), "\"back\\\\slash\"");
        assert_eq!(js_string_literal("\u{2029}"), "\"\\u2029\"");
    }

    #[test]
    fn test_js_value_literal_keeps_key_order() {
        let value = json!({ "zeta": 1, "alpha": ["a\u{2028}"] });
        assert_eq!(js_value_literal(&value), "{\"zeta\":1,\"alpha\":[\"a\\u2028\"]}");
    }

    #[test]
    fn test_import_key_ignores_whitespace_outside_strings() {
        assert_eq!(
            normalize_import_key("import  A from \"./a b\" ;"),
            normalize_import_key("import A from \"./a b\";")
        );
        assert_ne!(
            normalize_import_key("import A from \"./a b\";"),
            normalize_import_key("import A from \"./ab\";")
        );
    }

    #[test]
    fn test_imports_are_deduplicated() {
        let mut module = ModuleBuilder::new();
        assert!(module.import_default("Widget", "./components/Widget"));
        assert!(!module.import("import Widget  from \"./components/Widget\";"));
        assert!(module.import_named("Card", "Card", "@ui/kit"));
        assert!(module.import_named("Card", "UiCard", "@ui/kit"));
        let output = module.finish();
        insta::assert_snapshot!(output.code, @r#"
        import Widget from "./components/Widget";
        import { Card } from "@ui/kit";
        import { Card as UiCard } from "@ui/kit";
        "#);
        assert!(output.exports.is_empty());
    }

    #[test]
    fn test_module_sections_render_in_order() {
        let mut module = ModuleBuilder::new();
        emit_attributes(&mut module, &json!({ "subject": "Hello" }));
        emit_meta(&mut module, "/somewhere/frontmatter.md");
        module.statement("const __render = null;");
        module.import_default("React", "react");

        let output = module.finish();
        assert_eq!(output.exports, ["attributes", "meta"]);
        insta::assert_snapshot!(output.code, @r#"
        import React from "react";
        const __render = null;
        export const attributes = {"subject":"Hello"};
        export const meta = { "resourcePath": "/somewhere/frontmatter.md" };
        "#);
    }

    #[test]
    fn test_emit_body_is_verbatim() {
        let mut module = ModuleBuilder::new();
        emit_body(&mut module, "# Title\r\n\r\nGOOD `BYE` FRIEND\r\n");
        let output = module.finish();
        assert_eq!(
            output.code,
            "export const body = \"# Title\\r\\n\\r\\nGOOD `BYE` FRIEND\\r\\n\";\n"
        );
    }

    #[test]
    fn test_export_const_replaces_same_name() {
        let mut module = ModuleBuilder::new();
        emit_html(&mut module, "<p>a</p>");
        emit_html(&mut module, "<p>b</p>");
        let output = module.finish();
        assert_eq!(output.exports, ["html"]);
        assert_eq!(output.code, "export const html = \"<p>b</p>\";\n");
    }
}
