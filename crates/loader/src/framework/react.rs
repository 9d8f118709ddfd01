use super::jsx::html_to_jsx;
use super::{Framework, TemplateCompiler, compile_with};
use crate::codegen::{ModuleBuilder, js_string_literal};
use fmloader_core::{ComponentReference, LoaderError, Mode};

/// React function component output, exported as `react`.
pub struct ReactFramework {
    root_class: String,
    compiler: Box<dyn TemplateCompiler>,
}

impl ReactFramework {
    /// Creates the backend with the given root class and JSX compiler.
    pub fn new(root_class: impl Into<String>, compiler: Box<dyn TemplateCompiler>) -> Self {
        Self {
            root_class: root_class.into(),
            compiler,
        }
    }

    fn root_attribute(&self) -> String {
        if self.root_class.contains('"') {
            format!("className={{{}}}", js_string_literal(&self.root_class))
        } else {
            format!("className=\"{}\"", self.root_class)
        }
    }
}

impl Framework for ReactFramework {
    fn mode(&self) -> Mode {
        Mode::React
    }

    fn prepare_template(&self, html: &str) -> Result<String, LoaderError> {
        Ok(format!(
            "<div {}>{}</div>",
            self.root_attribute(),
            html_to_jsx(html)
        ))
    }

    fn compile_template(&self, template: &str) -> Result<String, LoaderError> {
        compile_with(self.compiler.as_ref(), template)
    }

    fn emit_component(
        &self,
        module: &mut ModuleBuilder,
        compiled: &str,
        _components: &[ComponentReference],
    ) {
        // A component named `React` is bound as `React_`; see `component_binding`.
        module.import_default("React", "react");
        module.export_const(
            "react",
            format!(
                "function FrontmatterMarkdown(props) {{ return {}; }}",
                compiled
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmloader_core::BoxError;

    fn passthrough() -> Box<dyn TemplateCompiler> {
        Box::new(|template: &str| -> Result<String, BoxError> { Ok(format!("({template})")) })
    }

    #[test]
    fn wraps_jsx_in_root() {
        let react = ReactFramework::new("frontmatter-markdown", passthrough());
        let html = "<h1>Title</h1>\n<p class=\"x\"><child-component></child-component></p>";
        let template = react.prepare_template(html).unwrap();
        assert_eq!(
            template,
            "<div className=\"frontmatter-markdown\"><h1>Title</h1>\n<p className=\"x\"><ChildComponent></ChildComponent></p></div>"
        );
    }

    #[test]
    fn quotes_unusual_root_classes() {
        let react = ReactFramework::new("a\"b", passthrough());
        let template = react.prepare_template("").unwrap();
        assert_eq!(template, "<div className={\"a\\\"b\"}></div>");
    }

    #[test]
    fn emits_function_component() {
        let react = ReactFramework::new("frontmatter-markdown", passthrough());
        let mut module = ModuleBuilder::new();
        react.render_component(&mut module, "<p>x</p>", &[]).unwrap();

        let output = module.finish();
        assert_eq!(output.exports, ["react"]);
        insta::assert_snapshot!(output.code, @r#"
        import React from "react";
        export const react = function FrontmatterMarkdown(props) { return (<div className="frontmatter-markdown"><p>x</p></div>); };
        "#);
    }

    #[test]
    fn compiler_failure_aborts_component() {
        let react = ReactFramework::new(
            "frontmatter-markdown",
            Box::new(|_: &str| -> Result<String, BoxError> { Err("JSX syntax error".into()) }),
        );
        let mut module = ModuleBuilder::new();
        let err = react.render_component(&mut module, "<p>x</p>", &[]).unwrap_err();
        assert_eq!(err.to_string(), "JSX syntax error");
        assert!(module.finish().exports.is_empty());
    }
}
