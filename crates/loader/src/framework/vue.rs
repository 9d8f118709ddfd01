use super::{Framework, TemplateCompiler, compile_with};
use crate::codegen::{ModuleBuilder, component_binding, js_string_literal};
use fmloader_core::{ComponentReference, LoaderError, Mode};
use lol_html::{ElementContentHandlers, RewriteStrSettings, Selector, element, rewrite_str};
use std::borrow::Cow;

/// Binding that holds the compiled render function.
const RENDER_BINDING: &str = "__vueRender";

/// Vue component output, exported as `vue`.
pub struct VueFramework {
    root_class: String,
    compiler: Box<dyn TemplateCompiler>,
}

impl VueFramework {
    /// Creates the backend with the given root class and render compiler.
    pub fn new(root_class: impl Into<String>, compiler: Box<dyn TemplateCompiler>) -> Self {
        Self {
            root_class: root_class.into(),
            compiler,
        }
    }
}

/// Marks code samples so mustache syntax inside them is not interpolated.
fn code_v_pre_handler() -> (Cow<'static, Selector>, ElementContentHandlers<'static>) {
    element!("code", |el| {
        el.set_attribute("v-pre", "")?;
        Ok(())
    })
}

impl Framework for VueFramework {
    fn mode(&self) -> Mode {
        Mode::Vue
    }

    fn prepare_template(&self, html: &str) -> Result<String, LoaderError> {
        let rewritten = rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![code_v_pre_handler()],
                ..RewriteStrSettings::new()
            },
        )
        .map_err(|err| LoaderError::Rewrite(err.to_string()))?;

        Ok(format!(
            "<div class=\"{}\">{}</div>",
            html_escape::encode_double_quoted_attribute(&self.root_class),
            rewritten
        ))
    }

    fn compile_template(&self, template: &str) -> Result<String, LoaderError> {
        compile_with(self.compiler.as_ref(), template)
    }

    fn emit_component(
        &self,
        module: &mut ModuleBuilder,
        compiled: &str,
        components: &[ComponentReference],
    ) {
        module.statement(format!("const {} = {};", RENDER_BINDING, compiled));

        let registrations = components
            .iter()
            .map(|reference| {
                let pascal = reference.pascal.as_str();
                match component_binding(pascal) {
                    Cow::Borrowed(binding) => binding.to_string(),
                    Cow::Owned(binding) => format!("{}: {}", pascal, binding),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let components_object = if registrations.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", registrations)
        };

        module.export_const(
            "vue",
            format!(
                "{{ render: {render}, component: {{ name: {name}, components: {components}, render: {render} }} }}",
                render = RENDER_BINDING,
                name = js_string_literal("FrontmatterMarkdown"),
                components = components_object,
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmloader_core::BoxError;

    fn echo_compiler() -> Box<dyn TemplateCompiler> {
        Box::new(|template: &str| -> Result<String, BoxError> {
            Ok(format!("function render() {{ return {}; }}", js_string_literal(template)))
        })
    }

    #[test]
    fn wraps_html_in_root_and_marks_code() {
        let vue = VueFramework::new("frontmatter-markdown", echo_compiler());
        let template = vue
            .prepare_template("<p>GOOD <code>BYE</code> FRIEND</p>")
            .unwrap();
        assert_eq!(
            template,
            "<div class=\"frontmatter-markdown\"><p>GOOD <code v-pre=\"\">BYE</code> FRIEND</p></div>"
        );
    }

    #[test]
    fn keeps_code_class_and_custom_root() {
        let vue = VueFramework::new("my-\"doc\"", echo_compiler());
        let template = vue
            .prepare_template("<pre><code class=\"language-js\">{{ x }}</code></pre>")
            .unwrap();
        assert!(template.starts_with("<div class=\"my-&quot;doc&quot;\">"), "{template}");
        assert!(
            template.contains("<code class=\"language-js\" v-pre=\"\">{{ x }}</code>"),
            "{template}"
        );
    }

    #[test]
    fn keeps_custom_element_tags() {
        let vue = VueFramework::new("frontmatter-markdown", echo_compiler());
        let template = vue
            .prepare_template("<child-component></child-component><MyWidget />")
            .unwrap();
        assert!(template.contains("<child-component></child-component>"), "{template}");
        assert!(template.contains("<MyWidget />"), "{template}");
    }

    #[test]
    fn emits_render_and_component_registration() {
        let vue = VueFramework::new("frontmatter-markdown", echo_compiler());
        let mut module = ModuleBuilder::new();
        let components = vec![
            ComponentReference::from_tag("child-component"),
            ComponentReference::from_tag("MyWidget"),
        ];
        vue.render_component(&mut module, "<child-component></child-component>", &components)
            .unwrap();

        let output = module.finish();
        assert_eq!(output.exports, ["vue"]);
        assert!(output.code.starts_with("const __vueRender = function render()"));
        assert!(output.code.contains(
            "export const vue = { render: __vueRender, component: { name: \"FrontmatterMarkdown\", components: { ChildComponent, MyWidget }, render: __vueRender } };"
        ));
    }

    #[test]
    fn empty_component_registration() {
        let vue = VueFramework::new("frontmatter-markdown", echo_compiler());
        let mut module = ModuleBuilder::new();
        vue.emit_component(&mut module, "null", &[]);
        assert!(module.finish().code.contains("components: {}"));
    }

    #[test]
    fn reserved_component_names_register_under_their_tag() {
        let vue = VueFramework::new("frontmatter-markdown", echo_compiler());
        let mut module = ModuleBuilder::new();
        vue.emit_component(&mut module, "null", &[ComponentReference::from_tag("React")]);
        assert!(module.finish().code.contains("components: { React: React_ }"));
    }

}
