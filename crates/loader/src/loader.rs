//! The load pipeline: frontmatter, rendering, component discovery, codegen.

use crate::codegen::{
    ModuleBuilder, ModuleSource, emit_attributes, emit_body, emit_html, emit_meta,
};
use crate::framework::{
    Framework, ReactFramework, TemplateCompiler, VueFramework, emit_component_imports,
};
use crate::options::{ComponentRegistry, LoaderOptions};
use fmloader_core::{
    BoxError, ComponentReference, LoaderError, MarkdownRenderer, Mode, ModeSet, RenderConfig,
    RenderFn, extract_frontmatter, scan_custom_elements,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Result of loading one document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOutput {
    /// Generated ES module source.
    pub code: String,
    /// Names exported by the module, in emission order.
    pub exports: Vec<String>,
    /// Parsed frontmatter.
    pub attributes: JsonValue,
    /// Custom components referenced by the document. Empty unless a
    /// framework mode is active.
    pub components: Vec<ComponentReference>,
}

/// Collects configuration and caller collaborators for a [`Loader`].
#[derive(Default)]
pub struct LoaderBuilder {
    options: LoaderOptions,
    render_fn: Option<RenderFn>,
    renderer: Option<Arc<dyn MarkdownRenderer>>,
    vue_compiler: Option<Box<dyn TemplateCompiler>>,
    react_compiler: Option<Box<dyn TemplateCompiler>>,
}

impl LoaderBuilder {
    /// Replaces the serializable options.
    pub fn options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Uses a custom function to render markdown. Its output is used verbatim.
    pub fn markdown_render_fn<F>(mut self, render: F) -> Self
    where
        F: Fn(&str) -> Result<String, BoxError> + 'static,
    {
        self.render_fn = Some(Box::new(render));
        self
    }

    /// Uses a pre-configured renderer instance.
    pub fn markdown_renderer<R>(mut self, renderer: R) -> Self
    where
        R: MarkdownRenderer + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Registers the Vue template compiler. It receives the prepared template
    /// and returns a render function expression.
    pub fn vue_compiler<F>(mut self, compiler: F) -> Self
    where
        F: Fn(&str) -> Result<String, BoxError> + 'static,
    {
        self.vue_compiler = Some(Box::new(compiler));
        self
    }

    /// Registers the React JSX compiler. It receives JSX markup and returns
    /// an element expression.
    pub fn react_compiler<F>(mut self, compiler: F) -> Self
    where
        F: Fn(&str) -> Result<String, BoxError> + 'static,
    {
        self.react_compiler = Some(Box::new(compiler));
        self
    }

    /// Validates the configuration and builds the loader.
    ///
    /// Fails when renderer channels conflict or when a framework mode has no
    /// template compiler.
    pub fn build(self) -> Result<Loader, LoaderError> {
        let LoaderBuilder {
            options,
            render_fn,
            renderer,
            mut vue_compiler,
            mut react_compiler,
        } = self;

        let modes = options.modes();
        let render = RenderConfig::resolve(
            render_fn,
            renderer,
            options.markdown_renderer_options.as_ref(),
        )?;

        let mut frameworks: Vec<Box<dyn Framework>> = Vec::new();
        for mode in modes.frameworks() {
            match mode {
                Mode::Vue => {
                    let compiler = vue_compiler
                        .take()
                        .ok_or_else(|| missing_compiler(mode, "Vue"))?;
                    frameworks.push(Box::new(VueFramework::new(
                        options.vue.root_class(),
                        compiler,
                    )));
                }
                Mode::React => {
                    let compiler = react_compiler
                        .take()
                        .ok_or_else(|| missing_compiler(mode, "React"))?;
                    frameworks.push(Box::new(ReactFramework::new(
                        options.react.root_class(),
                        compiler,
                    )));
                }
                Mode::Html | Mode::Body | Mode::Meta => {}
            }
        }

        if vue_compiler.is_some() || react_compiler.is_some() {
            log::debug!("template compiler registered for an inactive mode; ignoring it");
        }

        log::debug!(
            "loader built: modes {:?}, {} renderer channel",
            modes,
            render.channel()
        );

        Ok(Loader {
            modes,
            render,
            frameworks,
            registry: ComponentRegistry::from_options(&options),
        })
    }
}

fn missing_compiler(mode: Mode, framework: &'static str) -> LoaderError {
    LoaderError::MissingTemplateCompiler {
        mode: mode.as_str(),
        framework,
    }
}

/// Converts frontmatter markdown documents into ES modules.
///
/// A loader is immutable once built and can be reused for any number of
/// documents.
///
/// # Examples
///
/// ```
/// use fmloader::{Loader, LoaderOptions};
///
/// let loader = Loader::builder()
///     .options(LoaderOptions::from_json(r#"{"mode": ["body", "meta"]}"#).unwrap())
///     .build()
///     .unwrap();
/// let output = loader
///     .load("---\ntitle: Hi\n---\nHello", "/docs/hi.md")
///     .unwrap();
///
/// assert_eq!(output.exports, ["attributes", "body", "meta"]);
/// assert!(output.code.contains("export const body = \"Hello\";"));
/// ```
pub struct Loader {
    modes: ModeSet,
    render: RenderConfig,
    frameworks: Vec<Box<dyn Framework>>,
    registry: ComponentRegistry,
}

impl Loader {
    /// Starts building a loader.
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::default()
    }

    /// Builds a loader from options alone, using the built-in renderer.
    pub fn from_options(options: LoaderOptions) -> Result<Self, LoaderError> {
        Self::builder().options(options).build()
    }

    /// The resolved mode set.
    pub fn modes(&self) -> ModeSet {
        self.modes
    }

    /// Loads one document. `resource_path` is only reported in `meta`.
    ///
    /// Any failure aborts the load; no partial module is returned.
    pub fn load(&self, source: &str, resource_path: &str) -> Result<LoadOutput, LoaderError> {
        let extraction = extract_frontmatter(source)?;
        let mut module = ModuleBuilder::new();

        emit_attributes(&mut module, &extraction.value);

        let html = if self.modes.needs_html() {
            Some(self.render.render(extraction.body)?)
        } else {
            None
        };

        if let Some(html) = &html
            && self.modes.contains(Mode::Html)
        {
            emit_html(&mut module, html);
        }
        if self.modes.contains(Mode::Body) {
            emit_body(&mut module, extraction.body);
        }
        if self.modes.contains(Mode::Meta) {
            emit_meta(&mut module, resource_path);
        }

        let mut components = Vec::new();
        if let Some(html) = &html
            && !self.frameworks.is_empty()
        {
            components = scan_custom_elements(html);
            emit_component_imports(&mut module, &self.registry, &components);
            for framework in &self.frameworks {
                framework.render_component(&mut module, html, &components)?;
            }
        }

        let ModuleSource { code, exports } = module.finish();
        log::debug!("loaded {}: exports {:?}", resource_path, exports);

        Ok(LoadOutput {
            code,
            exports,
            attributes: extraction.value,
            components,
        })
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("modes", &self.modes)
            .field("render", &self.render)
            .field(
                "frameworks",
                &self.frameworks.iter().map(|fw| fw.mode()).collect::<Vec<_>>(),
            )
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(json: &str) -> LoaderOptions {
        LoaderOptions::from_json(json).unwrap()
    }

    #[test]
    fn default_mode_exports_attributes_and_html() {
        let loader = Loader::from_options(LoaderOptions::default()).unwrap();
        let output = loader.load("# Hi", "/a.md").unwrap();
        assert_eq!(output.exports, ["attributes", "html"]);
        assert!(output.components.is_empty());
    }

    #[test]
    fn framework_mode_without_compiler_fails_at_build() {
        let err = Loader::from_options(options(r#"{"mode": ["react-component"]}"#)).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::MissingTemplateCompiler {
                mode: "react-component",
                framework: "React"
            }
        ));
    }

    #[test]
    fn unused_compiler_is_ignored() {
        let loader = Loader::builder()
            .vue_compiler(|_: &str| -> Result<String, BoxError> { Ok("null".to_string()) })
            .build()
            .unwrap();
        let output = loader.load("<my-widget></my-widget>", "/a.md").unwrap();
        assert_eq!(output.exports, ["attributes", "html"]);
        assert!(output.components.is_empty());
        assert!(!output.code.contains("import"));
    }

    #[test]
    fn body_only_skips_rendering() {
        let loader = Loader::builder()
            .options(options(r#"{"mode": ["body"]}"#))
            .markdown_render_fn(|_: &str| -> Result<String, BoxError> {
                Err("renderer must not run".into())
            })
            .build()
            .unwrap();
        let output = loader.load("text", "/a.md").unwrap();
        assert_eq!(output.exports, ["attributes", "body"]);
    }

    #[test]
    fn loader_debug_lists_frameworks() {
        let loader = Loader::builder()
            .options(options(r#"{"mode": ["vue-component"]}"#))
            .vue_compiler(|_: &str| -> Result<String, BoxError> { Ok("null".to_string()) })
            .build()
            .unwrap();
        let debug = format!("{loader:?}");
        assert!(debug.contains("frameworks: [Vue]"), "{debug}");
    }
}
