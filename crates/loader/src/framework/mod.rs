//! UI framework component backends.

use crate::codegen::ModuleBuilder;
use crate::options::ComponentRegistry;
use fmloader_core::{BoxError, ComponentReference, LoaderError, Mode};

/// JSX conversion of rendered HTML.
pub mod jsx;
/// React component backend.
pub mod react;
/// Vue component backend.
pub mod vue;

pub use react::ReactFramework;
pub use vue::VueFramework;

/// Compiles framework template markup into a JavaScript expression.
///
/// For Vue this is a render function; for React it is the compiled JSX
/// element expression.
pub trait TemplateCompiler {
    /// Compile a prepared template.
    fn compile(&self, template: &str) -> Result<String, BoxError>;
}

impl<F> TemplateCompiler for F
where
    F: Fn(&str) -> Result<String, BoxError>,
{
    fn compile(&self, template: &str) -> Result<String, BoxError> {
        self(template)
    }
}

/// A UI framework that can wrap the rendered document as a component.
pub trait Framework {
    /// The mode that requests this framework.
    fn mode(&self) -> Mode;

    /// Turns rendered HTML into template markup for the framework compiler.
    fn prepare_template(&self, html: &str) -> Result<String, LoaderError>;

    /// Runs the external template compiler. Its errors surface unchanged.
    fn compile_template(&self, template: &str) -> Result<String, LoaderError>;

    /// Emits the component export built from the compiled template.
    fn emit_component(
        &self,
        module: &mut ModuleBuilder,
        compiled: &str,
        components: &[ComponentReference],
    );

    /// Prepares, compiles and emits the component in one step.
    fn render_component(
        &self,
        module: &mut ModuleBuilder,
        html: &str,
        components: &[ComponentReference],
    ) -> Result<(), LoaderError> {
        let template = self.prepare_template(html)?;
        log::debug!(
            "{} template prepared ({} bytes)",
            self.mode(),
            template.len()
        );
        let compiled = self.compile_template(&template)?;
        self.emit_component(module, &compiled, components);
        Ok(())
    }
}

/// Emits one import per component reference.
///
/// Imports are shared by every framework export in the module.
pub fn emit_component_imports(
    module: &mut ModuleBuilder,
    registry: &ComponentRegistry,
    components: &[ComponentReference],
) {
    for reference in components {
        let import = registry.resolve(reference);
        let added = match &import.named {
            Some(name) => module.import_named(name, &import.binding, &import.path),
            None => module.import_default(&import.binding, &import.path),
        };
        if added {
            log::trace!("import {} from {}", import.binding, import.path);
        }
    }
}

pub(crate) fn compile_with(
    compiler: &dyn TemplateCompiler,
    template: &str,
) -> Result<String, LoaderError> {
    compiler.compile(template).map_err(LoaderError::template)
}
