#![deny(missing_docs)]
//! fmloader: turns frontmatter markdown into an ES module exposing the parsed
//! attributes, rendered HTML, raw body, file metadata, and optional Vue and
//! React components.

/// ES module code generation.
pub mod codegen;
/// Vue and React component backends.
pub mod framework;
/// The load pipeline.
pub mod loader;
/// Loader configuration and the component registry.
pub mod options;

pub use fmloader_core::{
    BoxError, ComponentReference, LoaderError, MarkdownRenderer, Mode, ModeSet, RendererOptions,
};
pub use framework::{Framework, ReactFramework, TemplateCompiler, VueFramework};
pub use loader::{LoadOutput, Loader, LoaderBuilder};
pub use options::{
    ComponentDefinition, ComponentImport, ComponentRegistry, ExportType, FrameworkOptions,
    LoaderOptions,
};
