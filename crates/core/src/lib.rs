#![deny(missing_docs)]
//! fmloader core: frontmatter extraction, output modes, markdown rendering, and
//! custom element detection.

/// Custom element detection in rendered HTML.
pub mod elements;
/// Core error types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// Output mode tokens and sets.
pub mod mode;
/// Tag and binding name conversion.
pub mod naming;
/// Markdown renderer channels.
pub mod render;

pub use elements::{ComponentReference, is_custom_element, scan_custom_elements};
pub use error::{BoxError, LoaderError, SourceLocation};
pub use frontmatter::{FrontmatterError, FrontmatterExtraction, extract_frontmatter};
pub use mode::{Mode, ModeSet, UnknownMode};
pub use naming::{to_kebab_case, to_pascal_case};
pub use render::{DefaultRenderer, MarkdownRenderer, RenderConfig, RenderFn, RendererOptions};
