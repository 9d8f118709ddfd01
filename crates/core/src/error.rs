use crate::frontmatter::FrontmatterError;
use thiserror::Error;

/// Boxed error raised by caller-supplied collaborators (renderers, template compilers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that abort a single load.
///
/// Every variant is fatal: a failed load never yields a partial module.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The frontmatter block is unterminated or is not valid YAML.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    /// A custom render function was combined with another renderer channel.
    #[error(
        "conflicting markdown renderer configuration: {supplied} cannot be combined with a custom render function"
    )]
    ConflictingRendererConfig {
        /// The channel supplied alongside the custom function.
        supplied: &'static str,
    },
    /// The built-in markdown renderer rejected the body.
    #[error("Markdown error at {location}: {message}")]
    Markdown {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// A caller-supplied render function or renderer instance failed.
    #[error(transparent)]
    Renderer(BoxError),
    /// A framework mode was requested without a template compiler for it.
    #[error("mode `{mode}` requires a {framework} template compiler, but none was registered")]
    MissingTemplateCompiler {
        /// Mode token that requested the framework.
        mode: &'static str,
        /// Human readable framework name.
        framework: &'static str,
    },
    /// The framework template compiler failed; its error is surfaced as-is.
    #[error(transparent)]
    Template(BoxError),
    /// Rewriting rendered HTML into a framework template failed.
    #[error("HTML rewrite error: {0}")]
    Rewrite(String),
    /// Loader configuration could not be parsed.
    #[error("invalid loader configuration: {0}")]
    Config(String),
}

impl LoaderError {
    /// Create a markdown error with location
    pub fn markdown(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::Markdown {
            message: message.into(),
            location,
        }
    }

    /// Wrap a caller renderer failure.
    pub fn renderer(error: impl Into<BoxError>) -> Self {
        Self::Renderer(error.into())
    }

    /// Wrap a template compiler failure.
    pub fn template(error: impl Into<BoxError>) -> Self {
        Self::Template(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_errors_carry_their_location() {
        let err = LoaderError::markdown("unexpected end", SourceLocation::new(3, 7));
        assert_eq!(err.to_string(), "Markdown error at 3:7: unexpected end");
    }

    #[test]
    fn template_errors_keep_their_message() {
        let err = LoaderError::template("unexpected token `<` at 1:4");
        assert_eq!(err.to_string(), "unexpected token `<` at 1:4");
    }

    #[test]
    fn conflicting_config_names_the_channel() {
        let err = LoaderError::ConflictingRendererConfig {
            supplied: "renderer options",
        };
        assert!(err.to_string().contains("renderer options"));
    }
}
