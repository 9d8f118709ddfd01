//! Markdown-to-HTML rendering through one of three caller channels.

use crate::{BoxError, LoaderError, SourceLocation};
use markdown::mdast::Node;
use markdown::message::{Message, Place};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A pre-configured markdown renderer.
pub trait MarkdownRenderer {
    /// Render a markdown body to HTML.
    fn render(&self, body: &str) -> Result<String, LoaderError>;
}

impl<R> MarkdownRenderer for Arc<R>
where
    R: MarkdownRenderer + ?Sized,
{
    fn render(&self, body: &str) -> Result<String, LoaderError> {
        (**self).render(body)
    }
}

/// Caller-supplied render function; its output is used verbatim.
pub type RenderFn = Box<dyn Fn(&str) -> Result<String, BoxError>>;

/// Options for the built-in renderer. Unset fields keep the baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RendererOptions {
    /// Pass raw HTML (including custom element tags) through. Defaults to true.
    pub html: Option<bool>,
    /// Enable GitHub Flavored Markdown constructs. Defaults to true.
    pub gfm: Option<bool>,
    /// Turn bare URLs into links. Defaults to false.
    pub linkify: Option<bool>,
    /// Allow `javascript:` and other unsafe link protocols. Defaults to false.
    pub dangerous_protocol: Option<bool>,
    /// Enable `$inline$` and `$$block$$` math. Defaults to false.
    pub math_syntax: Option<bool>,
    /// Render soft line breaks inside paragraphs as `<br />`. Defaults to false.
    pub breaks: Option<bool>,
}

impl RendererOptions {
    /// True when the caller left every option unset.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Convert to markdown-rs `Options`.
    pub fn to_markdown(&self) -> markdown::Options {
        let html = self.html.unwrap_or(true);
        let gfm = self.gfm.unwrap_or(true);
        let math = self.math_syntax.unwrap_or(false);

        let mut constructs = markdown::Constructs {
            html_flow: html,
            html_text: html,
            ..markdown::Constructs::default()
        };

        if gfm {
            constructs.gfm_autolink_literal = self.linkify.unwrap_or(false);
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if math {
            constructs.math_flow = true;
            constructs.math_text = true;
        }

        markdown::Options {
            parse: markdown::ParseOptions {
                constructs,
                math_text_single_dollar: math,
                ..markdown::ParseOptions::default()
            },
            compile: markdown::CompileOptions {
                allow_dangerous_html: html,
                allow_dangerous_protocol: self.dangerous_protocol.unwrap_or(false),
                default_line_ending: markdown::LineEnding::LineFeed,
                ..markdown::CompileOptions::default()
            },
        }
    }
}

/// Built-in renderer backed by markdown-rs.
///
/// Fenced code blocks carry `class="language-xxx"` on their `<code>` element.
/// Output always uses `\n` line endings and ends with one when non-empty.
pub struct DefaultRenderer {
    options: markdown::Options,
    breaks: bool,
}

impl DefaultRenderer {
    /// Create a renderer from caller options.
    pub fn new(options: &RendererOptions) -> Self {
        Self {
            options: options.to_markdown(),
            breaks: options.breaks.unwrap_or(false),
        }
    }
}

impl Default for DefaultRenderer {
    fn default() -> Self {
        Self::new(&RendererOptions::default())
    }
}

impl MarkdownRenderer for DefaultRenderer {
    fn render(&self, body: &str) -> Result<String, LoaderError> {
        let mut source = normalize_line_endings(body);
        if self.breaks {
            source = hard_breaks(&source, &self.options.parse)?;
        }

        let mut html = markdown::to_html_with_options(&source, &self.options)
            .map_err(|err| markdown_error(&err))?;
        if !html.is_empty() && !html.ends_with('\n') {
            html.push('\n');
        }
        Ok(html)
    }
}

fn normalize_line_endings(body: &str) -> String {
    body.replace("\r\n", "\n").replace('\r', "\n")
}

/// Turns every soft line break inside a paragraph into a backslash hard break.
///
/// Line endings are located through the mdast, so code, HTML and link
/// destinations are left alone.
fn hard_breaks(source: &str, options: &markdown::ParseOptions) -> Result<String, LoaderError> {
    let tree = markdown::to_mdast(source, options).map_err(|err| markdown_error(&err))?;

    let mut offsets = Vec::new();
    collect_soft_breaks(&tree, source, false, &mut offsets);
    if offsets.is_empty() {
        return Ok(source.to_string());
    }
    offsets.sort_unstable();
    offsets.dedup();
    log::trace!("inserting {} hard breaks", offsets.len());

    let mut out = String::with_capacity(source.len() + offsets.len());
    let mut last = 0;
    for offset in offsets {
        out.push_str(&source[last..offset]);
        out.push('\\');
        last = offset;
    }
    out.push_str(&source[last..]);
    Ok(out)
}

fn collect_soft_breaks(node: &Node, source: &str, in_paragraph: bool, offsets: &mut Vec<usize>) {
    match node {
        Node::Text(_) if in_paragraph => {
            let Some(position) = node.position() else {
                return;
            };
            let Some(slice) = source.get(position.start.offset..position.end.offset) else {
                return;
            };
            offsets.extend(
                slice
                    .match_indices('\n')
                    .map(|(index, _)| position.start.offset + index),
            );
        }
        _ => {
            let in_paragraph = in_paragraph || matches!(node, Node::Paragraph(_));
            for child in node.children().into_iter().flatten() {
                collect_soft_breaks(child, source, in_paragraph, offsets);
            }
        }
    }
}

fn markdown_error(message: &Message) -> LoaderError {
    LoaderError::markdown(message.to_string(), message_location(message))
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}

/// The single renderer channel in effect for a loader.
pub enum RenderConfig {
    /// Caller function, output used verbatim.
    Function(RenderFn),
    /// Caller renderer instance.
    Instance(Arc<dyn MarkdownRenderer>),
    /// Built-in renderer configured from options.
    Options(DefaultRenderer),
}

impl RenderConfig {
    /// Picks the active channel from what the caller supplied.
    ///
    /// A render function excludes both an instance and non-empty options.
    /// An instance excludes non-empty options.
    pub fn resolve(
        function: Option<RenderFn>,
        instance: Option<Arc<dyn MarkdownRenderer>>,
        options: Option<&RendererOptions>,
    ) -> Result<Self, LoaderError> {
        let has_options = options.is_some_and(|options| !options.is_empty());

        match (function, instance) {
            (Some(_), Some(_)) => Err(LoaderError::ConflictingRendererConfig {
                supplied: "a renderer instance",
            }),
            (Some(_), None) if has_options => Err(LoaderError::ConflictingRendererConfig {
                supplied: "renderer options",
            }),
            (Some(function), None) => Ok(Self::Function(function)),
            (None, Some(_)) if has_options => Err(LoaderError::ConflictingRendererConfig {
                supplied: "renderer options alongside an instance",
            }),
            (None, Some(instance)) => Ok(Self::Instance(instance)),
            (None, None) => Ok(Self::Options(DefaultRenderer::new(
                options.unwrap_or(&RendererOptions::default()),
            ))),
        }
    }

    /// Short channel name for diagnostics.
    pub fn channel(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Instance(_) => "instance",
            Self::Options(_) => "options",
        }
    }

    /// Render the body through the active channel.
    pub fn render(&self, body: &str) -> Result<String, LoaderError> {
        log::debug!(
            "rendering markdown body ({} bytes) via {} channel",
            body.len(),
            self.channel()
        );
        match self {
            Self::Function(function) => function(body).map_err(LoaderError::renderer),
            Self::Instance(instance) => instance.render(body),
            Self::Options(renderer) => renderer.render(body),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::Options(DefaultRenderer::default())
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RenderConfig").field(&self.channel()).finish()
    }
}
