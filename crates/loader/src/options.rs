//! Loader configuration and the component import registry.

use crate::codegen::component_binding;
use fmloader_core::{ComponentReference, LoaderError, ModeSet, RendererOptions, to_kebab_case};
use serde::{Deserialize, Serialize};

/// Import prefix used for components without a registry entry.
pub const DEFAULT_COMPONENT_IMPORT_PREFIX: &str = "./components/";

/// CSS class of the root element wrapping framework components.
pub const DEFAULT_ROOT_CLASS: &str = "frontmatter-markdown";

/// Serializable loader configuration.
///
/// Channels that cannot be expressed as data (render functions, renderer
/// instances, template compilers) are registered on
/// [`LoaderBuilder`](crate::LoaderBuilder) instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoaderOptions {
    /// Requested mode tokens. `None` selects the default set.
    pub mode: Option<Vec<String>>,
    /// Options for the built-in markdown renderer.
    pub markdown_renderer_options: Option<RendererOptions>,
    /// Import path prefix for components without a registry entry.
    pub component_import_prefix: Option<String>,
    /// Explicit component import locations.
    pub components: Vec<ComponentDefinition>,
    /// Vue component options.
    pub vue: FrameworkOptions,
    /// React component options.
    pub react: FrameworkOptions,
}

impl LoaderOptions {
    /// Parses options from a JSON document. Unknown fields are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use fmloader::LoaderOptions;
    ///
    /// let options = LoaderOptions::from_json(r#"{"mode": ["body", "meta"]}"#).unwrap();
    /// assert_eq!(options.mode.as_deref(), Some(&["body".to_string(), "meta".to_string()][..]));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, LoaderError> {
        serde_json::from_str(json).map_err(|err| LoaderError::Config(err.to_string()))
    }

    /// Resolves the requested tokens into a mode set.
    pub fn modes(&self) -> ModeSet {
        ModeSet::resolve(self.mode.as_deref())
    }

    /// The effective component import prefix.
    pub fn component_import_prefix(&self) -> &str {
        self.component_import_prefix
            .as_deref()
            .unwrap_or(DEFAULT_COMPONENT_IMPORT_PREFIX)
    }
}

/// Per-framework options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameworkOptions {
    /// CSS class of the wrapping root element.
    pub root: Option<String>,
}

impl FrameworkOptions {
    /// The effective root class.
    pub fn root_class(&self) -> &str {
        self.root.as_deref().unwrap_or(DEFAULT_ROOT_CLASS)
    }
}

/// How a component is exported from its module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    /// `export default`.
    #[default]
    Default,
    /// A named export matching [`ComponentDefinition::name`].
    Named,
}

/// A single component import location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// Component name, in tag or Pascal spelling (e.g. "my-widget", "MyWidget").
    pub name: String,
    /// Module path for the import (e.g. "@ui/widgets").
    pub module_path: String,
    /// Export type: "named" or "default".
    #[serde(default)]
    pub export_type: ExportType,
}

impl ComponentDefinition {
    /// Whether this definition covers the given reference.
    pub fn matches(&self, reference: &ComponentReference) -> bool {
        to_kebab_case(&self.name) == reference.kebab
    }
}

/// A resolved import for a component reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentImport {
    /// Local binding: the reference's Pascal name unless it is reserved.
    pub binding: String,
    /// Module path.
    pub path: String,
    /// Exported name for named imports.
    pub named: Option<String>,
}

/// Resolves component references to import locations.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    definitions: Vec<ComponentDefinition>,
    prefix: String,
}

impl ComponentRegistry {
    /// Creates a registry from explicit definitions and a fallback prefix.
    pub fn new(definitions: Vec<ComponentDefinition>, prefix: impl Into<String>) -> Self {
        Self {
            definitions,
            prefix: prefix.into(),
        }
    }

    /// Creates a registry from loader options.
    pub fn from_options(options: &LoaderOptions) -> Self {
        Self::new(
            options.components.clone(),
            options.component_import_prefix(),
        )
    }

    /// Get the definition registered for a reference, if any.
    pub fn get_definition(&self, reference: &ComponentReference) -> Option<&ComponentDefinition> {
        self.definitions.iter().find(|def| def.matches(reference))
    }

    /// Resolve the import for a reference.
    pub fn resolve(&self, reference: &ComponentReference) -> ComponentImport {
        let binding = component_binding(&reference.pascal).into_owned();
        match self.get_definition(reference) {
            Some(def) => ComponentImport {
                binding,
                path: def.module_path.clone(),
                named: match def.export_type {
                    // Tag spellings are not identifiers; use the binding name.
                    ExportType::Named if def.name.contains('-') => Some(reference.pascal.clone()),
                    ExportType::Named => Some(def.name.clone()),
                    ExportType::Default => None,
                },
            },
            None => ComponentImport {
                binding,
                path: format!("{}{}", self.prefix, reference.pascal),
                named: None,
            },
        }
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_COMPONENT_IMPORT_PREFIX)
    }
}
