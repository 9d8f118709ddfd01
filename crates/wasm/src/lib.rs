use fmloader::{BoxError, Loader, LoaderError, LoaderOptions, MarkdownRenderer};
use js_sys::{Function, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

// ============================================================================
// Config
// ============================================================================

/// Config keys that carry JavaScript functions rather than JSON options.
const BRIDGE_KEYS: &[&str] = &[
    "markdownRenderFn",
    "markdownRendererInstance",
    "vueCompiler",
    "reactCompiler",
];

fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn to_js_error(err: LoaderError) -> JsError {
    JsError::new(&err.to_string())
}

fn is_present(config: &JsValue) -> bool {
    !(config.is_undefined() || config.is_null())
}

/// Parses the JSON part of the config, skipping the function bridges.
fn parse_options(config: &JsValue) -> Result<LoaderOptions, JsError> {
    if !is_present(config) {
        return Ok(LoaderOptions::default());
    }
    let Some(object) = config.dyn_ref::<Object>() else {
        return Err(JsError::new("Invalid config: expected an object"));
    };

    let plain = Object::new();
    for key in Object::keys(object).iter() {
        let name = key.as_string().unwrap_or_default();
        if BRIDGE_KEYS.contains(&name.as_str()) {
            continue;
        }
        let value = Reflect::get(object, &key)
            .map_err(|e| JsError::new(&format!("Invalid config: {}", js_error_message(&e))))?;
        Reflect::set(&plain, &key, &value)
            .map_err(|e| JsError::new(&format!("Invalid config: {}", js_error_message(&e))))?;
    }

    let json = js_sys::JSON::stringify(&plain)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", js_error_message(&e))))?;
    LoaderOptions::from_json(&String::from(json)).map_err(to_js_error)
}

fn get_property(target: &JsValue, key: &str) -> Result<Option<JsValue>, JsError> {
    if !is_present(target) {
        return Ok(None);
    }
    let value = Reflect::get(target, &JsValue::from_str(key))
        .map_err(|e| JsError::new(&format!("Invalid config: {}", js_error_message(&e))))?;
    Ok(is_present(&value).then_some(value))
}

fn get_function(target: &JsValue, key: &str) -> Result<Option<Function>, JsError> {
    match get_property(target, key)? {
        Some(value) => value
            .dyn_into::<Function>()
            .map(Some)
            .map_err(|_| JsError::new(&format!("Invalid config: `{}` must be a function", key))),
        None => Ok(None),
    }
}

// ============================================================================
// JavaScript bridges
// ============================================================================

/// Calls a JavaScript `(input: string) => string` function.
fn call_string_function(
    function: &Function,
    this: &JsValue,
    input: &str,
    name: &str,
) -> Result<String, BoxError> {
    let value = function
        .call1(this, &JsValue::from_str(input))
        .map_err(|e| BoxError::from(js_error_message(&e)))?;
    value
        .as_string()
        .ok_or_else(|| BoxError::from(format!("`{}` must return a string", name)))
}

fn string_function(
    function: Function,
    name: &'static str,
) -> impl Fn(&str) -> Result<String, BoxError> + 'static {
    move |input: &str| call_string_function(&function, &JsValue::NULL, input, name)
}

/// A markdown renderer object supplied by JavaScript, e.g. a configured
/// markdown-it instance.
struct JsMarkdownRenderer {
    instance: JsValue,
    render: Function,
}

impl MarkdownRenderer for JsMarkdownRenderer {
    fn render(&self, body: &str) -> Result<String, LoaderError> {
        call_string_function(&self.render, &self.instance, body, "markdownRendererInstance.render")
            .map_err(LoaderError::renderer)
    }
}

fn build_loader(config: &JsValue) -> Result<Loader, JsError> {
    let mut builder = Loader::builder().options(parse_options(config)?);

    if let Some(render) = get_function(config, "markdownRenderFn")? {
        builder = builder.markdown_render_fn(string_function(render, "markdownRenderFn"));
    }
    if let Some(instance) = get_property(config, "markdownRendererInstance")? {
        let render = get_function(&instance, "render")?.ok_or_else(|| {
            JsError::new("Invalid config: `markdownRendererInstance` must have a `render` method")
        })?;
        builder = builder.markdown_renderer(JsMarkdownRenderer { instance, render });
    }
    if let Some(compiler) = get_function(config, "vueCompiler")? {
        builder = builder.vue_compiler(string_function(compiler, "vueCompiler"));
    }
    if let Some(compiler) = get_function(config, "reactCompiler")? {
        builder = builder.react_compiler(string_function(compiler, "reactCompiler"));
    }

    builder.build().map_err(to_js_error)
}

// ============================================================================
// Load API
// ============================================================================

/// Loads a frontmatter markdown document into an ES module.
///
/// # Arguments
///
/// * `source` - The markdown document, frontmatter included
/// * `resource_path` - Path reported in the `meta` export
/// * `config` - Optional configuration object:
///   - `mode`: array of `"html"`, `"body"`, `"meta"`, `"vue-component"`, `"react-component"`
///   - `markdownRendererOptions`, `componentImportPrefix`, `components`, `vue`, `react`
///   - `markdownRenderFn(body)`: custom markdown renderer
///   - `markdownRendererInstance`: object with a `render(body)` method
///   - `vueCompiler(template)` / `reactCompiler(jsx)`: template compilers
///
/// # Returns
///
/// `{ code, exports, attributes, components }`.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { load } from './fmloader_wasm';
///
/// const { code } = load(source, '/docs/intro.md', {
///   mode: ['html', 'vue-component'],
///   vueCompiler: (template) => compileToFunction(template),
/// });
/// ```
#[wasm_bindgen]
pub fn load(source: &str, resource_path: &str, config: JsValue) -> Result<JsValue, JsError> {
    let loader = build_loader(&config)?;
    let output = loader.load(source, resource_path).map_err(to_js_error)?;

    output
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
