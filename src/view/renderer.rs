use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, Value};
use tracing::debug;

use super::{EscapeFn, TemplateRenderError, ViewVars};
use crate::plugin::{Pluggable, PluginBroker};

/// Default template file extension.
pub const DEFAULT_EXTENSION: &str = "html";

/// Renders template files from one directory with `minijinja`.
///
/// Every string printed by a template goes through the escape callback
/// unless the template marks it `|safe`. Variables accumulate across
/// renders, so a layout sees everything its content template saw.
pub struct Renderer {
    template_path: PathBuf,
    extension: String,
    vars: ViewVars,
    safe: BTreeMap<String, String>,
    plugins: Arc<PluginBroker>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            template_path: PathBuf::new(),
            extension: DEFAULT_EXTENSION.to_string(),
            vars: ViewVars::new(),
            safe: BTreeMap::new(),
            plugins: Arc::new(PluginBroker::new()),
        }
    }
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_plugins(mut self, plugins: Arc<PluginBroker>) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn set_template_path(&mut self, path: impl Into<PathBuf>) {
        self.template_path = path.into();
    }

    #[must_use]
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Extension without the dot; empty means template names are file names.
    pub fn set_file_extension(&mut self, extension: impl Into<String>) {
        self.extension = extension.into();
    }

    #[must_use]
    pub fn file_extension(&self) -> &str {
        &self.extension
    }

    #[must_use]
    pub fn vars(&self) -> &ViewVars {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut ViewVars {
        &mut self.vars
    }

    /// Replace all variables, keeping the escape callback.
    pub fn set_vars(&mut self, vars: ViewVars) {
        let escape = self.vars.escape_callback();
        self.vars = vars;
        self.vars.set_escape_callback(escape);
    }

    /// Bind `name` to pre-rendered markup that is printed unescaped.
    pub fn set_safe(&mut self, name: impl Into<String>, html: impl Into<String>) {
        self.safe.insert(name.into(), html.into());
    }

    pub fn set_escape_callback(&mut self, escape: EscapeFn) {
        self.vars.set_escape_callback(escape);
    }

    #[must_use]
    pub fn escape(&self, value: &str) -> String {
        self.vars.escape(value)
    }

    /// Template file for `name`. `..` is removed from the name.
    #[must_use]
    pub fn file(&self, name: &str) -> PathBuf {
        let mut file_name = name.replace("..", "");
        if !self.extension.is_empty() {
            file_name.push('.');
            file_name.push_str(&self.extension);
        }
        self.template_path.join(file_name.trim_start_matches('/'))
    }

    /// Render the template `name`, merging `vars` into the current variables first.
    ///
    /// # Errors
    ///
    /// [`TemplateRenderError::NotFound`] and [`TemplateRenderError::Unreadable`]
    /// for file problems, [`TemplateRenderError::Render`] for template errors.
    pub fn render(&mut self, name: &str, vars: Option<&ViewVars>) -> Result<String, TemplateRenderError> {
        let file = self.file(name);
        if !file.is_file() {
            return Err(TemplateRenderError::NotFound { path: file });
        }
        let source = fs::read_to_string(&file).map_err(|e| TemplateRenderError::Unreadable {
            path: file.clone(),
            reason: e.to_string(),
        })?;

        if let Some(vars) = vars {
            self.vars.merge(vars);
        }

        let env = self.environment();
        let render_error = |e: minijinja::Error| TemplateRenderError::Render {
            name: name.to_string(),
            reason: e.to_string(),
        };
        let rendered = env
            .render_named_str(name, &source, self.context())
            .map_err(render_error)?;

        debug!(
            template = %file.display(),
            vars = self.vars.len(),
            bytes = rendered.len(),
            "Template rendered"
        );
        Ok(rendered)
    }

    fn environment<'source>(&self) -> Environment<'source> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        let escape = self.vars.escape_callback();
        env.set_formatter(move |out, state, value| {
            if !value.is_safe() {
                if let Some(s) = value.as_str() {
                    out.write_str(&escape(s))?;
                    return Ok(());
                }
            }
            minijinja::escape_formatter(out, state, value)
        });
        env
    }

    fn context(&self) -> BTreeMap<String, Value> {
        let vars = self
            .vars
            .iter()
            .map(|(name, value)| (name.clone(), Value::from_serialize(value)));
        let safe = self
            .safe
            .iter()
            .map(|(name, html)| (name.clone(), Value::from_safe_string(html.clone())));
        vars.chain(safe).collect()
    }
}

impl Pluggable for Renderer {
    fn plugin_broker(&self) -> &PluginBroker {
        &self.plugins
    }
}
