use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::{EscapeFn, Renderer, TemplateRenderError, ViewModel};
use crate::config::ViewConfig;
use crate::controller::parse_pattern;
use crate::http::Request;
use crate::plugin::PluginBroker;

/// Plugin name the view layer registers under.
pub const VIEW_PLUGIN: &str = "view";

/// Renders a routed request's view template, optionally inside a layout.
///
/// The template directory comes from a pattern with `%module%`,
/// `%controller%` and `%action%` placeholders; the template name defaults
/// to the action name.
pub struct ViewPlugin {
    dir_pattern: String,
    extension: String,
    layout: String,
    layout_enabled: bool,
    escape: Option<EscapeFn>,
    plugins: Option<Arc<PluginBroker>>,
}

impl ViewPlugin {
    #[must_use]
    pub fn new(dir_pattern: impl Into<String>) -> Self {
        let defaults = ViewConfig::default();
        Self {
            dir_pattern: dir_pattern.into(),
            extension: defaults.extension,
            layout: defaults.layout,
            layout_enabled: defaults.layout_enabled,
            escape: None,
            plugins: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            dir_pattern: config.dir_pattern.clone(),
            extension: config.extension.clone(),
            layout: config.layout.clone(),
            layout_enabled: config.layout_enabled,
            escape: None,
            plugins: None,
        }
    }

    /// Use `layout` and turn layouts on.
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self.layout_enabled = true;
        self
    }

    #[must_use]
    pub fn with_layout_enabled(mut self, enabled: bool) -> Self {
        self.layout_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use]
    pub fn with_escape_callback(mut self, escape: EscapeFn) -> Self {
        self.escape = Some(escape);
        self
    }

    /// Plugin broker handed to the renderers this plugin creates.
    #[must_use]
    pub fn with_plugins(mut self, plugins: Arc<PluginBroker>) -> Self {
        self.plugins = Some(plugins);
        self
    }

    #[must_use]
    pub fn layout(&self) -> &str {
        &self.layout
    }

    #[must_use]
    pub fn is_layout_enabled(&self) -> bool {
        self.layout_enabled
    }

    /// View directory for the routed request.
    #[must_use]
    pub fn view_dir(&self, request: &Request) -> PathBuf {
        PathBuf::from(parse_pattern(
            &self.dir_pattern,
            &[
                ("action", request.action_name()),
                ("controller", request.controller_name()),
                ("module", request.module_name()),
            ],
        ))
    }

    /// Render `model` for `request`.
    ///
    /// # Errors
    ///
    /// Any [`TemplateRenderError`] of the template or the layout.
    pub fn render(&self, request: &Request, model: &ViewModel) -> Result<String, TemplateRenderError> {
        let mut renderer = self.renderer();
        renderer.set_template_path(self.view_dir(request));

        let name = model
            .template
            .as_deref()
            .unwrap_or_else(|| request.action_name());
        let content = renderer.render(name, Some(&model.vars))?;

        let layout_enabled = model.layout_enabled.unwrap_or(self.layout_enabled);
        if !layout_enabled {
            return Ok(content);
        }
        let layout = model.layout.as_deref().unwrap_or(&self.layout);
        self.render_layout(&mut renderer, content, layout)
    }

    /// Render `content` into `layout`, found next to or above the current
    /// template directory.
    ///
    /// # Errors
    ///
    /// [`TemplateRenderError::LayoutNotFound`] when no candidate file exists.
    pub fn render_layout(
        &self,
        renderer: &mut Renderer,
        content: String,
        layout: &str,
    ) -> Result<String, TemplateRenderError> {
        let template = self.layout_template(renderer.template_path(), layout)?;
        let dir = template.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = template
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(layout = %template.display(), "Rendering layout");
        renderer.set_template_path(dir);
        renderer.set_safe("content", content);
        renderer.render(&name, None)
    }

    /// First existing layout file of: `layout` as given, `<dir>/<layout>.<ext>`,
    /// `<dir>/../<layout>.<ext>`.
    ///
    /// # Errors
    ///
    /// [`TemplateRenderError::LayoutNotFound`] listing every checked path.
    pub fn layout_template(&self, dir: &Path, layout: &str) -> Result<PathBuf, TemplateRenderError> {
        let file_name = if self.extension.is_empty() {
            layout.to_string()
        } else {
            format!("{layout}.{}", self.extension)
        };
        let candidates = vec![
            PathBuf::from(layout),
            dir.join(&file_name),
            dir.join("..").join(&file_name),
        ];
        match candidates.iter().find(|p| p.is_file()) {
            Some(found) => Ok(found.clone()),
            None => Err(TemplateRenderError::LayoutNotFound {
                checked: candidates,
            }),
        }
    }

    fn renderer(&self) -> Renderer {
        let mut renderer = match &self.plugins {
            Some(plugins) => Renderer::new().with_plugins(Arc::clone(plugins)),
            None => Renderer::new(),
        };
        renderer.set_file_extension(self.extension.clone());
        if let Some(escape) = &self.escape {
            renderer.set_escape_callback(Arc::clone(escape));
        }
        renderer
    }
}

impl std::fmt::Debug for ViewPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewPlugin")
            .field("dir_pattern", &self.dir_pattern)
            .field("extension", &self.extension)
            .field("layout", &self.layout)
            .field("layout_enabled", &self.layout_enabled)
            .finish()
    }
}
