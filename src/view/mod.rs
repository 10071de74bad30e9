//! # View Module
//!
//! Template rendering for controllers that return [`Outcome::View`](crate::controller::Outcome::View).
//!
//! - [`ViewVars`] holds template variables and escapes strings on read.
//! - [`Renderer`] renders one template file with `minijinja`.
//! - [`ViewPlugin`] picks the template directory and name for a routed
//!   request and wraps the result in a layout when enabled.
//! - [`ViewResultListener`] plugs the above into the kernel pipeline.
//!
//! Layouts receive the rendered template as the unescaped `content` variable:
//!
//! ```text
//! <html><body>{{ content }}</body></html>
//! ```

mod error;
mod listener;
mod plugin;
mod renderer;
mod vars;

pub use error::TemplateRenderError;
pub use listener::ViewResultListener;
pub use plugin::{ViewPlugin, VIEW_PLUGIN};
pub use renderer::{Renderer, DEFAULT_EXTENSION};
pub use vars::{html_escape, EscapeFn, ViewModel, ViewVars};

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::http::Request;

    fn routed(module: &str, controller: &str, action: &str) -> Request {
        let mut request = Request::get("/");
        request.set_module_name(module);
        request.set_controller_name(controller);
        request.set_action_name(action);
        request
    }

    fn write(path: &Path, body: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_template_defaults_to_action_name() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("blog/news/show.html"), "news {{ id }}");
        let plugin = ViewPlugin::new(format!("{}/%module%/%controller%", root.path().display()));

        let model = ViewModel::new(ViewVars::new().with("id", "7"));
        let out = plugin.render(&routed("blog", "news", "show"), &model).unwrap();
        assert_eq!(out, "news 7");
    }

    #[test]
    fn test_layout_in_parent_dir_wraps_content() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("blog/news/list.html"), "<li>{{ title }}</li>");
        write(&root.path().join("blog/layout.html"), "<ul>{{ content }}</ul>{{ title }}");
        let plugin = ViewPlugin::new(format!("{}/%module%/%controller%", root.path().display()))
            .with_layout_enabled(true);

        let model = ViewModel::new(ViewVars::new().with("title", "a<b"));
        let out = plugin.render(&routed("blog", "news", "list"), &model).unwrap();
        assert_eq!(out, "<ul><li>a&lt;b</li></ul>a&lt;b");
    }

    #[test]
    fn test_missing_layout_lists_checked_paths() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("news/show.html"), "x");
        let plugin = ViewPlugin::new(format!("{}/%controller%", root.path().display()));

        let model = ViewModel::default().with_layout("frame");
        let err = plugin.render(&routed("blog", "news", "show"), &model).unwrap_err();
        match err {
            TemplateRenderError::LayoutNotFound { checked } => {
                assert_eq!(checked.len(), 3);
                assert_eq!(checked[0], Path::new("frame"));
                assert_eq!(checked[1], root.path().join("news/frame.html"));
                assert!(err_message(&checked).contains("frame.html"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn err_message(checked: &[std::path::PathBuf]) -> String {
        TemplateRenderError::LayoutNotFound {
            checked: checked.to_vec(),
        }
        .to_string()
    }

    #[test]
    fn test_model_can_disable_configured_layout() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("index/index.html"), "bare");
        let plugin = ViewPlugin::new(format!("{}/%controller%", root.path().display()))
            .with_layout("missing");

        let model = ViewModel::default().without_layout();
        assert_eq!(plugin.render(&routed("default", "index", "index"), &model).unwrap(), "bare");
    }
}
