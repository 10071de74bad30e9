//! Template rendering against the fixtures in `tests/views/`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use routekernel::http::Request;
use routekernel::view::{Renderer, TemplateRenderError, ViewModel, ViewPlugin, ViewVars};
use serde_json::json;

fn views_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/views")
}

fn renderer(sub: &str) -> Renderer {
    let mut renderer = Renderer::new();
    renderer.set_template_path(views_dir().join(sub));
    renderer
}

#[test]
fn test_loop_items_are_escaped() {
    let mut renderer = renderer("partials");
    let vars = ViewVars::new().with("items", json!(["a", "<b>"]));
    let out = renderer.render("list", Some(&vars)).unwrap();
    assert_eq!(out, "<ul><li>a</li><li>&lt;b&gt;</li></ul>");
}

#[test]
fn test_custom_escape_callback() {
    let mut renderer = renderer("partials");
    renderer.set_escape_callback(Arc::new(|s: &str| s.to_uppercase()));
    let vars = ViewVars::new().with("items", json!(["a", "b"]));
    assert_eq!(
        renderer.render("list", Some(&vars)).unwrap(),
        "<ul><li>A</li><li>B</li></ul>"
    );
}

#[test]
fn test_safe_values_are_not_escaped() {
    let mut renderer = renderer("blog/post");
    renderer.set_safe("title", "<em>raw</em>");
    assert_eq!(renderer.render("show", None).unwrap(), "<h1><em>raw</em></h1>");
}

#[test]
fn test_vars_persist_between_renders() {
    let mut renderer = renderer("blog/post");
    let vars = ViewVars::new().with("title", "first");
    renderer.render("show", Some(&vars)).unwrap();
    assert_eq!(renderer.render("show", None).unwrap(), "<h1>first</h1>");
}

#[test]
fn test_missing_template_is_not_found() {
    let mut renderer = renderer("partials");
    match renderer.render("nope", None).unwrap_err() {
        TemplateRenderError::NotFound { path } => {
            assert_eq!(path, views_dir().join("partials/nope.html"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_template_syntax_error_is_render_error() {
    let mut renderer = renderer("partials");
    let err = renderer.render("broken", None).unwrap_err();
    assert!(matches!(err, TemplateRenderError::Render { ref name, .. } if name == "broken"));
}

#[test]
fn test_parent_references_stay_inside_template_path() {
    let mut renderer = renderer("partials");
    let vars = ViewVars::new().with("items", json!([]));
    assert_eq!(renderer.render("../list", Some(&vars)).unwrap(), "<ul></ul>");
}

#[test]
fn test_plugin_renders_with_parent_layout() {
    let plugin = ViewPlugin::new(format!("{}/%module%/%controller%", views_dir().display()))
        .with_layout_enabled(true);
    let mut request = Request::get("/blog/post/show");
    request.set_module_name("blog");
    request.set_controller_name("post");
    request.set_action_name("show");

    let model = ViewModel::new(ViewVars::new().with("title", "T & C"));
    let out = plugin.render(&request, &model).unwrap();
    assert_eq!(
        out.trim_end(),
        "<!doctype html>\n<html><body><h1>T &amp; C</h1></body></html>"
    );
}

#[test]
fn test_plugin_explicit_template_name() {
    let plugin = ViewPlugin::new(format!("{}/partials", views_dir().display()));
    let request = Request::get("/");
    let model = ViewModel::new(ViewVars::new().with("items", json!(["x"]))).with_template("list");
    assert_eq!(plugin.render(&request, &model).unwrap(), "<ul><li>x</li></ul>");
}
