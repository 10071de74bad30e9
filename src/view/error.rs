use std::path::PathBuf;

/// Errors raised by the view layer. None of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateRenderError {
    #[error("Could not find view template at: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Could not read view template at: {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("failed to render template '{name}': {reason}")]
    Render { name: String, reason: String },

    #[error("Layout could not be found! (Checked paths {})", display_paths(.checked))]
    LayoutNotFound { checked: Vec<PathBuf> },

    #[error("Template variable '{name}' does not exist")]
    UndefinedVariable { name: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
