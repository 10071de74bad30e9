//! # Configuration Module
//!
//! Kernel configuration, loaded from a YAML file and optionally overridden by
//! environment variables.
//!
//! ## Example `config.yaml`
//!
//! ```yaml
//! modules: [Default, Blog]
//! controller_dir_pattern: "app/modules/%module%/controllers"
//! controller_class_pattern: "%Module%Module::%Controller%Controller"
//! base_url: "/"
//! views:
//!   dir_pattern: "app/modules/%module%/views/%controller%"
//!   extension: html
//!   layout: layout
//!   layout_enabled: true
//! response_headers:
//!   x-frame-options: DENY
//! routes:
//!   - name: news
//!     pattern: "/news(/%id%)"
//!     defaults: { module: blog, controller: news, action: show }
//!   - name: default
//!     pattern: "/%module%/%controller%/%action%(/*)"
//! ```
//!
//! ## Environment Variables
//!
//! | Variable            | Overrides                         |
//! |---------------------|-----------------------------------|
//! | `RK_BASE_URL`       | `base_url`                        |
//! | `RK_MODULES`        | `modules` (comma-separated)       |
//! | `RK_CONTROLLER_DIR` | `controller_dir_pattern`          |
//! | `RK_VIEW_DIR`       | `views.dir_pattern`               |

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::http::Params;

/// Default fully-qualified controller identity pattern.
pub const DEFAULT_CONTROLLER_CLASS_PATTERN: &str = "%Module%Module::%Controller%Controller";

/// Pattern of the catch-all route installed when no routes are configured.
pub const DEFAULT_ROUTE_PATTERN: &str = "/%module%/%controller%/%action%(/*)";

/// Top-level kernel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    /// Camel-cased names of the modules that may be dispatched to.
    pub modules: Vec<String>,
    /// Directory that must exist for a module/controller pair.
    /// `%module%` and `%controller%` are substituted.
    pub controller_dir_pattern: String,
    /// Controller identity pattern; `%Module%`/`%Controller%` get the
    /// camel-cased names, `%module%`/`%controller%` the raw ones.
    pub controller_class_pattern: String,
    /// Base URL stamped on requests that do not carry their own.
    pub base_url: String,
    pub views: ViewConfig,
    /// Headers added to every response that does not already set them.
    pub response_headers: BTreeMap<String, String>,
    /// Routes in matching order.
    pub routes: Vec<RouteConfig>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            modules: vec!["Default".to_string()],
            controller_dir_pattern: "modules/%module%/controllers".to_string(),
            controller_class_pattern: DEFAULT_CONTROLLER_CLASS_PATTERN.to_string(),
            base_url: "/".to_string(),
            views: ViewConfig::default(),
            response_headers: BTreeMap::new(),
            routes: vec![RouteConfig::default_route()],
        }
    }
}

impl KernelConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Apply `RK_*` environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(base_url) = env::var("RK_BASE_URL") {
            self.base_url = base_url;
        }
        if let Ok(modules) = env::var("RK_MODULES") {
            self.modules = modules
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(dir) = env::var("RK_CONTROLLER_DIR") {
            self.controller_dir_pattern = dir;
        }
        if let Ok(dir) = env::var("RK_VIEW_DIR") {
            self.views.dir_pattern = dir;
        }
    }
}

/// View layer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Template directory; `%module%`, `%controller%` and `%action%` are substituted.
    pub dir_pattern: String,
    /// Template file extension, without the dot. Empty means none.
    pub extension: String,
    /// Layout template name.
    pub layout: String,
    /// Wrap rendered views in the layout.
    pub layout_enabled: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            dir_pattern: "modules/%module%/views/%controller%".to_string(),
            extension: "html".to_string(),
            layout: "layout".to_string(),
            layout_enabled: false,
        }
    }
}

/// One configured route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub defaults: Params,
}

impl RouteConfig {
    /// The `/%module%/%controller%/%action%(/*)` route.
    #[must_use]
    pub fn default_route() -> Self {
        Self {
            name: "default".to_string(),
            pattern: DEFAULT_ROUTE_PATTERN.to_string(),
            defaults: Params::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KernelConfig::default();
        assert_eq!(config.modules, vec!["Default".to_string()]);
        assert_eq!(config.controller_class_pattern, DEFAULT_CONTROLLER_CLASS_PATTERN);
        assert_eq!(config.routes, vec![RouteConfig::default_route()]);
        assert_eq!(config.views.extension, "html");
        assert!(!config.views.layout_enabled);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
modules: [Default, Blog]
controller_dir_pattern: "app/%module%/controllers"
views:
  layout_enabled: true
routes:
  - name: news
    pattern: "/news(/%id%)"
    defaults: { module: blog, controller: news }
"#;
        let config = KernelConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.modules, vec!["Default".to_string(), "Blog".to_string()]);
        assert_eq!(config.controller_dir_pattern, "app/%module%/controllers");
        assert!(config.views.layout_enabled);
        assert_eq!(config.views.layout, "layout");
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].defaults.get("module").map(String::as_str), Some("blog"));
        assert_eq!(config.base_url, "/");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(KernelConfig::from_yaml_str("modulez: [Blog]").is_err());
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = KernelConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
