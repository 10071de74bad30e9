use std::path::PathBuf;

use tracing::{debug, warn};

use super::ConfigurationError;
use crate::config::KernelConfig;

/// Separator between the segments of a controller identity.
pub const IDENTITY_SEPARATOR: &str = "::";

/// Camel-case a routed name: `user-profile` becomes `UserProfile`.
///
/// Words are split on `-`, `_`, `.` and spaces; each word gets an upper-case
/// first letter, the rest is kept as is.
#[must_use]
pub fn camelcase(name: &str) -> String {
    name.split(['-', '_', '.', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Substitute `%key%` with the raw value and `%Key%` with its camel-cased form.
///
/// ```
/// use routekernel::controller::parse_pattern;
///
/// let params = [("module", "blog"), ("controller", "user-post")];
/// assert_eq!(
///     parse_pattern("%Module%Module::%Controller%Controller", &params),
///     "BlogModule::UserPostController"
/// );
/// assert_eq!(parse_pattern("app/%module%/%controller%", &params), "app/blog/user-post");
/// ```
#[must_use]
pub fn parse_pattern(pattern: &str, params: &[(&str, &str)]) -> String {
    let mut out = pattern.to_string();
    for (key, value) in params {
        out = out.replace(&format!("%{key}%"), value);
        out = out.replace(&format!("%{}%", camelcase(key)), &camelcase(value));
    }
    out
}

/// Where a routed module/controller pair lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedController {
    /// Absolute identity, e.g. `::BlogModule::NewsController`.
    pub identity: String,
    /// Controller directory; known to exist.
    pub path: PathBuf,
}

/// Maps a routed module/controller pair to a controller identity.
///
/// The module must be one of the active modules (compared camel-cased) and
/// the controller directory computed from the directory pattern must exist.
#[derive(Debug, Clone)]
pub struct ControllerResolver {
    modules: Vec<String>,
    dir_pattern: String,
    class_pattern: String,
}

impl ControllerResolver {
    #[must_use]
    pub fn new(
        modules: Vec<String>,
        dir_pattern: impl Into<String>,
        class_pattern: impl Into<String>,
    ) -> Self {
        Self {
            modules,
            dir_pattern: dir_pattern.into(),
            class_pattern: class_pattern.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &KernelConfig) -> Self {
        Self::new(
            config.modules.clone(),
            config.controller_dir_pattern.clone(),
            config.controller_class_pattern.clone(),
        )
    }

    #[must_use]
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    #[must_use]
    pub fn class_pattern(&self) -> &str {
        &self.class_pattern
    }

    pub fn set_class_pattern(&mut self, pattern: impl Into<String>) {
        self.class_pattern = pattern.into();
    }

    /// Resolve both the controller directory and its identity.
    ///
    /// # Errors
    ///
    /// See [`controller_path`](Self::controller_path) and
    /// [`controller_identity`](Self::controller_identity).
    pub fn resolve(&self, module: &str, controller: &str) -> Result<ResolvedController, ConfigurationError> {
        let path = self.controller_path(module, controller)?;
        let identity = self.controller_identity(module, controller)?;
        debug!(
            module = %module,
            controller = %controller,
            identity = %identity,
            path = %path.display(),
            "Controller resolved"
        );
        Ok(ResolvedController { identity, path })
    }

    /// Directory of the controller.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::UnknownModule`] when the module is not active,
    /// [`ConfigurationError::ControllerPathNotFound`] when the directory
    /// does not exist.
    pub fn controller_path(&self, module: &str, controller: &str) -> Result<PathBuf, ConfigurationError> {
        let module_camel = camelcase(module);
        if !self.modules.iter().any(|m| *m == module_camel) {
            warn!(
                module = %module_camel,
                active_modules = ?self.modules,
                "Module is not active"
            );
            return Err(ConfigurationError::UnknownModule {
                module: module_camel,
            });
        }

        let dir = PathBuf::from(parse_pattern(
            &self.dir_pattern,
            &[("controller", controller), ("module", module)],
        ));
        if !dir.is_dir() {
            warn!(
                module = %module_camel,
                controller = %controller,
                path = %dir.display(),
                "Controller directory missing"
            );
            return Err(ConfigurationError::ControllerPathNotFound {
                module: module_camel,
                controller: camelcase(controller),
                path: dir,
            });
        }
        Ok(dir)
    }

    /// Absolute controller identity, always starting with `::`.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::InvalidControllerIdentity`] when the identity is
    /// empty or contains a `.`.
    pub fn controller_identity(&self, module: &str, controller: &str) -> Result<String, ConfigurationError> {
        let name = parse_pattern(
            &self.class_pattern,
            &[("module", module), ("controller", controller)],
        );
        let identity = absolute_identity(&name);

        if identity == IDENTITY_SEPARATOR {
            return Err(ConfigurationError::InvalidControllerIdentity {
                identity,
                reason: "identity is empty".to_string(),
            });
        }
        if identity.contains('.') {
            return Err(ConfigurationError::InvalidControllerIdentity {
                identity,
                reason: "identity must not contain '.'".to_string(),
            });
        }
        Ok(identity)
    }
}

/// Prefix `name` with `::` unless it already is absolute.
#[must_use]
pub fn absolute_identity(name: &str) -> String {
    if name.starts_with(IDENTITY_SEPARATOR) {
        name.to_string()
    } else {
        format!("{IDENTITY_SEPARATOR}{name}")
    }
}
