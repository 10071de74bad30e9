//! # Plugin Module
//!
//! A lazy, shared, name-keyed object cache.
//!
//! Factories are registered by name at startup. The first [`PluginBroker::load`]
//! of a name builds the instance; every later load of that name returns the
//! same `Arc`. When two threads race on the first load, the first instance
//! stored wins and the other is dropped, so loading stays idempotent.
//!
//! ```rust
//! use std::sync::Arc;
//! use routekernel::plugin::PluginBroker;
//!
//! struct Greeter(&'static str);
//!
//! let broker = PluginBroker::new();
//! broker.register("greeter", || Greeter("hello"));
//!
//! let a = broker.load_as::<Greeter>("greeter").unwrap();
//! let b = broker.load_as::<Greeter>("greeter").unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! assert_eq!(a.0, "hello");
//! ```

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

/// A loaded plugin instance.
pub type PluginInstance = Arc<dyn Any + Send + Sync>;

type PluginFactory = Arc<dyn Fn() -> PluginInstance + Send + Sync>;

/// Errors raised by [`PluginBroker`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PluginError {
    #[error("plugin '{name}' is not registered")]
    Unknown { name: String },
    #[error("plugin '{name}' is not a {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

/// Name to instance registry with construct-on-first-use semantics.
#[derive(Default)]
pub struct PluginBroker {
    factories: RwLock<HashMap<String, PluginFactory>>,
    instances: RwLock<HashMap<String, PluginInstance>>,
}

impl PluginBroker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`.
    ///
    /// Replacing a factory also forgets the instance it built, if any.
    pub fn register<T, F>(&self, name: &str, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory: PluginFactory = Arc::new(move || Arc::new(factory()) as PluginInstance);
        if self
            .factories
            .write()
            .insert(name.to_string(), factory)
            .is_some()
        {
            warn!(plugin = %name, "Replaced existing plugin factory");
            self.instances.write().remove(name);
        }
    }

    /// Store a ready-made instance under `name`.
    pub fn register_instance<T: Any + Send + Sync>(&self, name: &str, instance: T) {
        let instance: PluginInstance = Arc::new(instance);
        let factory_instance = Arc::clone(&instance);
        self.factories.write().insert(
            name.to_string(),
            Arc::new(move || Arc::clone(&factory_instance)),
        );
        self.instances.write().insert(name.to_string(), instance);
    }

    /// Load the instance registered under `name`, building it on first use.
    ///
    /// # Errors
    ///
    /// [`PluginError::Unknown`] if nothing is registered under `name`.
    pub fn load(&self, name: &str) -> Result<PluginInstance, PluginError> {
        if let Some(instance) = self.instances.read().get(name) {
            return Ok(Arc::clone(instance));
        }

        let factory = self
            .factories
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| PluginError::Unknown {
                name: name.to_string(),
            })?;

        // Built outside the locks so factories may load other plugins.
        let built = factory();
        let mut instances = self.instances.write();
        let instance = instances.entry(name.to_string()).or_insert(built);
        debug!(plugin = %name, "Plugin loaded");
        Ok(Arc::clone(instance))
    }

    /// Load and downcast.
    ///
    /// # Errors
    ///
    /// [`PluginError::Unknown`] as for [`load`](Self::load),
    /// [`PluginError::TypeMismatch`] if the instance is not a `T`.
    pub fn load_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, PluginError> {
        self.load(name)?
            .downcast::<T>()
            .map_err(|_| PluginError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.instances.read().contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for PluginBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginBroker")
            .field("plugins", &self.names())
            .finish()
    }
}

/// Something that hands out plugins from a broker.
pub trait Pluggable {
    fn plugin_broker(&self) -> &PluginBroker;

    /// # Errors
    ///
    /// See [`PluginBroker::load`].
    fn plugin(&self, name: &str) -> Result<PluginInstance, PluginError> {
        self.plugin_broker().load(name)
    }

    /// # Errors
    ///
    /// See [`PluginBroker::load_as`].
    fn plugin_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, PluginError>
    where
        Self: Sized,
    {
        self.plugin_broker().load_as::<T>(name)
    }
}
