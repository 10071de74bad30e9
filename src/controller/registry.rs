use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::resolver::absolute_identity;
use super::{Controller, ControllerContext, ControllerFactory};

/// Controller factories keyed by absolute identity (`::BlogModule::NewsController`).
///
/// Populated at startup; the kernel looks up the identity computed by the
/// [`ControllerResolver`](super::ControllerResolver) for every request.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. The identity may be given with or without the
    /// leading `::`. An existing registration is replaced.
    pub fn register<F>(&mut self, identity: &str, factory: F)
    where
        F: Fn(&ControllerContext<'_>) -> Box<dyn Controller> + Send + Sync + 'static,
    {
        let identity = absolute_identity(identity);
        if self.factories.contains_key(&identity) {
            warn!(identity = %identity, "Replaced existing controller factory");
        }
        info!(
            identity = %identity,
            total_controllers = self.factories.len() + 1,
            "Controller registered"
        );
        self.factories.insert(identity, Arc::new(factory));
    }

    #[must_use]
    pub fn get(&self, identity: &str) -> Option<&ControllerFactory> {
        self.factories.get(&absolute_identity(identity))
    }

    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.get(identity).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered identities, sorted.
    #[must_use]
    pub fn identities(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("identities", &self.identities())
            .finish()
    }
}
