//! # Controller Module
//!
//! Controllers, their results, and how a routed request finds its controller.
//!
//! Resolution happens in two steps:
//!
//! 1. [`ControllerResolver`] checks the routed module against the active
//!    modules, checks that the controller directory exists and computes the
//!    absolute identity from the class pattern
//!    (`%Module%Module::%Controller%Controller` by default).
//! 2. [`ControllerRegistry`] maps that identity to the factory registered at
//!    startup, which builds the controller with a [`ControllerContext`].
//!
//! ```rust
//! use routekernel::controller::{Controller, ControllerRegistry, Outcome};
//! use routekernel::http::Request;
//!
//! struct NewsController;
//!
//! impl Controller for NewsController {
//!     fn dispatch(&mut self, request: &mut Request) -> anyhow::Result<Outcome> {
//!         Ok(Outcome::Text(format!("news {}", request.param("id").unwrap_or("-"))))
//!     }
//! }
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register("BlogModule::NewsController", |_ctx| Box::new(NewsController));
//! assert!(registry.contains("::BlogModule::NewsController"));
//! ```

mod core;
mod error;
mod registry;
mod resolver;

pub use core::{Controller, ControllerContext, ControllerFactory, Outcome};
pub use error::ConfigurationError;
pub use registry::ControllerRegistry;
pub use resolver::{
    absolute_identity, camelcase, parse_pattern, ControllerResolver, ResolvedController,
    IDENTITY_SEPARATOR,
};
